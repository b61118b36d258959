//! Date, datetime and time transformers.
//!
//! Typed values are Unix-epoch seconds (fractional seconds allowed). All
//! formatting and parsing of ISO text happens in UTC. Infinite values are
//! representable and have their own sentinel text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::{NativeType, Transformer};
use crate::value::Value;

pub const FAR_FUTURE: &str = "infinitely far in the future";
pub const FAR_PAST: &str = "infinitely early in the past";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const TIME_FORMAT: &str = "%H:%M:%S%.3f";

pub(super) fn date() -> Transformer {
    temporal(DATE_FORMAT, NativeType::Date)
}

pub(super) fn datetime() -> Transformer {
    temporal(DATETIME_FORMAT, NativeType::DateTimeLocal)
}

pub(super) fn time() -> Transformer {
    temporal(TIME_FORMAT, NativeType::Time)
}

fn temporal(format: &'static str, native_type: NativeType) -> Transformer {
    Transformer::new()
        .with_parse(|raw, _| parse_epoch_seconds(raw))
        .with_final_format(move |value, _| format_epoch_seconds(value, format))
        .with_intermediate_format(move |value, _| format_epoch_seconds(value, format))
        .with_native_type(native_type)
}

fn format_epoch_seconds(value: &Value, format: &str) -> String {
    let Some(seconds) = value.as_number() else {
        return value.to_plain_string();
    };
    if seconds == f64::INFINITY {
        return FAR_FUTURE.to_string();
    }
    if seconds == f64::NEG_INFINITY {
        return FAR_PAST.to_string();
    }
    if seconds.is_nan() {
        return String::new();
    }
    let millis = (seconds * 1000.0).round() as i64;
    match DateTime::from_timestamp_millis(millis) {
        Some(instant) => instant.format(format).to_string(),
        None => String::new(),
    }
}

/// Numbers pass through. Text is tried as a sentinel, a number, then the
/// ISO shapes. Anything else is `NaN`.
fn parse_epoch_seconds(raw: &Value) -> Value {
    let text = match raw {
        Value::Number(_) => return raw.clone(),
        Value::Text(text) => text.trim(),
        _ => return Value::Number(f64::NAN),
    };

    if text == FAR_FUTURE {
        return Value::Number(f64::INFINITY);
    }
    if text == FAR_PAST {
        return Value::Number(f64::NEG_INFINITY);
    }
    if let Ok(n) = text.parse::<f64>() {
        return Value::Number(n);
    }
    Value::Number(parse_iso(text).unwrap_or(f64::NAN))
}

fn parse_iso(text: &str) -> Option<f64> {
    let text = text.strip_suffix('Z').unwrap_or(text);

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(text, format) {
            let utc = instant.and_utc();
            return Some(utc.timestamp() as f64 + f64::from(utc.nanosecond()) / 1e9);
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return day
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().timestamp() as f64);
    }
    for format in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(clock) = NaiveTime::parse_from_str(text, format) {
            return Some(
                f64::from(clock.num_seconds_from_midnight()) + f64::from(clock.nanosecond()) / 1e9,
            );
        }
    }
    None
}
