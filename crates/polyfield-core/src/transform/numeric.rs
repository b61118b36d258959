//! Numeric transformers: `number`, `integer`, `float` and `currency`.
//!
//! `integer`, `float` and `currency` correct the sign against one-sided
//! bounds: a negative input under `minimum >= 0`, or a positive input under
//! `maximum <= 0`, is negated rather than flagged. Users typing `-5` into a
//! field bounded at zero get `5`. This is a long-standing behaviour of the
//! component and callers rely on it.

use super::{FieldType, NativeType, TransformContext, Transformer};
use crate::locale::NumberFormatOptions;
use crate::value::{Value, parse_float_prefix, parse_int_prefix};

/// Typed numbers pass through, text reads its integer prefix. No sign
/// correction.
pub(super) fn number() -> Transformer {
    Transformer::new()
        .with_parse(|raw, _| match raw {
            Value::Number(n) => Value::Number(*n),
            other => Value::Number(parse_int_prefix(&other.to_plain_string())),
        })
        .with_native_type(NativeType::Number)
}

pub(super) fn integer() -> Transformer {
    Transformer::new()
        .with_parse(|raw, ctx| {
            let parsed = match raw {
                Value::Number(n) if n.is_finite() => n.trunc(),
                Value::Number(n) => *n,
                other => {
                    let normalized = normalize(&other.to_plain_string(), ctx);
                    parse_infinity(&normalized).unwrap_or_else(|| parse_int_prefix(&normalized))
                }
            };
            Value::Number(correct_sign(parsed, ctx))
        })
        .with_final_format(|value, ctx| match value.as_number() {
            Some(n) => ctx
                .locale
                .format_number(n, &NumberFormatOptions::fraction_digits(0)),
            None => value.to_plain_string(),
        })
        .with_native_type(NativeType::Text)
}

pub(super) fn float() -> Transformer {
    Transformer::new()
        .with_parse(|raw, ctx| {
            let parsed = match raw {
                Value::Number(n) => *n,
                other => parse_float_prefix(&normalize(&other.to_plain_string(), ctx)),
            };
            Value::Number(correct_sign(parsed, ctx))
        })
        .with_final_format(|value, ctx| match value.as_number() {
            Some(n) if n == f64::INFINITY => "Infinity".to_string(),
            Some(n) if n == f64::NEG_INFINITY => "- Infinity".to_string(),
            Some(n) => ctx.locale.format_number(n, ctx.options),
            None => value.to_plain_string(),
        })
        .with_native_type(NativeType::Text)
}

/// Strips the currency code and symbol, then parses like `float`.
pub(super) fn currency() -> Transformer {
    Transformer::new()
        .with_parse(|raw, ctx| {
            let stripped = match raw {
                Value::Text(text) => {
                    let code = ctx.options.currency.as_str();
                    let symbol = ctx.locale.currency_symbol(code);
                    Value::Text(text.replace(code, "").replace(symbol.as_str(), ""))
                }
                other => other.clone(),
            };
            ctx.registry
                .pipeline(FieldType::Float, None)
                .parse(&stripped, ctx.model)
        })
        .with_final_format(|value, ctx| {
            let code = ctx.options.currency.as_str();
            match value.as_number() {
                Some(n) if n == f64::INFINITY => format!("Infinity {code}"),
                Some(n) if n == f64::NEG_INFINITY => format!("- Infinity {code}"),
                Some(n) => ctx.locale.format_currency(n, ctx.options),
                None => value.to_plain_string(),
            }
        })
        .with_native_type(NativeType::Text)
}

/// Drop whitespace and grouping separators, map the locale's decimal
/// separator to `.` and spell out `∞`.
fn normalize(text: &str, ctx: &TransformContext<'_>) -> String {
    let grouping = ctx.locale.grouping_separator();
    let decimal = ctx.locale.decimal_separator();
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != grouping)
        .map(|c| if c == decimal { '.' } else { c })
        .collect::<String>()
        .replace('∞', "Infinity")
}

fn parse_infinity(normalized: &str) -> Option<f64> {
    match normalized {
        s if s.starts_with("Infinity") || s.starts_with("+Infinity") => Some(f64::INFINITY),
        s if s.starts_with("-Infinity") => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

fn correct_sign(n: f64, ctx: &TransformContext<'_>) -> f64 {
    let model = ctx.model;
    if n < 0.0 && model.minimum.is_some_and(|min| min >= 0.0) {
        -n
    } else if n > 0.0 && model.maximum.is_some_and(|max| max <= 0.0) {
        -n
    } else {
        n
    }
}
