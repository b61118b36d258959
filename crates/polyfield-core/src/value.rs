//! Field values and the plain string conversions the transform pipeline
//! builds on.
//!
//! Values are loosely typed on purpose: a parser may hand back `NaN` or the
//! original text when input is malformed, and validation decides what that
//! means. Number scanning mirrors what browsers do for `parseInt` and
//! `parseFloat`, i.e. it reads the longest numeric prefix and ignores the rest.

use serde::{Deserialize, Serialize};

/// A typed field value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PartialEq for Value {
    /// Structural equality where `NaN` equals `NaN`, so a field stuck on a
    /// malformed number does not look changed on every pass.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or empty text. Used by the required check.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Plain string cast, the way a browser would stringify the value.
    ///
    /// Null becomes the empty string.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Stringify a number without a trailing `.0` for integral values.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        // Covers negative zero as well.
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Read a leading, optionally signed integer. Returns `NaN` when there is none.
///
/// `"12abc"` reads as 12, `"1.9"` as 1, `"abc"` as `NaN`.
pub fn parse_int_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let (negative, rest) = split_sign(s);
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return f64::NAN;
    }
    let magnitude: f64 = digits.parse().unwrap_or(f64::NAN);
    if negative { -magnitude } else { magnitude }
}

/// Read a leading, optionally signed decimal number including an exponent.
/// Returns `NaN` when there is none.
///
/// `"Infinity"` reads as infinity, `"3.5kg"` as 3.5, `".5"` as 0.5.
pub fn parse_float_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let (negative, rest) = split_sign(s);
    let sign = if negative { -1.0 } else { 1.0 };

    if rest.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = rest.as_bytes();
    let mut end = 0;
    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut probe = end + 1;
        while probe < bytes.len() && bytes[probe].is_ascii_digit() {
            probe += 1;
            mantissa_digits += 1;
        }
        end = probe;
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut probe = end + 1;
        if probe < bytes.len() && (bytes[probe] == b'+' || bytes[probe] == b'-') {
            probe += 1;
        }
        let exponent_start = probe;
        while probe < bytes.len() && bytes[probe].is_ascii_digit() {
            probe += 1;
        }
        if probe > exponent_start {
            end = probe;
        }
    }

    // A lone trailing dot ("5.") is a valid prefix for `f64::from_str`.
    let magnitude: f64 = rest[..end].parse().unwrap_or(f64::NAN);
    sign * magnitude
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    }
}
