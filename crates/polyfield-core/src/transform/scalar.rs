//! String and boolean transformers.

use super::{NativeType, Transformer};
use crate::value::Value;

/// Identity on text. Other values are cast to their plain string.
pub(super) fn string() -> Transformer {
    Transformer::new()
        .with_parse(|raw, _| match raw {
            Value::Null | Value::Text(_) => raw.clone(),
            other => Value::Text(other.to_plain_string()),
        })
        .with_native_type(NativeType::Text)
}

/// `"true"` and `"false"` become booleans. Anything else is kept as given.
pub(super) fn boolean() -> Transformer {
    Transformer::new()
        .with_parse(|raw, _| match raw.as_text().map(str::trim) {
            Some("true") => Value::Bool(true),
            Some("false") => Value::Bool(false),
            _ => raw.clone(),
        })
        .with_native_type(NativeType::Text)
}
