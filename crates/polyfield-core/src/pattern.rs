//! Compiled validation patterns.
//!
//! Patterns arrive either as source strings (from JSON properties) or as an
//! already-compiled regex handed over in code. Both end up as a [`Pattern`].

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
use regex::Regex;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
use regex_lite::Regex;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A compiled regular expression, compared by source.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, FieldError> {
        Regex::new(source)
            .map(Pattern)
            .map_err(|e| FieldError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// Unanchored search, like `RegExp.prototype.test`.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern(regex)
    }
}

impl TryFrom<String> for Pattern {
    type Error = FieldError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Pattern::new(&source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.as_str().to_string()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
