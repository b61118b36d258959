//! Error types for field configuration and surface operations.
//!
//! None of these are fatal to reconciliation: malformed input and constraint
//! violations are reported through model state flags instead. These cover the
//! cases where a caller hands us something we cannot interpret at all.

use thiserror::Error;

use crate::cursor::SurfaceKind;

/// Errors raised while building a field configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FieldError {
    /// Type tag outside the registered set.
    #[error("unknown field type: {0}")]
    UnknownType(String),

    /// Editor string that is not one of the known editor variants.
    #[error("unknown editor: {0}")]
    UnknownEditor(String),

    /// Pattern source that does not compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Message template referencing something we cannot resolve.
    #[error("template error: {0}")]
    Template(String),

    /// Properties document could not be deserialized.
    #[error("invalid properties: {0}")]
    Properties(#[from] serde_json::Error),

    /// Selection write-back failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Errors from editing surfaces while reading or writing a selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SurfaceError {
    /// The surface has not finished initializing.
    #[error("{0:?} surface is not ready")]
    NotReady(SurfaceKind),

    /// No surface of this kind is attached.
    #[error("no {0:?} surface attached")]
    Missing(SurfaceKind),

    /// The surface could not place the selection.
    #[error("selection write failed: {0}")]
    Write(String),
}

impl From<&str> for SurfaceError {
    fn from(s: &str) -> Self {
        SurfaceError::Write(s.to_string())
    }
}

impl From<String> for SurfaceError {
    fn from(s: String) -> Self {
        SurfaceError::Write(s)
    }
}
