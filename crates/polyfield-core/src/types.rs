//! Core field types: cursor, model state, editor kinds, and icons.
//!
//! These types are framework-agnostic and shared by the reconciler, the
//! cursor tracker and the browser layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::FieldError;

/// Absolute selection in the representation, in characters (NOT bytes).
///
/// `start <= end` is maintained by every constructor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub start: usize,
    pub end: usize,
}

impl Cursor {
    /// Create a cursor, ordering the bounds.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Caret with no selected range.
    pub fn collapsed(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both bounds to `0..=len`.
    pub fn clamped(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// Move both bounds by `delta`, saturating at zero.
    pub fn shifted(self, delta: isize) -> Self {
        let shift = |offset: usize| offset.saturating_add_signed(delta);
        Self::new(shift(self.start), shift(self.end))
    }
}

/// Cursor as supplied by the caller. Each bound may be left to retained
/// state independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorProperties {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl From<Cursor> for CursorProperties {
    fn from(cursor: Cursor) -> Self {
        Self {
            start: Some(cursor.start),
            end: Some(cursor.end),
        }
    }
}

/// Interaction and validity flags of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelState {
    pub pristine: bool,
    pub dirty: bool,
    pub touched: bool,
    pub untouched: bool,
    pub focused: bool,
    pub visited: bool,
    pub valid: bool,
    pub invalid: bool,
    pub invalid_required: bool,
    pub invalid_minimum: bool,
    pub invalid_maximum: bool,
    pub invalid_minimum_length: bool,
    pub invalid_maximum_length: bool,
    pub invalid_pattern: bool,
    pub invalid_inverted_pattern: bool,
}

impl Default for ModelState {
    fn default() -> Self {
        Self {
            pristine: true,
            dirty: false,
            touched: false,
            untouched: true,
            focused: false,
            visited: false,
            valid: true,
            invalid: false,
            invalid_required: false,
            invalid_minimum: false,
            invalid_maximum: false,
            invalid_minimum_length: false,
            invalid_maximum_length: false,
            invalid_pattern: false,
            invalid_inverted_pattern: false,
        }
    }
}

impl ModelState {
    /// pristine -> dirty. One way.
    pub fn mark_dirty(&mut self) {
        self.pristine = false;
        self.dirty = true;
    }

    /// untouched -> touched. One way.
    pub fn mark_touched(&mut self) {
        self.touched = true;
        self.untouched = false;
    }
}

/// Rich-text editor flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RichTextMode {
    Raw,
    Simple,
    Normal,
}

impl RichTextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RichTextMode::Raw => "raw",
            RichTextMode::Simple => "simple",
            RichTextMode::Normal => "normal",
        }
    }
}

/// Which editing surface backs a string field.
///
/// Parsed from `plain`, `code`, `code(<mode>)`, `richtext(raw)`,
/// `richtext(simple)` and `richtext(normal)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EditorKind {
    #[default]
    Plain,
    /// Code editor with an optional syntax mode.
    Code(Option<SmolStr>),
    RichText(RichTextMode),
}

impl EditorKind {
    pub const DEFAULT_CODE_MODE: &'static str = "javascript";

    pub fn is_plain(&self) -> bool {
        matches!(self, EditorKind::Plain)
    }

    /// Syntax mode for code editors, `javascript` when unspecified.
    pub fn code_mode(&self) -> Option<&str> {
        match self {
            EditorKind::Code(mode) => Some(mode.as_deref().unwrap_or(Self::DEFAULT_CODE_MODE)),
            _ => None,
        }
    }
}

impl FromStr for EditorKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "plain" => return Ok(EditorKind::Plain),
            "code" => return Ok(EditorKind::Code(None)),
            "richtext(raw)" => return Ok(EditorKind::RichText(RichTextMode::Raw)),
            "richtext(simple)" => return Ok(EditorKind::RichText(RichTextMode::Simple)),
            "richtext(normal)" => return Ok(EditorKind::RichText(RichTextMode::Normal)),
            _ => {}
        }
        if let Some(mode) = s.strip_prefix("code(").and_then(|rest| rest.strip_suffix(')')) {
            let mode = mode.trim();
            if !mode.is_empty() {
                return Ok(EditorKind::Code(Some(SmolStr::new(mode))));
            }
        }
        Err(FieldError::UnknownEditor(s.to_string()))
    }
}

impl TryFrom<String> for EditorKind {
    type Error = FieldError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorKind::Plain => f.write_str("plain"),
            EditorKind::Code(None) => f.write_str("code"),
            EditorKind::Code(Some(mode)) => write!(f, "code({mode})"),
            EditorKind::RichText(mode) => write!(f, "richtext({})", mode.as_str()),
        }
    }
}

impl From<EditorKind> for String {
    fn from(kind: EditorKind) -> Self {
        kind.to_string()
    }
}

/// Horizontal text alignment in the text field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    End,
}

/// Leading or trailing icon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconDescriptor {
    /// `"clear_preset"` or `"password_preset"`, or a plain icon name.
    Named(SmolStr),
    /// Icon with its own tooltip.
    Icon {
        icon: SmolStr,
        #[serde(default)]
        tooltip: Option<String>,
    },
}

impl IconDescriptor {
    pub const CLEAR_PRESET: &'static str = "clear_preset";
    pub const PASSWORD_PRESET: &'static str = "password_preset";

    pub fn is_clear_preset(&self) -> bool {
        matches!(self, IconDescriptor::Named(n) if n == Self::CLEAR_PRESET)
    }

    pub fn is_password_preset(&self) -> bool {
        matches!(self, IconDescriptor::Named(n) if n == Self::PASSWORD_PRESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_orders_and_clamps() {
        let c = Cursor::new(5, 2);
        assert_eq!(c, Cursor { start: 2, end: 5 });
        assert_eq!(c.clamped(3), Cursor { start: 2, end: 3 });
        assert_eq!(Cursor::collapsed(4).shifted(-10), Cursor::collapsed(0));
        assert_eq!(Cursor::new(1, 2).shifted(1), Cursor::new(2, 3));
    }

    #[test]
    fn test_model_state_defaults() {
        let state = ModelState::default();
        assert!(state.pristine && state.untouched && state.valid);
        assert!(!state.dirty && !state.touched && !state.invalid);
    }

    #[test]
    fn test_model_state_camel_case() {
        let state: ModelState =
            serde_json::from_str(r#"{"focused": true, "invalidMinimumLength": true}"#).unwrap();
        assert!(state.focused);
        assert!(state.invalid_minimum_length);
        // Unspecified flags keep their defaults.
        assert!(state.pristine);
    }

    #[test]
    fn test_editor_kind_parse() {
        assert_eq!("plain".parse::<EditorKind>().unwrap(), EditorKind::Plain);
        assert_eq!("code".parse::<EditorKind>().unwrap(), EditorKind::Code(None));
        assert_eq!(
            "code(python)".parse::<EditorKind>().unwrap(),
            EditorKind::Code(Some("python".into()))
        );
        assert_eq!(
            "richtext(simple)".parse::<EditorKind>().unwrap(),
            EditorKind::RichText(RichTextMode::Simple)
        );
        assert!(matches!(
            "markdown".parse::<EditorKind>(),
            Err(FieldError::UnknownEditor(_))
        ));
        assert!("code()".parse::<EditorKind>().is_err());
    }

    #[test]
    fn test_editor_kind_display_round_trip() {
        for source in ["plain", "code", "code(sql)", "richtext(raw)", "richtext(normal)"] {
            let kind: EditorKind = source.parse().unwrap();
            assert_eq!(kind.to_string(), source);
        }
    }

    #[test]
    fn test_code_mode_default() {
        assert_eq!(EditorKind::Code(None).code_mode(), Some("javascript"));
        assert_eq!(EditorKind::Plain.code_mode(), None);
    }

    #[test]
    fn test_icon_presets() {
        let icon: IconDescriptor = serde_json::from_str(r#""clear_preset""#).unwrap();
        assert!(icon.is_clear_preset());
        let icon: IconDescriptor =
            serde_json::from_str(r#"{"icon": "search", "tooltip": "Search"}"#).unwrap();
        assert!(!icon.is_clear_preset() && !icon.is_password_preset());
    }
}
