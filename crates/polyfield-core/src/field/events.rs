//! Normalized UI events.

use smol_str::SmolStr;

use crate::value::Value;

pub const KEY_CODE_ENTER: u32 = 13;

/// Key data carried by key events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInfo {
    /// `KeyboardEvent.key`, e.g. `"a"` or `"Backspace"`.
    pub key: SmolStr,
    /// Legacy key code. Zero for synthetic events such as password fillers.
    pub key_code: u32,
}

impl KeyInfo {
    pub fn new(key: impl Into<SmolStr>, key_code: u32) -> Self {
        Self {
            key: key.into(),
            key_code,
        }
    }

    pub fn is_enter(&self) -> bool {
        self.key_code == KEY_CODE_ENTER || self.key == "Enter"
    }
}

/// What triggered a dispatch. Passed to every callback.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldEvent {
    Focus,
    Blur,
    Click,
    KeyDown(KeyInfo),
    KeyUp(KeyInfo),
    /// Surface reported a new value.
    Input,
    EditorToggle,
    DeclarationToggle,
    PasswordToggle,
    Clear,
    SelectionChange,
}

/// Payload of a value change: an event-like object carrying
/// `target.value`, or a bare value.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueInput {
    Target { value: Option<Value> },
    Bare(Value),
}

impl ValueInput {
    /// A target without a value reads as null.
    pub fn into_value(self) -> Value {
        match self {
            ValueInput::Target { value } => value.unwrap_or(Value::Null),
            ValueInput::Bare(value) => value,
        }
    }
}

impl From<Value> for ValueInput {
    fn from(value: Value) -> Self {
        ValueInput::Bare(value)
    }
}

impl From<&str> for ValueInput {
    fn from(text: &str) -> Self {
        ValueInput::Target {
            value: Some(Value::from(text)),
        }
    }
}

/// Whether a key event may continue to bubble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}
