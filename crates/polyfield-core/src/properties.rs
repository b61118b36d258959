//! Caller-facing property layers.
//!
//! Every field is optional: `None` means "not specified", which lets the
//! reconciler tell caller-owned settings from ones it should fill from
//! retained state or defaults. JSON `null` reads as unspecified too, except
//! for `value`: a caller clearing its value supplies null.
//!
//! Three layers are merged per pass: caller properties over the model
//! defaults over [`FieldProperties::static_defaults`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FieldError;
use crate::field::Callbacks;
use crate::pattern::Pattern;
use crate::selection::{Labels, SelectionSpec};
use crate::transform::{FieldType, Transformer};
use crate::types::{Align, CursorProperties, EditorKind, IconDescriptor, ModelState};
use crate::value::Value;

/// A present key is supplied, even when it is `null`.
fn supplied<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

fn pick<T: Clone>(over: &Option<T>, base: &Option<T>) -> Option<T> {
    over.clone().or_else(|| base.clone())
}

/// Declarative model block: type, constraints and canonical value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelProperties {
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    #[serde(deserialize_with = "supplied")]
    pub value: Option<Value>,
    pub default: Option<Value>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum_length: Option<i64>,
    pub maximum_length: Option<i64>,
    #[serde(alias = "regularExpressionPattern")]
    pub pattern: Option<Pattern>,
    #[serde(alias = "invertedRegularExpressionPattern")]
    pub inverted_pattern: Option<Pattern>,
    pub required: Option<bool>,
    pub state: Option<ModelState>,
}

impl ModelProperties {
    pub fn merged_over(&self, base: &ModelProperties) -> ModelProperties {
        ModelProperties {
            field_type: pick(&self.field_type, &base.field_type),
            value: pick(&self.value, &base.value),
            default: pick(&self.default, &base.default),
            minimum: pick(&self.minimum, &base.minimum),
            maximum: pick(&self.maximum, &base.maximum),
            minimum_length: pick(&self.minimum_length, &base.minimum_length),
            maximum_length: pick(&self.maximum_length, &base.maximum_length),
            pattern: pick(&self.pattern, &base.pattern),
            inverted_pattern: pick(&self.inverted_pattern, &base.inverted_pattern),
            required: pick(&self.required, &base.required),
            state: pick(&self.state, &base.state),
        }
    }
}

/// Message templates shown for each violated constraint.
///
/// Templates may reference other properties as `${name}` and format model
/// values with `${formatValue(name)}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub required_text: Option<String>,
    pub minimum_text: Option<String>,
    pub maximum_text: Option<String>,
    pub minimum_length_text: Option<String>,
    pub maximum_length_text: Option<String>,
    pub pattern_text: Option<String>,
    pub inverted_pattern_text: Option<String>,
}

impl Messages {
    pub fn merged_over(&self, base: &Messages) -> Messages {
        Messages {
            required_text: pick(&self.required_text, &base.required_text),
            minimum_text: pick(&self.minimum_text, &base.minimum_text),
            maximum_text: pick(&self.maximum_text, &base.maximum_text),
            minimum_length_text: pick(&self.minimum_length_text, &base.minimum_length_text),
            maximum_length_text: pick(&self.maximum_length_text, &base.maximum_length_text),
            pattern_text: pick(&self.pattern_text, &base.pattern_text),
            inverted_pattern_text: pick(&self.inverted_pattern_text, &base.inverted_pattern_text),
        }
    }
}

/// Everything a caller may hand to a field.
///
/// Top-level model shorthands (`value`, `type`, `minimum`, ...) take
/// precedence over the same settings inside `model`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldProperties {
    pub model: Option<ModelProperties>,

    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    #[serde(deserialize_with = "supplied")]
    pub value: Option<Value>,
    pub default: Option<Value>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum_length: Option<i64>,
    pub maximum_length: Option<i64>,
    #[serde(alias = "regularExpressionPattern")]
    pub pattern: Option<Pattern>,
    #[serde(alias = "invertedRegularExpressionPattern")]
    pub inverted_pattern: Option<Pattern>,
    pub required: Option<bool>,

    pub representation: Option<String>,
    pub cursor: Option<CursorProperties>,
    pub editor_is_active: Option<bool>,
    pub show_declaration: Option<bool>,
    pub hidden: Option<bool>,

    pub name: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub declaration: Option<String>,
    pub disabled: Option<bool>,
    pub outlined: Option<bool>,
    pub full_width: Option<bool>,
    pub rows: Option<u32>,
    pub align: Option<Align>,
    pub step: Option<f64>,
    pub editor: Option<EditorKind>,
    pub selectable_editor: Option<bool>,
    pub selection: Option<SelectionSpec>,
    pub labels: Option<Labels>,
    pub icon: Option<IconDescriptor>,
    pub trailing_icon: Option<IconDescriptor>,
    pub tooltip: Option<String>,
    pub show_initial_validation_state: Option<bool>,
    pub enforce_uncontrolled: Option<bool>,

    #[serde(flatten)]
    pub messages: Messages,

    /// Per-field override of the type's transformer. Code only.
    #[serde(skip)]
    pub transformer: Option<Transformer>,
    /// Event callbacks. Code only.
    #[serde(skip)]
    pub callbacks: Callbacks,
}

impl FieldProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, FieldError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The bottom layer of every merge.
    pub fn static_defaults() -> Self {
        FieldProperties {
            model: Some(ModelProperties {
                field_type: Some(FieldType::String),
                required: Some(false),
                ..ModelProperties::default()
            }),
            disabled: Some(false),
            outlined: Some(false),
            full_width: Some(true),
            rows: Some(4),
            align: Some(Align::Start),
            editor: Some(EditorKind::Plain),
            selectable_editor: Some(false),
            show_initial_validation_state: Some(false),
            enforce_uncontrolled: Some(false),
            messages: Messages {
                required_text: Some("Please fill this field.".to_string()),
                minimum_text: Some(
                    "Please provide something greater or equal than ${formatValue(minimum)}."
                        .to_string(),
                ),
                maximum_text: Some(
                    "Please provide something less or equal than ${formatValue(maximum)}."
                        .to_string(),
                ),
                minimum_length_text: Some(
                    "Please type at least or equal ${minimumLength} symbols.".to_string(),
                ),
                maximum_length_text: Some(
                    "Please type less or equal than ${maximumLength} symbols.".to_string(),
                ),
                pattern_text: Some(
                    "Your string has to match the regular expression: \"${pattern}\".".to_string(),
                ),
                inverted_pattern_text: Some(
                    "Your string must not match the regular expression: \"${invertedPattern}\"."
                        .to_string(),
                ),
            },
            ..FieldProperties::default()
        }
    }

    /// Model block with the top-level shorthands applied on top.
    pub fn effective_model(&self) -> ModelProperties {
        let shorthand = ModelProperties {
            field_type: self.field_type,
            value: self.value.clone(),
            default: self.default.clone(),
            minimum: self.minimum,
            maximum: self.maximum,
            minimum_length: self.minimum_length,
            maximum_length: self.maximum_length,
            pattern: self.pattern.clone(),
            inverted_pattern: self.inverted_pattern.clone(),
            required: self.required,
            state: None,
        };
        match &self.model {
            Some(model) => shorthand.merged_over(model),
            None => shorthand,
        }
    }

    /// The value the caller supplies, from `value` or `model.value`.
    pub fn supplied_value(&self) -> Option<&Value> {
        self.value
            .as_ref()
            .or_else(|| self.model.as_ref().and_then(|m| m.value.as_ref()))
    }

    /// The default the caller supplies, from `default` or `model.default`.
    pub fn supplied_default(&self) -> Option<&Value> {
        self.default
            .as_ref()
            .or_else(|| self.model.as_ref().and_then(|m| m.default.as_ref()))
    }

    /// Field-by-field merge: whatever `self` specifies wins over `base`.
    ///
    /// Shorthands are folded into the model block first so that a caller's
    /// `value` beats a base `model.value`.
    pub fn merged_over(&self, base: &FieldProperties) -> FieldProperties {
        FieldProperties {
            model: Some(self.effective_model().merged_over(&base.effective_model())),

            field_type: None,
            value: None,
            default: None,
            minimum: None,
            maximum: None,
            minimum_length: None,
            maximum_length: None,
            pattern: None,
            inverted_pattern: None,
            required: None,

            representation: pick(&self.representation, &base.representation),
            cursor: match (&self.cursor, &base.cursor) {
                (Some(over), Some(under)) => Some(CursorProperties {
                    start: over.start.or(under.start),
                    end: over.end.or(under.end),
                }),
                (over, under) => pick(over, under),
            },
            editor_is_active: pick(&self.editor_is_active, &base.editor_is_active),
            show_declaration: pick(&self.show_declaration, &base.show_declaration),
            hidden: pick(&self.hidden, &base.hidden),

            name: pick(&self.name, &base.name),
            description: pick(&self.description, &base.description),
            placeholder: pick(&self.placeholder, &base.placeholder),
            declaration: pick(&self.declaration, &base.declaration),
            disabled: pick(&self.disabled, &base.disabled),
            outlined: pick(&self.outlined, &base.outlined),
            full_width: pick(&self.full_width, &base.full_width),
            rows: pick(&self.rows, &base.rows),
            align: pick(&self.align, &base.align),
            step: pick(&self.step, &base.step),
            editor: pick(&self.editor, &base.editor),
            selectable_editor: pick(&self.selectable_editor, &base.selectable_editor),
            selection: pick(&self.selection, &base.selection),
            labels: pick(&self.labels, &base.labels),
            icon: pick(&self.icon, &base.icon),
            trailing_icon: pick(&self.trailing_icon, &base.trailing_icon),
            tooltip: pick(&self.tooltip, &base.tooltip),
            show_initial_validation_state: pick(
                &self.show_initial_validation_state,
                &base.show_initial_validation_state,
            ),
            enforce_uncontrolled: pick(&self.enforce_uncontrolled, &base.enforce_uncontrolled),

            messages: self.messages.merged_over(&base.messages),
            transformer: pick(&self.transformer, &base.transformer),
            callbacks: self.callbacks.merged_over(&base.callbacks),
        }
    }
}
