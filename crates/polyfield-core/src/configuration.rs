//! The consolidated, render-ready configuration of one pass.

use serde::Serialize;

use crate::field::Callbacks;
use crate::pattern::Pattern;
use crate::properties::{FieldProperties, Messages, ModelProperties};
use crate::selection::{SelectOption, SelectionSpec};
use crate::transform::{FieldType, Transformer};
use crate::types::{Align, Cursor, EditorKind, IconDescriptor, ModelState};
use crate::value::Value;

/// Resolved model: type, constraints, parsed value and state.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: Value,
    pub default: Value,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum_length: Option<i64>,
    pub maximum_length: Option<i64>,
    pub pattern: Option<Pattern>,
    pub inverted_pattern: Option<Pattern>,
    pub required: bool,
    pub state: ModelState,
}

impl Model {
    /// Resolve a merged model block. Unset value and default become null,
    /// unset state the default state.
    pub fn from_properties(model: &ModelProperties) -> Self {
        Model {
            field_type: model.field_type.unwrap_or_default(),
            value: model.value.clone().unwrap_or_default(),
            default: model.default.clone().unwrap_or_default(),
            minimum: model.minimum,
            maximum: model.maximum,
            minimum_length: model.minimum_length,
            maximum_length: model.maximum_length,
            pattern: model.pattern.clone(),
            inverted_pattern: model.inverted_pattern.clone(),
            required: model.required.unwrap_or(false),
            state: model.state.unwrap_or_default(),
        }
    }

    pub fn to_properties(&self) -> ModelProperties {
        ModelProperties {
            field_type: Some(self.field_type),
            value: Some(self.value.clone()),
            default: Some(self.default.clone()),
            minimum: self.minimum,
            maximum: self.maximum,
            minimum_length: self.minimum_length,
            maximum_length: self.maximum_length,
            pattern: self.pattern.clone(),
            inverted_pattern: self.inverted_pattern.clone(),
            required: Some(self.required),
            state: Some(self.state),
        }
    }
}

/// Everything one render pass needs, with every layer merged in.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub model: Model,
    pub representation: String,
    pub cursor: Cursor,
    pub editor_is_active: bool,
    pub show_declaration: bool,
    pub hidden: bool,

    pub name: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub declaration: Option<String>,
    pub disabled: bool,
    pub outlined: bool,
    pub full_width: bool,
    pub rows: u32,
    pub align: Align,
    pub step: Option<f64>,
    pub editor: EditorKind,
    pub selectable_editor: bool,
    /// Normalized options with labels applied. `None` means no select.
    pub selection: Option<Vec<SelectOption>>,
    pub icon: Option<IconDescriptor>,
    pub trailing_icon: Option<IconDescriptor>,
    pub tooltip: Option<String>,
    pub show_initial_validation_state: bool,
    pub enforce_uncontrolled: bool,
    pub messages: Messages,

    #[serde(skip)]
    pub transformer: Option<Transformer>,
    #[serde(skip)]
    pub callbacks: Callbacks,
}

impl Configuration {
    pub fn value(&self) -> &Value {
        &self.model.value
    }

    pub fn state(&self) -> &ModelState {
        &self.model.state
    }

    pub fn field_type(&self) -> FieldType {
        self.model.field_type
    }

    /// Invalid state is only surfaced once the field was visited, or when
    /// the caller asked to show it from the start.
    pub fn shows_invalid(&self) -> bool {
        self.model.state.invalid && (self.show_initial_validation_state || self.model.state.visited)
    }

    /// String fields rendered through the code or rich-text editor.
    pub fn is_advanced_editor(&self) -> bool {
        self.selection.is_none()
            && self.model.field_type == FieldType::String
            && self.editor_is_active
            && !self.editor.is_plain()
    }

    /// Label of the field: description, else name.
    pub fn label(&self) -> Option<&str> {
        self.description.as_deref().or(self.name.as_deref())
    }

    /// Feed this configuration back in as caller properties. Every setting
    /// is marked as specified.
    pub fn to_properties(&self) -> FieldProperties {
        FieldProperties {
            model: Some(self.model.to_properties()),
            representation: Some(self.representation.clone()),
            cursor: Some(self.cursor.into()),
            editor_is_active: Some(self.editor_is_active),
            show_declaration: Some(self.show_declaration),
            hidden: Some(self.hidden),
            name: self.name.clone(),
            description: self.description.clone(),
            placeholder: self.placeholder.clone(),
            declaration: self.declaration.clone(),
            disabled: Some(self.disabled),
            outlined: Some(self.outlined),
            full_width: Some(self.full_width),
            rows: Some(self.rows),
            align: Some(self.align),
            step: self.step,
            editor: Some(self.editor.clone()),
            selectable_editor: Some(self.selectable_editor),
            selection: self.selection.clone().map(SelectionSpec::from),
            labels: None,
            icon: self.icon.clone(),
            trailing_icon: self.trailing_icon.clone(),
            tooltip: self.tooltip.clone(),
            show_initial_validation_state: Some(self.show_initial_validation_state),
            enforce_uncontrolled: Some(self.enforce_uncontrolled),
            messages: self.messages.clone(),
            transformer: self.transformer.clone(),
            callbacks: self.callbacks.clone(),
            ..FieldProperties::default()
        }
    }
}
