//! Property/state reconciler.
//!
//! Turns caller properties plus retained component state into one
//! [`Configuration`] per pass:
//!
//! 1. Fill what the caller left unspecified from retained state.
//! 2. Merge over the static defaults (caller > model > static).
//! 3. Resolve the type's transformer, parse the value and validate.
//! 4. Derive the representation if none is known, and clamp the cursor.
//!
//! Ownership of value and representation is decided once per pass. A
//! caller-owned value always wins over anything the component did
//! internally.

use crate::configuration::{Configuration, Model};
use crate::properties::FieldProperties;
use crate::selection::{boolean_options, normalize_selection};
use crate::transform::{FieldType, TransformRegistry};
use crate::types::{Cursor, CursorProperties, ModelState};
use crate::validation;
use crate::value::Value;

// === Ownership ===

/// Who owns a piece of field state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Owner {
    Caller,
    #[default]
    Internal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ownership {
    pub value: Owner,
    pub representation: Owner,
}

impl Ownership {
    /// The value is caller-owned when a value comes with a change callback
    /// and uncontrolled mode is not enforced. The representation is
    /// additionally caller-owned when the caller supplies one.
    pub fn determine(given: &FieldProperties) -> Self {
        let controlled = !given.enforce_uncontrolled.unwrap_or(false)
            && given.supplied_value().is_some()
            && given.callbacks.listens_for_changes();
        let representation_controlled = controlled && given.representation.is_some();
        Self {
            value: if controlled { Owner::Caller } else { Owner::Internal },
            representation: if representation_controlled {
                Owner::Caller
            } else {
                Owner::Internal
            },
        }
    }

    pub fn value_controlled(&self) -> bool {
        self.value == Owner::Caller
    }

    pub fn representation_controlled(&self) -> bool {
        self.representation == Owner::Caller
    }
}

// === Retained state ===

/// Value, representation and model state. Updated together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueState {
    pub value: Value,
    pub representation: String,
    pub model_state: ModelState,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorState {
    pub editor_is_active: bool,
    /// Cursor write-back is pending. Cleared only by a successful write.
    pub selection_is_unstable: bool,
}

/// State a field instance keeps between passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RetainedState {
    pub cursor: Cursor,
    pub editor: EditorState,
    /// `None` until the first pass decides it.
    pub hidden: Option<bool>,
    pub show_declaration: bool,
    pub value_state: ValueState,
    /// Last value the caller supplied, parsed. Lets an uncontrolled field
    /// tell a new external value from the one it was created with.
    pub supplied: Option<Value>,
}

impl RetainedState {
    /// Initial state: value from `value`, `model.value`, `default`,
    /// `model.default`, else null. Representation is the supplied one, else
    /// the final format of the initial value.
    pub fn initial(given: &FieldProperties, reconciler: &Reconciler) -> Self {
        let merged = given.merged_over(&reconciler.defaults);
        let mut model = Model::from_properties(&merged.model.unwrap_or_default());
        let pipeline = reconciler
            .registry
            .pipeline(model.field_type, merged.transformer.as_ref());

        let raw = given
            .supplied_value()
            .or_else(|| given.supplied_default())
            .cloned()
            .unwrap_or_default();
        model.value = pipeline.parse(&raw, &model);

        let representation = match &given.representation {
            Some(representation) => representation.clone(),
            None => pipeline.format(&model.value, &model, true),
        };
        let supplied = given.supplied_value().map(|v| pipeline.parse(v, &model));

        Self {
            value_state: ValueState {
                value: model.value,
                representation,
                model_state: ModelState::default(),
            },
            supplied,
            ..Self::default()
        }
    }

    /// Take over what a pass produced. For caller-owned values this stores
    /// the snapshot that internal updates are rolled back to.
    pub fn absorb(&mut self, consolidation: &Consolidation) {
        let config = &consolidation.configuration;
        self.cursor = config.cursor;
        self.editor.editor_is_active = config.editor_is_active;
        self.hidden = Some(config.hidden);
        self.show_declaration = config.show_declaration;
        if consolidation.selection_is_unstable {
            self.editor.selection_is_unstable = true;
        }
        if consolidation.supplied.is_some() {
            self.supplied = consolidation.supplied.clone();
        }

        if config.model.value != self.value_state.value
            || config.representation != self.value_state.representation
            || config.model.state != self.value_state.model_state
        {
            self.value_state = ValueState {
                value: config.model.value.clone(),
                representation: config.representation.clone(),
                model_state: config.model.state,
            };
        }
    }
}

// === Reconciler ===

/// Output of one pass.
#[derive(Clone, Debug)]
pub struct Consolidation {
    pub configuration: Configuration,
    pub ownership: Ownership,
    /// The representation was regenerated under a focused text surface.
    pub selection_is_unstable: bool,
    /// Parsed value the caller supplied this pass, if any.
    pub supplied: Option<Value>,
}

/// Stateless merge engine. Owns the transform registry and the bottom
/// property layer.
#[derive(Clone, Debug)]
pub struct Reconciler {
    pub registry: TransformRegistry,
    pub defaults: FieldProperties,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(TransformRegistry::default())
    }
}

impl Reconciler {
    pub fn new(registry: TransformRegistry) -> Self {
        Self {
            registry,
            defaults: FieldProperties::static_defaults(),
        }
    }

    /// One full pass over caller properties and retained state.
    pub fn consolidate(&self, given: &FieldProperties, retained: &RetainedState) -> Consolidation {
        let ownership = Ownership::determine(given);
        let mut props = given.clone();

        let cursor = props.cursor.unwrap_or_default();
        props.cursor = Some(CursorProperties {
            start: cursor.start.or(Some(retained.cursor.start)),
            end: cursor.end.or(Some(retained.cursor.end)),
        });
        props.editor_is_active = props.editor_is_active.or(Some(retained.editor.editor_is_active));
        props.hidden = props.hidden.or(retained.hidden);
        props.show_declaration = props.show_declaration.or(Some(retained.show_declaration));
        // A representation the caller does not own only seeds the initial
        // state; afterwards the retained one is current.
        if !ownership.representation_controlled() {
            props.representation = Some(retained.value_state.representation.clone());
        }

        // Parse what the caller supplied against the merged model so sign
        // correction sees the right bounds.
        let merged_model = props.merged_over(&self.defaults).model.unwrap_or_default();
        let model = Model::from_properties(&merged_model);
        let pipeline = self.registry.pipeline(model.field_type, props.transformer.as_ref());
        let supplied = given.supplied_value().map(|v| pipeline.parse(v, &model));

        let model_block = props.model.get_or_insert_with(Default::default);
        if model_block.state.is_none() {
            model_block.state = Some(retained.value_state.model_state);
        }

        let external_change = match &supplied {
            None => false,
            Some(value) if ownership.value_controlled() => *value != retained.value_state.value,
            Some(value) => retained.supplied.as_ref() != Some(value),
        };

        if supplied.is_none() || !(ownership.value_controlled() || external_change) {
            // Keep the internally held value.
            props.value = Some(retained.value_state.value.clone());
        }
        if external_change && !ownership.representation_controlled() {
            tracing::debug!(
                target: "polyfield::reconcile",
                "external value changed, regenerating representation"
            );
            props.representation = given.representation.clone();
        }

        let merged = props.merged_over(&self.defaults);
        let (configuration, selection_is_unstable) = self.finish(merged);

        tracing::trace!(
            target: "polyfield::reconcile",
            controlled = ownership.value_controlled(),
            representation = %configuration.representation,
            "consolidated"
        );

        Consolidation {
            configuration,
            ownership,
            selection_is_unstable,
            supplied,
        }
    }

    /// Re-run parse, validation and derivation on a working configuration
    /// that an event handler has modified.
    pub fn refresh(&self, working: &Configuration) -> (Configuration, bool) {
        let merged = working.to_properties().merged_over(&self.defaults);
        self.finish(merged)
    }

    fn finish(&self, merged: FieldProperties) -> (Configuration, bool) {
        let mut model = Model::from_properties(&merged.model.clone().unwrap_or_default());
        let pipeline = self
            .registry
            .pipeline(model.field_type, merged.transformer.as_ref());

        model.value = pipeline.parse(&model.value, &model);
        validation::validate(&mut model);

        let options = normalize_selection(merged.selection.as_ref(), merged.labels.as_ref());
        let selection = match options {
            None if model.field_type == FieldType::Boolean => Some(boolean_options()),
            other => other,
        };

        let editor = merged.editor.clone().unwrap_or_default();
        let selectable_editor = merged.selectable_editor.unwrap_or(false);
        // Without a plain alternative the editor is the only surface.
        let editor_is_active =
            merged.editor_is_active.unwrap_or(false) || !(selectable_editor || editor.is_plain());

        let hidden = merged.hidden.unwrap_or_else(|| {
            merged
                .name
                .as_deref()
                .is_some_and(|name| name.starts_with("password"))
        });

        let mut selection_is_unstable = false;
        let representation = match merged.representation.clone() {
            Some(representation) => representation,
            None => {
                let focused = model.state.focused;
                let representation = pipeline.format(&model.value, &model, !focused);
                if focused
                    && representation != model.value.to_plain_string()
                    && pipeline.surface_type(hidden).is_textual()
                {
                    selection_is_unstable = true;
                }
                representation
            }
        };

        let cursor = merged.cursor.unwrap_or_default();
        let cursor = Cursor::new(cursor.start.unwrap_or(0), cursor.end.unwrap_or(0))
            .clamped(representation.chars().count());

        let configuration = Configuration {
            model,
            representation,
            cursor,
            editor_is_active,
            show_declaration: merged.show_declaration.unwrap_or(false),
            hidden,
            name: merged.name,
            description: merged.description,
            placeholder: merged.placeholder,
            declaration: merged.declaration,
            disabled: merged.disabled.unwrap_or(false),
            outlined: merged.outlined.unwrap_or(false),
            full_width: merged.full_width.unwrap_or(true),
            rows: merged.rows.unwrap_or(4),
            align: merged.align.unwrap_or_default(),
            step: merged.step,
            editor,
            selectable_editor,
            selection,
            icon: merged.icon,
            trailing_icon: merged.trailing_icon,
            tooltip: merged.tooltip,
            show_initial_validation_state: merged.show_initial_validation_state.unwrap_or(false),
            enforce_uncontrolled: merged.enforce_uncontrolled.unwrap_or(false),
            messages: merged.messages,
            transformer: merged.transformer,
            callbacks: merged.callbacks,
        };
        (configuration, selection_is_unstable)
    }
}
