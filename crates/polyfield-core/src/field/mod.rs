//! Event dispatch: one field instance and its handlers.
//!
//! Every handler works on a copy of the current configuration, re-runs the
//! reconciler on it, notifies the caller and finally persists whatever the
//! component owns. Caller-owned values are rolled back to the last supplied
//! snapshot, so an internal update never overrides them.

mod callbacks;
mod events;

#[cfg(test)]
mod tests;

pub use callbacks::{
    Callbacks, ConfigurationCallback, EventCallback, StateCallback, ToggleCallback, ValueCallback,
};
pub use events::{FieldEvent, KEY_CODE_ENTER, KeyInfo, Propagation, ValueInput};

use serde::Serialize;

use crate::configuration::Configuration;
use crate::cursor::{SelectionSurface, SurfaceKind, SurfaceSet, active_surface_kind};
use crate::error::SurfaceError;
use crate::properties::FieldProperties;
use crate::reconcile::{Ownership, Reconciler, RetainedState};
use crate::render::{self, RenderPlan};
use crate::transform::FieldType;
use crate::types::{Cursor, ModelState};
use crate::value::Value;

/// State a caller can observe without owning it. Parts the caller supplies
/// itself are left out.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalState {
    pub model_state: ModelState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_declaration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Outbound view of a field.
pub struct Adapter<'a> {
    pub configuration: &'a Configuration,
    pub state: ExternalState,
    pub surfaces: &'a SurfaceSet,
}

fn fire(callback: Option<&EventCallback>, event: &FieldEvent, config: &Configuration) {
    if let Some(callback) = callback {
        callback(event, config);
    }
}

/// A form field: caller properties, retained state and mounted surfaces.
pub struct InputField {
    given: FieldProperties,
    reconciler: Reconciler,
    retained: RetainedState,
    configuration: Configuration,
    ownership: Ownership,
    surfaces: SurfaceSet,
}

impl InputField {
    pub fn new(given: FieldProperties) -> Self {
        Self::with_reconciler(given, Reconciler::default())
    }

    pub fn with_reconciler(given: FieldProperties, reconciler: Reconciler) -> Self {
        let mut retained = RetainedState::initial(&given, &reconciler);
        let consolidation = reconciler.consolidate(&given, &retained);
        retained.absorb(&consolidation);
        Self {
            given,
            reconciler,
            retained,
            configuration: consolidation.configuration,
            ownership: consolidation.ownership,
            surfaces: SurfaceSet::new(),
        }
    }

    /// Replace the caller's properties and reconcile.
    pub fn set_properties(&mut self, given: FieldProperties) {
        self.given = given;
        self.rebuild();
    }

    pub fn properties(&self) -> &FieldProperties {
        &self.given
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn retained(&self) -> &RetainedState {
        &self.retained
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn selection_is_unstable(&self) -> bool {
        self.retained.editor.selection_is_unstable
    }

    pub fn surfaces(&self) -> &SurfaceSet {
        &self.surfaces
    }

    pub fn adapter(&self) -> Adapter<'_> {
        let config = &self.configuration;
        let given = &self.given;
        Adapter {
            configuration: config,
            state: ExternalState {
                model_state: config.model.state,
                cursor: given.cursor.is_none().then_some(config.cursor),
                editor_is_active: given
                    .editor_is_active
                    .is_none()
                    .then_some(config.editor_is_active),
                hidden: given.hidden.is_none().then_some(config.hidden),
                show_declaration: given
                    .show_declaration
                    .is_none()
                    .then_some(config.show_declaration),
                representation: (!self.ownership.representation_controlled())
                    .then(|| config.representation.clone()),
                value: (!self.ownership.value_controlled()).then(|| config.model.value.clone()),
            },
            surfaces: &self.surfaces,
        }
    }

    pub fn render_plan(&self) -> RenderPlan {
        render::plan(&self.configuration, &self.reconciler.registry)
    }

    // === Surfaces ===

    /// Mount a surface. The selection is re-applied on the next render.
    pub fn attach_surface(
        &mut self,
        surface: Box<dyn SelectionSurface>,
    ) -> Option<Box<dyn SelectionSurface>> {
        tracing::debug!(target: "polyfield::field", kind = ?surface.kind(), "surface attached");
        self.retained.editor.selection_is_unstable = true;
        self.surfaces.attach(surface)
    }

    pub fn detach_surface(&mut self, kind: SurfaceKind) -> Option<Box<dyn SelectionSurface>> {
        self.surfaces.detach(kind)
    }

    /// Write a pending selection back to the active surface. Call after
    /// every render.
    pub fn after_render(&mut self) {
        if !self.retained.editor.selection_is_unstable {
            return;
        }
        let Some(kind) = active_surface_kind(&self.configuration) else {
            self.retained.editor.selection_is_unstable = false;
            return;
        };
        let config = &self.configuration;
        match self.surfaces.write(kind, config.cursor, &config.representation) {
            Ok(()) => self.retained.editor.selection_is_unstable = false,
            Err(err @ (SurfaceError::NotReady(_) | SurfaceError::Missing(_))) => {
                tracing::debug!(target: "polyfield::cursor", %err, "selection write deferred");
            }
            Err(err) => {
                tracing::warn!(target: "polyfield::cursor", %err, "selection write failed");
            }
        }
    }

    /// A heavy editor finished loading.
    pub fn on_surface_ready(&mut self, kind: SurfaceKind) {
        if active_surface_kind(&self.configuration) == Some(kind) {
            self.after_render();
        }
    }

    // === Handlers ===

    pub fn handle_blur(&mut self) {
        let event = FieldEvent::Blur;
        let mut working = self.configuration.clone();
        let before = working.model.state;
        let mut changed = false;

        if working.model.state.focused {
            working.model.state.focused = false;
            changed = true;
        }
        if !working.model.state.visited {
            working.model.state.visited = true;
            changed = true;
        }

        let pipeline = self
            .reconciler
            .registry
            .pipeline(working.field_type(), working.transformer.as_ref());
        let value = pipeline.commit(&working.model.value, &working.model);
        let representation = pipeline.format(&value, &working.model, true);

        let value_changed = value != working.model.value;
        if value_changed || representation != working.representation {
            changed = true;
        }
        working.model.value = value;
        working.representation = representation;

        if changed {
            self.notify_change(&mut working, &event);
        }
        if value_changed {
            if let Some(callback) = &working.callbacks.change_value {
                callback(&working.model.value, &event, &working);
            }
        }
        if working.model.state != before {
            self.notify_state(&working, &event);
        }
        fire(working.callbacks.blur.as_ref(), &event, &working);

        self.persist(working);
    }

    pub fn handle_focus(&mut self) {
        let event = FieldEvent::Focus;
        fire(self.configuration.callbacks.focus.as_ref(), &event, &self.configuration);
        self.touch(event);
    }

    pub fn handle_click(&mut self) {
        let event = FieldEvent::Click;
        self.capture_selection(&event, None);
        fire(self.configuration.callbacks.click.as_ref(), &event, &self.configuration);
        self.touch(event);
    }

    /// Enter inside a multi-line string editor must not reach the form.
    pub fn handle_key_down(&mut self, key: KeyInfo) -> Propagation {
        let config = &self.configuration;
        let multiline_editor =
            config.field_type() == FieldType::String && !config.editor.is_plain();
        let propagation = if key.is_enter() && multiline_editor {
            Propagation::Stop
        } else {
            Propagation::Continue
        };
        fire(config.callbacks.key_down.as_ref(), &FieldEvent::KeyDown(key), config);
        propagation
    }

    /// Key events without a key code come from password fillers and the
    /// like; they are ignored.
    pub fn handle_key_up(&mut self, key: KeyInfo) {
        if key.key_code == 0 {
            return;
        }
        let event = FieldEvent::KeyUp(key);
        if let FieldEvent::KeyUp(key) = &event {
            self.capture_selection(&event, Some(key.key.as_str()));
        }
        fire(self.configuration.callbacks.key_up.as_ref(), &event, &self.configuration);
    }

    /// The active editor reported a selection change.
    pub fn handle_selection_change(&mut self) {
        self.capture_selection(&FieldEvent::SelectionChange, None);
    }

    pub fn handle_change_value(&mut self, input: impl Into<ValueInput>) {
        self.change_value(input.into().into_value(), FieldEvent::Input);
    }

    pub fn toggle_editor(&mut self) {
        let event = FieldEvent::EditorToggle;
        let mut working = self.configuration.clone();
        working.editor_is_active = !working.editor_is_active;

        self.notify_change(&mut working, &event);
        if let Some(callback) = &working.callbacks.change_editor_is_active {
            callback(working.editor_is_active, &event, &working);
        }

        self.retained.editor.selection_is_unstable = true;
        self.persist(working);
    }

    pub fn toggle_declaration(&mut self) {
        let event = FieldEvent::DeclarationToggle;
        let mut working = self.configuration.clone();
        working.show_declaration = !working.show_declaration;

        self.notify_change(&mut working, &event);
        if let Some(callback) = &working.callbacks.change_show_declaration {
            callback(working.show_declaration, &event, &working);
        }

        self.persist(working);
    }

    /// Password preset: show or hide the content.
    pub fn toggle_hidden(&mut self) {
        let event = FieldEvent::PasswordToggle;
        let mut working = self.configuration.clone();
        working.hidden = !working.hidden;
        self.notify_change(&mut working, &event);
        self.persist(working);
    }

    /// Clear preset: reset to the committed default.
    pub fn clear(&mut self) {
        let config = &self.configuration;
        let default = self
            .reconciler
            .registry
            .pipeline(config.field_type(), config.transformer.as_ref())
            .commit(&config.model.default, &config.model);
        self.change_value(default, FieldEvent::Clear);
    }

    // === Internals ===

    fn rebuild(&mut self) {
        let consolidation = self.reconciler.consolidate(&self.given, &self.retained);
        self.retained.absorb(&consolidation);
        self.ownership = consolidation.ownership;
        self.configuration = consolidation.configuration;
    }

    /// Re-derive the working configuration and hand it to `change`.
    fn notify_change(&self, working: &mut Configuration, event: &FieldEvent) {
        let (refreshed, _) = self.reconciler.refresh(working);
        *working = refreshed;
        if let Some(callback) = &working.callbacks.change {
            callback(working, event);
        }
    }

    fn notify_state(&self, working: &Configuration, event: &FieldEvent) {
        if let Some(callback) = &working.callbacks.change_state {
            callback(&working.model.state, event, working);
        }
    }

    /// Store what the component owns, then reconcile again.
    fn persist(&mut self, working: Configuration) {
        let caller_owns_state = self
            .given
            .model
            .as_ref()
            .is_some_and(|model| model.state.is_some());
        let value_state = &mut self.retained.value_state;
        if !self.ownership.value_controlled() {
            value_state.value = working.model.value;
            value_state.representation = working.representation;
        }
        if !caller_owns_state {
            value_state.model_state = working.model.state;
        }
        self.retained.cursor = working.cursor;
        self.retained.editor.editor_is_active = working.editor_is_active;
        self.retained.hidden = Some(working.hidden);
        self.retained.show_declaration = working.show_declaration;
        self.rebuild();
    }

    fn touch(&mut self, event: FieldEvent) {
        let mut working = self.configuration.clone();
        let before = working.model.state;

        if !working.model.state.focused {
            working.model.state.focused = true;
        }
        if working.model.state.untouched {
            working.model.state.mark_touched();
        }

        if working.model.state != before {
            self.notify_change(&mut working, &event);
            self.notify_state(&working, &event);
        }
        fire(working.callbacks.touch.as_ref(), &event, &working);

        self.persist(working);
    }

    fn capture_selection(&mut self, event: &FieldEvent, key: Option<&str>) {
        let kind = active_surface_kind(&self.configuration);
        let representation = &self.configuration.representation;
        let cursor = kind.and_then(|kind| self.surfaces.read(kind, representation, key));
        if let Some(cursor) = cursor {
            tracing::trace!(
                target: "polyfield::field",
                start = cursor.start,
                end = cursor.end,
                "selection captured"
            );
            self.retained.cursor = cursor;
            self.rebuild();
        }
        fire(
            self.configuration.callbacks.selection_change.as_ref(),
            event,
            &self.configuration,
        );
    }

    fn change_value(&mut self, raw: Value, event: FieldEvent) {
        if self.configuration.disabled {
            tracing::debug!(target: "polyfield::field", "ignoring value change on disabled field");
            return;
        }
        let mut working = self.configuration.clone();

        let (representation, value) = {
            let pipeline = self
                .reconciler
                .registry
                .pipeline(working.field_type(), working.transformer.as_ref());
            let representation = match &raw {
                Value::Text(text) => text.clone(),
                other => pipeline.format(other, &working.model, true),
            };
            (representation, pipeline.parse(&raw, &working.model))
        };

        if !self.ownership.representation_controlled() && representation == working.representation {
            return;
        }
        working.representation = representation;

        if !self.ownership.value_controlled() && value == working.model.value {
            // Same value, new spelling: nothing to report.
            self.persist(working);
            return;
        }
        working.model.value = value;

        let before = working.model.state;
        if working.model.state.pristine {
            working.model.state.mark_dirty();
        }

        self.notify_change(&mut working, &event);
        if let Some(callback) = &working.callbacks.change_value {
            callback(&working.model.value, &event, &working);
        }
        if working.model.state != before {
            self.notify_state(&working, &event);
        }

        tracing::trace!(
            target: "polyfield::field",
            representation = %working.representation,
            "value changed"
        );
        self.persist(working);
    }
}

impl std::fmt::Debug for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputField")
            .field("configuration", &self.configuration)
            .field("ownership", &self.ownership)
            .field("retained", &self.retained)
            .field("surfaces", &self.surfaces)
            .finish()
    }
}
