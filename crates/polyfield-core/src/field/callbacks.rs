//! Caller callbacks.
//!
//! Each callback is optional. `change` receives the full configuration after
//! every reconciled update; the others are fired after it, and the state
//! ones only when their state actually changed.

use std::fmt;
use std::rc::Rc;

use super::events::FieldEvent;
use crate::configuration::Configuration;
use crate::types::ModelState;
use crate::value::Value;

pub type ConfigurationCallback = Rc<dyn Fn(&Configuration, &FieldEvent)>;
pub type ValueCallback = Rc<dyn Fn(&Value, &FieldEvent, &Configuration)>;
pub type StateCallback = Rc<dyn Fn(&ModelState, &FieldEvent, &Configuration)>;
pub type ToggleCallback = Rc<dyn Fn(bool, &FieldEvent, &Configuration)>;
pub type EventCallback = Rc<dyn Fn(&FieldEvent, &Configuration)>;

#[derive(Clone, Default)]
pub struct Callbacks {
    pub change: Option<ConfigurationCallback>,
    pub change_value: Option<ValueCallback>,
    pub change_state: Option<StateCallback>,
    pub change_editor_is_active: Option<ToggleCallback>,
    pub change_show_declaration: Option<ToggleCallback>,
    pub blur: Option<EventCallback>,
    pub focus: Option<EventCallback>,
    pub click: Option<EventCallback>,
    pub key_up: Option<EventCallback>,
    pub key_down: Option<EventCallback>,
    pub touch: Option<EventCallback>,
    pub selection_change: Option<EventCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// A caller listening for value changes can own the value.
    pub fn listens_for_changes(&self) -> bool {
        self.change.is_some() || self.change_value.is_some()
    }

    pub fn on_change(mut self, f: impl Fn(&Configuration, &FieldEvent) + 'static) -> Self {
        self.change = Some(Rc::new(f));
        self
    }

    pub fn on_change_value(
        mut self,
        f: impl Fn(&Value, &FieldEvent, &Configuration) + 'static,
    ) -> Self {
        self.change_value = Some(Rc::new(f));
        self
    }

    pub fn on_change_state(
        mut self,
        f: impl Fn(&ModelState, &FieldEvent, &Configuration) + 'static,
    ) -> Self {
        self.change_state = Some(Rc::new(f));
        self
    }

    pub fn on_change_editor_is_active(
        mut self,
        f: impl Fn(bool, &FieldEvent, &Configuration) + 'static,
    ) -> Self {
        self.change_editor_is_active = Some(Rc::new(f));
        self
    }

    pub fn on_change_show_declaration(
        mut self,
        f: impl Fn(bool, &FieldEvent, &Configuration) + 'static,
    ) -> Self {
        self.change_show_declaration = Some(Rc::new(f));
        self
    }

    pub fn on_blur(mut self, f: impl Fn(&FieldEvent, &Configuration) + 'static) -> Self {
        self.blur = Some(Rc::new(f));
        self
    }

    pub fn on_focus(mut self, f: impl Fn(&FieldEvent, &Configuration) + 'static) -> Self {
        self.focus = Some(Rc::new(f));
        self
    }

    pub fn on_click(mut self, f: impl Fn(&FieldEvent, &Configuration) + 'static) -> Self {
        self.click = Some(Rc::new(f));
        self
    }

    pub fn on_key_up(mut self, f: impl Fn(&FieldEvent, &Configuration) + 'static) -> Self {
        self.key_up = Some(Rc::new(f));
        self
    }

    pub fn on_key_down(mut self, f: impl Fn(&FieldEvent, &Configuration) + 'static) -> Self {
        self.key_down = Some(Rc::new(f));
        self
    }

    pub fn on_touch(mut self, f: impl Fn(&FieldEvent, &Configuration) + 'static) -> Self {
        self.touch = Some(Rc::new(f));
        self
    }

    pub fn on_selection_change(
        mut self,
        f: impl Fn(&FieldEvent, &Configuration) + 'static,
    ) -> Self {
        self.selection_change = Some(Rc::new(f));
        self
    }

    /// Callbacks set on `self` win over those on `base`.
    pub fn merged_over(&self, base: &Callbacks) -> Callbacks {
        Callbacks {
            change: self.change.clone().or_else(|| base.change.clone()),
            change_value: self.change_value.clone().or_else(|| base.change_value.clone()),
            change_state: self.change_state.clone().or_else(|| base.change_state.clone()),
            change_editor_is_active: self
                .change_editor_is_active
                .clone()
                .or_else(|| base.change_editor_is_active.clone()),
            change_show_declaration: self
                .change_show_declaration
                .clone()
                .or_else(|| base.change_show_declaration.clone()),
            blur: self.blur.clone().or_else(|| base.blur.clone()),
            focus: self.focus.clone().or_else(|| base.focus.clone()),
            click: self.click.clone().or_else(|| base.click.clone()),
            key_up: self.key_up.clone().or_else(|| base.key_up.clone()),
            key_down: self.key_down.clone().or_else(|| base.key_down.clone()),
            touch: self.touch.clone().or_else(|| base.touch.clone()),
            selection_change: self
                .selection_change
                .clone()
                .or_else(|| base.selection_change.clone()),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (name, present) in [
            ("change", self.change.is_some()),
            ("change_value", self.change_value.is_some()),
            ("change_state", self.change_state.is_some()),
            ("change_editor_is_active", self.change_editor_is_active.is_some()),
            ("change_show_declaration", self.change_show_declaration.is_some()),
            ("blur", self.blur.is_some()),
            ("focus", self.focus.is_some()),
            ("click", self.click.is_some()),
            ("key_up", self.key_up.is_some()),
            ("key_down", self.key_down.is_some()),
            ("touch", self.touch.is_some()),
            ("selection_change", self.selection_change.is_some()),
        ] {
            if present {
                set.entry(&name);
            }
        }
        set.finish()
    }
}
