//! JsField - an input field exposed to JavaScript.

use js_sys::{Function, Reflect};
use polyfield_core::{
    Callbacks, CodeSurface, Configuration, FieldEvent, FieldProperties, InputField, NativeSurface,
    Propagation, RichTextSurface, SurfaceKind, Value, ValueInput,
};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, KeyboardEvent};

use crate::code::{AceEditor, AceHandle};
use crate::native::DomInput;
use crate::rich_text::RichTextHandle;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// For callback arguments, where there is nobody to return an error to.
fn to_js_or_undefined<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match value.serialize(&Serializer::json_compatible()) {
        Ok(js) => js,
        Err(e) => {
            tracing::warn!(target: "polyfield::field", "callback argument not serializable: {}", e);
            JsValue::UNDEFINED
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_code: Option<u32>,
}

fn event_js(event: &FieldEvent) -> JsValue {
    let (kind, key) = match event {
        FieldEvent::Focus => ("focus", None),
        FieldEvent::Blur => ("blur", None),
        FieldEvent::Click => ("click", None),
        FieldEvent::KeyDown(key) => ("keyDown", Some(key)),
        FieldEvent::KeyUp(key) => ("keyUp", Some(key)),
        FieldEvent::Input => ("input", None),
        FieldEvent::EditorToggle => ("editorToggle", None),
        FieldEvent::DeclarationToggle => ("declarationToggle", None),
        FieldEvent::PasswordToggle => ("passwordToggle", None),
        FieldEvent::Clear => ("clear", None),
        FieldEvent::SelectionChange => ("selectionChange", None),
    };
    to_js_or_undefined(&EventPayload {
        kind,
        key: key.map(|k| k.key.as_str()),
        key_code: key.map(|k| k.key_code),
    })
}

fn report(name: &'static str, result: Result<JsValue, JsValue>) {
    if let Err(e) = result {
        tracing::warn!(target: "polyfield::field", callback = name, "callback threw: {:?}", e);
    }
}

/// Wrap the functions found on a JS callbacks object.
fn js_callbacks(object: &JsValue) -> Callbacks {
    let function = |name: &str| {
        Reflect::get(object, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
    };
    let mut callbacks = Callbacks::new();
    if object.is_undefined() || object.is_null() {
        return callbacks;
    }

    if let Some(f) = function("change") {
        callbacks = callbacks.on_change(move |config, event| {
            let config = to_js_or_undefined(config);
            report("change", f.call2(&JsValue::NULL, &config, &event_js(event)));
        });
    }
    if let Some(f) = function("changeValue") {
        callbacks = callbacks.on_change_value(move |value, event, config| {
            report(
                "changeValue",
                f.call3(
                    &JsValue::NULL,
                    &to_js_or_undefined(value),
                    &event_js(event),
                    &to_js_or_undefined(config),
                ),
            );
        });
    }
    if let Some(f) = function("changeState") {
        callbacks = callbacks.on_change_state(move |state, event, config| {
            report(
                "changeState",
                f.call3(
                    &JsValue::NULL,
                    &to_js_or_undefined(state),
                    &event_js(event),
                    &to_js_or_undefined(config),
                ),
            );
        });
    }

    let toggle = |name: &'static str| {
        function(name).map(|f| {
            move |on: bool, event: &FieldEvent, config: &Configuration| {
                report(
                    name,
                    f.call3(
                        &JsValue::NULL,
                        &JsValue::from_bool(on),
                        &event_js(event),
                        &to_js_or_undefined(config),
                    ),
                );
            }
        })
    };
    if let Some(cb) = toggle("changeEditorIsActive") {
        callbacks = callbacks.on_change_editor_is_active(cb);
    }
    if let Some(cb) = toggle("changeShowDeclaration") {
        callbacks = callbacks.on_change_show_declaration(cb);
    }

    let plain = |name: &'static str| {
        function(name).map(|f| {
            move |event: &FieldEvent, config: &Configuration| {
                let config = to_js_or_undefined(config);
                report(name, f.call2(&JsValue::NULL, &event_js(event), &config));
            }
        })
    };
    if let Some(cb) = plain("blur") {
        callbacks = callbacks.on_blur(cb);
    }
    if let Some(cb) = plain("focus") {
        callbacks = callbacks.on_focus(cb);
    }
    if let Some(cb) = plain("click") {
        callbacks = callbacks.on_click(cb);
    }
    if let Some(cb) = plain("keyUp") {
        callbacks = callbacks.on_key_up(cb);
    }
    if let Some(cb) = plain("keyDown") {
        callbacks = callbacks.on_key_down(cb);
    }
    if let Some(cb) = plain("touch") {
        callbacks = callbacks.on_touch(cb);
    }
    if let Some(cb) = plain("selectionChange") {
        callbacks = callbacks.on_selection_change(cb);
    }
    callbacks
}

fn field_properties(
    properties: JsValue,
    callbacks: &Callbacks,
) -> Result<FieldProperties, JsError> {
    let mut given: FieldProperties = if properties.is_undefined() || properties.is_null() {
        FieldProperties::default()
    } else {
        serde_wasm_bindgen::from_value(properties)
            .map_err(|e| JsError::new(&format!("Invalid properties: {}", e)))?
    };
    given.callbacks = callbacks.clone();
    Ok(given)
}

/// An input field instance exposed to JavaScript.
///
/// The host renders from [`JsField::render_plan`], forwards DOM events to
/// the handlers and calls [`JsField::after_render`] after every render.
#[wasm_bindgen]
pub struct JsField {
    field: InputField,
    callbacks: Callbacks,
    code: AceHandle,
    rich_text: RichTextHandle,
}

#[wasm_bindgen]
impl JsField {
    /// Create a field from a properties object and an optional callbacks
    /// object (`change`, `changeValue`, `changeState`, `blur`, ...).
    #[wasm_bindgen(constructor)]
    pub fn new(properties: JsValue, callbacks: JsValue) -> Result<JsField, JsError> {
        let callbacks = js_callbacks(&callbacks);
        let given = field_properties(properties, &callbacks)?;
        Ok(Self {
            field: InputField::new(given),
            callbacks,
            code: AceHandle::new(),
            rich_text: RichTextHandle::new(),
        })
    }

    /// Replace the properties. Callbacks given at construction are kept.
    #[wasm_bindgen(js_name = setProperties)]
    pub fn set_properties(&mut self, properties: JsValue) -> Result<(), JsError> {
        let given = field_properties(properties, &self.callbacks)?;
        self.field.set_properties(given);
        Ok(())
    }

    // === Output ===

    pub fn configuration(&self) -> Result<JsValue, JsError> {
        to_js(self.field.configuration())
    }

    /// State the host does not control: model state always, the rest only
    /// where the properties left it unspecified.
    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.field.adapter().state)
    }

    #[wasm_bindgen(js_name = renderPlan)]
    pub fn render_plan(&self) -> Result<JsValue, JsError> {
        to_js(&self.field.render_plan())
    }

    // === Events ===

    pub fn blur(&mut self) {
        self.field.handle_blur();
    }

    pub fn focus(&mut self) {
        self.field.handle_focus();
    }

    pub fn click(&mut self) {
        self.field.handle_click();
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, event: &KeyboardEvent) {
        let key = polyfield_core::KeyInfo::new(event.key(), event.key_code());
        if self.field.handle_key_down(key) == Propagation::Stop {
            event.stop_propagation();
        }
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, event: &KeyboardEvent) {
        self.field
            .handle_key_up(polyfield_core::KeyInfo::new(event.key(), event.key_code()));
    }

    /// New input from the surface: the text of an input, or a typed value
    /// such as a select option's.
    pub fn input(&mut self, value: JsValue) -> Result<(), JsError> {
        if let Some(text) = value.as_string() {
            self.field.handle_change_value(text.as_str());
            return Ok(());
        }
        let value: Value = if value.is_undefined() {
            Value::Null
        } else {
            serde_wasm_bindgen::from_value(value)
                .map_err(|e| JsError::new(&format!("Invalid value: {}", e)))?
        };
        self.field.handle_change_value(ValueInput::Bare(value));
        Ok(())
    }

    #[wasm_bindgen(js_name = selectionChange)]
    pub fn selection_change(&mut self) {
        self.field.handle_selection_change();
    }

    #[wasm_bindgen(js_name = toggleEditor)]
    pub fn toggle_editor(&mut self) {
        self.field.toggle_editor();
    }

    #[wasm_bindgen(js_name = toggleDeclaration)]
    pub fn toggle_declaration(&mut self) {
        self.field.toggle_declaration();
    }

    #[wasm_bindgen(js_name = toggleHidden)]
    pub fn toggle_hidden(&mut self) {
        self.field.toggle_hidden();
    }

    pub fn clear(&mut self) {
        self.field.clear();
    }

    // === Surfaces ===

    /// Mount the `<input>` or `<textarea>` element.
    #[wasm_bindgen(js_name = attachInput)]
    pub fn attach_input(&mut self, element: &Element) -> Result<(), JsError> {
        let input = DomInput::from_element(element)
            .ok_or_else(|| JsError::new("element is neither an input nor a textarea"))?;
        self.field.attach_surface(Box::new(NativeSurface::new(input)));
        Ok(())
    }

    #[wasm_bindgen(js_name = detachInput)]
    pub fn detach_input(&mut self) {
        self.field.detach_surface(SurfaceKind::Native);
    }

    /// The code editor finished loading.
    #[wasm_bindgen(js_name = attachCodeEditor)]
    pub fn attach_code_editor(&mut self, editor: AceEditor) {
        self.code.load(editor);
        if !self.field.surfaces().is_attached(SurfaceKind::Code) {
            self.field
                .attach_surface(Box::new(CodeSurface::new(self.code.clone())));
        }
        self.field.on_surface_ready(SurfaceKind::Code);
    }

    #[wasm_bindgen(js_name = detachCodeEditor)]
    pub fn detach_code_editor(&mut self) {
        self.code.unload();
        self.field.detach_surface(SurfaceKind::Code);
    }

    /// The rich-text editor initialized with `body` as its editable root.
    #[wasm_bindgen(js_name = attachRichText)]
    pub fn attach_rich_text(&mut self, body: HtmlElement) {
        self.rich_text.load(body);
        if !self.field.surfaces().is_attached(SurfaceKind::RichText) {
            self.field
                .attach_surface(Box::new(RichTextSurface::new(self.rich_text.clone())));
        }
        self.field.on_surface_ready(SurfaceKind::RichText);
    }

    #[wasm_bindgen(js_name = detachRichText)]
    pub fn detach_rich_text(&mut self) {
        self.rich_text.unload();
        self.field.detach_surface(SurfaceKind::RichText);
    }

    /// Apply a pending selection to the active surface.
    #[wasm_bindgen(js_name = afterRender)]
    pub fn after_render(&mut self) {
        self.field.after_render();
    }
}
