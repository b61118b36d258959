//! `<input>` and `<textarea>` elements as native selection surfaces.

use polyfield_core::{NativeInput, SurfaceError};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

use crate::offsets::{char_to_utf16, utf16_to_char};

#[derive(Clone, Debug)]
pub enum DomInput {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl DomInput {
    /// `None` for anything but an input or textarea.
    pub fn from_element(element: &Element) -> Option<Self> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(DomInput::Input(input.clone()));
        }
        element
            .dyn_ref::<HtmlTextAreaElement>()
            .map(|area| DomInput::TextArea(area.clone()))
    }

    pub fn value(&self) -> String {
        match self {
            DomInput::Input(input) => input.value(),
            DomInput::TextArea(area) => area.value(),
        }
    }
}

impl NativeInput for DomInput {
    fn selection(&self) -> Option<(usize, usize)> {
        // Number and date inputs have no selection and throw.
        let (start, end) = match self {
            DomInput::Input(input) => (
                input.selection_start().ok().flatten()?,
                input.selection_end().ok().flatten()?,
            ),
            DomInput::TextArea(area) => (
                area.selection_start().ok().flatten()?,
                area.selection_end().ok().flatten()?,
            ),
        };
        let text = self.value();
        Some((
            utf16_to_char(&text, start as usize),
            utf16_to_char(&text, end as usize),
        ))
    }

    fn set_selection(&mut self, start: usize, end: usize) -> Result<(), SurfaceError> {
        let text = self.value();
        let start = char_to_utf16(&text, start) as u32;
        let end = char_to_utf16(&text, end) as u32;
        let result = match self {
            DomInput::Input(input) => input.set_selection_range(start, end),
            DomInput::TextArea(area) => area.set_selection_range(start, end),
        };
        result.map_err(|e| SurfaceError::Write(format!("set_selection_range failed: {:?}", e)))
    }

    fn focus(&mut self) {
        let result = match self {
            DomInput::Input(input) => input.focus(),
            DomInput::TextArea(area) => area.focus(),
        };
        if let Err(e) = result {
            tracing::debug!(target: "polyfield::cursor", "focus failed: {:?}", e);
        }
    }
}
