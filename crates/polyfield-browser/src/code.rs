//! Ace as the code editor surface.
//!
//! The editor loads asynchronously. Until [`AceHandle::load`] is called the
//! surface reports itself as not ready and selection writes are deferred.

use std::cell::RefCell;
use std::rc::Rc;

use polyfield_core::cursor::{TablePosition, TableRange};
use polyfield_core::{CodeEditorApi, SurfaceError};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// An Ace editor instance.
    #[derive(Clone, Debug)]
    pub type AceEditor;

    #[wasm_bindgen(method)]
    fn focus(this: &AceEditor);

    #[wasm_bindgen(method, js_name = getSelectionRange)]
    fn get_selection_range(this: &AceEditor) -> JsValue;

    #[wasm_bindgen(method, getter)]
    fn selection(this: &AceEditor) -> AceSelection;

    type AceSelection;

    #[wasm_bindgen(method, catch, js_name = setSelectionRange)]
    fn set_selection_range(this: &AceSelection, range: &JsValue) -> Result<(), JsValue>;
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct AcePoint {
    row: usize,
    column: usize,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct AceRange {
    start: AcePoint,
    end: AcePoint,
}

impl From<AceRange> for TableRange {
    fn from(range: AceRange) -> Self {
        TableRange {
            start: TablePosition::new(range.start.row, range.start.column),
            end: TablePosition::new(range.end.row, range.end.column),
        }
    }
}

impl From<TableRange> for AceRange {
    fn from(range: TableRange) -> Self {
        AceRange {
            start: AcePoint {
                row: range.start.row,
                column: range.start.column,
            },
            end: AcePoint {
                row: range.end.row,
                column: range.end.column,
            },
        }
    }
}

/// Shared slot for an editor that may not have loaded yet.
#[derive(Clone, Debug, Default)]
pub struct AceHandle(Rc<RefCell<Option<AceEditor>>>);

impl AceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, editor: AceEditor) {
        *self.0.borrow_mut() = Some(editor);
    }

    pub fn unload(&self) {
        self.0.borrow_mut().take();
    }
}

impl CodeEditorApi for AceHandle {
    fn is_ready(&self) -> bool {
        self.0.borrow().is_some()
    }

    fn focus(&mut self) {
        if let Some(editor) = self.0.borrow().as_ref() {
            editor.focus();
        }
    }

    fn selection_range(&self) -> Option<TableRange> {
        let editor = self.0.borrow();
        let range = editor.as_ref()?.get_selection_range();
        serde_wasm_bindgen::from_value::<AceRange>(range)
            .map(TableRange::from)
            .ok()
    }

    fn set_selection_range(&mut self, range: TableRange) -> Result<(), SurfaceError> {
        let editor = self.0.borrow();
        let editor = editor
            .as_ref()
            .ok_or(SurfaceError::NotReady(polyfield_core::SurfaceKind::Code))?;
        let range = serde_wasm_bindgen::to_value(&AceRange::from(range))
            .map_err(|e| SurfaceError::Write(e.to_string()))?;
        editor
            .selection()
            .set_selection_range(&range)
            .map_err(|e| SurfaceError::Write(format!("setSelectionRange failed: {:?}", e)))
    }
}
