//! Browser DOM layer for polyfield.
//!
//! Implements the core's selection surface traits on top of the DOM and
//! exposes [`JsField`] to JavaScript hosts. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `native`: `<input>`/`<textarea>` selection
//! - `code`: Ace editor selection ranges
//! - `rich_text`: contenteditable body selection via DOM ranges
//! - `bindings`: `JsField`, the wasm-bindgen wrapper around `InputField`
//!
//! # Re-exports
//!
//! This crate re-exports `polyfield-core` for convenience, so consumers
//! only need to depend on `polyfield-browser`.

// Re-export core crate
pub use polyfield_core;
pub use polyfield_core::*;

pub mod bindings;
pub mod code;
pub mod logging;
pub mod native;
pub mod offsets;
pub mod rich_text;

pub use bindings::JsField;
pub use code::{AceEditor, AceHandle};
pub use logging::init_logging;
pub use native::DomInput;
pub use rich_text::RichTextHandle;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    init_logging();
}
