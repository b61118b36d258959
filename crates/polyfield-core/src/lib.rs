//! polyfield-core: Reconciliation engine for polymorphic form inputs,
//! without framework dependencies.
//!
//! This crate provides:
//! - `FieldProperties` and `Configuration` - caller input and the merged,
//!   render-ready result of one pass
//! - `Reconciler` - property/state merge with controlled-value precedence
//! - `TransformRegistry` - per-type parse/format/commit pipelines
//! - `InputField` - event handlers, callbacks and selection write-back
//! - `SelectionSurface` - cursor translation for native, code and rich-text
//!   surfaces
//! - `render::plan` - framework-agnostic description of what to draw

pub mod configuration;
pub mod cursor;
pub mod error;
pub mod field;
pub mod locale;
pub mod message;
pub mod pattern;
pub mod properties;
pub mod reconcile;
pub mod render;
pub mod selection;
pub mod transform;
pub mod types;
pub mod validation;
pub mod value;

pub use configuration::{Configuration, Model};
pub use cursor::{
    CodeEditorApi, CodeSurface, NativeInput, NativeSurface, RichTextApi, RichTextSurface,
    SelectionSurface, SurfaceKind, SurfaceSet, active_surface_kind,
};
pub use error::{FieldError, SurfaceError};
pub use field::{
    Adapter, Callbacks, ExternalState, FieldEvent, InputField, KeyInfo, Propagation, ValueInput,
};
pub use locale::{Locale, NumberFormatOptions, NumberLocale};
pub use pattern::Pattern;
pub use properties::{FieldProperties, Messages, ModelProperties};
pub use reconcile::{Consolidation, Owner, Ownership, Reconciler, RetainedState};
pub use render::{HelpText, RenderPlan, SurfacePlan};
pub use selection::{SelectOption, SelectionSpec};
pub use smol_str::SmolStr;
pub use transform::{FieldType, NativeType, Pipeline, TransformRegistry, Transformer};
pub use types::{
    Align, Cursor, CursorProperties, EditorKind, IconDescriptor, ModelState, RichTextMode,
};
pub use value::Value;
