//! Cursor/selection tracking across editing surfaces.
//!
//! The field keeps one absolute `{start, end}` pair over its representation.
//! Each surface addresses positions differently: a native input uses plain
//! offsets, a code editor uses row/column pairs and a rich-text editor uses a
//! DOM node plus an offset inside it. [`SelectionSurface`] hides the
//! translation; [`SurfaceSet`] holds whichever surfaces are mounted.
//!
//! Writes that cannot be honoured yet leave the selection *unstable*; the
//! field retries on every render until one succeeds.

mod markup;
mod native;
mod table;

use std::fmt;

use crate::configuration::Configuration;
use crate::error::SurfaceError;
use crate::types::{Cursor, EditorKind};

pub use markup::{
    MARKER_ATTRIBUTE, MARKER_VALUE, MarkupPosition, RichTextApi, RichTextSurface, SelectionBoundary,
    SENTINEL_END, SENTINEL_START, SentinelHits, absolute_offset_in_markup, take_sentinels,
    with_selection_sentinels,
};
pub use native::{NativeInput, NativeSurface, key_adjustment};
pub use table::{
    CodeEditorApi, CodeSurface, TablePosition, TableRange, absolute_offset, table_position,
};

/// Which coordinate system a surface uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Native,
    Code,
    RichText,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 3] = [
        SurfaceKind::Native,
        SurfaceKind::Code,
        SurfaceKind::RichText,
    ];

    fn slot(self) -> usize {
        match self {
            SurfaceKind::Native => 0,
            SurfaceKind::Code => 1,
            SurfaceKind::RichText => 2,
        }
    }
}

/// A mounted editing surface able to report and place a selection.
///
/// Offsets crossing this boundary are character offsets into the
/// representation. Platform units (UTF-16, rows) stay inside the
/// implementation.
pub trait SelectionSurface {
    fn kind(&self) -> SurfaceKind;

    /// Heavy editors load asynchronously. Writes before readiness are
    /// rejected with [`SurfaceError::NotReady`].
    fn is_ready(&self) -> bool {
        true
    }

    fn focus(&mut self) {}

    /// Current selection as absolute offsets. `key` is the key of the event
    /// that triggered the read, if any.
    fn read_selection(&self, representation: &str, key: Option<&str>) -> Option<Cursor>;

    /// Place the selection.
    fn write_selection(&mut self, cursor: Cursor, representation: &str) -> Result<(), SurfaceError>;
}

/// The surfaces currently mounted, at most one per kind.
#[derive(Default)]
pub struct SurfaceSet {
    slots: [Option<Box<dyn SelectionSurface>>; 3],
}

impl SurfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a surface, returning the one it replaces.
    pub fn attach(
        &mut self,
        surface: Box<dyn SelectionSurface>,
    ) -> Option<Box<dyn SelectionSurface>> {
        let slot = surface.kind().slot();
        self.slots[slot].replace(surface)
    }

    pub fn detach(&mut self, kind: SurfaceKind) -> Option<Box<dyn SelectionSurface>> {
        self.slots[kind.slot()].take()
    }

    pub fn get(&self, kind: SurfaceKind) -> Option<&dyn SelectionSurface> {
        self.slots[kind.slot()].as_deref()
    }

    pub fn get_mut(&mut self, kind: SurfaceKind) -> Option<&mut (dyn SelectionSurface + 'static)> {
        self.slots[kind.slot()].as_deref_mut()
    }

    pub fn is_attached(&self, kind: SurfaceKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    /// Read the selection from the surface of `kind`.
    pub fn read(
        &self,
        kind: SurfaceKind,
        representation: &str,
        key: Option<&str>,
    ) -> Option<Cursor> {
        let surface = self.get(kind)?;
        let cursor = surface.read_selection(representation, key)?;
        Some(cursor.clamped(representation.chars().count()))
    }

    /// Write `cursor` to the surface of `kind`.
    pub fn write(
        &mut self,
        kind: SurfaceKind,
        cursor: Cursor,
        representation: &str,
    ) -> Result<(), SurfaceError> {
        let surface = self.get_mut(kind).ok_or(SurfaceError::Missing(kind))?;
        if !surface.is_ready() {
            return Err(SurfaceError::NotReady(kind));
        }
        // Editors only accept a selection while focused.
        if kind != SurfaceKind::Native {
            surface.focus();
        }
        surface.write_selection(cursor, representation)?;
        tracing::trace!(
            target: "polyfield::cursor",
            ?kind,
            start = cursor.start,
            end = cursor.end,
            "selection written"
        );
        Ok(())
    }
}

impl fmt::Debug for SurfaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().flatten().map(|surface| surface.kind()))
            .finish()
    }
}

/// Surface that carries the selection for `config`, if any. Select fields
/// have no text selection.
pub fn active_surface_kind(config: &Configuration) -> Option<SurfaceKind> {
    if config.selection.is_some() {
        return None;
    }
    if config.is_advanced_editor() {
        return match config.editor {
            EditorKind::Code(_) => Some(SurfaceKind::Code),
            EditorKind::RichText(_) => Some(SurfaceKind::RichText),
            EditorKind::Plain => Some(SurfaceKind::Native),
        };
    }
    Some(SurfaceKind::Native)
}
