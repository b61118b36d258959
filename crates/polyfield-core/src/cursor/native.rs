//! Native input/textarea surface: offsets pass straight through.

use super::{SelectionSurface, SurfaceKind};
use crate::error::SurfaceError;
use crate::types::Cursor;

/// The element behind a native surface. Offsets are characters.
pub trait NativeInput {
    fn selection(&self) -> Option<(usize, usize)>;
    fn set_selection(&mut self, start: usize, end: usize) -> Result<(), SurfaceError>;
    fn focus(&mut self) {}
}

/// Key-up reads race the browser's own update of the selection: a printable
/// key moves the caret one forward, Backspace one back while there is still
/// content behind the selection start.
pub fn key_adjustment(key: Option<&str>, representation: &str, selection_start: usize) -> isize {
    match key {
        Some(key) if key.chars().count() == 1 => 1,
        Some("Backspace") if representation.chars().count() > selection_start => -1,
        _ => 0,
    }
}

pub struct NativeSurface<I> {
    input: I,
}

impl<I: NativeInput> NativeSurface<I> {
    pub fn new(input: I) -> Self {
        Self { input }
    }

    pub fn input(&self) -> &I {
        &self.input
    }
}

impl<I: NativeInput> SelectionSurface for NativeSurface<I> {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Native
    }

    fn focus(&mut self) {
        self.input.focus();
    }

    fn read_selection(&self, representation: &str, key: Option<&str>) -> Option<Cursor> {
        let (start, end) = self.input.selection()?;
        let delta = key_adjustment(key, representation, start);
        Some(Cursor::new(start, end).shifted(delta))
    }

    fn write_selection(
        &mut self,
        cursor: Cursor,
        _representation: &str,
    ) -> Result<(), SurfaceError> {
        self.input.set_selection(cursor.start, cursor.end)
    }
}
