//! Code editor surface: row/column positions.
//!
//! Rows are `\n`-separated lines of the representation, columns are
//! character offsets inside a line.

use super::{SelectionSurface, SurfaceKind};
use crate::error::SurfaceError;
use crate::types::Cursor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TablePosition {
    pub row: usize,
    pub column: usize,
}

impl TablePosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableRange {
    pub start: TablePosition,
    pub end: TablePosition,
}

/// Absolute offset of a row/column position: the column plus one newline
/// and the length of every preceding line. Rows past the last line count
/// as the last line.
pub fn absolute_offset(text: &str, position: TablePosition) -> usize {
    let lines: Vec<usize> = text.split('\n').map(|line| line.chars().count()).collect();
    let row = position.row.min(lines.len().saturating_sub(1));
    position.column + lines[..row].iter().map(|len| 1 + len).sum::<usize>()
}

/// Row/column position of an absolute offset.
///
/// Walks the lines, consuming `1 + len` while the line is shorter than what
/// is left of the offset.
pub fn table_position(text: &str, offset: usize) -> TablePosition {
    let mut remaining = offset;
    let mut position = TablePosition::default();
    for line in text.split('\n') {
        let len = line.chars().count();
        if len < remaining {
            remaining -= 1 + len;
        } else {
            position.column = remaining;
            break;
        }
        position.row += 1;
    }
    position
}

/// The code editor widget behind a [`CodeSurface`].
pub trait CodeEditorApi {
    /// Whether the widget finished loading.
    fn is_ready(&self) -> bool;
    fn focus(&mut self);
    fn selection_range(&self) -> Option<TableRange>;
    fn set_selection_range(&mut self, range: TableRange) -> Result<(), SurfaceError>;
}

pub struct CodeSurface<E> {
    editor: E,
}

impl<E: CodeEditorApi> CodeSurface<E> {
    pub fn new(editor: E) -> Self {
        Self { editor }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }
}

impl<E: CodeEditorApi> SelectionSurface for CodeSurface<E> {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Code
    }

    fn is_ready(&self) -> bool {
        self.editor.is_ready()
    }

    fn focus(&mut self) {
        self.editor.focus();
    }

    fn read_selection(&self, representation: &str, _key: Option<&str>) -> Option<Cursor> {
        let range = self.editor.selection_range()?;
        Some(Cursor::new(
            absolute_offset(representation, range.start),
            absolute_offset(representation, range.end),
        ))
    }

    fn write_selection(
        &mut self,
        cursor: Cursor,
        representation: &str,
    ) -> Result<(), SurfaceError> {
        let cursor = cursor.clamped(representation.chars().count());
        self.editor.set_selection_range(TableRange {
            start: table_position(representation, cursor.start),
            end: table_position(representation, cursor.end),
        })
    }
}
