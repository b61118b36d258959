//! Rich-text surface: positions are a DOM text node plus an offset in it.
//!
//! The representation of a rich-text field is its body markup, so absolute
//! offsets count tags as well as text.
//!
//! Reading marks the element holding a selection boundary with a temporary
//! attribute, serializes the body and locates the marker. Writing inserts
//! sentinel strings into a copy of the representation, loads it, then walks
//! the text nodes to find and strip them again.

use super::{SelectionSurface, SurfaceKind};
use crate::error::SurfaceError;
use crate::types::Cursor;

pub const MARKER_ATTRIBUTE: &str = "data-polyfield-selection";
pub const MARKER_VALUE: &str = "###";
pub const SENTINEL_START: &str = "###polyfield-selection-start###";
pub const SENTINEL_END: &str = "###polyfield-selection-end###";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionBoundary {
    Start,
    End,
}

/// A text node (by walk order) and a character offset inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkupPosition {
    pub node: usize,
    pub offset: usize,
}

/// Sentinels found in a set of text nodes, and the node texts with the
/// sentinels removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentinelHits {
    pub start: Option<MarkupPosition>,
    pub end: Option<MarkupPosition>,
    pub texts: Vec<String>,
}

fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// The editor emits one newline after every closing paragraph tag that the
/// serialized DOM does not contain.
fn with_paragraph_breaks(markup: &str) -> String {
    let lowered = markup.to_ascii_lowercase();
    let mut out = String::with_capacity(markup.len());
    let mut last = 0;
    for (index, _) in lowered.match_indices("</p>") {
        let end = index + "</p>".len();
        out.push_str(&markup[last..end]);
        out.push('\n');
        last = end;
    }
    out.push_str(&markup[last..]);
    out
}

/// Absolute offset of a boundary, given the body markup serialized while the
/// boundary's element carried the marker attribute and the boundary's offset
/// inside that element.
pub fn absolute_offset_in_markup(marked_markup: &str, offset: usize) -> Option<usize> {
    let content = with_paragraph_breaks(marked_markup);
    let marker = format!(" {MARKER_ATTRIBUTE}=\"{MARKER_VALUE}\"");
    let at = content.find(&marker)?;
    let after_marker = at + marker.len();
    let tag_end = after_marker + content[after_marker..].find('>')? + 1;
    let before = content[..tag_end].chars().count();
    Some(offset + before - marker.chars().count())
}

/// Copy of `representation` with the start sentinel at `cursor.start` and
/// the end sentinel at `cursor.end`.
pub fn with_selection_sentinels(representation: &str, cursor: Cursor) -> String {
    let cursor = cursor.clamped(representation.chars().count());
    let mut markup = representation.to_string();
    markup.insert_str(byte_index(&markup, cursor.start), SENTINEL_START);
    let end = cursor.end + SENTINEL_START.chars().count();
    markup.insert_str(byte_index(&markup, end), SENTINEL_END);
    markup
}

/// Find and strip both sentinels from the text nodes, in walk order.
pub fn take_sentinels<S: AsRef<str>>(nodes: &[S]) -> SentinelHits {
    let mut hits = SentinelHits::default();
    for (node, text) in nodes.iter().enumerate() {
        let mut text = text.as_ref().to_string();
        for (sentinel, slot) in [(SENTINEL_START, &mut hits.start), (SENTINEL_END, &mut hits.end)] {
            if let Some(at) = text.find(sentinel) {
                let offset = text[..at].chars().count();
                text.replace_range(at..at + sentinel.len(), "");
                *slot = Some(MarkupPosition { node, offset });
            }
        }
        hits.texts.push(text);
    }
    hits
}

/// The rich-text widget behind a [`RichTextSurface`].
pub trait RichTextApi {
    fn is_ready(&self) -> bool;
    fn focus(&mut self);

    /// Serialize the body while the element holding `boundary` carries
    /// `attribute="value"`, and return it together with the boundary's
    /// offset inside that element. The attribute is removed afterwards.
    fn marked_markup(
        &self,
        boundary: SelectionBoundary,
        attribute: &str,
        value: &str,
    ) -> Option<(String, usize)>;

    /// Replace the body content.
    fn load_markup(&mut self, markup: &str) -> Result<(), SurfaceError>;

    /// Text content of every text node, in document order.
    fn text_nodes(&self) -> Vec<String>;

    fn set_text_node(&mut self, index: usize, text: &str) -> Result<(), SurfaceError>;

    fn select(&mut self, start: MarkupPosition, end: MarkupPosition) -> Result<(), SurfaceError>;
}

pub struct RichTextSurface<R> {
    editor: R,
}

impl<R: RichTextApi> RichTextSurface<R> {
    pub fn new(editor: R) -> Self {
        Self { editor }
    }

    pub fn editor(&self) -> &R {
        &self.editor
    }

    fn boundary(&self, boundary: SelectionBoundary) -> Option<usize> {
        let (markup, offset) = self.editor.marked_markup(boundary, MARKER_ATTRIBUTE, MARKER_VALUE)?;
        absolute_offset_in_markup(&markup, offset)
    }
}

impl<R: RichTextApi> SelectionSurface for RichTextSurface<R> {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::RichText
    }

    fn is_ready(&self) -> bool {
        self.editor.is_ready()
    }

    fn focus(&mut self) {
        self.editor.focus();
    }

    fn read_selection(&self, representation: &str, _key: Option<&str>) -> Option<Cursor> {
        if representation.is_empty() {
            return Some(Cursor::collapsed(0));
        }
        let start = self.boundary(SelectionBoundary::Start)?;
        let end = self.boundary(SelectionBoundary::End)?;
        Some(Cursor::new(start, end))
    }

    fn write_selection(
        &mut self,
        cursor: Cursor,
        representation: &str,
    ) -> Result<(), SurfaceError> {
        self.editor
            .load_markup(&with_selection_sentinels(representation, cursor))?;

        let nodes = self.editor.text_nodes();
        let hits = take_sentinels(&nodes);
        for (index, (before, after)) in nodes.iter().zip(&hits.texts).enumerate() {
            if before != after {
                self.editor.set_text_node(index, after)?;
            }
        }

        match (hits.start, hits.end) {
            (Some(start), Some(end)) => self.editor.select(start, end),
            _ => {
                // Sentinels inside a tag never reach a text node.
                tracing::debug!(
                    target: "polyfield::cursor",
                    start = cursor.start,
                    end = cursor.end,
                    "selection sentinels not found in rich text"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_in_plain_paragraph() {
        // "<p>hello</p>" with the caret after "he".
        let markup = format!("<p {MARKER_ATTRIBUTE}=\"{MARKER_VALUE}\">hello</p>");
        assert_eq!(absolute_offset_in_markup(&markup, 2), Some(5));
    }

    #[test]
    fn test_offset_counts_paragraph_breaks() {
        let markup =
            format!("<p>one</p><P>two</P><p {MARKER_ATTRIBUTE}=\"{MARKER_VALUE}\">three</p>");
        // "<p>one</p>\n<P>two</P>\n<p>" is 25 characters.
        assert_eq!(absolute_offset_in_markup(&markup, 0), Some(25));
    }

    #[test]
    fn test_offset_without_marker() {
        assert_eq!(absolute_offset_in_markup("<p>hello</p>", 2), None);
    }

    #[test]
    fn test_sentinel_insertion() {
        let markup = with_selection_sentinels("<p>héllo</p>", Cursor::new(4, 6));
        assert_eq!(
            markup,
            format!("<p>h{SENTINEL_START}él{SENTINEL_END}lo</p>")
        );
        let collapsed = with_selection_sentinels("ab", Cursor::collapsed(9));
        assert_eq!(collapsed, format!("ab{SENTINEL_START}{SENTINEL_END}"));
    }

    #[test]
    fn test_take_sentinels() {
        let nodes = [
            "one".to_string(),
            format!("tw{SENTINEL_START}o"),
            format!("thr{SENTINEL_END}ee"),
        ];
        let hits = take_sentinels(&nodes);
        assert_eq!(hits.start, Some(MarkupPosition { node: 1, offset: 2 }));
        assert_eq!(hits.end, Some(MarkupPosition { node: 2, offset: 3 }));
        assert_eq!(hits.texts, vec!["one", "two", "three"]);

        let same = [format!("a{SENTINEL_START}bc{SENTINEL_END}d")];
        let hits = take_sentinels(&same);
        assert_eq!(hits.start, Some(MarkupPosition { node: 0, offset: 1 }));
        assert_eq!(hits.end, Some(MarkupPosition { node: 0, offset: 3 }));
        assert_eq!(hits.texts, vec!["abcd"]);
    }

    /// Flat fake: the body is one paragraph with one text node.
    #[derive(Default)]
    struct Fake {
        body: String,
        nodes: Vec<String>,
        selected: Option<(MarkupPosition, MarkupPosition)>,
    }

    impl RichTextApi for Fake {
        fn is_ready(&self) -> bool {
            true
        }

        fn focus(&mut self) {}

        fn marked_markup(
            &self,
            _boundary: SelectionBoundary,
            attribute: &str,
            value: &str,
        ) -> Option<(String, usize)> {
            let (start, _) = self.selected?;
            Some((format!("<p {attribute}=\"{value}\">{}</p>", self.nodes[0]), start.offset))
        }

        fn load_markup(&mut self, markup: &str) -> Result<(), SurfaceError> {
            self.body = markup.to_string();
            let inner = markup.trim_start_matches("<p>").trim_end_matches("</p>");
            self.nodes = vec![inner.to_string()];
            Ok(())
        }

        fn text_nodes(&self) -> Vec<String> {
            self.nodes.clone()
        }

        fn set_text_node(&mut self, index: usize, text: &str) -> Result<(), SurfaceError> {
            self.nodes[index] = text.to_string();
            Ok(())
        }

        fn select(
            &mut self,
            start: MarkupPosition,
            end: MarkupPosition,
        ) -> Result<(), SurfaceError> {
            self.selected = Some((start, end));
            Ok(())
        }
    }

    #[test]
    fn test_surface_write_then_read() {
        let mut surface = RichTextSurface::new(Fake::default());
        surface.write_selection(Cursor::collapsed(5), "<p>hello</p>").unwrap();
        let editor = surface.editor();
        assert_eq!(editor.nodes, vec!["hello"]);
        assert_eq!(
            editor.selected,
            Some((MarkupPosition { node: 0, offset: 2 }, MarkupPosition { node: 0, offset: 2 }))
        );
        assert_eq!(surface.read_selection("<p>hello</p>", None), Some(Cursor::collapsed(5)));
    }

    #[test]
    fn test_empty_representation_reads_as_zero() {
        let surface = RichTextSurface::new(Fake::default());
        assert_eq!(surface.read_selection("", None), Some(Cursor::collapsed(0)));
    }
}
