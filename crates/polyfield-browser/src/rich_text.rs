//! A contenteditable body (e.g. a rich-text editor's iframe body) as the
//! rich-text surface.

use std::cell::RefCell;
use std::rc::Rc;

use polyfield_core::cursor::{MarkupPosition, SelectionBoundary};
use polyfield_core::{RichTextApi, SurfaceError};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node, Selection};

use crate::offsets::{char_to_utf16, utf16_to_char};

/// `NodeFilter.SHOW_TEXT`
const SHOW_TEXT: u32 = 0x4;

/// Shared slot for the editable body, filled once the editor initialized.
#[derive(Clone, Debug, Default)]
pub struct RichTextHandle(Rc<RefCell<Option<HtmlElement>>>);

impl RichTextHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, body: HtmlElement) {
        *self.0.borrow_mut() = Some(body);
    }

    pub fn unload(&self) {
        self.0.borrow_mut().take();
    }

    fn body(&self) -> Option<HtmlElement> {
        self.0.borrow().clone()
    }

    fn document(&self) -> Option<(HtmlElement, Document)> {
        let body = self.body()?;
        let document = body.owner_document()?;
        Some((body, document))
    }

    fn selection(document: &Document) -> Option<Selection> {
        document.default_view()?.get_selection().ok().flatten()
    }

    fn text_node_list(&self) -> Vec<Node> {
        let Some((body, document)) = self.document() else {
            return Vec::new();
        };
        let Ok(walker) = document.create_tree_walker_with_what_to_show(&body, SHOW_TEXT) else {
            return Vec::new();
        };
        let mut nodes = Vec::new();
        while let Ok(Some(node)) = walker.next_node() {
            nodes.push(node);
        }
        nodes
    }
}

fn write_error(what: &str, e: wasm_bindgen::JsValue) -> SurfaceError {
    SurfaceError::Write(format!("{what} failed: {:?}", e))
}

impl RichTextApi for RichTextHandle {
    fn is_ready(&self) -> bool {
        self.0.borrow().is_some()
    }

    fn focus(&mut self) {
        if let Some(body) = self.body() {
            if let Err(e) = body.focus() {
                tracing::debug!(target: "polyfield::cursor", "focus failed: {:?}", e);
            }
        }
    }

    fn marked_markup(
        &self,
        boundary: SelectionBoundary,
        attribute: &str,
        value: &str,
    ) -> Option<(String, usize)> {
        let (body, document) = self.document()?;
        let selection = Self::selection(&document)?;
        if selection.range_count() == 0 {
            return None;
        }
        let range = selection.get_range_at(0).ok()?;
        let (node, offset) = match boundary {
            SelectionBoundary::Start => (range.start_container().ok()?, range.start_offset().ok()?),
            SelectionBoundary::End => (range.end_container().ok()?, range.end_offset().ok()?),
        };

        let (element, offset) = if node.node_type() == Node::TEXT_NODE {
            let text = node.text_content().unwrap_or_default();
            (node.parent_element()?, utf16_to_char(&text, offset as usize))
        } else {
            (node.dyn_into::<Element>().ok()?, offset as usize)
        };

        element.set_attribute(attribute, value).ok()?;
        let markup = body.inner_html();
        if let Err(e) = element.remove_attribute(attribute) {
            tracing::warn!(target: "polyfield::cursor", "selection marker left behind: {:?}", e);
        }
        Some((markup, offset))
    }

    fn load_markup(&mut self, markup: &str) -> Result<(), SurfaceError> {
        let body = self
            .body()
            .ok_or(SurfaceError::NotReady(polyfield_core::SurfaceKind::RichText))?;
        body.set_inner_html(markup);
        Ok(())
    }

    fn text_nodes(&self) -> Vec<String> {
        self.text_node_list()
            .iter()
            .map(|node| node.text_content().unwrap_or_default())
            .collect()
    }

    fn set_text_node(&mut self, index: usize, text: &str) -> Result<(), SurfaceError> {
        let nodes = self.text_node_list();
        let node = nodes
            .get(index)
            .ok_or_else(|| SurfaceError::Write(format!("no text node {index}")))?;
        node.set_node_value(Some(text));
        Ok(())
    }

    fn select(&mut self, start: MarkupPosition, end: MarkupPosition) -> Result<(), SurfaceError> {
        let (_, document) = self
            .document()
            .ok_or(SurfaceError::NotReady(polyfield_core::SurfaceKind::RichText))?;
        let nodes = self.text_node_list();
        let locate = |position: MarkupPosition| {
            let node = nodes
                .get(position.node)
                .ok_or_else(|| SurfaceError::Write(format!("no text node {}", position.node)))?;
            let text = node.text_content().unwrap_or_default();
            Ok::<_, SurfaceError>((node, char_to_utf16(&text, position.offset) as u32))
        };
        let (start_node, start_offset) = locate(start)?;
        let (end_node, end_offset) = locate(end)?;

        let range = document.create_range().map_err(|e| write_error("create_range", e))?;
        range
            .set_start(start_node, start_offset)
            .map_err(|e| write_error("set_start", e))?;
        range
            .set_end(end_node, end_offset)
            .map_err(|e| write_error("set_end", e))?;

        let selection = Self::selection(&document)
            .ok_or_else(|| SurfaceError::Write("no selection object".into()))?;
        selection
            .remove_all_ranges()
            .map_err(|e| write_error("remove_all_ranges", e))?;
        selection.add_range(&range).map_err(|e| write_error("add_range", e))
    }
}
