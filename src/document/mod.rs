// WHY: The annotator only talks to the host through this trait, so the same
// scan/clear logic runs against a live page or the in-memory StaticPage

use anyhow::Result;
use serde::Serialize;

pub mod markup;
pub mod static_page;

pub use static_page::StaticPage;

/// Opaque handle to an element owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub usize);

/// Viewport-relative bounding box, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Auxiliary elements the annotator appends to the document body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayElement {
    /// Fixed full-width bar at the top of the page
    Banner { text: String },
    /// Round marker in page coordinates near the first highlight
    Indicator { left: f64, top: f64, title: String },
    /// Action panel in viewport coordinates next to a highlight
    Tooltip {
        left: f64,
        top: f64,
        heading: String,
        preview: String,
    },
}

/// Capabilities the annotator needs from the host document
pub trait HostDocument {
    /// Host name of the page, used for banner wording only
    fn hostname(&self) -> &str;

    /// All elements with the given tag, in document order
    fn elements_by_tag(&self, tag: &str) -> Vec<ElementId>;

    /// Plain-text projection of an element
    fn text_content(&self, id: ElementId) -> Option<String>;

    /// Raw markup inside an element
    fn inner_html(&self, id: ElementId) -> Option<String>;

    /// Replace the markup inside an element
    fn set_inner_html(&mut self, id: ElementId, html: String) -> Result<()>;

    /// Create an auxiliary element at the end of the body
    fn append_to_body(&mut self, element: OverlayElement) -> ElementId;

    /// Remove an auxiliary element; false if it was already gone
    fn remove_element(&mut self, id: ElementId) -> bool;

    /// Shift page content down, or reset it with `None`
    fn set_content_offset(&mut self, px: Option<u32>);

    /// Make the highlight with this id click-activated
    fn bind_click(&mut self, highlight_id: &str);

    /// Bounding box of a highlight wrapper
    fn highlight_rect(&self, highlight_id: &str) -> Option<Rect>;

    /// Current scroll position `(x, y)`
    fn scroll_offset(&self) -> (f64, f64);
}
