// WHY: Banner, indicator and tooltip are singletons per document; the annotator
// owns their handles so every transition is an explicit insert or remove

use serde::Serialize;
use tracing::debug;

use crate::document::{ElementId, HostDocument, OverlayElement};

/// Tooltip heading shown above the preview
pub const TOOLTIP_HEADING: &str = "Potential missing citation";
/// Hover title of the floating indicator
pub const INDICATOR_TITLE: &str = "Potential missing information here";

/// Open tooltip and the highlight it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipState {
    pub element: ElementId,
    pub highlight_id: String,
    /// Trimmed text of the activated highlight
    pub sentence: String,
    /// Escaped, truncated preview shown in the panel
    pub preview: String,
    pub left: f64,
    pub top: f64,
}

/// Visual state the annotator keeps per document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayState {
    pub banner: Option<ElementId>,
    pub indicator: Option<ElementId>,
    pub tooltip: Option<TooltipState>,
    pub content_offset: Option<u32>,
}

impl OverlayState {
    /// Replace the banner and push page content below it
    pub fn show_banner<D: HostDocument>(&mut self, document: &mut D, text: String, offset_px: u32) {
        self.remove_banner(document);
        self.banner = Some(document.append_to_body(OverlayElement::Banner { text }));
        self.content_offset = Some(offset_px);
        document.set_content_offset(self.content_offset);
    }

    /// Place the indicator unless one is already shown
    pub fn place_indicator<D: HostDocument>(&mut self, document: &mut D, left: f64, top: f64) {
        if self.indicator.is_some() {
            return;
        }
        debug!(left, top, "Placing floating indicator");
        self.indicator = Some(document.append_to_body(OverlayElement::Indicator {
            left,
            top,
            title: INDICATOR_TITLE.to_string(),
        }));
    }

    /// Close any open tooltip, then open `tooltip`
    pub fn open_tooltip<D: HostDocument>(
        &mut self,
        document: &mut D,
        highlight_id: String,
        sentence: String,
        preview: String,
        (left, top): (f64, f64),
    ) -> &TooltipState {
        self.close_tooltip(document);
        let element = document.append_to_body(OverlayElement::Tooltip {
            left,
            top,
            heading: TOOLTIP_HEADING.to_string(),
            preview: preview.clone(),
        });
        self.tooltip.insert(TooltipState {
            element,
            highlight_id,
            sentence,
            preview,
            left,
            top,
        })
    }

    /// Close the tooltip, returning its state if one was open
    pub fn close_tooltip<D: HostDocument>(&mut self, document: &mut D) -> Option<TooltipState> {
        let tooltip = self.tooltip.take()?;
        document.remove_element(tooltip.element);
        Some(tooltip)
    }

    /// Remove banner and indicator and reset the content offset
    pub fn hide_summary<D: HostDocument>(&mut self, document: &mut D) {
        self.remove_banner(document);
        if let Some(indicator) = self.indicator.take() {
            document.remove_element(indicator);
        }
        if self.content_offset.take().is_some() {
            document.set_content_offset(None);
        }
    }

    /// Remove every auxiliary element
    pub fn reset<D: HostDocument>(&mut self, document: &mut D) {
        self.close_tooltip(document);
        self.hide_summary(document);
    }

    fn remove_banner<D: HostDocument>(&mut self, document: &mut D) {
        if let Some(banner) = self.banner.take() {
            document.remove_element(banner);
        }
    }
}

/// Banner text for a scan that flagged `count` sentences
pub fn banner_text(count: usize, on_reference_host: bool) -> String {
    let location = if on_reference_host {
        " in this Wikipedia article"
    } else {
        " (may be missing Wikipedia references)"
    };
    let plural = if count == 1 { "" } else { "s" };
    format!(
        "\u{1F6C8} Potential missing information detected{location}! ({count} sentence{plural} flagged)"
    )
}

/// First `max_chars` characters of `text`, with `...` appended when cut
pub fn preview_text(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview
}
