// WHY: In-memory host used by the harness binary and the tests
// Blocks are kept as markup strings; layout is a fixed line grid

use anyhow::{bail, Result};
use scraper::{Html, Selector};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::markup::escape_html;
use super::{ElementId, HostDocument, OverlayElement, Rect};

const PAGE_MARGIN: f64 = 16.0;
const LINE_HEIGHT: f64 = 24.0;
const CHAR_WIDTH: f64 = 8.0;

#[derive(Debug, Clone)]
struct Block {
    tag: String,
    inner_html: String,
}

/// A page held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    hostname: String,
    blocks: Vec<Block>,
    overlays: BTreeMap<ElementId, OverlayElement>,
    next_overlay: usize,
    content_offset: Option<u32>,
    clickable: BTreeSet<String>,
    scroll: (f64, f64),
}

impl StaticPage {
    /// Empty page for the given host
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Self::default()
        }
    }

    /// Append a block with the given tag and inner markup
    pub fn with_block(mut self, tag: impl Into<String>, inner_html: impl Into<String>) -> Self {
        self.blocks.push(Block {
            tag: tag.into(),
            inner_html: inner_html.into(),
        });
        self
    }

    /// Parse a full HTML document and keep every element whose tag is in `tags`.
    ///
    /// Markup is re-serialized by the parser, so it is normalized once here and
    /// kept verbatim afterwards.
    pub fn parse_document(html: &str, hostname: impl Into<String>, tags: &[&str]) -> Result<Self> {
        let mut page = Self::new(hostname);
        if tags.is_empty() {
            return Ok(page);
        }

        let selector = Selector::parse(&tags.join(", "))
            .map_err(|e| anyhow::anyhow!("Invalid block tag list {tags:?}: {e:?}"))?;
        let document = Html::parse_document(html);

        for element in document.select(&selector) {
            page.blocks.push(Block {
                tag: element.value().name().to_string(),
                inner_html: element.inner_html(),
            });
        }

        debug!("Parsed document with {} blocks", page.blocks.len());
        Ok(page)
    }

    /// Number of blocks on the page
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Markup of every block, in document order
    pub fn block_markup(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.inner_html.as_str()).collect()
    }

    /// Auxiliary elements currently attached to the body
    pub fn overlays(&self) -> impl Iterator<Item = (&ElementId, &OverlayElement)> {
        self.overlays.iter()
    }

    pub fn content_offset(&self) -> Option<u32> {
        self.content_offset
    }

    /// True if a click listener was bound for this highlight id
    pub fn is_clickable(&self, highlight_id: &str) -> bool {
        self.clickable.contains(highlight_id)
    }

    pub fn set_scroll(&mut self, x: f64, y: f64) {
        self.scroll = (x, y);
    }

    /// Render the page, including overlays, as a standalone HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n");
        match self.content_offset {
            Some(px) => html.push_str(&format!("<body style=\"margin-top:{px}px\">\n")),
            None => html.push_str("<body>\n"),
        }

        for block in &self.blocks {
            html.push_str(&format!("<{tag}>{}</{tag}>\n", block.inner_html, tag = block.tag));
        }

        for element in self.overlays.values() {
            html.push_str(&render_overlay(element));
            html.push('\n');
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn block_index(&self, id: ElementId) -> Option<usize> {
        (id.0 < self.blocks.len()).then_some(id.0)
    }
}

fn render_overlay(element: &OverlayElement) -> String {
    match element {
        OverlayElement::Banner { text } => format!(
            "<div id=\"wsh-missing-info-banner\" style=\"position:fixed;top:0;left:0;width:100%;\
             background:#ffec80;color:#222;font-weight:bold;font-size:18px;text-align:center;\
             padding:10px 0;z-index:999999\">{}</div>",
            escape_html(text)
        ),
        OverlayElement::Indicator { left, top, title } => format!(
            "<div id=\"wsh-floating-indicator\" title=\"{}\" style=\"position:absolute;\
             left:{left}px;top:{top}px;width:32px;height:32px;border-radius:50%;\
             background:#ffec80;z-index:999999\">\u{1F6C8}</div>",
            escape_html(title)
        ),
        OverlayElement::Tooltip {
            left,
            top,
            heading,
            preview,
        } => format!(
            "<div class=\"wsh-tooltip\" style=\"position:fixed;left:{left}px;top:{top}px;\
             max-width:360px;padding:8px;background:white;z-index:999999\">\
             <div><strong>{}</strong></div><div>\"{preview}\"</div>\
             <button id=\"wsh-search-web\">Search web</button>\
             <button id=\"wsh-search-wiki\">Search Wikipedia</button>\
             <button id=\"wsh-close\">Close</button></div>",
            escape_html(heading)
        ),
    }
}

impl HostDocument for StaticPage {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn elements_by_tag(&self, tag: &str) -> Vec<ElementId> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.tag.eq_ignore_ascii_case(tag))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn text_content(&self, id: ElementId) -> Option<String> {
        let block = &self.blocks[self.block_index(id)?];
        let fragment = Html::parse_fragment(&block.inner_html);
        let text = fragment.root_element().text().collect::<String>();
        Some(text)
    }

    fn inner_html(&self, id: ElementId) -> Option<String> {
        self.block_index(id).map(|i| self.blocks[i].inner_html.clone())
    }

    fn set_inner_html(&mut self, id: ElementId, html: String) -> Result<()> {
        let Some(index) = self.block_index(id) else {
            bail!("No block with id {}", id.0);
        };
        self.blocks[index].inner_html = html;
        Ok(())
    }

    fn append_to_body(&mut self, element: OverlayElement) -> ElementId {
        // Overlay ids never collide with block ids
        let id = ElementId(usize::MAX / 2 + self.next_overlay);
        self.next_overlay += 1;
        self.overlays.insert(id, element);
        id
    }

    fn remove_element(&mut self, id: ElementId) -> bool {
        self.overlays.remove(&id).is_some()
    }

    fn set_content_offset(&mut self, px: Option<u32>) {
        self.content_offset = px;
    }

    fn bind_click(&mut self, highlight_id: &str) {
        self.clickable.insert(highlight_id.to_string());
    }

    fn highlight_rect(&self, highlight_id: &str) -> Option<Rect> {
        let needle = format!("data-wsh-id=\"{highlight_id}\"");
        let (row, block) = self
            .blocks
            .iter()
            .enumerate()
            .find(|(_, block)| block.inner_html.contains(&needle))?;

        let at = block.inner_html.find(&needle)?;
        let column = block.inner_html[..at].chars().count() as f64;
        let (scroll_x, scroll_y) = self.scroll;

        Some(Rect {
            left: PAGE_MARGIN + column * CHAR_WIDTH - scroll_x,
            top: PAGE_MARGIN + row as f64 * LINE_HEIGHT - scroll_y,
            width: CHAR_WIDTH * 16.0,
            height: LINE_HEIGHT,
        })
    }

    fn scroll_offset(&self) -> (f64, f64) {
        self.scroll
    }
}
