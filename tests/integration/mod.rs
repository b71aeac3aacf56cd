// Integration test utilities and common code
// WHY: Centralized page builders avoid duplication across integration tests
#![allow(dead_code)]

use citeflag::{Annotator, AnnotatorConfig, StaticPage};

pub mod fixtures;

/// Build a page on a non-reference host with one `<p>` per entry
pub fn page(blocks: &[&str]) -> StaticPage {
    page_on("news.example.com", blocks)
}

/// Build a page on the given host with one `<p>` per entry
pub fn page_on(hostname: &str, blocks: &[&str]) -> StaticPage {
    blocks
        .iter()
        .fold(StaticPage::new(hostname), |page, block| page.with_block("p", *block))
}

/// Annotator over `page(blocks)` with default configuration
pub fn annotator(blocks: &[&str]) -> Annotator<StaticPage> {
    Annotator::new(page(blocks), AnnotatorConfig::default()).expect("Failed to create annotator")
}

/// Trimmed texts of the sentences flagged by the last scan
pub fn flagged_texts(annotator: &Annotator<StaticPage>) -> Vec<String> {
    annotator.flags().iter().map(|f| f.sentence.clone()).collect()
}

/// Banner text currently attached to the page, if any
pub fn banner_text(page: &StaticPage) -> Option<String> {
    page.overlays().find_map(|(_, element)| match element {
        citeflag::OverlayElement::Banner { text } => Some(text.clone()),
        _ => None,
    })
}
