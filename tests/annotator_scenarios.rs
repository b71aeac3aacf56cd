// Scenario tests for sentence flagging and highlight placement

use citeflag::{
    Annotator, AnnotatorConfig, FlagReason, HighlightKind, HostDocument, OverlayElement, StaticPage,
};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{annotator, banner_text, fixtures, flagged_texts, page_on};

#[test]
fn test_cue_word_and_percentage_flagged() {
    let mut annotator = annotator(&["Studies show that 42% of users agree. This is fine."]);
    let result = annotator.scan();

    assert_eq!(result.flagged_count, 1);
    assert_eq!(flagged_texts(&annotator), vec!["Studies show that 42% of users agree."]);
    assert_eq!(annotator.flags()[0].reason, FlagReason::Heuristic);

    let banner = banner_text(annotator.document()).expect("banner should be shown");
    assert!(banner.contains("1 sentence flagged"), "banner was {banner:?}");
    assert!(banner.contains("(may be missing Wikipedia references)"));

    let markup = annotator.document().block_markup()[0];
    assert!(markup.contains(r#"title="Click to search sources">Studies show that 42% of users agree.</span> This is fine."#));
}

#[test]
fn test_bracket_reference_suppresses_flag() {
    let mut annotator = annotator(&["Revenue grew in 2020 [1]."]);
    let result = annotator.scan();

    assert_eq!(result.flagged_count, 0);
    assert!(annotator.highlights().is_empty());
    assert!(banner_text(annotator.document()).is_none());
    assert_eq!(annotator.document().block_markup()[0], "Revenue grew in 2020 [1].");
}

#[test]
fn test_explicit_marker_flags_and_wraps_marker() {
    let mut annotator = annotator(&["This fact needs support. [citation needed]"]);
    let result = annotator.scan();

    // The trailing marker fragment is a sentence of its own
    assert_eq!(result.flagged_count, 2);
    assert_eq!(flagged_texts(&annotator), vec!["This fact needs support.", "[citation needed]"]);
    assert!(annotator
        .flags()
        .iter()
        .all(|f| f.reason == FlagReason::ExplicitMarker));

    let markers: Vec<_> = annotator
        .highlights()
        .iter()
        .filter(|h| h.kind == HighlightKind::Marker)
        .collect();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].text, "[citation needed]");

    let nested = annotator
        .highlights()
        .iter()
        .find(|h| h.kind == HighlightKind::Sentence && h.text == "[citation needed]")
        .expect("marker fragment highlighted");
    assert_ne!(nested.id, markers[0].id);

    let markup = annotator.document().block_markup()[0];
    let marker_open = format!(r#"data-wsh-id="{}" title="Missing citation">"#, markers[0].id);
    let nested_open = format!(r#"data-wsh-id="{}" title="Click to search sources">[citation needed]"#, nested.id);
    assert!(markup.contains(&format!(r#"{marker_open}<span class="wsh-highlight" {nested_open}"#)), "markup was {markup}");
}

#[test]
fn test_explicit_marker_is_case_insensitive() {
    let mut annotator = annotator(&["Officials said the road was safe. [Citation Needed]"]);
    let result = annotator.scan();

    assert_eq!(result.flagged_count, 2);
    assert_eq!(annotator.flags()[0].sentence, "Officials said the road was safe.");
    assert_eq!(annotator.flags()[0].reason, FlagReason::ExplicitMarker);
    assert!(annotator
        .highlights()
        .iter()
        .any(|h| h.kind == HighlightKind::Marker && h.text == "[Citation Needed]"));
}

#[test]
fn test_length_threshold_boundary() {
    let mut short = annotator(&["The study was great."]);
    assert_eq!(short.scan().flagged_count, 0);

    let mut long = annotator(&["The study was superb."]);
    assert_eq!(long.scan().flagged_count, 1);
}

#[test]
fn test_citation_needed_beats_structural_reference() {
    let mut annotator = annotator(&[
        r#"Sales rose by 12 percent in 2019.<sup class="reference">[2]</sup> Costs fell.[citation needed]"#,
    ]);
    annotator.scan();

    let texts = flagged_texts(&annotator);
    assert!(texts.contains(&"Sales rose by 12 percent in 2019.".to_string()));
}

#[test]
fn test_structural_reference_without_marker() {
    let mut annotator = annotator(&[
        r##"Sales rose by 12 percent in 2019.<sup class="reference"><a href="#n2">[2]</a></sup>"##,
    ]);
    assert_eq!(annotator.scan().flagged_count, 0);
}

#[test]
fn test_repeated_sentence_highlighted_at_first_occurrence_only() {
    let mut annotator = annotator(&[fixtures::REPEATED_SENTENCE]);
    let result = annotator.scan();

    assert_eq!(result.flagged_count, 2);
    let markup = annotator.document().block_markup()[0];
    assert!(markup.ends_with("</span> Studies found 12 new species."), "markup was {markup}");
}

#[test]
fn test_sentence_split_by_markup_is_counted_but_not_wrapped() {
    let mut annotator = annotator(&[fixtures::MIXED_MARKUP]);
    let result = annotator.scan();

    assert_eq!(result.flagged_count, 1);
    assert_eq!(annotator.flags()[0].highlight_id, None);
    assert!(annotator.highlights().is_empty());
    assert_eq!(annotator.document().block_markup()[0], fixtures::MIXED_MARKUP);
    // Banner still reports the flag, but there is nothing to anchor the indicator to
    assert!(banner_text(annotator.document()).is_some());
    assert!(annotator.overlay().indicator.is_none());
}

#[test]
fn test_block_without_sentences_still_gets_marker() {
    let mut annotator = annotator(&["", "[citation needed]"]);
    let result = annotator.scan();

    assert_eq!(result.flagged_count, 1);
    assert_eq!(annotator.document().block_markup()[0], "");
    assert!(annotator
        .highlights()
        .iter()
        .any(|h| h.kind == HighlightKind::Marker));
}

#[test]
fn test_wikipedia_article_scan() {
    let page = StaticPage::parse_document(fixtures::ARTICLE_HTML, "en.wikipedia.org", &["p"])
        .expect("Failed to parse article");
    let mut annotator = Annotator::new(page, AnnotatorConfig::default()).expect("annotator");
    let result = annotator.scan();

    assert_eq!(result.flagged_count, 3);
    let texts = flagged_texts(&annotator);
    assert!(texts.contains(&"According to a 2019 survey, 64% of residents own a bicycle.".to_string()));
    assert!(texts.contains(&"Local lore says the bridge is haunted.".to_string()));
    assert!(!texts.iter().any(|t| t.starts_with("The town was founded")));

    let banner = banner_text(annotator.document()).expect("banner");
    assert!(banner.contains("in this Wikipedia article"));
    assert!(banner.ends_with("(3 sentences flagged)"));
    assert_eq!(annotator.document().content_offset(), Some(50));
}

#[test]
fn test_indicator_anchored_near_first_highlight() {
    let mut page = page_on("example.org", &["Nothing here.", "Studies found 42 cases in 1999."]);
    page.set_scroll(0.0, 100.0);
    let mut annotator = Annotator::new(page, AnnotatorConfig::default()).expect("annotator");
    annotator.scan();

    let first = annotator.highlights()[0].id.clone();
    let rect = annotator.document().highlight_rect(&first).expect("rect");

    let indicator = annotator
        .document()
        .overlays()
        .find_map(|(_, element)| match element {
            OverlayElement::Indicator { left, top, .. } => Some((*left, *top)),
            _ => None,
        })
        .expect("indicator");
    assert_eq!(indicator, (rect.left - 36.0, 100.0 + rect.top - 36.0));
}

#[test]
fn test_indicator_follows_document_order_on_marker_block() {
    let mut annotator = annotator(&["This fact needs support. [citation needed]"]);
    annotator.scan();

    let first = &annotator.highlights()[0];
    assert_eq!(first.kind, HighlightKind::Sentence);
    assert_eq!(first.text, "This fact needs support.");
    assert!(annotator.document().block_markup()[0]
        .starts_with(&format!(r#"<span class="wsh-highlight" data-wsh-id="{}""#, first.id)));

    let indicator = annotator
        .document()
        .overlays()
        .find_map(|(_, element)| match element {
            OverlayElement::Indicator { left, top, .. } => Some((*left, *top)),
            _ => None,
        })
        .expect("indicator");
    // Grid geometry: 16px margin plus 28 chars of opening tag at 8px, minus the 36px offset
    assert_eq!(indicator, (204.0, -20.0));
}

#[test]
fn test_custom_block_tag() {
    let page = StaticPage::new("example.org")
        .with_block("li", "Researchers reported 300 cases last year.")
        .with_block("p", "Researchers reported 300 cases last year.");
    let config = AnnotatorConfig {
        block_tag: "li".to_string(),
        ..AnnotatorConfig::default()
    };
    let mut annotator = Annotator::new(page, config).expect("annotator");

    assert_eq!(annotator.scan().flagged_count, 1);
    assert_eq!(annotator.flags()[0].block.0, 0);
}
