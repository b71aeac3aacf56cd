// WHY: Flagging decisions live behind a trait so the traversal and mutation
// logic in the annotator never changes when the heuristic is tuned

use anyhow::{Context, Result};
use scraper::{Html, Selector};

use crate::config::AnnotatorConfig;

pub mod patterns;

pub use patterns::{mentions_citation_needed, PatternSet};

/// Read-only view of one block as seen at the start of a scan
#[derive(Debug, Clone, Copy)]
pub struct BlockView<'a> {
    /// Plain-text projection of the block
    pub text: &'a str,
    /// Raw markup of the block
    pub markup: &'a str,
    /// The markup contains a structural reference element
    pub structural_reference: bool,
}

/// Pluggable sentence predicates
pub trait ClaimHeuristic {
    /// True when the sentence looks like a factual claim worth a citation
    fn is_likely_unsupported(&self, sentence: &str) -> bool;

    /// Inspect a block once before its sentences are judged
    fn inspect_block<'a>(&self, text: &'a str, markup: &'a str) -> BlockView<'a> {
        BlockView {
            text,
            markup,
            structural_reference: false,
        }
    }

    /// True when the block carries a reference that covers the sentence
    fn has_nearby_reference(&self, block: &BlockView<'_>, sentence: &str) -> bool;

    /// Compiled patterns shared with the markup rewriter
    fn patterns(&self) -> &PatternSet;
}

/// Default heuristic: cue words or numbers, minus sentences with a nearby reference
#[derive(Debug, Clone)]
pub struct CueWordHeuristic {
    patterns: PatternSet,
    structural_marker: Selector,
    min_sentence_chars: usize,
    window_before: usize,
    window_after: usize,
}

impl CueWordHeuristic {
    pub fn from_config(config: &AnnotatorConfig) -> Result<Self> {
        let structural_marker = Selector::parse(&config.structural_marker_selector)
            .map_err(|e| anyhow::anyhow!("{e:?}"))
            .with_context(|| {
                format!(
                    "Invalid structural marker selector: {}",
                    config.structural_marker_selector
                )
            })?;

        Ok(Self {
            patterns: PatternSet::compile()?,
            structural_marker,
            min_sentence_chars: config.min_sentence_chars,
            window_before: config.reference_window_before,
            window_after: config.reference_window_after,
        })
    }

    fn has_structural_marker(&self, markup: &str) -> bool {
        Html::parse_fragment(markup)
            .select(&self.structural_marker)
            .next()
            .is_some()
    }

    /// Look for `[n]` in a character window around the first occurrence of the sentence
    fn has_bracket_reference_near(&self, text: &str, sentence: &str) -> bool {
        let Some(byte_idx) = text.find(sentence) else {
            return false;
        };

        let char_idx = text[..byte_idx].chars().count();
        let window_start = char_idx.saturating_sub(self.window_before);
        let window_len = sentence.chars().count() + self.window_after;
        let window: String = text.chars().skip(window_start).take(window_len).collect();

        self.patterns.bracket_reference.is_match(&window)
    }
}

impl ClaimHeuristic for CueWordHeuristic {
    fn inspect_block<'a>(&self, text: &'a str, markup: &'a str) -> BlockView<'a> {
        BlockView {
            text,
            markup,
            structural_reference: self.has_structural_marker(markup),
        }
    }

    fn is_likely_unsupported(&self, sentence: &str) -> bool {
        let trimmed = sentence.trim();
        self.patterns.has_claim_signal(trimmed) && trimmed.chars().count() > self.min_sentence_chars
    }

    fn has_nearby_reference(&self, block: &BlockView<'_>, sentence: &str) -> bool {
        // "citation needed" wins over any reference element elsewhere in the block
        if mentions_citation_needed(block.text) {
            return false;
        }
        if block.structural_reference {
            return true;
        }
        self.has_bracket_reference_near(block.text, sentence.trim())
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }
}
