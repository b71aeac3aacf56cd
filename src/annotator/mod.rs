//! Scan/clear lifecycle of flagged sentences in a host document.
//!
//! A scan always starts from a clean document, so the highlights present after
//! it are exactly the ones it produced.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AnnotatorConfig;
use crate::document::markup::{
    escape_html, has_highlights, unwrap_highlights, wrap_all_markers, wrap_first_occurrence,
};
use crate::document::{ElementId, HostDocument};
use crate::heuristics::{mentions_citation_needed, ClaimHeuristic, CueWordHeuristic};
use crate::messaging::{Command, Response, SearchChannel, SearchRequest};
use crate::search::{search_url, SearchTarget};
use crate::sentence_detector::SentenceDetector;

pub mod overlay;

pub use overlay::{OverlayState, TooltipState};

/// Why a sentence was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagReason {
    /// Cue word or number without a nearby reference
    Heuristic,
    /// The block carries an explicit "citation needed" marker
    ExplicitMarker,
}

/// A sentence flagged by the most recent scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    pub block: ElementId,
    /// Trimmed sentence text
    pub sentence: String,
    pub reason: FlagReason,
    /// Id of the wrapper, if the sentence could be located in the markup
    pub highlight_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightKind {
    Sentence,
    Marker,
}

/// A wrapper currently present in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub id: String,
    pub block: ElementId,
    /// Plain text wrapped by the highlight
    pub text: String,
    pub kind: HighlightKind,
}

/// Summary returned by `Annotator::scan`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub flagged_count: usize,
}

/// Actions offered by an open tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipAction {
    SearchWeb,
    SearchReferences,
    Close,
}

/// Flags unsupported sentences in one document and manages their highlights
pub struct Annotator<D: HostDocument, H: ClaimHeuristic = CueWordHeuristic> {
    document: D,
    heuristic: H,
    detector: SentenceDetector,
    config: AnnotatorConfig,
    search: Option<SearchChannel>,
    overlay: OverlayState,
    highlights: Vec<Highlight>,
    flags: Vec<Flag>,
    generation: u64,
}

impl<D: HostDocument> Annotator<D> {
    /// Annotator with the default cue-word heuristic
    pub fn new(document: D, config: AnnotatorConfig) -> Result<Self> {
        config.validate()?;
        let heuristic = CueWordHeuristic::from_config(&config)?;
        Ok(Self::with_heuristic(document, config, heuristic))
    }
}

impl<D: HostDocument, H: ClaimHeuristic> Annotator<D, H> {
    /// Annotator with a caller-supplied heuristic
    pub fn with_heuristic(document: D, config: AnnotatorConfig, heuristic: H) -> Self {
        Self {
            document,
            heuristic,
            detector: SentenceDetector::with_default_rules(),
            config,
            search: None,
            overlay: OverlayState::default(),
            highlights: Vec::new(),
            flags: Vec::new(),
            generation: 0,
        }
    }

    /// Route tooltip searches to a dispatcher
    pub fn with_search_channel(mut self, channel: SearchChannel) -> Self {
        self.search = Some(channel);
        self
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Sentences flagged by the most recent scan
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Highlights produced by the most recent scan
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    /// Remove every highlight and auxiliary element. Idempotent.
    pub fn clear(&mut self) {
        let class = &self.config.highlight_class;
        let mut unwrapped = 0;

        for block in self.document.elements_by_tag(&self.config.block_tag) {
            let Some(markup) = self.document.inner_html(block) else {
                continue;
            };
            if !has_highlights(&markup, class) {
                continue;
            }
            let restored = unwrap_highlights(&markup, class);
            match self.document.set_inner_html(block, restored) {
                Ok(()) => unwrapped += 1,
                Err(e) => warn!("Failed to unwrap highlights in block {}: {:#}", block.0, e),
            }
        }

        self.overlay.reset(&mut self.document);
        self.highlights.clear();
        self.flags.clear();

        debug!("Cleared highlights from {} blocks", unwrapped);
    }

    /// Flag sentences in every block and highlight them
    pub fn scan(&mut self) -> ScanResult {
        self.clear();
        self.generation += 1;

        let blocks = self.document.elements_by_tag(&self.config.block_tag);
        let mut counter = 0u64;

        for block in &blocks {
            self.scan_block(*block, &mut counter);
        }

        for highlight in &self.highlights {
            self.document.bind_click(&highlight.id);
        }

        let flagged_count = self.flags.len();
        self.update_summary(flagged_count);

        info!(
            blocks = blocks.len(),
            flagged = flagged_count,
            highlights = self.highlights.len(),
            "Scan complete"
        );
        ScanResult { flagged_count }
    }

    fn next_id(prefix: &str, generation: u64, counter: &mut u64) -> String {
        *counter += 1;
        format!("{prefix}-{generation}-{counter}")
    }

    fn scan_block(&mut self, block: ElementId, counter: &mut u64) {
        let (Some(markup), Some(text)) = (
            self.document.inner_html(block),
            self.document.text_content(block),
        ) else {
            debug!("Skipping block {} without markup", block.0);
            return;
        };

        let class = self.config.highlight_class.clone();
        let prefix = self.config.id_prefix.clone();
        let generation = self.generation;
        let first_highlight = self.highlights.len();

        // Markers are surfaced whether or not any sentence gets flagged
        let (mut html, markers) = wrap_all_markers(
            &markup,
            &self.heuristic.patterns().citation_marker,
            &class,
            || Self::next_id(&prefix, generation, counter),
        );
        for (id, matched) in markers {
            self.highlights.push(Highlight {
                id,
                block,
                text: matched,
                kind: HighlightKind::Marker,
            });
        }

        let view = self.heuristic.inspect_block(&text, &markup);
        let block_needs_citation = mentions_citation_needed(&text);

        for sentence in self.detector.detect_sentences(&text) {
            let trimmed = sentence.trimmed();

            let needs_heuristic = self.heuristic.is_likely_unsupported(trimmed);
            let has_reference = self.heuristic.has_nearby_reference(&view, trimmed);
            let explicit_marker = block_needs_citation && text.contains(trimmed);

            let reason = if explicit_marker {
                FlagReason::ExplicitMarker
            } else if needs_heuristic && !has_reference {
                FlagReason::Heuristic
            } else {
                continue;
            };

            let id = Self::next_id(&prefix, generation, counter);
            let highlight_id = match wrap_first_occurrence(&html, trimmed, &class, &id) {
                Some(wrapped) => {
                    html = wrapped;
                    self.highlights.push(Highlight {
                        id: id.clone(),
                        block,
                        text: trimmed.to_string(),
                        kind: HighlightKind::Sentence,
                    });
                    Some(id)
                }
                None => {
                    debug!("Flagged sentence not found in block {} markup", block.0);
                    None
                }
            };

            debug!(?reason, sentence = trimmed, "Flagged sentence");
            self.flags.push(Flag {
                block,
                sentence: trimmed.to_string(),
                reason,
                highlight_id,
            });
        }

        // Keep highlights in document order so the first one is the topmost wrapper
        self.highlights[first_highlight..]
            .sort_by_cached_key(|h| html.find(&format!(r#"data-wsh-id="{}""#, h.id)));

        if html != markup {
            if let Err(e) = self.document.set_inner_html(block, html) {
                warn!("Failed to write highlights to block {}: {:#}", block.0, e);
                self.highlights.retain(|h| h.block != block);
                for flag in self.flags.iter_mut().filter(|f| f.block == block) {
                    flag.highlight_id = None;
                }
            }
        }
    }

    fn update_summary(&mut self, flagged_count: usize) {
        if flagged_count == 0 {
            self.overlay.hide_summary(&mut self.document);
            return;
        }

        let on_reference_host = self
            .document
            .hostname()
            .contains(self.config.reference_host_suffix.as_str());
        let text = overlay::banner_text(flagged_count, on_reference_host);
        self.overlay
            .show_banner(&mut self.document, text, self.config.banner_offset_px);

        let anchor = self
            .highlights
            .iter()
            .find_map(|h| self.document.highlight_rect(&h.id));
        if let Some(rect) = anchor {
            let (scroll_x, scroll_y) = self.document.scroll_offset();
            let offset = self.config.indicator_offset_px;
            self.overlay.place_indicator(
                &mut self.document,
                scroll_x + rect.left - offset,
                scroll_y + rect.top - offset,
            );
        }
    }

    /// Click handler of a highlight: open its tooltip, replacing any other
    pub fn activate(&mut self, highlight_id: &str) -> Option<&TooltipState> {
        let highlight = self.highlights.iter().find(|h| h.id == highlight_id)?;
        let sentence = highlight.text.trim().to_string();

        let position = match self.document.highlight_rect(highlight_id) {
            Some(rect) => (rect.right() + self.config.tooltip_gap_px, rect.top),
            None => (0.0, 0.0),
        };
        let preview = escape_html(&overlay::preview_text(&sentence, self.config.preview_chars));

        Some(self.overlay.open_tooltip(
            &mut self.document,
            highlight_id.to_string(),
            sentence,
            preview,
            position,
        ))
    }

    /// Run a tooltip action; false when no tooltip is open
    pub fn tooltip_action(&mut self, action: TooltipAction) -> bool {
        let Some(tooltip) = self.overlay.close_tooltip(&mut self.document) else {
            return false;
        };

        let target = match action {
            TooltipAction::SearchWeb => SearchTarget::Web,
            TooltipAction::SearchReferences => SearchTarget::ReferenceSource,
            TooltipAction::Close => return true,
        };

        let url = search_url(&self.config.search, target, &tooltip.sentence);
        match &self.search {
            Some(channel) => {
                debug!(url = %url, "Requesting search tab");
                // Fire and forget; the ack is not awaited
                let _ = channel.send(SearchRequest::OpenSearch { url });
            }
            None => warn!("No search channel configured; dropping search for {}", url),
        }
        true
    }

    /// Serve a command from the external trigger
    pub fn handle_command(&mut self, command: Command) -> Response {
        match command {
            Command::ScanPage => Response::Scanned {
                count: self.scan().flagged_count,
            },
            Command::ClearHighlights => {
                self.clear();
                Response::Cleared
            }
        }
    }

    /// JSON form of `handle_command`; unknown messages get no reply
    pub fn handle_message(&mut self, message: &str) -> Option<String> {
        let command = Command::parse(message)?;
        let response = self.handle_command(command);
        serde_json::to_string(&response).ok()
    }
}
