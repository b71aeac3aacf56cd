// WHY: All tunables of the flagging heuristic and the overlay in one serde record
// so a host can load them from TOML without touching the traversal logic

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Search endpoints used by the tooltip actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Prefix for the quoted web search; the encoded query is appended
    pub web_search_base: String,
    /// Prefix for the reference-source search; the encoded query is appended
    pub reference_search_base: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            web_search_base: "https://www.google.com/search?q=".to_string(),
            reference_search_base: "https://en.wikipedia.org/w/index.php?search=".to_string(),
        }
    }
}

/// Configuration for a single annotator instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Tag name of paragraph-level blocks to scan
    pub block_tag: String,
    /// Class carried by every highlight wrapper
    pub highlight_class: String,
    /// Prefix of generated highlight ids
    pub id_prefix: String,
    /// Sentences must be strictly longer than this (in characters) to trip the heuristic
    pub min_sentence_chars: usize,
    /// Characters inspected before a sentence when looking for `[n]` references
    pub reference_window_before: usize,
    /// Characters inspected past the sentence length when looking for `[n]` references
    pub reference_window_after: usize,
    /// CSS selector of structural citation elements inside a block
    pub structural_marker_selector: String,
    /// Host name fragment that switches the banner to its article wording
    pub reference_host_suffix: String,
    /// Content offset applied while the banner is shown
    pub banner_offset_px: u32,
    /// Distance of the floating indicator from the first highlight's corner
    pub indicator_offset_px: f64,
    /// Gap between a highlight's right edge and its tooltip
    pub tooltip_gap_px: f64,
    /// Characters of the sentence shown in the tooltip preview
    pub preview_chars: usize,
    pub search: SearchConfig,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            block_tag: "p".to_string(),
            highlight_class: "wsh-highlight".to_string(),
            id_prefix: "wsh".to_string(),
            min_sentence_chars: 20,
            reference_window_before: 40,
            reference_window_after: 80,
            structural_marker_selector: "sup.reference".to_string(),
            reference_host_suffix: "wikipedia.org".to_string(),
            banner_offset_px: 50,
            indicator_offset_px: 36.0,
            tooltip_gap_px: 8.0,
            preview_chars: 180,
            search: SearchConfig::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Parse configuration from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid annotator configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading annotator configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Reject values that would make scanning meaningless
    pub fn validate(&self) -> Result<()> {
        if self.block_tag.trim().is_empty() {
            bail!("block_tag must not be empty");
        }
        if self.highlight_class.trim().is_empty() || self.highlight_class.contains('"') {
            bail!("highlight_class must be a non-empty attribute-safe class name");
        }
        if self.id_prefix.contains('"') {
            bail!("id_prefix must not contain quotes");
        }
        if self.preview_chars == 0 {
            bail!("preview_chars must be greater than zero");
        }
        Ok(())
    }
}
