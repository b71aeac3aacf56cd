// WHY: Every pattern the flagger uses is compiled once per annotator
// Uses regex-automata meta regex, the same engine the sentence tooling relies on

use anyhow::{Context, Result};
use regex_automata::meta::Regex;
use tracing::debug;

/// Integer of 1-4 digits, thousands-grouped number, percentage, or a year in 1800-2099
pub const NUMBER_PATTERN: &str = r"(\d{1,4}|\b\d{1,3}(?:,\d{3})+\b|\b\d+%|\b(18|19|20)\d{2}\b)";

/// Cue vocabulary associated with unsupported factual claims
pub const CUE_PATTERN: &str =
    r"(?i)\b(study|studies|research|reported|found|estimated|estimate|survey|according to|percent|%)\b";

/// Inline bracketed numeric reference such as `[12]`
pub const BRACKET_REFERENCE_PATTERN: &str = r"\[\d+\]";

/// Literal marker emitted by editors for a known-missing citation
pub const CITATION_MARKER_PATTERN: &str = r"(?i)\[citation needed\]";

/// Phrase whose presence in a block means a citation is known to be missing
pub const CITATION_NEEDED_PHRASE: &str = "citation needed";

/// Compiled pattern set shared by the heuristic and the markup rewriter
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub number: Regex,
    pub cue: Regex,
    pub bracket_reference: Regex,
    pub citation_marker: Regex,
}

impl PatternSet {
    pub fn compile() -> Result<Self> {
        debug!("Compiling citation heuristic patterns");
        Ok(Self {
            number: Regex::new(NUMBER_PATTERN).context("number pattern")?,
            cue: Regex::new(CUE_PATTERN).context("cue word pattern")?,
            bracket_reference: Regex::new(BRACKET_REFERENCE_PATTERN)
                .context("bracket reference pattern")?,
            citation_marker: Regex::new(CITATION_MARKER_PATTERN)
                .context("citation marker pattern")?,
        })
    }

    /// True if the text mentions a number or a cue word
    pub fn has_claim_signal(&self, text: &str) -> bool {
        self.number.is_match(text) || self.cue.is_match(text)
    }
}

/// Case-insensitive check for the "citation needed" phrase
pub fn mentions_citation_needed(text: &str) -> bool {
    text.to_lowercase().contains(CITATION_NEEDED_PHRASE)
}
