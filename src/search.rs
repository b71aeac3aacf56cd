use crate::config::SearchConfig;

/// Where a tooltip search should go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    /// General web search for the exact quoted sentence
    Web,
    /// Search of the reference source (Wikipedia by default)
    ReferenceSource,
}

/// Build the search URL for a sentence
pub fn search_url(config: &SearchConfig, target: SearchTarget, sentence: &str) -> String {
    match target {
        SearchTarget::Web => {
            let quoted = format!("\"{sentence}\"");
            format!("{}{}", config.web_search_base, urlencoding::encode(&quoted))
        }
        SearchTarget::ReferenceSource => format!(
            "{}{}",
            config.reference_search_base,
            urlencoding::encode(sentence)
        ),
    }
}
