// WHY: Naive terminal-punctuation segmentation of block text
// Not grammar aware; abbreviations and decimals split sentences on purpose

/// Configuration for sentence boundary detection rules
#[derive(Debug, Clone)]
pub struct SentenceBoundaryRules {
    /// End punctuation characters that terminate a sentence
    pub end_punctuation: Vec<char>,
}

impl Default for SentenceBoundaryRules {
    fn default() -> Self {
        Self {
            end_punctuation: vec!['.', '!', '?'],
        }
    }
}

/// A sentence borrowed from a block's plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub index: usize,
    /// Raw slice including leading whitespace and trailing punctuation
    pub raw_content: &'a str,
    /// Byte offset of `raw_content` in the block text
    pub start: usize,
    /// Byte offset one past the end of `raw_content`
    pub end: usize,
}

impl<'a> Sentence<'a> {
    /// Get raw content without trimming
    pub fn raw(&self) -> &'a str {
        self.raw_content
    }

    /// Content with surrounding whitespace removed
    pub fn trimmed(&self) -> &'a str {
        self.raw_content.trim()
    }
}

/// Splits block text into sentences
#[derive(Debug, Clone, Default)]
pub struct SentenceDetector {
    rules: SentenceBoundaryRules,
}

impl SentenceDetector {
    /// Create new sentence detector with custom rules
    pub fn new(rules: SentenceBoundaryRules) -> Self {
        Self { rules }
    }

    /// Create sentence detector with default rules
    pub fn with_default_rules() -> Self {
        Self::new(SentenceBoundaryRules::default())
    }

    fn is_terminal(&self, ch: char) -> bool {
        self.rules.end_punctuation.contains(&ch)
    }

    /// Detect sentences as maximal runs of non-terminal characters followed by
    /// at most one terminal character.
    ///
    /// Terminal characters that cannot open a sentence (`"Wow!!"` second `!`)
    /// are skipped, and whitespace-only runs are discarded.
    pub fn detect_sentences<'a>(&self, text: &'a str) -> Vec<Sentence<'a>> {
        let mut sentences = Vec::new();
        let mut chars = text.char_indices().peekable();

        while let Some(&(start, ch)) = chars.peek() {
            if self.is_terminal(ch) {
                chars.next();
                continue;
            }

            let mut end = text.len();
            while let Some(&(pos, ch)) = chars.peek() {
                if self.is_terminal(ch) {
                    chars.next();
                    end = pos + ch.len_utf8();
                    break;
                }
                chars.next();
                end = chars.peek().map_or(text.len(), |&(next, _)| next);
            }

            let raw_content = &text[start..end];
            if !raw_content.trim().is_empty() {
                sentences.push(Sentence {
                    index: sentences.len(),
                    raw_content,
                    start,
                    end,
                });
            }
        }

        sentences
    }
}
