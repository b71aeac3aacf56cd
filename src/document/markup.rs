// WHY: Highlight wrappers are inserted and removed at the markup level so the
// surrounding structure of a block survives a scan/clear cycle byte for byte

use regex_automata::meta::Regex;

/// Title shown on sentence highlights
pub const SENTENCE_TITLE: &str = "Click to search sources";
/// Title shown on citation marker highlights
pub const MARKER_TITLE: &str = "Missing citation";

/// Escape text for insertion into element content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Opening tag of a highlight wrapper
pub fn highlight_open_tag(class: &str, id: &str, title: &str) -> String {
    format!(r#"<span class="{class}" data-wsh-id="{id}" title="{title}">"#)
}

/// Wrap the first literal occurrence of `sentence` in `markup`.
///
/// The sentence is plain text, so it is searched in its escaped form and
/// never interpreted as a pattern. Returns `None` when it does not occur.
pub fn wrap_first_occurrence(markup: &str, sentence: &str, class: &str, id: &str) -> Option<String> {
    let needle = escape_html(sentence);
    if needle.is_empty() {
        return None;
    }
    let at = markup.find(&needle)?;

    let mut wrapped = String::with_capacity(markup.len() + needle.len() + 96);
    wrapped.push_str(&markup[..at]);
    wrapped.push_str(&highlight_open_tag(class, id, SENTENCE_TITLE));
    wrapped.push_str(&needle);
    wrapped.push_str("</span>");
    wrapped.push_str(&markup[at + needle.len()..]);
    Some(wrapped)
}

/// Wrap every match of `marker` in `markup`; `next_id` yields one id per match.
///
/// Returns the rewritten markup and the `(id, matched text)` of each wrapper.
pub fn wrap_all_markers(
    markup: &str,
    marker: &Regex,
    class: &str,
    mut next_id: impl FnMut() -> String,
) -> (String, Vec<(String, String)>) {
    let mut wrapped = String::with_capacity(markup.len());
    let mut wrappers = Vec::new();
    let mut last = 0;

    for found in marker.find_iter(markup) {
        let id = next_id();
        let matched = &markup[found.start()..found.end()];
        wrapped.push_str(&markup[last..found.start()]);
        wrapped.push_str(&highlight_open_tag(class, &id, MARKER_TITLE));
        wrapped.push_str(matched);
        wrapped.push_str("</span>");
        wrappers.push((id, matched.to_string()));
        last = found.end();
    }
    wrapped.push_str(&markup[last..]);

    (wrapped, wrappers)
}

/// True if the markup carries at least one highlight wrapper of `class`
pub fn has_highlights(markup: &str, class: &str) -> bool {
    markup.contains(&highlight_prefix(class))
}

fn highlight_prefix(class: &str) -> String {
    format!(r#"<span class="{class}""#)
}

/// Replace every highlight wrapper with its content, nested wrappers included.
///
/// Any other markup is kept as is. A wrapper without a matching close tag is
/// left untouched together with the rest of the markup.
pub fn unwrap_highlights(markup: &str, class: &str) -> String {
    let prefix = highlight_prefix(class);
    let mut unwrapped = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(open) = rest.find(&prefix) {
        let Some(tag_len) = rest[open..].find('>') else {
            break;
        };
        let content_start = open + tag_len + 1;
        let Some(content_len) = matching_close(&rest[content_start..]) else {
            break;
        };

        unwrapped.push_str(&rest[..open]);
        unwrapped.push_str(&unwrap_highlights(
            &rest[content_start..content_start + content_len],
            class,
        ));
        rest = &rest[content_start + content_len + "</span>".len()..];
    }

    unwrapped.push_str(rest);
    unwrapped
}

/// Byte length of span content up to the `</span>` closing the already-open span
fn matching_close(content: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = 0;

    while pos < content.len() {
        let tail = &content[pos..];
        let next = tail.find('<')?;
        let tag = &tail[next..];
        if tag.starts_with("</span>") {
            depth -= 1;
            if depth == 0 {
                return Some(pos + next);
            }
            pos += next + "</span>".len();
        } else if tag.starts_with("<span") && tag[5..].starts_with([' ', '>', '\t', '\n']) {
            depth += 1;
            pos += next + 5;
        } else {
            pos += next + 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASS: &str = "wsh-highlight";

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("\"quoted\""), "\"quoted\"");
    }

    #[test]
    fn test_wrap_first_occurrence_only() {
        let markup = "Same line. Same line.";
        let wrapped = wrap_first_occurrence(markup, "Same line.", CLASS, "wsh-1-1").expect("found");
        assert_eq!(
            wrapped,
            r#"<span class="wsh-highlight" data-wsh-id="wsh-1-1" title="Click to search sources">Same line.</span> Same line."#
        );
    }

    #[test]
    fn test_wrap_treats_metacharacters_literally() {
        let markup = "<b>Intro</b> Cost (est.) was $5 [?] * 2.";
        let wrapped = wrap_first_occurrence(markup, "was $5 [?] * 2.", CLASS, "x").expect("found");
        assert!(wrapped.contains(r#"title="Click to search sources">was $5 [?] * 2.</span>"#));
        assert!(wrap_first_occurrence(markup, "not present", CLASS, "x").is_none());
    }

    #[test]
    fn test_wrap_matches_escaped_text() {
        let markup = "Profits &amp; losses rose 5%.";
        let wrapped = wrap_first_occurrence(markup, "Profits & losses rose 5%.", CLASS, "x").expect("found");
        assert_eq!(unwrap_highlights(&wrapped, CLASS), markup);
    }

    #[test]
    fn test_wrap_all_markers_case_insensitive() {
        let marker = Regex::new(r"(?i)\[citation needed\]").unwrap();
        let mut n = 0;
        let (wrapped, wrappers) = wrap_all_markers(
            "A.[citation needed] B.[Citation Needed]",
            &marker,
            CLASS,
            || {
                n += 1;
                format!("m{n}")
            },
        );

        assert_eq!(wrappers.len(), 2);
        assert_eq!(wrappers[1], ("m2".to_string(), "[Citation Needed]".to_string()));
        assert!(wrapped.contains(r#"data-wsh-id="m1" title="Missing citation">[citation needed]</span>"#));
    }

    #[test]
    fn test_unwrap_nested_and_preserves_other_spans() {
        let original = r#"<span class="keep">Kept</span> Before. <i>x</i> [citation needed]"#;
        let marker = Regex::new(r"(?i)\[citation needed\]").unwrap();
        let (with_marker, _) = wrap_all_markers(original, &marker, CLASS, || "m".to_string());
        let nested = wrap_first_occurrence(&with_marker, "[citation needed]", CLASS, "s").expect("found");

        assert!(has_highlights(&nested, CLASS));
        let restored = unwrap_highlights(&nested, CLASS);
        assert_eq!(restored, original);
        assert!(!has_highlights(&restored, CLASS));
    }

    #[test]
    fn test_unwrap_is_noop_without_highlights() {
        let markup = r#"<a href="/x">Link</a> plain <span>text</span>"#;
        assert_eq!(unwrap_highlights(markup, CLASS), markup);
    }

    #[test]
    fn test_unwrap_leaves_unterminated_wrapper() {
        let markup = r#"ok <span class="wsh-highlight" data-wsh-id="a">dangling"#;
        assert_eq!(unwrap_highlights(markup, CLASS), markup);
    }
}
