// Article snippets shared by integration tests

/// Wikipedia-style article body: referenced, unreferenced and marked paragraphs
pub const ARTICLE_HTML: &str = r##"<!DOCTYPE html>
<html>
<head><title>Example article</title></head>
<body>
<h1 id="firstHeading">Example</h1>
<p>The town was founded in 1821 by settlers.<sup class="reference"><a href="#cite_note-1">[1]</a></sup></p>
<p>According to a 2019 survey, 64% of residents own a bicycle. The river is wide.</p>
<p>Local lore says the bridge is haunted.<sup class="noprint"><i><a href="/wiki/Citation_needed">[citation needed]</a></i></sup></p>
<p>Short one.</p>
</body>
</html>
"##;

/// Block with two identical flagged sentences
pub const REPEATED_SENTENCE: &str =
    "Studies found 12 new species. Studies found 12 new species.";

/// Block with markup interleaved with sentence text
pub const MIXED_MARKUP: &str =
    r#"<b>Note:</b> researchers estimated 5,000 visitors. <a href="/wiki/Bridge">Bridge</a> opened."#;
