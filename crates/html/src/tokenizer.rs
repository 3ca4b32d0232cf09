// ABOUTME: Tolerant streaming HTML tokenizer that reports tags and text to a TagSink.
// ABOUTME: Single forward pass, no tree construction; malformed markup degrades to text or is skipped.

use crate::entities::decode_entities;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

/// Elements whose content is raw text up to the matching close tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Attributes of a start tag, in source order.
///
/// Names are stored lowercased. Lookups return the last occurrence of a
/// repeated attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute, lowercasing its name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let mut name = name.into();
        name.make_ascii_lowercase();
        self.entries.push((name, value.into()));
    }

    /// Value of `name`, if the attribute is present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Value of `name`, or the empty string when absent.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// True when the attribute key is present, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.push(name, value);
        }
        attrs
    }
}

/// Receiver of tokenizer events, called in document order.
pub trait TagSink {
    /// A start tag. `name` is lowercased.
    fn start_tag(&mut self, name: &str, attrs: &Attributes);

    /// An end tag, or the implicit close of a self-closing `<x/>` tag.
    fn end_tag(&mut self, name: &str);

    /// A run of character data with entity references decoded.
    fn text(&mut self, chunk: &str);
}

/// An owned tokenizer event, for callers that want the event list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Start { name: String, attrs: Attributes },
    End(String),
    Text(String),
}

impl TagSink for Vec<TagEvent> {
    fn start_tag(&mut self, name: &str, attrs: &Attributes) {
        self.push(TagEvent::Start {
            name: name.to_string(),
            attrs: attrs.clone(),
        });
    }

    fn end_tag(&mut self, name: &str) {
        self.push(TagEvent::End(name.to_string()));
    }

    fn text(&mut self, chunk: &str) {
        self.push(TagEvent::Text(chunk.to_string()));
    }
}

/// Collects every event of `input` into a vector.
pub fn events(input: &str) -> Vec<TagEvent> {
    let mut out = Vec::new();
    tokenize(input, &mut out);
    out
}

/// Tokenizes `input`, reporting tags and text to `sink`.
///
/// Comments, doctypes and processing instructions produce no events. The
/// contents of `<script>` and `<style>` are reported verbatim as a single
/// text chunk. A tag left open at end of input is reported as text.
pub fn tokenize<S: TagSink + ?Sized>(input: &str, sink: &mut S) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    // Slices are only cut at ASCII structural bytes, so every endpoint is a
    // char boundary.
    while i < len {
        if bytes[i] != b'<' {
            let start = i;
            while i < len && bytes[i] != b'<' {
                i += 1;
            }
            emit_text(sink, &input[start..i]);
            continue;
        }

        let rest = &input[i..];

        if rest.starts_with(COMMENT_START) {
            match rest[COMMENT_START.len()..].find(COMMENT_END) {
                Some(end) => {
                    i += COMMENT_START.len() + end + COMMENT_END.len();
                    continue;
                }
                // an unterminated comment swallows the remainder
                None => break,
            }
        }

        match bytes.get(i + 1) {
            Some(b'!') | Some(b'?') => match rest.find('>') {
                Some(end) => i += end + 1,
                None => break,
            },
            Some(b'/') => match rest.find('>') {
                Some(end) => {
                    let name = tag_name(&rest[2..end]);
                    if !name.is_empty() {
                        sink.end_tag(&name);
                    }
                    i += end + 1;
                }
                None => {
                    emit_text(sink, rest);
                    break;
                }
            },
            Some(c) if c.is_ascii_alphabetic() => match parse_start_tag(input, i) {
                Some(tag) => {
                    sink.start_tag(&tag.name, &tag.attrs);
                    i = tag.end;

                    if tag.self_closing {
                        sink.end_tag(&tag.name);
                    } else if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                        i = consume_raw_text(input, i, &tag.name, sink);
                    }
                }
                None => {
                    emit_text(sink, rest);
                    break;
                }
            },
            _ => {
                sink.text("<");
                i += 1;
            }
        }
    }
}

struct StartTag {
    name: String,
    attrs: Attributes,
    self_closing: bool,
    /// Byte offset just past the closing `>`.
    end: usize,
}

fn is_tag_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

fn tag_name(raw: &str) -> String {
    let end = raw
        .bytes()
        .position(is_tag_delimiter)
        .unwrap_or(raw.len());
    raw[..end].to_ascii_lowercase()
}

/// Parses the start tag opening at `open` (the `<`). Returns `None` when the
/// tag is not terminated before end of input.
fn parse_start_tag(input: &str, open: usize) -> Option<StartTag> {
    let bytes = input.as_bytes();
    let len = bytes.len();

    let name_start = open + 1;
    let mut k = name_start;
    while k < len && !is_tag_delimiter(bytes[k]) {
        k += 1;
    }
    let name = input[name_start..k].to_ascii_lowercase();

    let mut attrs = Attributes::new();
    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            return None;
        }

        match bytes[k] {
            b'>' => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: false,
                    end: k + 1,
                });
            }
            b'/' if bytes.get(k + 1) == Some(&b'>') => {
                return Some(StartTag {
                    name,
                    attrs,
                    self_closing: true,
                    end: k + 2,
                });
            }
            b'/' | b'=' => {
                k += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = k;
        while k < len && !is_tag_delimiter(bytes[k]) && bytes[k] != b'=' {
            k += 1;
        }
        let attr_name = &input[attr_start..k];

        skip_whitespace(&mut k);
        if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k >= len {
                return None;
            }

            let value = match bytes[k] {
                quote @ (b'"' | b'\'') => {
                    let value_start = k + 1;
                    match input[value_start..].find(quote as char) {
                        Some(close) => {
                            k = value_start + close + 1;
                            &input[value_start..value_start + close]
                        }
                        // an unclosed quote runs to the next `>`, which ends the tag
                        None => {
                            k = value_start + input[value_start..].find('>')?;
                            &input[value_start..k]
                        }
                    }
                }
                _ => {
                    let value_start = k;
                    while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                        k += 1;
                    }
                    &input[value_start..k]
                }
            };
            attrs.push(attr_name, decode_entities(value));
        } else {
            attrs.push(attr_name, "");
        }
    }
}

/// Emits the raw content of a `<script>`/`<style>` element starting at
/// `from` and returns the offset of its close tag (or end of input).
fn consume_raw_text<S: TagSink + ?Sized>(input: &str, from: usize, name: &str, sink: &mut S) -> usize {
    let close_tag = format!("</{}", name);
    let end = find_ignore_ascii_case(&input.as_bytes()[from..], close_tag.as_bytes())
        .map(|pos| from + pos)
        .unwrap_or(input.len());

    let raw = &input[from..end];
    if !raw.is_empty() {
        sink.text(raw);
    }
    end
}

// Matches only start at an ASCII `<`, which never occurs inside a UTF-8
// continuation sequence.
fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn emit_text<S: TagSink + ?Sized>(sink: &mut S, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = decode_entities(raw);
    sink.text(&decoded);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attrs: &[(&str, &str)]) -> TagEvent {
        TagEvent::Start {
            name: name.to_string(),
            attrs: attrs.iter().copied().collect(),
        }
    }

    fn end(name: &str) -> TagEvent {
        TagEvent::End(name.to_string())
    }

    fn text(s: &str) -> TagEvent {
        TagEvent::Text(s.to_string())
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            events("<p>Hello</p>"),
            vec![start("p", &[]), text("Hello"), end("p")]
        );
    }

    #[test]
    fn test_tag_and_attribute_names_lowercased() {
        assert_eq!(
            events(r#"<MAIN ID="main-content"></Main>"#),
            vec![start("main", &[("id", "main-content")]), end("main")]
        );
    }

    #[test]
    fn test_attribute_value_forms() {
        let evs = events(r#"<img src='a.png' alt="" data-x=plain hidden>"#);
        assert_eq!(
            evs,
            vec![start(
                "img",
                &[("src", "a.png"), ("alt", ""), ("data-x", "plain"), ("hidden", "")]
            )]
        );
    }

    #[test]
    fn test_quoted_value_may_contain_gt() {
        assert_eq!(
            events(r#"<a title="a > b">x</a>"#),
            vec![start("a", &[("title", "a > b")]), text("x"), end("a")]
        );
    }

    #[test]
    fn test_entities_decoded_in_text_and_attributes() {
        assert_eq!(
            events(r#"<a href="?a=1&amp;b=2">Tom &amp; Jerry</a>"#),
            vec![
                start("a", &[("href", "?a=1&b=2")]),
                text("Tom & Jerry"),
                end("a")
            ]
        );
    }

    #[test]
    fn test_legacy_entities_decoded_once() {
        assert_eq!(
            events(r#"<img alt="&copy 2024 &amp;amp;"><p>Fish &amp chips &eacute;t&eacute;</p>"#),
            vec![
                start("img", &[("alt", "© 2024 &amp;")]),
                start("p", &[]),
                text("Fish & chips été"),
                end("p")
            ]
        );
    }

    #[test]
    fn test_self_closing_emits_start_and_end() {
        assert_eq!(
            events("<button><svg/></button>"),
            vec![start("button", &[]), start("svg", &[]), end("svg"), end("button")]
        );
    }

    #[test]
    fn test_comments_and_doctype_skipped() {
        assert_eq!(
            events("<!DOCTYPE html><!-- <p>hidden</p> --><?xml x?><p>shown</p>"),
            vec![start("p", &[]), text("shown"), end("p")]
        );
    }

    #[test]
    fn test_script_content_is_raw() {
        assert_eq!(
            events("<script>if (a < b) { x = '&amp;'; }</SCRIPT>"),
            vec![
                start("script", &[]),
                text("if (a < b) { x = '&amp;'; }"),
                end("script")
            ]
        );
    }

    #[test]
    fn test_stray_lt_is_text() {
        assert_eq!(
            events("<p>1 < 2</p>"),
            vec![start("p", &[]), text("1 "), text("<"), text(" 2"), end("p")]
        );
    }

    #[test]
    fn test_unterminated_tag_becomes_text() {
        assert_eq!(
            events("<p>ok</p><img src=\"a.png\""),
            vec![
                start("p", &[]),
                text("ok"),
                end("p"),
                text("<img src=\"a.png\"")
            ]
        );
    }

    #[test]
    fn test_unclosed_quote_ends_at_next_gt() {
        assert_eq!(
            events("<img alt='broken><h1>Title</h1>"),
            vec![
                start("img", &[("alt", "broken")]),
                start("h1", &[]),
                text("Title"),
                end("h1")
            ]
        );
    }

    #[test]
    fn test_unclosed_quote_without_gt_becomes_text() {
        assert_eq!(
            events("<p>ok</p><a href=\"/x"),
            vec![start("p", &[]), text("ok"), end("p"), text("<a href=\"/x")]
        );
    }

    #[test]
    fn test_empty_end_tag_ignored() {
        assert_eq!(events("a</>b"), vec![text("a"), text("b")]);
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let attrs: Attributes = [("id", "one"), ("ID", "two")].into_iter().collect();
        assert_eq!(attrs.get("id"), Some("two"));
    }

    #[test]
    fn test_attribute_lookup_helpers() {
        let attrs: Attributes = [("alt", "")].into_iter().collect();
        assert!(attrs.contains("ALT"));
        assert_eq!(attrs.value("alt"), "");
        assert_eq!(attrs.value("src"), "");
        assert!(!attrs.contains("src"));
    }

    #[test]
    fn test_non_ascii_text_preserved() {
        assert_eq!(
            events("<p>naïve café</p>"),
            vec![start("p", &[]), text("naïve café"), end("p")]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(events("").is_empty());
    }
}
