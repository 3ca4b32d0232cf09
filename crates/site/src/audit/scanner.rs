// ABOUTME: Single-pass accessibility scanner driven by tokenizer events.
// ABOUTME: Tracks the open paragraph and a stack of open buttons while filling a DocumentReport.

use sitekit_html::{char_len, flatten_chunks, tokenize, Attributes, TagSink};

use super::report::{DocumentReport, NO_SRC};

/// `id` of the main landmark and fragment targeted by the skip link.
pub const MAIN_CONTENT_ID: &str = "main-content";
pub const SKIP_LINK_HREF: &str = "#main-content";
pub const SKIP_LINK_CLASS: &str = "skip-link";

/// Scan a document and return its report.
///
/// Every call uses fresh scanner state, so scanning the same input twice
/// gives equal reports.
pub fn scan_document(html: &str) -> DocumentReport {
    let mut scanner = Scanner::new();
    tokenize(html, &mut scanner);
    scanner.finish()
}

/// A `<button>` that has been opened but not yet closed.
#[derive(Debug, Default)]
struct ButtonFrame {
    has_aria_label: bool,
    has_aria_labelledby: bool,
    text: Vec<String>,
}

impl ButtonFrame {
    fn from_attrs(attrs: &Attributes) -> Self {
        Self {
            has_aria_label: !attrs.value("aria-label").is_empty(),
            has_aria_labelledby: !attrs.value("aria-labelledby").is_empty(),
            text: Vec::new(),
        }
    }

    fn has_accessible_name(&self) -> bool {
        self.has_aria_label || self.has_aria_labelledby || !flatten_chunks(&self.text).is_empty()
    }
}

#[derive(Debug, Default)]
struct ParagraphState {
    active: bool,
    text: Vec<String>,
}

/// Streaming consumer of tag events for one document.
///
/// Elements left open at end of input contribute nothing.
#[derive(Debug, Default)]
pub struct Scanner {
    report: DocumentReport,
    paragraph: ParagraphState,
    buttons: Vec<ButtonFrame>,
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the scanner, discarding any still-open elements.
    pub fn finish(self) -> DocumentReport {
        self.report
    }

    fn open_paragraph(&mut self) {
        // a nested <p> restarts the buffer
        self.paragraph = ParagraphState {
            active: true,
            text: Vec::new(),
        };
    }

    fn close_paragraph(&mut self) {
        if !self.paragraph.active {
            return;
        }
        let text = flatten_chunks(&self.paragraph.text);
        if !text.is_empty() {
            self.report.paragraph_lengths.push(char_len(&text));
        }
        self.paragraph = ParagraphState::default();
    }

    fn record_image(&mut self, attrs: &Attributes) {
        if attrs.contains("alt") {
            return;
        }
        let src = attrs.value("src").trim();
        let src = if src.is_empty() { NO_SRC } else { src };
        self.report.images_missing_alt_sources.push(src.to_string());
    }

    fn close_button(&mut self) {
        if let Some(frame) = self.buttons.pop() {
            if !frame.has_accessible_name() {
                self.report.icon_only_buttons_missing_label += 1;
            }
        }
    }
}

fn is_skip_link(attrs: &Attributes) -> bool {
    attrs.value("href") == SKIP_LINK_HREF
        && attrs
            .value("class")
            .split_whitespace()
            .any(|class| class == SKIP_LINK_CLASS)
}

impl TagSink for Scanner {
    fn start_tag(&mut self, name: &str, attrs: &Attributes) {
        match name {
            "main" if attrs.get("id") == Some(MAIN_CONTENT_ID) => {
                self.report.has_main_landmark = true;
            }
            "h1" => self.report.heading_count += 1,
            "p" => self.open_paragraph(),
            "img" => self.record_image(attrs),
            "button" => self.buttons.push(ButtonFrame::from_attrs(attrs)),
            "a" if is_skip_link(attrs) => self.report.has_skip_link = true,
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "p" => self.close_paragraph(),
            "button" => self.close_button(),
            _ => {}
        }
    }

    fn text(&mut self, chunk: &str) {
        if self.paragraph.active {
            self.paragraph.text.push(chunk.to_string());
        }
        if let Some(frame) = self.buttons.last_mut() {
            frame.text.push(chunk.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document() {
        let report = scan_document("");
        assert_eq!(report, DocumentReport::default());
        assert_eq!(report.average_paragraph_length(), 0.0);
    }

    #[test]
    fn test_main_landmark() {
        assert!(scan_document(r#"<main id="main-content"></main>"#).has_main_landmark);
        assert!(!scan_document(r#"<main id="content"></main>"#).has_main_landmark);
        assert!(!scan_document(r#"<div id="main-content"></div>"#).has_main_landmark);
        assert!(
            scan_document(r#"<main id="x"></main><main id="main-content"></main>"#)
                .has_main_landmark
        );
    }

    #[test]
    fn test_every_h1_counts() {
        assert_eq!(scan_document("<p>no headings</p>").heading_count, 0);
        assert_eq!(scan_document("<h1>a</h1>").heading_count, 1);
        assert_eq!(
            scan_document("<h1>a</h1><section><h1>b</h1></section><H1>c</H1>").heading_count,
            3
        );
        assert_eq!(scan_document("<h2>sub</h2>").heading_count, 0);
    }

    #[test]
    fn test_paragraph_whitespace_collapsed() {
        let report = scan_document("<p>  hello   world  </p>");
        assert_eq!(report.paragraph_lengths, vec![11]);
    }

    #[test]
    fn test_paragraph_includes_inline_text() {
        let report = scan_document("<p>Read <a href=\"/x\">the <b>docs</b></a>\n now.</p>");
        assert_eq!(report.paragraph_lengths, vec!["Read the docs now.".len()]);
    }

    #[test]
    fn test_empty_paragraphs_skipped() {
        let report = scan_document("<p>   </p><p></p><p>ok</p>");
        assert_eq!(report.paragraph_lengths, vec![2]);
    }

    #[test]
    fn test_paragraph_length_counts_chars() {
        let report = scan_document("<p>café</p><p>&amp;</p>");
        assert_eq!(report.paragraph_lengths, vec![4, 1]);
    }

    #[test]
    fn test_nested_paragraph_resets_buffer() {
        let report = scan_document("<p>outer <p>inner</p> tail</p>");
        assert_eq!(report.paragraph_lengths, vec![5]);
    }

    #[test]
    fn test_unclosed_paragraph_not_flushed() {
        let report = scan_document("<p>never closed");
        assert!(report.paragraph_lengths.is_empty());
    }

    #[test]
    fn test_image_alt_presence() {
        let report = scan_document(r#"<img src="a.png">"#);
        assert_eq!(report.images_missing_alt_sources, vec!["a.png"]);

        let report = scan_document(r#"<img alt="" src="a.png">"#);
        assert!(report.images_missing_alt_sources.is_empty());

        let report = scan_document(r#"<img alt src="a.png">"#);
        assert!(report.images_missing_alt_sources.is_empty());
    }

    #[test]
    fn test_image_without_src_uses_sentinel() {
        let report = scan_document(r#"<img><img src="   "><img src=" b.png ">"#);
        assert_eq!(
            report.images_missing_alt_sources,
            vec![NO_SRC, NO_SRC, "b.png"]
        );
    }

    #[test]
    fn test_labelled_buttons() {
        assert_eq!(
            scan_document(r#"<button aria-label="Close"></button>"#)
                .icon_only_buttons_missing_label,
            0
        );
        assert_eq!(
            scan_document(r#"<button aria-labelledby="t"><svg/></button>"#)
                .icon_only_buttons_missing_label,
            0
        );
        assert_eq!(
            scan_document("<button> <span>Save</span> </button>").icon_only_buttons_missing_label,
            0
        );
    }

    #[test]
    fn test_icon_only_button_counted() {
        assert_eq!(
            scan_document("<button><svg/></button>").icon_only_buttons_missing_label,
            1
        );
        assert_eq!(
            scan_document(r#"<button aria-label=""> </button>"#).icon_only_buttons_missing_label,
            1
        );
    }

    #[test]
    fn test_nested_button_text_goes_to_innermost() {
        // the inner button takes "x"; the outer one sees no text of its own
        let report = scan_document("<button><button>x</button></button>");
        assert_eq!(report.icon_only_buttons_missing_label, 1);
    }

    #[test]
    fn test_unmatched_end_tags_ignored() {
        let report = scan_document("</button></p><p>ok</p>");
        assert_eq!(report.icon_only_buttons_missing_label, 0);
        assert_eq!(report.paragraph_lengths, vec![2]);
    }

    #[test]
    fn test_unclosed_button_not_counted() {
        assert_eq!(
            scan_document("<button><svg/>").icon_only_buttons_missing_label,
            0
        );
    }

    #[test]
    fn test_text_feeds_paragraph_and_button() {
        let report = scan_document("<p>Press <button>Go</button> now</p>");
        assert_eq!(report.paragraph_lengths, vec!["Press Go now".len()]);
        assert_eq!(report.icon_only_buttons_missing_label, 0);
    }

    #[test]
    fn test_skip_link() {
        assert!(
            scan_document(r##"<a href="#main-content" class="skip-link nav">Skip</a>"##)
                .has_skip_link
        );
        assert!(
            !scan_document(r##"<a href="#content" class="skip-link nav">Skip</a>"##)
                .has_skip_link
        );
        assert!(
            !scan_document(r##"<a href="#main-content" class="skip-links">Skip</a>"##)
                .has_skip_link
        );
        assert!(!scan_document(r##"<a href="#main-content">Skip</a>"##).has_skip_link);
    }

    #[test]
    fn test_attribute_names_case_insensitive() {
        let report = scan_document(r##"<MAIN ID="main-content"><IMG SRC="x.png" ALT=""></MAIN>"##);
        assert!(report.has_main_landmark);
        assert!(report.images_missing_alt_sources.is_empty());
    }

    #[test]
    fn test_scan_is_idempotent() {
        let html = r##"<a class="skip-link" href="#main-content">Skip</a>
<main id="main-content"><h1>T</h1><p>Some text</p><img src="a.png"><button></button></main>"##;
        assert_eq!(scan_document(html), scan_document(html));
    }

    #[test]
    fn test_scanner_fed_directly() {
        let mut scanner = Scanner::new();
        tokenize("<h1>a</h1><p>b", &mut scanner);
        let report = scanner.finish();
        assert_eq!(report.heading_count, 1);
        assert!(report.paragraph_lengths.is_empty());
    }

    #[test]
    fn test_paragraph_length_counts_decoded_entities() {
        assert_eq!(scan_document("<p>Caf&eacute;</p>").paragraph_lengths, vec![4]);
        assert_eq!(scan_document("<p>&copy 2024</p>").paragraph_lengths, vec![6]);
        assert_eq!(
            scan_document("<p>Caf&eacute; cr&egrave;me</p>").paragraph_lengths,
            vec![10]
        );
        assert_eq!(scan_document("<p>Fish &amp chips</p>").paragraph_lengths, vec![12]);
        assert_eq!(scan_document("<p>a &ne; b &rarr; c</p>").paragraph_lengths, vec![9]);
    }

    #[test]
    fn test_unclosed_attribute_quote_keeps_scanning() {
        let report = scan_document(r#"<main id="main-content"><img alt="oops></main><h1>T</h1>"#);
        assert!(report.has_main_landmark);
        assert!(report.images_missing_alt_sources.is_empty());
        assert_eq!(report.heading_count, 1);
    }
}
