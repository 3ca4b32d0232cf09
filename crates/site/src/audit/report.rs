// ABOUTME: Per-document accessibility report filled in by the scanner.
// ABOUTME: Holds landmark/heading/paragraph/image/button/skip-link observations for one page.

use serde::{Deserialize, Serialize};

/// Recorded in place of an image source when `src` is absent or blank.
pub const NO_SRC: &str = "(no src)";

/// Structural accessibility observations for one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// A `<main id="main-content">` element was seen.
    pub has_main_landmark: bool,
    /// Number of `<h1>` start tags.
    pub heading_count: usize,
    /// Character length of each non-empty paragraph, in document order.
    pub paragraph_lengths: Vec<usize>,
    /// `src` of each `<img>` without an `alt` attribute.
    pub images_missing_alt_sources: Vec<String>,
    /// Buttons with neither visible text nor an ARIA label.
    pub icon_only_buttons_missing_label: usize,
    /// A skip link targeting `#main-content` was seen.
    pub has_skip_link: bool,
}

impl DocumentReport {
    /// Mean paragraph length, or 0.0 when the page has no paragraphs.
    pub fn average_paragraph_length(&self) -> f64 {
        if self.paragraph_lengths.is_empty() {
            return 0.0;
        }
        let total: usize = self.paragraph_lengths.iter().sum();
        total as f64 / self.paragraph_lengths.len() as f64
    }

    pub fn missing_alt_count(&self) -> usize {
        self.images_missing_alt_sources.len()
    }
}
