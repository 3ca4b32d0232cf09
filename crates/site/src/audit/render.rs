// ABOUTME: Renders a UiAudit as the markdown report or as pretty JSON.
// ABOUTME: Markdown layout is fixed: summary, errors, warnings, with "- None" for empty lists.

use serde::Serialize;

use super::findings::{Finding, Severity};
use super::{PageAudit, UiAudit, UiSummary};
use crate::error::Result;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: UiSummary,
    has_errors: bool,
    errors: Vec<&'a Finding>,
    warnings: Vec<&'a Finding>,
    pages: &'a [PageAudit],
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[&Finding]) {
    lines.push(format!("## {}", title));
    if items.is_empty() {
        lines.push("- None".to_string());
    } else {
        lines.extend(items.iter().map(|f| format!("- {}", f)));
    }
    lines.push(String::new());
}

impl UiAudit {
    /// The markdown report. Ends with a newline.
    pub fn render_markdown(&self) -> String {
        let summary = self.summary();
        let findings = self.findings();
        let (errors, warnings): (Vec<&Finding>, Vec<&Finding>) =
            findings.iter().partition(|f| f.severity == Severity::Error);

        let mut lines = vec![
            "# UI Audit Report".to_string(),
            String::new(),
            "## Summary".to_string(),
            format!("- Files scanned: {}", summary.files_scanned),
            format!("- Missing #main-content: {}", summary.missing_main),
            format!("- Pages with invalid h1 count: {}", summary.invalid_h1_count),
            format!("- Images missing alt: {}", summary.images_missing_alt),
            format!(
                "- Icon-only buttons missing aria-label: {}",
                summary.icon_buttons_missing_label
            ),
            format!("- Pages missing skip link: {}", summary.missing_skip_link),
            format!(
                "- Pages with avg paragraph length > 95ch: {}",
                summary.long_paragraphs
            ),
            String::new(),
        ];
        push_section(&mut lines, "Errors", &errors);
        push_section(&mut lines, "Warnings", &warnings);

        lines.join("\n")
    }

    /// Pretty-printed JSON with the summary, findings and per-page reports.
    pub fn render_json(&self) -> Result<String> {
        let findings = self.findings();
        let (errors, warnings): (Vec<&Finding>, Vec<&Finding>) =
            findings.iter().partition(|f| f.is_error());

        let doc = JsonReport {
            summary: self.summary(),
            has_errors: self.has_errors(),
            errors,
            warnings,
            pages: &self.pages,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}
