// ABOUTME: Classifies DocumentReport observations into error and warning findings.
// ABOUTME: Holds the fixed audit thresholds and the finding message wording.

use std::fmt;

use serde::Serialize;

use super::report::DocumentReport;

/// Pages averaging more characters per paragraph than this get a warning.
pub const MAX_AVERAGE_PARAGRAPH_LENGTH: f64 = 95.0;

/// Every page must have exactly this many `<h1>` elements.
pub const REQUIRED_HEADING_COUNT: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}", s)
    }
}

/// One audit result for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Root-relative page path.
    pub path: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

pub fn has_invalid_heading_count(report: &DocumentReport) -> bool {
    report.heading_count != REQUIRED_HEADING_COUNT
}

pub fn has_long_paragraphs(report: &DocumentReport) -> bool {
    report.average_paragraph_length() > MAX_AVERAGE_PARAGRAPH_LENGTH
}

/// True if `report` yields at least one error-level finding.
pub fn has_error_findings(report: &DocumentReport) -> bool {
    !report.has_main_landmark
        || has_invalid_heading_count(report)
        || !report.images_missing_alt_sources.is_empty()
        || report.icon_only_buttons_missing_label > 0
}

/// Findings for one page: errors first, then warnings.
pub fn evaluate(path: &str, report: &DocumentReport) -> Vec<Finding> {
    let mut findings = Vec::new();

    if !report.has_main_landmark {
        findings.push(Finding::error(path, "missing #main-content"));
    }
    if has_invalid_heading_count(report) {
        findings.push(Finding::error(
            path,
            format!(
                "expected {} <h1>, found {}",
                REQUIRED_HEADING_COUNT, report.heading_count
            ),
        ));
    }
    if !report.images_missing_alt_sources.is_empty() {
        findings.push(Finding::error(
            path,
            format!("{} img tag(s) missing alt", report.missing_alt_count()),
        ));
    }
    if report.icon_only_buttons_missing_label > 0 {
        findings.push(Finding::error(
            path,
            format!(
                "{} icon-only button(s) missing aria-label",
                report.icon_only_buttons_missing_label
            ),
        ));
    }
    if !report.has_skip_link {
        findings.push(Finding::warning(path, "missing skip link"));
    }
    if has_long_paragraphs(report) {
        findings.push(Finding::warning(
            path,
            format!(
                "average paragraph length {:.1}ch exceeds {}ch",
                report.average_paragraph_length(),
                MAX_AVERAGE_PARAGRAPH_LENGTH
            ),
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::report::NO_SRC;

    fn clean_report() -> DocumentReport {
        DocumentReport {
            has_main_landmark: true,
            heading_count: 1,
            paragraph_lengths: vec![40, 60],
            has_skip_link: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_page_has_no_findings() {
        let report = clean_report();
        assert!(evaluate("index.html", &report).is_empty());
        assert!(!has_error_findings(&report));
    }

    #[test]
    fn test_heading_count_must_be_one() {
        for count in [0, 2, 3] {
            let report = DocumentReport {
                heading_count: count,
                ..clean_report()
            };
            let findings = evaluate("a.html", &report);
            assert_eq!(findings.len(), 1);
            assert!(findings[0].is_error());
            assert_eq!(
                findings[0].to_string(),
                format!("a.html: expected 1 <h1>, found {}", count)
            );
        }
    }

    #[test]
    fn test_errors_then_warnings_in_order() {
        let report = DocumentReport {
            has_main_landmark: false,
            heading_count: 0,
            paragraph_lengths: vec![100, 101],
            images_missing_alt_sources: vec!["a.png".into(), NO_SRC.into()],
            icon_only_buttons_missing_label: 3,
            has_skip_link: false,
        };
        let messages: Vec<String> = evaluate("p.html", &report)
            .into_iter()
            .map(|f| format!("{} {}", f.severity, f.message))
            .collect();

        assert_eq!(
            messages,
            vec![
                "error missing #main-content",
                "error expected 1 <h1>, found 0",
                "error 2 img tag(s) missing alt",
                "error 3 icon-only button(s) missing aria-label",
                "warning missing skip link",
                "warning average paragraph length 100.5ch exceeds 95ch",
            ]
        );
        assert!(has_error_findings(&report));
    }

    #[test]
    fn test_warnings_alone_are_not_errors() {
        let report = DocumentReport {
            has_skip_link: false,
            paragraph_lengths: vec![200],
            ..clean_report()
        };
        let findings = evaluate("w.html", &report);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| !f.is_error()));
        assert!(!has_error_findings(&report));
    }

    #[test]
    fn test_threshold_is_strict() {
        let report = DocumentReport {
            paragraph_lengths: vec![95],
            ..clean_report()
        };
        assert!(!has_long_paragraphs(&report));
    }
}
