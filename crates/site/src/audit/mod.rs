// ABOUTME: UI accessibility audit over a site tree: scan each page, classify, summarise.
// ABOUTME: Exposes scan_document for single documents and audit_site for whole runs.

pub mod findings;
pub mod render;
pub mod report;
pub mod scanner;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, SiteError};
use crate::options::SiteOptions;
use crate::walk::{find_html_files, relative_display};

pub use findings::{evaluate, Finding, Severity};
pub use report::DocumentReport;
pub use scanner::{scan_document, Scanner};

/// Result of auditing one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PageOutcome {
    Scanned { report: DocumentReport },
    Unreadable { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAudit {
    /// Root-relative page path.
    pub path: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

impl PageAudit {
    pub fn report(&self) -> Option<&DocumentReport> {
        match &self.outcome {
            PageOutcome::Scanned { report } => Some(report),
            PageOutcome::Unreadable { .. } => None,
        }
    }

    pub fn findings(&self) -> Vec<Finding> {
        match &self.outcome {
            PageOutcome::Scanned { report } => evaluate(&self.path, report),
            PageOutcome::Unreadable { error } => vec![Finding::error(
                self.path.clone(),
                format!("could not be read: {}", error),
            )],
        }
    }

    pub fn has_errors(&self) -> bool {
        match &self.outcome {
            PageOutcome::Scanned { report } => findings::has_error_findings(report),
            PageOutcome::Unreadable { .. } => true,
        }
    }
}

/// All pages of one audit run, in path order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiAudit {
    pub pages: Vec<PageAudit>,
}

/// Counts shown in the report summary. Unreadable pages are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UiSummary {
    pub files_scanned: usize,
    pub missing_main: usize,
    pub invalid_h1_count: usize,
    pub images_missing_alt: usize,
    pub icon_buttons_missing_label: usize,
    pub missing_skip_link: usize,
    pub long_paragraphs: usize,
}

impl UiAudit {
    pub fn reports(&self) -> impl Iterator<Item = &DocumentReport> {
        self.pages.iter().filter_map(PageAudit::report)
    }

    pub fn summary(&self) -> UiSummary {
        let mut summary = UiSummary::default();
        for report in self.reports() {
            summary.files_scanned += 1;
            summary.missing_main += usize::from(!report.has_main_landmark);
            summary.invalid_h1_count += usize::from(findings::has_invalid_heading_count(report));
            summary.images_missing_alt += report.missing_alt_count();
            summary.icon_buttons_missing_label += report.icon_only_buttons_missing_label;
            summary.missing_skip_link += usize::from(!report.has_skip_link);
            summary.long_paragraphs += usize::from(findings::has_long_paragraphs(report));
        }
        summary
    }

    /// Every finding of the run, page by page.
    pub fn findings(&self) -> Vec<Finding> {
        self.pages.iter().flat_map(PageAudit::findings).collect()
    }

    /// True if any page carries an error-level finding.
    pub fn has_errors(&self) -> bool {
        self.pages.iter().any(PageAudit::has_errors)
    }

    /// Write the markdown report to `path`, creating parent directories.
    pub fn write_markdown(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
            }
        }
        let mut text = self.render_markdown();
        text.push('\n');
        fs::write(path, text).map_err(|e| SiteError::io(path, e))?;
        info!("wrote UI audit report to {}", path.display());
        Ok(())
    }
}

/// Read and scan one page.
pub fn audit_file(path: &Path) -> Result<DocumentReport> {
    let content = fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
    Ok(scan_document(&content))
}

/// Audit every page under the configured root.
///
/// A page that cannot be read is recorded as unreadable; the remaining
/// pages are still scanned.
pub fn audit_site(opts: &SiteOptions) -> Result<UiAudit> {
    let files = find_html_files(opts)?;
    let mut pages = Vec::with_capacity(files.len());

    for path in &files {
        let rel = relative_display(opts.root(), path);
        let outcome = match audit_file(path) {
            Ok(report) => {
                debug!(page = %rel, headings = report.heading_count, "scanned");
                PageOutcome::Scanned { report }
            }
            Err(err) => {
                warn!("skipping {}: {}", rel, err);
                let cause = match err {
                    SiteError::Io { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                PageOutcome::Unreadable { error: cause }
            }
        };
        pages.push(PageAudit { path: rel, outcome });
    }

    let audit = UiAudit { pages };
    info!(
        "audited {} pages, {} with errors",
        audit.pages.len(),
        audit.pages.iter().filter(|p| p.has_errors()).count()
    );
    Ok(audit)
}
