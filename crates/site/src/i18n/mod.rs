// ABOUTME: i18n consistency check: every page declares lang and ref, and translations map to English refs.
// ABOUTME: Produces an I18nReport with errors and warnings plus its plain-text rendering.

pub mod front_matter;

use std::collections::BTreeSet;
use std::fs;

use tracing::{debug, info};

use crate::error::{Result, SiteError};
use crate::options::SiteOptions;
use crate::walk::{find_html_files, relative_display};

pub use front_matter::parse_front_matter;

/// Language of the canonical pages.
pub const DEFAULT_LANG: &str = "en";

/// Top-level directories that hold translated pages.
pub const TRANSLATED_DIRS: &[&str] = &["es", "fr", "pt", "de", "it", "ar", "zh-hans"];

const ROOT_INDEX: &str = "index.html";

/// Front matter facts for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Root-relative page path.
    pub path: String,
    pub lang: Option<String>,
    /// The `ref` key shared by a page and its translations.
    pub reference: Option<String>,
}

impl PageInfo {
    pub fn from_content(path: impl Into<String>, content: &str) -> Self {
        let mut fm = parse_front_matter(content);
        Self {
            path: path.into(),
            lang: fm.remove("lang"),
            reference: fm.remove("ref"),
        }
    }

    fn top_level_component(&self) -> &str {
        self.path.split('/').next().unwrap_or("")
    }

    fn is_english(&self) -> bool {
        self.lang.as_deref() == Some(DEFAULT_LANG)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct I18nReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl I18nReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = vec!["i18n check:".to_string()];
        render_list(&mut lines, "Errors", &self.errors);
        render_list(&mut lines, "Warnings", &self.warnings);
        lines.join("\n")
    }
}

fn render_list(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        lines.push(format!("{}: None", title));
        return;
    }
    lines.push(format!("{}:", title));
    lines.extend(items.iter().map(|item| format!("- {}", item)));
}

/// Check a set of pages for front matter consistency.
pub fn check_pages(pages: &[PageInfo]) -> I18nReport {
    let mut report = I18nReport::default();

    let english_refs: BTreeSet<&str> = pages
        .iter()
        .filter(|p| p.is_english())
        .filter_map(|p| p.reference.as_deref())
        .filter(|r| !r.is_empty())
        .collect();

    for page in pages {
        let Some(lang) = page.lang.as_deref().filter(|_| page.reference.is_some()) else {
            report
                .errors
                .push(format!("{}: missing lang or ref in front matter", page.path));
            continue;
        };

        if lang == DEFAULT_LANG && TRANSLATED_DIRS.contains(&page.top_level_component()) {
            report
                .errors
                .push(format!("{}: English lang set in translated path", page.path));
        }
        if lang != DEFAULT_LANG && page.path == ROOT_INDEX {
            report.errors.push(format!(
                "{}: non-English page in root without lang=en",
                page.path
            ));
        }
    }

    for page in pages {
        let translated = matches!(page.lang.as_deref(), Some(lang) if !lang.is_empty() && lang != DEFAULT_LANG);
        if !translated {
            continue;
        }
        if let Some(reference) = page.reference.as_deref().filter(|r| !r.is_empty()) {
            if !english_refs.contains(reference) {
                report.warnings.push(format!(
                    "{}: translation exists without English ref {}",
                    page.path, reference
                ));
            }
        }
    }

    report
}

/// Read the front matter of every page under the configured root.
pub fn collect_pages(opts: &SiteOptions) -> Result<Vec<PageInfo>> {
    let files = find_html_files(opts)?;
    let mut pages = Vec::with_capacity(files.len());

    for path in &files {
        let content = fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
        let page = PageInfo::from_content(relative_display(opts.root(), path), &content);
        debug!(page = %page.path, lang = ?page.lang, reference = ?page.reference, "front matter");
        pages.push(page);
    }

    Ok(pages)
}

/// Collect pages under the configured root and check them.
pub fn check_site(opts: &SiteOptions) -> Result<I18nReport> {
    let pages = collect_pages(opts)?;
    let report = check_pages(&pages);
    info!(
        "checked {} pages: {} errors, {} warnings",
        pages.len(),
        report.errors.len(),
        report.warnings.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(path: &str, lang: Option<&str>, reference: Option<&str>) -> PageInfo {
        PageInfo {
            path: path.to_string(),
            lang: lang.map(str::to_string),
            reference: reference.map(str::to_string),
        }
    }

    #[test]
    fn test_consistent_site_is_clean() {
        let pages = vec![
            page("index.html", Some("en"), Some("home")),
            page("fr/index.html", Some("fr"), Some("home")),
            page("about.html", Some("en"), Some("about")),
        ];
        assert_eq!(check_pages(&pages), I18nReport::default());
    }

    #[test]
    fn test_missing_keys_error_and_skip_other_checks() {
        let pages = vec![
            page("index.html", None, Some("home")),
            page("fr/a.html", Some("fr"), None),
        ];
        let report = check_pages(&pages);
        assert_eq!(
            report.errors,
            vec![
                "index.html: missing lang or ref in front matter",
                "fr/a.html: missing lang or ref in front matter",
            ]
        );
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_english_in_translated_dir() {
        let pages = vec![page("zh-hans/index.html", Some("en"), Some("home"))];
        assert_eq!(
            check_pages(&pages).errors,
            vec!["zh-hans/index.html: English lang set in translated path"]
        );
    }

    #[test]
    fn test_non_english_root_index() {
        let pages = vec![
            page("index.html", Some("es"), Some("home")),
            page("en.html", Some("en"), Some("home")),
        ];
        assert_eq!(
            check_pages(&pages).errors,
            vec!["index.html: non-English page in root without lang=en"]
        );
    }

    #[test]
    fn test_orphan_translation_warns() {
        let pages = vec![
            page("index.html", Some("en"), Some("home")),
            page("de/kontakt.html", Some("de"), Some("contact")),
        ];
        let report = check_pages(&pages);
        assert!(report.errors.is_empty());
        assert_eq!(
            report.warnings,
            vec!["de/kontakt.html: translation exists without English ref contact"]
        );
    }

    #[test]
    fn test_page_info_from_content() {
        let info = PageInfo::from_content("a.html", "---\nlang: pt\nref: a\n---\n<p>x</p>");
        assert_eq!(info, page("a.html", Some("pt"), Some("a")));
    }

    #[test]
    fn test_render() {
        let report = I18nReport {
            errors: vec!["a.html: missing lang or ref in front matter".into()],
            warnings: vec![],
        };
        assert_eq!(
            report.render(),
            "i18n check:\nErrors:\n- a.html: missing lang or ref in front matter\nWarnings: None"
        );
        assert_eq!(
            I18nReport::default().render(),
            "i18n check:\nErrors: None\nWarnings: None"
        );
    }
}
