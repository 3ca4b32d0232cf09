// ABOUTME: Integration tests for sitekit over real site trees on disk.
// ABOUTME: Covers the audit run, the i18n check and in-place security patching.

use std::fs;
use std::path::Path;

use sitekit::{
    apply_to_file, audit_site, check_site, find_html_files, Change, PatchKind, SiteError,
    SiteOptions,
};
use tempfile::TempDir;

fn write_page(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

mod audit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_audit_site_orders_pages_and_summarises() {
        let dir = TempDir::new().unwrap();
        write_page(
            dir.path(),
            "index.html",
            r##"<a href="#main-content" class="skip-link">Skip</a><main id="main-content"><h1>Home</h1></main>"##,
        );
        write_page(
            dir.path(),
            "blog/a.html",
            r#"<h1>One</h1><h1>Two</h1><img src="x.png"><img>"#,
        );
        write_page(dir.path(), "node_modules/pkg/readme.html", "<p>vendored</p>");

        let audit = audit_site(&SiteOptions::new(dir.path())).unwrap();
        let paths: Vec<&str> = audit.pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["blog/a.html", "index.html"]);

        let summary = audit.summary();
        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.missing_main, 1);
        assert_eq!(summary.invalid_h1_count, 1);
        assert_eq!(summary.images_missing_alt, 2);
        assert_eq!(summary.missing_skip_link, 1);
        assert!(audit.has_errors());

        let messages: Vec<String> = audit.findings().iter().map(|f| f.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "blog/a.html: missing #main-content",
                "blog/a.html: expected 1 <h1>, found 2",
                "blog/a.html: 2 img tag(s) missing alt",
                "blog/a.html: missing skip link",
            ]
        );
    }

    #[test]
    fn test_audit_report_written_under_root() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "index.html", "<p>plain</p>");

        let opts = SiteOptions::new(dir.path());
        let audit = audit_site(&opts).unwrap();
        audit.write_markdown(&opts.report_path).unwrap();

        let written = fs::read_to_string(dir.path().join("docs/UI-AUDIT.md")).unwrap();
        assert!(written.contains("- Files scanned: 1"));
        assert!(written.contains("- index.html: missing #main-content"));
    }

    #[test]
    fn test_audit_missing_root_is_error() {
        let err = audit_site(&SiteOptions::new("/nonexistent/sitekit-root")).unwrap_err();
        assert!(matches!(err, SiteError::MissingRoot(_)));
    }
}

mod i18n_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_site_uses_relative_paths() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "index.html", "---\nlang: en\nref: home\n---\n");
        write_page(dir.path(), "it/index.html", "---\nlang: it\nref: home\n---\n");
        write_page(dir.path(), "it/extra.html", "---\nlang: it\nref: extra\n---\n");
        write_page(dir.path(), "_layouts/base.html", "<html>{{ content }}</html>");

        let report = check_site(&SiteOptions::new(dir.path())).unwrap();
        assert!(!report.has_errors());
        assert_eq!(
            report.warnings,
            vec!["it/extra.html: translation exists without English ref extra"]
        );
    }
}

mod security_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<head>
  <meta http-equiv="Content-Security-Policy" content="default-src *">
  <meta name="referrer" content="strict-origin">
  <link rel="preconnect" href="https://fonts.googleapis.com">
  <link href="https://fonts.googleapis.com/css2?family=Crimson+Pro" rel="stylesheet">
  <link rel="stylesheet" href="/assets/css/style.css">
  <style>body { font-family: "Crimson Pro", serif; }</style>
</head>"#;

    #[test]
    fn test_security_headers_applied_once() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "index.html", PAGE);
        let path = dir.path().join("index.html");

        let changes = apply_to_file(&path, PatchKind::SecurityHeaders, false).unwrap();
        assert_eq!(
            changes,
            vec![
                Change::UpdatedCsp,
                Change::AddedContentTypeOptions,
                Change::AddedPermissionsPolicy,
                Change::RemovedGoogleFonts,
                Change::RemovedGoogleFonts,
                Change::AddedFontsCss,
            ]
        );

        let patched = fs::read_to_string(&path).unwrap();
        assert!(!patched.contains("fonts.googleapis.com"));
        assert!(patched.contains(r#"<link rel="stylesheet" href="/assets/css/fonts.css">"#));

        let again = apply_to_file(&path, PatchKind::SecurityHeaders, false).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_dry_run_every_page() {
        let dir = TempDir::new().unwrap();
        write_page(dir.path(), "a.html", PAGE);
        write_page(dir.path(), "sub/b.html", "<script>x()</script>");

        let files = find_html_files(&SiteOptions::new(dir.path())).unwrap();
        assert_eq!(files.len(), 2);
        for file in &files {
            let before = fs::read_to_string(file).unwrap();
            let changes = apply_to_file(file, PatchKind::InlineScripts, true).unwrap();
            assert!(!changes.is_empty());
            assert_eq!(fs::read_to_string(file).unwrap(), before);
        }
    }
}
