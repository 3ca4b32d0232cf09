// ABOUTME: Integration tests for the sitekit CLI binary.
// ABOUTME: Builds small site trees in temp dirs and checks stdout, written files and exit codes.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const GOOD_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<body>
  <a href="#main-content" class="skip-link">Skip to content</a>
  <main id="main-content">
    <h1>Welcome</h1>
    <p>A short paragraph.</p>
    <img src="logo.png" alt="">
    <button aria-label="Close"><svg></svg></button>
  </main>
</body>
</html>"##;

fn sitekit_cmd() -> Command {
    Command::cargo_bin("sitekit").unwrap()
}

fn write_page(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn audit_clean_site_succeeds_and_writes_report() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path(), "index.html", GOOD_PAGE);

    sitekit_cmd()
        .arg("audit-ui")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("# UI Audit Report"))
        .stdout(predicate::str::contains("- Files scanned: 1"))
        .stdout(predicate::str::contains("## Errors\n- None"));

    let written = fs::read_to_string(dir.path().join("docs/UI-AUDIT.md")).unwrap();
    assert!(written.starts_with("# UI Audit Report\n"));
    assert!(written.ends_with("## Warnings\n- None\n\n"));
}

#[test]
fn audit_with_errors_fails() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path(), "index.html", GOOD_PAGE);
    write_page(
        dir.path(),
        "blog/post.html",
        r#"<main id="main-content"><img src="hero.jpg"><button><svg/></button></main>"#,
    );

    sitekit_cmd()
        .args(["audit-ui", "--no-write", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("- blog/post.html: expected 1 <h1>, found 0"))
        .stdout(predicate::str::contains("- blog/post.html: 1 img tag(s) missing alt"))
        .stdout(predicate::str::contains(
            "- blog/post.html: 1 icon-only button(s) missing aria-label",
        ))
        .stdout(predicate::str::contains("- blog/post.html: missing skip link"));

    assert!(!dir.path().join("docs/UI-AUDIT.md").exists());
}

#[test]
fn audit_warnings_only_succeeds() {
    let dir = TempDir::new().unwrap();
    write_page(
        dir.path(),
        "index.html",
        r#"<main id="main-content"><h1>T</h1></main>"#,
    );

    sitekit_cmd()
        .args(["audit-ui", "--no-write", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("- index.html: missing skip link"));
}

#[test]
fn audit_json_format_and_custom_output() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path(), "index.html", GOOD_PAGE);

    let output = sitekit_cmd()
        .args(["audit-ui", "--format", "json", "--output", "out/audit.md", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["summary"]["files_scanned"], 1);
    assert_eq!(json["has_errors"], false);
    assert!(dir.path().join("out/audit.md").exists());
}

#[test]
fn audit_skips_excluded_dirs() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path(), "index.html", GOOD_PAGE);
    write_page(dir.path(), "_site/index.html", "<p>built copy</p>");
    write_page(dir.path(), "drafts/wip.html", "<p>draft</p>");

    sitekit_cmd()
        .args(["audit-ui", "--no-write", "--exclude", "drafts", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("- Files scanned: 1"));
}

#[test]
fn audit_missing_root_fails() {
    sitekit_cmd()
        .args(["audit-ui", "--root", "/nonexistent/sitekit-site"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("site root not found"));
}

#[test]
fn i18n_check_reports_errors_and_warnings() {
    let dir = TempDir::new().unwrap();
    write_page(
        dir.path(),
        "index.html",
        "---\nlayout: home\nlang: en\nref: home\n---\n<p>Hi</p>",
    );
    write_page(
        dir.path(),
        "fr/index.html",
        "---\nlang: en\nref: home\n---\n<p>Salut</p>",
    );
    write_page(
        dir.path(),
        "es/contacto.html",
        "---\nlang: es\nref: contact\n---\n<p>Hola</p>",
    );
    write_page(dir.path(), "about.html", "<p>no front matter</p>");

    sitekit_cmd()
        .arg("i18n-check")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("i18n check:\nErrors:\n"))
        .stdout(predicate::str::contains(
            "- about.html: missing lang or ref in front matter",
        ))
        .stdout(predicate::str::contains(
            "- fr/index.html: English lang set in translated path",
        ))
        .stdout(predicate::str::contains(
            "- es/contacto.html: translation exists without English ref contact",
        ));
}

#[test]
fn i18n_check_clean_site_succeeds() {
    let dir = TempDir::new().unwrap();
    write_page(dir.path(), "index.html", "---\nlang: en\nref: home\n---\n");
    write_page(dir.path(), "de/index.html", "---\nlang: de\nref: home\n---\n");

    sitekit_cmd()
        .arg("i18n-check")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Errors: None"))
        .stdout(predicate::str::contains("Warnings: None"));
}

#[test]
fn update_security_rewrites_pages() {
    let dir = TempDir::new().unwrap();
    write_page(
        dir.path(),
        "index.html",
        r#"<head>
  <meta http-equiv="Content-Security-Policy" content="default-src 'self'">
  <meta name="referrer" content="no-referrer">
</head>"#,
    );
    write_page(dir.path(), "plain.html", "<p>no head</p>");

    sitekit_cmd()
        .arg("update-security")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 HTML files to process"))
        .stdout(predicate::str::contains("✓ index.html\n    - Updated CSP\n"))
        .stdout(predicate::str::contains("    - Added X-Content-Type-Options"))
        .stdout(predicate::str::contains("    - Added Permissions-Policy"))
        .stdout(predicate::str::contains("  plain.html (no changes needed)"))
        .stdout(predicate::str::contains("Total changes made: 3"));

    let patched = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(patched.contains("script-src 'self'"));
    assert!(patched.contains("nosniff"));
    assert!(patched.contains("Permissions-Policy"));
}

#[test]
fn remove_inline_scripts_dry_run_keeps_files() {
    let dir = TempDir::new().unwrap();
    let page = "<body><script>alert(1)</script><script src=\"app.js\"></script></body>";
    write_page(dir.path(), "index.html", page);

    sitekit_cmd()
        .args(["remove-inline-scripts", "--dry-run", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("    - Removed inline scripts"))
        .stdout(predicate::str::contains("Total changes made: 1"));

    assert_eq!(fs::read_to_string(dir.path().join("index.html")).unwrap(), page);
}

#[test]
fn fix_csp_counts_fixed_files() {
    let dir = TempDir::new().unwrap();
    write_page(
        dir.path(),
        "a.html",
        r#"<meta http-equiv="Content-Security-Policy" content="default-src 'self'; default-src 'self'">"#,
    );
    write_page(dir.path(), "b.html", "<p>nothing</p>");

    sitekit_cmd()
        .arg("fix-csp")
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixing CSP in 2 HTML files"))
        .stdout(predicate::str::contains("✓ Fixed: a.html"))
        .stdout(predicate::str::contains("Fixed 1 files"));
}
