// ABOUTME: Hardens a page's security meta tags and moves it to self-hosted fonts.
// ABOUTME: Replaces the CSP, adds nosniff and Permissions-Policy, drops Google Fonts, links fonts.css.

use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};

use super::{strict_csp_meta, Change, Patch, PERMISSIONS_POLICY};

static CSP_META_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+http-equiv=["']Content-Security-Policy["'][^>]*>"#).unwrap()
});
static REFERRER_META_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+name=["']referrer["'][^>]*>"#).unwrap());
static GOOGLE_FONTS_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)\s*<link\s+rel=["']preconnect["'][^>]*fonts\.googleapis\.com[^>]*>"#,
        r#"(?i)\s*<link\s+rel=["']preconnect["'][^>]*fonts\.gstatic\.com[^>]*>"#,
        r#"(?i)\s*<link\s+href=["']https://fonts\.googleapis\.com[^"']*["'][^>]*>"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});
// Captures the directory part of the href so fonts.css lands next to style.css.
static STYLESHEET_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<link\s+rel=["']stylesheet["']\s+href=["']((?:[^"']*/)?)style\.css["'][^>]*>"#)
        .unwrap()
});

const SELF_HOSTED_FONTS: &[&str] = &["Crimson Pro", "Source Sans Pro"];

fn nosniff_meta() -> &'static str {
    r#"<meta http-equiv="X-Content-Type-Options" content="nosniff">"#
}

fn permissions_policy_meta() -> String {
    format!(
        r#"<meta http-equiv="Permissions-Policy" content="{}">"#,
        PERMISSIONS_POLICY
    )
}

/// Apply every header hardening step to a page.
pub fn update_security_headers(original: &str) -> Patch {
    let mut content = original.to_string();
    let mut changes = Vec::new();
    let csp_meta = strict_csp_meta();

    if CSP_META_RE.is_match(&content) {
        content = CSP_META_RE
            .replace_all(&content, NoExpand(&csp_meta))
            .into_owned();
        changes.push(Change::UpdatedCsp);
    }

    if !content.contains("X-Content-Type-Options") && content.contains(&csp_meta) {
        content = content.replace(&csp_meta, &format!("{}\n  {}", csp_meta, nosniff_meta()));
        changes.push(Change::AddedContentTypeOptions);
    }

    if !content.contains("Permissions-Policy") && REFERRER_META_RE.is_match(&content) {
        let policy = permissions_policy_meta();
        content = REFERRER_META_RE
            .replace_all(&content, |caps: &Captures| format!("{}\n  {}", &caps[0], policy))
            .into_owned();
        changes.push(Change::AddedPermissionsPolicy);
    }

    for re in GOOGLE_FONTS_RES.iter() {
        if re.is_match(&content) {
            content = re.replace_all(&content, "").into_owned();
            changes.push(Change::RemovedGoogleFonts);
        }
    }

    let uses_self_hosted_fonts = SELF_HOSTED_FONTS.iter().any(|font| content.contains(font));
    if !content.contains("fonts.css")
        && uses_self_hosted_fonts
        && STYLESHEET_LINK_RE.is_match(&content)
    {
        content = STYLESHEET_LINK_RE
            .replace_all(&content, |caps: &Captures| {
                format!(
                    "<link rel=\"stylesheet\" href=\"{}fonts.css\">\n  {}",
                    &caps[1], &caps[0]
                )
            })
            .into_owned();
        changes.push(Change::AddedFontsCss);
    }

    Patch::new(original, content, changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::STRICT_CSP;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_head_rewrite() {
        let input = r#"<head>
  <meta http-equiv="Content-Security-Policy" content="default-src 'self'">
  <meta name="referrer" content="strict-origin-when-cross-origin">
  <link rel="preconnect" href="https://fonts.googleapis.com">
  <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin>
  <link href="https://fonts.googleapis.com/css2?family=Crimson+Pro&display=swap" rel="stylesheet">
  <link rel="stylesheet" href="../css/style.css">
  <style>body { font-family: 'Crimson Pro', serif; }</style>
</head>"#;

        let patch = update_security_headers(input);
        let expected = format!(
            r#"<head>
  <meta http-equiv="Content-Security-Policy" content="{csp}">
  <meta http-equiv="X-Content-Type-Options" content="nosniff">
  <meta name="referrer" content="strict-origin-when-cross-origin">
  <meta http-equiv="Permissions-Policy" content="{pp}">
  <link rel="stylesheet" href="../css/fonts.css">
  <link rel="stylesheet" href="../css/style.css">
  <style>body {{ font-family: 'Crimson Pro', serif; }}</style>
</head>"#,
            csp = STRICT_CSP,
            pp = PERMISSIONS_POLICY
        );

        assert_eq!(patch.content, expected);
        assert_eq!(
            patch.changes,
            vec![
                Change::UpdatedCsp,
                Change::AddedContentTypeOptions,
                Change::AddedPermissionsPolicy,
                Change::RemovedGoogleFonts,
                Change::RemovedGoogleFonts,
                Change::RemovedGoogleFonts,
                Change::AddedFontsCss,
            ]
        );
    }

    #[test]
    fn test_idempotent_on_hardened_page() {
        let input = r#"<head>
  <meta http-equiv="Content-Security-Policy" content="default-src 'self'">
  <meta name="referrer" content="no-referrer">
</head>"#;
        let once = update_security_headers(input);
        let twice = update_security_headers(&once.content);
        assert_eq!(twice.content, once.content);
        assert!(twice.is_empty());
    }

    #[test]
    fn test_nosniff_needs_csp_tag() {
        let patch = update_security_headers("<head><title>x</title></head>");
        assert!(patch.is_empty());
        assert_eq!(patch.content, "<head><title>x</title></head>");
    }

    #[test]
    fn test_fonts_css_only_for_self_hosted_fonts() {
        let input = r#"<link rel="stylesheet" href="/css/style.css">"#;
        assert!(update_security_headers(input).is_empty());

        let input = r#"<link rel="stylesheet" href="/css/style.css"><p style="font-family: Source Sans Pro">x</p>"#;
        let patch = update_security_headers(input);
        assert_eq!(patch.changes, vec![Change::AddedFontsCss]);
        assert!(patch
            .content
            .starts_with("<link rel=\"stylesheet\" href=\"/css/fonts.css\">\n  <link"));
    }

    #[test]
    fn test_fonts_css_not_added_twice() {
        let input = r#"<link rel="stylesheet" href="css/fonts.css">
<link rel="stylesheet" href="css/style.css"><p>Crimson Pro</p>"#;
        assert!(update_security_headers(input).is_empty());
    }

    #[test]
    fn test_csp_match_is_case_insensitive() {
        let input = r#"<META HTTP-EQUIV='content-security-policy' CONTENT="x">"#;
        let patch = update_security_headers(input);
        assert_eq!(patch.changes[0], Change::UpdatedCsp);
        assert!(patch.content.contains(STRICT_CSP));
    }
}
