// ABOUTME: Repairs CSP meta tags left malformed or duplicated by earlier edits.
// ABOUTME: Any http-equiv CSP tag with a quoted content attribute is replaced by the strict tag.

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use super::{strict_csp_meta, Change, Patch};

static CSP_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<meta\s+http-equiv=["']Content-Security-Policy["']\s+content=(?:"[^"]*"|'[^']*')\s*/?>"#,
    )
    .unwrap()
});

/// Replace every CSP meta tag with the strict one.
pub fn fix_csp(original: &str) -> Patch {
    let content = CSP_TAG_RE
        .replace_all(original, NoExpand(&strict_csp_meta()))
        .into_owned();
    Patch::new(original, content, vec![Change::FixedCsp])
}
