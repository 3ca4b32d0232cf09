// ABOUTME: Removes inline <script> elements and restricts the CSP script-src to 'self'.
// ABOUTME: External scripts (those with a src attribute) are kept untouched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Change, Patch, STRICT_CSP};

// Group 1 is everything before the content value, group 2 everything after.
static CSP_CONTENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(<meta\s+http-equiv=["']Content-Security-Policy["'][^>]*?\bcontent=)(?:"[^"]*"|'[^']*')([^>]*>)"#,
    )
    .unwrap()
});
static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*<script\b([^>]*)>[\s\S]*?</script>").unwrap());
static SRC_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\ssrc\s*=").unwrap());

/// Restrict the CSP and drop every inline script.
pub fn remove_inline_scripts(original: &str) -> Patch {
    let mut changes = Vec::new();

    let restricted = CSP_CONTENT_RE.replace_all(original, |caps: &Captures| {
        format!("{}\"{}\"{}", &caps[1], STRICT_CSP, &caps[2])
    });
    if restricted != original {
        changes.push(Change::RestrictedScriptSrc);
    }

    let mut removed = 0usize;
    let content = SCRIPT_RE
        .replace_all(&restricted, |caps: &Captures| {
            if SRC_ATTR_RE.is_match(&caps[1]) {
                caps[0].to_string()
            } else {
                removed += 1;
                String::new()
            }
        })
        .into_owned();
    if removed > 0 {
        changes.push(Change::RemovedInlineScripts);
    }

    Patch::new(original, content, changes)
}
