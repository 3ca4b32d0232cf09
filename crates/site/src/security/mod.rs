// ABOUTME: Regex-based patchers that harden page <head> security meta tags and strip inline scripts.
// ABOUTME: Each patcher is a pure string transform; apply_to_file writes a page back only when it changed.

pub mod csp;
pub mod headers;
pub mod scripts;

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SiteError};

pub use csp::fix_csp;
pub use headers::update_security_headers;
pub use scripts::remove_inline_scripts;

/// Content-Security-Policy written into every page.
pub const STRICT_CSP: &str = "default-src 'none'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'; upgrade-insecure-requests;";

/// Permissions-Policy written into every page.
pub const PERMISSIONS_POLICY: &str = "accelerometer=(), camera=(), geolocation=(), gyroscope=(), magnetometer=(), microphone=(), payment=(), usb=(), interest-cohort=()";

/// The canonical CSP meta tag.
pub fn strict_csp_meta() -> String {
    format!(
        r#"<meta http-equiv="Content-Security-Policy" content="{}">"#,
        STRICT_CSP
    )
}

/// One modification made to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    UpdatedCsp,
    AddedContentTypeOptions,
    AddedPermissionsPolicy,
    RemovedGoogleFonts,
    AddedFontsCss,
    FixedCsp,
    RestrictedScriptSrc,
    RemovedInlineScripts,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Change::UpdatedCsp => "Updated CSP",
            Change::AddedContentTypeOptions => "Added X-Content-Type-Options",
            Change::AddedPermissionsPolicy => "Added Permissions-Policy",
            Change::RemovedGoogleFonts => "Removed Google Fonts reference",
            Change::AddedFontsCss => "Added fonts.css reference",
            Change::FixedCsp => "Fixed CSP",
            Change::RestrictedScriptSrc => "Updated CSP to script-src 'self'",
            Change::RemovedInlineScripts => "Removed inline scripts",
        };
        write!(f, "{}", s)
    }
}

/// Patched page content and the changes that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub content: String,
    pub changes: Vec<Change>,
}

impl Patch {
    /// Build a patch from the original and patched text. A patch whose
    /// content equals the original reports no changes.
    pub fn new(original: &str, content: String, mut changes: Vec<Change>) -> Self {
        if content == original {
            changes.clear();
        }
        Self { content, changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The available page patchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    /// Replace the CSP and add the other hardening meta tags.
    SecurityHeaders,
    /// Replace a malformed or duplicated CSP tag with the strict one.
    FixCsp,
    /// Restrict script-src and drop inline `<script>` elements.
    InlineScripts,
}

impl PatchKind {
    pub fn apply(self, content: &str) -> Patch {
        match self {
            PatchKind::SecurityHeaders => update_security_headers(content),
            PatchKind::FixCsp => fix_csp(content),
            PatchKind::InlineScripts => remove_inline_scripts(content),
        }
    }
}

/// Patch the page at `path`. The file is rewritten only if the content
/// changed and `dry_run` is false.
pub fn apply_to_file(path: &Path, kind: PatchKind, dry_run: bool) -> Result<Vec<Change>> {
    let original = fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
    let patch = kind.apply(&original);

    if patch.content != original && !dry_run {
        fs::write(path, &patch.content).map_err(|e| SiteError::io(path, e))?;
        debug!("patched {} ({} changes)", path.display(), patch.changes.len());
    }

    Ok(patch.changes)
}
