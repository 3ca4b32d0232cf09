// ABOUTME: Maintenance tools for a static HTML site: UI audit, i18n check and security patchers.
// ABOUTME: Re-exports the public API: SiteOptions, SiteError, audit, i18n and security entry points.

//! sitekit - batch maintenance jobs over a static site tree.
//!
//! Every tool walks the `*.html` pages below a root directory and either
//! reports findings or rewrites pages in place.
//!
//! # Example
//!
//! ```
//! use sitekit::audit::scan_document;
//!
//! let report = scan_document(r#"<main id="main-content"><h1>Hi</h1></main>"#);
//! assert!(report.has_main_landmark);
//! assert_eq!(report.heading_count, 1);
//! ```

pub mod audit;
pub mod error;
pub mod i18n;
pub mod options;
pub mod security;
pub mod walk;

pub use crate::audit::{audit_file, audit_site, scan_document, DocumentReport, UiAudit};
pub use crate::error::{Result, SiteError};
pub use crate::i18n::{check_site, I18nReport, PageInfo};
pub use crate::options::{SiteOptions, SiteOptionsBuilder};
pub use crate::security::{apply_to_file, Change, Patch, PatchKind};
pub use crate::walk::{find_html_files, relative_display};
