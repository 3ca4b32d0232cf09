// ABOUTME: Configuration for site tools: root directory, excluded directories and report path.
// ABOUTME: SiteOptionsBuilder provides a fluent API for constructing SiteOptions.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Directory names never descended into when collecting pages.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["_includes", "_layouts", "_site", "node_modules", ".git"];

/// Where the UI audit report is written, relative to the site root.
pub const DEFAULT_REPORT_PATH: &str = "docs/UI-AUDIT.md";

/// Configuration shared by every site tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOptions {
    pub root: PathBuf,
    pub exclude_dirs: BTreeSet<String>,
    pub report_path: PathBuf,
}

impl SiteOptions {
    /// Create a builder rooted at `root`.
    pub fn builder(root: impl Into<PathBuf>) -> SiteOptionsBuilder {
        SiteOptionsBuilder::new(root)
    }

    /// Options with every default, rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SiteOptionsBuilder::new(root).build()
    }

    /// True if `name` is an excluded directory name.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_dirs.contains(name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Builder for [`SiteOptions`].
#[derive(Debug, Clone)]
pub struct SiteOptionsBuilder {
    root: PathBuf,
    exclude_dirs: BTreeSet<String>,
    report_path: Option<PathBuf>,
}

impl SiteOptionsBuilder {
    /// Create a builder with the default exclusions and report path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            report_path: None,
        }
    }

    /// Exclude one more directory name.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.exclude_dirs.insert(name.into());
        self
    }

    /// Exclude several more directory names.
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set where the audit report is written. Relative paths resolve
    /// against the root.
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    pub fn build(self) -> SiteOptions {
        let report_path = match self.report_path {
            Some(path) if path.is_absolute() => path,
            Some(path) => self.root.join(path),
            None => self.root.join(DEFAULT_REPORT_PATH),
        };

        SiteOptions {
            root: self.root,
            exclude_dirs: self.exclude_dirs,
            report_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = SiteOptions::new("/srv/site");
        assert_eq!(opts.root, PathBuf::from("/srv/site"));
        assert_eq!(opts.report_path, PathBuf::from("/srv/site/docs/UI-AUDIT.md"));
        for name in DEFAULT_EXCLUDE_DIRS {
            assert!(opts.is_excluded(name));
        }
        assert!(!opts.is_excluded("assets"));
    }

    #[test]
    fn test_builder_overrides() {
        let opts = SiteOptions::builder("site")
            .exclude_dir("drafts")
            .exclude_dirs(["vendor"])
            .report_path("out/audit.md")
            .build();

        assert_eq!(opts.exclude_dirs.len(), DEFAULT_EXCLUDE_DIRS.len() + 2);
        assert!(opts.is_excluded("drafts"));
        assert!(opts.is_excluded("vendor"));
        assert!(opts.is_excluded("_site"));
        assert_eq!(opts.report_path, PathBuf::from("site/out/audit.md"));
    }

    #[test]
    fn test_absolute_report_path_kept() {
        let opts = SiteOptions::builder("site").report_path("/tmp/a.md").build();
        assert_eq!(opts.report_path, PathBuf::from("/tmp/a.md"));
    }
}
