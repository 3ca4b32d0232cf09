// ABOUTME: Page discovery for a site tree: every *.html file outside excluded directories.
// ABOUTME: Also renders root-relative, slash-separated paths for report output.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, SiteError};
use crate::options::SiteOptions;

const PAGE_EXTENSION: &str = "html";

/// Collect every page below the site root, sorted by path.
///
/// A directory is skipped when its name is in the exclusion set. Entries
/// that cannot be read are logged and skipped; a missing root is an error.
pub fn find_html_files(opts: &SiteOptions) -> Result<Vec<PathBuf>> {
    let root = opts.root();
    if !root.is_dir() {
        return Err(SiteError::MissingRoot(root.to_path_buf()));
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !opts.is_excluded(name)
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXTENSION) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    debug!("found {} pages under {}", files.len(), root.display());
    Ok(files)
}

/// `path` relative to `root`, with `/` separators. Falls back to the full
/// path when `path` is not below `root`.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::RootDir => Some(String::new()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<p>x</p>").unwrap();
    }

    #[test]
    fn test_find_html_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.html");
        touch(dir.path(), "fr/index.html");
        touch(dir.path(), "about.html");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "_site/index.html");
        touch(dir.path(), "blog/_includes/head.html");
        touch(dir.path(), "node_modules/pkg/readme.html");

        let opts = SiteOptions::new(dir.path());
        let files = find_html_files(&opts).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|p| relative_display(dir.path(), p))
            .collect();

        assert_eq!(rel, vec!["about.html", "fr/index.html", "index.html"]);
    }

    #[test]
    fn test_extra_exclusion() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.html");
        touch(dir.path(), "drafts/post.html");

        let opts = SiteOptions::builder(dir.path()).exclude_dir("drafts").build();
        let files = find_html_files(&opts).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_missing_root_is_error() {
        let opts = SiteOptions::new("/nonexistent/sitekit/root");
        let err = find_html_files(&opts).unwrap_err();
        assert!(matches!(err, SiteError::MissingRoot(_)));
    }

    #[test]
    fn test_relative_display() {
        let root = Path::new("/srv/site");
        assert_eq!(
            relative_display(root, Path::new("/srv/site/fr/index.html")),
            "fr/index.html"
        );
        assert_eq!(
            relative_display(root, Path::new("/srv/site/index.html")),
            "index.html"
        );
    }
}
