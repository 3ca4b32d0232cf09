// ABOUTME: Minimal YAML-style front matter reader for Jekyll pages.
// ABOUTME: Reads flat `key: value` lines from a leading `---` block; anything else is ignored.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static FRONT_MATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*\n").unwrap());

/// Parse the front matter block at the very start of `content`.
///
/// Each line containing a `:` is split at the first colon; key and value
/// are trimmed. Returns an empty map when there is no block.
pub fn parse_front_matter(content: &str) -> BTreeMap<String, String> {
    let Some(caps) = FRONT_MATTER_RE.captures(content) else {
        return BTreeMap::new();
    };

    caps.get(1)
        .map(|block| {
            block
                .as_str()
                .lines()
                .filter_map(|line| line.split_once(':'))
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_front_matter() {
        let content = "---\nlayout: default\nlang: fr\nref: about\ntitle: À propos: nous\n---\n<p>x</p>";
        let fm = parse_front_matter(content);
        assert_eq!(fm.get("lang").map(String::as_str), Some("fr"));
        assert_eq!(fm.get("ref").map(String::as_str), Some("about"));
        assert_eq!(fm.get("title").map(String::as_str), Some("À propos: nous"));
        assert_eq!(fm.len(), 4);
    }

    #[test]
    fn test_lines_without_colon_ignored() {
        let fm = parse_front_matter("---\nlang: en\n- item\n\n---\n");
        assert_eq!(fm.len(), 1);
    }

    #[test]
    fn test_block_must_open_document() {
        assert!(parse_front_matter("<p>hi</p>\n---\nlang: en\n---\n").is_empty());
        assert!(parse_front_matter("").is_empty());
    }

    #[test]
    fn test_unterminated_block() {
        assert!(parse_front_matter("---\nlang: en\n").is_empty());
    }

    #[test]
    fn test_windows_line_endings_trimmed() {
        let fm = parse_front_matter("---\r\nlang: de\r\nref: home\r\n---\r\n");
        assert_eq!(fm.get("lang").map(String::as_str), Some("de"));
        assert_eq!(fm.get("ref").map(String::as_str), Some("home"));
    }
}
