// ABOUTME: HTML character reference decoding for text and attribute values.
// ABOUTME: Resolves the full named table, legacy unterminated names and numeric references in one pass.

use crate::entity_table::NAMED_ENTITIES;

/// Longest run of name characters considered after an `&`.
const MAX_NAME_LEN: usize = 32;

/// Replacements for numeric references in the C1 range, read as
/// Windows-1252 the way browsers do.
const WINDOWS_1252_C1: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

/// Decodes HTML character references to their character equivalents.
///
/// Each reference is resolved at most once, so `&amp;lt;` decodes to `&lt;`,
/// not `<`. Legacy names such as `&copy` decode without their `;`, and a
/// name that is not in the table keeps its longest legacy prefix (`&notit;`
/// becomes `¬it;`). Anything unrecognised is kept verbatim.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let resolved = match after.strip_prefix('#') {
            Some(numeric) => resolve_numeric(numeric).map(|(decoded, used)| (decoded, used + 1)),
            None => resolve_named(after),
        };

        match resolved {
            Some((Replacement::Char(c), consumed)) => {
                result.push(c);
                rest = &after[consumed..];
            }
            Some((Replacement::Str(value), consumed)) => {
                result.push_str(value);
                rest = &after[consumed..];
            }
            None => {
                result.push('&');
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}

enum Replacement {
    Char(char),
    Str(&'static str),
}

fn lookup(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by(|(key, _)| key.cmp(&name))
        .ok()
        .map(|idx| NAMED_ENTITIES[idx].1)
}

fn is_name_char(c: char) -> bool {
    !matches!(c, '\t' | '\n' | '\x0C' | ' ' | '<' | '&' | '#' | ';')
}

/// Resolves a named reference following an `&`. Returns the replacement and
/// the number of bytes consumed.
fn resolve_named(after_amp: &str) -> Option<(Replacement, usize)> {
    let mut name_end = 0;
    for c in after_amp.chars().take(MAX_NAME_LEN) {
        if !is_name_char(c) {
            break;
        }
        name_end += c.len_utf8();
    }
    if name_end == 0 {
        return None;
    }

    let candidate_end = if after_amp[name_end..].starts_with(';') {
        name_end + 1
    } else {
        name_end
    };
    let candidate = &after_amp[..candidate_end];
    if let Some(value) = lookup(candidate) {
        return Some((Replacement::Str(value), candidate_end));
    }

    // Longest legacy prefix of at least two characters. Table names are
    // ASCII, so only char boundaries need checking.
    candidate
        .char_indices()
        .map(|(idx, _)| idx)
        .filter(|&idx| idx >= 2)
        .rev()
        .find_map(|idx| lookup(&candidate[..idx]).map(|value| (Replacement::Str(value), idx)))
}

/// Resolves a numeric reference following `&#`. The `;` is optional.
fn resolve_numeric(numeric: &str) -> Option<(Replacement, usize)> {
    let (digits_start, radix) = match numeric.as_bytes().first() {
        Some(b'x' | b'X') => (1, 16),
        _ => (0, 10),
    };
    let digits_len = numeric[digits_start..]
        .bytes()
        .take_while(|&b| char::from(b).is_digit(radix))
        .count();
    if digits_len == 0 {
        return None;
    }

    let digits_end = digits_start + digits_len;
    let consumed = if numeric[digits_end..].starts_with(';') {
        digits_end + 1
    } else {
        digits_end
    };

    // Overflowing values are past U+10FFFF anyway.
    let code = u32::from_str_radix(&numeric[digits_start..digits_end], radix).unwrap_or(u32::MAX);
    Some((decode_code_point(code), consumed))
}

fn decode_code_point(code: u32) -> Replacement {
    match code {
        0 => Replacement::Char('\u{FFFD}'),
        0x0D => Replacement::Char('\r'),
        0x80..=0x9F => Replacement::Char(WINDOWS_1252_C1[(code - 0x80) as usize]),
        0xD800..=0xDFFF | 0x11_0000..=u32::MAX => Replacement::Char('\u{FFFD}'),
        _ if is_noncharacter(code) => Replacement::Str(""),
        _ => char::from_u32(code).map_or(Replacement::Char('\u{FFFD}'), Replacement::Char),
    }
}

/// Control characters and noncharacters that decode to nothing.
fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF)
        || code & 0xFFFE == 0xFFFE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities_named() {
        assert_eq!(decode_entities("&amp;"), "&");
        assert_eq!(decode_entities("&lt;&gt;"), "<>");
        assert_eq!(decode_entities("&quot;test&quot;"), "\"test\"");
        assert_eq!(decode_entities("&mdash;"), "\u{2014}");
    }

    #[test]
    fn test_full_named_table() {
        assert_eq!(decode_entities("Caf&eacute; cr&egrave;me"), "Café crème");
        assert_eq!(decode_entities("a &ne; b &rarr; c"), "a \u{2260} b \u{2192} c");
        assert_eq!(decode_entities("&Uuml;ber &szlig;"), "Über ß");
        assert_eq!(decode_entities("&NotEqualTilde;"), "\u{2242}\u{338}");
    }

    #[test]
    fn test_legacy_names_without_semicolon() {
        assert_eq!(decode_entities("Fish &amp chips"), "Fish & chips");
        assert_eq!(decode_entities("&copy 2024"), "© 2024");
        assert_eq!(decode_entities("&eacutes"), "és");
        assert_eq!(decode_entities("&notit;"), "¬it;");
    }

    #[test]
    fn test_semicolon_required_names_kept_without_it() {
        assert_eq!(decode_entities("&ne b"), "&ne b");
        assert_eq!(decode_entities("&rarr"), "&rarr");
    }

    #[test]
    fn test_decode_entities_numeric() {
        assert_eq!(decode_entities("&#38;"), "&");
        assert_eq!(decode_entities("&#x26;"), "&");
        assert_eq!(decode_entities("&#169;"), "©");
        assert_eq!(decode_entities("&#xA9;"), "©");
        assert_eq!(decode_entities("&#169 and &#XA9"), "© and ©");
    }

    #[test]
    fn test_numeric_edge_values() {
        assert_eq!(decode_entities("&#0;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#x80;"), "€");
        assert_eq!(decode_entities("&#150;"), "\u{2013}");
        assert_eq!(decode_entities("&#xD800;"), "\u{FFFD}");
        assert_eq!(decode_entities("&#99999999999;"), "\u{FFFD}");
        assert_eq!(decode_entities("a&#1;b&#xFFFF;c"), "abc");
    }

    #[test]
    fn test_decode_entities_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&#38;amp;"), "&amp;");
    }

    #[test]
    fn test_unknown_and_malformed_kept() {
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
        assert_eq!(decode_entities("a & b"), "a & b");
    }

    #[test]
    fn test_table_is_sorted() {
        assert!(NAMED_ENTITIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_non_ascii_passthrough() {
        assert_eq!(decode_entities("café &amp; thé"), "café & thé");
        assert_eq!(decode_entities("&é;"), "&é;");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(decode_entities(""), "");
    }
}
