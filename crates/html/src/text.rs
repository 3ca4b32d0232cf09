// ABOUTME: Whitespace normalization helpers for flattened element text.
// ABOUTME: Collapses whitespace runs and measures text length in characters.

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result.trim().to_string()
}

/// Joins text chunks and collapses the result, as done for paragraphs and
/// button labels.
pub fn flatten_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    let joined: String = chunks.iter().map(AsRef::as_ref).collect();
    collapse_whitespace(&joined)
}

/// Length in Unicode scalar values, not bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
