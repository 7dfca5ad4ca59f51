/// Locate the first balanced `open`..`close` substring in `text`.
///
/// Depth counting is character-by-character and deliberately not JSON-aware:
/// delimiters inside string literals still count. Model output that trips
/// this up is handled by the caller's direct-decode fallback.
pub fn extract_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    for (idx, ch) in text[start..].char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(&text[start..start + idx + close.len_utf8()]);
            }
        }
    }
    None
}

/// First balanced JSON object (`{...}`) in `text`.
pub fn extract_object(text: &str) -> Option<&str> {
    extract_balanced(text, '{', '}')
}

/// First balanced JSON array (`[...]`) in `text`.
pub fn extract_array(text: &str) -> Option<&str> {
    extract_balanced(text, '[', ']')
}
