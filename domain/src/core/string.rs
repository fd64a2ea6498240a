//! String utilities for backend text.

/// Remove a verbatim-echoed prompt from the start of a backend's raw output.
///
/// Backends may or may not repeat the input prompt before their completion.
/// When `raw` starts with the exact `prompt`, the prefix is removed; in both
/// cases surrounding whitespace is trimmed.
pub fn strip_echo(raw: &str, prompt: &str) -> String {
    raw.strip_prefix(prompt).unwrap_or(raw).trim().to_string()
}

/// Take the first `max_chars` characters of `s`, appending `...` when cut.
///
/// Counts characters rather than bytes, so multi-byte text is never split
/// inside a code point.
pub fn excerpt(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}...", &s[..end]),
    }
}
