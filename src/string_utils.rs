//! UTF-8 Safe String Utilities
//!
//! Truncation helpers that count characters rather than bytes, so a limit
//! never lands inside a multi-byte character like `ø`, `中` or `🎉`.

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Byte index just past the first `max_chars` characters of `s`.
///
/// Returns `s.len()` when `s` has `max_chars` characters or fewer.
#[inline]
pub fn char_boundary_at(s: &str, max_chars: usize) -> usize {
    s.char_indices()
        .nth(max_chars)
        .map(|(index, _)| index)
        .unwrap_or(s.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Truncation
// ─────────────────────────────────────────────────────────────────────────────

/// Truncate `s` to at most `max_chars` characters, appending `...` when
/// anything was cut.
///
/// # Example
/// ```
/// use qrito_share::string_utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("https://example.com", 5), "https...");
/// assert_eq!(truncate_with_ellipsis("short", 60), "short");
/// ```
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    let end = char_boundary_at(s, max_chars);
    if end == s.len() {
        s.to_string()
    } else {
        format!("{}{}", &s[..end], ELLIPSIS)
    }
}

/// Payload preview for display, truncated like document captions.
pub fn preview_text(payload: &str, max_chars: usize) -> String {
    truncate_with_ellipsis(payload.trim(), max_chars)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
