//! Text helpers for compact notification and terminal output.

/// Marker appended to truncated text.
const ELLIPSIS: &str = "...";

/// Truncate to at most `max_chars` characters, ending in `...` when cut.
///
/// Counts characters, not bytes, so multi-byte names never split.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    out
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
