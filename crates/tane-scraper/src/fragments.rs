//! Text fragment collection.

use scraper::ElementRef;

/// All descendant text nodes in document order, trimmed, empties dropped.
pub fn text_fragments(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
