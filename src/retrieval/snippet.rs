//! Snippet and identifier normalization for search hits
//!
//! Backend documents carry their full text; hits show a short preview cut on
//! a word boundary, and a display id derived from the engine's document id.

/// Marker appended to a shortened snippet
pub const PLACEHOLDER: &str = "…";

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build a preview of `text` at most `width` characters long.
///
/// Whitespace is collapsed first. Text that still doesn't fit is cut after
/// the last whole word that leaves room for [`PLACEHOLDER`]. When not even
/// the first word fits, the preview is the placeholder alone.
pub fn shorten(text: &str, width: usize) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PLACEHOLDER.chars().count());
    let mut out = String::with_capacity(width * 4);
    let mut used = 0usize;

    for word in collapsed.split(' ') {
        let word_len = word.chars().count();
        let needed = if out.is_empty() {
            word_len
        } else {
            used + 1 + word_len
        };
        if needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        used = needed;
    }

    out.push_str(PLACEHOLDER);
    out
}

/// Derive a display identifier from an engine document id.
///
/// Engine ids look like `id:namespace:doctype::local-id`; the part after the
/// last `::` is what users know the document by. Ids without a separator, or
/// with nothing after it, are returned unchanged.
pub fn normalize_document_id(document_id: &str) -> String {
    match document_id.rsplit_once("::") {
        Some((_, tail)) if !tail.is_empty() => tail.to_string(),
        _ => document_id.to_string(),
    }
}
