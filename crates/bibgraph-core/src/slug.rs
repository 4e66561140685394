//! Identifier normalization: free text → URI-safe slug

/// Normalize a text value into a lowercase slug made of `[a-z0-9-]`.
///
/// Missing input stays missing. Every maximal run of characters outside
/// `[a-z0-9]` collapses into a single `-`, and leading/trailing hyphens are
/// dropped. The result may be empty (e.g. for `"???"`).
pub fn normalize(text: Option<&str>) -> Option<String> {
    let text = text?.to_lowercase();
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.trim().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    Some(slug)
}

/// Shorthand for normalizing a value known to be present.
pub fn slug(text: &str) -> String {
    normalize(Some(text)).unwrap_or_default()
}
