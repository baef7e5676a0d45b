//! Filesystem-safe names for remote asset files.
//!
//! Asset names come from remote metadata and are joined onto a user-chosen
//! directory, so they must not smuggle in separators or control characters.

/// Sanitizes an asset name for use as a local file name.
///
/// - Replaces path separators, NUL, and control characters with `_`
/// - Strips leading dots (no hidden files, no `..`)
/// - Truncates to 255 bytes on a char boundary (Linux NAME_MAX)
/// - Falls back to `"download"` if nothing printable remains
pub fn sanitize_asset_name(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c == '\0' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return "download".to_string();
    }

    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }
    let mut cut = NAME_MAX;
    while cut > 0 && !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    trimmed[..cut].to_string()
}
