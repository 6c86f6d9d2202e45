use unicode_normalization::UnicodeNormalization;

pub const MAX_SLUG_LEN: usize = 50;

/// Builds a lower-case ASCII path segment from a display name.
///
/// Accents fold to their base letter, every other run of characters outside
/// `[a-z0-9]` becomes a single hyphen, and the result is capped at
/// [`MAX_SLUG_LEN`] characters with no leading or trailing hyphen.
pub fn slugify(value: &str) -> String {
    let folded: String = value
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_diacritic(*ch))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for ch in folded.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    // ASCII only from here, so byte length is char length.
    slug.truncate(MAX_SLUG_LEN);
    let trimmed_len = slug.trim_end_matches('-').len();
    slug.truncate(trimmed_len);
    slug
}

fn is_combining_diacritic(ch: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&ch)
}
