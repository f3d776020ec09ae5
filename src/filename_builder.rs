/*!
 * Canonical output filename construction.
 *
 * Builds the display name for a processed container from parsed filename
 * metadata. This is a pure function with no side effects: it never fails,
 * falling back to a fixed placeholder title when normalization leaves
 * nothing usable.
 */

use crate::metadata::ParsedMetadata;

/// Title used when normalization produces an empty string
const FALLBACK_TITLE: &str = "Unknown";

/// Build the canonical output filename for a processed container.
///
/// Pattern: `"{title} S{season} - {episode} [{language}].{extension}"` when a
/// season is present, otherwise `"{title} - {episode} [{language}].{extension}"`.
pub fn build_output_name(meta: &ParsedMetadata) -> String {
    let mut title = normalize_title(&meta.title);
    if title.is_empty() {
        title = FALLBACK_TITLE.to_string();
    }

    match meta.season {
        Some(season) => format!(
            "{} S{} - {} [{}].{}",
            title, season, meta.episode, meta.language, meta.extension
        ),
        None => format!(
            "{} - {} [{}].{}",
            title, meta.episode, meta.language, meta.extension
        ),
    }
}

/// Normalize a raw title: brackets and underscores become spaces, runs of
/// whitespace collapse to a single space, the result is trimmed and
/// title-cased word by word.
pub fn normalize_title(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '[' | ']' | '_' => ' ',
            other => other,
        })
        .collect();

    replaced
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.as_str().to_lowercase();
            format!("{}{}", first.to_uppercase(), rest)
        }
        None => String::new(),
    }
}
