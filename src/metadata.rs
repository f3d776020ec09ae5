use anyhow::{Result, anyhow};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

// @module: Filename metadata tokenizer

// @const: Combined season/episode marker, e.g. "S2" or "S01E05"
static SEASON_EPISODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bS(\d{1,2})\s*(?:E(\d{1,4}))?\b").unwrap()
});

// @const: " - 05" style episode marker used by fansub release names
static DASH_EPISODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s-\s(\d{1,4})(?:v\d+)?\b").unwrap()
});

// @const: "Ep 5" / "Episode 5" fallback episode marker
static WORD_EPISODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:ep|episode)\.?\s*(\d{1,4})\b").unwrap()
});

// @const: Bracketed or parenthesized token group
static TOKEN_GROUP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]*)\]|\(([^)]*)\)").unwrap()
});

/// Metadata tokenized from a free-form release filename.
///
/// Produced once per pipeline run and consumed by the filename builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMetadata {
    /// Raw series title, not yet normalized
    pub title: String,

    /// Episode identifier; empty when the filename carries none
    pub episode: String,

    /// Season number when the filename carries one
    pub season: Option<u32>,

    /// Language token, defaulted when the filename carries none
    pub language: String,

    /// Output container extension
    pub extension: String,
}

/// Tokenize a release filename into {title, episode, season, language, extension}.
///
/// The heuristics target fansub-style names like
/// `[Group] Anime Title - 05 (1080p) [Eng].mkv`. Fails only when no usable
/// title survives tokenization.
pub fn parse_filename(
    original_name: &str,
    default_language: &str,
    default_extension: &str,
) -> Result<ParsedMetadata> {
    let trimmed = original_name.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Empty filename"));
    }

    let path = Path::new(trimmed);
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| default_extension.to_string());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| trimmed.to_string());

    // Language comes from bracketed/parenthesized tokens; the first token the
    // ISO tables recognize wins. Everything else in groups is release noise.
    let language = detect_language_token(&stem)
        .unwrap_or_else(|| default_language.to_string());

    // Strip the token groups before looking for episode markers so that
    // checksums like [ABCD1234] cannot be mistaken for episode numbers.
    let bare = TOKEN_GROUP_REGEX.replace_all(&stem, " ").to_string();

    let mut season = None;
    let mut episode = String::new();
    let mut title_end = bare.len();

    if let Some(caps) = SEASON_EPISODE_REGEX.captures(&bare) {
        season = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        if let Some(ep) = caps.get(2) {
            episode = trim_leading_zeros(ep.as_str());
        }
        title_end = title_end.min(caps.get(0).map(|m| m.start()).unwrap_or(title_end));
    }

    if episode.is_empty() {
        if let Some(caps) = DASH_EPISODE_REGEX.captures(&bare) {
            episode = trim_leading_zeros(&caps[1]);
            title_end = title_end.min(caps.get(0).map(|m| m.start()).unwrap_or(title_end));
        } else if let Some(caps) = WORD_EPISODE_REGEX.captures(&bare) {
            episode = trim_leading_zeros(&caps[1]);
            title_end = title_end.min(caps.get(0).map(|m| m.start()).unwrap_or(title_end));
        }
    }

    let title = bare[..title_end].trim().to_string();
    if title.is_empty() {
        return Err(anyhow!("No title recognized in filename: {}", original_name));
    }

    debug!(
        "Parsed '{}' -> title='{}' episode='{}' season={:?} language='{}'",
        original_name, title, episode, season, language
    );

    Ok(ParsedMetadata {
        title,
        episode,
        season,
        language,
        extension,
    })
}

/// Find the first bracketed token the ISO 639 tables recognize as a language
fn detect_language_token(stem: &str) -> Option<String> {
    for caps in TOKEN_GROUP_REGEX.captures_iter(stem) {
        let token = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().trim())
            .unwrap_or("");
        if token.is_empty() {
            continue;
        }

        if is_language_token(token) {
            return Some(token.to_string());
        }
    }
    None
}

/// Check a token against the ISO 639-1/639-3 tables and English names
fn is_language_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    isolang::Language::from_639_1(&lower).is_some()
        || isolang::Language::from_639_3(&lower).is_some()
        || isolang::Language::from_name(token).is_some()
}

fn trim_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
