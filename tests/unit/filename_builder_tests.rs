/*!
 * Tests for canonical output filename construction
 */

use signmux::filename_builder::{build_output_name, normalize_title};
use signmux::metadata::ParsedMetadata;

fn meta(title: &str, episode: &str, season: Option<u32>, language: &str) -> ParsedMetadata {
    ParsedMetadata {
        title: title.to_string(),
        episode: episode.to_string(),
        season,
        language: language.to_string(),
        extension: "mkv".to_string(),
    }
}

/// Test the season-bearing output pattern
#[test]
fn test_build_output_name_withSeason_shouldIncludeSeasonMarker() {
    let result = build_output_name(&meta("shingeki no kyojin", "5", Some(2), "eng"));
    assert_eq!(result, "Shingeki No Kyojin S2 - 5 [eng].mkv");
}

/// Test the season-less output pattern
#[test]
fn test_build_output_name_withoutSeason_shouldOmitSeasonMarker() {
    let result = build_output_name(&meta("shingeki no kyojin", "5", None, "Jpn"));
    assert_eq!(result, "Shingeki No Kyojin - 5 [Jpn].mkv");
}

/// Test bracket and underscore normalization
#[test]
fn test_normalize_title_withBracketsAndUnderscores_shouldCollapseToSpaces() {
    assert_eq!(normalize_title("[Group]_Anime_Title"), "Group Anime Title");
}

/// Test whitespace collapsing and trimming
#[test]
fn test_normalize_title_withWhitespaceRuns_shouldCollapseAndTrim() {
    assert_eq!(normalize_title("  some    anime   title  "), "Some Anime Title");
}

/// Test title casing of mixed-case input
#[test]
fn test_normalize_title_withMixedCase_shouldTitleCase() {
    assert_eq!(normalize_title("aTTACK on TITAN"), "Attack On Titan");
}

/// Test the fallback when normalization leaves nothing
#[test]
fn test_build_output_name_withEmptyTitle_shouldUseFallbackTitle() {
    let result = build_output_name(&meta("[]_ _", "1", None, "Jpn"));
    assert_eq!(result, "Unknown - 1 [Jpn].mkv");
}

/// Normalizing is idempotent on an already-normalized title
#[test]
fn test_normalize_title_withNormalizedInput_shouldBeStable() {
    let once = normalize_title("Shingeki No Kyojin");
    assert_eq!(normalize_title(&once), once);
}
