/*!
 * Sign-subtitle classification.
 *
 * Filters an extracted ASS document down to the dialogue events that render
 * on-screen signage rather than spoken dialogue. The filter is a pure,
 * order-preserving pass over the document: section headers and non-dialogue
 * lines are emitted verbatim, dialogue events inside the Events section are
 * either kept unchanged or dropped, and nothing is ever reordered or mutated.
 *
 * The keyword heuristic is deliberately substring-based and case-insensitive:
 * the release corpus this targets uses inconsistent casing and naming, and an
 * occasional false positive costs less than a missed sign line.
 */

use anyhow::{Result, Context};
use log::debug;
use std::path::Path;

use crate::file_utils::FileManager;

/// Style-field keywords that mark a sign event
pub const STYLE_KEYWORDS: [&str; 5] = ["sign", "signs", "overlay", "text", "caption"];

/// Actor/name-field keywords that mark a sign event
pub const ACTOR_KEYWORDS: [&str; 2] = ["sign", "signs"];

/// Override-tag markers in the effect or text field that mark a sign event
pub const TAG_MARKERS: [&str; 4] = ["\\an", "\\pos", "\\move", "\\fad"];

const DIALOGUE_PREFIX: &str = "Dialogue:";
const EVENTS_SECTION: &str = "Events";
const DIALOGUE_FIELD_COUNT: usize = 10;

/// Positional parser state: which section the current line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// Before the Events header, or inside any other section
    Outside,
    /// Inside the Events section; dialogue lines here are classified
    Events,
}

/// Counters describing one classification pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationStats {
    /// Dialogue events kept as sign events
    pub kept: usize,
    /// Dialogue events dropped as spoken dialogue
    pub dropped: usize,
    /// Dialogue lines dropped for having fewer than ten fields
    pub malformed: usize,
}

/// One dialogue event split into its ten fixed fields.
///
/// The text field is the remainder after the ninth comma and may itself
/// contain commas.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueEvent<'a> {
    pub layer: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub style: &'a str,
    pub name: &'a str,
    pub margin_l: &'a str,
    pub margin_r: &'a str,
    pub margin_v: &'a str,
    pub effect: &'a str,
    pub text: &'a str,
}

impl<'a> DialogueEvent<'a> {
    /// Split a `Dialogue:` line into its ten fields using the first nine
    /// commas as delimiters. Returns None for lines with fewer fields.
    pub fn parse(line: &'a str) -> Option<Self> {
        let fields: Vec<&str> = line.splitn(DIALOGUE_FIELD_COUNT, ',').collect();
        if fields.len() < DIALOGUE_FIELD_COUNT {
            return None;
        }

        Some(DialogueEvent {
            layer: fields[0].strip_prefix(DIALOGUE_PREFIX).unwrap_or(fields[0]).trim(),
            start: fields[1],
            end: fields[2],
            style: fields[3],
            name: fields[4],
            margin_l: fields[5],
            margin_r: fields[6],
            margin_v: fields[7],
            effect: fields[8],
            text: fields[9],
        })
    }

    /// Classify this event as a sign event. Matching is substring-based and
    /// case-insensitive against fixed keyword sets.
    pub fn is_sign_event(&self) -> bool {
        let style = self.style.to_lowercase();
        let name = self.name.to_lowercase();
        let effect = self.effect.to_lowercase();
        let text = self.text.to_lowercase();

        STYLE_KEYWORDS.iter().any(|kw| style.contains(kw))
            || ACTOR_KEYWORDS.iter().any(|kw| name.contains(kw))
            || TAG_MARKERS.iter().any(|tag| effect.contains(tag) || text.contains(tag))
    }
}

/// Classify the document at `input` and write the filtered document to
/// `output`, encoded without a byte-order marker.
pub fn classify_file<P: AsRef<Path>>(input: P, output: P) -> Result<ClassificationStats> {
    let input = input.as_ref();
    let output = output.as_ref();

    let content = FileManager::read_to_string(input)
        .with_context(|| format!("Failed to read extracted subtitle: {:?}", input))?;

    let (filtered, stats) = filter_document(&content);

    FileManager::write_to_file(output, &filtered)
        .with_context(|| format!("Failed to write sign subtitle: {:?}", output))?;

    debug!(
        "Classified {:?}: {} sign events kept, {} dropped, {} malformed",
        input, stats.kept, stats.dropped, stats.malformed
    );

    Ok(stats)
}

/// Pure filtering pass over a subtitle document. Deterministic: the same
/// input always produces the same output.
pub fn filter_document(content: &str) -> (String, ClassificationStats) {
    // Tolerate a UTF-8 BOM on the first line; output is always BOM-less
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut section = Section::Outside;
    let mut stats = ClassificationStats::default();
    let mut emitted: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        if let Some(name) = section_header(line) {
            section = if name.eq_ignore_ascii_case(EVENTS_SECTION) {
                Section::Events
            } else {
                Section::Outside
            };
            emitted.push(line);
            continue;
        }

        if section == Section::Events && line.starts_with(DIALOGUE_PREFIX) {
            match DialogueEvent::parse(line) {
                Some(event) if event.is_sign_event() => {
                    emitted.push(line);
                    stats.kept += 1;
                }
                Some(_) => stats.dropped += 1,
                // Fewer than ten fields: malformed, dropped silently
                None => stats.malformed += 1,
            }
            continue;
        }

        emitted.push(line);
    }

    (emitted.join("\n"), stats)
}

/// Match a bracketed section header line, returning the section name
fn section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(&trimmed[1..trimmed.len() - 1])
    } else {
        None
    }
}
