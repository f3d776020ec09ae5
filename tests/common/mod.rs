/*!
 * Common test utilities for the signmux test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small ASS document with one sign event and one spoken-dialogue event
pub const SAMPLE_ASS_DOCUMENT: &str = "[Script Info]\n\
Title: sample\n\
ScriptType: v4.00+\n\
\n\
[V4+ Styles]\n\
Format: Name, Fontname, Fontsize\n\
Style: Default,Arial,20\n\
Style: Sign,Arial,24\n\
\n\
[Events]\n\
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
Dialogue: 0,0:00:01.00,0:00:03.00,Sign,Overlay,0,0,0,,{\\pos(100,200)}Store Name\n\
Dialogue: 0,0:00:01.00,0:00:03.00,Default,Narrator,0,0,0,,Hello there";

/// Creates a sample ASS subtitle file for testing
pub fn create_test_ass(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_ASS_DOCUMENT)
}
