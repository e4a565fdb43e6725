//! Script text helpers: content-line extraction and draft statistics.

use serde::Serialize;

use super::model::ScriptLine;

/// Section markers such as `[INTRO]` start with this character once trimmed.
const MARKER_PREFIX: char = '[';

/// Returns true for lines that carry narration.
///
/// Blank lines and stage-direction markers are not content.
pub fn is_content_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with(MARKER_PREFIX)
}

/// Extracts the numbered content lines of a script.
///
/// Numbering is 1-based and contiguous over content lines, regardless of
/// where the line sits in the raw text.
pub fn script_lines(script: &str) -> Vec<ScriptLine> {
    script
        .lines()
        .filter(|line| is_content_line(line))
        .enumerate()
        .map(|(index, line)| ScriptLine::new(index + 1, line.trim()))
        .collect()
}

/// Word and character counts of a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScriptStats {
    pub words: usize,
    pub characters: usize,
    pub content_lines: usize,
}

impl ScriptStats {
    pub fn of(script: &str) -> Self {
        Self {
            words: script.split_whitespace().count(),
            characters: script.chars().count(),
            content_lines: script.lines().filter(|line| is_content_line(line)).count(),
        }
    }
}
