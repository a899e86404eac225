//! Line-based addressing into UTF-8 source text.

use crate::{Line, LineColumn};

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("line {line} out of range (text has {lines} lines)")]
    LineOutOfRange { line: Line, lines: u32 },
}

/// Byte offsets of every line start in a source text.
///
/// Lines are 1-based; columns are 0-based and counted in code points, so a
/// multi-byte UTF-8 sequence advances a column by one. The index itself only
/// stores line starts; lookups take the text they were built from.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Byte offset of the position `at` within `text`.
    ///
    /// Columns past the end of the line clamp to the line end (the newline
    /// byte, or the end of the text for the last line). Fails when `at.line`
    /// is 0 or beyond the last line.
    pub fn offset(&self, text: &str, at: LineColumn) -> Result<usize, TextError> {
        if at.line == 0 || at.line > self.line_count() {
            return Err(TextError::LineOutOfRange {
                line: at.line,
                lines: self.line_count(),
            });
        }

        let start = self.line_starts[(at.line - 1) as usize];
        let line_end = match self.line_starts.get(at.line as usize) {
            Some(next_start) => next_start - 1,
            None => text.len(),
        };

        let mut remaining = at.column;
        for (offset, _) in text[start..line_end].char_indices() {
            if remaining == 0 {
                return Ok(start + offset);
            }
            remaining -= 1;
        }
        Ok(line_end)
    }
}
