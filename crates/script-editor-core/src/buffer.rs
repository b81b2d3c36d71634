//! Rope-backed text buffer.
//!
//! The buffer stores LF-normalized text in a [`Rope`] and exposes two coordinate systems:
//!
//! - **character offsets** (Unicode scalar values), used by the tokenizer and the search index
//! - **positions** (`line`, `column`), 1-based line and 0-based column, used by the rendering
//!   collaborator
//!
//! Conversions never clamp. A coordinate that does not exist in the current text is reported as
//! an [`EditorError`].

use crate::error::{EditorError, Result};
use ropey::Rope;
use std::fmt;
use std::ops::Range;

/// A location in the buffer: 1-based line, 0-based column (in chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column within the line, starting at 0.
    pub column: usize,
}

impl Position {
    /// Create a position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first position of any buffer.
    pub const fn start() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An ordered pair of positions, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextRange {
    /// Inclusive start.
    pub start: Position,
    /// Exclusive end.
    pub end: Position,
}

impl TextRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: Position, end: Position) -> Result<Self> {
        if start > end {
            return Err(EditorError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// An empty range at `position`.
    pub const fn point(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns `true` if the range covers no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The editable document of one editor session.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from LF-normalized text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Replace the whole content.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Full text snapshot.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of lines. An empty buffer has one line; a trailing `\n` opens a new, empty line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Text of a line (1-based), without its trailing newline.
    pub fn line_text(&self, line: usize) -> Option<String> {
        let idx = self.line_idx(line)?;
        let mut text = self.rope.line(idx).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Length in chars of a line (1-based), excluding its newline.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        let idx = self.line_idx(line)?;
        let slice = self.rope.line(idx);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            Some(len - 1)
        } else {
            Some(len)
        }
    }

    /// Convert a position to a character offset.
    pub fn position_to_offset(&self, position: Position) -> Result<usize> {
        let out_of_bounds = || EditorError::PositionOutOfBounds {
            position,
            line_count: self.line_count(),
        };

        let idx = self.line_idx(position.line).ok_or_else(out_of_bounds)?;
        let line_len = self.line_len(position.line).ok_or_else(out_of_bounds)?;
        if position.column > line_len {
            return Err(out_of_bounds());
        }

        Ok(self.rope.line_to_char(idx) + position.column)
    }

    /// Convert a character offset to a position. `char_count()` itself is a valid offset.
    pub fn offset_to_position(&self, offset: usize) -> Result<Position> {
        self.check_offset(offset)?;

        let idx = self.rope.char_to_line(offset);
        let column = offset - self.rope.line_to_char(idx);
        Ok(Position::new(idx + 1, column))
    }

    /// Convert a range to a half-open char offset range.
    pub fn range_to_offsets(&self, range: TextRange) -> Result<Range<usize>> {
        let start = self.position_to_offset(range.start)?;
        let end = self.position_to_offset(range.end)?;
        Ok(start..end)
    }

    /// Convert a half-open char offset range to a [`TextRange`].
    pub fn offsets_to_range(&self, offsets: Range<usize>) -> Result<TextRange> {
        let start = self.offset_to_position(offsets.start)?;
        let end = self.offset_to_position(offsets.end)?;
        TextRange::new(start, end)
    }

    /// Text covered by `range`.
    pub fn slice(&self, range: TextRange) -> Result<String> {
        let offsets = self.range_to_offsets(range)?;
        Ok(self.rope.slice(offsets).to_string())
    }

    /// Insert `text` at `position`, returning the range the inserted text now occupies.
    pub fn insert(&mut self, position: Position, text: &str) -> Result<TextRange> {
        let offset = self.position_to_offset(position)?;
        self.insert_at(offset, text)
    }

    /// Delete the text in `range`, returning it.
    pub fn delete(&mut self, range: TextRange) -> Result<String> {
        let offsets = self.range_to_offsets(range)?;
        self.delete_offsets(offsets)
    }

    /// Replace the text in `range` with `text`, returning the range of the new text.
    pub fn replace(&mut self, range: TextRange, text: &str) -> Result<TextRange> {
        let offsets = self.range_to_offsets(range)?;
        self.replace_offsets(offsets, text)
    }

    /// Insert at a character offset.
    pub fn insert_at(&mut self, offset: usize, text: &str) -> Result<TextRange> {
        self.check_offset(offset)?;
        self.rope.insert(offset, text);
        let end = offset + text.chars().count();
        self.offsets_to_range(offset..end)
    }

    /// Delete a half-open char offset range.
    pub fn delete_offsets(&mut self, offsets: Range<usize>) -> Result<String> {
        self.check_offset(offsets.end)?;
        if offsets.start > offsets.end {
            return Err(EditorError::InvertedRange {
                start: self.offset_to_position(offsets.start)?,
                end: self.offset_to_position(offsets.end)?,
            });
        }

        let removed = self.rope.slice(offsets.clone()).to_string();
        self.rope.remove(offsets);
        Ok(removed)
    }

    /// Replace a half-open char offset range with `text`.
    pub fn replace_offsets(&mut self, offsets: Range<usize>, text: &str) -> Result<TextRange> {
        let start = offsets.start;
        self.delete_offsets(offsets)?;
        self.insert_at(start, text)
    }

    fn line_idx(&self, line: usize) -> Option<usize> {
        if line == 0 || line > self.rope.len_lines() {
            None
        } else {
            Some(line - 1)
        }
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        let char_count = self.rope.len_chars();
        if offset > char_count {
            return Err(EditorError::OffsetOutOfBounds { offset, char_count });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.char_count(), 0);
        assert_eq!(buffer.line_len(1), Some(0));
        assert_eq!(buffer.line_len(2), None);
    }

    #[test]
    fn test_trailing_newline_opens_a_line() {
        let buffer = TextBuffer::from_text("Sub Main()\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_text(1).as_deref(), Some("Sub Main()"));
        assert_eq!(buffer.line_text(2).as_deref(), Some(""));
    }

    #[test]
    fn test_position_offset_conversion() {
        let buffer = TextBuffer::from_text("ABC\nDEF\nGHI");

        assert_eq!(buffer.position_to_offset(Position::new(1, 0)).unwrap(), 0);
        assert_eq!(buffer.position_to_offset(Position::new(1, 3)).unwrap(), 3);
        assert_eq!(buffer.position_to_offset(Position::new(2, 0)).unwrap(), 4);
        assert_eq!(buffer.position_to_offset(Position::new(3, 2)).unwrap(), 10);

        assert_eq!(buffer.offset_to_position(0).unwrap(), Position::new(1, 0));
        assert_eq!(buffer.offset_to_position(3).unwrap(), Position::new(1, 3));
        assert_eq!(buffer.offset_to_position(4).unwrap(), Position::new(2, 0));
        assert_eq!(buffer.offset_to_position(11).unwrap(), Position::new(3, 3));
    }

    #[test]
    fn test_out_of_bounds_is_an_error_not_a_clamp() {
        let buffer = TextBuffer::from_text("ab\ncd");

        assert!(matches!(
            buffer.position_to_offset(Position::new(1, 3)),
            Err(EditorError::PositionOutOfBounds { .. })
        ));
        assert!(matches!(
            buffer.position_to_offset(Position::new(0, 0)),
            Err(EditorError::PositionOutOfBounds { .. })
        ));
        assert!(matches!(
            buffer.position_to_offset(Position::new(3, 0)),
            Err(EditorError::PositionOutOfBounds { .. })
        ));
        assert!(matches!(
            buffer.offset_to_position(6),
            Err(EditorError::OffsetOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break() {
        let buffer = TextBuffer::from_text("a\rb\nc");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_len(1), Some(3));
    }

    #[test]
    fn test_utf8_columns_count_chars() {
        let buffer = TextBuffer::from_text("año\nñandú");
        assert_eq!(buffer.line_len(1), Some(3));
        assert_eq!(buffer.position_to_offset(Position::new(2, 5)).unwrap(), 9);
        assert_eq!(buffer.offset_to_position(5).unwrap(), Position::new(2, 1));
    }

    #[test]
    fn test_insert_delete_replace() {
        let mut buffer = TextBuffer::from_text("Dim x\nx = 1");

        let inserted = buffer.insert(Position::new(1, 5), ", y").unwrap();
        assert_eq!(inserted.start, Position::new(1, 5));
        assert_eq!(inserted.end, Position::new(1, 8));
        assert_eq!(buffer.text(), "Dim x, y\nx = 1");

        let range = TextRange::new(Position::new(1, 5), Position::new(1, 8)).unwrap();
        assert_eq!(buffer.delete(range).unwrap(), ", y");
        assert_eq!(buffer.text(), "Dim x\nx = 1");

        let range = TextRange::new(Position::new(2, 4), Position::new(2, 5)).unwrap();
        let replaced = buffer.replace(range, "\"one\"").unwrap();
        assert_eq!(replaced.end, Position::new(2, 9));
        assert_eq!(buffer.text(), "Dim x\nx = \"one\"");
    }

    #[test]
    fn test_multiline_insert_returns_spanning_range() {
        let mut buffer = TextBuffer::from_text("ab");
        let inserted = buffer.insert(Position::new(1, 1), "x\nyz\n").unwrap();
        assert_eq!(inserted.start, Position::new(1, 1));
        assert_eq!(inserted.end, Position::new(3, 0));
        assert_eq!(buffer.text(), "ax\nyz\nb");
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(TextRange::new(Position::new(2, 0), Position::new(1, 4)).is_err());
        assert!(TextRange::new(Position::new(1, 4), Position::new(1, 4)).is_ok());
    }
}
