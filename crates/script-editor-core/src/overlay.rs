//! Highlight overlay: paints a token stream onto the buffer.
//!
//! Every application is a full regeneration. The previous generation's markers are cleared and
//! the new token stream is walked once, tracking `(line, column)` as it goes. Old ranges are
//! never diffed against new ones.

use crate::buffer::{Position, TextBuffer, TextRange};
use crate::error::{EditorError, Result};
use crate::marks::{MarkSink, StyleMarker};
use crate::style_table::{StyleInterval, StyleTable};
use crate::token::{Token, TokenCategory};

/// A buffer range tagged with a token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledRange {
    /// Category painted over the range.
    pub category: TokenCategory,
    /// Buffer range.
    pub range: TextRange,
}

/// Owns the styled ranges of one editor session.
#[derive(Debug, Default)]
pub struct HighlightOverlay {
    ranges: Vec<StyledRange>,
    table: StyleTable,
    generation: u64,
}

impl HighlightOverlay {
    /// Create an overlay with nothing painted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all category markers with the ranges described by `tokens`.
    ///
    /// `tokens` must be the tokenization of `buffer`'s current text. A stream that does not
    /// cover the buffer exactly is rejected before anything is cleared.
    ///
    /// Returns the number of styled ranges.
    pub fn apply<S: MarkSink + ?Sized>(
        &mut self,
        tokens: &[Token],
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<usize> {
        let (ranges, intervals) = layout_tokens(tokens, buffer)?;

        self.clear(sink);
        for styled in &ranges {
            sink.mark_range(styled.range, StyleMarker::Category(styled.category));
        }

        self.ranges = ranges;
        self.table = StyleTable::from_intervals(intervals);
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            ranges = self.ranges.len(),
            "highlight overlay applied"
        );
        Ok(self.ranges.len())
    }

    /// Remove every category marker.
    pub fn clear<S: MarkSink + ?Sized>(&mut self, sink: &mut S) {
        for category in TokenCategory::ALL {
            sink.clear_marks(StyleMarker::Category(category));
        }
        self.ranges.clear();
        self.table.clear();
    }

    /// Styled ranges of the current generation, in document order.
    pub fn ranges(&self) -> &[StyledRange] {
        &self.ranges
    }

    /// Styled ranges of one category.
    pub fn ranges_for(&self, category: TokenCategory) -> impl Iterator<Item = &StyledRange> {
        self.ranges.iter().filter(move |r| r.category == category)
    }

    /// Categories painted at a char offset, bottom layer first.
    pub fn styles_at(&self, offset: usize) -> Vec<TokenCategory> {
        let mut categories: Vec<TokenCategory> = self
            .table
            .query_point(offset)
            .into_iter()
            .filter_map(|i| match i.marker {
                StyleMarker::Category(category) => Some(category),
                StyleMarker::SearchMatch | StyleMarker::SearchCurrent => None,
            })
            .collect();
        categories.sort_by_key(|c| (c.z_order(), *c));
        categories.dedup();
        categories
    }

    /// Styled intervals overlapping a char offset window (e.g. the visible viewport).
    pub fn intervals_in(&self, start: usize, end: usize) -> Vec<StyleInterval> {
        self.table
            .query_range(start, end)
            .into_iter()
            .copied()
            .collect()
    }

    /// Number of completed applications.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn layout_tokens(
    tokens: &[Token],
    buffer: &TextBuffer,
) -> Result<(Vec<StyledRange>, Vec<StyleInterval>)> {
    let token_chars: usize = tokens.iter().map(|t| t.len).sum();
    let buffer_chars = buffer.char_count();
    if token_chars != buffer_chars {
        return Err(EditorError::TokenStreamMismatch {
            token_chars,
            buffer_chars,
        });
    }

    let mut ranges = Vec::with_capacity(tokens.len());
    let mut intervals = Vec::with_capacity(tokens.len());
    let mut offset = 0usize;
    let mut position = Position::start();

    for token in tokens.iter().filter(|t| t.len > 0) {
        let start = position;
        for ch in token.text.chars() {
            if ch == '\n' {
                position.line += 1;
                position.column = 0;
            } else {
                position.column += 1;
            }
        }

        ranges.push(StyledRange {
            category: token.category,
            range: TextRange::new(start, position)?,
        });
        intervals.push(StyleInterval::new(
            offset,
            offset + token.len,
            StyleMarker::Category(token.category),
        ));
        offset += token.len;
    }

    // Same length but different line structure means the tokens describe some other text.
    if position != buffer.offset_to_position(buffer_chars)? {
        return Err(EditorError::TokenStreamMismatch {
            token_chars,
            buffer_chars,
        });
    }

    Ok((ranges, intervals))
}
