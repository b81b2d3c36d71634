//! Replace engine.
//!
//! Replacing mutates the buffer, which invalidates every match offset. Both operations therefore
//! end with a full rescan. `replace_all` edits from the last match backwards: an edit can only
//! shift text after it, so every match still waiting to be replaced keeps valid offsets.

use crate::buffer::TextBuffer;
use crate::error::Result;
use crate::marks::MarkSink;
use crate::search::{SearchIndex, SearchMatch};

/// What a replace operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    /// Occurrences replaced.
    pub replaced: usize,
    /// Matches of the query left after the final rescan.
    pub remaining: usize,
}

/// Holds the replacement text and applies it at match locations.
#[derive(Debug, Clone, Default)]
pub struct ReplaceEngine {
    replacement: String,
}

impl ReplaceEngine {
    /// Create an engine with the given replacement text.
    pub fn new(replacement: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
        }
    }

    /// Replacement text.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Change the replacement text.
    pub fn set_replacement(&mut self, replacement: impl Into<String>) {
        self.replacement = replacement.into();
    }

    /// Replace the match under the cursor.
    ///
    /// Does nothing when the cursor is "none". Afterwards the index is rescanned and the cursor
    /// restored to `min(previous, count - 1)`, which is the match that followed the replaced one.
    pub fn replace_one<S: MarkSink + ?Sized>(
        &self,
        buffer: &mut TextBuffer,
        index: &mut SearchIndex,
        sink: &mut S,
    ) -> Result<ReplaceOutcome> {
        index.refresh(buffer, sink)?;

        let Some(current) = index.current().copied() else {
            return Ok(ReplaceOutcome {
                replaced: 0,
                remaining: index.matches().len(),
            });
        };

        buffer.replace_offsets(current.span.start..current.span.end, &self.replacement)?;

        let remaining = index.rescan(buffer, sink)?;
        if remaining > 0 {
            index.select(current.index.min(remaining - 1), sink);
        }

        tracing::debug!(at = %current.range, remaining, "replaced current match");
        Ok(ReplaceOutcome {
            replaced: 1,
            remaining,
        })
    }

    /// Replace every match of the active query.
    pub fn replace_all<S: MarkSink + ?Sized>(
        &self,
        buffer: &mut TextBuffer,
        index: &mut SearchIndex,
        sink: &mut S,
    ) -> Result<ReplaceOutcome> {
        if index.query().is_empty() {
            return Ok(ReplaceOutcome::default());
        }

        index.rescan(buffer, sink)?;
        let spans: Vec<SearchMatch> = index.matches().iter().map(|m| m.span).collect();

        for span in spans.iter().rev() {
            buffer.replace_offsets(span.start..span.end, &self.replacement)?;
        }

        let remaining = index.rescan(buffer, sink)?;
        tracing::debug!(replaced = spans.len(), remaining, "replaced all matches");
        Ok(ReplaceOutcome {
            replaced: spans.len(),
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::{RecordingSink, StyleMarker};
    use crate::search::SearchOptions;

    fn setup(text: &str, query: &str) -> (TextBuffer, SearchIndex, RecordingSink) {
        let buffer = TextBuffer::from_text(text);
        let mut sink = RecordingSink::new();
        let mut index = SearchIndex::new();
        index
            .reindex(query, SearchOptions::case_sensitive(), &buffer, &mut sink)
            .unwrap();
        (buffer, index, sink)
    }

    #[test]
    fn test_replace_all_in_reverse_order() {
        let (mut buffer, mut index, mut sink) = setup("foo bar foo", "foo");
        let engine = ReplaceEngine::new("baz");

        let outcome = engine.replace_all(&mut buffer, &mut index, &mut sink).unwrap();
        assert_eq!(buffer.text(), "baz bar baz");
        assert_eq!(outcome, ReplaceOutcome { replaced: 2, remaining: 0 });
        assert_eq!(index.cursor(), None);
        assert!(sink.ranges(StyleMarker::SearchMatch).is_empty());
    }

    #[test]
    fn test_replace_all_with_longer_and_shorter_text() {
        let (mut buffer, mut index, mut sink) = setup("a-a-a", "a");
        ReplaceEngine::new("xyz")
            .replace_all(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(buffer.text(), "xyz-xyz-xyz");

        index.set_query("xyz", &buffer, &mut sink).unwrap();
        ReplaceEngine::new("")
            .replace_all(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(buffer.text(), "--");
    }

    #[test]
    fn test_replacement_containing_query_is_found_again() {
        let (mut buffer, mut index, mut sink) = setup("ab ab", "ab");
        let outcome = ReplaceEngine::new("abab")
            .replace_all(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(buffer.text(), "abab abab");
        assert_eq!(outcome.remaining, 4);
    }

    #[test]
    fn test_replace_one_keeps_cursor_position() {
        let (mut buffer, mut index, mut sink) = setup("x1 x2 x3", "x");
        index.select(1, &mut sink);

        let outcome = ReplaceEngine::new("y")
            .replace_one(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(buffer.text(), "x1 y2 x3");
        assert_eq!(outcome, ReplaceOutcome { replaced: 1, remaining: 2 });
        // Index 1 now refers to the match that followed the replaced one.
        assert_eq!(index.cursor(), Some(1));
        assert_eq!(index.current().map(|m| m.span.start), Some(6));
    }

    #[test]
    fn test_replace_one_clamps_at_the_end() {
        let (mut buffer, mut index, mut sink) = setup("x1 x2", "x");
        index.select(1, &mut sink);

        ReplaceEngine::new("y")
            .replace_one(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(index.cursor(), Some(0));

        ReplaceEngine::new("y")
            .replace_one(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(buffer.text(), "y1 y2");
        assert_eq!(index.cursor(), None);
    }

    #[test]
    fn test_replace_one_after_edit_resumes_cursor() {
        let (mut buffer, mut index, mut sink) = setup("x1 x2 x3", "x");
        index.select(1, &mut sink);

        buffer.insert_at(0, "x0 ").unwrap();
        index.invalidate(&mut sink);

        ReplaceEngine::new("y")
            .replace_one(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(buffer.text(), "x0 y1 x2 x3");
        assert_eq!(index.cursor(), Some(1));
    }

    #[test]
    fn test_replace_one_without_cursor_is_noop() {
        let (mut buffer, mut index, mut sink) = setup("abc", "zzz");
        let outcome = ReplaceEngine::new("y")
            .replace_one(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(outcome.replaced, 0);
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_replace_all_with_empty_query_is_noop() {
        let (mut buffer, mut index, mut sink) = setup("abc", "");
        let outcome = ReplaceEngine::new("y")
            .replace_all(&mut buffer, &mut index, &mut sink)
            .unwrap();
        assert_eq!(outcome, ReplaceOutcome::default());
        assert_eq!(buffer.text(), "abc");
    }
}
