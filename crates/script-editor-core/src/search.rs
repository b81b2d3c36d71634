//! Search index with a wrap-around match cursor.
//!
//! Matching is plain-text: the query is escaped and compiled into a regex, so case folding comes
//! from the regex engine and the buffer text is never rewritten. Occurrences are collected
//! left to right and the scan resumes at the end of each match, so a query never overlaps
//! itself (`"aa"` in `"aaa"` is one match).
//!
//! All public offsets are **character** offsets, not byte offsets.

use crate::buffer::{TextBuffer, TextRange};
use crate::error::{Result, SearchError};
use crate::marks::{MarkSink, StyleMarker};
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Options that control matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// If `true`, letter case must match exactly.
    pub case_sensitive: bool,
}

impl SearchOptions {
    /// Case-sensitive matching.
    pub const fn case_sensitive() -> Self {
        Self {
            case_sensitive: true,
        }
    }

    /// Case-insensitive matching.
    pub const fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
        }
    }
}

/// A match as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start char offset.
    pub start: usize,
    /// Exclusive end char offset.
    pub end: usize,
}

impl SearchMatch {
    /// Length in chars.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A match in the current match list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Buffer range.
    pub range: TextRange,
    /// Char offsets of the same range.
    pub span: SearchMatch,
    /// Ordinal in the match list.
    pub index: usize,
}

#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

fn compile_query(query: &str, options: SearchOptions) -> std::result::Result<Regex, SearchError> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(SearchError::InvalidPattern)
}

/// Find every non-overlapping occurrence of `query` in `text`.
///
/// An empty query yields no matches.
pub fn find_all(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> std::result::Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let re = compile_query(query, options)?;
    if text.is_ascii() {
        return Ok(re
            .find_iter(text)
            .map(|m| SearchMatch {
                start: m.start(),
                end: m.end(),
            })
            .collect());
    }

    let index = CharIndex::new(text);
    Ok(re
        .find_iter(text)
        .map(|m| SearchMatch {
            start: index.byte_to_char(m.start()),
            end: index.byte_to_char(m.end()),
        })
        .filter(|m| !m.is_empty())
        .collect())
}

/// Match count and cursor, as shown next to the search field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSummary {
    /// Cursor position, if any.
    pub current: Option<usize>,
    /// Number of matches.
    pub total: usize,
    /// Whether a non-empty query is active.
    pub has_query: bool,
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_query {
            return Ok(());
        }
        match self.current {
            Some(current) if self.total > 0 => write!(f, "{}/{}", current + 1, self.total),
            _ if self.total == 1 => f.write_str("1 result"),
            _ => write!(f, "{} results", self.total),
        }
    }
}

/// The ordered match list for the active query, plus the match cursor.
///
/// Matches are only valid for the buffer text they were computed from. After any mutation the
/// owner calls [`SearchIndex::invalidate`], which drops them; navigation on a stale index
/// rescans first.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    query: String,
    options: SearchOptions,
    matches: Vec<Match>,
    cursor: Option<usize>,
    /// Cursor at the time of the last invalidation.
    resume: Option<usize>,
    stale: bool,
}

impl SearchIndex {
    /// Create an empty index (no query).
    pub fn new() -> Self {
        Self::default()
    }

    /// Active query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Active options.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Current match list.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Match cursor; `None` when nothing is selected.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The match under the cursor.
    pub fn current(&self) -> Option<&Match> {
        self.cursor.and_then(|idx| self.matches.get(idx))
    }

    /// Returns `true` if the buffer changed since the last scan.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Status label data. Empty while the index is stale.
    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            current: self.cursor,
            total: self.matches.len(),
            has_query: !self.query.is_empty() && !self.stale,
        }
    }

    /// Drop the match list and its markers after a buffer mutation.
    ///
    /// The query and options are kept; the next navigation or replace rescans.
    pub fn invalidate<S: MarkSink + ?Sized>(&mut self, sink: &mut S) {
        sink.clear_marks(StyleMarker::SearchMatch);
        sink.clear_marks(StyleMarker::SearchCurrent);
        self.matches.clear();
        self.resume = self.cursor.take().or(self.resume);
        self.stale = true;
    }

    /// Rescan if stale, putting the cursor back on `min(previous, count - 1)`.
    ///
    /// Returns the match count.
    pub fn refresh<S: MarkSink + ?Sized>(
        &mut self,
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<usize> {
        if !self.stale {
            return Ok(self.matches.len());
        }

        let previous = self.resume;
        let count = self.rescan(buffer, sink)?;
        if let Some(previous) = previous {
            if count > 0 {
                self.select(previous.min(count - 1), sink);
            }
        }
        Ok(count)
    }

    /// Recompute matches for `query`/`options` from the start of the buffer.
    ///
    /// Every match is painted as [`StyleMarker::SearchMatch`]. When there is at least one
    /// match the cursor lands on the first one, which is painted as current and revealed.
    /// Returns the match count.
    pub fn reindex<S: MarkSink + ?Sized>(
        &mut self,
        query: &str,
        options: SearchOptions,
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<usize> {
        if self.query != query {
            self.query = query.to_string();
        }
        self.options = options;
        self.rescan(buffer, sink)?;
        if !self.matches.is_empty() {
            self.select(0, sink);
        }
        Ok(self.matches.len())
    }

    /// Change the query and rescan.
    pub fn set_query<S: MarkSink + ?Sized>(
        &mut self,
        query: &str,
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<usize> {
        self.reindex(query, self.options, buffer, sink)
    }

    /// Toggle case sensitivity and rescan.
    pub fn set_case_sensitive<S: MarkSink + ?Sized>(
        &mut self,
        case_sensitive: bool,
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<usize> {
        let query = self.query.clone();
        self.reindex(&query, SearchOptions { case_sensitive }, buffer, sink)
    }

    /// Recompute matches with the active query, leaving the cursor at "none".
    pub fn rescan<S: MarkSink + ?Sized>(
        &mut self,
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<usize> {
        sink.clear_marks(StyleMarker::SearchMatch);
        sink.clear_marks(StyleMarker::SearchCurrent);
        self.matches.clear();
        self.cursor = None;
        self.resume = None;
        self.stale = false;

        let text = buffer.text();
        let spans = find_all(&text, &self.query, self.options)?;

        self.matches.reserve(spans.len());
        for (index, span) in spans.into_iter().enumerate() {
            let range = buffer.offsets_to_range(span.start..span.end)?;
            sink.mark_range(range, StyleMarker::SearchMatch);
            self.matches.push(Match { range, span, index });
        }

        tracing::debug!(
            query = %self.query,
            case_sensitive = self.options.case_sensitive,
            matches = self.matches.len(),
            "search reindexed"
        );
        Ok(self.matches.len())
    }

    /// Put the cursor on match `index`, repaint the current marker and reveal it.
    ///
    /// Returns `None` (and changes nothing) if `index` is out of range.
    pub fn select<S: MarkSink + ?Sized>(&mut self, index: usize, sink: &mut S) -> Option<&Match> {
        let m = *self.matches.get(index)?;
        self.cursor = Some(index);
        sink.clear_marks(StyleMarker::SearchCurrent);
        sink.mark_range(m.range, StyleMarker::SearchCurrent);
        sink.scroll_into_view(m.range.start);
        self.matches.get(index)
    }

    /// Advance to the next match, wrapping from last to first.
    ///
    /// Rescans first if the index is stale. A no-op with no matches.
    pub fn next<S: MarkSink + ?Sized>(
        &mut self,
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<Option<&Match>> {
        self.step(buffer, sink, true)
    }

    /// Move to the previous match, wrapping from first to last.
    ///
    /// Rescans first if the index is stale. A no-op with no matches.
    pub fn prev<S: MarkSink + ?Sized>(
        &mut self,
        buffer: &TextBuffer,
        sink: &mut S,
    ) -> Result<Option<&Match>> {
        self.step(buffer, sink, false)
    }

    /// Drop the query, the matches and their markers.
    pub fn clear<S: MarkSink + ?Sized>(&mut self, sink: &mut S) {
        sink.clear_marks(StyleMarker::SearchMatch);
        sink.clear_marks(StyleMarker::SearchCurrent);
        self.query.clear();
        self.matches.clear();
        self.cursor = None;
        self.resume = None;
        self.stale = false;
    }

    fn step<S: MarkSink + ?Sized>(
        &mut self,
        buffer: &TextBuffer,
        sink: &mut S,
        forward: bool,
    ) -> Result<Option<&Match>> {
        if self.stale {
            self.rescan(buffer, sink)?;
        }

        let count = self.matches.len();
        if count == 0 {
            return Ok(None);
        }

        let target = match (self.cursor, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(idx), true) => (idx + 1) % count,
            (Some(idx), false) => (idx + count - 1) % count,
        };
        Ok(self.select(target, sink))
    }
}
