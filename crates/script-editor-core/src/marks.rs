//! Style markers and the rendering collaborator they are painted on.
//!
//! The core never draws anything. It describes presentation as markers over buffer ranges and
//! hands them to a [`MarkSink`], which a GUI host implements on top of its text widget.

use crate::buffer::{Position, TextRange};
use crate::token::TokenCategory;
use std::collections::BTreeMap;

/// A presentation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleMarker {
    /// Syntax highlighting for a token category.
    Category(TokenCategory),
    /// A search match (baseline styling).
    SearchMatch,
    /// The current search match.
    SearchCurrent,
}

impl StyleMarker {
    /// Stacking order; higher renders on top.
    pub fn z_order(self) -> u8 {
        match self {
            Self::Category(category) => category.z_order(),
            Self::SearchMatch => 2,
            Self::SearchCurrent => 3,
        }
    }

    /// Stable tag name for the renderer.
    pub fn name(self) -> &'static str {
        match self {
            Self::Category(category) => category.name(),
            Self::SearchMatch => "search-match",
            Self::SearchCurrent => "search-current",
        }
    }
}

/// Style-marker and viewport primitives provided by the rendering host.
pub trait MarkSink {
    /// Apply `marker` to `range`.
    fn mark_range(&mut self, range: TextRange, marker: StyleMarker);

    /// Remove every range carrying `marker`.
    fn clear_marks(&mut self, marker: StyleMarker);

    /// Make `position` visible.
    fn scroll_into_view(&mut self, position: Position);
}

/// An in-memory [`MarkSink`] that records what a renderer would have been told.
///
/// Useful for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    marks: BTreeMap<StyleMarker, Vec<TextRange>>,
    revealed: Option<Position>,
    reveal_count: usize,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranges currently carrying `marker`, in the order they were marked.
    pub fn ranges(&self, marker: StyleMarker) -> &[TextRange] {
        self.marks.get(&marker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of marked ranges across all markers.
    pub fn mark_count(&self) -> usize {
        self.marks.values().map(Vec::len).sum()
    }

    /// All markers at `position`, bottom layer first.
    pub fn markers_at(&self, position: Position) -> Vec<StyleMarker> {
        let mut found: Vec<StyleMarker> = self
            .marks
            .iter()
            .filter(|(_, ranges)| {
                ranges
                    .iter()
                    .any(|r| r.start <= position && position < r.end)
            })
            .map(|(marker, _)| *marker)
            .collect();
        found.sort_by_key(|m| (m.z_order(), *m));
        found
    }

    /// Last position passed to [`MarkSink::scroll_into_view`].
    pub fn last_revealed(&self) -> Option<Position> {
        self.revealed
    }

    /// How many times the host was asked to scroll.
    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }
}

impl MarkSink for RecordingSink {
    fn mark_range(&mut self, range: TextRange, marker: StyleMarker) {
        self.marks.entry(marker).or_default().push(range);
    }

    fn clear_marks(&mut self, marker: StyleMarker) {
        self.marks.remove(&marker);
    }

    fn scroll_into_view(&mut self, position: Position) {
        self.revealed = Some(position);
        self.reveal_count += 1;
    }
}
