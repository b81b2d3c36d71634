//! Editor session: the single owner of the buffer and everything derived from it.
//!
//! All mutations go through the session, which keeps derived state honest:
//!
//! 1. the buffer changes
//! 2. the search index drops its matches and markers until it is rescanned
//! 3. the scheduler decides whether the highlight pass runs now or after a debounce delay
//!
//! Search navigation and replace rescan the index on demand. Everything runs synchronously on
//! the caller's thread; the only deferred work is the pending highlight pass, which the host
//! triggers through [`EditorSession::poll`] or [`EditorSession::fire_timer`].
//!
//! # Example
//!
//! ```rust
//! use script_editor_core::{EditKind, EditorSession, PlainGrammar, Position, RecordingSink};
//! use std::time::{Duration, Instant};
//!
//! let mut session = EditorSession::new(PlainGrammar, RecordingSink::new());
//! session.load_content("Dim x\n").unwrap();
//!
//! let t0 = Instant::now();
//! session.insert(Position::new(1, 5), "y", EditKind::Insert('y'), t0).unwrap();
//! assert!(session.poll(t0 + Duration::from_millis(100)).unwrap());
//!
//! assert_eq!(session.set_query("xy").unwrap(), 1);
//! assert_eq!(session.search().summary().to_string(), "1/1");
//! ```

use crate::buffer::{Position, TextBuffer, TextRange};
use crate::error::{Result, invariant};
use crate::marks::MarkSink;
use crate::overlay::HighlightOverlay;
use crate::replace::{ReplaceEngine, ReplaceOutcome};
use crate::scheduler::{EditKind, EditScheduler, ScheduleDecision, SchedulerConfig, TimerToken};
use crate::search::{Match, SearchIndex, SearchOptions};
use crate::tokenizer::{Grammar, Tokenizer};
use std::time::Instant;

/// What changed in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChangeKind {
    /// New content was loaded.
    ContentLoaded,
    /// The buffer was edited.
    ContentEdited,
    /// A highlight pass completed.
    Highlighted,
    /// The match list was recomputed.
    MatchesChanged,
    /// The match cursor moved.
    CurrentMatchChanged,
}

/// A change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionChange {
    /// Kind of change.
    pub kind: SessionChangeKind,
    /// Session version after the change.
    pub version: u64,
}

/// Change callback.
pub type SessionCallback = Box<dyn FnMut(&SessionChange) + Send>;

/// One editing session over one document.
pub struct EditorSession<G, S> {
    buffer: TextBuffer,
    tokenizer: Tokenizer<G>,
    overlay: HighlightOverlay,
    scheduler: EditScheduler,
    search: SearchIndex,
    replace: ReplaceEngine,
    sink: S,
    version: u64,
    callbacks: Vec<SessionCallback>,
}

impl<G: Grammar, S: MarkSink> EditorSession<G, S> {
    /// Create a session with default debounce delays and an empty buffer.
    pub fn new(grammar: G, sink: S) -> Self {
        Self::with_config(grammar, sink, SchedulerConfig::default())
    }

    /// Create a session with explicit debounce delays.
    pub fn with_config(grammar: G, sink: S, config: SchedulerConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            tokenizer: Tokenizer::new(grammar),
            overlay: HighlightOverlay::new(),
            scheduler: EditScheduler::new(config),
            search: SearchIndex::new(),
            replace: ReplaceEngine::default(),
            sink,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// The document.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Full text, e.g. for saving.
    pub fn current_text(&self) -> String {
        self.buffer.text()
    }

    /// The tokenizer in use.
    pub fn tokenizer(&self) -> &Tokenizer<G> {
        &self.tokenizer
    }

    /// The highlight overlay.
    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    /// The edit scheduler.
    pub fn scheduler(&self) -> &EditScheduler {
        &self.scheduler
    }

    /// The search index.
    pub fn search(&self) -> &SearchIndex {
        &self.search
    }

    /// The rendering collaborator.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the rendering collaborator.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Monotonic change counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Subscribe to change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&SessionChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Replace the document (LF-normalized) and highlight it immediately.
    pub fn load_content(&mut self, text: &str) -> Result<usize> {
        self.buffer.set_text(text);
        self.scheduler.cancel();
        self.search.invalidate(&mut self.sink);
        self.notify(SessionChangeKind::ContentLoaded);
        tracing::debug!(chars = self.buffer.char_count(), "content loaded");
        self.rehighlight()
    }

    /// Insert `text` at `position` and report the edit.
    ///
    /// Coordinates must come from the current text. A position outside it is a stale range:
    /// debug builds panic, release builds log and return the error. The same holds for
    /// [`delete`](Self::delete) and [`replace_range`](Self::replace_range).
    pub fn insert(
        &mut self,
        position: Position,
        text: &str,
        kind: EditKind,
        now: Instant,
    ) -> Result<TextRange> {
        let range = invariant(self.buffer.insert(position, text))?;
        self.on_buffer_changed(kind, now)?;
        Ok(range)
    }

    /// Delete `range` and report the edit. Returns the removed text.
    pub fn delete(&mut self, range: TextRange, kind: EditKind, now: Instant) -> Result<String> {
        let removed = invariant(self.buffer.delete(range))?;
        self.on_buffer_changed(kind, now)?;
        Ok(removed)
    }

    /// Replace `range` with `text` and report the edit.
    pub fn replace_range(
        &mut self,
        range: TextRange,
        text: &str,
        kind: EditKind,
        now: Instant,
    ) -> Result<TextRange> {
        let new_range = invariant(self.buffer.replace(range, text))?;
        self.on_buffer_changed(kind, now)?;
        Ok(new_range)
    }

    /// Report a content change.
    ///
    /// Invalidates the search index, then either runs a highlight pass right away or leaves one
    /// pending on the scheduler.
    pub fn on_buffer_changed(&mut self, kind: EditKind, now: Instant) -> Result<ScheduleDecision> {
        self.search.invalidate(&mut self.sink);
        self.notify(SessionChangeKind::ContentEdited);

        let decision = self.scheduler.on_edit(kind, now);
        if decision == ScheduleDecision::RunNow {
            self.run_pass()?;
        }
        Ok(decision)
    }

    /// Run the pending pass if its deadline has passed. Returns `true` if a pass ran.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        if !self.scheduler.poll(now) {
            return Ok(false);
        }
        self.run_pass()?;
        Ok(true)
    }

    /// Timer callback for a token returned in [`ScheduleDecision::Scheduled`].
    ///
    /// Tokens of superseded timers are ignored. Returns `true` if a pass ran.
    pub fn fire_timer(&mut self, token: TimerToken) -> Result<bool> {
        if !self.scheduler.fire(token) {
            return Ok(false);
        }
        self.run_pass()?;
        Ok(true)
    }

    /// Re-tokenize and repaint now, dropping any pending pass.
    pub fn rehighlight(&mut self) -> Result<usize> {
        self.scheduler.cancel();
        self.run_pass()
    }

    /// Change the query and rescan. Returns the match count.
    pub fn set_query(&mut self, query: &str) -> Result<usize> {
        let count = invariant(self.search.set_query(query, &self.buffer, &mut self.sink))?;
        self.notify(SessionChangeKind::MatchesChanged);
        Ok(count)
    }

    /// Toggle case sensitivity and rescan. Returns the match count.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> Result<usize> {
        let count = invariant(self.search.set_case_sensitive(
            case_sensitive,
            &self.buffer,
            &mut self.sink,
        ))?;
        self.notify(SessionChangeKind::MatchesChanged);
        Ok(count)
    }

    /// Rescan with explicit query and options. Returns the match count.
    pub fn reindex(&mut self, query: &str, options: SearchOptions) -> Result<usize> {
        let count = invariant(
            self.search
                .reindex(query, options, &self.buffer, &mut self.sink),
        )?;
        self.notify(SessionChangeKind::MatchesChanged);
        Ok(count)
    }

    /// Move to the next match (wrapping). `None` when there are no matches.
    pub fn find_next(&mut self) -> Result<Option<Match>> {
        let stale = self.search.is_stale();
        let found = invariant(self.search.next(&self.buffer, &mut self.sink))?.copied();
        self.after_navigation(stale, found.is_some());
        Ok(found)
    }

    /// Move to the previous match (wrapping). `None` when there are no matches.
    pub fn find_prev(&mut self) -> Result<Option<Match>> {
        let stale = self.search.is_stale();
        let found = invariant(self.search.prev(&self.buffer, &mut self.sink))?.copied();
        self.after_navigation(stale, found.is_some());
        Ok(found)
    }

    /// Replacement text used by [`replace_one`](Self::replace_one) and
    /// [`replace_all`](Self::replace_all).
    pub fn set_replacement(&mut self, replacement: &str) {
        self.replace.set_replacement(replacement);
    }

    /// Replace the current match, then rehighlight immediately.
    pub fn replace_one(&mut self) -> Result<ReplaceOutcome> {
        let outcome = invariant(self.replace.replace_one(
            &mut self.buffer,
            &mut self.search,
            &mut self.sink,
        ))?;
        self.after_replace(outcome)
    }

    /// Replace every match, then rehighlight immediately.
    pub fn replace_all(&mut self) -> Result<ReplaceOutcome> {
        let outcome = invariant(self.replace.replace_all(
            &mut self.buffer,
            &mut self.search,
            &mut self.sink,
        ))?;
        self.after_replace(outcome)
    }

    /// Drop the query and all search markers (search bar closed).
    pub fn clear_search(&mut self) {
        self.search.clear(&mut self.sink);
        self.notify(SessionChangeKind::MatchesChanged);
    }

    fn run_pass(&mut self) -> Result<usize> {
        let text = self.buffer.text();
        let tokens = self.tokenizer.tokenize(&text);
        let count = invariant(self.overlay.apply(&tokens, &self.buffer, &mut self.sink))?;

        tracing::debug!(
            grammar = self.tokenizer.grammar().name(),
            tokens = tokens.len(),
            generation = self.overlay.generation(),
            "highlight pass"
        );
        self.notify(SessionChangeKind::Highlighted);
        Ok(count)
    }

    fn after_navigation(&mut self, rescanned: bool, moved: bool) {
        if rescanned {
            self.notify(SessionChangeKind::MatchesChanged);
        }
        if moved {
            self.notify(SessionChangeKind::CurrentMatchChanged);
        }
    }

    fn after_replace(&mut self, outcome: ReplaceOutcome) -> Result<ReplaceOutcome> {
        self.notify(SessionChangeKind::MatchesChanged);
        if outcome.replaced > 0 {
            self.notify(SessionChangeKind::ContentEdited);
            self.rehighlight()?;
        }
        Ok(outcome)
    }

    fn notify(&mut self, kind: SessionChangeKind) {
        self.version += 1;
        let change = SessionChange {
            kind,
            version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}
