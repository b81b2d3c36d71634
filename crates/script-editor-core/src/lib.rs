#![warn(missing_docs)]
//! Script Editor Core - headless editing core for a source-code editor
//!
//! # Overview
//!
//! `script-editor-core` keeps a styled view of a document in sync with continuous edits, and
//! keeps a list of search matches coherent while the text under them moves. It does not render
//! anything: presentation is described as style markers over buffer ranges and handed to a host
//! [`MarkSink`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorSession (owns everything below)      │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  EditScheduler       │  SearchIndex         │
//! │  (debounce)          │  ReplaceEngine       │
//! ├──────────────────────┴──────────────────────┤
//! │  Tokenizer<Grammar> → HighlightOverlay      │  ← Highlighting
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (Rope)                          │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Data flow: a buffer mutation is reported to the [`EditScheduler`], which decides when the
//! next pass runs; a pass re-tokenizes the full text and the [`HighlightOverlay`] repaints.
//! Independently, the [`SearchIndex`] rescans when the query changes, after a replace, or on
//! navigation after the buffer changed.
//!
//! # Quick Start
//!
//! ```rust
//! use script_editor_core::{
//!     EditorSession, PlainGrammar, RecordingSink, SchedulerState, StyleMarker,
//! };
//!
//! let mut session = EditorSession::new(PlainGrammar, RecordingSink::new());
//! session.load_content("foo bar foo").unwrap();
//!
//! session.set_query("foo").unwrap();
//! session.set_replacement("baz");
//! session.replace_all().unwrap();
//!
//! assert_eq!(session.current_text(), "baz bar baz");
//! assert!(session.search().matches().is_empty());
//! assert_eq!(session.scheduler().state(), SchedulerState::Idle);
//! assert!(session.sink().ranges(StyleMarker::SearchMatch).is_empty());
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - rope-backed buffer, positions and ranges
//! - [`token`] - token categories and tokens
//! - [`tokenizer`] - grammar seam and the gap-filling tokenizer adapter
//! - [`marks`] - style markers and the rendering sink
//! - [`style_table`] - interval table for styled ranges
//! - [`overlay`] - highlight overlay
//! - [`scheduler`] - debounced re-highlighting
//! - [`search`] - search index and match cursor
//! - [`replace`] - replace engine
//! - [`session`] - editor session
//!
//! # Coordinates
//!
//! Positions use a 1-based line and a 0-based column, both counted in Unicode scalar values.
//! Text is stored LF-normalized; line-ending policy belongs to whoever loads and saves it.

pub mod buffer;
pub mod error;
pub mod marks;
pub mod overlay;
pub mod replace;
pub mod scheduler;
pub mod search;
pub mod session;
pub mod style_table;
pub mod token;
pub mod tokenizer;

pub use buffer::{Position, TextBuffer, TextRange};
pub use error::{EditorError, Result, SearchError};
pub use marks::{MarkSink, RecordingSink, StyleMarker};
pub use overlay::{HighlightOverlay, StyledRange};
pub use replace::{ReplaceEngine, ReplaceOutcome};
pub use scheduler::{
    EditKind, EditScheduler, ScheduleDecision, SchedulerConfig, SchedulerState, TimerToken,
    Urgency,
};
pub use search::{Match, MatchSummary, SearchIndex, SearchMatch, SearchOptions, find_all};
pub use session::{EditorSession, SessionCallback, SessionChange, SessionChangeKind};
pub use style_table::{StyleInterval, StyleTable};
pub use token::{ClassifiedSpan, Token, TokenCategory};
pub use tokenizer::{Grammar, PlainGrammar, Tokenizer};
