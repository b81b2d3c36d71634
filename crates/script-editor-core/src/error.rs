//! Error types shared by the editing core.
//!
//! Most "failures" in an editor are not errors at all: a grammar that cannot classify a region
//! yields plain text, and navigating an empty match list is a no-op. What remains are
//! coordinate errors, which always indicate a stale or miscomputed range.

use crate::buffer::Position;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors surfaced by the buffer, overlay and search/replace operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A `(line, column)` position that does not exist in the current buffer.
    #[error("position {position} is outside the buffer ({line_count} lines)")]
    PositionOutOfBounds {
        /// The offending position.
        position: Position,
        /// Line count of the buffer at the time of the call.
        line_count: usize,
    },

    /// A character offset past the end of the buffer.
    #[error("offset {offset} is outside the buffer ({char_count} chars)")]
    OffsetOutOfBounds {
        /// The offending character offset.
        offset: usize,
        /// Character count of the buffer at the time of the call.
        char_count: usize,
    },

    /// A range whose start comes after its end.
    #[error("inverted range: {start} > {end}")]
    InvertedRange {
        /// Range start.
        start: Position,
        /// Range end.
        end: Position,
    },

    /// A token stream that does not describe the buffer it is applied to.
    #[error("token stream covers {token_chars} chars but buffer has {buffer_chars}")]
    TokenStreamMismatch {
        /// Total characters covered by the tokens.
        token_chars: usize,
        /// Characters in the buffer.
        buffer_chars: usize,
    },

    /// Search failure.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The escaped query could not be compiled (e.g. it exceeds the regex size limit).
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Pass through the result of a step whose coordinates must fit the current text: ranges the
/// core computed itself, and session edits reported by the host.
///
/// A coordinate error there means a stale or miscomputed range: debug and test builds abort on
/// the spot, release builds log and propagate it. Search errors are ordinary errors.
pub(crate) fn invariant<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        if matches!(err, EditorError::Search(_)) {
            return result;
        }
        tracing::warn!(error = %err, "editor invariant violated");
        if cfg!(debug_assertions) {
            panic!("editor invariant violated: {err}");
        }
    }
    result
}
