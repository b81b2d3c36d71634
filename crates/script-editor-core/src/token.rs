//! Token model shared by grammars, the tokenizer adapter and the highlight overlay.

use std::fmt;
use std::ops::Range;

/// Lexical category of a token.
///
/// The set is closed: every grammar maps its own classes onto these, and the overlay matches on
/// them exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenCategory {
    /// Reserved words (`Sub`, `If`, `Dim`, ...).
    Keyword,
    /// String literals.
    String,
    /// Comments.
    Comment,
    /// Numeric literals.
    Number,
    /// Built-in functions of the language runtime.
    Builtin,
    /// Function / procedure names.
    Function,
    /// Class and type names.
    ClassName,
    /// Other identifiers.
    Variable,
    /// Named and literal constants.
    Constant,
    /// Operators, symbolic or word-like.
    Operator,
    /// Delimiters.
    Punctuation,
    /// Whitespace and anything the grammar did not classify.
    Plain,
}

impl TokenCategory {
    /// Every category, in declaration order.
    pub const ALL: [TokenCategory; 12] = [
        Self::Keyword,
        Self::String,
        Self::Comment,
        Self::Number,
        Self::Builtin,
        Self::Function,
        Self::ClassName,
        Self::Variable,
        Self::Constant,
        Self::Operator,
        Self::Punctuation,
        Self::Plain,
    ];

    /// Stable lowercase name, suitable as a style/tag key for a renderer.
    pub fn name(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Number => "number",
            Self::Builtin => "builtin",
            Self::Function => "function",
            Self::ClassName => "class-name",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Operator => "operator",
            Self::Punctuation => "punctuation",
            Self::Plain => "plain",
        }
    }

    /// Marker stacking order: plain text renders below every semantic category.
    pub fn z_order(self) -> u8 {
        match self {
            Self::Plain => 0,
            Self::Keyword
            | Self::String
            | Self::Comment
            | Self::Number
            | Self::Builtin
            | Self::Function
            | Self::ClassName
            | Self::Variable
            | Self::Constant
            | Self::Operator
            | Self::Punctuation => 1,
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified, contiguous span of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Category of the span.
    pub category: TokenCategory,
    /// The exact source text.
    pub text: String,
    /// Length of `text` in chars.
    pub len: usize,
}

impl Token {
    /// Create a token, computing its char length.
    pub fn new(category: TokenCategory, text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            category,
            text,
            len,
        }
    }
}

/// A span reported by a [`Grammar`](crate::tokenizer::Grammar), in **byte** offsets of the
/// classified text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSpan {
    /// Half-open byte range.
    pub bytes: Range<usize>,
    /// Category assigned by the grammar.
    pub category: TokenCategory,
}

impl ClassifiedSpan {
    /// Create a span.
    pub fn new(bytes: Range<usize>, category: TokenCategory) -> Self {
        Self { bytes, category }
    }
}
