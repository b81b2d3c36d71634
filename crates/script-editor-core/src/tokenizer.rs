//! Tokenizer adapter.
//!
//! A [`Grammar`] is the external lexical grammar of the edited language. Grammars are allowed to
//! be sloppy: they may skip regions, report overlapping spans, or even report byte ranges that
//! split a UTF-8 sequence. [`Tokenizer`] turns whatever a grammar reports into a stream that is
//! ordered, contiguous, non-overlapping and covers every character, filling the holes with
//! [`TokenCategory::Plain`].
//!
//! Tokenizing is a pure function of the input text, so re-lexing the full document after every
//! edit is deterministic.

use crate::token::{ClassifiedSpan, Token, TokenCategory};

/// An external lexical grammar.
pub trait Grammar {
    /// Human-readable grammar name (e.g. `"VBScript"`).
    fn name(&self) -> &str;

    /// Classify regions of `text`. Byte offsets; order, gaps and overlaps are all tolerated.
    fn classify(&self, text: &str) -> Vec<ClassifiedSpan>;
}

impl<G: Grammar + ?Sized> Grammar for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn classify(&self, text: &str) -> Vec<ClassifiedSpan> {
        (**self).classify(text)
    }
}

/// A grammar that classifies nothing: every document is a single plain token.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainGrammar;

impl Grammar for PlainGrammar {
    fn name(&self) -> &str {
        "Plain Text"
    }

    fn classify(&self, _text: &str) -> Vec<ClassifiedSpan> {
        Vec::new()
    }
}

/// Wraps a [`Grammar`] and produces gap-free token streams.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer<G> {
    grammar: G,
}

impl<G: Grammar> Tokenizer<G> {
    /// Create a tokenizer for `grammar`.
    pub fn new(grammar: G) -> Self {
        Self { grammar }
    }

    /// The wrapped grammar.
    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Tokenize the full text.
    ///
    /// The concatenation of the returned tokens' text is always exactly `text`.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut spans = self.grammar.classify(text);
        spans.sort_by_key(|span| (span.bytes.start, span.bytes.end));

        let mut tokens = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0usize;

        for span in spans {
            let (start, end) = (span.bytes.start, span.bytes.end);
            if start >= end
                || end > text.len()
                || start < cursor
                || !text.is_char_boundary(start)
                || !text.is_char_boundary(end)
            {
                tracing::trace!(
                    grammar = self.grammar.name(),
                    start,
                    end,
                    category = %span.category,
                    "discarding unusable span"
                );
                continue;
            }

            if start > cursor {
                push_token(&mut tokens, TokenCategory::Plain, &text[cursor..start]);
            }
            push_token(&mut tokens, span.category, &text[start..end]);
            cursor = end;
        }

        if cursor < text.len() {
            push_token(&mut tokens, TokenCategory::Plain, &text[cursor..]);
        }

        tokens
    }
}

fn push_token(tokens: &mut Vec<Token>, category: TokenCategory, text: &str) {
    if category == TokenCategory::Plain {
        if let Some(last) = tokens.last_mut() {
            if last.category == TokenCategory::Plain {
                last.text.push_str(text);
                last.len += text.chars().count();
                return;
            }
        }
    }
    tokens.push(Token::new(category, text));
}
