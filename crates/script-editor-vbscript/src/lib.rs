//! `script-editor-vbscript` - VBScript / VB.NET lexical grammar for `script-editor-core`.
//!
//! The grammar is a list of ordered regex rules compiled into one alternation and matched
//! leftmost-first over the whole document. Identifiers are then classified with word lists and a
//! little statement context (`Sub Foo` names a function, `As Foo` names a type, and so on).
//! Whitespace and anything no rule recognizes is left unclassified; the tokenizer adapter turns
//! it into plain text.
//!
//! This is a highlighter grammar, not a parser: it never fails and never needs to see a
//! well-formed program.

mod words;

use regex::{Captures, Regex};
use script_editor_core::{ClassifiedSpan, Grammar, TokenCategory, Tokenizer};
use std::collections::HashMap;
use words::WordClass;

/// Lexical classes produced by the regex rules, before identifier classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexClass {
    Comment,
    String,
    Date,
    Number,
    Identifier,
    EscapedIdentifier,
    Operator,
    Punctuation,
}

impl LexClass {
    fn group_name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::Date => "date",
            Self::Number => "number",
            Self::Identifier => "ident",
            Self::EscapedIdentifier => "escaped",
            Self::Operator => "operator",
            Self::Punctuation => "punct",
        }
    }
}

/// Rules in priority order. Earlier rules win when two could start at the same offset.
const RULES: &[(LexClass, &str)] = &[
    // ' comment, or REM comment
    (LexClass::Comment, r"'[^\n]*|(?i:\brem\b)[^\n]*"),
    // "string" with "" as an escaped quote; unterminated strings stop at end of line
    (LexClass::String, r#""(?:[^"\n]|"")*"?"#),
    // #1/31/2024#
    (LexClass::Date, r"#\d[^#\n]*#"),
    // &HFF, &O17, 12, 1.5, .5, 1e-3, with optional type suffix
    (
        LexClass::Number,
        r"&[hH][0-9A-Fa-f]+&?|&[oO][0-7]+&?|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?[!#@%&]?",
    ),
    (
        LexClass::Identifier,
        r"\p{L}[\p{L}\p{N}_]*|_[\p{L}\p{N}_]+",
    ),
    // [any name]
    (LexClass::EscapedIdentifier, r"\[[^\]\n]*\]"),
    (LexClass::Operator, r"<>|<=|>=|:=|[-+*/\\^&=<>]"),
    // `_` alone is the line continuation
    (LexClass::Punctuation, r"[(),.:;_!{}]"),
];

/// What an identifier is expected to be, given the words before it on the same statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Nothing,
    FunctionName,
    PropertyAccessor,
    ClassName,
    ConstantName,
}

/// VBScript / VB.NET grammar.
#[derive(Debug, Clone)]
pub struct VbScriptGrammar {
    regex: Regex,
    words: HashMap<String, WordClass>,
}

impl VbScriptGrammar {
    /// Compile the grammar.
    pub fn new() -> Result<Self, regex::Error> {
        let pattern = RULES
            .iter()
            .map(|(class, rule)| format!("(?P<{}>{})", class.group_name(), rule))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            regex: Regex::new(&pattern)?,
            words: words::table(),
        })
    }

    fn word_class(&self, word: &str) -> Option<WordClass> {
        self.words.get(&word.to_lowercase()).copied()
    }

    fn classify_identifier(&self, word: &str, expect: Expect, call: bool) -> TokenCategory {
        let class = self.word_class(word);
        match class {
            Some(WordClass::Keyword) => return TokenCategory::Keyword,
            Some(WordClass::Operator) => return TokenCategory::Operator,
            Some(WordClass::Constant) => return TokenCategory::Constant,
            Some(WordClass::Builtin) | None => {}
        }

        match expect {
            Expect::FunctionName => TokenCategory::Function,
            Expect::ClassName => TokenCategory::ClassName,
            Expect::ConstantName => TokenCategory::Constant,
            Expect::Nothing | Expect::PropertyAccessor => {
                if class == Some(WordClass::Builtin) {
                    TokenCategory::Builtin
                } else if call {
                    TokenCategory::Function
                } else {
                    TokenCategory::Variable
                }
            }
        }
    }
}

/// Build a [`Tokenizer`] for VBScript.
pub fn tokenizer() -> Result<Tokenizer<VbScriptGrammar>, regex::Error> {
    Ok(Tokenizer::new(VbScriptGrammar::new()?))
}

fn matched_class<'h>(caps: &Captures<'h>) -> Option<(LexClass, regex::Match<'h>)> {
    RULES
        .iter()
        .find_map(|(class, _)| caps.name(class.group_name()).map(|m| (*class, m)))
}

/// How a keyword changes what the next identifier is expected to be.
fn next_expectation(keyword: &str, previous_keyword: Option<&str>, current: Expect) -> Expect {
    // `End Sub`, `Exit Function`, ... close a block; they don't declare anything.
    if matches!(previous_keyword, Some("end" | "exit")) {
        return Expect::Nothing;
    }

    match keyword {
        "sub" | "function" => Expect::FunctionName,
        "property" => Expect::PropertyAccessor,
        "get" | "let" | "set" if current == Expect::PropertyAccessor => Expect::FunctionName,
        "class" | "new" | "as" | "implements" | "inherits" => Expect::ClassName,
        "const" => Expect::ConstantName,
        // Modifiers keep whatever is pending: `Public Default Function Foo`.
        "public" | "private" | "default" | "friend" | "shared" | "static" | "byval"
        | "byref" | "optional" => current,
        _ => Expect::Nothing,
    }
}

impl Grammar for VbScriptGrammar {
    fn name(&self) -> &str {
        "VBScript"
    }

    fn classify(&self, text: &str) -> Vec<ClassifiedSpan> {
        let mut spans = Vec::new();
        let mut expect = Expect::Nothing;
        let mut previous_keyword: Option<String> = None;
        let mut last_end = 0usize;
        let mut continued = false;
        let mut in_const = false;

        for caps in self.regex.captures_iter(text) {
            let Some((class, m)) = matched_class(&caps) else {
                continue;
            };

            // A new line starts a new statement unless the previous line ended with `_`.
            if !continued && text[last_end..m.start()].contains('\n') {
                expect = Expect::Nothing;
                previous_keyword = None;
                in_const = false;
            }
            last_end = m.end();
            continued = class == LexClass::Punctuation && m.as_str() == "_";

            let category = match class {
                LexClass::Comment => TokenCategory::Comment,
                LexClass::String => TokenCategory::String,
                LexClass::Date => TokenCategory::Constant,
                LexClass::Number => TokenCategory::Number,
                LexClass::Operator => {
                    // `Const A = B + 1`: only `A` is declared.
                    if m.as_str() == "=" && expect == Expect::ConstantName {
                        expect = Expect::Nothing;
                    }
                    TokenCategory::Operator
                }
                LexClass::EscapedIdentifier => {
                    expect = Expect::Nothing;
                    TokenCategory::Variable
                }
                LexClass::Punctuation => {
                    // `Const A = 1, B = 2` declares again after a comma; `:` starts a new
                    // statement.
                    match m.as_str() {
                        ":" => {
                            expect = Expect::Nothing;
                            previous_keyword = None;
                            in_const = false;
                        }
                        "," if in_const => expect = Expect::ConstantName,
                        _ => {}
                    }
                    TokenCategory::Punctuation
                }
                LexClass::Identifier => {
                    let word = m.as_str();
                    let call = text[m.end()..].starts_with('(');
                    let category = self.classify_identifier(word, expect, call);

                    if category == TokenCategory::Keyword {
                        let lower = word.to_lowercase();
                        expect = next_expectation(&lower, previous_keyword.as_deref(), expect);
                        if expect == Expect::ConstantName {
                            in_const = true;
                        }
                        previous_keyword = Some(lower);
                    } else if expect != Expect::ConstantName {
                        expect = Expect::Nothing;
                    }
                    category
                }
            };

            spans.push(ClassifiedSpan::new(m.start()..m.end(), category));
        }

        tracing::trace!(spans = spans.len(), "vbscript classify");
        spans
    }
}
