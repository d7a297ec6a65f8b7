use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

pub const BLOCK_TAG_START: &str = "{%";
pub const BLOCK_TAG_END: &str = "%}";
pub const VARIABLE_TAG_START: &str = "{{";
pub const VARIABLE_TAG_END: &str = "}}";
pub const COMMENT_TAG_START: &str = "{#";
pub const COMMENT_TAG_END: &str = "#}";

// Non-greedy so adjacent directives split correctly. (?s) because directive
// contents may span lines.
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{%.*?%\}|\{\{.*?\}\}|\{#.*?#\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Var,
    Block,
    Comment,
}

/// One lexed unit of template source. Directive tokens carry their inner
/// text with the delimiters stripped and surrounding whitespace trimmed.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub contents: String,
    /// Byte span in source. `0..0` unless produced by the `DebugLexer`.
    pub span: Range<usize>,
}

/// The standard lexer. Does not track source positions.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { source }
    }

    pub fn tokenize(&self) -> Vec<Token> {
        tokenize_impl(self.source, false)
    }
}

/// Debug variant that records accurate byte spans on every token so parse
/// errors can point into the template source.
pub struct DebugLexer<'a> {
    source: &'a str,
}

impl<'a> DebugLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        DebugLexer { source }
    }

    pub fn tokenize(&self) -> Vec<Token> {
        tokenize_impl(self.source, true)
    }
}

fn tokenize_impl(source: &str, track_spans: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in TAG_REGEX.find_iter(source) {
        if m.start() > last {
            tokens.push(make_token(
                TokenKind::Text,
                source[last..m.start()].to_string(),
                last..m.start(),
                track_spans,
            ));
        }

        let raw = m.as_str();
        let inner = raw[2..raw.len() - 2].trim().to_string();
        let kind = match &raw[..2] {
            BLOCK_TAG_START => TokenKind::Block,
            VARIABLE_TAG_START => TokenKind::Var,
            _ => TokenKind::Comment,
        };
        tokens.push(make_token(kind, inner, m.range(), track_spans));
        last = m.end();
    }

    if last < source.len() {
        tokens.push(make_token(
            TokenKind::Text,
            source[last..].to_string(),
            last..source.len(),
            track_spans,
        ));
    }

    tokens
}

fn make_token(kind: TokenKind, contents: String, span: Range<usize>, track_spans: bool) -> Token {
    Token {
        kind,
        contents,
        span: if track_spans { span } else { 0..0 },
    }
}
