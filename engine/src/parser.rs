use std::collections::VecDeque;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::library::Library;
use crate::node::{NodeList, TextNode, VariableNode};

static VARIABLE_PATH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)*$").unwrap());

/// Builds a node list from a token stream, dispatching block tokens through
/// the tag library. Tag hooks call back into the parser to consume their
/// body tokens.
pub struct Parser {
    tokens: VecDeque<Token>,
    /// Tag registry in effect for this parse. Settable so embedded
    /// fragments can carry the registry of their defining site.
    pub tags: Library,
    file_id: usize,
    last_span: Range<usize>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file_id: usize) -> Self {
        Self::with_library(tokens, Library::new(), file_id)
    }

    pub fn with_library(tokens: Vec<Token>, tags: Library, file_id: usize) -> Self {
        Parser {
            tokens: tokens.into(),
            tags,
            file_id,
            last_span: 0..0,
        }
    }

    pub fn file_id(&self) -> usize {
        self.file_id
    }

    /// Parse until one of the `until` block tags is reached. The matching
    /// end token is left on the stream; callers discard it with
    /// `delete_first_token`. An empty `until` parses to end of input.
    pub fn parse(&mut self, until: &[&str]) -> Result<NodeList, ParseError> {
        let mut nodelist = NodeList::new();

        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Text => {
                    nodelist.push(Box::new(TextNode::new(token.contents)));
                }
                TokenKind::Comment => {}
                TokenKind::Var => {
                    if !VARIABLE_PATH_REGEX.is_match(&token.contents) {
                        return Err(ParseError::error(
                            format!("could not parse variable '{}'", token.contents),
                            token.span,
                            self.file_id,
                        ));
                    }
                    nodelist.push(Box::new(VariableNode::new(token.contents)));
                }
                TokenKind::Block => {
                    if until.contains(&token.contents.as_str()) {
                        // Leave the end marker for the caller to discard.
                        self.prepend_token(token);
                        return Ok(nodelist);
                    }
                    let node = self.parse_block_token(token)?;
                    nodelist.push(node);
                }
            }
        }

        if !until.is_empty() {
            return Err(ParseError::error(
                format!("unclosed tag: expected {}", until.join(" or ")),
                self.last_span.clone(),
                self.file_id,
            ));
        }
        Ok(nodelist)
    }

    fn parse_block_token(
        &mut self,
        token: Token,
    ) -> Result<Box<dyn crate::node::Node>, ParseError> {
        let name = match token.contents.split_whitespace().next() {
            Some(word) => word.to_string(),
            None => {
                return Err(ParseError::error(
                    "empty block tag",
                    token.span,
                    self.file_id,
                ));
            }
        };

        if let Some(tag) = self.tags.get(&name) {
            return tag(self, &token);
        }

        // A block tag whose entire contents form a dotted variable path
        // echoes that variable. Fragments embed such directives with the
        // private bracket markers.
        if VARIABLE_PATH_REGEX.is_match(&token.contents) {
            return Ok(Box::new(VariableNode::new(token.contents)));
        }

        let registered = self.tags.tag_names();
        let mut err = ParseError::error(
            format!("invalid block tag '{}'", name),
            token.span,
            self.file_id,
        );
        if !registered.is_empty() {
            err = err.with_note(format!("registered tags: {}", registered.join(", ")));
        }
        Err(err)
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.pop_front();
        if let Some(t) = &token {
            self.last_span = t.span.clone();
        }
        token
    }

    pub fn prepend_token(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    /// Discard the next token (the end marker a `parse(until)` call left
    /// on the stream).
    pub fn delete_first_token(&mut self) {
        self.tokens.pop_front();
    }
}
