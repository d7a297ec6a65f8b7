use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ParseError;
use crate::lexer::Token;
use crate::node::Node;
use crate::parser::Parser;

/// A parse-time tag hook: receives the parser and the block token and
/// produces the node for that tag, consuming body tokens as needed.
pub type TagFn = Rc<dyn Fn(&mut Parser, &Token) -> Result<Box<dyn Node>, ParseError>>;

/// Registry of custom block tags visible while parsing a template or
/// fragment. Cloning is cheap; registered tags are shared.
#[derive(Clone, Default)]
pub struct Library {
    tags: HashMap<String, TagFn>,
}

impl Library {
    pub fn new() -> Self {
        Library {
            tags: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        tag: impl Fn(&mut Parser, &Token) -> Result<Box<dyn Node>, ParseError> + 'static,
    ) {
        self.tags.insert(name.into(), Rc::new(tag));
    }

    pub fn get(&self, name: &str) -> Option<TagFn> {
        self.tags.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Registered tag names, sorted for stable error notes.
    pub fn tag_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tags.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}
