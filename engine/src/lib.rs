pub mod context;
pub mod debug;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod library;
pub mod node;
pub mod parser;
pub mod value;

pub use context::Context;
pub use error::{ParseError, RenderError};
pub use library::Library;
pub use value::Value;

use crate::node::NodeList;

/// A compiled template: a parsed node list ready to render any number of times.
pub struct Template {
    nodelist: NodeList,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").finish_non_exhaustive()
    }
}

impl Template {
    /// Parse a template with no custom tags registered.
    pub fn parse(source: &str, file_id: usize) -> Result<Template, ParseError> {
        Self::parse_with_library(source, Library::new(), file_id)
    }

    /// Parse a template, dispatching block tags through the given library.
    pub fn parse_with_library(
        source: &str,
        library: Library,
        file_id: usize,
    ) -> Result<Template, ParseError> {
        let tokens = debug::tokenize(source);
        let mut parser = parser::Parser::with_library(tokens, library, file_id);
        let nodelist = parser.parse(&[])?;
        Ok(Template { nodelist })
    }

    pub fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        self.nodelist.render(context)
    }

    pub fn nodelist(&self) -> &NodeList {
        &self.nodelist
    }
}
