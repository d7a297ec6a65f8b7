use std::cell::RefCell;

use stencil::context::Context;
use stencil::debug;
use stencil::error::RenderError;
use stencil::escape::{SafeString, mark_safe};
use stencil::lexer::{BLOCK_TAG_END, BLOCK_TAG_START};
use stencil::library::Library;
use stencil::parser::Parser;
use stencil::value::LazyValue;

/// Private delimiters used inside attribute values so nested directives
/// survive the lex of the enclosing tag. Rewritten to the engine's native
/// form at construction. There is no escape for a literal `{[` inside a
/// value; the substitution is unconditional.
const PRIVATE_OPEN: &str = "{[";
const PRIVATE_CLOSE: &str = "]}";

/// Deferred template logic bound to one attribute. Compiled and rendered
/// on first resolve; the string result is cached for the lifetime of the
/// instance, so every later resolve returns the same output no matter
/// what context it is given. Re-instantiate to force re-evaluation.
pub struct LazyFragment {
    logic: String,
    library: Library,
    cache: RefCell<Option<String>>,
}

impl LazyFragment {
    pub fn new(logic: &str, library: Library) -> Self {
        LazyFragment {
            logic: logic
                .replace(PRIVATE_OPEN, BLOCK_TAG_START)
                .replace(PRIVATE_CLOSE, BLOCK_TAG_END),
            library,
            cache: RefCell::new(None),
        }
    }

    /// The fragment source after delimiter rewriting.
    pub fn logic(&self) -> &str {
        &self.logic
    }

    fn render_logic(&self, context: &mut Context) -> Result<String, RenderError> {
        let tokens = debug::tokenize(&self.logic);
        let mut parser = Parser::with_library(tokens, self.library.clone(), 0);
        let nodelist = parser.parse(&[])?;
        nodelist.render(context)
    }
}

impl LazyValue for LazyFragment {
    fn resolve(&self, context: &mut Context) -> Result<SafeString, RenderError> {
        if let Some(cached) = self.cache.borrow().as_ref() {
            return Ok(mark_safe(cached.clone()));
        }
        let rendered = self.render_logic(context)?;
        *self.cache.borrow_mut() = Some(rendered.clone());
        Ok(mark_safe(rendered))
    }
}
