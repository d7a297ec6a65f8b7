use std::collections::HashMap;
use std::rc::Rc;

use stencil::context::Context;
use stencil::error::{ParseError, RenderError};
use stencil::lexer::Token;
use stencil::library::Library;
use stencil::node::{Node, NodeList};
use stencil::parser::Parser;
use stencil::value::Value;

use crate::attrs::{self, Attribute};
use crate::lazy::LazyFragment;

pub const TAG_NAME: &str = "variable";
pub const END_TAG_NAME: &str = "endvariable";

/// The `{% variable name="..." ... %}` block. Each attribute becomes a
/// lazily rendered, memoized variable visible only within the block body.
/// Body and attributes are fixed at parse time; every render stages a
/// fresh set of fragments, so nothing carries over between renders.
pub struct CachedVariableNode {
    nodelist: NodeList,
    library: Library,
    attrs: Vec<Attribute>,
}

impl CachedVariableNode {
    pub fn new(nodelist: NodeList, library: Library, attrs: Vec<Attribute>) -> Self {
        CachedVariableNode {
            nodelist,
            library,
            attrs,
        }
    }

    /// Parse-time hook registered under `variable`: strip the tag name,
    /// extract the attribute pairs, collect the body up to `endvariable`
    /// and discard the end marker.
    pub fn parse(parser: &mut Parser, token: &Token) -> Result<Box<dyn Node>, ParseError> {
        let rest = token
            .contents
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest)
            .unwrap_or("");
        let attrs = attrs::extract(rest);
        let nodelist = parser.parse(&[END_TAG_NAME])?;
        parser.delete_first_token();
        Ok(Box::new(CachedVariableNode::new(
            nodelist,
            parser.tags.clone(),
            attrs,
        )))
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }
}

impl Node for CachedVariableNode {
    fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        let mut staged: HashMap<String, Value> = HashMap::new();
        for attr in &self.attrs {
            // Duplicate names: last write wins.
            staged.insert(
                attr.name.clone(),
                Value::Lazy(Rc::new(LazyFragment::new(&attr.value, self.library.clone()))),
            );
        }
        context.scoped(staged, |context| self.nodelist.render(context))
    }

    fn nodelist(&self) -> Option<&NodeList> {
        Some(&self.nodelist)
    }
}
