use crate::context::Context;
use crate::error::RenderError;
use crate::escape::escape_html;
use crate::value::Value;

/// A renderable template node. Every construct the parser produces, builtin
/// or registered through a library, implements this.
pub trait Node {
    fn render(&self, context: &mut Context) -> Result<String, RenderError>;

    /// Child nodes, for generic node-tree utilities. Leaf nodes return None.
    fn nodelist(&self) -> Option<&NodeList> {
        None
    }
}

/// An ordered sequence of nodes; rendering concatenates child output.
#[derive(Default)]
pub struct NodeList {
    nodes: Vec<Box<dyn Node>>,
}

impl NodeList {
    pub fn new() -> Self {
        NodeList { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: Box<dyn Node>) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Box<dyn Node>] {
        &self.nodes
    }

    pub fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        let mut out = String::new();
        for node in &self.nodes {
            out.push_str(&node.render(context)?);
        }
        Ok(out)
    }
}

/// Verbatim text between directives.
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        TextNode { text: text.into() }
    }
}

impl Node for TextNode {
    fn render(&self, _context: &mut Context) -> Result<String, RenderError> {
        Ok(self.text.clone())
    }
}

/// Output of a dotted variable path. Missing names render as the empty
/// string; lazy values resolve through their own deferred logic.
pub struct VariableNode {
    path: String,
}

impl VariableNode {
    pub fn new(path: impl Into<String>) -> Self {
        VariableNode { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Node for VariableNode {
    fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        let value = match context.resolve_path(&self.path) {
            Some(v) => v,
            None => return Ok(String::new()),
        };
        match value {
            Value::Lazy(lazy) => Ok(lazy.resolve(context)?.into_string()),
            Value::Safe(s) => Ok(s),
            other => {
                let rendered = other.to_string();
                if context.autoescape() {
                    Ok(escape_html(&rendered))
                } else {
                    Ok(rendered)
                }
            }
        }
    }
}
