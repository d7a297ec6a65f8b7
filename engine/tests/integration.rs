use std::collections::HashMap;

use stencil::context::Context;
use stencil::error::ParseError;
use stencil::lexer::{DebugLexer, Lexer, Token, TokenKind};
use stencil::library::Library;
use stencil::node::{Node, NodeList};
use stencil::parser::Parser;
use stencil::value::Value;
use stencil::{RenderError, Template};

fn render(source: &str, vars: Vec<(&str, Value)>) -> String {
    let template = Template::parse(source, 0).expect("parse failed");
    let vars: HashMap<String, Value> = vars
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let mut context = Context::with_vars(vars);
    template.render(&mut context).expect("render failed")
}

#[test]
fn lexer_splits_directives() {
    let tokens = Lexer::new("a {{ x }} b {% tag %} c {# note #} d").tokenize();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Text,
            TokenKind::Var,
            TokenKind::Text,
            TokenKind::Block,
            TokenKind::Text,
            TokenKind::Comment,
            TokenKind::Text,
        ]
    );
    assert_eq!(tokens[1].contents, "x");
    assert_eq!(tokens[3].contents, "tag");
    assert_eq!(tokens[5].contents, "note");
    assert_eq!(tokens[6].contents, " d");
}

#[test]
fn standard_lexer_collapses_spans() {
    let tokens = Lexer::new("a {{ x }}").tokenize();
    assert!(tokens.iter().all(|t| t.span == (0..0)));
}

#[test]
fn debug_lexer_tracks_spans() {
    let source = "a {{ x }} b";
    let tokens = DebugLexer::new(source).tokenize();
    assert_eq!(tokens[0].span, 0..2);
    assert_eq!(tokens[1].span, 2..9);
    assert_eq!(&source[tokens[1].span.clone()], "{{ x }}");
    assert_eq!(tokens[2].span, 9..11);
}

#[test]
fn text_only_template() {
    assert_eq!(render("just text", vec![]), "just text");
}

#[test]
fn variable_substitution() {
    assert_eq!(
        render("Hello {{ name }}!", vec![("name", Value::from("World"))]),
        "Hello World!"
    );
}

#[test]
fn missing_variable_renders_empty() {
    assert_eq!(render("[{{ nothing }}]", vec![]), "[]");
}

#[test]
fn comments_are_dropped() {
    assert_eq!(render("a{# hidden #}b", vec![]), "ab");
}

#[test]
fn dotted_path_through_map() {
    let mut user = HashMap::new();
    user.insert("name".to_string(), Value::from("Ada"));
    assert_eq!(
        render("{{ user.name }}", vec![("user", Value::Map(user))]),
        "Ada"
    );
}

#[test]
fn dotted_path_through_list() {
    let items = Value::List(vec![Value::from("first"), Value::from("second")]);
    assert_eq!(render("{{ items.1 }}", vec![("items", items)]), "second");
}

#[test]
fn integral_numbers_render_without_decimal() {
    assert_eq!(render("{{ n }}", vec![("n", Value::Number(3.0))]), "3");
    assert_eq!(render("{{ n }}", vec![("n", Value::Number(2.5))]), "2.5");
}

#[test]
fn autoescape_escapes_output() {
    assert_eq!(
        render("{{ x }}", vec![("x", Value::from("<b>&</b>"))]),
        "&lt;b&gt;&amp;&lt;/b&gt;"
    );
}

#[test]
fn safe_values_bypass_escaping() {
    assert_eq!(
        render("{{ x }}", vec![("x", Value::Safe("<b>".to_string()))]),
        "<b>"
    );
}

#[test]
fn autoescape_can_be_disabled() {
    let template = Template::parse("{{ x }}", 0).expect("parse failed");
    let mut context = Context::with_vars(HashMap::from([(
        "x".to_string(),
        Value::from("<b>"),
    )]));
    context.set_autoescape(false);
    assert_eq!(template.render(&mut context).expect("render failed"), "<b>");
}

#[test]
fn block_tag_echoes_dotted_variable_path() {
    // An unregistered block tag whose contents form a variable path
    // outputs that variable.
    let mut user = HashMap::new();
    user.insert("name".to_string(), Value::from("Ada"));
    assert_eq!(
        render("{% user.name %}", vec![("user", Value::Map(user))]),
        "Ada"
    );
}

#[test]
fn malformed_variable_is_a_parse_error() {
    let err = Template::parse("{{ a b }}", 0).unwrap_err();
    assert!(err.message.contains("could not parse variable"));
    assert!(Template::parse("{{ }}", 0).is_err());
}

#[test]
fn invalid_block_tag_is_a_parse_error() {
    let err = Template::parse("{% frobnicate now %}", 0).unwrap_err();
    assert!(err.message.contains("invalid block tag 'frobnicate'"));
}

struct WrapNode {
    nodelist: NodeList,
}

impl Node for WrapNode {
    fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        Ok(format!("[{}]", self.nodelist.render(context)?))
    }

    fn nodelist(&self) -> Option<&NodeList> {
        Some(&self.nodelist)
    }
}

fn wrap_library() -> Library {
    let mut library = Library::new();
    library.register("wrap", |parser: &mut Parser, _token: &Token| {
        let nodelist = parser.parse(&["endwrap"])?;
        parser.delete_first_token();
        Ok(Box::new(WrapNode { nodelist }) as Box<dyn Node>)
    });
    library
}

#[test]
fn registered_tag_parses_its_body() {
    let template =
        Template::parse_with_library("{% wrap %}x{{ y }}{% endwrap %}", wrap_library(), 0)
            .expect("parse failed");
    let mut context = Context::with_vars(HashMap::from([("y".to_string(), Value::from("z"))]));
    assert_eq!(template.render(&mut context).expect("render failed"), "[xz]");
}

#[test]
fn unclosed_tag_is_a_parse_error() {
    let err: ParseError =
        Template::parse_with_library("{% wrap %}never ends", wrap_library(), 0).unwrap_err();
    assert!(err.message.contains("unclosed tag"));
    assert!(err.message.contains("endwrap"));
}

#[test]
fn context_lookup_is_innermost_first() {
    let mut context = Context::new();
    context.set("x", Value::from("outer"));
    context.push();
    context.set("x", Value::from("inner"));
    assert_eq!(context.resolve_path("x").unwrap().to_string(), "inner");
    context.pop();
    assert_eq!(context.resolve_path("x").unwrap().to_string(), "outer");
}

#[test]
fn root_frame_is_never_popped() {
    let mut context = Context::new();
    assert!(context.pop().is_none());
    assert_eq!(context.depth(), 1);
}

#[test]
fn scoped_pops_frame_on_error() {
    let mut context = Context::new();
    let before = context.depth();
    let result: Result<(), RenderError> = context.scoped(HashMap::new(), |_ctx| {
        Err(RenderError::Custom("boom".to_string()))
    });
    assert!(result.is_err());
    assert_eq!(context.depth(), before);
}

#[test]
fn scoped_variables_do_not_leak() {
    let mut context = Context::new();
    context.scoped(
        HashMap::from([("tmp".to_string(), Value::from("v"))]),
        |ctx| {
            assert!(ctx.get("tmp").is_some());
        },
    );
    assert!(context.get("tmp").is_none());
}
