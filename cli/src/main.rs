use std::collections::HashMap;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Deserialize;

use stencil::{Context, Template, Value};

const SUBCOMMANDS: &[&str] = &["render", "help"];

#[derive(Parser)]
#[command(name = "stencil", version, about = "Template renderer")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template file
    Render(RenderArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Template file to render
    file: String,

    /// TOML file providing the render context
    #[arg(short, long)]
    context: Option<String>,

    /// Parse only, don't render (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump the lexed token stream
    #[arg(long)]
    tokens: bool,

    /// Enable debug lexing (accurate source spans in diagnostics)
    #[arg(long)]
    debug: bool,

    /// Suppress rendered output (just check for errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Optional `[settings]` table in the context file.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct Settings {
    autoescape: bool,
    debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            autoescape: true,
            debug: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ContextFile {
    #[serde(default)]
    settings: Settings,
    #[serde(flatten)]
    vars: toml::Table,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "render" so `stencil file.html` works like
    // `stencil render file.html`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "render".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Render(render_args) => do_render(render_args, cli.no_color),
    }
}

fn do_render(args: RenderArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // Read template source
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    // Read context file
    let context_file = match &args.context {
        Some(path) => match load_context_file(path) {
            Ok(cf) => cf,
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        },
        None => ContextFile::default(),
    };

    if args.debug || context_file.settings.debug {
        stencil::debug::set_debug(true);
    }

    // --tokens: dump the lexed token stream
    if args.tokens {
        println!("{:#?}", stencil::debug::tokenize(&source));
        return;
    }

    // Set up codespan file database
    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    // Parse with the variable tag registered
    let library = stencil_vars::default_library();
    let template = match Template::parse_with_library(&source, library, file_id) {
        Ok(t) => t,
        Err(error) => {
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            let diagnostic = error.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            process::exit(1);
        }
    };

    // --check: parse succeeded, exit
    if args.check {
        eprintln!("ok: {} parsed successfully", args.file);
        return;
    }

    // Build the render context from the TOML table
    let mut vars: HashMap<String, Value> = HashMap::new();
    for (key, value) in context_file.vars {
        vars.insert(key, toml_to_value(value));
    }
    let mut context = Context::with_vars(vars);
    context.set_autoescape(context_file.settings.autoescape);

    match template.render(&mut context) {
        Ok(output) => {
            if !args.quiet {
                print!("{}", output);
            }
        }
        Err(error) => {
            eprintln!("render error: {}", error);
            process::exit(1);
        }
    }
}

fn load_context_file(path: &str) -> Result<ContextFile, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path, e))?;
    toml::from_str(&source).map_err(|e| format!("invalid context file '{}': {}", path, e))
}

/// Map a TOML value onto the engine's value model.
fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i as f64),
        toml::Value::Float(f) => Value::Number(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_value(v)))
                .collect(),
        ),
    }
}
