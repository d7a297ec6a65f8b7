use std::sync::atomic::{AtomicBool, Ordering};

use crate::lexer::{DebugLexer, Lexer, Token};

static TEMPLATE_DEBUG: AtomicBool = AtomicBool::new(false);

/// Enable or disable debug lexing process-wide. When enabled, tokens carry
/// accurate byte spans and parse errors point into the template source.
pub fn set_debug(enabled: bool) {
    TEMPLATE_DEBUG.store(enabled, Ordering::Relaxed);
}

pub fn debug_enabled() -> bool {
    TEMPLATE_DEBUG.load(Ordering::Relaxed)
}

/// Tokenize with the lexer selected by the process-wide debug flag.
pub fn tokenize(source: &str) -> Vec<Token> {
    if debug_enabled() {
        DebugLexer::new(source).tokenize()
    } else {
        Lexer::new(source).tokenize()
    }
}
