use quote::format_ident;
use syn::{Expr, Ident, Path, Type, UseTree};

use crate::error::CodegenError;

/// Generates the identifier for the machine's state enum: `[Context]State`
pub fn state_enum_ident(context: &Ident) -> Ident {
    format_ident!("{}State", context)
}

/// Generates the identifier for the generated context struct: `[Context]Context`
pub fn context_ident(context: &Ident) -> Ident {
    format_ident!("{}Context", context)
}

/// Generates the identifier for the thread-safe wrapper: `[Context]SharedContext`
pub fn shared_ident(context: &Ident) -> Ident {
    format_ident!("{}SharedContext", context)
}

/// State enum variant for a state: `[Map]_[State]`
pub fn state_variant(map: &str, state: &str, line: u32) -> Result<Ident, CodegenError> {
    parse_ident("state name", &format!("{map}_{state}"), line)
}

/// Handler method for a transition in a state: `[Map]_[State]_[Transition]`
pub fn handler_ident(
    map: &str,
    state: &str,
    transition: &str,
    line: u32,
) -> Result<Ident, CodegenError> {
    parse_ident("transition name", &format!("{map}_{state}_{transition}"), line)
}

pub fn parse_ident(what: &'static str, text: &str, line: u32) -> Result<Ident, CodegenError> {
    syn::parse_str(text.trim()).map_err(|e| syntax(what, text, &e, line))
}

pub fn parse_expr(what: &'static str, text: &str, line: u32) -> Result<Expr, CodegenError> {
    syn::parse_str(text).map_err(|e| syntax(what, text, &e, line))
}

pub fn parse_type(text: &str, line: u32) -> Result<Type, CodegenError> {
    syn::parse_str(text).map_err(|e| syntax("parameter type", text, &e, line))
}

pub fn parse_path(what: &'static str, text: &str, line: u32) -> Result<Path, CodegenError> {
    syn::parse_str(text).map_err(|e| syntax(what, text, &e, line))
}

pub fn parse_use(text: &str, line: u32) -> Result<UseTree, CodegenError> {
    let text = text.trim().trim_start_matches("use ").trim_end_matches(';');
    syn::parse_str(text).map_err(|e| syntax("import", text, &e, line))
}

fn syntax(what: &'static str, text: &str, error: &syn::Error, line: u32) -> CodegenError {
    CodegenError::Syntax {
        what,
        text: text.to_owned(),
        message: error.to_string(),
        line,
    }
}
