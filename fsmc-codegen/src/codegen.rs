//! Code generation: the backend contract and helpers shared by backends.

use std::fmt;
use std::str::FromStr;

use crate::error::CodegenError;
use crate::model::{EndState, Fsm, TransType};
use crate::options::GeneratorOptions;
use crate::validation::{Validated, validate};

mod enums;
mod listing;
mod rust;
mod structs;

pub use listing::ListingBackend;
pub use rust::RustBackend;

/// Turns a validated tree into target text.
pub trait Backend {
    fn emit(&mut self, fsm: Validated<'_>) -> Result<String, CodegenError>;
}

/// Output targets this crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Rust,
    Listing,
}

impl Target {
    pub fn backend(self, options: &GeneratorOptions) -> Box<dyn Backend> {
        match self {
            Target::Rust => Box::new(RustBackend::new(options.clone())),
            Target::Listing => Box::new(ListingBackend::new(options.graph_level)),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Target::Rust),
            "listing" | "sm" => Ok(Target::Listing),
            other => Err(format!("unknown target `{other}`")),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Rust => "rust",
            Target::Listing => "listing",
        })
    }
}

/// Validates `fsm` and emits it for `target`.
///
/// Nothing is emitted unless the whole tree validates, and identical trees
/// always produce identical text.
pub fn generate(
    fsm: &Fsm,
    target: Target,
    options: &GeneratorOptions,
) -> Result<String, CodegenError> {
    let _span = tracing::debug_span!("generate", context = fsm.context(), %target).entered();

    let validated = validate(fsm)?;
    let output = target.backend(options).emit(validated)?;

    tracing::debug!(bytes = output.len(), "generated state machine");
    Ok(output)
}

/// Indented text buffer for line-oriented backends.
#[derive(Debug, Clone)]
pub struct Emitter {
    out: String,
    indent: usize,
    unit: &'static str,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new("    ")
    }
}

impl Emitter {
    pub fn new(unit: &'static str) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            unit,
        }
    }

    /// Writes one line at the current indentation. Empty lines carry no
    /// trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str(self.unit);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn outdent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.indent
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Converts `Map::State` into `Map.State`; an unqualified name is placed in
/// `map`.
pub fn scope_state_name(name: &str, map: &str) -> String {
    match name.split_once("::") {
        Some((m, s)) => format!("{m}.{s}"),
        None => format!("{map}.{name}"),
    }
}

/// Backslash-escapes `\` and `"` for embedding in a string literal.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Whether a guard of this kind and end state skips the exit and entry
/// actions.
pub fn is_loopback(trans_type: TransType, end: &EndState) -> bool {
    match trans_type {
        TransType::Set => end.is_nil(),
        TransType::Push => true,
        TransType::Pop => false,
    }
}
