//! Error types for model construction, validation and code generation.

use thiserror::Error;

/// A structural or semantic defect in a state machine description.
///
/// Every variant carries the source line of the offending construct so the
/// driver can point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("line {line}: incomplete state machine: {reason}")]
    Incomplete { reason: String, line: u32 },

    #[error("line {line}: duplicate map `{map}`")]
    DuplicateMap { map: String, line: u32 },

    #[error("line {line}: duplicate state `{state}` in map `{map}`")]
    DuplicateState { map: String, state: String, line: u32 },

    #[error("line {line}: map `{map}` already has a Default state")]
    DuplicateDefaultState { map: String, line: u32 },

    #[error("line {line}: duplicate transition `{transition}` in state `{state}`")]
    DuplicateTransition {
        state: String,
        transition: String,
        line: u32,
    },

    #[error(
        "line {line}: guard follows the unconditional guard of transition `{transition}`; \
         the unconditional guard must be last"
    )]
    GuardAfterUnconditional { transition: String, line: u32 },

    #[error("line {line}: start state `{state}` does not exist")]
    UnknownStartState { state: String, line: u32 },

    #[error(
        "line {line}: start state `{state}` exists in several maps; qualify it as `Map::State`"
    )]
    AmbiguousStartState { state: String, line: u32 },

    #[error("line {line}: state `{state}` does not exist in map `{map}`")]
    UnknownState {
        map: String,
        state: String,
        line: u32,
    },

    #[error("line {line}: the Default state cannot be a transition target")]
    DefaultTarget { line: u32 },

    #[error("line {line}: pop transition `{transition}` is not defined by any state")]
    UnknownPopTransition { transition: String, line: u32 },
}

impl FsmError {
    /// Source line of the offending construct.
    pub fn line(&self) -> u32 {
        match self {
            FsmError::Incomplete { line, .. }
            | FsmError::DuplicateMap { line, .. }
            | FsmError::DuplicateState { line, .. }
            | FsmError::DuplicateDefaultState { line, .. }
            | FsmError::DuplicateTransition { line, .. }
            | FsmError::GuardAfterUnconditional { line, .. }
            | FsmError::UnknownStartState { line, .. }
            | FsmError::AmbiguousStartState { line, .. }
            | FsmError::UnknownState { line, .. }
            | FsmError::DefaultTarget { line }
            | FsmError::UnknownPopTransition { line, .. } => *line,
        }
    }
}

/// Errors raised while emitting target code.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The tree failed validation; nothing was emitted.
    #[error(transparent)]
    Invalid(#[from] FsmError),

    /// A raw target-language fragment (condition, argument, type, name) is
    /// not valid for the target.
    #[error("line {line}: invalid {what} `{text}`: {message}")]
    Syntax {
        what: &'static str,
        text: String,
        message: String,
        line: u32,
    },

    /// The target cannot express a transition's parameter list.
    #[error("line {line}: transition `{transition}` {reason}")]
    Signature {
        transition: String,
        reason: &'static str,
        line: u32,
    },

    /// A backend was driven in a way the traversal contract forbids.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CodegenError {
    /// Source line of the offending construct, when there is one.
    pub fn line(&self) -> Option<u32> {
        match self {
            CodegenError::Invalid(e) => Some(e.line()),
            CodegenError::Syntax { line, .. } | CodegenError::Signature { line, .. } => Some(*line),
            CodegenError::Internal(_) => None,
        }
    }
}
