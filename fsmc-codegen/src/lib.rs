//! State machine model, validation and code generation for fsmc.
//!
//! A front end builds an [`Fsm`] tree, [`validate`] checks it as a whole and
//! a [`Backend`] turns the [`Validated`] tree into target text. [`generate`]
//! does all of that in one call.

pub mod codegen;
pub mod error;
pub mod helpers;
pub mod model;
pub mod options;
pub mod validation;
pub mod visit;

pub use codegen::{
    Backend, Emitter, ListingBackend, RustBackend, Target, escape, generate, is_loopback,
    scope_state_name,
};
pub use error::{CodegenError, FsmError};
pub use model::{
    Action, ActionTarget, DEFAULT_STATE, DEFAULT_TRANSITION, EMPTY_STATE_STACK, EndState, Fsm,
    Guard, Map, NIL_STATE, Parameter, State, StateRef, TransType, Transfer, Transition,
};
pub use options::{GeneratorOptions, GraphLevel};
pub use validation::{Validated, validate};
pub use visit::{Cursor, GuardPosition, Node, Visitable, Visitor};
