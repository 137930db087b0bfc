//! The state machine abstract syntax tree.
//!
//! A parser builds the tree top-down through the constructors and `add_*`
//! methods below; each of them rejects what can be checked locally.
//! Cross-entity rules (start state, end-state references) are checked once
//! the tree is complete by [`crate::validate`].
//!
//! Ownership is strictly hierarchical: [`Fsm`] → [`Map`] → [`State`] →
//! [`Transition`] → [`Guard`] → [`Action`]. Nothing links back up the tree;
//! traversals carry their ancestors in a [`crate::visit::Cursor`].

mod action;
mod fsm;
mod guard;
mod map;
mod parameter;
mod state;
mod transition;

pub use action::{Action, ActionTarget, EMPTY_STATE_STACK};
pub use fsm::Fsm;
pub use guard::{EndState, Guard, NIL_STATE, StateRef, TransType, Transfer};
pub use map::Map;
pub use parameter::Parameter;
pub use state::{DEFAULT_STATE, DEFAULT_TRANSITION, State};
pub use transition::Transition;

/// Merges transitions into one list sorted by signature, keeping the first
/// of any transitions with equal signatures.
///
/// The sort is stable, so callers control which duplicate survives through
/// the order of `transitions`.
pub(crate) fn merge_transitions<'a>(
    transitions: impl IntoIterator<Item = &'a Transition>,
) -> Vec<&'a Transition> {
    let mut merged: Vec<&Transition> = transitions.into_iter().collect();
    merged.sort_by(|a, b| a.cmp_signature(b));
    merged.dedup_by(|later, earlier| later.cmp_signature(earlier).is_eq());
    merged
}
