use super::{State, Transition, merge_transitions};
use crate::error::FsmError;

/// A named group of states sharing one default state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    name: String,
    line: u32,
    states: Vec<State>,
    default_state: Option<State>,
}

impl Map {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            states: Vec::new(),
            default_state: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Adds a state. The reserved default state is kept apart from the
    /// ordinary states.
    pub fn add_state(&mut self, state: State) -> Result<(), FsmError> {
        if state.is_default() {
            if self.default_state.is_some() {
                return Err(FsmError::DuplicateDefaultState {
                    map: self.name.clone(),
                    line: state.line(),
                });
            }
            self.default_state = Some(state);
            return Ok(());
        }

        if self.is_known_state(state.instance_name()) {
            return Err(FsmError::DuplicateState {
                map: self.name.clone(),
                state: state.instance_name().to_owned(),
                line: state.line(),
            });
        }
        self.states.push(state);
        Ok(())
    }

    pub fn with_state(mut self, state: State) -> Result<Self, FsmError> {
        self.add_state(state)?;
        Ok(self)
    }

    /// Ordinary states in declaration order. The default state is not
    /// included.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn default_state(&self) -> Option<&State> {
        self.default_state.as_ref()
    }

    pub fn has_default_state(&self) -> bool {
        self.default_state.is_some()
    }

    /// Ordinary state with the given instance name.
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.instance_name() == name)
    }

    pub fn is_known_state(&self, name: &str) -> bool {
        self.state(name).is_some()
    }

    /// Every transition defined in this map, default state included, sorted
    /// by signature with duplicates removed.
    ///
    /// When the default state and an ordinary state define the same
    /// signature, the default state's definition is kept.
    pub fn transitions(&self) -> Vec<&Transition> {
        let defaults = self.default_state.iter().flat_map(|s| s.transitions());
        let ordinary = self.states.iter().flat_map(|s| s.transitions());
        merge_transitions(defaults.chain(ordinary))
    }

    /// Transitions defined by some ordinary state but not by the default
    /// state, one per name, in [`Map::transitions`] order.
    ///
    /// Each needs a synthesized default-state handler that forwards to the
    /// unhandled-transition path. The result is recomputed on every call.
    pub fn undefined_default_transitions(&self) -> Vec<&Transition> {
        let defined = |name: &str| self.default_state.as_ref().is_some_and(|d| d.defines(name));

        let mut undefined: Vec<&Transition> = Vec::new();
        for transition in self.transitions() {
            if defined(transition.name()) {
                continue;
            }
            if undefined.iter().any(|t| t.name() == transition.name()) {
                continue;
            }
            undefined.push(transition);
        }
        undefined
    }

    /// True when the map's default state has a handler, real or
    /// synthesized, for `name`.
    pub fn has_default_handler(&self, name: &str) -> bool {
        self.transitions().iter().any(|t| t.name() == name)
    }
}
