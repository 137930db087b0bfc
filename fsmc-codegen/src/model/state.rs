use super::{Action, Transition};
use crate::error::FsmError;

/// Name of the per-map fallback state.
pub const DEFAULT_STATE: &str = "Default";

/// Name of the transition taken when a state handles no transition of the
/// name issued.
pub const DEFAULT_TRANSITION: &str = "Default";

/// A state belonging to a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    class_name: String,
    instance_name: String,
    line: u32,
    entry_actions: Vec<Action>,
    exit_actions: Vec<Action>,
    transitions: Vec<Transition>,
}

impl State {
    /// Creates a state. A state named [`DEFAULT_STATE`] becomes its map's
    /// default state when added.
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        let class_name = name.into();
        let instance_name = if class_name == DEFAULT_STATE {
            format!("{class_name}State")
        } else {
            class_name.clone()
        };
        Self {
            class_name,
            instance_name,
            line,
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Name as written in the description.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Name of the state object within its map; differs from the class name
    /// only for the default state.
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn is_default(&self) -> bool {
        self.class_name == DEFAULT_STATE
    }

    pub fn add_entry_action(&mut self, action: Action) {
        self.entry_actions.push(action);
    }

    pub fn add_exit_action(&mut self, action: Action) {
        self.exit_actions.push(action);
    }

    #[must_use]
    pub fn with_entry(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.entry_actions.extend(actions);
        self
    }

    #[must_use]
    pub fn with_exit(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.exit_actions.extend(actions);
        self
    }

    pub fn entry_actions(&self) -> &[Action] {
        &self.entry_actions
    }

    pub fn exit_actions(&self) -> &[Action] {
        &self.exit_actions
    }

    /// Adds a transition, rejecting a second one with the same name.
    pub fn add_transition(&mut self, transition: Transition) -> Result<(), FsmError> {
        if self.defines(transition.name()) {
            return Err(FsmError::DuplicateTransition {
                state: self.class_name.clone(),
                transition: transition.name().to_owned(),
                line: transition.line(),
            });
        }
        self.transitions.push(transition);
        Ok(())
    }

    pub fn with_transition(mut self, transition: Transition) -> Result<Self, FsmError> {
        self.add_transition(transition)?;
        Ok(self)
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.name() == name)
    }

    /// Transition named `name`, for a parser that appends guards to a
    /// transition declared earlier in the same state.
    pub fn transition_mut(&mut self, name: &str) -> Option<&mut Transition> {
        self.transitions.iter_mut().find(|t| t.name() == name)
    }

    pub fn defines(&self, name: &str) -> bool {
        self.transition(name).is_some()
    }
}
