use std::fmt;

use super::Action;

/// End-state spelling meaning "no state change".
pub const NIL_STATE: &str = "nil";

/// A state name, optionally qualified with its map (`Map::State`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateRef {
    map: Option<String>,
    state: String,
}

impl StateRef {
    /// Parses `State` or `Map::State`.
    pub fn parse(name: &str) -> Self {
        match name.split_once("::") {
            Some((map, state)) => Self::qualified(map, state),
            None => Self::new(name),
        }
    }

    pub fn new(state: impl Into<String>) -> Self {
        Self {
            map: None,
            state: state.into(),
        }
    }

    pub fn qualified(map: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            map: Some(map.into()),
            state: state.into(),
        }
    }

    pub fn map(&self) -> Option<&str> {
        self.map.as_deref()
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// The map this reference points into when written inside `current`.
    pub fn map_or<'a>(&'a self, current: &'a str) -> &'a str {
        self.map.as_deref().unwrap_or(current)
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.map {
            Some(map) => write!(f, "{}::{}", map, self.state),
            None => f.write_str(&self.state),
        }
    }
}

/// Where a set or push transition ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndState {
    /// Stay in the current state without running exit or entry actions.
    Nil,
    Named(StateRef),
}

impl EndState {
    /// Parses an end-state name, mapping `nil` (or nothing) to [`EndState::Nil`].
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name == NIL_STATE {
            EndState::Nil
        } else {
            EndState::Named(StateRef::parse(name))
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, EndState::Nil)
    }

    pub fn state_ref(&self) -> Option<&StateRef> {
        match self {
            EndState::Nil => None,
            EndState::Named(r) => Some(r),
        }
    }
}

impl fmt::Display for EndState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Nil => f.write_str(NIL_STATE),
            EndState::Named(r) => r.fmt(f),
        }
    }
}

/// The kind of state change a guard performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransType {
    Set,
    Push,
    Pop,
}

/// The state change a guard performs, together with the data its kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Move to the end state.
    Set(EndState),
    /// Push the state reached through `end` and switch to `push`.
    Push { end: EndState, push: StateRef },
    /// Return to the state on top of the stack, then optionally issue
    /// `transition` with `args` against it.
    Pop {
        transition: Option<String>,
        args: Vec<String>,
    },
}

impl Transfer {
    pub fn trans_type(&self) -> TransType {
        match self {
            Transfer::Set(_) => TransType::Set,
            Transfer::Push { .. } => TransType::Push,
            Transfer::Pop { .. } => TransType::Pop,
        }
    }
}

/// One branch of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    condition: String,
    transfer: Transfer,
    actions: Vec<Action>,
    line: u32,
}

impl Guard {
    /// Creates a guard. An empty (or blank) condition makes it unconditional.
    pub fn new(condition: impl Into<String>, transfer: Transfer, line: u32) -> Self {
        let condition = condition.into().trim().to_owned();
        Self {
            condition,
            transfer,
            actions: Vec::new(),
            line,
        }
    }

    #[must_use]
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn is_unconditional(&self) -> bool {
        self.condition.is_empty()
    }

    pub fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    pub fn trans_type(&self) -> TransType {
        self.transfer.trans_type()
    }

    /// End state of a set or push guard; `None` for pop.
    pub fn end_state(&self) -> Option<&EndState> {
        match &self.transfer {
            Transfer::Set(end) | Transfer::Push { end, .. } => Some(end),
            Transfer::Pop { .. } => None,
        }
    }

    pub fn push_state(&self) -> Option<&StateRef> {
        match &self.transfer {
            Transfer::Push { push, .. } => Some(push),
            _ => None,
        }
    }

    /// Transition issued after popping, if any.
    pub fn pop_transition(&self) -> Option<&str> {
        match &self.transfer {
            Transfer::Pop { transition, .. } => transition.as_deref(),
            _ => None,
        }
    }

    /// Arguments passed to the pop transition, placeholders skipped.
    pub fn pop_args(&self) -> impl Iterator<Item = &str> {
        let args: &[String] = match &self.transfer {
            Transfer::Pop { args, .. } => args,
            _ => &[],
        };
        args.iter()
            .map(String::as_str)
            .filter(|arg| !arg.trim().is_empty())
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// True when the guard suppresses the exit and entry actions that
    /// otherwise bracket its action list.
    pub fn is_loopback(&self) -> bool {
        match &self.transfer {
            Transfer::Set(end) => end.is_nil(),
            Transfer::Push { .. } => true,
            Transfer::Pop { .. } => false,
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_unconditional() {
            write!(f, "[{}] ", self.condition)?;
        }
        match &self.transfer {
            Transfer::Set(end) => write!(f, "{end}")?,
            Transfer::Push { end, push } => {
                if !end.is_nil() {
                    write!(f, "{end}/")?;
                }
                write!(f, "push({push})")?;
            }
            Transfer::Pop { transition, .. } => {
                f.write_str("pop(")?;
                if let Some(transition) = transition {
                    f.write_str(transition)?;
                    for arg in self.pop_args() {
                        write!(f, ", {arg}")?;
                    }
                }
                f.write_str(")")?;
            }
        }
        Ok(())
    }
}
