//! Runtime support types for fsmc-generated state machines.
//!
//! Generated code embeds an [`FsmContext`] which tracks the current state,
//! the state stack used by push/pop transitions, and the name of the
//! transition currently in flight.

use std::fmt::Debug;

/// Implemented by the state enum of every generated machine.
pub trait StateId: Copy + Eq + Debug {
    /// Fully scoped state name, e.g. `"Map.Idle"`.
    fn name(self) -> &'static str;

    /// Stable numeric id, used when persisting a machine.
    fn id(self) -> usize;

    /// Looks a state up by the id returned from [`StateId::id`].
    fn from_id(id: usize) -> Option<Self>;
}

/// Errors raised by a running state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// A transition was issued while another was still executing its
    /// actions, so there is no current state to dispatch on.
    #[error("state undefined while executing transition `{transition}`")]
    StateUndefined { transition: &'static str },
    /// Neither the current state nor its map's default state handle the
    /// transition.
    #[error("no transition `{transition}` defined in state `{state}`")]
    Undefined {
        state: &'static str,
        transition: &'static str,
    },
    /// A pop transition found the state stack empty.
    #[error("popping an empty state stack")]
    EmptyStack,
    /// A persisted snapshot referenced an id no state carries.
    #[error("unknown state id {0}")]
    UnknownStateId(usize),
}

/// Bookkeeping shared by every generated machine.
#[derive(Debug, Clone)]
pub struct FsmContext<S> {
    state: Option<S>,
    previous: Option<S>,
    stack: Vec<S>,
    transition: &'static str,
    debug: bool,
}

impl<S: StateId> FsmContext<S> {
    /// Creates a context sitting in `start`. Entry actions of the start
    /// state are not run here; generated code does that in
    /// `enter_start_state`.
    #[must_use]
    pub fn new(start: S) -> Self {
        Self {
            state: Some(start),
            previous: None,
            stack: Vec::new(),
            transition: "",
            debug: false,
        }
    }

    /// Returns the current state.
    ///
    /// Fails while a transition is executing its actions.
    pub fn state(&self) -> Result<S, TransitionError> {
        self.state.ok_or(TransitionError::StateUndefined {
            transition: self.transition,
        })
    }

    pub fn set_state(&mut self, state: S) {
        self.trace(format_args!("NEW STATE    : {}", state.name()));
        self.state = Some(state);
    }

    /// Leaves the current state while a transition's actions run.
    pub fn clear_state(&mut self) {
        self.previous = self.state;
        self.state = None;
    }

    /// State the machine was in before the last [`FsmContext::clear_state`].
    #[must_use]
    pub fn previous_state(&self) -> Option<S> {
        self.previous
    }

    /// Pushes the current state (if any) and makes `state` current.
    pub fn push_state(&mut self, state: S) {
        self.trace(format_args!("PUSH TO STATE: {}", state.name()));
        if let Some(current) = self.state {
            self.stack.push(current);
        }
        self.state = Some(state);
    }

    /// Makes the top of the state stack the current state.
    pub fn pop_state(&mut self) -> Result<(), TransitionError> {
        let Some(state) = self.stack.pop() else {
            self.trace(format_args!("POPPING ON EMPTY STATE STACK."));
            return Err(TransitionError::EmptyStack);
        };
        self.trace(format_args!("POP TO STATE : {}", state.name()));
        self.state = Some(state);
        Ok(())
    }

    pub fn empty_state_stack(&mut self) {
        self.stack.clear();
    }

    #[must_use]
    pub fn state_stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Name of the transition currently executing, or `""` between
    /// transitions.
    #[must_use]
    pub fn transition(&self) -> &'static str {
        self.transition
    }

    pub fn set_transition(&mut self, name: &'static str) {
        self.transition = name;
    }

    /// True while a transition's actions are running.
    #[must_use]
    pub fn in_transition(&self) -> bool {
        self.state.is_none()
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Emits a trace event when debugging is enabled.
    pub fn trace(&self, message: std::fmt::Arguments<'_>) {
        if self.debug {
            tracing::debug!(target: "fsmc::runtime", "{}", message);
        }
    }

    /// State ids from the bottom of the stack up, followed by the current
    /// state's id.
    pub fn snapshot(&self) -> Result<Vec<usize>, TransitionError> {
        let current = self.state()?;
        Ok(self
            .stack
            .iter()
            .chain(std::iter::once(&current))
            .map(|s| s.id())
            .collect())
    }

    /// Restores a context from the output of [`FsmContext::snapshot`].
    pub fn restore(&mut self, ids: &[usize]) -> Result<(), TransitionError> {
        let (current, stack) = ids.split_last().ok_or(TransitionError::EmptyStack)?;
        let lookup = |id: &usize| S::from_id(*id).ok_or(TransitionError::UnknownStateId(*id));

        self.stack = stack.iter().map(lookup).collect::<Result<_, _>>()?;
        self.state = Some(lookup(current)?);
        self.previous = None;
        self.transition = "";
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Blink,
    }

    impl StateId for Light {
        fn name(self) -> &'static str {
            match self {
                Light::Red => "Main.Red",
                Light::Green => "Main.Green",
                Light::Blink => "Main.Blink",
            }
        }

        fn id(self) -> usize {
            self as usize
        }

        fn from_id(id: usize) -> Option<Self> {
            [Light::Red, Light::Green, Light::Blink].get(id).copied()
        }
    }

    #[test]
    fn test_push_then_pop_returns_to_pushing_state() {
        let mut ctx = FsmContext::new(Light::Red);
        ctx.push_state(Light::Blink);
        assert_eq!(ctx.state(), Ok(Light::Blink));
        assert_eq!(ctx.state_stack_depth(), 1);

        ctx.pop_state().unwrap();
        assert_eq!(ctx.state(), Ok(Light::Red));
        assert_eq!(ctx.state_stack_depth(), 0);
    }

    #[test]
    fn test_pop_on_empty_stack() {
        let mut ctx = FsmContext::new(Light::Red);
        assert_eq!(ctx.pop_state(), Err(TransitionError::EmptyStack));
        assert_eq!(ctx.state(), Ok(Light::Red));
    }

    #[test]
    fn test_clear_state_marks_in_transition() {
        let mut ctx = FsmContext::new(Light::Green);
        ctx.set_transition("Stop");
        ctx.clear_state();

        assert!(ctx.in_transition());
        assert_eq!(ctx.previous_state(), Some(Light::Green));
        assert_eq!(
            ctx.state(),
            Err(TransitionError::StateUndefined { transition: "Stop" })
        );
    }

    #[test]
    fn test_empty_state_stack() {
        let mut ctx = FsmContext::new(Light::Red);
        ctx.push_state(Light::Green);
        ctx.push_state(Light::Blink);
        ctx.empty_state_stack();
        assert_eq!(ctx.state_stack_depth(), 0);
        assert_eq!(ctx.state(), Ok(Light::Blink));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut ctx = FsmContext::new(Light::Red);
        ctx.push_state(Light::Green);
        ctx.push_state(Light::Blink);
        let ids = ctx.snapshot().unwrap();
        assert_eq!(ids, vec![0, 1, 2]);

        let mut restored = FsmContext::new(Light::Red);
        restored.restore(&ids).unwrap();
        assert_eq!(restored.state(), Ok(Light::Blink));
        assert_eq!(restored.state_stack_depth(), 2);

        assert_eq!(
            restored.restore(&[7]),
            Err(TransitionError::UnknownStateId(7))
        );
    }
}
