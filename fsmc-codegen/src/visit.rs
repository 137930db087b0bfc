//! The traversal contract every backend implements.
//!
//! Each entity accepts a [`Visitor`] and calls the one `visit_*` method
//! matching its own type. A backend decides the traversal order itself but
//! must reach every map, then every state (the default state's transitions
//! may come first), then every transition, every guard in declaration order
//! and every action in declaration order.
//!
//! Ancestors of the node being visited travel in a [`Cursor`] handed down
//! the traversal, so entities never need links to their owners and
//! visitors never need to stash per-pass bookkeeping on themselves.

use crate::error::CodegenError;
use crate::model::{Action, Fsm, Guard, Map, Parameter, State, Transition};

/// Any node of the tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Fsm(&'a Fsm),
    Map(&'a Map),
    State(&'a State),
    Transition(&'a Transition),
    Guard(&'a Guard),
    Action(&'a Action),
    Parameter(&'a Parameter),
}

impl<'a> Node<'a> {
    /// Calls the visitor method matching this node's type.
    pub fn accept<V: Visitor<'a> + ?Sized>(
        self,
        cursor: Cursor<'a>,
        visitor: &mut V,
    ) -> Result<V::Output, V::Error> {
        match self {
            Node::Fsm(fsm) => visitor.visit_fsm(cursor, fsm),
            Node::Map(map) => visitor.visit_map(cursor, map),
            Node::State(state) => visitor.visit_state(cursor, state),
            Node::Transition(transition) => visitor.visit_transition(cursor, transition),
            Node::Guard(guard) => visitor.visit_guard(cursor, guard),
            Node::Action(action) => visitor.visit_action(cursor, action),
            Node::Parameter(parameter) => visitor.visit_parameter(cursor, parameter),
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            Node::Fsm(_) => "fsm",
            Node::Map(_) => "map",
            Node::State(_) => "state",
            Node::Transition(_) => "transition",
            Node::Guard(_) => "guard",
            Node::Action(_) => "action",
            Node::Parameter(_) => "parameter",
        }
    }
}

/// One method per entity type.
pub trait Visitor<'a> {
    type Output;
    type Error;

    fn visit_fsm(&mut self, cursor: Cursor<'a>, fsm: &'a Fsm) -> Result<Self::Output, Self::Error>;

    fn visit_map(&mut self, cursor: Cursor<'a>, map: &'a Map) -> Result<Self::Output, Self::Error>;

    fn visit_state(
        &mut self,
        cursor: Cursor<'a>,
        state: &'a State,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_transition(
        &mut self,
        cursor: Cursor<'a>,
        transition: &'a Transition,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_guard(
        &mut self,
        cursor: Cursor<'a>,
        guard: &'a Guard,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_action(
        &mut self,
        cursor: Cursor<'a>,
        action: &'a Action,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_parameter(
        &mut self,
        cursor: Cursor<'a>,
        parameter: &'a Parameter,
    ) -> Result<Self::Output, Self::Error>;
}

/// Implemented by every entity: hands itself to the matching visitor
/// method and does nothing else.
pub trait Visitable<'a> {
    fn accept<V: Visitor<'a> + ?Sized>(
        &'a self,
        cursor: Cursor<'a>,
        visitor: &mut V,
    ) -> Result<V::Output, V::Error>;
}

macro_rules! visitable {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl<'a> Visitable<'a> for $ty {
                fn accept<V: Visitor<'a> + ?Sized>(
                    &'a self,
                    cursor: Cursor<'a>,
                    visitor: &mut V,
                ) -> Result<V::Output, V::Error> {
                    Node::$variant(self).accept(cursor, visitor)
                }
            }

            impl<'a> From<&'a $ty> for Node<'a> {
                fn from(node: &'a $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

visitable! {
    Fsm => Fsm,
    Map => Map,
    State => State,
    Transition => Transition,
    Guard => Guard,
    Action => Action,
    Parameter => Parameter,
}

/// Position of a guard within its transition's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPosition {
    pub index: usize,
    pub count: usize,
}

impl GuardPosition {
    pub fn is_first(self) -> bool {
        self.index == 0
    }

    pub fn is_last(self) -> bool {
        self.index + 1 == self.count
    }

    /// True when the transition has more than one guard, so each guard is
    /// one arm of an if / else-if / else chain.
    pub fn is_chained(self) -> bool {
        self.count > 1
    }
}

/// Ancestors of the node currently being visited.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    fsm: &'a Fsm,
    map: Option<&'a Map>,
    state: Option<&'a State>,
    transition: Option<&'a Transition>,
    guard: Option<GuardPosition>,
}

impl<'a> Cursor<'a> {
    pub fn root(fsm: &'a Fsm) -> Self {
        Self {
            fsm,
            map: None,
            state: None,
            transition: None,
            guard: None,
        }
    }

    #[must_use]
    pub fn enter_map(self, map: &'a Map) -> Self {
        Self {
            map: Some(map),
            state: None,
            transition: None,
            guard: None,
            ..self
        }
    }

    #[must_use]
    pub fn enter_state(self, state: &'a State) -> Self {
        Self {
            state: Some(state),
            transition: None,
            guard: None,
            ..self
        }
    }

    #[must_use]
    pub fn enter_transition(self, transition: &'a Transition) -> Self {
        Self {
            transition: Some(transition),
            guard: None,
            ..self
        }
    }

    /// Cursor for the guard at `index` of the current transition.
    #[must_use]
    pub fn enter_guard(self, index: usize) -> Self {
        let count = self.transition.map_or(0, |t| t.guards().len());
        Self {
            guard: Some(GuardPosition { index, count }),
            ..self
        }
    }

    pub fn fsm(self) -> &'a Fsm {
        self.fsm
    }

    pub fn map(self) -> Result<&'a Map, CodegenError> {
        self.map.ok_or_else(|| outside("map"))
    }

    pub fn state(self) -> Result<&'a State, CodegenError> {
        self.state.ok_or_else(|| outside("state"))
    }

    pub fn transition(self) -> Result<&'a Transition, CodegenError> {
        self.transition.ok_or_else(|| outside("transition"))
    }

    pub fn guard(self) -> Result<GuardPosition, CodegenError> {
        self.guard.ok_or_else(|| outside("guard"))
    }

    /// True when inside a state (entry/exit or transition actions) rather
    /// than at the top of a traversal.
    pub fn in_state(self) -> bool {
        self.state.is_some()
    }

    /// Guards of the current transition paired with their cursors, in
    /// declaration order.
    pub fn guards(self) -> Result<impl Iterator<Item = (Cursor<'a>, &'a Guard)>, CodegenError> {
        let transition = self.transition()?;
        Ok(transition
            .guards()
            .iter()
            .enumerate()
            .map(move |(index, guard)| (self.enter_guard(index), guard)))
    }
}

fn outside(scope: &str) -> CodegenError {
    CodegenError::Internal(format!("node visited outside of any {scope}"))
}
