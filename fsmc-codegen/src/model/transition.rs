use std::cmp::Ordering;

use super::{Guard, Parameter};
use crate::error::FsmError;

/// A named operation defined on a state.
///
/// The guards form an `if / else if / ... / else` chain evaluated in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    name: String,
    line: u32,
    parameters: Vec<Parameter>,
    guards: Vec<Guard>,
}

impl Transition {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            parameters: Vec::new(),
            guards: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Appends a guard to the chain.
    ///
    /// Nothing may follow an unconditional guard, which also rules out a
    /// second unconditional guard.
    pub fn add_guard(&mut self, guard: Guard) -> Result<(), FsmError> {
        if self.has_unconditional_guard() {
            return Err(FsmError::GuardAfterUnconditional {
                transition: self.name.clone(),
                line: guard.line(),
            });
        }
        self.guards.push(guard);
        Ok(())
    }

    pub fn with_guard(mut self, guard: Guard) -> Result<Self, FsmError> {
        self.add_guard(guard)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn has_unconditional_guard(&self) -> bool {
        self.guards.iter().any(Guard::is_unconditional)
    }

    /// Orders transitions by name, then parameter count, then parameter
    /// types. Parameter names do not take part.
    pub fn cmp_signature(&self, other: &Transition) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.parameters.len().cmp(&other.parameters.len()))
            .then_with(|| {
                let ours = self.parameters.iter().map(Parameter::ty);
                let theirs = other.parameters.iter().map(Parameter::ty);
                ours.cmp(theirs)
            })
    }

    pub fn same_signature(&self, other: &Transition) -> bool {
        self.cmp_signature(other).is_eq()
    }
}
