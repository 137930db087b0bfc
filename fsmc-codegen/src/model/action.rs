use std::fmt;

/// Reserved action name that clears the state stack.
///
/// It is dispatched to the state machine context rather than the owner.
pub const EMPTY_STATE_STACK: &str = "emptyStateStack";

/// Object an action is invoked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    /// The generated state machine context.
    Context,
    /// The application object owning the state machine.
    Owner,
}

/// A call made while executing a guard or an entry/exit block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    line: u32,
    arguments: Vec<String>,
    property: bool,
    default: bool,
}

impl Action {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            arguments: Vec::new(),
            property: false,
            default: false,
        }
    }

    /// Sets the raw argument expressions, in call order.
    #[must_use]
    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the action as a property assignment (`name = argument`).
    #[must_use]
    pub fn as_property(mut self) -> Self {
        self.property = true;
        self
    }

    /// Marks the action as implicitly supplied rather than written out.
    #[must_use]
    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Arguments to emit, in order. Empty placeholders are skipped.
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .map(String::as_str)
            .filter(|arg| !arg.trim().is_empty())
    }

    /// Arguments exactly as supplied, placeholders included.
    pub fn raw_arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn is_property(&self) -> bool {
        self.property
    }

    pub fn is_default(&self) -> bool {
        self.default
    }

    pub fn target(&self) -> ActionTarget {
        if self.name == EMPTY_STATE_STACK {
            ActionTarget::Context
        } else {
            ActionTarget::Owner
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property {
            let value = self.arguments().next().unwrap_or_default();
            return write!(f, "{} = {}", self.name, value);
        }

        write!(f, "{}(", self.name)?;
        for (i, arg) in self.arguments().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(arg)?;
        }
        f.write_str(")")
    }
}
