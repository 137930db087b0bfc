use std::fmt;

/// A formal argument of a transition.
///
/// The type is kept as raw target-language text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    ty: String,
    line: u32,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            line,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}
