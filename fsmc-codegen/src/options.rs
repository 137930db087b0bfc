//! Generator options shared by every backend.

use std::fmt;
use std::str::FromStr;

/// How much detail the listing backend prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum GraphLevel {
    /// State and transition names only.
    #[default]
    Names,
    /// Adds guard conditions, transfers and actions.
    Guards,
    /// Adds entry/exit actions, parameters, pop arguments and the derived
    /// default-state stubs.
    Full,
}

impl FromStr for GraphLevel {
    type Err = String;

    /// Accepts the level's name or its number (`0`, `1`, `2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "names" => Ok(GraphLevel::Names),
            "1" | "guards" => Ok(GraphLevel::Guards),
            "2" | "full" => Ok(GraphLevel::Full),
            other => Err(format!("unknown graph level `{other}`")),
        }
    }
}

impl fmt::Display for GraphLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GraphLevel::Names => "names",
            GraphLevel::Guards => "guards",
            GraphLevel::Full => "full",
        })
    }
}

/// Options controlling code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Emit runtime trace calls around every transition.
    pub debug: bool,
    /// Emit a thread-safe wrapper around the generated context.
    pub sync: bool,
    /// Emit state persistence (`snapshot`/`restore`).
    pub serial: bool,
    /// Panic on unhandled transitions instead of returning an error.
    pub no_exceptions: bool,
    /// Run actions without restoring the state when one panics.
    pub no_catch: bool,
    pub graph_level: GraphLevel,
    /// Path generated code uses to reach the runtime crate.
    pub runtime_path: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            debug: false,
            sync: false,
            serial: false,
            no_exceptions: false,
            no_catch: false,
            graph_level: GraphLevel::default(),
            runtime_path: default_runtime_path(),
        }
    }
}

fn default_runtime_path() -> String {
    "::fsmc_runtime".to_owned()
}

impl GeneratorOptions {
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    #[must_use]
    pub fn serial(mut self, serial: bool) -> Self {
        self.serial = serial;
        self
    }

    #[must_use]
    pub fn no_exceptions(mut self, no_exceptions: bool) -> Self {
        self.no_exceptions = no_exceptions;
        self
    }

    #[must_use]
    pub fn no_catch(mut self, no_catch: bool) -> Self {
        self.no_catch = no_catch;
        self
    }

    #[must_use]
    pub fn graph_level(mut self, level: GraphLevel) -> Self {
        self.graph_level = level;
        self
    }

    #[must_use]
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert!(!options.debug && !options.sync && !options.no_catch);
        assert_eq!(options.graph_level, GraphLevel::Names);
        assert_eq!(options.runtime_path, "::fsmc_runtime");
    }

    #[test]
    fn test_builder_chain() {
        let options = GeneratorOptions::default()
            .debug(true)
            .serial(true)
            .graph_level(GraphLevel::Full)
            .runtime_path("crate::runtime");
        assert!(options.debug && options.serial);
        assert_eq!(options.graph_level, GraphLevel::Full);
        assert_eq!(options.runtime_path, "crate::runtime");
    }

    #[test]
    fn test_graph_level_parse() {
        assert_eq!("0".parse(), Ok(GraphLevel::Names));
        assert_eq!("Guards".parse(), Ok(GraphLevel::Guards));
        assert_eq!(" full ".parse(), Ok(GraphLevel::Full));
        assert!("3".parse::<GraphLevel>().is_err());
        assert!(GraphLevel::Names < GraphLevel::Full);
    }
}
