use super::{Map, State, StateRef, Transition, merge_transitions};
use crate::error::FsmError;

/// Root of a state machine description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fsm {
    context: String,
    start_state: Option<(StateRef, u32)>,
    package: Option<String>,
    source: Option<String>,
    source_file: Option<String>,
    header: Option<String>,
    imports: Vec<String>,
    includes: Vec<String>,
    declarations: Vec<String>,
    maps: Vec<Map>,
}

impl Fsm {
    /// Creates an empty machine owned by the `context` class.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }

    /// Name of the application class owning the machine.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Sets the start state, `Map::State` or a bare state name.
    pub fn set_start_state(&mut self, name: &str, line: u32) {
        self.start_state = Some((StateRef::parse(name), line));
    }

    pub fn start_state(&self) -> Option<&StateRef> {
        self.start_state.as_ref().map(|(r, _)| r)
    }

    pub fn start_line(&self) -> u32 {
        self.start_state.as_ref().map_or(0, |(_, line)| *line)
    }

    pub fn set_package(&mut self, package: impl Into<String>) {
        self.package = Some(package.into());
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Verbatim text copied to the top of the generated file.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Name of the description file this tree was parsed from.
    pub fn set_source_file(&mut self, file: impl Into<String>) {
        self.source_file = Some(file.into());
    }

    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// Header declaring the context class, for targets that use one.
    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = Some(header.into());
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn add_import(&mut self, import: impl Into<String>) {
        self.imports.push(import.into());
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn add_include(&mut self, include: impl Into<String>) {
        self.includes.push(include.into());
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn add_declaration(&mut self, declaration: impl Into<String>) {
        self.declarations.push(declaration.into());
    }

    pub fn declarations(&self) -> &[String] {
        &self.declarations
    }

    pub fn add_map(&mut self, map: Map) -> Result<(), FsmError> {
        if self.map(map.name()).is_some() {
            return Err(FsmError::DuplicateMap {
                map: map.name().to_owned(),
                line: map.line(),
            });
        }
        self.maps.push(map);
        Ok(())
    }

    pub fn with_map(mut self, map: Map) -> Result<Self, FsmError> {
        self.add_map(map)?;
        Ok(self)
    }

    pub fn maps(&self) -> &[Map] {
        &self.maps
    }

    pub fn map(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|m| m.name() == name)
    }

    /// Resolves `state` as written inside `current_map`.
    ///
    /// Only ordinary states resolve; the default state is never a target.
    pub fn resolve(&self, state: &StateRef, current_map: &str) -> Option<(&Map, &State)> {
        let map = self.map(state.map_or(current_map))?;
        map.state(state.state()).map(|s| (map, s))
    }

    /// All transitions of every map, sorted by signature with duplicates
    /// removed.
    pub fn transitions(&self) -> Vec<&Transition> {
        merge_transitions(self.maps.iter().flat_map(Map::transitions))
    }

    /// Ordinary states of every map, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = (&Map, &State)> {
        self.maps
            .iter()
            .flat_map(|map| map.states().iter().map(move |state| (map, state)))
    }
}
