//! Backend printing the machine back as a description listing.

use super::{Backend, Emitter};
use crate::error::CodegenError;
use crate::model::{
    Action, DEFAULT_TRANSITION, Fsm, Guard, Map, Parameter, State, Transfer, Transition,
};
use crate::options::GraphLevel;
use crate::validation::Validated;
use crate::visit::{Cursor, Visitable, Visitor};

/// Prints a validated machine in description syntax, with as much detail
/// as its [`GraphLevel`] asks for.
#[derive(Debug, Clone, Default)]
pub struct ListingBackend {
    level: GraphLevel,
    out: Emitter,
    start: String,
    unreachable: Vec<String>,
}

impl ListingBackend {
    pub fn new(level: GraphLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    fn full(&self) -> bool {
        self.level == GraphLevel::Full
    }

    fn actions<'a>(
        &mut self,
        cursor: Cursor<'a>,
        actions: &'a [Action],
    ) -> Result<(), CodegenError> {
        for action in actions {
            action.accept(cursor, self)?;
        }
        Ok(())
    }

    /// Prints `head {` + actions + `}`, or `head {}` when there are none.
    fn block<'a>(
        &mut self,
        cursor: Cursor<'a>,
        head: &str,
        actions: &'a [Action],
    ) -> Result<(), CodegenError> {
        if actions.is_empty() {
            self.out.line(format!("{head} {{}}"));
            return Ok(());
        }
        self.out.line(format!("{head} {{"));
        self.out.indent();
        self.actions(cursor, actions)?;
        self.out.outdent();
        self.out.line("}");
        Ok(())
    }

    fn signature(&self, transition: &Transition) -> String {
        if !self.full() || transition.parameters().is_empty() {
            return transition.name().to_owned();
        }
        let params: Vec<String> = transition.parameters().iter().map(ToString::to_string).collect();
        format!("{}({})", transition.name(), params.join(", "))
    }

    fn guard_text(&self, guard: &Guard) -> String {
        if self.full() {
            return guard.to_string();
        }
        let transfer = match guard.transfer() {
            Transfer::Set(end) => end.to_string(),
            Transfer::Push { end, push } if end.is_nil() => format!("push({push})"),
            Transfer::Push { end, push } => format!("{end}/push({push})"),
            Transfer::Pop { transition, .. } => {
                format!("pop({})", transition.as_deref().unwrap_or_default())
            }
        };
        if guard.is_unconditional() {
            transfer
        } else {
            format!("[{}] {transfer}", guard.condition())
        }
    }
}

impl Backend for ListingBackend {
    fn emit(&mut self, validated: Validated<'_>) -> Result<String, CodegenError> {
        let fsm = validated.fsm();
        self.out = Emitter::default();
        self.start = format!(
            "{}::{}",
            validated.start_map().name(),
            validated.start_state().class_name()
        );
        self.unreachable = validated.unreachable().to_vec();

        fsm.accept(Cursor::root(fsm), self)?;
        Ok(std::mem::take(&mut self.out).finish())
    }
}

impl<'a> Visitor<'a> for ListingBackend {
    type Output = ();
    type Error = CodegenError;

    fn visit_fsm(&mut self, cursor: Cursor<'a>, fsm: &'a Fsm) -> Result<(), CodegenError> {
        if self.full() {
            if let Some(source) = fsm.source() {
                self.out.line("%{");
                for line in source.lines() {
                    self.out.line(line);
                }
                self.out.line("%}");
            }
        }
        self.out.line(format!("%class {}", fsm.context()));
        if let Some(package) = fsm.package() {
            self.out.line(format!("%package {package}"));
        }
        if self.full() {
            if let Some(header) = fsm.header() {
                self.out.line(format!("%header {header}"));
            }
            for include in fsm.includes() {
                self.out.line(format!("%include {include}"));
            }
            for import in fsm.imports() {
                self.out.line(format!("%import {import}"));
            }
            for declaration in fsm.declarations() {
                self.out.line(format!("%declare {declaration}"));
            }
        }
        self.out.line(format!("%start {}", self.start));

        for map in fsm.maps() {
            map.accept(cursor.enter_map(map), self)?;
        }

        if self.full() && !self.unreachable.is_empty() {
            self.out.blank();
            for state in std::mem::take(&mut self.unreachable) {
                self.out.line(format!("// unreachable: {state}"));
            }
        }
        Ok(())
    }

    fn visit_map(&mut self, cursor: Cursor<'a>, map: &'a Map) -> Result<(), CodegenError> {
        self.out.blank();
        self.out.line(format!("%map {}", map.name()));
        self.out.line("%%");
        for state in map.default_state().into_iter().chain(map.states()) {
            state.accept(cursor.enter_state(state), self)?;
        }

        if self.full() {
            for stub in map.undefined_default_transitions() {
                let note = if stub.name() == DEFAULT_TRANSITION {
                    "is unhandled"
                } else {
                    "falls back to the Default transition"
                };
                self.out.line(format!("// Default::{} {note}", stub.name()));
            }
        }
        self.out.line("%%");
        Ok(())
    }

    fn visit_state(&mut self, cursor: Cursor<'a>, state: &'a State) -> Result<(), CodegenError> {
        self.out.line(state.class_name());
        if self.full() {
            if !state.entry_actions().is_empty() {
                self.block(cursor, "Entry", state.entry_actions())?;
            }
            if !state.exit_actions().is_empty() {
                self.block(cursor, "Exit", state.exit_actions())?;
            }
        }
        self.out.line("{");
        self.out.indent();
        for transition in state.transitions() {
            transition.accept(cursor.enter_transition(transition), self)?;
        }
        self.out.outdent();
        self.out.line("}");
        Ok(())
    }

    fn visit_transition(
        &mut self,
        cursor: Cursor<'a>,
        transition: &'a Transition,
    ) -> Result<(), CodegenError> {
        if self.level == GraphLevel::Names || transition.guards().is_empty() {
            let line = self.signature(transition);
            self.out.line(line);
            return Ok(());
        }
        for (cursor, guard) in cursor.guards()? {
            guard.accept(cursor, self)?;
        }
        Ok(())
    }

    fn visit_guard(&mut self, cursor: Cursor<'a>, guard: &'a Guard) -> Result<(), CodegenError> {
        let head = format!(
            "{} {}",
            self.signature(cursor.transition()?),
            self.guard_text(guard)
        );
        self.block(cursor, &head, guard.actions())
    }

    fn visit_action(&mut self, _: Cursor<'a>, action: &'a Action) -> Result<(), CodegenError> {
        self.out.line(format!("{action};"));
        Ok(())
    }

    fn visit_parameter(&mut self, _: Cursor<'a>, _: &'a Parameter) -> Result<(), CodegenError> {
        // Parameters are printed as part of the transition signature.
        Ok(())
    }
}
