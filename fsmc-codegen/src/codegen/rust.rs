//! Backend emitting a Rust module that drives the machine on top of
//! `fsmc-runtime`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, Path};

use super::enums::{StateVariant, render_state_enum};
use super::structs::{Forward, render_context_struct, render_shared_struct};
use super::{Backend, scope_state_name};
use crate::error::CodegenError;
use crate::helpers::{
    context_ident, handler_ident, parse_expr, parse_ident, parse_path, parse_type, parse_use,
    shared_ident, state_enum_ident, state_variant,
};
use crate::model::{
    Action, ActionTarget, DEFAULT_STATE, DEFAULT_TRANSITION, EndState, Fsm, Guard, Map, Parameter,
    State, StateRef, Transfer, Transition,
};
use crate::options::GeneratorOptions;
use crate::validation::Validated;
use crate::visit::{Cursor, Visitable, Visitor};

/// Methods the generated context defines for itself.
const RESERVED_METHODS: &[&str] = &[
    "new",
    "enter_start_state",
    "state",
    "fsm",
    "fsm_mut",
    "snapshot",
    "restore",
    "lock",
    "into_inner",
    "on_entry",
    "on_exit",
    "default_transition",
    "unhandled_transition",
];

/// Emits Rust source.
#[derive(Debug, Clone, Default)]
pub struct RustBackend {
    options: GeneratorOptions,
}

impl RustBackend {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl Backend for RustBackend {
    fn emit(&mut self, validated: Validated<'_>) -> Result<String, CodegenError> {
        let fsm = validated.fsm();
        let mut emitter = RustEmitter::new(&self.options, &validated)?;
        let tokens = fsm.accept(Cursor::root(fsm), &mut emitter)?;

        let file: syn::File = syn::parse2(tokens)
            .map_err(|e| CodegenError::Internal(format!("generated code does not parse: {e}")))?;

        let mut out = match fsm.source_file() {
            Some(name) => format!("// Generated by fsmc from {name}. Do not edit.\n\n"),
            None => "// Generated by fsmc. Do not edit.\n\n".to_owned(),
        };
        if let Some(source) = fsm.source() {
            out.push_str(source.trim_end());
            out.push_str("\n\n");
        }
        out.push_str(&prettyplease::unparse(&file));
        Ok(out)
    }
}

/// Per-pass naming shared by every visit method.
struct RustEmitter<'o> {
    options: &'o GeneratorOptions,
    runtime: Path,
    owner: Ident,
    context: Ident,
    state_enum: Ident,
    start: Ident,
}

impl<'o> RustEmitter<'o> {
    fn new(options: &'o GeneratorOptions, validated: &Validated<'_>) -> Result<Self, CodegenError> {
        let fsm = validated.fsm();
        let line = fsm.start_line();
        let owner = parse_ident("context class", fsm.context(), line)?;
        let start = state_variant(
            validated.start_map().name(),
            validated.start_state().instance_name(),
            line,
        )?;

        Ok(Self {
            options,
            runtime: parse_path("runtime path", &options.runtime_path, line)?,
            context: context_ident(&owner),
            state_enum: state_enum_ident(&owner),
            owner,
            start,
        })
    }

    fn variant(
        &self,
        fsm: &Fsm,
        map: &Map,
        target: &StateRef,
        line: u32,
    ) -> Result<Ident, CodegenError> {
        let (map, state) = fsm.resolve(target, map.name()).ok_or_else(|| {
            CodegenError::Internal(format!("state `{target}` did not resolve after validation"))
        })?;
        state_variant(map.name(), state.instance_name(), line)
    }

    fn parameters<'a>(
        &mut self,
        cursor: Cursor<'a>,
        transition: &'a Transition,
    ) -> Result<(Vec<TokenStream>, Vec<Ident>), CodegenError> {
        let mut params = Vec::new();
        let mut args = Vec::new();
        for parameter in transition.parameters() {
            params.push(parameter.accept(cursor, self)?);
            args.push(parse_ident("parameter name", parameter.name(), parameter.line())?);
        }
        Ok((params, args))
    }

    fn actions<'a>(
        &mut self,
        cursor: Cursor<'a>,
        actions: &'a [Action],
    ) -> Result<Vec<TokenStream>, CodegenError> {
        actions.iter().map(|a| a.accept(cursor, self)).collect()
    }

    /// Transitions exposed as public methods: every merged transition but
    /// `Default`, one signature per name.
    fn public_transitions<'a>(&self, fsm: &'a Fsm) -> Result<Vec<&'a Transition>, CodegenError> {
        let every_state = fsm
            .maps()
            .iter()
            .flat_map(|m| m.default_state().into_iter().chain(m.states()));
        for state in every_state {
            if let Some(t) = state
                .transitions()
                .iter()
                .find(|t| t.name() == DEFAULT_TRANSITION && !t.parameters().is_empty())
            {
                return Err(signature(t, "is a Default transition and cannot take parameters"));
            }
        }

        let transitions: Vec<_> = fsm
            .transitions()
            .into_iter()
            .filter(|t| t.name() != DEFAULT_TRANSITION)
            .collect();
        for pair in transitions.windows(2) {
            if pair[0].name() == pair[1].name() {
                return Err(signature(
                    pair[1],
                    "is declared with different parameter lists; Rust output needs one per name",
                ));
            }
        }
        if let Some(t) = transitions.iter().find(|t| RESERVED_METHODS.contains(&t.name())) {
            return Err(signature(t, "collides with a generated method"));
        }
        Ok(transitions)
    }

    fn public_method<'a>(
        &mut self,
        cursor: Cursor<'a>,
        transition: &'a Transition,
    ) -> Result<(TokenStream, Forward), CodegenError> {
        let fsm = cursor.fsm();
        let rt = self.runtime.clone();
        let en = self.state_enum.clone();
        let owner = self.owner.clone();
        let method = parse_ident("transition name", transition.name(), transition.line())?;
        let (params, args) = self.parameters(cursor, transition)?;
        let name = transition.name();

        let mut arms = Vec::new();
        for (map, state) in fsm.states() {
            let variant = state_variant(map.name(), state.instance_name(), state.line())?;
            let owner_state = if state.defines(name) {
                Some(state.class_name())
            } else if map.has_default_handler(name) {
                Some(DEFAULT_STATE)
            } else {
                None
            };
            arms.push(match owner_state {
                Some(s) => {
                    let handler = handler_ident(map.name(), s, name, transition.line())?;
                    quote! { #en::#variant => self.#handler(ctxt, state #(, #args)*), }
                }
                None => quote! { #en::#variant => self.default_transition(ctxt, state), },
            });
        }

        let tokens = quote! {
            pub fn #method(&mut self, ctxt: &mut #owner #(, #params)*) -> Result<(), #rt::TransitionError> {
                self.fsm.set_transition(#name);
                let result = self.fsm.state().and_then(|state| match state {
                    #(#arms)*
                });
                self.fsm.set_transition("");
                result
            }
        };
        Ok((tokens, Forward { method, params, args }))
    }

    /// Body of one guard: exit, actions, state change, entry.
    fn guard_body<'a>(
        &mut self,
        cursor: Cursor<'a>,
        guard: &'a Guard,
    ) -> Result<TokenStream, CodegenError> {
        let fsm = cursor.fsm();
        let map = cursor.map()?;
        let state = cursor.state()?;
        let transition = cursor.transition()?;
        let en = self.state_enum.clone();
        let line = guard.line();

        let end = match guard.end_state().and_then(EndState::state_ref) {
            Some(target) => Some(self.variant(fsm, map, target, line)?),
            None => None,
        };
        // Default-state handlers run for any state of the map, so a set to a
        // named state is a loopback only when that state is current.
        let runtime_check = state.is_default() && matches!(guard.transfer(), Transfer::Set(_));

        let exit = match (&end, guard.is_loopback()) {
            (_, true) => quote! {},
            (Some(end), false) if runtime_check => quote! {
                if state != #en::#end {
                    self.on_exit(ctxt, state);
                }
            },
            _ => quote! { self.on_exit(ctxt, state); },
        };

        let actions = self.actions(cursor, guard.actions())?;
        let has_actions = !actions.is_empty();
        let catching = has_actions && !self.options.no_catch;
        let (run, resume) = if !has_actions {
            (quote! {}, quote! {})
        } else if !catching {
            (quote! { self.fsm.clear_state(); #(#actions)* }, quote! {})
        } else {
            (
                quote! {
                    self.fsm.clear_state();
                    let outcome = ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| {
                        #(#actions)*
                    }));
                },
                quote! {
                    if let Err(panic) = outcome {
                        ::std::panic::resume_unwind(panic);
                    }
                },
            )
        };

        // The state change and entry actions run even when an action
        // panicked; the panic resumes afterwards.
        let end_or_current = match &end {
            Some(end) => quote! { #en::#end },
            None => quote! { state },
        };
        let (restore, after, popped) = match guard.transfer() {
            Transfer::Set(EndState::Nil) => {
                let restore = if has_actions {
                    quote! { self.fsm.set_state(state); }
                } else {
                    quote! {}
                };
                (restore, quote! {}, quote! {})
            }
            Transfer::Set(EndState::Named(_)) => {
                let entry = if runtime_check {
                    quote! {
                        if state != #end_or_current {
                            self.on_entry(ctxt, #end_or_current);
                        }
                    }
                } else {
                    quote! { self.on_entry(ctxt, #end_or_current); }
                };
                (quote! { self.fsm.set_state(#end_or_current); }, entry, quote! {})
            }
            Transfer::Push { push, .. } => {
                let push = self.variant(fsm, map, push, line)?;
                let restore = if has_actions || end.is_some() {
                    quote! { self.fsm.set_state(#end_or_current); }
                } else {
                    quote! {}
                };
                let after = quote! {
                    self.fsm.push_state(#en::#push);
                    self.on_entry(ctxt, #en::#push);
                };
                (restore, after, quote! {})
            }
            Transfer::Pop { .. } if catching => (
                quote! { self.fsm.set_state(state); },
                quote! { let popped = self.fsm.pop_state(); },
                quote! { popped?; },
            ),
            Transfer::Pop { .. } => {
                let restore = if has_actions {
                    quote! { self.fsm.set_state(state); }
                } else {
                    quote! {}
                };
                (restore, quote! { self.fsm.pop_state()?; }, quote! {})
            }
        };

        let replay = match guard.pop_transition() {
            Some(name) => {
                let method = parse_ident("pop transition", name, line)?;
                let args = guard
                    .pop_args()
                    .map(|arg| parse_expr("pop argument", arg, line))
                    .collect::<Result<Vec<_>, _>>()?;
                quote! { self.#method(ctxt #(, #args)*)?; }
            }
            None => quote! {},
        };

        let (trace_enter, trace_exit) = if self.options.debug {
            let signature = format!(
                "{}({})",
                transition.name(),
                transition
                    .parameters()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            let name = transition.name();
            (
                quote! { self.fsm.trace(format_args!("ENTER TRANSITION: {}.{}", state.name(), #signature)); },
                quote! { self.fsm.trace(format_args!("EXIT TRANSITION : {}.{}", state.name(), #name)); },
            )
        } else {
            (quote! {}, quote! {})
        };

        Ok(quote! {
            #trace_enter
            #exit
            #run
            #restore
            #after
            #resume
            #popped
            #trace_exit
            #replay
        })
    }

    /// Statement run when no guard of `transition` fires.
    fn fallthrough(
        &self,
        map: &Map,
        state: &State,
        transition: &Transition,
        args: &[Ident],
    ) -> Result<TokenStream, CodegenError> {
        if !state.is_default() {
            let handler = handler_ident(
                map.name(),
                DEFAULT_STATE,
                transition.name(),
                transition.line(),
            )?;
            return Ok(quote! { return self.#handler(ctxt, state #(, #args)*); });
        }
        if transition.name() == DEFAULT_TRANSITION {
            Ok(quote! { return self.unhandled_transition(state); })
        } else {
            Ok(quote! { return self.default_transition(ctxt, state); })
        }
    }

    /// Handlers the map's default state lacks, forwarding to the
    /// unhandled-transition path.
    fn default_stubs<'a>(
        &mut self,
        cursor: Cursor<'a>,
        map: &'a Map,
    ) -> Result<TokenStream, CodegenError> {
        let rt = self.runtime.clone();
        let en = self.state_enum.clone();
        let owner = self.owner.clone();

        let mut stubs = TokenStream::new();
        for transition in map.undefined_default_transitions() {
            let handler = handler_ident(
                map.name(),
                DEFAULT_STATE,
                transition.name(),
                transition.line(),
            )?;
            let (params, _) = self.parameters(cursor, transition)?;
            let body = if transition.name() == DEFAULT_TRANSITION {
                quote! { self.unhandled_transition(state) }
            } else {
                quote! { self.default_transition(ctxt, state) }
            };
            stubs.extend(quote! {
                fn #handler(&mut self, ctxt: &mut #owner, state: #en #(, #params)*) -> Result<(), #rt::TransitionError> {
                    #body
                }
            });
        }
        Ok(stubs)
    }

    /// `on_entry`/`on_exit` dispatch, `default_transition` and
    /// `unhandled_transition`.
    fn dispatchers<'a>(
        &mut self,
        cursor: Cursor<'a>,
        fsm: &'a Fsm,
    ) -> Result<TokenStream, CodegenError> {
        let rt = self.runtime.clone();
        let en = self.state_enum.clone();
        let owner = self.owner.clone();

        let mut entry_arms = Vec::new();
        let mut exit_arms = Vec::new();
        let mut default_arms = Vec::new();
        for (map, state) in fsm.states() {
            let variant = state_variant(map.name(), state.instance_name(), state.line())?;
            let scoped = cursor.enter_map(map).enter_state(state);

            if !state.entry_actions().is_empty() {
                let actions = self.actions(scoped, state.entry_actions())?;
                entry_arms.push(quote! { #en::#variant => { #(#actions)* } });
            }
            if !state.exit_actions().is_empty() {
                let actions = self.actions(scoped, state.exit_actions())?;
                exit_arms.push(quote! { #en::#variant => { #(#actions)* } });
            }

            let owner_state = if state.defines(DEFAULT_TRANSITION) {
                Some(state.class_name())
            } else if map.has_default_handler(DEFAULT_TRANSITION) {
                Some(DEFAULT_STATE)
            } else {
                None
            };
            default_arms.push(match owner_state {
                Some(s) => {
                    let handler = handler_ident(map.name(), s, DEFAULT_TRANSITION, state.line())?;
                    quote! { #en::#variant => self.#handler(ctxt, state), }
                }
                None => quote! { #en::#variant => self.unhandled_transition(state), },
            });
        }

        let unhandled = if self.options.no_exceptions {
            quote! {
                panic!(
                    "no transition `{}` defined in state `{}`",
                    self.fsm.transition(),
                    state.name()
                )
            }
        } else {
            quote! {
                Err(#rt::TransitionError::Undefined {
                    state: state.name(),
                    transition: self.fsm.transition(),
                })
            }
        };

        Ok(quote! {
            fn on_entry(&mut self, ctxt: &mut #owner, state: #en) {
                match state {
                    #(#entry_arms)*
                    _ => {}
                }
            }

            fn on_exit(&mut self, ctxt: &mut #owner, state: #en) {
                match state {
                    #(#exit_arms)*
                    _ => {}
                }
            }

            fn default_transition(&mut self, ctxt: &mut #owner, state: #en) -> Result<(), #rt::TransitionError> {
                match state {
                    #(#default_arms)*
                }
            }

            fn unhandled_transition(&self, state: #en) -> Result<(), #rt::TransitionError> {
                #unhandled
            }
        })
    }

    fn wrap_package(&self, fsm: &Fsm, mut items: TokenStream) -> Result<TokenStream, CodegenError> {
        let Some(package) = fsm.package() else {
            return Ok(items);
        };
        let segments: Vec<_> = package
            .split("::")
            .flat_map(|s| s.split('.'))
            .filter(|s| !s.trim().is_empty())
            .collect();
        for segment in segments.into_iter().rev() {
            let module = parse_ident("package", segment, fsm.start_line())?;
            items = quote! {
                pub mod #module {
                    #[allow(unused_imports)]
                    use super::*;
                    #items
                }
            };
        }
        Ok(items)
    }
}

impl<'a> Visitor<'a> for RustEmitter<'_> {
    type Output = TokenStream;
    type Error = CodegenError;

    fn visit_fsm(&mut self, cursor: Cursor<'a>, fsm: &'a Fsm) -> Result<TokenStream, CodegenError> {
        let rt = self.runtime.clone();
        let en = self.state_enum.clone();
        let context = self.context.clone();
        let owner = self.owner.clone();
        let start = self.start.clone();

        let imports = fsm
            .imports()
            .iter()
            .map(|i| parse_use(i, fsm.start_line()))
            .collect::<Result<Vec<_>, _>>()?;

        let states = fsm
            .states()
            .map(|(map, state)| {
                Ok(StateVariant {
                    ident: state_variant(map.name(), state.instance_name(), state.line())?,
                    name: scope_state_name(state.instance_name(), map.name()),
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;
        let state_enum = render_state_enum(&en, &rt, &states);
        let context_struct = render_context_struct(&context, &owner, &en, &rt);

        let mut public = Vec::new();
        let mut forwards = Vec::new();
        for transition in self.public_transitions(fsm)? {
            let (method, forward) = self.public_method(cursor, transition)?;
            public.push(method);
            forwards.push(forward);
        }

        let mut handlers = TokenStream::new();
        for map in fsm.maps() {
            handlers.extend(map.accept(cursor.enter_map(map), self)?);
        }
        let dispatchers = self.dispatchers(cursor, fsm)?;

        let serial = if self.options.serial {
            quote! {
                /// State ids from the bottom of the state stack up, then the
                /// current state.
                pub fn snapshot(&self) -> Result<Vec<usize>, #rt::TransitionError> {
                    self.fsm.snapshot()
                }

                pub fn restore(&mut self, ids: &[usize]) -> Result<(), #rt::TransitionError> {
                    self.fsm.restore(ids)
                }
            }
        } else {
            quote! {}
        };

        let shared = if self.options.sync {
            render_shared_struct(&shared_ident(&owner), &context, &owner, &rt, &forwards)
        } else {
            quote! {}
        };

        let items = quote! {
            #(use #imports;)*

            #state_enum

            #context_struct

            #[allow(
                dead_code,
                non_snake_case,
                unused_variables,
                unreachable_code,
                unreachable_patterns,
                clippy::all
            )]
            impl #context {
                pub fn new() -> Self {
                    Self {
                        fsm: #rt::FsmContext::new(#en::#start),
                    }
                }

                /// Runs the start state's entry actions. Call once, before
                /// the first transition.
                pub fn enter_start_state(&mut self, ctxt: &mut #owner) -> Result<(), #rt::TransitionError> {
                    let state = self.fsm.state()?;
                    self.on_entry(ctxt, state);
                    Ok(())
                }

                pub fn state(&self) -> Result<#en, #rt::TransitionError> {
                    self.fsm.state()
                }

                pub fn fsm(&self) -> &#rt::FsmContext<#en> {
                    &self.fsm
                }

                pub fn fsm_mut(&mut self) -> &mut #rt::FsmContext<#en> {
                    &mut self.fsm
                }

                #serial

                #(#public)*

                #handlers

                #dispatchers
            }

            impl Default for #context {
                fn default() -> Self {
                    Self::new()
                }
            }

            #shared
        };
        self.wrap_package(fsm, items)
    }

    fn visit_map(&mut self, cursor: Cursor<'a>, map: &'a Map) -> Result<TokenStream, CodegenError> {
        let mut tokens = TokenStream::new();
        if let Some(default) = map.default_state() {
            tokens.extend(default.accept(cursor.enter_state(default), self)?);
        }
        tokens.extend(self.default_stubs(cursor, map)?);
        for state in map.states() {
            tokens.extend(state.accept(cursor.enter_state(state), self)?);
        }
        Ok(tokens)
    }

    fn visit_state(
        &mut self,
        cursor: Cursor<'a>,
        state: &'a State,
    ) -> Result<TokenStream, CodegenError> {
        let mut tokens = TokenStream::new();
        for transition in state.transitions() {
            tokens.extend(transition.accept(cursor.enter_transition(transition), self)?);
        }
        Ok(tokens)
    }

    fn visit_transition(
        &mut self,
        cursor: Cursor<'a>,
        transition: &'a Transition,
    ) -> Result<TokenStream, CodegenError> {
        let map = cursor.map()?;
        let state = cursor.state()?;
        let rt = self.runtime.clone();
        let en = self.state_enum.clone();
        let owner = self.owner.clone();

        let handler = handler_ident(
            map.name(),
            state.class_name(),
            transition.name(),
            transition.line(),
        )?;
        let (params, args) = self.parameters(cursor, transition)?;

        let mut chain = TokenStream::new();
        for (cursor, guard) in cursor.guards()? {
            chain.extend(guard.accept(cursor, self)?);
        }

        let body = if transition.has_unconditional_guard() {
            chain
        } else {
            let fallthrough = self.fallthrough(map, state, transition, &args)?;
            if transition.guards().is_empty() {
                fallthrough
            } else {
                quote! { #chain else { #fallthrough } }
            }
        };

        Ok(quote! {
            fn #handler(&mut self, ctxt: &mut #owner, state: #en #(, #params)*) -> Result<(), #rt::TransitionError> {
                #body
                Ok(())
            }
        })
    }

    fn visit_guard(
        &mut self,
        cursor: Cursor<'a>,
        guard: &'a Guard,
    ) -> Result<TokenStream, CodegenError> {
        let position = cursor.guard()?;
        let body = self.guard_body(cursor, guard)?;
        let condition = if guard.is_unconditional() {
            None
        } else {
            Some(parse_expr("guard condition", guard.condition(), guard.line())?)
        };

        Ok(match (position.is_first(), condition) {
            (true, None) => quote! { { #body } },
            (false, None) => quote! { else { #body } },
            (true, Some(condition)) => quote! { if #condition { #body } },
            (false, Some(condition)) => quote! { else if #condition { #body } },
        })
    }

    fn visit_action(
        &mut self,
        _: Cursor<'a>,
        action: &'a Action,
    ) -> Result<TokenStream, CodegenError> {
        if action.target() == ActionTarget::Context {
            return Ok(quote! { self.fsm.empty_state_stack(); });
        }

        let line = action.line();
        let name = parse_ident("action name", action.name(), line)?;
        let args = action
            .arguments()
            .map(|arg| parse_expr("action argument", arg, line))
            .collect::<Result<Vec<_>, _>>()?;

        if !action.is_property() {
            return Ok(quote! { ctxt.#name(#(#args),*); });
        }
        let Some(value) = args.first() else {
            return Err(CodegenError::Syntax {
                what: "property action",
                text: action.name().to_owned(),
                message: "assignment has no value".to_owned(),
                line,
            });
        };
        Ok(quote! { ctxt.#name = #value; })
    }

    fn visit_parameter(
        &mut self,
        _: Cursor<'a>,
        parameter: &'a Parameter,
    ) -> Result<TokenStream, CodegenError> {
        let name = parse_ident("parameter name", parameter.name(), parameter.line())?;
        let ty = parse_type(parameter.ty(), parameter.line())?;
        Ok(quote! { #name: #ty })
    }
}

fn signature(transition: &Transition, reason: &'static str) -> CodegenError {
    CodegenError::Signature {
        transition: transition.name().to_owned(),
        reason,
        line: transition.line(),
    }
}
