// Generated by fsmc from player.sm. Do not edit.

use super::Player;
/// Every state of the machine, one variant per `Map_State`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum PlayerState {
    Main_Stopped,
    Main_Playing,
    Menu_Browsing,
}
impl PlayerState {
    /// All states, indexed by id.
    pub const ALL: [PlayerState; 3usize] = [
        PlayerState::Main_Stopped,
        PlayerState::Main_Playing,
        PlayerState::Menu_Browsing,
    ];
    pub fn name(self) -> &'static str {
        ::fsmc::runtime::StateId::name(self)
    }
    pub fn id(self) -> usize {
        ::fsmc::runtime::StateId::id(self)
    }
}
impl ::fsmc::runtime::StateId for PlayerState {
    fn name(self) -> &'static str {
        match self {
            PlayerState::Main_Stopped => "Main.Stopped",
            PlayerState::Main_Playing => "Main.Playing",
            PlayerState::Menu_Browsing => "Menu.Browsing",
        }
    }
    fn id(self) -> usize {
        self as usize
    }
    fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }
}
#[doc = "Drives the state machine of a `Player`."]
#[derive(Debug, Clone)]
pub struct PlayerContext {
    fsm: ::fsmc::runtime::FsmContext<PlayerState>,
}
#[allow(
    dead_code,
    non_snake_case,
    unused_variables,
    unreachable_code,
    unreachable_patterns,
    clippy::all
)]
impl PlayerContext {
    pub fn new() -> Self {
        Self {
            fsm: ::fsmc::runtime::FsmContext::new(PlayerState::Main_Stopped),
        }
    }
    /// Runs the start state's entry actions. Call once, before
    /// the first transition.
    pub fn enter_start_state(
        &mut self,
        ctxt: &mut Player,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        let state = self.fsm.state()?;
        self.on_entry(ctxt, state);
        Ok(())
    }
    pub fn state(&self) -> Result<PlayerState, ::fsmc::runtime::TransitionError> {
        self.fsm.state()
    }
    pub fn fsm(&self) -> &::fsmc::runtime::FsmContext<PlayerState> {
        &self.fsm
    }
    pub fn fsm_mut(&mut self) -> &mut ::fsmc::runtime::FsmContext<PlayerState> {
        &mut self.fsm
    }
    /// State ids from the bottom of the state stack up, then the
    /// current state.
    pub fn snapshot(&self) -> Result<Vec<usize>, ::fsmc::runtime::TransitionError> {
        self.fsm.snapshot()
    }
    pub fn restore(
        &mut self,
        ids: &[usize],
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.fsm.restore(ids)
    }
    pub fn Back(
        &mut self,
        ctxt: &mut Player,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.fsm.set_transition("Back");
        let result = self
            .fsm
            .state()
            .and_then(|state| match state {
                PlayerState::Main_Stopped => self.default_transition(ctxt, state),
                PlayerState::Main_Playing => self.default_transition(ctxt, state),
                PlayerState::Menu_Browsing => self.Menu_Browsing_Back(ctxt, state),
            });
        self.fsm.set_transition("");
        result
    }
    pub fn Menu(
        &mut self,
        ctxt: &mut Player,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.fsm.set_transition("Menu");
        let result = self
            .fsm
            .state()
            .and_then(|state| match state {
                PlayerState::Main_Stopped => self.Main_Default_Menu(ctxt, state),
                PlayerState::Main_Playing => self.Main_Playing_Menu(ctxt, state),
                PlayerState::Menu_Browsing => self.default_transition(ctxt, state),
            });
        self.fsm.set_transition("");
        result
    }
    pub fn Play(
        &mut self,
        ctxt: &mut Player,
        track: u32,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.fsm.set_transition("Play");
        let result = self
            .fsm
            .state()
            .and_then(|state| match state {
                PlayerState::Main_Stopped => self.Main_Stopped_Play(ctxt, state, track),
                PlayerState::Main_Playing => self.Main_Default_Play(ctxt, state, track),
                PlayerState::Menu_Browsing => self.default_transition(ctxt, state),
            });
        self.fsm.set_transition("");
        result
    }
    pub fn Quit(
        &mut self,
        ctxt: &mut Player,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.fsm.set_transition("Quit");
        let result = self
            .fsm
            .state()
            .and_then(|state| match state {
                PlayerState::Main_Stopped => self.default_transition(ctxt, state),
                PlayerState::Main_Playing => self.default_transition(ctxt, state),
                PlayerState::Menu_Browsing => self.Menu_Browsing_Quit(ctxt, state),
            });
        self.fsm.set_transition("");
        result
    }
    pub fn Stop(
        &mut self,
        ctxt: &mut Player,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.fsm.set_transition("Stop");
        let result = self
            .fsm
            .state()
            .and_then(|state| match state {
                PlayerState::Main_Stopped => self.Main_Default_Stop(ctxt, state),
                PlayerState::Main_Playing => self.Main_Playing_Stop(ctxt, state),
                PlayerState::Menu_Browsing => self.default_transition(ctxt, state),
            });
        self.fsm.set_transition("");
        result
    }
    fn Main_Default_Stop(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        {
            if state != PlayerState::Main_Stopped {
                self.on_exit(ctxt, state);
            }
            self.fsm.clear_state();
            let outcome = ::std::panic::catch_unwind(
                ::std::panic::AssertUnwindSafe(|| {
                    self.fsm.empty_state_stack();
                }),
            );
            self.fsm.set_state(PlayerState::Main_Stopped);
            if state != PlayerState::Main_Stopped {
                self.on_entry(ctxt, PlayerState::Main_Stopped);
            }
            if let Err(panic) = outcome {
                ::std::panic::resume_unwind(panic);
            }
        }
        Ok(())
    }
    fn Main_Default_Default(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        {
            self.fsm.clear_state();
            let outcome = ::std::panic::catch_unwind(
                ::std::panic::AssertUnwindSafe(|| {
                    ctxt.ignored();
                }),
            );
            self.fsm.set_state(state);
            if let Err(panic) = outcome {
                ::std::panic::resume_unwind(panic);
            }
        }
        Ok(())
    }
    fn Main_Default_Menu(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.default_transition(ctxt, state)
    }
    fn Main_Default_Play(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
        track: u32,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.default_transition(ctxt, state)
    }
    fn Main_Stopped_Play(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
        track: u32,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        if track > 0 {
            self.on_exit(ctxt, state);
            self.fsm.clear_state();
            let outcome = ::std::panic::catch_unwind(
                ::std::panic::AssertUnwindSafe(|| {
                    ctxt.load(track);
                }),
            );
            self.fsm.set_state(PlayerState::Main_Playing);
            self.on_entry(ctxt, PlayerState::Main_Playing);
            if let Err(panic) = outcome {
                ::std::panic::resume_unwind(panic);
            }
        } else {
            self.fsm.clear_state();
            let outcome = ::std::panic::catch_unwind(
                ::std::panic::AssertUnwindSafe(|| {
                    ctxt.rejected = Some(track);
                }),
            );
            self.fsm.set_state(state);
            if let Err(panic) = outcome {
                ::std::panic::resume_unwind(panic);
            }
        }
        Ok(())
    }
    fn Main_Playing_Stop(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        {
            self.on_exit(ctxt, state);
            self.fsm.set_state(PlayerState::Main_Stopped);
            self.on_entry(ctxt, PlayerState::Main_Stopped);
        }
        Ok(())
    }
    fn Main_Playing_Menu(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        {
            self.fsm.push_state(PlayerState::Menu_Browsing);
            self.on_entry(ctxt, PlayerState::Menu_Browsing);
        }
        Ok(())
    }
    fn Menu_Default_Back(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.default_transition(ctxt, state)
    }
    fn Menu_Default_Quit(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.default_transition(ctxt, state)
    }
    fn Menu_Browsing_Back(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        {
            self.on_exit(ctxt, state);
            self.fsm.clear_state();
            let outcome = ::std::panic::catch_unwind(
                ::std::panic::AssertUnwindSafe(|| {
                    ctxt.hide_menu();
                }),
            );
            self.fsm.set_state(state);
            let popped = self.fsm.pop_state();
            if let Err(panic) = outcome {
                ::std::panic::resume_unwind(panic);
            }
            popped?;
        }
        Ok(())
    }
    fn Menu_Browsing_Quit(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        {
            self.on_exit(ctxt, state);
            self.fsm.pop_state()?;
            self.Stop(ctxt)?;
        }
        Ok(())
    }
    fn on_entry(&mut self, ctxt: &mut Player, state: PlayerState) {
        match state {
            PlayerState::Main_Stopped => {
                ctxt.stopped();
            }
            PlayerState::Menu_Browsing => {
                ctxt.show_menu();
            }
            _ => {}
        }
    }
    fn on_exit(&mut self, ctxt: &mut Player, state: PlayerState) {
        match state {
            PlayerState::Main_Playing => {
                ctxt.pause_output();
            }
            _ => {}
        }
    }
    fn default_transition(
        &mut self,
        ctxt: &mut Player,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        match state {
            PlayerState::Main_Stopped => self.Main_Default_Default(ctxt, state),
            PlayerState::Main_Playing => self.Main_Default_Default(ctxt, state),
            PlayerState::Menu_Browsing => self.unhandled_transition(state),
        }
    }
    fn unhandled_transition(
        &self,
        state: PlayerState,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        Err(::fsmc::runtime::TransitionError::Undefined {
            state: state.name(),
            transition: self.fsm.transition(),
        })
    }
}
impl Default for PlayerContext {
    fn default() -> Self {
        Self::new()
    }
}
#[doc = "A `PlayerContext` usable from several threads."]
#[derive(Debug)]
pub struct PlayerSharedContext {
    inner: ::std::sync::Mutex<PlayerContext>,
}
#[allow(non_snake_case)]
impl PlayerSharedContext {
    pub fn new(context: PlayerContext) -> Self {
        Self {
            inner: ::std::sync::Mutex::new(context),
        }
    }
    /// Locks the context. A panic inside a transition does not
    /// poison it for later callers.
    pub fn lock(&self) -> ::std::sync::MutexGuard<'_, PlayerContext> {
        self.inner.lock().unwrap_or_else(::std::sync::PoisonError::into_inner)
    }
    pub fn into_inner(self) -> PlayerContext {
        self.inner.into_inner().unwrap_or_else(::std::sync::PoisonError::into_inner)
    }
    pub fn Back(&self, ctxt: &mut Player) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.lock().Back(ctxt)
    }
    pub fn Menu(&self, ctxt: &mut Player) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.lock().Menu(ctxt)
    }
    pub fn Play(
        &self,
        ctxt: &mut Player,
        track: u32,
    ) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.lock().Play(ctxt, track)
    }
    pub fn Quit(&self, ctxt: &mut Player) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.lock().Quit(ctxt)
    }
    pub fn Stop(&self, ctxt: &mut Player) -> Result<(), ::fsmc::runtime::TransitionError> {
        self.lock().Stop(ctxt)
    }
}
