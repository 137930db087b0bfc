//! # fsmc
//!
//! A compiler from declarative finite state machine descriptions to
//! runnable state machine code.
//!
//! A front end builds the machine as an [`Fsm`] tree. [`generate`] validates
//! it and emits it for a [`Target`]; generated Rust code runs on top of
//! [`runtime`].
//!
//! ## Example
//!
//! ```rust
//! use fsmc::{EndState, Fsm, GeneratorOptions, Guard, Map, State, Target, Transfer, Transition};
//!
//! let open = Transition::new("Open", 4)
//!     .with_guard(Guard::new("", Transfer::Set(EndState::parse("Opened")), 4))?;
//! let close = Transition::new("Close", 7)
//!     .with_guard(Guard::new("", Transfer::Set(EndState::parse("Closed")), 7))?;
//!
//! let map = Map::new("Main", 2)
//!     .with_state(State::new("Closed", 3).with_transition(open)?)?
//!     .with_state(State::new("Opened", 6).with_transition(close)?)?;
//! let mut fsm = Fsm::new("Door").with_map(map)?;
//! fsm.set_start_state("Main::Closed", 1);
//!
//! let code = fsmc::generate(&fsm, Target::Rust, &GeneratorOptions::default())?;
//! assert!(code.contains("pub struct DoorContext"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[doc(inline)]
pub use fsmc_codegen::*;
#[doc(inline)]
pub use fsmc_runtime as runtime;
