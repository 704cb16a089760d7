//! # Coop Poker
//!
//! Engine for a cooperative poker game. Every player gets a hidden hand;
//! over four rounds the table claims numbered chips (white, yellow,
//! orange, red) to sort itself by hand strength while the community
//! cards come out. The table wins together when the red chips match the
//! true order of the hands.
//!
//! The engine is synchronous and owns no global state: one
//! [`GameSession`] per lobby, driven through `&mut self` calls.
//!
//! ## Phases
//!
//! - **Waiting**: options can still change
//! - **Dealt**: hands and hidden community cards dealt
//! - **White/Yellow/Orange/Red**: one chip pool per round; emptying the
//!   pool reveals the flop, turn and river in turn
//! - **Resolved**: hands scored and shown
//!
//! ## Example
//!
//! ```
//! use coop_poker::{GameSession, entities::{Chip, ChipColor}};
//!
//! let mut session = GameSession::with_seed(7);
//! session.start(3).unwrap();
//! let me = session.steal_chip(0, Chip::new(3, ChipColor::White)).unwrap();
//! assert_eq!(me.chip, Some(Chip::new(3, ChipColor::White)));
//! assert!(session.get_state().hands.iter().flatten().all(Option::is_none));
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    EvalError, GameError, GameOption, GameOptions, GameSession, GameSettings, PlayError,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
    entities, evaluator, functional,
};
