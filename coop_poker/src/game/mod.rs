//! Cooperative poker engine: deck, chip pool, phase machine and scoring.
//!
//! - [`deck`]: the 52-card deck and dealing
//! - [`chips`]: the claim chips and the steal rules
//! - [`states`] and [`state_machine`]: phases and round transitions
//! - [`options`]: rule toggles and their effects
//! - [`resolver`] and [`evaluator`]: scoring at the end of the red round
//! - [`session`]: the per-lobby façade

pub mod chips;
pub mod constants;
pub mod deck;
pub mod entities;
pub mod errors;
pub mod evaluator;
pub mod functional;
pub mod options;
pub mod resolver;
pub mod session;
pub mod state_machine;
pub mod states;

pub use errors::{EvalError, GameError, PlayError};
pub use options::{GameOption, GameOptions};
pub use session::{GameSession, GameSettings};
