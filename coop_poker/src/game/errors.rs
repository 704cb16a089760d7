//! Error types for the game engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a player can get back from claiming a chip.
///
/// These are expected outcomes of user input and are meant to be sent
/// back to the client as-is. Losing a round is not an error.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum PlayError {
    #[error("Not the chip from this round")]
    WrongRound,
    #[error("You already have a chip for this round")]
    HoldingChip,
    #[error("Reversed chips can't be given back or taken from another player")]
    ReversedChip,
    /// The chip isn't on the table or in anyone's hands. The client and
    /// the session disagree about the game state.
    #[error("Something went wrong")]
    SomethingWrong,
    #[error("invalid player index {0}")]
    InvalidPlayer(usize),
}

/// Errors from setting up or starting a session.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("need at least {min} players, got {got}")]
    NotEnoughPlayers { min: usize, got: usize },
    #[error("at most {max} players fit the deck, got {got}")]
    TooManyPlayers { max: usize, got: usize },
    #[error("game already started")]
    AlreadyStarted,
    #[error("deck exhausted while dealing")]
    DeckExhausted,
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Errors from the hand evaluator boundary.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EvalError {
    #[error("invalid card code {0:?}")]
    InvalidCode(String),
    #[error("card {0} appears more than once")]
    DuplicateCard(String),
    #[error("no cards to evaluate")]
    NoCards,
}

/// A card code that doesn't name a card.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("can't parse card from {0:?}")]
pub struct ParseCardError(pub String);

impl From<ParseCardError> for EvalError {
    fn from(value: ParseCardError) -> Self {
        Self::InvalidCode(value.0)
    }
}
