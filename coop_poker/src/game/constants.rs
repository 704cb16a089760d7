//! Table and deck sizing constants.

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Community card slots: flop (3), turn (1), river (1).
pub const BOARD_SIZE: usize = 5;

pub const FLOP_SIZE: usize = 3;

/// Hole cards dealt to every player unless the settings say otherwise.
pub const CARDS_PER_PLAYER: usize = 2;

/// Fewer players make the ordering puzzle trivial.
pub const MIN_PLAYERS: usize = 3;

/// Largest table a 52-card deck can serve with two hole cards each
/// while keeping the five community cards available.
pub const MAX_PLAYERS: usize = (DECK_SIZE - BOARD_SIZE) / CARDS_PER_PLAYER;

/// Largest player count the deck supports for a given hand size.
#[must_use]
pub const fn max_players_for(cards_per_player: usize) -> usize {
    if cards_per_player == 0 {
        return 0;
    }
    (DECK_SIZE - BOARD_SIZE) / cards_per_player
}
