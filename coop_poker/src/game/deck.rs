//! The 52-card deck and dealing without replacement.

use rand::Rng;

use super::{
    constants::{BOARD_SIZE, DECK_SIZE, FLOP_SIZE},
    entities::{Card, HIGHEST_VALUE, Hand, LOWEST_VALUE, Suit},
    errors::GameError,
};

/// Every card of a standard deck, suit by suit (♦ ♠ ♥ ♣), aces first.
#[must_use]
pub fn get_full_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for value in (LOWEST_VALUE..=HIGHEST_VALUE).rev() {
            cards.push(Card::new(value, suit));
        }
    }
    cards
}

/// Cards not dealt to anyone. Draws pick uniformly among what's left.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::full()
    }
}

impl Deck {
    #[must_use]
    pub fn full() -> Self {
        Self {
            cards: get_full_deck(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Card, GameError> {
        if self.cards.is_empty() {
            return Err(GameError::DeckExhausted);
        }
        let idx = rng.random_range(0..self.cards.len());
        Ok(self.cards.swap_remove(idx))
    }

    /// Draws `n` cards, or none at all if fewer than `n` remain.
    pub fn draw_many<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<Hand, GameError> {
        if self.cards.len() < n {
            return Err(GameError::DeckExhausted);
        }
        (0..n).map(|_| self.draw(rng)).collect()
    }

    pub fn put_back(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }
}

/// Output of a deal: one hand per player, the future community cards and
/// the undealt remainder.
#[derive(Clone, Debug)]
pub struct Deal {
    pub hands: Vec<Hand>,
    pub flop: [Card; FLOP_SIZE],
    pub turn: Card,
    pub river: Card,
    pub rest: Deck,
}

impl Deal {
    /// Community cards in table slot order.
    #[must_use]
    pub fn board(&self) -> [Card; BOARD_SIZE] {
        [
            self.flop[0],
            self.flop[1],
            self.flop[2],
            self.turn,
            self.river,
        ]
    }
}

/// Deals `cards_per_player` cards to each player in turn, then the flop,
/// turn and river. The rest of the deck stays undealt.
pub fn shuffle_and_distribute<R: Rng + ?Sized>(
    num_players: usize,
    cards_per_player: usize,
    rng: &mut R,
) -> Result<Deal, GameError> {
    let needed = num_players
        .checked_mul(cards_per_player)
        .and_then(|n| n.checked_add(BOARD_SIZE));
    match needed {
        Some(needed) if needed <= DECK_SIZE => {}
        _ => return Err(GameError::DeckExhausted),
    }

    let mut deck = Deck::full();
    let mut hands = Vec::with_capacity(num_players);
    for _ in 0..num_players {
        hands.push(deck.draw_many(cards_per_player, rng)?);
    }
    let flop = [deck.draw(rng)?, deck.draw(rng)?, deck.draw(rng)?];
    let turn = deck.draw(rng)?;
    let river = deck.draw(rng)?;

    Ok(Deal {
        hands,
        flop,
        turn,
        river,
        rest: deck,
    })
}
