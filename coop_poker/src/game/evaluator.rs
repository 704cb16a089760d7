//! Boundary to the hand evaluator used at resolution.
//!
//! The engine only ever talks to evaluators through card codes such as
//! `"Ah"`, `"Td"` or `"2c"`, so any poker library that speaks them can be
//! plugged in behind [`HandEvaluator`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{
    entities::{Card, Rank},
    errors::EvalError,
    functional::{eval, strength},
};

/// Comparable strength of a hand plus its category name.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandValue {
    /// Larger is stronger. Only meaningful against values from the same
    /// evaluator.
    pub value: u32,
    pub hand_name: String,
}

/// Name given to an ace-high straight flush.
pub const ROYAL_FLUSH: &str = "Royal Flush";

impl HandValue {
    /// The hand category, with a royal flush counted as a straight flush.
    #[must_use]
    pub fn category(&self) -> &str {
        if self.hand_name == ROYAL_FLUSH {
            "Straight Flush"
        } else {
            &self.hand_name
        }
    }
}

pub trait HandEvaluator {
    fn evaluate(&self, codes: &[String]) -> Result<HandValue, EvalError>;
}

/// Evaluator backed by [`functional::eval`](super::functional::eval).
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    fn evaluate(&self, codes: &[String]) -> Result<HandValue, EvalError> {
        if codes.is_empty() {
            return Err(EvalError::NoCards);
        }
        let mut seen = HashSet::with_capacity(codes.len());
        let mut cards = Vec::with_capacity(codes.len());
        for code in codes {
            let card: Card = code.parse()?;
            if !seen.insert(card) {
                return Err(EvalError::DuplicateCard(code.clone()));
            }
            cards.push(card);
        }

        let hand = eval(&cards);
        let hand_name = match hand.first() {
            Some(sub) if sub.rank == Rank::StraightFlush && sub.values == [14] => {
                ROYAL_FLUSH.to_string()
            }
            Some(sub) => sub.rank.to_string(),
            None => return Err(EvalError::NoCards),
        };
        Ok(HandValue {
            value: strength(&hand),
            hand_name,
        })
    }
}

#[must_use]
pub fn poker_codes<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Vec<String> {
    cards.into_iter().map(Card::poker_code).collect()
}

/// Evaluates hole cards together with the revealed community cards.
pub fn evaluate_cards<E: HandEvaluator + ?Sized>(
    evaluator: &E,
    hand: &[Card],
    board: &[Card],
) -> Result<HandValue, EvalError> {
    evaluator.evaluate(&poker_codes(hand.iter().chain(board)))
}
