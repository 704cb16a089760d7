//! Scoring at the end of the red round.
//!
//! Players win together when the order of their red chips matches the
//! order of their hand strengths, up to ties.

use super::{
    entities::{Card, Chip, Hand, RoundStatus},
    errors::EvalError,
    evaluator::{HandEvaluator, HandValue, evaluate_cards},
    options::TiePolicy,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub status: RoundStatus,
    /// Hand value of every player, by seat.
    pub evaluations: Vec<HandValue>,
    /// Seats sorted by red chip value, strongest claim first.
    pub claimed_order: Vec<usize>,
    /// Seats sorted by hand strength, strongest first.
    pub true_order: Vec<usize>,
    /// First position where the claims went wrong.
    pub first_mismatch: Option<usize>,
}

fn ties(a: &HandValue, b: &HandValue, policy: TiePolicy) -> bool {
    match policy {
        TiePolicy::SameStrength => a.value == b.value,
        TiePolicy::SameCategory => a.value == b.value || a.category() == b.category(),
    }
}

/// Evaluates every hand against the revealed board and checks the
/// claimed order. `red_chips` holds each player's red chip by seat.
pub fn resolve<E: HandEvaluator + ?Sized>(
    evaluator: &E,
    hands: &[Hand],
    board: &[Card],
    red_chips: &[Option<Chip>],
    policy: TiePolicy,
) -> Result<Resolution, EvalError> {
    let evaluations = hands
        .iter()
        .map(|hand| evaluate_cards(evaluator, hand, board))
        .collect::<Result<Vec<_>, _>>()?;

    let mut claimed_order: Vec<usize> = (0..hands.len()).collect();
    claimed_order.sort_by_key(|&seat| {
        std::cmp::Reverse(red_chips.get(seat).copied().flatten().map_or(0, |chip| chip.value))
    });

    let mut true_order: Vec<usize> = (0..hands.len()).collect();
    true_order.sort_by_key(|&seat| std::cmp::Reverse(evaluations[seat].value));

    let first_mismatch = claimed_order
        .iter()
        .zip(&true_order)
        .position(|(&claimed, &actual)| {
            claimed != actual && !ties(&evaluations[claimed], &evaluations[actual], policy)
        });

    let status = if first_mismatch.is_some() {
        RoundStatus::Lose
    } else {
        RoundStatus::Win
    };

    Ok(Resolution {
        status,
        evaluations,
        claimed_order,
        true_order,
        first_mismatch,
    })
}
