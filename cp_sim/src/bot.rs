//! Self-play bots.
//!
//! A bot only sees its own hand and the revealed community cards. It
//! estimates how its hand ranks against the holdings still possible for
//! the others and claims the table chip closest to that rank.

use coop_poker::{
    GameSession, PlayError,
    entities::{Card, Chip, ChipColor, RoundStatus},
    evaluator::HandEvaluator,
    functional::{eval, strength},
    game::deck::get_full_deck,
};
use log::debug;
use rand::{Rng, seq::index::sample};
use std::collections::HashSet;

/// Opponent holdings drawn when the hand size is too large to enumerate.
const SAMPLES: usize = 600;

/// Bot failures while driving a session.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Claim rejected: {0}")]
    Play(#[from] PlayError),

    #[error("Nobody could claim a {0} chip")]
    Stalled(ChipColor),

    #[error("Game did not end after {0} turns")]
    TooManyTurns(usize),
}

/// Head-to-head record of one hand against the possible opposing holdings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Standing {
    pub wins: u32,
    pub ties: u32,
    pub total: u32,
}

impl Standing {
    /// Share of holdings beaten, ties counting half.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.5;
        }
        (f64::from(self.wins) + 0.5 * f64::from(self.ties)) / f64::from(self.total)
    }

    /// Chip value matching the standing at a table of `num_players`.
    #[must_use]
    pub fn target(&self, num_players: usize) -> u8 {
        let top = num_players.saturating_sub(1) as f64;
        let target = 1 + (self.fraction() * top).round() as usize;
        u8::try_from(target.clamp(1, num_players.max(1))).unwrap_or(u8::MAX)
    }

    fn record(&mut self, mine: u32, theirs: u32) {
        self.total += 1;
        match mine.cmp(&theirs) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Equal => self.ties += 1,
            std::cmp::Ordering::Less => {}
        }
    }
}

/// Compares `hand` with every holding the unseen cards allow. Two-card
/// holdings are enumerated; larger ones are sampled.
pub fn estimate_standing<R: Rng + ?Sized>(
    hand: &[Card],
    board: &[Card],
    cards_per_player: usize,
    rng: &mut R,
) -> Standing {
    let known: HashSet<Card> = hand.iter().chain(board).copied().collect();
    let unseen: Vec<Card> = get_full_deck()
        .into_iter()
        .filter(|card| !known.contains(card))
        .collect();

    let mut standing = Standing::default();
    if cards_per_player == 0 || unseen.len() < cards_per_player {
        return standing;
    }

    let mine = score(hand, board);
    if cards_per_player == 2 {
        for (i, first) in unseen.iter().enumerate() {
            for second in &unseen[i + 1..] {
                standing.record(mine, score(&[*first, *second], board));
            }
        }
    } else {
        for _ in 0..SAMPLES {
            let holding: Vec<Card> = sample(rng, unseen.len(), cards_per_player)
                .iter()
                .map(|idx| unseen[idx])
                .collect();
            standing.record(mine, score(&holding, board));
        }
    }
    standing
}

fn score(hand: &[Card], board: &[Card]) -> u32 {
    let cards: Vec<Card> = hand.iter().chain(board).copied().collect();
    strength(&eval(&cards))
}

/// Table chip closest to `target`, the lower one on a tie.
#[must_use]
pub fn choose_chip(table_chips: &[Chip], target: u8) -> Option<Chip> {
    table_chips
        .iter()
        .copied()
        .min_by_key(|chip| (chip.value.abs_diff(target), chip.value))
}

/// What `seat` claims this turn, `None` once it holds a chip of the round.
pub fn decide<E: HandEvaluator, R: Rng + ?Sized>(
    session: &GameSession<E>,
    seat: usize,
    rng: &mut R,
) -> Result<Option<Chip>, BotError> {
    let state = session.get_state();
    let Some(color) = state.round else {
        return Ok(None);
    };
    let holds = state
        .chips
        .get(seat)
        .ok_or(PlayError::InvalidPlayer(seat))?
        .iter()
        .any(|chip| chip.color == color);
    if holds {
        return Ok(None);
    }

    let me = session.player_state(seat)?;
    let board: Vec<Card> = state.table.iter().flatten().copied().collect();
    let standing = estimate_standing(
        &me.hand,
        &board,
        session.settings().cards_per_player,
        rng,
    );
    let target = standing.target(session.num_players());
    let chip = choose_chip(&state.table_chips, target);
    debug!(
        "seat {seat}: standing {:.3} in {color}, aiming for {target}, taking {chip:?}",
        standing.fraction()
    );
    Ok(chip)
}

/// Plays a started session to the end, seats acting in order.
pub fn play_game<E: HandEvaluator, R: Rng + ?Sized>(
    session: &mut GameSession<E>,
    rng: &mut R,
) -> Result<RoundStatus, BotError> {
    let max_turns = session.num_players() * ChipColor::ALL.len() * 2;
    for _ in 0..max_turns {
        let Some(color) = session.get_state().round else {
            return Ok(session.status());
        };
        let mut claimed = false;
        for seat in 0..session.num_players() {
            if session.get_state().round != Some(color) {
                break;
            }
            if let Some(chip) = decide(session, seat, rng)? {
                session.steal_chip(seat, chip)?;
                claimed = true;
            }
        }
        if !claimed {
            return Err(BotError::Stalled(color));
        }
    }
    if session.is_ended() {
        Ok(session.status())
    } else {
        Err(BotError::TooManyTurns(max_turns))
    }
}
