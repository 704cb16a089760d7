//! Round state machine.
//!
//! [`GameData`] owns everything that changes during a round: hands, the
//! hidden community cards, the revealed table, the chip pool and the
//! undealt remainder. The current [`Phase`] decides which chips can be
//! claimed and how many community cards are face up.

use log::{debug, info};
use rand::Rng;

use super::{
    chips::ChipPool,
    constants::BOARD_SIZE,
    deck::{Deck, shuffle_and_distribute},
    entities::{Card, ChipColor, Hand, Table},
    errors::GameError,
    options::{GameOption, GameOptions},
    states::{Dealt, Phase, PhaseRules, Resolved},
};

/// Outcome of closing a round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Advance {
    /// A new pool of this color is on the table.
    Opened(ChipColor),
    /// The red round closed; the hands must be scored.
    Resolve,
}

#[derive(Clone, Debug, Default)]
pub struct GameData {
    pub(crate) phase: Phase,
    pub(crate) hands: Vec<Hand>,
    pub(crate) pool: ChipPool,
    /// Community cards as they become visible.
    pub(crate) table: Table,
    /// Community cards dealt face down at start.
    pub(crate) board: Table,
    /// Undealt remainder, the source of forced re-deals.
    pub(crate) deck: Deck,
    pub(crate) show_hands: bool,
}

impl GameData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.hands.len()
    }

    #[must_use]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    #[must_use]
    pub fn pool(&self) -> &ChipPool {
        &self.pool
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn show_hands(&self) -> bool {
        self.show_hands
    }

    /// Face-up community cards in slot order.
    #[must_use]
    pub fn revealed(&self) -> Vec<Card> {
        self.table.iter().flatten().copied().collect()
    }

    /// Every card currently tracked: hands, community slots and the deck.
    #[must_use]
    pub fn all_cards(&self) -> Vec<Card> {
        self.hands
            .iter()
            .flatten()
            .chain(self.board.iter().flatten())
            .chain(self.deck.cards())
            .copied()
            .collect()
    }

    /// Deals hands and the face-down community cards.
    pub fn deal<R: Rng + ?Sized>(
        &mut self,
        num_players: usize,
        cards_per_player: usize,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let deal = shuffle_and_distribute(num_players, cards_per_player, rng)?;
        self.board = deal.board().map(Some);
        self.hands = deal.hands;
        self.deck = deal.rest;
        self.table = [None; BOARD_SIZE];
        self.pool = ChipPool::new(num_players);
        self.phase = Dealt.into();
        debug!("dealt {cards_per_player} cards to {num_players} players");
        Ok(())
    }

    /// Enters the claiming phase of `color` with a fresh pool.
    pub fn open(&mut self, color: ChipColor, options: &GameOptions) {
        self.phase = Phase::of_color(color);
        self.pool.reset(color, options.reset_rules(color));
        info!("{color} round open");
    }

    /// Turns community cards face up up to what the current phase shows
    /// and returns the newly visible ones.
    fn reveal(&mut self) -> Vec<Card> {
        let upto = self.phase.revealed();
        let mut shown = Vec::with_capacity(BOARD_SIZE);
        for slot in 0..upto {
            if self.table[slot].is_none() {
                self.table[slot] = self.board[slot];
                shown.extend(self.board[slot]);
            }
        }
        shown
    }

    /// Replaces a player's hand with fresh cards from the remainder and
    /// returns the old cards to it. When the remainder is shorter than a
    /// hand, the missing cards are drawn after the old ones went back.
    pub fn redeal<R: Rng + ?Sized>(&mut self, player: usize, rng: &mut R) -> Result<(), GameError> {
        let size = self
            .hands
            .get(player)
            .map(Vec::len)
            .ok_or_else(|| GameError::InvalidSettings(format!("no player {player}")))?;
        let mut fresh = self.deck.draw_many(size.min(self.deck.len()), rng)?;
        let short = size - fresh.len();
        let old = std::mem::take(&mut self.hands[player]);
        self.deck.put_back(old);
        fresh.extend(self.deck.draw_many(short, rng)?);
        self.hands[player] = fresh;
        Ok(())
    }

    fn apply_switches<R: Rng + ?Sized>(
        &mut self,
        shown: &[Card],
        closing: ChipColor,
        options: &GameOptions,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let has_figure = shown.iter().any(Card::is_figure);
        let target = if has_figure && options.is_active(GameOption::SwitchOnFigure) {
            self.pool.holder_of_extreme(closing, true)
        } else if !has_figure && options.is_active(GameOption::SwitchOnNoFigure) {
            self.pool.holder_of_extreme(closing, false)
        } else {
            None
        };
        if let Some(player) = target {
            self.redeal(player, rng)?;
            info!("player {player} gets a new hand");
        }
        Ok(())
    }

    /// Closes the exhausted round: reveals the next community cards,
    /// applies forced re-deals and opens the next pool that isn't skipped.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        options: &GameOptions,
        rng: &mut R,
    ) -> Result<Advance, GameError> {
        // Re-deals look at the last round actually played.
        let closing = match self.phase.chip_color() {
            Some(ChipColor::Red) | None => return Ok(Advance::Resolve),
            Some(color) => color,
        };
        loop {
            let Some(next) = self.phase.next_phase() else {
                return Ok(Advance::Resolve);
            };
            self.phase = next;
            let shown = self.reveal();
            if !shown.is_empty() {
                info!(
                    "revealed {}",
                    shown.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
                );
                self.apply_switches(&shown, closing, options, rng)?;
            }

            let Some(color) = self.phase.chip_color() else {
                return Ok(Advance::Resolve);
            };
            if options.skips(color) {
                debug!("skipping {color} round");
                continue;
            }
            self.open(color, options);
            return Ok(Advance::Opened(color));
        }
    }

    /// Enters the terminal phase and shows every hand.
    pub fn finish(&mut self) {
        self.phase = Resolved.into();
        self.show_hands = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::{DECK_SIZE, max_players_for};
    use crate::game::deck::get_full_deck;
    use crate::game::entities::Chip;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    fn started(n: usize, options: &GameOptions, rng: &mut StdRng) -> GameData {
        let mut data = GameData::new();
        data.deal(n, 2, rng).unwrap();
        data.open(ChipColor::White, options);
        data
    }

    fn cards(codes: &str) -> Vec<Card> {
        codes
            .split_whitespace()
            .map(|code| code.parse().unwrap())
            .collect()
    }

    /// A white round over a known board. Hands take two cards each from
    /// the rest of the deck.
    fn with_board(n: usize, board: &str, options: &GameOptions) -> GameData {
        let board = cards(board);
        let mut rest: Vec<Card> = get_full_deck()
            .into_iter()
            .filter(|card| !board.contains(card))
            .collect();
        let hands = (0..n).map(|_| rest.drain(..2).collect()).collect();
        let mut deck = Deck::empty();
        deck.put_back(rest);
        let mut slots = [None; BOARD_SIZE];
        for (slot, card) in slots.iter_mut().zip(board) {
            *slot = Some(card);
        }

        let mut data = GameData {
            phase: Dealt.into(),
            hands,
            pool: ChipPool::new(n),
            table: [None; BOARD_SIZE],
            board: slots,
            deck,
            show_hands: false,
        };
        data.open(ChipColor::White, options);
        data
    }

    /// Player `i` takes chip `values[i]`.
    fn claim(data: &mut GameData, color: ChipColor, values: &[u8]) {
        for (player, &value) in values.iter().enumerate() {
            data.pool
                .steal(player, Chip::new(value, color), false)
                .unwrap();
        }
    }

    fn redealt(before: &[Hand], data: &GameData) -> Vec<usize> {
        before
            .iter()
            .zip(&data.hands)
            .enumerate()
            .filter(|(_, (old, new))| old != new)
            .map(|(player, _)| player)
            .collect()
    }

    fn claim_all(data: &mut GameData, color: ChipColor) {
        for player in 0..data.num_players() {
            let value = u8::try_from(player + 1).unwrap();
            data.pool
                .steal(player, Chip::new(value, color), false)
                .unwrap();
        }
    }

    fn assert_all_cards_accounted(data: &GameData) {
        let cards = data.all_cards();
        assert_eq!(cards.len(), DECK_SIZE);
        assert_eq!(cards.iter().collect::<HashSet<_>>().len(), DECK_SIZE);
    }

    #[test]
    fn test_full_sequence_reveals_cards() {
        let mut rng = StdRng::seed_from_u64(11);
        let options = GameOptions::new();
        let mut data = started(3, &options, &mut rng);
        assert_eq!(data.revealed().len(), 0);

        for (color, next, shown) in [
            (ChipColor::White, ChipColor::Yellow, 3),
            (ChipColor::Yellow, ChipColor::Orange, 4),
            (ChipColor::Orange, ChipColor::Red, 5),
        ] {
            claim_all(&mut data, color);
            assert_eq!(data.advance(&options, &mut rng).unwrap(), Advance::Opened(next));
            assert_eq!(data.revealed().len(), shown);
            assert_eq!(data.pool.active_color(), Some(next));
        }

        claim_all(&mut data, ChipColor::Red);
        assert_eq!(data.advance(&options, &mut rng).unwrap(), Advance::Resolve);
        assert!(!data.show_hands());
        data.finish();
        assert!(data.show_hands());
        assert_eq!(data.phase().to_string(), "resolved");
    }

    #[test]
    fn test_skipped_rounds_reveal_in_one_step() {
        let mut rng = StdRng::seed_from_u64(5);
        let options: GameOptions = [GameOption::SkipYellow, GameOption::SkipOrange]
            .into_iter()
            .collect();
        let mut data = started(4, &options, &mut rng);
        claim_all(&mut data, ChipColor::White);
        assert_eq!(
            data.advance(&options, &mut rng).unwrap(),
            Advance::Opened(ChipColor::Red)
        );
        assert_eq!(data.revealed().len(), 5);
    }

    #[test]
    fn test_forced_redeal_keeps_every_card() {
        let mut rng = StdRng::seed_from_u64(21);
        let options: GameOptions = [GameOption::SwitchOnFigure, GameOption::SwitchOnNoFigure]
            .into_iter()
            .collect();
        let mut data = started(5, &options, &mut rng);
        let before = data.hands.clone();

        claim_all(&mut data, ChipColor::White);
        data.advance(&options, &mut rng).unwrap();

        // One of the two rules always applies to the flop.
        let changed = before
            .iter()
            .zip(&data.hands)
            .filter(|(old, new)| old != new)
            .count();
        assert_eq!(changed, 1);
        assert_all_cards_accounted(&data);
    }

    // === Forced Re-deal Tests ===

    #[test]
    fn test_figure_on_flop_redeals_highest_holder() {
        let mut rng = StdRng::seed_from_u64(2);
        let options: GameOptions = [GameOption::SwitchOnFigure].into_iter().collect();
        let mut data = with_board(3, "Kd 2c 3h 4s 6d", &options);
        claim(&mut data, ChipColor::White, &[1, 3, 2]);
        let before = data.hands.clone();
        data.advance(&options, &mut rng).unwrap();
        assert_eq!(redealt(&before, &data), vec![1]);
        assert_all_cards_accounted(&data);
    }

    #[test]
    fn test_no_figure_on_flop_redeals_lowest_holder() {
        let mut rng = StdRng::seed_from_u64(2);
        let options: GameOptions = [GameOption::SwitchOnNoFigure].into_iter().collect();
        let mut data = with_board(3, "2c 3h 4s Kd 6d", &options);
        claim(&mut data, ChipColor::White, &[2, 3, 1]);
        let before = data.hands.clone();
        data.advance(&options, &mut rng).unwrap();
        assert_eq!(redealt(&before, &data), vec![2]);
        assert_all_cards_accounted(&data);
    }

    #[test]
    fn test_switch_rule_needs_its_condition() {
        let mut rng = StdRng::seed_from_u64(2);
        let figure: GameOptions = [GameOption::SwitchOnFigure].into_iter().collect();
        let mut data = with_board(3, "2c 3h 4s Kd 6d", &figure);
        claim(&mut data, ChipColor::White, &[1, 2, 3]);
        let before = data.hands.clone();
        data.advance(&figure, &mut rng).unwrap();
        assert!(redealt(&before, &data).is_empty());

        let no_figure: GameOptions = [GameOption::SwitchOnNoFigure].into_iter().collect();
        let mut data = with_board(3, "Qc 3h 4s 5d 6d", &no_figure);
        claim(&mut data, ChipColor::White, &[1, 2, 3]);
        let before = data.hands.clone();
        data.advance(&no_figure, &mut rng).unwrap();
        assert!(redealt(&before, &data).is_empty());
    }

    #[test]
    fn test_figure_on_turn_redeals_highest_yellow_holder() {
        let mut rng = StdRng::seed_from_u64(4);
        let options: GameOptions = [GameOption::SwitchOnFigure].into_iter().collect();
        let mut data = with_board(3, "2c 3h 4s Qd 6d", &options);
        claim(&mut data, ChipColor::White, &[1, 2, 3]);
        let before = data.hands.clone();
        data.advance(&options, &mut rng).unwrap();
        assert!(redealt(&before, &data).is_empty());

        // Player 2 held the highest white chip; the yellow one decides.
        claim(&mut data, ChipColor::Yellow, &[3, 1, 2]);
        let before = data.hands.clone();
        assert_eq!(
            data.advance(&options, &mut rng).unwrap(),
            Advance::Opened(ChipColor::Orange)
        );
        assert_eq!(redealt(&before, &data), vec![0]);
        assert_all_cards_accounted(&data);
    }

    #[test]
    fn test_figure_on_river_redeals_highest_orange_holder() {
        let mut rng = StdRng::seed_from_u64(4);
        let options: GameOptions = [GameOption::SwitchOnFigure].into_iter().collect();
        let mut data = with_board(3, "2c 3h 4s 5d Jc", &options);
        for color in [ChipColor::White, ChipColor::Yellow] {
            claim(&mut data, color, &[1, 2, 3]);
            let before = data.hands.clone();
            data.advance(&options, &mut rng).unwrap();
            assert!(redealt(&before, &data).is_empty());
        }

        claim(&mut data, ChipColor::Orange, &[2, 3, 1]);
        let before = data.hands.clone();
        assert_eq!(
            data.advance(&options, &mut rng).unwrap(),
            Advance::Opened(ChipColor::Red)
        );
        assert_eq!(redealt(&before, &data), vec![1]);
        assert_all_cards_accounted(&data);
    }

    #[test]
    fn test_skipped_round_redeals_from_last_played_round() {
        let mut rng = StdRng::seed_from_u64(6);
        let options: GameOptions = [
            GameOption::SkipYellow,
            GameOption::SwitchOnFigure,
            GameOption::SwitchOnNoFigure,
        ]
        .into_iter()
        .collect();
        let mut data = with_board(3, "Kd 2c 3h 4s 6d", &options);
        claim(&mut data, ChipColor::White, &[1, 2, 3]);
        let before = data.hands.clone();

        // The flop has a king, the turn doesn't: both white extremes switch.
        assert_eq!(
            data.advance(&options, &mut rng).unwrap(),
            Advance::Opened(ChipColor::Orange)
        );
        assert_eq!(data.revealed().len(), 4);
        assert_eq!(redealt(&before, &data), vec![0, 2]);
        assert_all_cards_accounted(&data);
    }

    #[test]
    fn test_redeal_at_full_table() {
        for cards_per_player in [2, 3] {
            let n = max_players_for(cards_per_player);
            let mut rng = StdRng::seed_from_u64(13);
            let options: GameOptions = [GameOption::SwitchOnFigure, GameOption::SwitchOnNoFigure]
                .into_iter()
                .collect();
            let mut data = GameData::new();
            data.deal(n, cards_per_player, &mut rng).unwrap();
            data.open(ChipColor::White, &options);
            assert!(data.deck.len() < cards_per_player);

            for (color, next) in [
                (ChipColor::White, Advance::Opened(ChipColor::Yellow)),
                (ChipColor::Yellow, Advance::Opened(ChipColor::Orange)),
                (ChipColor::Orange, Advance::Opened(ChipColor::Red)),
                (ChipColor::Red, Advance::Resolve),
            ] {
                claim_all(&mut data, color);
                let before = data.hands.clone();
                assert_eq!(data.advance(&options, &mut rng).unwrap(), next);
                if next != Advance::Resolve {
                    assert_eq!(redealt(&before, &data).len(), 1);
                }
                assert!(data.hands.iter().all(|hand| hand.len() == cards_per_player));
                assert_all_cards_accounted(&data);
            }
        }
    }

    #[test]
    fn test_redeal_draws_from_remainder() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut data = started(3, &GameOptions::new(), &mut rng);
        let remaining = data.deck.len();
        data.redeal(1, &mut rng).unwrap();
        assert_eq!(data.deck.len(), remaining);
        assert_all_cards_accounted(&data);
        assert!(data.redeal(9, &mut rng).is_err());
    }

    #[test]
    fn test_redeal_with_short_remainder() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut data = started(23, &GameOptions::new(), &mut rng);
        assert_eq!(data.deck.len(), 1);
        let leftover = data.deck.cards()[0];
        let old = data.hands[4].clone();

        data.redeal(4, &mut rng).unwrap();
        assert_eq!(data.hands[4].len(), 2);
        assert!(data.hands[4].contains(&leftover));
        assert_ne!(data.hands[4], old);
        assert_eq!(data.deck.len(), 1);
        assert_all_cards_accounted(&data);
    }
}
