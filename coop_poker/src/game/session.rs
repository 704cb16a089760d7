//! Per-lobby game session.
//!
//! A [`GameSession`] owns one round of the game from dealing to scoring.
//! The lobby calls [`GameSession::start`] once, forwards every chip claim
//! to [`GameSession::steal_chip`] and broadcasts [`GameSession::get_state`]
//! after each call. All randomness comes from the session's own RNG.

use log::{debug, error, info, warn};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    constants::{CARDS_PER_PLAYER, MAX_PLAYERS, MIN_PLAYERS, max_players_for},
    entities::{
        Card, Chip, ChipColor, GameResults, GameState, LOSSES, PlayerResult, PlayerState,
        RoundStatus, Score, WINS,
    },
    errors::{EvalError, GameError, PlayError},
    evaluator::{HandEvaluator, StandardEvaluator, evaluate_cards},
    options::{GameOption, GameOptions},
    resolver::{Resolution, resolve},
    state_machine::{Advance, GameData},
    states::{Phase, PhaseRules},
};

/// Table setup shared by every session of a lobby.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub cards_per_player: usize,
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            cards_per_player: CARDS_PER_PLAYER,
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.cards_per_player == 0 {
            return Err(GameError::InvalidSettings(
                "cards_per_player must be at least 1".to_string(),
            ));
        }
        if self.min_players < 2 {
            return Err(GameError::InvalidSettings(
                "min_players must be at least 2".to_string(),
            ));
        }
        if self.min_players > self.max_players {
            return Err(GameError::InvalidSettings(format!(
                "min_players ({}) exceeds max_players ({})",
                self.min_players, self.max_players
            )));
        }
        let limit = max_players_for(self.cards_per_player).min(usize::from(u8::MAX));
        if self.max_players > limit {
            return Err(GameError::InvalidSettings(format!(
                "{} players with {} cards each don't fit the deck (limit {limit})",
                self.max_players, self.cards_per_player
            )));
        }
        Ok(())
    }

    pub fn check_players(&self, num_players: usize) -> Result<(), GameError> {
        if num_players < self.min_players {
            return Err(GameError::NotEnoughPlayers {
                min: self.min_players,
                got: num_players,
            });
        }
        if num_players > self.max_players {
            return Err(GameError::TooManyPlayers {
                max: self.max_players,
                got: num_players,
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct GameSession<E: HandEvaluator = StandardEvaluator> {
    settings: GameSettings,
    options: GameOptions,
    data: GameData,
    status: RoundStatus,
    score: Score,
    results: Vec<PlayerResult>,
    resolution: Option<Resolution>,
    evaluator: E,
    rng: StdRng,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::build(
            GameSettings::default(),
            StandardEvaluator,
            StdRng::from_rng(&mut rand::rng()),
        )
    }

    /// A session whose deals and random options are reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::build(
            GameSettings::default(),
            StandardEvaluator,
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn from_settings(settings: GameSettings) -> Result<Self, GameError> {
        Self::with_evaluator(settings, StandardEvaluator)
    }
}

impl<E: HandEvaluator> GameSession<E> {
    fn build(settings: GameSettings, evaluator: E, rng: StdRng) -> Self {
        Self {
            settings,
            options: GameOptions::new(),
            data: GameData::new(),
            status: RoundStatus::InProgress,
            score: [0, 0],
            results: Vec::new(),
            resolution: None,
            evaluator,
            rng,
        }
    }

    pub fn with_evaluator(settings: GameSettings, evaluator: E) -> Result<Self, GameError> {
        settings.validate()?;
        Ok(Self::build(
            settings,
            evaluator,
            StdRng::from_rng(&mut rand::rng()),
        ))
    }

    /// Replaces the RNG with a seeded one.
    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[must_use]
    pub fn data(&self) -> &GameData {
        &self.data
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.data.phase()
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.data.num_players()
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.data.phase().next_phase().is_none()
    }

    /// Details of the last scoring, once the game ended.
    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    fn ensure_waiting(&self) -> Result<(), GameError> {
        if self.data.phase() == Phase::default() {
            Ok(())
        } else {
            Err(GameError::AlreadyStarted)
        }
    }

    /// Replaces the configured options. Only before [`start`](Self::start).
    pub fn set_options(
        &mut self,
        options: impl IntoIterator<Item = GameOption>,
    ) -> Result<(), GameError> {
        self.ensure_waiting()?;
        self.options = options.into_iter().collect();
        Ok(())
    }

    pub fn toggle_option(&mut self, option: GameOption, enabled: bool) -> Result<(), GameError> {
        self.ensure_waiting()?;
        self.options.set(option, enabled);
        Ok(())
    }

    /// Deals the cards, draws the random options and opens the white
    /// round.
    pub fn start(&mut self, num_players: usize) -> Result<(), GameError> {
        self.ensure_waiting()?;
        self.settings.check_players(num_players)?;

        let mut data = GameData::new();
        data.deal(num_players, self.settings.cards_per_player, &mut self.rng)?;
        for option in self.options.draw_random(&mut self.rng) {
            info!("random option drawn: {option}");
        }
        data.open(ChipColor::White, &self.options);
        self.data = data;
        self.status = RoundStatus::InProgress;
        info!("game started with {num_players} players");
        Ok(())
    }

    /// Claims `chip` for `player`, then plays out every transition the
    /// claim triggers. A failed call changes nothing.
    pub fn steal_chip(&mut self, player: usize, chip: Chip) -> Result<PlayerState, PlayError> {
        let snapshot = self.data.clone();
        let no_switching = self.options.is_active(GameOption::NoSwitching);
        let claim = self
            .data
            .pool
            .steal(player, chip, no_switching)
            .inspect_err(|err| {
                if *err == PlayError::SomethingWrong {
                    warn!("player {player} asked for {chip}, which nobody has");
                }
            })?;
        debug!("player {player} claimed {chip}: {claim:?}");

        if claim.exhausted() {
            let outcome = match self.data.advance(&self.options, &mut self.rng) {
                Ok(Advance::Opened(_)) => Ok(()),
                Ok(Advance::Resolve) => self.resolve_round().map_err(|err| {
                    error!("hand evaluation failed: {err}");
                }),
                Err(err) => {
                    error!("round transition failed: {err}");
                    Err(())
                }
            };
            if outcome.is_err() {
                self.data = snapshot;
                return Err(PlayError::SomethingWrong);
            }
        }

        self.player_state(player)
    }

    fn resolve_round(&mut self) -> Result<(), EvalError> {
        let n = self.data.num_players();
        let board = self.data.revealed();
        let red: Vec<Option<Chip>> = (0..n)
            .map(|player| self.data.pool.chip_of(player, ChipColor::Red))
            .collect();
        let resolution = resolve(
            &self.evaluator,
            &self.data.hands,
            &board,
            &red,
            self.options.tie_policy(),
        )?;

        match resolution.status {
            RoundStatus::Win => self.score[WINS] += 1,
            RoundStatus::Lose | RoundStatus::InProgress => self.score[LOSSES] += 1,
        }
        self.results = (0..n)
            .map(|index| PlayerResult {
                index,
                hand: self.data.hands[index].clone(),
                chip: red[index],
                rank: Some(resolution.evaluations[index].hand_name.clone()),
            })
            .collect();
        self.status = resolution.status;
        info!(
            "round {}: claimed {:?}, actual {:?}, score {:?}",
            resolution.status, resolution.claimed_order, resolution.true_order, self.score
        );
        self.resolution = Some(resolution);
        self.data.finish();
        self.options.clear_drawn();
        Ok(())
    }

    /// The private view of one player: their hand and latest chip.
    pub fn player_state(&self, player: usize) -> Result<PlayerState, PlayError> {
        let hand = self
            .data
            .hands
            .get(player)
            .ok_or(PlayError::InvalidPlayer(player))?;
        Ok(PlayerState {
            index: player,
            hand: hand.clone(),
            chip: self.data.pool.latest(player),
        })
    }

    fn hand_names(&self, board: &[Card]) -> Vec<Option<String>> {
        self.data
            .hands
            .iter()
            .map(|hand| {
                evaluate_cards(&self.evaluator, hand, board)
                    .ok()
                    .map(|value| value.hand_name)
            })
            .collect()
    }

    /// Snapshot safe to broadcast to every player.
    #[must_use]
    pub fn get_state(&self) -> GameState {
        let show_hands = self.data.show_hands();
        let hands: Vec<Vec<Option<Card>>> = self
            .data
            .hands
            .iter()
            .map(|hand| {
                hand.iter()
                    .map(|card| show_hands.then_some(*card))
                    .collect()
            })
            .collect();

        let figure_counts = self.options.is_active(GameOption::ShowFigureCount).then(|| {
            self.data
                .hands
                .iter()
                .map(|hand| hand.iter().filter(|card| card.is_figure()).count())
                .collect::<Vec<_>>()
        });
        let hand_values = self
            .options
            .is_active(GameOption::ShowHandValue)
            .then(|| self.hand_names(&self.data.revealed()));

        GameState {
            table_chips: self.data.pool.table().to_vec(),
            table: *self.data.table(),
            hands,
            chips: self.data.pool.held().to_vec(),
            round: self.data.phase().chip_color(),
            show_hands,
            options: self.options.active(),
            figure_counts,
            hand_values,
        }
    }

    #[must_use]
    pub fn get_results(&self) -> GameResults {
        GameResults {
            score: self.score,
            round: self.status,
            table: *self.data.table(),
            players: self.results.clone(),
        }
    }
}

impl<E: HandEvaluator + Clone> GameSession<E> {
    /// A fresh session for the same lobby, keeping the score and the
    /// configured options.
    #[must_use]
    pub fn rematch(&mut self) -> Self {
        let mut next = Self::build(
            self.settings.clone(),
            self.evaluator.clone(),
            StdRng::from_rng(&mut self.rng),
        );
        next.options = self.options.clone();
        next.options.clear_drawn();
        next.score = self.score;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::evaluator::HandValue;

    #[derive(Clone, Debug)]
    struct Flat;

    impl HandEvaluator for Flat {
        fn evaluate(&self, _codes: &[String]) -> Result<HandValue, EvalError> {
            Ok(HandValue {
                value: 1,
                hand_name: "Pair".to_string(),
            })
        }
    }

    #[derive(Clone, Debug)]
    struct Broken;

    impl HandEvaluator for Broken {
        fn evaluate(&self, _codes: &[String]) -> Result<HandValue, EvalError> {
            Err(EvalError::NoCards)
        }
    }

    fn table_chip(state: &GameState, value: u8) -> Chip {
        state
            .table_chips
            .iter()
            .copied()
            .find(|chip| chip.value == value)
            .unwrap()
    }

    /// Player `i` takes chip `i + 1`.
    fn claim_round<E: HandEvaluator>(session: &mut GameSession<E>) {
        for player in 0..session.num_players() {
            let chip = table_chip(&session.get_state(), u8::try_from(player + 1).unwrap());
            session.steal_chip(player, chip).unwrap();
        }
    }

    // === Settings Tests ===

    #[test]
    fn test_default_settings_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let too_many = GameSettings {
            cards_per_player: 3,
            min_players: 3,
            max_players: 20,
        };
        assert!(matches!(too_many.validate(), Err(GameError::InvalidSettings(_))));

        let no_cards = GameSettings {
            cards_per_player: 0,
            ..GameSettings::default()
        };
        assert!(no_cards.validate().is_err());

        let inverted = GameSettings {
            min_players: 8,
            max_players: 4,
            ..GameSettings::default()
        };
        assert!(inverted.validate().is_err());
        assert!(GameSession::from_settings(inverted).is_err());
    }

    // === Lifecycle Tests ===

    #[test]
    fn test_start_checks_player_count() {
        let mut session = GameSession::with_seed(1);
        assert_eq!(
            session.start(2),
            Err(GameError::NotEnoughPlayers { min: 3, got: 2 })
        );
        assert_eq!(
            session.start(24),
            Err(GameError::TooManyPlayers { max: 23, got: 24 })
        );
        assert!(session.start(3).is_ok());
        assert_eq!(session.start(3), Err(GameError::AlreadyStarted));
    }

    #[test]
    fn test_options_locked_after_start() {
        let mut session = GameSession::with_seed(1);
        session.toggle_option(GameOption::NoSwitching, true).unwrap();
        session.start(3).unwrap();
        assert_eq!(
            session.toggle_option(GameOption::SkipYellow, true),
            Err(GameError::AlreadyStarted)
        );
        assert_eq!(session.set_options([]), Err(GameError::AlreadyStarted));
        assert_eq!(session.options().active(), vec![GameOption::NoSwitching]);
    }

    #[test]
    fn test_full_round_scores_once() {
        let mut session = GameSession::with_seed(99);
        session.start(3).unwrap();
        for round in [
            Some(ChipColor::White),
            Some(ChipColor::Yellow),
            Some(ChipColor::Orange),
            Some(ChipColor::Red),
        ] {
            assert_eq!(session.get_state().round, round);
            assert!(!session.is_ended());
            claim_round(&mut session);
        }

        assert!(session.is_ended());
        let results = session.get_results();
        assert_ne!(results.round, RoundStatus::InProgress);
        assert_eq!(results.score.iter().sum::<u32>(), 1);
        assert_eq!(results.players.len(), 3);
        assert!(results.players.iter().all(|p| p.rank.is_some()));
        assert!(results.table.iter().all(Option::is_some));

        let state = session.get_state();
        assert!(state.show_hands);
        assert!(state.hands.iter().flatten().all(Option::is_some));
        assert_eq!(state.round, None);
    }

    #[test]
    fn test_state_hides_hands_until_the_end() {
        let mut session = GameSession::with_seed(3);
        session.start(4).unwrap();
        let state = session.get_state();
        assert!(!state.show_hands);
        assert_eq!(state.hands.len(), 4);
        assert!(state.hands.iter().all(|hand| hand.len() == 2));
        assert!(state.hands.iter().flatten().all(Option::is_none));
        assert!(state.figure_counts.is_none());
        assert!(state.hand_values.is_none());
        assert_eq!(state.table_chips.len(), 4);
    }

    #[test]
    fn test_player_state_is_private_view() {
        let mut session = GameSession::with_seed(3);
        session.start(3).unwrap();
        let chip = table_chip(&session.get_state(), 2);
        let state = session.steal_chip(1, chip).unwrap();
        assert_eq!(state.index, 1);
        assert_eq!(state.chip, Some(chip));
        assert_eq!(state.hand, session.data().hands()[1]);
        assert_eq!(session.player_state(7), Err(PlayError::InvalidPlayer(7)));
    }

    #[test]
    fn test_wrong_round_changes_nothing() {
        let mut session = GameSession::with_seed(4);
        session.start(3).unwrap();
        let before = session.get_state();
        assert_eq!(
            session.steal_chip(0, Chip::new(1, ChipColor::Orange)),
            Err(PlayError::WrongRound)
        );
        assert_eq!(session.get_state(), before);
    }

    #[test]
    fn test_steal_before_start_is_wrong_round() {
        let mut session = GameSession::with_seed(4);
        assert_eq!(
            session.steal_chip(0, Chip::new(1, ChipColor::White)),
            Err(PlayError::WrongRound)
        );
    }

    #[test]
    fn test_lowest_reversed_after_reset() {
        let mut session = GameSession::with_seed(5);
        session
            .set_options([GameOption::LowestReversed])
            .unwrap();
        session.start(4).unwrap();
        let reversed: Vec<u8> = session
            .get_state()
            .table_chips
            .iter()
            .filter(|chip| chip.reverse)
            .map(|chip| chip.value)
            .collect();
        assert_eq!(reversed, vec![1]);
    }

    #[test]
    fn test_flat_evaluator_always_wins() {
        let settings = GameSettings::default();
        let mut session = GameSession::with_evaluator(settings, Flat).unwrap().seeded(7);
        session.start(5).unwrap();
        for _ in 0..4 {
            claim_round(&mut session);
        }
        assert_eq!(session.status(), RoundStatus::Win);
        assert_eq!(session.score(), [0, 1]);
    }

    #[test]
    fn test_switch_options_at_full_table() {
        let mut session = GameSession::with_seed(31);
        session
            .set_options([GameOption::SwitchOnFigure, GameOption::SwitchOnNoFigure])
            .unwrap();
        session.start(MAX_PLAYERS).unwrap();
        assert_eq!(session.data().deck().len(), 1);

        for round in [ChipColor::White, ChipColor::Yellow, ChipColor::Orange, ChipColor::Red] {
            assert_eq!(session.get_state().round, Some(round));
            claim_round(&mut session);
        }
        assert!(session.is_ended());
        assert_eq!(session.score().iter().sum::<u32>(), 1);
        assert_eq!(session.data().all_cards().len(), 52);
    }

    #[test]
    fn test_evaluator_failure_rolls_back_last_claim() {
        let mut session = GameSession::with_evaluator(GameSettings::default(), Broken)
            .unwrap()
            .seeded(7);
        session.start(3).unwrap();
        for _ in 0..3 {
            claim_round(&mut session);
        }
        session.steal_chip(0, table_chip(&session.get_state(), 1)).unwrap();
        session.steal_chip(1, table_chip(&session.get_state(), 2)).unwrap();

        let before = session.get_state();
        let last = table_chip(&before, 3);
        assert_eq!(session.steal_chip(2, last), Err(PlayError::SomethingWrong));
        assert_eq!(session.get_state(), before);
        assert!(!session.is_ended());
        assert_eq!(session.score(), [0, 0]);
    }

    #[test]
    fn test_hints_follow_options() {
        let mut session = GameSession::with_seed(12);
        session
            .set_options([GameOption::ShowFigureCount, GameOption::ShowHandValue])
            .unwrap();
        session.start(3).unwrap();
        let state = session.get_state();
        let counts = state.figure_counts.unwrap();
        let expected: Vec<usize> = session
            .data()
            .hands()
            .iter()
            .map(|hand| hand.iter().filter(|card| card.is_figure()).count())
            .collect();
        assert_eq!(counts, expected);
        assert_eq!(state.hand_values.unwrap().len(), 3);
    }

    #[test]
    fn test_random_options_are_drawn_and_cleared() {
        let mut session = GameSession::with_seed(13);
        session.set_options([GameOption::RandomChallenge]).unwrap();
        session.start(3).unwrap();
        let active = session.options().active();
        assert_eq!(active.len(), 1);
        assert!(!active[0].is_random());
        assert_eq!(session.get_state().options, active);

        // Play it out with a flat evaluator so the round ends whatever was drawn.
        let mut flat = GameSession::with_evaluator(GameSettings::default(), Flat)
            .unwrap()
            .seeded(13);
        flat.set_options([GameOption::RandomAdvantage]).unwrap();
        flat.start(3).unwrap();
        while !flat.is_ended() {
            claim_round(&mut flat);
        }
        assert!(flat.options().active().is_empty());
        assert!(
            flat.options()
                .configured()
                .contains(&GameOption::RandomAdvantage)
        );
    }

    #[test]
    fn test_rematch_keeps_score_and_options() {
        let mut session = GameSession::with_evaluator(GameSettings::default(), Flat)
            .unwrap()
            .seeded(21);
        session.set_options([GameOption::SkipOrange]).unwrap();
        session.start(3).unwrap();
        while !session.is_ended() {
            claim_round(&mut session);
        }

        let mut next = session.rematch();
        assert_eq!(next.score(), [0, 1]);
        assert_eq!(next.options().active(), vec![GameOption::SkipOrange]);
        assert_eq!(next.phase(), Phase::default());
        assert!(next.start(3).is_ok());
    }
}
