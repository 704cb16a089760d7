//! Rule options a lobby can toggle before a game starts.
//!
//! Every option belongs to an explicit group (challenges make the game
//! harder, advantages make it easier) and touches exactly one part of the
//! engine, recorded as its [`OptionEffect`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

use super::entities::ChipColor;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOption {
    LowestReversed,
    HighestReversed,
    NoSwitching,
    NoHistory,
    SkipYellow,
    SkipOrange,
    SwitchOnFigure,
    SwitchOnNoFigure,
    RandomChallenge,
    ShowFigureCount,
    ShowHandValue,
    LooseTies,
    RandomAdvantage,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionGroup {
    Challenge,
    Advantage,
}

/// The part of the engine an option changes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionEffect {
    PoolReset,
    PhaseTransition,
    Scoring,
    /// Stands in for a concrete option drawn when the game starts.
    Random,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionInfo {
    pub group: OptionGroup,
    pub effect: OptionEffect,
    pub description: &'static str,
}

impl GameOption {
    pub const ALL: [GameOption; 13] = [
        Self::LowestReversed,
        Self::HighestReversed,
        Self::NoSwitching,
        Self::NoHistory,
        Self::SkipYellow,
        Self::SkipOrange,
        Self::SwitchOnFigure,
        Self::SwitchOnNoFigure,
        Self::RandomChallenge,
        Self::ShowFigureCount,
        Self::ShowHandValue,
        Self::LooseTies,
        Self::RandomAdvantage,
    ];

    #[must_use]
    pub const fn info(self) -> OptionInfo {
        use OptionEffect::{PhaseTransition, PoolReset, Random, Scoring};
        use OptionGroup::{Advantage, Challenge};

        let (group, effect, description) = match self {
            Self::LowestReversed => (
                Challenge,
                PoolReset,
                "The lowest chip is reversed: once claimed it stays with its holder",
            ),
            Self::HighestReversed => (
                Challenge,
                PoolReset,
                "The highest chip is reversed: once claimed it stays with its holder",
            ),
            Self::NoSwitching => (
                Challenge,
                PoolReset,
                "Once you hold a chip you can't trade it for another one",
            ),
            Self::NoHistory => (
                Challenge,
                PoolReset,
                "Chips from earlier rounds are cleared at every new round",
            ),
            Self::SkipYellow => (Challenge, PoolReset, "There is no yellow round"),
            Self::SkipOrange => (Challenge, PoolReset, "There is no orange round"),
            Self::SwitchOnFigure => (
                Challenge,
                PhaseTransition,
                "When a figure is revealed, the holder of the highest chip gets a new hand",
            ),
            Self::SwitchOnNoFigure => (
                Challenge,
                PhaseTransition,
                "When no figure is revealed, the holder of the lowest chip gets a new hand",
            ),
            Self::RandomChallenge => (Challenge, Random, "A random challenge"),
            Self::ShowFigureCount => (
                Advantage,
                Scoring,
                "Everyone sees how many figures each player holds",
            ),
            Self::ShowHandValue => (
                Advantage,
                Scoring,
                "Everyone sees the category of each player's current hand",
            ),
            Self::LooseTies => (
                Advantage,
                Scoring,
                "Hands of the same category count as ties",
            ),
            Self::RandomAdvantage => (Advantage, Random, "A random advantage"),
        };

        OptionInfo {
            group,
            effect,
            description,
        }
    }

    #[must_use]
    pub const fn group(self) -> OptionGroup {
        self.info().group
    }

    #[must_use]
    pub const fn effect(self) -> OptionEffect {
        self.info().effect
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        self.info().description
    }

    #[must_use]
    pub const fn is_random(self) -> bool {
        matches!(self.effect(), OptionEffect::Random)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LowestReversed => "lowest_reversed",
            Self::HighestReversed => "highest_reversed",
            Self::NoSwitching => "no_switching",
            Self::NoHistory => "no_history",
            Self::SkipYellow => "skip_yellow",
            Self::SkipOrange => "skip_orange",
            Self::SwitchOnFigure => "switch_on_figure",
            Self::SwitchOnNoFigure => "switch_on_no_figure",
            Self::RandomChallenge => "random_challenge",
            Self::ShowFigureCount => "show_figure_count",
            Self::ShowHandValue => "show_hand_value",
            Self::LooseTies => "loose_ties",
            Self::RandomAdvantage => "random_advantage",
        }
    }
}

impl fmt::Display for GameOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GameOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|option| option.name() == needle)
            .ok_or_else(|| format!("unknown game option {s:?}"))
    }
}

/// How a chip pool reset behaves for one color.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ResetRules {
    pub lowest_reversed: bool,
    pub highest_reversed: bool,
    pub clear_history: bool,
}

/// How the resolver treats players whose hands compare equal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TiePolicy {
    /// Only identical strengths tie.
    SameStrength,
    /// Hands of the same category tie.
    SameCategory,
}

/// Options configured for a session plus the ones drawn for the random
/// tags of the current game.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GameOptions {
    configured: BTreeSet<GameOption>,
    drawn: BTreeSet<GameOption>,
}

impl GameOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options as the lobby configured them, random tags included.
    #[must_use]
    pub fn configured(&self) -> &BTreeSet<GameOption> {
        &self.configured
    }

    /// Concrete options drawn for the random tags of the running game.
    #[must_use]
    pub fn drawn(&self) -> &BTreeSet<GameOption> {
        &self.drawn
    }

    pub(crate) fn set(&mut self, option: GameOption, enabled: bool) {
        if enabled {
            self.configured.insert(option);
        } else {
            self.configured.remove(&option);
        }
    }

    /// Concrete options in effect, sorted.
    #[must_use]
    pub fn active(&self) -> Vec<GameOption> {
        self.configured
            .iter()
            .filter(|option| !option.is_random())
            .chain(self.drawn.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn is_active(&self, option: GameOption) -> bool {
        if option.is_random() {
            return false;
        }
        self.configured.contains(&option) || self.drawn.contains(&option)
    }

    /// Replaces every configured random tag with one inactive option of
    /// the same group. A tag with nothing left to draw is ignored.
    pub fn draw_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameOption> {
        let tags: Vec<GameOption> = self
            .configured
            .iter()
            .copied()
            .filter(|option| option.is_random())
            .collect();

        let mut drawn = Vec::with_capacity(tags.len());
        for tag in tags {
            let candidates: Vec<GameOption> = GameOption::ALL
                .into_iter()
                .filter(|option| {
                    option.group() == tag.group() && !option.is_random() && !self.is_active(*option)
                })
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let option = candidates[rng.random_range(0..candidates.len())];
            self.drawn.insert(option);
            drawn.push(option);
        }
        drawn
    }

    pub fn clear_drawn(&mut self) {
        self.drawn.clear();
    }

    #[must_use]
    pub fn reset_rules(&self, color: ChipColor) -> ResetRules {
        let reversible = color != ChipColor::Red;
        ResetRules {
            lowest_reversed: reversible && self.is_active(GameOption::LowestReversed),
            highest_reversed: reversible && self.is_active(GameOption::HighestReversed),
            clear_history: self.is_active(GameOption::NoHistory),
        }
    }

    /// Whether the round of this color is skipped. Red always plays.
    #[must_use]
    pub fn skips(&self, color: ChipColor) -> bool {
        match color {
            ChipColor::Yellow => self.is_active(GameOption::SkipYellow),
            ChipColor::Orange => self.is_active(GameOption::SkipOrange),
            ChipColor::White | ChipColor::Red => false,
        }
    }

    #[must_use]
    pub fn tie_policy(&self) -> TiePolicy {
        if self.is_active(GameOption::LooseTies) {
            TiePolicy::SameCategory
        } else {
            TiePolicy::SameStrength
        }
    }
}

impl FromIterator<GameOption> for GameOptions {
    fn from_iter<T: IntoIterator<Item = GameOption>>(iter: T) -> Self {
        Self {
            configured: iter.into_iter().collect(),
            drawn: BTreeSet::new(),
        }
    }
}
