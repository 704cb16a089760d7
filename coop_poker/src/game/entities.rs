use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{constants::BOARD_SIZE, errors::ParseCardError, options::GameOption};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Diamond,
    Spade,
    Heart,
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Self::Diamond, Self::Spade, Self::Heart, Self::Club];

    /// Single-letter code used by hand evaluators.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Diamond => 'd',
            Self::Spade => 's',
            Self::Heart => 'h',
            Self::Club => 'c',
        }
    }

    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'd' => Some(Self::Diamond),
            's' => Some(Self::Spade),
            'h' => Some(Self::Heart),
            'c' => Some(Self::Club),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Diamond => "♦",
            Self::Spade => "♠",
            Self::Heart => "♥",
            Self::Club => "♣",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

pub const LOWEST_VALUE: Value = 1;
pub const HIGHEST_VALUE: Value = 13;

/// A playing card. Values run from 1 (deuce) to 13 (ace), so 9 is a ten,
/// 10 a jack, 11 a queen and 12 a king.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(value: Value, suit: Suit) -> Self {
        Self { value, suit }
    }

    /// Jacks, queens and kings.
    #[must_use]
    pub const fn is_figure(&self) -> bool {
        matches!(self.value, 10..=12)
    }

    /// Poker face value, deuce = 2 up to ace = 14.
    #[must_use]
    pub const fn face(&self) -> u8 {
        self.value + 1
    }

    /// Two-character code understood by hand evaluators, e.g. `Ah` or `Td`.
    #[must_use]
    pub fn poker_code(&self) -> String {
        let value = match self.value {
            13 => 'A',
            12 => 'K',
            11 => 'Q',
            10 => 'J',
            9 => 'T',
            v => char::from(b'1' + v),
        };
        format!("{value}{}", self.suit.code())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.poker_code())
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(value), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCardError(s.to_string()));
        };
        let value = match value.to_ascii_uppercase() {
            'A' => 13,
            'K' => 12,
            'Q' => 11,
            'J' => 10,
            'T' => 9,
            d @ '2'..='9' => d as u8 - b'1',
            _ => return Err(ParseCardError(s.to_string())),
        };
        let suit = Suit::from_code(suit.to_ascii_lowercase())
            .ok_or_else(|| ParseCardError(s.to_string()))?;
        Ok(Self { value, suit })
    }
}

/// Hand categories, weakest first.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "High Card",
            Self::OnePair => "Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
        };
        write!(f, "{repr}")
    }
}

/// Part of an evaluated hand. An evaluation is a list of subhands, the
/// first carrying the hand category and the rest the kickers; comparing
/// two evaluations lexicographically compares the hands.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubHand {
    pub rank: Rank,
    /// Face values (deuce = 2 ..= ace = 14), most significant first.
    pub values: Vec<u8>,
}

pub type Hand = Vec<Card>;

/// Community cards; a slot stays empty until its phase is reached.
pub type Table = [Option<Card>; BOARD_SIZE];

/// `[losses, wins]` across the sessions of one lobby.
pub type Score = [u32; 2];

pub const LOSSES: usize = 0;
pub const WINS: usize = 1;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipColor {
    White,
    Yellow,
    Orange,
    Red,
}

impl ChipColor {
    pub const ALL: [ChipColor; 4] = [Self::White, Self::Yellow, Self::Orange, Self::Red];

    /// The color of the following round, `None` after red.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::White => Some(Self::Yellow),
            Self::Yellow => Some(Self::Orange),
            Self::Orange => Some(Self::Red),
            Self::Red => None,
        }
    }
}

impl fmt::Display for ChipColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::White => "white",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        };
        write!(f, "{repr}")
    }
}

/// A claim token. `value` is the strength a player claims for their
/// hand this round: 1 is the weakest, the player count the strongest.
///
/// Chips are compared by value, color and reverse flag; two chips with
/// the same triple are the same chip.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Chip {
    pub value: u8,
    pub color: ChipColor,
    pub reverse: bool,
}

impl Chip {
    #[must_use]
    pub const fn new(value: u8, color: ChipColor) -> Self {
        Self {
            value,
            color,
            reverse: false,
        }
    }

    #[must_use]
    pub const fn reversed(value: u8, color: ChipColor) -> Self {
        Self {
            value,
            color,
            reverse: true,
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reverse {
            write!(f, "{} {} (reversed)", self.color, self.value)
        } else {
            write!(f, "{} {}", self.color, self.value)
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundStatus {
    InProgress,
    Win,
    Lose,
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::InProgress => "in progress",
            Self::Win => "win",
            Self::Lose => "lose",
        };
        write!(f, "{repr}")
    }
}

/// What a single player is allowed to know about themselves.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerState {
    pub index: usize,
    pub hand: Hand,
    pub chip: Option<Chip>,
}

/// Broadcastable snapshot of a session. Hand contents are `None` until
/// the hands are shown, but each hand keeps its length.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameState {
    pub table_chips: Vec<Chip>,
    pub table: Table,
    pub hands: Vec<Vec<Option<Card>>>,
    pub chips: Vec<Vec<Chip>>,
    /// Color of the round being played, if any.
    pub round: Option<ChipColor>,
    pub show_hands: bool,
    pub options: Vec<GameOption>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub figure_counts: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hand_values: Option<Vec<Option<String>>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerResult {
    pub index: usize,
    pub hand: Hand,
    pub chip: Option<Chip>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rank: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameResults {
    pub score: Score,
    pub round: RoundStatus,
    pub table: Table,
    pub players: Vec<PlayerResult>,
}
