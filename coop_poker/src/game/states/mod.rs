//! Phase definitions for the round state machine.
//!
//! Each phase is a unit struct; [`Phase`] dispatches [`PhaseRules`] to
//! them without a vtable.

use enum_dispatch::enum_dispatch;
use std::fmt;

use crate::game::{constants::BOARD_SIZE, entities::ChipColor};

#[enum_dispatch]
pub trait PhaseRules {
    /// Chip color claimed during this phase, if chips are in play.
    fn chip_color(&self) -> Option<ChipColor>;

    /// Number of community cards face up.
    fn revealed(&self) -> usize;

    /// Position in the phase sequence. Phases only ever move to a larger
    /// ordinal.
    fn ordinal(&self) -> u8;

    fn next_phase(&self) -> Option<Phase>;
}

/// Fresh session, options may still change.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Waiting;

/// Cards dealt, no pool yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dealt;

/// Pre-flop claims.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct White;

/// Claims after the flop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Yellow;

/// Claims after the turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Orange;

/// Final claims after the river.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Red;

/// Hands scored and shown. Terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Resolved;

impl PhaseRules for Waiting {
    fn chip_color(&self) -> Option<ChipColor> {
        None
    }

    fn revealed(&self) -> usize {
        0
    }

    fn ordinal(&self) -> u8 {
        0
    }

    fn next_phase(&self) -> Option<Phase> {
        Some(Dealt.into())
    }
}

impl PhaseRules for Dealt {
    fn chip_color(&self) -> Option<ChipColor> {
        None
    }

    fn revealed(&self) -> usize {
        0
    }

    fn ordinal(&self) -> u8 {
        1
    }

    fn next_phase(&self) -> Option<Phase> {
        Some(White.into())
    }
}

impl PhaseRules for White {
    fn chip_color(&self) -> Option<ChipColor> {
        Some(ChipColor::White)
    }

    fn revealed(&self) -> usize {
        0
    }

    fn ordinal(&self) -> u8 {
        2
    }

    fn next_phase(&self) -> Option<Phase> {
        Some(Yellow.into())
    }
}

impl PhaseRules for Yellow {
    fn chip_color(&self) -> Option<ChipColor> {
        Some(ChipColor::Yellow)
    }

    fn revealed(&self) -> usize {
        3
    }

    fn ordinal(&self) -> u8 {
        3
    }

    fn next_phase(&self) -> Option<Phase> {
        Some(Orange.into())
    }
}

impl PhaseRules for Orange {
    fn chip_color(&self) -> Option<ChipColor> {
        Some(ChipColor::Orange)
    }

    fn revealed(&self) -> usize {
        4
    }

    fn ordinal(&self) -> u8 {
        4
    }

    fn next_phase(&self) -> Option<Phase> {
        Some(Red.into())
    }
}

impl PhaseRules for Red {
    fn chip_color(&self) -> Option<ChipColor> {
        Some(ChipColor::Red)
    }

    fn revealed(&self) -> usize {
        BOARD_SIZE
    }

    fn ordinal(&self) -> u8 {
        5
    }

    fn next_phase(&self) -> Option<Phase> {
        Some(Resolved.into())
    }
}

impl PhaseRules for Resolved {
    fn chip_color(&self) -> Option<ChipColor> {
        None
    }

    fn revealed(&self) -> usize {
        BOARD_SIZE
    }

    fn ordinal(&self) -> u8 {
        6
    }

    fn next_phase(&self) -> Option<Phase> {
        None
    }
}

#[enum_dispatch(PhaseRules)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Waiting(Waiting),
    Dealt(Dealt),
    White(White),
    Yellow(Yellow),
    Orange(Orange),
    Red(Red),
    Resolved(Resolved),
}

impl Default for Phase {
    fn default() -> Self {
        Waiting.into()
    }
}

impl Phase {
    /// The claiming phase of a chip color.
    #[must_use]
    pub fn of_color(color: ChipColor) -> Self {
        match color {
            ChipColor::White => White.into(),
            ChipColor::Yellow => Yellow.into(),
            ChipColor::Orange => Orange.into(),
            ChipColor::Red => Red.into(),
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.chip_color().is_some()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting(_) => "waiting",
            Self::Dealt(_) => "dealt",
            Self::White(_) => "white",
            Self::Yellow(_) => "yellow",
            Self::Orange(_) => "orange",
            Self::Red(_) => "red",
            Self::Resolved(_) => "resolved",
        };
        write!(f, "{repr}")
    }
}
