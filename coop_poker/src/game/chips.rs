//! Claim chips: the pool on the table and the chips in players' hands.

use super::{
    entities::{Chip, ChipColor},
    errors::PlayError,
    options::ResetRules,
};

/// What a successful claim did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Claim {
    /// The player picked the chip they already hold.
    Kept,
    FromTable {
        returned: Option<Chip>,
        exhausted: bool,
    },
    FromPlayer {
        victim: usize,
        returned: Option<Chip>,
    },
}

impl Claim {
    /// Whether the claim emptied the pool, closing the round.
    #[must_use]
    pub const fn exhausted(&self) -> bool {
        matches!(
            self,
            Self::FromTable {
                exhausted: true,
                ..
            }
        )
    }
}

enum Source {
    Table(usize),
    Player { victim: usize, pos: usize },
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChipPool {
    table: Vec<Chip>,
    held: Vec<Vec<Chip>>,
}

impl ChipPool {
    #[must_use]
    pub fn new(num_players: usize) -> Self {
        Self {
            table: Vec::with_capacity(num_players),
            held: vec![Vec::new(); num_players],
        }
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.held.len()
    }

    /// Unclaimed chips of the active round, lowest value first.
    #[must_use]
    pub fn table(&self) -> &[Chip] {
        &self.table
    }

    /// Every chip each player claimed so far, oldest first.
    #[must_use]
    pub fn held(&self) -> &[Vec<Chip>] {
        &self.held
    }

    #[must_use]
    pub fn latest(&self, player: usize) -> Option<Chip> {
        self.held.get(player).and_then(|chips| chips.last().copied())
    }

    #[must_use]
    pub fn chip_of(&self, player: usize, color: ChipColor) -> Option<Chip> {
        self.held
            .get(player)?
            .iter()
            .find(|chip| chip.color == color)
            .copied()
    }

    /// Color of the round in play, `None` when no round is open.
    #[must_use]
    pub fn active_color(&self) -> Option<ChipColor> {
        self.table.first().map(|chip| chip.color)
    }

    /// Puts one chip per player on the table, valued 1 to N.
    pub fn reset(&mut self, color: ChipColor, rules: ResetRules) {
        if rules.clear_history {
            for chips in &mut self.held {
                chips.clear();
            }
        }
        let top = u8::try_from(self.held.len()).unwrap_or(u8::MAX);
        self.table = (1..=top)
            .map(|value| {
                let reverse = (value == 1 && rules.lowest_reversed)
                    || (value == top && rules.highest_reversed);
                Chip {
                    value,
                    color,
                    reverse,
                }
            })
            .collect();
    }

    /// Player holding the highest (or lowest) chip of `color`.
    #[must_use]
    pub fn holder_of_extreme(&self, color: ChipColor, highest: bool) -> Option<usize> {
        let holders = (0..self.held.len())
            .filter_map(|player| self.chip_of(player, color).map(|chip| (player, chip.value)));
        if highest {
            holders.max_by_key(|&(_, value)| value).map(|(player, _)| player)
        } else {
            holders.min_by_key(|&(_, value)| value).map(|(player, _)| player)
        }
    }

    /// Chips of `color` on the table and in players' hands.
    #[must_use]
    pub fn count(&self, color: ChipColor) -> usize {
        self.table.iter().filter(|chip| chip.color == color).count()
            + self
                .held
                .iter()
                .flatten()
                .filter(|chip| chip.color == color)
                .count()
    }

    fn locate(&self, chip: Chip) -> Option<Source> {
        if let Some(idx) = self.table.iter().position(|c| *c == chip) {
            return Some(Source::Table(idx));
        }
        self.held.iter().enumerate().find_map(|(victim, chips)| {
            chips
                .iter()
                .position(|c| *c == chip)
                .map(|pos| Source::Player { victim, pos })
        })
    }

    /// Moves `chip` to `player`, giving back the chip of the same color
    /// they held. Every check runs before anything moves, so an error
    /// leaves the pool untouched.
    pub fn steal(
        &mut self,
        player: usize,
        chip: Chip,
        no_switching: bool,
    ) -> Result<Claim, PlayError> {
        match self.active_color() {
            Some(color) if color == chip.color => {}
            _ => return Err(PlayError::WrongRound),
        }
        let held = self
            .held
            .get(player)
            .ok_or(PlayError::InvalidPlayer(player))?;

        let current = held.iter().position(|c| c.color == chip.color);
        if let Some(pos) = current {
            let mine = held[pos];
            if mine == chip {
                return Ok(Claim::Kept);
            }
            if no_switching {
                return Err(PlayError::HoldingChip);
            }
            if mine.reverse {
                return Err(PlayError::ReversedChip);
            }
        }

        let source = match self.locate(chip) {
            Some(source @ Source::Table(_)) => source,
            _ if chip.reverse => return Err(PlayError::ReversedChip),
            Some(source) => source,
            None => return Err(PlayError::SomethingWrong),
        };

        let returned = current.map(|pos| self.held[player].remove(pos));
        let claim = match source {
            Source::Table(idx) => {
                self.table.remove(idx);
                Claim::FromTable {
                    returned,
                    exhausted: false,
                }
            }
            Source::Player { victim, pos } => {
                self.held[victim].remove(pos);
                Claim::FromPlayer { victim, returned }
            }
        };
        self.held[player].push(chip);
        if let Some(back) = returned {
            self.table.push(back);
            self.table.sort_by_key(|c| c.value);
        }

        Ok(match claim {
            Claim::FromTable { returned, .. } => Claim::FromTable {
                returned,
                exhausted: self.table.is_empty(),
            },
            other => other,
        })
    }
}
