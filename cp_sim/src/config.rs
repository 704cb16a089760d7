//! Simulator configuration management.
//!
//! Reads the `SIM_*` environment variables, lets CLI flags override them
//! and validates the result against the engine's table limits.

use coop_poker::{
    GameError, GameOption, GameSettings,
    constants::{MIN_PLAYERS, max_players_for},
};

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of games to play in a row
    pub games: usize,
    /// Bots at the table
    pub players: usize,
    /// Seed for reproducible runs
    pub seed: Option<u64>,
    /// Options configured for every game
    pub options: Vec<GameOption>,
    pub cards_per_player: usize,
}

/// Values given on the command line, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub games: Option<usize>,
    pub players: Option<usize>,
    pub seed: Option<u64>,
    pub options: Option<String>,
    pub cards_per_player: Option<usize>,
}

impl SimConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if `SIM_SEED` or an option name can't be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let games = overrides
            .games
            .unwrap_or_else(|| parse_env_or("SIM_GAMES", 100));
        let players = overrides
            .players
            .unwrap_or_else(|| parse_env_or("SIM_PLAYERS", 4));
        let cards_per_player = overrides
            .cards_per_player
            .unwrap_or_else(|| parse_env_or("SIM_CARDS_PER_PLAYER", 2));

        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => match std::env::var("SIM_SEED") {
                Ok(raw) => Some(raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "SIM_SEED".to_string(),
                    reason: format!("{raw:?} is not an unsigned integer"),
                })?),
                Err(_) => None,
            },
        };

        let raw_options = overrides
            .options
            .or_else(|| std::env::var("SIM_OPTIONS").ok())
            .unwrap_or_default();
        let options = parse_options(&raw_options)?;

        Ok(Self {
            games,
            players,
            seed,
            options,
            cards_per_player,
        })
    }

    /// Table settings every simulated session uses
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            cards_per_player: self.cards_per_player,
            min_players: MIN_PLAYERS,
            max_players: max_players_for(self.cards_per_player).min(usize::from(u8::MAX)),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.games == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_GAMES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        if self.cards_per_player == 0 {
            return Err(ConfigError::Invalid {
                var: "SIM_CARDS_PER_PLAYER".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        let settings = self.settings();
        settings.validate()?;
        settings.check_players(self.players).map_err(|err| ConfigError::Invalid {
            var: "SIM_PLAYERS".to_string(),
            reason: err.to_string(),
        })?;
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid table settings: {0}")]
    Settings(#[from] GameError),
}

/// Parses a comma-separated list of option names
fn parse_options(raw: &str) -> Result<Vec<GameOption>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<GameOption>().map_err(|reason| ConfigError::Invalid {
                var: "SIM_OPTIONS".to_string(),
                reason,
            })
        })
        .collect()
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
