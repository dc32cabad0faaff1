//! Environment configuration, validation, and error types.
//!
//! [`EnvConfig`] is read once at environment construction, from TOML or
//! built in code, and is immutable afterwards. Changing it means building a
//! new environment. [`validate()`](EnvConfig::validate) checks every
//! structural invariant before anything is constructed.
//!
//! ```toml
//! [match]
//! team_size = 2
//! action_repeat = 4
//!
//! [arena]
//! car_max_speed = 2300.0
//!
//! [weights]
//! velocity_player_to_ball = 0.2
//! # ... one entry per mechanic
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;
use zenith_core::{ArenaConstants, ArenaError};
use zenith_mechanics::{WeightError, WeightTable};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating an [`EnvConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML was malformed or named an unknown key.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// `team_size` is zero.
    #[error("team_size must be at least 1")]
    TeamSizeZero,

    /// `action_repeat` is zero.
    #[error("action_repeat must be at least 1")]
    ActionRepeatZero,

    /// `tick_rate_hz` is NaN, infinite, zero, or negative.
    #[error("tick_rate_hz must be finite and positive, got {value}")]
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },

    /// A timeout is NaN, infinite, zero, or negative.
    #[error("{name} must be finite and positive, got {value}")]
    InvalidTimeout {
        /// Which timeout.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// An arena dimension or limit is invalid.
    #[error("arena: {0}")]
    Arena(#[from] ArenaError),

    /// The weight table is incomplete or holds an invalid weight.
    #[error("weights: {0}")]
    Weights(#[from] WeightError),
}

// ── MatchConfig ────────────────────────────────────────────────────

/// Match setup and episode timing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Cars per team. Default: 2.
    pub team_size: usize,
    /// Whether the orange team is populated. Default: true.
    pub spawn_opponents: bool,
    /// Physics ticks each chosen action is held for. Default: 4.
    pub action_repeat: usize,
    /// Seconds without any ball contact before truncation. Default: 20.
    pub no_touch_timeout_seconds: f64,
    /// Seconds before the episode is truncated regardless. Default: 180.
    pub game_timeout_seconds: f64,
    /// Physics ticks per second of the transition engine. Default: 120.
    pub tick_rate_hz: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            team_size: 2,
            spawn_opponents: true,
            action_repeat: 4,
            no_touch_timeout_seconds: 20.0,
            game_timeout_seconds: 180.0,
            tick_rate_hz: 120.0,
        }
    }
}

impl MatchConfig {
    /// Blue team size.
    pub fn blue_size(&self) -> usize {
        self.team_size
    }

    /// Orange team size: `team_size`, or 0 without opponents.
    pub fn orange_size(&self) -> usize {
        if self.spawn_opponents {
            self.team_size
        } else {
            0
        }
    }

    /// Convert seconds to whole physics ticks, rounding up.
    pub fn seconds_to_ticks(&self, seconds: f64) -> u64 {
        (seconds * self.tick_rate_hz).ceil() as u64
    }
}

// ── EnvConfig ──────────────────────────────────────────────────────

/// Complete configuration for constructing a [`MatchEnv`](crate::MatchEnv).
///
/// Omitted sections take their standard defaults. A `[weights]` table,
/// when present, must name every mechanic.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    /// Match setup and timing.
    #[serde(rename = "match")]
    pub rules: MatchConfig,
    /// Arena geometry and normalisation limits.
    pub arena: ArenaConstants,
    /// Reward weight per mechanic.
    pub weights: WeightTable,
}

impl EnvConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            team_size = config.rules.team_size,
            action_repeat = config.rules.action_repeat,
            "environment config loaded"
        );
        Ok(config)
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;
        // 1. At least one car per team.
        if rules.team_size == 0 {
            return Err(ConfigError::TeamSizeZero);
        }
        // 2. Each action held for at least one tick.
        if rules.action_repeat == 0 {
            return Err(ConfigError::ActionRepeatZero);
        }
        // 3. Tick rate finite and positive.
        if !rules.tick_rate_hz.is_finite() || rules.tick_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate {
                value: rules.tick_rate_hz,
            });
        }
        // 4. Timeouts finite and positive.
        for (name, value) in [
            ("no_touch_timeout_seconds", rules.no_touch_timeout_seconds),
            ("game_timeout_seconds", rules.game_timeout_seconds),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTimeout { name, value });
            }
        }
        // 5. Arena dimensions.
        self.arena.validate()?;
        // 6. One valid weight per mechanic.
        self.weights.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zenith_mechanics::MechanicKind;

    #[test]
    fn empty_document_is_standard() {
        let config = EnvConfig::from_toml_str("").unwrap();
        assert_eq!(config, EnvConfig::default());
        assert_eq!(config.rules.team_size, 2);
        assert_eq!(config.rules.action_repeat, 4);
        assert_eq!(config.arena, ArenaConstants::standard());
        assert_eq!(config.weights, WeightTable::standard());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = EnvConfig::from_toml_str(
            "[match]\nteam_size = 1\nspawn_opponents = false\n\n[arena]\nball_max_speed = 5000.0\n",
        )
        .unwrap();
        assert_eq!(config.rules.team_size, 1);
        assert_eq!(config.rules.orange_size(), 0);
        assert_eq!(config.rules.game_timeout_seconds, 180.0);
        assert_eq!(config.arena.ball_max_speed, 5000.0);
        assert_eq!(config.arena.car_max_speed, 2300.0);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = EnvConfig::from_toml_str("[match]\nteam_sise = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn incomplete_weights_are_rejected() {
        let err = EnvConfig::from_toml_str("[weights]\ngoal = 30.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Weights(WeightError::MissingWeight { .. })
        ));
    }

    #[test]
    fn zero_values_are_rejected() {
        let mut config = EnvConfig::default();
        config.rules.team_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::TeamSizeZero)));

        let mut config = EnvConfig::default();
        config.rules.action_repeat = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ActionRepeatZero)
        ));

        let mut config = EnvConfig::default();
        config.rules.no_touch_timeout_seconds = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeout {
                name: "no_touch_timeout_seconds",
                ..
            })
        ));

        let mut config = EnvConfig::default();
        config.rules.tick_rate_hz = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTickRate { .. })
        ));
    }

    #[test]
    fn bad_arena_is_rejected() {
        let mut config = EnvConfig::default();
        config.arena.car_max_speed = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Arena(ArenaError::NotPositive {
                name: "car_max_speed",
                ..
            }))
        ));
    }

    #[test]
    fn seconds_round_up_to_ticks() {
        let rules = MatchConfig::default();
        assert_eq!(rules.seconds_to_ticks(20.0), 2400);
        assert_eq!(rules.seconds_to_ticks(0.001), 1);
    }

    #[test]
    fn reads_from_file() {
        let path = std::env::temp_dir().join(format!("zenith-env-{}.toml", std::process::id()));
        let weights: String = MechanicKind::ALL
            .iter()
            .map(|k| format!("{} = 1.0\n", k.name()))
            .collect();
        std::fs::write(&path, format!("[weights]\n{weights}")).unwrap();
        let config = EnvConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.weights.get(MechanicKind::Goal), Some(1.0));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EnvConfig::from_path("/nonexistent/zenith.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/zenith.toml"));
    }
}
