//! Tunable game rules.
//!
//! Every field has a default matching the shipped game, so an empty JSON
//! object (`{}`) is a complete configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game_engine::{error::ConfigError, models::StreakMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub questions_per_level: usize,
    pub total_levels_per_scenario: usize,
    pub profit_points: i64,
    /// Applied on a wrong answer; zero or negative.
    pub loss_points: i64,
    pub initial_bank_reserve: u32,
    pub borrow_amounts: Vec<u32>,
    pub scenario_time_limit_secs: f64,
    pub streak_mode: StreakMode,
    pub events: EventSettings,
    pub crisis: CrisisSettings,
    pub war: WarSettings,
    /// Fixes every random draw of the session when set.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            questions_per_level: 5,
            total_levels_per_scenario: 4,
            profit_points: 10,
            loss_points: -4,
            initial_bank_reserve: 100,
            borrow_amounts: vec![10, 20, 30],
            scenario_time_limit_secs: 600.0,
            streak_mode: StreakMode::PerLevel,
            events: EventSettings::default(),
            crisis: CrisisSettings::default(),
            war: WarSettings::default(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// Chance that any event interrupts a level boundary.
    pub crisis_probability: f64,
    /// Given an event, chance that it is a war rather than a crisis.
    pub war_probability: f64,
}

impl Default for EventSettings {
    fn default() -> Self {
        EventSettings { crisis_probability: 0.15, war_probability: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisSettings {
    pub total_questions: usize,
    pub loss_per_tick: u32,
    pub loss_interval_secs: f64,
}

impl CrisisSettings {
    /// Time between two loss ticks. Never zero.
    pub fn loss_interval(&self) -> Duration {
        saturating_duration(self.loss_interval_secs).max(Duration::from_nanos(1))
    }
}

impl Default for CrisisSettings {
    fn default() -> Self {
        CrisisSettings { total_questions: 5, loss_per_tick: 1, loss_interval_secs: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarSettings {
    /// Inclusive lower bound of the required streak draw.
    pub required_streak_min: u32,
    /// Exclusive upper bound of the required streak draw.
    pub required_streak_max: u32,
}

impl Default for WarSettings {
    fn default() -> Self {
        WarSettings { required_streak_min: 3, required_streak_max: 6 }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Total questions a scenario must hold to build its levels.
    pub fn questions_per_scenario(&self) -> usize {
        self.questions_per_level.saturating_mul(self.total_levels_per_scenario)
    }

    pub fn scenario_time_limit(&self) -> Duration {
        saturating_duration(self.scenario_time_limit_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions_per_level == 0 {
            return Err(ConfigError::ZeroCount { field: "questions_per_level" });
        }
        if self.total_levels_per_scenario == 0 {
            return Err(ConfigError::ZeroCount { field: "total_levels_per_scenario" });
        }
        if self.crisis.total_questions == 0 {
            return Err(ConfigError::ZeroCount { field: "crisis.total_questions" });
        }
        if self.crisis.loss_per_tick == 0 {
            return Err(ConfigError::ZeroCount { field: "crisis.loss_per_tick" });
        }
        if self.questions_per_level.checked_mul(self.total_levels_per_scenario).is_none() {
            return Err(ConfigError::QuestionCountOverflow {
                levels: self.total_levels_per_scenario,
                per_level: self.questions_per_level,
            });
        }
        for (field, value) in [
            ("events.crisis_probability", self.events.crisis_probability),
            ("events.war_probability", self.events.war_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("scenario_time_limit_secs", self.scenario_time_limit_secs),
            ("crisis.loss_interval_secs", self.crisis.loss_interval_secs),
        ] {
            // `!(x > 0)` also rejects NaN.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveDuration { field, value });
            }
            match Duration::try_from_secs_f64(value) {
                Err(_) => return Err(ConfigError::DurationOutOfRange { field, value }),
                // Below one nanosecond.
                Ok(d) if d.is_zero() => {
                    return Err(ConfigError::NonPositiveDuration { field, value })
                }
                Ok(_) => {}
            }
        }
        if self.profit_points < 0 || self.loss_points > 0 {
            return Err(ConfigError::PointsSign {
                profit: self.profit_points,
                loss: self.loss_points,
            });
        }
        if self.war.required_streak_min >= self.war.required_streak_max {
            return Err(ConfigError::EmptyStreakRange {
                min: self.war.required_streak_min,
                max: self.war.required_streak_max,
            });
        }
        Ok(())
    }
}

/// `Duration::from_secs_f64` without the panic; `validate` rejects the
/// values this clamps.
fn saturating_duration(secs: f64) -> Duration {
    let clamp = if secs > 0.0 { Duration::MAX } else { Duration::ZERO };
    Duration::try_from_secs_f64(secs).unwrap_or(clamp)
}
