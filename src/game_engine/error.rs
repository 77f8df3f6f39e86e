//! Error types for loading game data and driving a session.

use thiserror::Error;

use crate::game_engine::progression::Phase;

/// Malformed scenario, crisis, or narrative data. Fatal to the load.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataFormatError {
    #[error("data source is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("scenario data must be an object keyed by scenario name")]
    NotAnObject,
    #[error("scenario '{scenario}' is not a sequence of questions")]
    ScenarioNotSequence { scenario: String },
    #[error("question {index} in scenario '{scenario}' is malformed: {source}")]
    InvalidQuestion {
        scenario: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("crisis question data is malformed: {0}")]
    InvalidCrisisData(#[source] serde_json::Error),
    #[error("crisis narrative data is malformed: {0}")]
    InvalidNarrativeData(#[source] serde_json::Error),
}

/// A `GameConfig` value outside its legal range.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(String),
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
    #[error("{field} must lie in [0, 1] (got {value})")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be positive (got {value})")]
    NonPositiveDuration { field: &'static str, value: f64 },
    #[error("{field} is too large to represent as a duration (got {value})")]
    DurationOutOfRange { field: &'static str, value: f64 },
    #[error("{levels} levels of {per_level} questions overflows the question count")]
    QuestionCountOverflow { levels: usize, per_level: usize },
    #[error("profit_points must be >= 0 and loss_points <= 0 (got {profit}/{loss})")]
    PointsSign { profit: i64, loss: i64 },
    #[error("required streak range [{min}, {max}) is empty")]
    EmptyStreakRange { min: u32, max: u32 },
}

/// Everything that can go wrong while building or driving a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("scenario '{scenario}' has {available} questions but {required} are needed")]
    InsufficientQuestions {
        scenario: String,
        available: usize,
        required: usize,
    },
    #[error("no scenarios left to play")]
    NoScenariosLeft,
    #[error("level {level_index} requested but the scenario only has {available} levels")]
    NoMoreLevels { level_index: usize, available: usize },
    #[error("'{action}' is not allowed while {phase}")]
    InvalidAction { action: &'static str, phase: Phase },
    #[error("a crisis or war is already in progress")]
    EventInProgress,
    #[error("username and password are both required")]
    InvalidCredentials,
}
