//! Core game engine: question data, economy, mini-events, and progression.
//!
//! ## Module overview
//!
//! | Module              | Purpose |
//! |---------------------|---------|
//! | `models`            | Shared data types: questions, levels, level keys, event data |
//! | `config`            | `GameConfig` with the shipped defaults and validation |
//! | `error`             | `DataFormatError`, `ConfigError`, `GameError` |
//! | `helpers`           | Option sanitising, Fisher-Yates shuffle, random picks |
//! | `question_bank`     | JSON loading and partitioning a scenario into levels |
//! | `scenario_selector` | Draws scenarios without replacement |
//! | `economy`           | Balance, bank reserve, borrowing, crisis charges |
//! | `event_gate`        | Rolls for a crisis or war at level boundaries |
//! | `crisis`            | Timed passive-loss mini-event |
//! | `war`               | Streak-threshold mini-event |
//! | `events`            | Lifecycle notifications for the presentation layer |
//! | `progression`       | `GameSession`, the state machine that ties it all together |

pub mod config;
pub mod crisis;
pub mod economy;
pub mod error;
pub mod event_gate;
pub mod events;
pub mod helpers;
pub mod models;
pub mod progression;
pub mod question_bank;
pub mod scenario_selector;
pub mod war;

pub use config::{CrisisSettings, EventSettings, GameConfig, WarSettings};
pub use crisis::{CrisisExit, CrisisPhase, CrisisSubsystem};
pub use economy::{BorrowOutcome, CrisisTick, EconomyState};
pub use error::{ConfigError, DataFormatError, GameError};
pub use event_gate::{EventDecision, EventGate};
pub use events::GameEvent;
pub use models::{
    CrisisQuestion, Level, LevelKey, NarrativeEntry, Question, ScenarioMap, ScenarioName,
    StreakMode, TableRow,
};
pub use progression::{BorrowResume, GameSession, Phase, ProgressionState, RoundResult};
pub use question_bank::{build_levels, GameData, QuestionBank};
pub use scenario_selector::ScenarioSelector;
pub use war::{WarOutcome, WarPhase, WarSubsystem};
