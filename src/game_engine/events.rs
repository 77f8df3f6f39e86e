//! Lifecycle notifications for the presentation layer.
//!
//! A session queues these in the order things happen, always after the state
//! change they describe, and the host drains them once per frame.

use serde::{Deserialize, Serialize};

use crate::game_engine::{
    crisis::CrisisExit,
    economy::BorrowOutcome,
    models::{LevelKey, ScenarioName},
    war::WarOutcome,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    ScenarioStarted { scenario_index: usize, name: ScenarioName },
    LevelStarted { key: LevelKey },
    QuestionAnswered { correct: bool, delta: i64, balance: i64 },
    BorrowRequired { balance: i64, bank_reserve: u32 },
    Borrowed { outcome: BorrowOutcome, balance: i64, bank_reserve: u32 },
    RoundOver { correct: bool, delta: i64, balance: i64 },
    LevelCompleted { key: LevelKey, all_correct: bool, streak: u32 },
    ScenarioComplete { scenario_index: usize, timed_out: bool },
    CrisisStarted,
    CrisisEnded { total_loss: u64, exit: CrisisExit },
    WarStarted { required_streak: u32 },
    WarEnded { outcome: WarOutcome },
    GameOver { balance: i64 },
    GameComplete { balance: i64 },
    GameReset,
}
