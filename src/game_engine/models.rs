use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Question data
// ---------------------------------------------------------------------------

/// One row of a financial-statement table, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow(pub Vec<String>);

/// A single multiple-choice or true/false question about a company's
/// financial statements. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub company: String,
    pub sector: String,
    pub statements: Vec<String>,
    pub table: Vec<TableRow>,
    pub options: Vec<String>,
    pub correct_option: String,
    pub justification: String,
}

impl Question {
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_option
    }
}

pub type ScenarioName = String;

/// Every scenario's full question pool, keyed by scenario name.
///
/// A `BTreeMap` so that iteration (and therefore seeded selection) is stable.
pub type ScenarioMap = BTreeMap<ScenarioName, Vec<Question>>;

/// A fixed-size batch of questions drawn from a shuffled scenario pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub index: usize,
    pub questions: Vec<Question>,
}

impl Level {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Level keys (presentation colouring)
// ---------------------------------------------------------------------------

/// Identifies a level across the whole session, rendered as `"scenario-level"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelKey {
    pub scenario: usize,
    pub level: usize,
}

impl LevelKey {
    pub fn new(scenario: usize, level: usize) -> Self {
        LevelKey { scenario, level }
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.scenario, self.level)
    }
}

// ---------------------------------------------------------------------------
// Mini-event data
// ---------------------------------------------------------------------------

/// A true/false question shown during a crisis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisQuestion {
    pub question: String,
    pub answer: bool,
}

/// A scrolling narrative shown when a war breaks out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeEntry {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakMode {
    /// Streak counts consecutive levels answered without a single mistake.
    PerLevel,
    /// Streak counts consecutive correct answers.
    PerQuestion,
}

impl fmt::Display for StreakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreakMode::PerLevel    => write!(f, "per level"),
            StreakMode::PerQuestion => write!(f, "per question"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_key_renders_scenario_dash_level() {
        assert_eq!(LevelKey::new(2, 3).to_string(), "2-3");
    }

    #[test]
    fn level_keys_order_by_scenario_then_level() {
        let mut keys = vec![LevelKey::new(1, 0), LevelKey::new(0, 3), LevelKey::new(0, 1)];
        keys.sort();
        assert_eq!(keys, vec![LevelKey::new(0, 1), LevelKey::new(0, 3), LevelKey::new(1, 0)]);
    }

    #[test]
    fn streak_mode_uses_snake_case_on_the_wire() {
        let mode: StreakMode = serde_json::from_str("\"per_question\"").unwrap();
        assert_eq!(mode, StreakMode::PerQuestion);
    }
}
