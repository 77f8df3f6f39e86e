//! Loading question data and partitioning a scenario into levels.
//!
//! Scenario data is a JSON object keyed by scenario name, each value a list of
//! question records:
//!
//! ```json
//! { "Retail": [ { "company": "...", "sector": "...", "statements": ["..."],
//!                 "table": [ { "row": ["Revenue", "120"] } ],
//!                 "options": ["True", "False"], "correct": "True",
//!                 "justification": "..." } ] }
//! ```
//!
//! Table rows may also be given as bare string arrays. Loading is all or
//! nothing: one malformed question fails the whole source.

use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::game_engine::{
    config::GameConfig,
    error::{DataFormatError, GameError},
    helpers::{sanitize_option, shuffle},
    models::{CrisisQuestion, Level, NarrativeEntry, Question, ScenarioMap, ScenarioName, TableRow},
};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRow {
    Wrapped { row: Vec<String> },
    Bare(Vec<String>),
}

#[derive(Deserialize)]
struct RawQuestion {
    company: String,
    sector: String,
    statements: Vec<String>,
    table: Vec<RawRow>,
    options: Vec<String>,
    #[serde(alias = "correctOption", alias = "correct_option")]
    correct: String,
    justification: String,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        Question {
            company: raw.company,
            sector: raw.sector,
            statements: raw.statements,
            table: raw
                .table
                .into_iter()
                .map(|r| match r {
                    RawRow::Wrapped { row } | RawRow::Bare(row) => TableRow(row),
                })
                .collect(),
            options: raw.options.iter().map(|o| sanitize_option(o)).collect(),
            correct_option: raw.correct,
            justification: raw.justification,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CrisisSource {
    Wrapped { questions: Vec<CrisisQuestion> },
    Bare(Vec<CrisisQuestion>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NarrativeSource {
    Wrapped {
        #[serde(rename = "crisisEvents", alias = "events")]
        crisis_events: Vec<NarrativeEntry>,
    },
    Bare(Vec<NarrativeEntry>),
}

/// Read-only store of every scenario's question pool.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    scenarios: ScenarioMap,
}

impl QuestionBank {
    pub fn new(scenarios: ScenarioMap) -> Self {
        QuestionBank { scenarios }
    }

    pub fn from_json_str(source: &str) -> Result<Self, DataFormatError> {
        Ok(QuestionBank::new(Self::load(source)?))
    }

    /// Parse scenario data into a scenario map.
    pub fn load(source: &str) -> Result<ScenarioMap, DataFormatError> {
        let root: Value = serde_json::from_str(source).map_err(DataFormatError::InvalidJson)?;
        let scenarios = root.as_object().ok_or(DataFormatError::NotAnObject)?;

        let mut map = ScenarioMap::new();
        for (name, node) in scenarios {
            let items = node
                .as_array()
                .ok_or_else(|| DataFormatError::ScenarioNotSequence { scenario: name.clone() })?;

            let mut pool = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let raw = RawQuestion::deserialize(item).map_err(|source| {
                    DataFormatError::InvalidQuestion { scenario: name.clone(), index, source }
                })?;
                pool.push(Question::from(raw));
            }
            debug!(scenario = %name, questions = pool.len(), "loaded scenario");
            map.insert(name.clone(), pool);
        }

        info!(scenarios = map.len(), "scenario data loaded");
        Ok(map)
    }

    pub fn scenarios(&self) -> &ScenarioMap {
        &self.scenarios
    }

    pub fn scenario_names(&self) -> Vec<ScenarioName> {
        self.scenarios.keys().cloned().collect()
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    pub fn pool(&self, scenario: &str) -> Option<&[Question]> {
        self.scenarios.get(scenario).map(Vec::as_slice)
    }

    /// Fail fast if any scenario is too small to fill its levels.
    pub fn ensure_playable(&self, config: &GameConfig) -> Result<(), GameError> {
        let required = config.questions_per_scenario();
        for (name, pool) in &self.scenarios {
            if pool.len() < required {
                return Err(GameError::InsufficientQuestions {
                    scenario: name.clone(),
                    available: pool.len(),
                    required,
                });
            }
        }
        Ok(())
    }

    /// Shuffle `scenario`'s pool and cut it into levels.
    pub fn levels_for<R: Rng>(
        &self,
        scenario: &str,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Vec<Level>, GameError> {
        let pool = self.pool(scenario).unwrap_or(&[]);
        build_levels(
            scenario,
            pool,
            config.total_levels_per_scenario,
            config.questions_per_level,
            rng,
        )
    }
}

/// Everything a session reads from disk: the scenario bank plus the crisis
/// and narrative pools.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub bank: QuestionBank,
    pub crisis_questions: Vec<CrisisQuestion>,
    pub narratives: Vec<NarrativeEntry>,
}

impl GameData {
    /// Load all three sources; any malformed one fails the whole load.
    pub fn from_json(
        scenarios: &str,
        crisis_questions: &str,
        narratives: &str,
    ) -> Result<Self, DataFormatError> {
        Ok(GameData {
            bank: QuestionBank::from_json_str(scenarios)?,
            crisis_questions: load_crisis_questions(crisis_questions)?,
            narratives: load_narratives(narratives)?,
        })
    }
}

/// Shuffle a copy of `pool` and slice it into `total_levels` levels of
/// `per_level` questions each. Leftover questions are discarded.
pub fn build_levels<R: Rng>(
    scenario: &str,
    pool: &[Question],
    total_levels: usize,
    per_level: usize,
    rng: &mut R,
) -> Result<Vec<Level>, GameError> {
    let required = total_levels.saturating_mul(per_level);
    if pool.len() < required {
        return Err(GameError::InsufficientQuestions {
            scenario: scenario.to_string(),
            available: pool.len(),
            required,
        });
    }

    let mut shuffled = pool.to_vec();
    shuffle(&mut shuffled, rng);
    shuffled.truncate(required);

    let levels = shuffled
        .chunks(per_level)
        .enumerate()
        .map(|(index, chunk)| Level { index, questions: chunk.to_vec() })
        .collect();
    Ok(levels)
}

/// Parse the true/false questions used during a crisis.
pub fn load_crisis_questions(source: &str) -> Result<Vec<CrisisQuestion>, DataFormatError> {
    let parsed: CrisisSource =
        serde_json::from_str(source).map_err(DataFormatError::InvalidCrisisData)?;
    Ok(match parsed {
        CrisisSource::Wrapped { questions } | CrisisSource::Bare(questions) => questions,
    })
}

/// Parse the narratives shown when a war breaks out.
pub fn load_narratives(source: &str) -> Result<Vec<NarrativeEntry>, DataFormatError> {
    let parsed: NarrativeSource =
        serde_json::from_str(source).map_err(DataFormatError::InvalidNarrativeData)?;
    Ok(match parsed {
        NarrativeSource::Wrapped { crisis_events } | NarrativeSource::Bare(crisis_events) => {
            crisis_events
        }
    })
}
