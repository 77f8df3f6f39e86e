use serde::Serialize;
use serde_json::{json, Value};

use crate::game_engine::{
    models::{LevelKey, Question},
    progression::{GameSession, ProgressionState},
};

/// Level buttons shown per page of the level grid.
pub const PAGE_SIZE: usize = 7;

/// How a level button is coloured on the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    Current,
    TimedOut,
    Failed,
    Completed,
    Unlocked,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCell {
    pub flat_index: usize,
    pub key: LevelKey,
    pub status: LevelStatus,
}

/// Format seconds as `MM:SS` for the scenario timer.
fn clock(seconds: f64) -> String {
    let whole = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

fn level_status(state: &ProgressionState, key: LevelKey) -> LevelStatus {
    let unlocked = key.scenario < state.scenario_index
        || (key.scenario == state.scenario_index && key.level <= state.level_index);
    if key == state.current_key() {
        LevelStatus::Current
    } else if state.timeout_levels.contains(&key) {
        LevelStatus::TimedOut
    } else if state.failed_levels.contains(&key) {
        LevelStatus::Failed
    } else if state.completed_levels.contains(&key) {
        LevelStatus::Completed
    } else if unlocked {
        LevelStatus::Unlocked
    } else {
        LevelStatus::Locked
    }
}

/// One cell per level of the whole session, scenario-major.
pub fn level_grid(session: &GameSession) -> Vec<LevelCell> {
    let per_scenario = session.config().total_levels_per_scenario;
    let state = session.state();
    (0..session.total_scenarios() * per_scenario)
        .map(|flat_index| {
            let key = LevelKey::new(flat_index / per_scenario, flat_index % per_scenario);
            LevelCell { flat_index, key, status: level_status(state, key) }
        })
        .collect()
}

/// First grid index of the page holding the current level.
pub fn current_page_start(session: &GameSession) -> usize {
    let state = session.state();
    let flat = state.scenario_index * session.config().total_levels_per_scenario + state.level_index;
    (flat / PAGE_SIZE) * PAGE_SIZE
}

/// The cells on the page starting at `start`.
pub fn page(cells: &[LevelCell], start: usize) -> &[LevelCell] {
    let start = start.min(cells.len());
    let end = (start + PAGE_SIZE).min(cells.len());
    &cells[start..end]
}

fn question_view(q: &Question) -> Value {
    json!({
        "company": q.company,
        "sector": q.sector,
        "statements": q.statements,
        "table": q.table.iter().map(|r| r.0.clone()).collect::<Vec<_>>(),
        "options": q.options,
    })
}

/// Everything the HUD draws in one frame, as JSON.
pub fn hud_snapshot(session: &GameSession) -> Value {
    let state = session.state();
    let round = session.last_round().map(|r| {
        json!({ "correct": r.correct, "delta": r.delta, "balance": r.balance })
    });
    json!({
        "player": session.player(),
        "phase": session.phase().to_string(),
        "paused": session.is_paused(),
        "balance": session.balance(),
        "bank_reserve": session.bank_reserve(),
        "timer": clock(session.timer_remaining().as_secs_f64()),
        "scenario": {
            "index": state.scenario_index,
            "name": state.scenario_name,
            "total": session.total_scenarios(),
            "remaining": session.remaining_scenarios().len(),
        },
        "level_index": state.level_index,
        "question_index": state.question_index,
        "streak": state.streak,
        "question": session.current_question().map(question_view),
        "last_round": round,
        "borrow_options": session.borrow_options(),
        "graph": state.balance_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(clock(600.0), "10:00");
        assert_eq!(clock(61.9), "01:01");
        assert_eq!(clock(-3.0), "00:00");
    }

    #[test]
    fn status_priority_follows_current_then_timeout_then_failure() {
        let mut state = ProgressionState::new(100);
        state.scenario_index = 1;
        state.level_index = 2;
        state.failed_levels.insert(LevelKey::new(0, 1));
        state.timeout_levels.insert(LevelKey::new(0, 1));
        state.completed_levels.insert(LevelKey::new(0, 0));

        assert_eq!(level_status(&state, LevelKey::new(1, 2)), LevelStatus::Current);
        assert_eq!(level_status(&state, LevelKey::new(0, 1)), LevelStatus::TimedOut);
        assert_eq!(level_status(&state, LevelKey::new(0, 0)), LevelStatus::Completed);
        assert_eq!(level_status(&state, LevelKey::new(0, 3)), LevelStatus::Unlocked);
        assert_eq!(level_status(&state, LevelKey::new(1, 3)), LevelStatus::Locked);
        assert_eq!(level_status(&state, LevelKey::new(2, 0)), LevelStatus::Locked);
    }

    #[test]
    fn page_clamps_to_grid() {
        let cells: Vec<LevelCell> = (0..10)
            .map(|i| LevelCell { flat_index: i, key: LevelKey::new(0, i), status: LevelStatus::Locked })
            .collect();
        assert_eq!(page(&cells, 0).len(), 7);
        assert_eq!(page(&cells, 7).len(), 3);
        assert!(page(&cells, 20).is_empty());
    }
}
