//! The progression state machine: one `GameSession` owns every piece of
//! mutable game state and is the only thing that changes it.
//!
//! ```text
//! AwaitingLevel ─load_level→ InQuestion ─submit_answer→ RoundOver ─advance→ InQuestion
//!                                  │                         │
//!                                  └→ Borrowing ─borrow→ ────┘
//! RoundOver ─advance (level done)→ EventGateCheck ─evaluate_events→ AwaitingLevel
//!                                                        ├→ CrisisActive → AwaitingLevel | Borrowing | GameOver
//!                                                        └→ WarActive    → AwaitingLevel | (reset)
//! Last level of the last scenario → GameComplete. Empty bank while in debt → GameOver.
//! ```
//!
//! The host drives the session with player actions and `tick(dt)`; nothing
//! here blocks or spawns. `reset` is the only way out of a terminal phase.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::game_engine::{
    config::GameConfig,
    crisis::{CrisisExit, CrisisProgress, CrisisSubsystem},
    economy::{BorrowOutcome, EconomyState},
    error::GameError,
    event_gate::{EventDecision, EventGate},
    events::GameEvent,
    models::{CrisisQuestion, Level, LevelKey, NarrativeEntry, Question, ScenarioName, StreakMode},
    question_bank::{GameData, QuestionBank},
    scenario_selector::ScenarioSelector,
    war::{WarOutcome, WarSubsystem},
};

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// The outcome of one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub correct: bool,
    pub delta: i64,
    pub balance: i64,
}

/// Where play resumes once a borrow clears the debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorrowResume {
    /// Show the round that pushed the balance negative.
    Round(RoundResult),
    /// Return to the level screen after a crisis.
    AfterCrisis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingLevel,
    InQuestion,
    Borrowing(BorrowResume),
    RoundOver,
    EventGateCheck,
    CrisisActive,
    WarActive,
    GameComplete,
    GameOver,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameComplete | Phase::GameOver)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::AwaitingLevel  => "awaiting level",
            Phase::InQuestion     => "in question",
            Phase::Borrowing(_)   => "borrowing",
            Phase::RoundOver      => "round over",
            Phase::EventGateCheck => "event gate check",
            Phase::CrisisActive   => "crisis active",
            Phase::WarActive      => "war active",
            Phase::GameComplete   => "game complete",
            Phase::GameOver       => "game over",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Progression state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub scenario_index: usize,
    pub scenario_name: Option<ScenarioName>,
    pub level_index: usize,
    pub question_index: usize,
    pub streak: u32,
    /// No wrong answer yet in the level being played.
    pub level_all_correct: bool,
    pub economy: EconomyState,
    pub completed_levels: BTreeSet<LevelKey>,
    pub failed_levels: BTreeSet<LevelKey>,
    pub timeout_levels: BTreeSet<LevelKey>,
    /// Balance snapshots for the progress graph.
    pub balance_history: Vec<i64>,
    pub is_game_over: bool,
}

impl ProgressionState {
    pub fn new(bank_reserve: u32) -> Self {
        ProgressionState {
            scenario_index: 0,
            scenario_name: None,
            level_index: 0,
            question_index: 0,
            streak: 0,
            level_all_correct: true,
            economy: EconomyState::new(0, bank_reserve),
            completed_levels: BTreeSet::new(),
            failed_levels: BTreeSet::new(),
            timeout_levels: BTreeSet::new(),
            balance_history: Vec::new(),
            is_game_over: false,
        }
    }

    pub fn current_key(&self) -> LevelKey {
        LevelKey::new(self.scenario_index, self.level_index)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One game session, from first question to game over or completion.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    bank: QuestionBank,
    crisis_pool: Vec<CrisisQuestion>,
    narratives: Vec<NarrativeEntry>,
    rng: StdRng,
    selector: ScenarioSelector,
    levels: Vec<Level>,
    state: ProgressionState,
    phase: Phase,
    last_round: Option<RoundResult>,
    gate: EventGate,
    crisis: CrisisSubsystem,
    war: WarSubsystem,
    timer_remaining: Duration,
    paused: bool,
    player: Option<String>,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Validate `config` against `data` and deal the first scenario.
    pub fn new(config: GameConfig, data: GameData) -> Result<Self, GameError> {
        config.validate()?;
        data.bank.ensure_playable(&config)?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let mut session = GameSession {
            selector: ScenarioSelector::new(data.bank.scenario_names()),
            state: ProgressionState::new(config.initial_bank_reserve),
            gate: EventGate::new(&config.events),
            crisis: CrisisSubsystem::new(&config.crisis),
            war: WarSubsystem::new(&config.war),
            timer_remaining: config.scenario_time_limit(),
            bank: data.bank,
            crisis_pool: data.crisis_questions,
            narratives: data.narratives,
            rng,
            levels: Vec::new(),
            phase: Phase::AwaitingLevel,
            last_round: None,
            paused: false,
            player: None,
            events: Vec::new(),
            config,
        };
        session.deal_first_scenario()?;
        Ok(session)
    }

    // ── accessors ───────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn balance(&self) -> i64 {
        self.state.economy.balance()
    }

    pub fn bank_reserve(&self) -> u32 {
        self.state.economy.bank_reserve()
    }

    pub fn total_scenarios(&self) -> usize {
        self.bank.scenario_count()
    }

    /// Scenarios not yet drawn this session.
    pub fn remaining_scenarios(&self) -> &[ScenarioName] {
        self.selector.remaining()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.state.level_index)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_level()?.questions.get(self.state.question_index)
    }

    pub fn last_round(&self) -> Option<RoundResult> {
        self.last_round
    }

    pub fn timer_remaining(&self) -> Duration {
        self.timer_remaining
    }

    pub fn borrow_options(&self) -> &[u32] {
        &self.config.borrow_amounts
    }

    pub fn crisis(&self) -> &CrisisSubsystem {
        &self.crisis
    }

    pub fn war(&self) -> &WarSubsystem {
        &self.war
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    /// Take every notification queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── player actions ──────────────────────────────────────────────────────

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), GameError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(GameError::InvalidCredentials);
        }
        info!(player = username, "player logged in");
        self.player = Some(username.to_string());
        Ok(())
    }

    /// Start the level at the current level index.
    pub fn load_level(&mut self) -> Result<(), GameError> {
        self.guard("load_level", matches!(self.phase, Phase::AwaitingLevel))?;
        if self.state.level_index >= self.levels.len() {
            error!(level = self.state.level_index, "no level to load");
            return Err(GameError::NoMoreLevels {
                level_index: self.state.level_index,
                available: self.levels.len(),
            });
        }
        self.state.question_index = 0;
        self.state.level_all_correct = true;
        self.phase = Phase::InQuestion;
        let key = self.state.current_key();
        info!(%key, "level started");
        self.events.push(GameEvent::LevelStarted { key });
        Ok(())
    }

    /// Answer the current question with one of its options.
    ///
    /// A negative balance parks the session in `Borrowing` before the round
    /// is shown; otherwise the round is over.
    pub fn submit_answer(&mut self, selected: &str) -> Result<RoundResult, GameError> {
        self.guard("submit_answer", matches!(self.phase, Phase::InQuestion))?;
        let correct = match self.current_question() {
            Some(question) => question.is_correct(selected),
            None => {
                return Err(GameError::NoMoreLevels {
                    level_index: self.state.level_index,
                    available: self.levels.len(),
                })
            }
        };

        let delta = if correct { self.config.profit_points } else { self.config.loss_points };
        let balance =
            self.state
                .economy
                .apply_answer(correct, self.config.profit_points, self.config.loss_points);
        debug!(correct, delta, balance, "answer submitted");
        self.events.push(GameEvent::QuestionAnswered { correct, delta, balance });

        let result = RoundResult { correct, delta, balance };
        if balance < 0 {
            self.enter_borrowing(BorrowResume::Round(result));
        } else {
            self.finish_round(result);
        }
        Ok(result)
    }

    /// Move on from the round-over screen: next question, next level, or
    /// next scenario.
    pub fn advance(&mut self) -> Result<(), GameError> {
        self.guard("advance", matches!(self.phase, Phase::RoundOver))?;
        self.state.question_index += 1;
        let level_len = self.current_level().map_or(0, Level::len);
        if self.state.question_index < level_len {
            self.phase = Phase::InQuestion;
            return Ok(());
        }
        self.complete_level()
    }

    /// Take `amount` from the bank while in debt.
    pub fn borrow(&mut self, amount: u32) -> Result<BorrowOutcome, GameError> {
        let Phase::Borrowing(resume) = self.phase else {
            return Err(GameError::InvalidAction { action: "borrow", phase: self.phase });
        };
        let outcome = self.state.economy.borrow(amount);
        let (balance, bank_reserve) = (self.balance(), self.bank_reserve());
        info!(?outcome, balance, bank_reserve, "borrowed");
        self.events.push(GameEvent::Borrowed { outcome, balance, bank_reserve });

        if !self.state.economy.is_in_debt() {
            match resume {
                BorrowResume::Round(result) => {
                    self.finish_round(RoundResult { balance, ..result });
                }
                BorrowResume::AfterCrisis => self.resume_after_event(),
            }
        } else if bank_reserve == 0 {
            self.game_over();
        }
        Ok(outcome)
    }

    /// Refuse to borrow; the game ends.
    pub fn decline_borrow(&mut self) -> Result<(), GameError> {
        self.guard("decline_borrow", matches!(self.phase, Phase::Borrowing(_)))?;
        self.game_over();
        Ok(())
    }

    /// Roll for a crisis or war at the level boundary.
    pub fn evaluate_events(&mut self) -> Result<EventDecision, GameError> {
        self.guard("evaluate_events", matches!(self.phase, Phase::EventGateCheck))?;
        let decision = self.gate.evaluate(&mut self.rng)?;
        match decision {
            EventDecision::None => self.phase = Phase::AwaitingLevel,
            EventDecision::Crisis if self.crisis_pool.is_empty() => {
                warn!("crisis drawn but no crisis questions are loaded; skipping");
                self.gate.release();
                self.phase = Phase::AwaitingLevel;
                return Ok(EventDecision::None);
            }
            EventDecision::Crisis => {
                self.crisis.start(&self.crisis_pool, &mut self.rng);
                self.phase = Phase::CrisisActive;
                self.events.push(GameEvent::CrisisStarted);
            }
            EventDecision::War => {
                let required_streak = self.war.start(&self.narratives, &mut self.rng);
                self.phase = Phase::WarActive;
                self.events.push(GameEvent::WarStarted { required_streak });
            }
        }
        Ok(decision)
    }

    /// Answer the current crisis question. Returns the exit once the crisis
    /// is over.
    pub fn answer_crisis(&mut self, selected: bool) -> Result<Option<CrisisExit>, GameError> {
        self.guard("answer_crisis", matches!(self.phase, Phase::CrisisActive))?;
        let Some(exit) = self.crisis.answer(selected, &self.state.economy) else {
            return Ok(None);
        };
        let balance = self.balance();
        self.state.balance_history.push(balance);
        self.events.push(GameEvent::CrisisEnded { total_loss: self.crisis.total_loss(), exit });
        match exit {
            CrisisExit::Completed => self.resume_after_event(),
            CrisisExit::BorrowRequired => self.enter_borrowing(BorrowResume::AfterCrisis),
        }
        Ok(Some(exit))
    }

    /// Dismiss the war narrative. Falling short of the required streak
    /// restarts the whole game.
    pub fn acknowledge_war(&mut self) -> Result<WarOutcome, GameError> {
        self.guard("acknowledge_war", matches!(self.phase, Phase::WarActive))?;
        let outcome = self
            .war
            .acknowledge(self.state.streak)
            .ok_or(GameError::InvalidAction { action: "acknowledge_war", phase: self.phase })?;
        self.events.push(GameEvent::WarEnded { outcome });
        match outcome {
            WarOutcome::Survived => self.resume_after_event(),
            WarOutcome::Defeated => self.reset()?,
        }
        Ok(outcome)
    }

    /// End the current scenario early because its timer ran out.
    pub fn handle_timeout(&mut self) -> Result<(), GameError> {
        self.guard(
            "handle_timeout",
            matches!(self.phase, Phase::AwaitingLevel | Phase::InQuestion | Phase::RoundOver),
        )?;
        let key = self.state.current_key();
        warn!(%key, "scenario timed out");
        self.state.timeout_levels.insert(key);
        let balance = self.balance();
        self.state.balance_history.push(balance);
        self.end_scenario(true)
    }

    /// Per-frame pulse from the host. Drives the crisis loss clock and the
    /// scenario timer; ignored while paused or after the game has ended.
    pub fn tick(&mut self, dt: Duration) -> Result<(), GameError> {
        if self.paused || self.phase.is_terminal() {
            return Ok(());
        }
        match self.phase {
            Phase::CrisisActive => {
                if let CrisisProgress::GameOver =
                    self.crisis.advance_time(dt, &mut self.state.economy)
                {
                    self.game_over();
                }
            }
            Phase::InQuestion | Phase::RoundOver => {
                self.timer_remaining = self.timer_remaining.saturating_sub(dt);
                if self.timer_remaining.is_zero() {
                    self.handle_timeout()?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Freeze time. Refused once the game has ended.
    pub fn pause(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Throw away all progress and start over with a fresh scenario draw.
    /// Callable from any phase.
    pub fn reset(&mut self) -> Result<(), GameError> {
        info!("resetting game");
        self.crisis.cancel();
        self.war.cancel();
        self.gate.release();
        self.state = ProgressionState::new(self.config.initial_bank_reserve);
        self.selector = ScenarioSelector::new(self.bank.scenario_names());
        self.levels.clear();
        self.last_round = None;
        self.paused = false;
        self.phase = Phase::AwaitingLevel;
        self.events.push(GameEvent::GameReset);
        self.deal_first_scenario()
    }

    // ── internal transitions ────────────────────────────────────────────────

    fn guard(&self, action: &'static str, allowed: bool) -> Result<(), GameError> {
        if allowed {
            Ok(())
        } else {
            Err(GameError::InvalidAction { action, phase: self.phase })
        }
    }

    fn deal_first_scenario(&mut self) -> Result<(), GameError> {
        if !self.start_scenario()? {
            self.complete_game();
        }
        Ok(())
    }

    /// Draw the next scenario and build its levels. `false` when none remain.
    fn start_scenario(&mut self) -> Result<bool, GameError> {
        let name = match self.selector.pick_next(&mut self.rng) {
            Ok(name) => name,
            Err(GameError::NoScenariosLeft) => return Ok(false),
            Err(e) => return Err(e),
        };
        self.levels = self.bank.levels_for(&name, &self.config, &mut self.rng)?;
        self.state.level_index = 0;
        self.state.question_index = 0;
        self.state.level_all_correct = true;
        self.state.scenario_name = Some(name.clone());
        self.timer_remaining = self.config.scenario_time_limit();
        info!(
            scenario = %name,
            index = self.state.scenario_index,
            total = self.total_scenarios(),
            "scenario started"
        );
        self.events.push(GameEvent::ScenarioStarted {
            scenario_index: self.state.scenario_index,
            name,
        });
        Ok(true)
    }

    fn finish_round(&mut self, result: RoundResult) {
        if !result.correct {
            self.state.level_all_correct = false;
        }
        if self.config.streak_mode == StreakMode::PerQuestion {
            self.state.streak = if result.correct { self.state.streak + 1 } else { 0 };
        }
        self.state.balance_history.push(result.balance);
        self.last_round = Some(result);
        self.phase = Phase::RoundOver;
        self.events.push(GameEvent::RoundOver {
            correct: result.correct,
            delta: result.delta,
            balance: result.balance,
        });
    }

    fn complete_level(&mut self) -> Result<(), GameError> {
        let all_correct = self.state.level_all_correct;
        if self.config.streak_mode == StreakMode::PerLevel {
            self.state.streak = if all_correct { self.state.streak + 1 } else { 0 };
        }
        let key = self.state.current_key();
        if all_correct {
            self.state.completed_levels.insert(key);
        } else {
            self.state.failed_levels.insert(key);
        }
        info!(%key, all_correct, streak = self.state.streak, "level completed");
        self.events.push(GameEvent::LevelCompleted { key, all_correct, streak: self.state.streak });

        self.state.level_index += 1;
        self.state.question_index = 0;
        self.state.level_all_correct = true;
        if self.state.level_index >= self.config.total_levels_per_scenario {
            return self.end_scenario(false);
        }
        self.phase = Phase::EventGateCheck;
        Ok(())
    }

    fn end_scenario(&mut self, timed_out: bool) -> Result<(), GameError> {
        self.events.push(GameEvent::ScenarioComplete {
            scenario_index: self.state.scenario_index,
            timed_out,
        });
        self.state.scenario_index += 1;
        if self.start_scenario()? {
            self.phase = Phase::EventGateCheck;
        } else {
            self.complete_game();
        }
        Ok(())
    }

    fn enter_borrowing(&mut self, resume: BorrowResume) {
        let (balance, bank_reserve) = (self.balance(), self.bank_reserve());
        self.events.push(GameEvent::BorrowRequired { balance, bank_reserve });
        if bank_reserve == 0 {
            warn!(balance, "in debt with an empty bank");
            self.game_over();
        } else {
            self.phase = Phase::Borrowing(resume);
        }
    }

    fn resume_after_event(&mut self) {
        self.gate.release();
        self.phase = Phase::AwaitingLevel;
    }

    fn complete_game(&mut self) {
        let balance = self.balance();
        info!(balance, "game complete");
        self.phase = Phase::GameComplete;
        self.events.push(GameEvent::GameComplete { balance });
    }

    fn game_over(&mut self) {
        let balance = self.balance();
        warn!(balance, bank_reserve = self.bank_reserve(), "game over");
        self.state.is_game_over = true;
        self.paused = false;
        self.phase = Phase::GameOver;
        self.events.push(GameEvent::GameOver { balance });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_game_complete_and_game_over_are_terminal() {
        let round = RoundResult { correct: false, delta: -4, balance: -4 };
        for phase in [
            Phase::AwaitingLevel,
            Phase::InQuestion,
            Phase::Borrowing(BorrowResume::Round(round)),
            Phase::Borrowing(BorrowResume::AfterCrisis),
            Phase::RoundOver,
            Phase::EventGateCheck,
            Phase::CrisisActive,
            Phase::WarActive,
        ] {
            assert!(!phase.is_terminal(), "{phase} should not be terminal");
        }
        assert!(Phase::GameComplete.is_terminal());
        assert!(Phase::GameOver.is_terminal());
    }

    #[test]
    fn fresh_state_starts_at_zero_with_full_bank() {
        let state = ProgressionState::new(100);
        assert_eq!(state.economy.balance(), 0);
        assert_eq!(state.economy.bank_reserve(), 100);
        assert_eq!(state.current_key(), LevelKey::new(0, 0));
        assert!(state.level_all_correct);
        assert!(!state.is_game_over);
    }

    #[test]
    fn invalid_action_names_the_phase() {
        let err = GameError::InvalidAction { action: "advance", phase: Phase::CrisisActive };
        assert_eq!(err.to_string(), "'advance' is not allowed while crisis active");
    }
}
