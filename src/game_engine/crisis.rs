//! The crisis mini-event: a timed passive loss while the player works
//! through a handful of true/false questions.
//!
//! Loss accrues on the clock alone. Answers only advance the question
//! counter; their correctness is tallied for display and never changes the
//! charge. The crisis ends when the last question is answered.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::game_engine::{
    config::CrisisSettings,
    economy::{CrisisTick, EconomyState},
    helpers::pick_with_replacement,
    models::CrisisQuestion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrisisPhase {
    Idle,
    Active,
    Resolved,
}

/// How a finished crisis hands control back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrisisExit {
    /// Balance is non-negative; play resumes.
    Completed,
    /// Balance ended negative; the player must borrow first.
    BorrowRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrisisProgress {
    /// `ticks` losses were charged during this time step.
    Running { ticks: u32 },
    /// Balance and bank reserve are exhausted.
    GameOver,
}

#[derive(Debug, Clone)]
pub struct CrisisSubsystem {
    total_questions: usize,
    loss_per_tick: u32,
    interval: Duration,
    phase: CrisisPhase,
    questions: Vec<CrisisQuestion>,
    answered: usize,
    correct: usize,
    loss_timer: Duration,
    total_loss: u64,
}

impl CrisisSubsystem {
    pub fn new(settings: &CrisisSettings) -> Self {
        CrisisSubsystem {
            total_questions: settings.total_questions,
            loss_per_tick: settings.loss_per_tick,
            interval: settings.loss_interval(),
            phase: CrisisPhase::Idle,
            questions: Vec::new(),
            answered: 0,
            correct: 0,
            loss_timer: Duration::ZERO,
            total_loss: 0,
        }
    }

    /// Draw this crisis's questions (with replacement) and start the clock.
    pub fn start<R: Rng>(&mut self, pool: &[CrisisQuestion], rng: &mut R) {
        if pool.is_empty() {
            warn!("crisis started with an empty question pool");
        }
        self.questions = pick_with_replacement(pool, self.total_questions, rng);
        self.answered = 0;
        self.correct = 0;
        self.loss_timer = Duration::ZERO;
        self.total_loss = 0;
        self.phase = CrisisPhase::Active;
        info!(questions = self.total_questions, "crisis started");
    }

    /// Advance the loss clock by `dt`, charging one tick per elapsed interval.
    pub fn advance_time(&mut self, dt: Duration, economy: &mut EconomyState) -> CrisisProgress {
        if self.phase != CrisisPhase::Active {
            return CrisisProgress::Running { ticks: 0 };
        }
        self.loss_timer += dt;
        let mut ticks = 0;
        while self.loss_timer >= self.interval {
            self.loss_timer -= self.interval;
            match economy.apply_crisis_tick(self.loss_per_tick) {
                CrisisTick::Charged { .. } => {
                    ticks += 1;
                    self.total_loss += u64::from(self.loss_per_tick);
                    debug!(total_loss = self.total_loss, balance = economy.balance(), "crisis tick");
                }
                CrisisTick::GameOver => {
                    self.phase = CrisisPhase::Resolved;
                    warn!(total_loss = self.total_loss, "crisis exhausted all funds");
                    return CrisisProgress::GameOver;
                }
            }
        }
        CrisisProgress::Running { ticks }
    }

    /// Record an answer to the current question. Returns the exit once the
    /// last question has been answered; the clock stops at that point.
    pub fn answer(&mut self, selected: bool, economy: &EconomyState) -> Option<CrisisExit> {
        if self.phase != CrisisPhase::Active {
            return None;
        }
        if self.current_question().is_some_and(|q| q.answer == selected) {
            self.correct += 1;
        }
        self.answered += 1;
        if self.answered < self.total_questions {
            return None;
        }

        self.phase = CrisisPhase::Resolved;
        info!(total_loss = self.total_loss, correct = self.correct, "crisis completed");
        Some(if economy.is_in_debt() {
            CrisisExit::BorrowRequired
        } else {
            CrisisExit::Completed
        })
    }

    /// Tear down a running crisis without resolving it.
    pub fn cancel(&mut self) {
        self.phase = CrisisPhase::Idle;
        self.questions.clear();
        self.loss_timer = Duration::ZERO;
    }

    pub fn phase(&self) -> CrisisPhase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&CrisisQuestion> {
        self.questions.get(self.answered)
    }

    pub fn questions_answered(&self) -> usize {
        self.answered
    }

    pub fn correct_answers(&self) -> usize {
        self.correct
    }

    pub fn total_loss(&self) -> u64 {
        self.total_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> Vec<CrisisQuestion> {
        vec![
            CrisisQuestion { question: "Cash is an asset".into(), answer: true },
            CrisisQuestion { question: "Revenue is a liability".into(), answer: false },
        ]
    }

    fn running(settings: CrisisSettings, seed: u64) -> CrisisSubsystem {
        let mut crisis = CrisisSubsystem::new(&settings);
        crisis.start(&pool(), &mut StdRng::seed_from_u64(seed));
        crisis
    }

    #[test]
    fn five_ticks_then_five_answers_resolves_without_borrow() {
        let mut crisis = running(CrisisSettings::default(), 1);
        let mut economy = EconomyState::new(50, 100);
        for _ in 0..5 {
            assert_eq!(
                crisis.advance_time(Duration::from_secs(1), &mut economy),
                CrisisProgress::Running { ticks: 1 }
            );
        }
        assert_eq!(economy.balance(), 45);

        for _ in 0..4 {
            assert_eq!(crisis.answer(true, &economy), None);
        }
        assert_eq!(crisis.answer(false, &economy), Some(CrisisExit::Completed));
        assert_eq!(crisis.phase(), CrisisPhase::Resolved);
        assert_eq!(crisis.total_loss(), 5);
    }

    #[test]
    fn answers_do_not_stop_or_change_the_loss() {
        let mut crisis = running(CrisisSettings::default(), 2);
        let mut economy = EconomyState::new(10, 0);
        crisis.answer(true, &economy);
        crisis.advance_time(Duration::from_millis(2500), &mut economy);
        assert_eq!(economy.balance(), 8);
        crisis.answer(false, &economy);
        crisis.advance_time(Duration::from_millis(500), &mut economy);
        assert_eq!(economy.balance(), 7);
    }

    #[test]
    fn clock_stops_once_resolved() {
        let mut crisis = running(CrisisSettings { total_questions: 1, ..CrisisSettings::default() }, 3);
        let mut economy = EconomyState::new(10, 0);
        assert!(crisis.answer(true, &economy).is_some());
        crisis.advance_time(Duration::from_secs(10), &mut economy);
        assert_eq!(economy.balance(), 10);
    }

    #[test]
    fn exhausting_reserve_mid_tick_is_game_over() {
        let mut crisis = running(CrisisSettings { loss_per_tick: 5, ..CrisisSettings::default() }, 4);
        let mut economy = EconomyState::new(3, 4);
        assert_eq!(
            crisis.advance_time(Duration::from_secs(1), &mut economy),
            CrisisProgress::Running { ticks: 1 }
        );
        assert_eq!((economy.balance(), economy.bank_reserve()), (0, 2));
        assert_eq!(crisis.advance_time(Duration::from_secs(1), &mut economy), CrisisProgress::GameOver);
    }

    #[test]
    fn ending_in_debt_requires_borrow() {
        let mut crisis = running(CrisisSettings { total_questions: 1, ..CrisisSettings::default() }, 5);
        let economy = EconomyState::new(-3, 50);
        assert_eq!(crisis.answer(true, &economy), Some(CrisisExit::BorrowRequired));
    }

    #[test]
    fn correct_answers_are_tallied() {
        let mut crisis = running(CrisisSettings::default(), 6);
        let economy = EconomyState::new(0, 0);
        let mut expected = 0;
        while crisis.phase() == CrisisPhase::Active {
            let truth = crisis.current_question().map(|q| q.answer).unwrap();
            expected += 1;
            crisis.answer(truth, &economy);
        }
        assert_eq!(crisis.correct_answers(), expected);
        assert_eq!(crisis.questions_answered(), 5);
    }
}
