use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game_engine::{config::WarSettings, models::NarrativeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarPhase {
    Idle,
    Presenting,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarOutcome {
    /// The streak met the requirement; play continues unchanged.
    Survived,
    /// The streak fell short; the whole game restarts.
    Defeated,
}

/// The war mini-event: a one-shot streak check behind a narrative screen.
#[derive(Debug, Clone)]
pub struct WarSubsystem {
    streak_min: u32,
    streak_max: u32,
    phase: WarPhase,
    required_streak: u32,
    narrative: Option<NarrativeEntry>,
}

impl WarSubsystem {
    pub fn new(settings: &WarSettings) -> Self {
        WarSubsystem {
            streak_min: settings.required_streak_min,
            streak_max: settings.required_streak_max,
            phase: WarPhase::Idle,
            required_streak: 0,
            narrative: None,
        }
    }

    /// Draw the required streak from `[min, max)` and present the narrative.
    /// The last entry of `narratives` is the one shown.
    pub fn start<R: Rng>(&mut self, narratives: &[NarrativeEntry], rng: &mut R) -> u32 {
        self.required_streak = rng.gen_range(self.streak_min..self.streak_max);
        self.narrative = narratives.last().cloned();
        self.phase = WarPhase::Presenting;
        info!(required_streak = self.required_streak, "war started");
        self.required_streak
    }

    /// The player dismissed the narrative; judge `current_streak`.
    pub fn acknowledge(&mut self, current_streak: u32) -> Option<WarOutcome> {
        if self.phase != WarPhase::Presenting {
            return None;
        }
        self.phase = WarPhase::Resolved;
        let outcome = if current_streak < self.required_streak {
            WarOutcome::Defeated
        } else {
            WarOutcome::Survived
        };
        info!(current_streak, required_streak = self.required_streak, ?outcome, "war resolved");
        Some(outcome)
    }

    pub fn cancel(&mut self) {
        self.phase = WarPhase::Idle;
        self.narrative = None;
    }

    pub fn phase(&self) -> WarPhase {
        self.phase
    }

    pub fn required_streak(&self) -> u32 {
        self.required_streak
    }

    pub fn narrative(&self) -> Option<&NarrativeEntry> {
        self.narrative.as_ref()
    }
}
