use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::game_engine::{config::EventSettings, error::GameError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDecision {
    None,
    Crisis,
    War,
}

/// Decides, at a level boundary, whether a crisis or war interrupts play.
///
/// Once an event is chosen the gate stays engaged until `release` is called;
/// evaluating again before that is rejected rather than queued.
#[derive(Debug, Clone)]
pub struct EventGate {
    crisis_probability: f64,
    war_probability: f64,
    engaged: bool,
}

impl EventGate {
    pub fn new(settings: &EventSettings) -> Self {
        EventGate {
            crisis_probability: settings.crisis_probability,
            war_probability: settings.war_probability,
            engaged: false,
        }
    }

    /// First draw: does any event fire (`crisis_probability`)? Second draw:
    /// is it a war (`war_probability`) or a crisis?
    pub fn evaluate<R: Rng>(&mut self, rng: &mut R) -> Result<EventDecision, GameError> {
        if self.engaged {
            warn!("event gate evaluated while an event is still running");
            return Err(GameError::EventInProgress);
        }
        if !rng.gen_bool(self.crisis_probability) {
            return Ok(EventDecision::None);
        }
        let decision = if rng.gen_bool(self.war_probability) {
            EventDecision::War
        } else {
            EventDecision::Crisis
        };
        self.engaged = true;
        debug!(?decision, "event gate fired");
        Ok(decision)
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn release(&mut self) {
        self.engaged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gate(crisis_probability: f64, war_probability: f64) -> EventGate {
        EventGate::new(&EventSettings { crisis_probability, war_probability })
    }

    #[test]
    fn certain_event_without_war_is_always_crisis() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut g = gate(1.0, 0.0);
        for _ in 0..200 {
            assert_eq!(g.evaluate(&mut rng).unwrap(), EventDecision::Crisis);
            g.release();
        }
    }

    #[test]
    fn certain_war_is_always_war() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut g = gate(1.0, 1.0);
        for _ in 0..50 {
            assert_eq!(g.evaluate(&mut rng).unwrap(), EventDecision::War);
            g.release();
        }
    }

    #[test]
    fn zero_probability_never_fires() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut g = gate(0.0, 1.0);
        for _ in 0..500 {
            assert_eq!(g.evaluate(&mut rng).unwrap(), EventDecision::None);
        }
        assert!(!g.is_engaged());
    }

    #[test]
    fn reentry_while_engaged_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut g = gate(1.0, 0.0);
        g.evaluate(&mut rng).unwrap();
        assert!(matches!(g.evaluate(&mut rng), Err(GameError::EventInProgress)));
        g.release();
        assert!(g.evaluate(&mut rng).is_ok());
    }

    #[test]
    fn default_rate_fires_occasionally() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut g = gate(0.15, 0.0);
        let mut fired = 0;
        for _ in 0..1000 {
            if g.evaluate(&mut rng).unwrap() != EventDecision::None {
                fired += 1;
                g.release();
            }
        }
        assert!((80..=220).contains(&fired), "fired {fired}/1000 at p=0.15");
    }
}
