use rand::Rng;
use tracing::debug;

use crate::game_engine::{error::GameError, models::ScenarioName};

/// The scenarios not yet played this session. Drawn without replacement.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSelector {
    remaining: Vec<ScenarioName>,
}

impl ScenarioSelector {
    pub fn new(names: Vec<ScenarioName>) -> Self {
        ScenarioSelector { remaining: names }
    }

    /// Pick one remaining scenario uniformly at random and remove it.
    ///
    /// `NoScenariosLeft` once every scenario has been drawn; callers treat
    /// that as the game being complete.
    pub fn pick_next<R: Rng>(&mut self, rng: &mut R) -> Result<ScenarioName, GameError> {
        if self.remaining.is_empty() {
            return Err(GameError::NoScenariosLeft);
        }
        let index = rng.gen_range(0..self.remaining.len());
        let name = self.remaining.remove(index);
        debug!(scenario = %name, remaining = self.remaining.len(), "scenario picked");
        Ok(name)
    }

    pub fn remaining(&self) -> &[ScenarioName] {
        &self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn names(n: usize) -> Vec<ScenarioName> {
        (0..n).map(|i| format!("Scenario {i}")).collect()
    }

    #[test]
    fn every_scenario_is_drawn_exactly_once() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut selector = ScenarioSelector::new(names(6));
        let mut drawn = HashSet::new();
        while !selector.is_exhausted() {
            let name = selector.pick_next(&mut rng).unwrap();
            assert!(drawn.insert(name.clone()), "{name} drawn twice");
        }
        assert_eq!(drawn, names(6).into_iter().collect());
        assert!(matches!(selector.pick_next(&mut rng), Err(GameError::NoScenariosLeft)));
    }

    #[test]
    fn remaining_shrinks_with_each_draw() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut selector = ScenarioSelector::new(names(3));
        let first = selector.pick_next(&mut rng).unwrap();
        assert_eq!(selector.remaining().len(), 2);
        assert!(!selector.remaining().contains(&first));
    }

    #[test]
    fn empty_selector_signals_no_scenarios_left() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut selector = ScenarioSelector::default();
        assert!(matches!(selector.pick_next(&mut rng), Err(GameError::NoScenariosLeft)));
    }

    #[test]
    fn draw_order_depends_on_seed() {
        let order = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut selector = ScenarioSelector::new(names(8));
            (0..8).map(|_| selector.pick_next(&mut rng).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(order(4), order(4));
        let distinct: HashSet<_> = (0..10).map(order).collect();
        assert!(distinct.len() > 1, "ten seeds all drew the same order");
    }
}
