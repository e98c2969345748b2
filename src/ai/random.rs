use crate::game::Game;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;

/// An agent that drops into a uniformly random open column.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible agent for tests and benchmarks.
    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_column(&mut self, game: &Game) -> Option<usize> {
        let columns = game.grid().open_columns();
        if columns.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..columns.len());
        Some(columns[idx])
    }

    fn name(&self) -> &str {
        "Random"
    }
}
