use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::error::AgentError;
use crate::game::GameState;

use super::agent::{terminal_fallback, Agent};

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    /// Use a caller-supplied random source.
    pub fn new(rng: StdRng) -> Self {
        RandomAgent { rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl Agent for RandomAgent {
    fn choose_move(&mut self, state: &GameState) -> Result<usize, AgentError> {
        if state.is_terminal() {
            return terminal_fallback(state);
        }
        state
            .legal_actions()
            .choose(&mut self.rng)
            .copied()
            .ok_or(AgentError::NoLegalMoves)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
