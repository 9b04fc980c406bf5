use tracing::debug;

use crate::error::AgentError;
use crate::game::{GameState, Player};

use super::agent::{terminal_fallback, Agent};
use super::heuristic::{Heuristic, ThreatHeuristic};

/// Minimax hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    /// Plies searched below the root, counting the agent's own move.
    pub search_depth: usize,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig { search_depth: 4 }
    }
}

/// Full-width depth-limited minimax.
///
/// No pruning or iterative deepening: the tree grows as 7^depth, so depth is
/// the only lever on cost. Leaves are always scored from the perspective of
/// the player who was to move at the root.
pub struct MinimaxAgent {
    depth: usize,
    heuristic: Box<dyn Heuristic>,
    nodes: u64,
}

impl MinimaxAgent {
    pub fn new(depth: usize) -> Result<Self, AgentError> {
        Self::with_heuristic(depth, Box::new(ThreatHeuristic::default()))
    }

    pub fn with_heuristic(depth: usize, heuristic: Box<dyn Heuristic>) -> Result<Self, AgentError> {
        if depth == 0 {
            return Err(AgentError::EmptyBudget(depth));
        }
        Ok(MinimaxAgent {
            depth,
            heuristic,
            nodes: 0,
        })
    }

    pub fn from_config(config: &MinimaxConfig) -> Result<Self, AgentError> {
        Self::new(config.search_depth)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Minimax value of every legal column at the root, ascending by column.
    pub fn column_values(&mut self, state: &GameState) -> Vec<(usize, f64)> {
        let me = state.current_player();
        state
            .successors()
            .map(|(col, next)| (col, self.min_value(&next, self.depth - 1, me)))
            .collect()
    }

    fn max_value(&mut self, state: &GameState, depth: usize, me: Player) -> f64 {
        self.nodes += 1;
        if state.is_terminal() || depth == 0 {
            return self.heuristic.evaluate(state, me);
        }

        let mut value = f64::NEG_INFINITY;
        for (_, next) in state.successors() {
            value = value.max(self.min_value(&next, depth - 1, me));
        }
        value
    }

    fn min_value(&mut self, state: &GameState, depth: usize, me: Player) -> f64 {
        self.nodes += 1;
        if state.is_terminal() || depth == 0 {
            return self.heuristic.evaluate(state, me);
        }

        let mut value = f64::INFINITY;
        for (_, next) in state.successors() {
            value = value.min(self.max_value(&next, depth - 1, me));
        }
        value
    }
}

impl Agent for MinimaxAgent {
    fn choose_move(&mut self, state: &GameState) -> Result<usize, AgentError> {
        if state.is_terminal() {
            return terminal_fallback(state);
        }

        self.nodes = 0;
        let mut best: Option<(usize, f64)> = None;
        for (col, value) in self.column_values(state) {
            // Strict comparison keeps the lowest column on ties.
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((col, value)),
            }
        }

        let (col, value) = best.ok_or(AgentError::NoLegalMoves)?;
        debug!(col, value, nodes = self.nodes, depth = self.depth, "minimax move");
        Ok(col)
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}
