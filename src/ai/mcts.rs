//! UCT tree search.
//!
//! Each simulation runs the usual four phases:
//! 1. Selection: descend through known nodes by the UCT score
//! 2. Expansion: register the first unknown node reached, then stop
//! 3. Rollout: play out with a cheap fixed policy
//! 4. Backpropagation: credit the root player's result to every edge taken
//!
//! The node table is scratch space keyed by `(BoardKey, Player)` and is
//! cleared at the start of every search.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::AgentError;
use crate::game::{BoardKey, GameState, Player, COLS};

use super::agent::{best_legal, terminal_fallback, Agent};

/// Center-outward column preference used by the default rollout.
pub const ROLLOUT_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Move policy used during rollouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloutPolicy {
    /// First free column in [`ROLLOUT_ORDER`]. Deterministic.
    #[default]
    CenterFirst,
    /// Uniform over legal columns, drawn from the searcher's RNG.
    Random,
}

/// MCTS hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Simulations per decision.
    pub simulations: usize,
    /// Exploration constant `C` in the UCT formula.
    pub exploration: f64,
    /// Maximum plies played in a single rollout.
    pub rollout_limit: usize,
    pub rollout: RolloutPolicy,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            simulations: 500,
            exploration: 1.4,
            rollout_limit: 200,
            rollout: RolloutPolicy::CenterFirst,
        }
    }
}

type NodeKey = (BoardKey, Player);

#[derive(Debug, Clone, Copy, Default)]
struct EdgeStats {
    visits: u32,
    reward: f64,
}

#[derive(Debug, Clone, Default)]
struct NodeStats {
    visits: u32,
    edges: [EdgeStats; COLS],
}

impl NodeStats {
    fn uct(&self, action: usize, exploration: f64) -> f64 {
        let edge = &self.edges[action];
        if edge.visits == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(edge.visits);
        edge.reward / n + exploration * ((f64::from(self.visits) + 1.0).ln() / n).sqrt()
    }
}

/// Reusable UCT searcher. The table is rebuilt on every [`UctSearch::search`].
#[derive(Debug, Default)]
pub struct UctSearch {
    rollout: RolloutPolicy,
    rollout_limit: usize,
    nodes: HashMap<NodeKey, NodeStats>,
}

impl UctSearch {
    pub fn new(rollout: RolloutPolicy, rollout_limit: usize) -> Self {
        UctSearch {
            rollout,
            rollout_limit,
            nodes: HashMap::new(),
        }
    }

    /// Nodes expanded by the last search.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Mean root-player reward per column after `simulations` playouts.
    ///
    /// Columns never sampled (or illegal) report 0.
    pub fn search(
        &mut self,
        root: &GameState,
        simulations: usize,
        exploration: f64,
        rng: &mut StdRng,
    ) -> Result<[f64; COLS], AgentError> {
        if simulations == 0 {
            return Err(AgentError::EmptyBudget(simulations));
        }

        self.nodes.clear();
        let me = root.current_player();
        for _ in 0..simulations {
            self.simulate(root, me, exploration, rng);
        }

        let mut values = [0.0; COLS];
        if let Some(node) = self.nodes.get(&(root.key(), me)) {
            for col in root.legal_actions() {
                let edge = node.edges[col];
                if edge.visits > 0 {
                    values[col] = edge.reward / f64::from(edge.visits);
                }
            }
        }
        Ok(values)
    }

    fn simulate(&mut self, root: &GameState, me: Player, exploration: f64, rng: &mut StdRng) {
        let mut current = *root;
        let mut path: Vec<(NodeKey, usize)> = Vec::new();

        loop {
            let legal = current.legal_actions();
            if current.is_terminal() || legal.is_empty() {
                break;
            }

            let key = (current.key(), current.current_player());
            let Some(node) = self.nodes.get(&key) else {
                self.nodes.insert(key, NodeStats::default());
                break;
            };

            let action = select(node, &legal, exploration);
            path.push((key, action));
            if current.apply_move_mut(action).is_err() {
                break;
            }
        }

        let reward = match self.playout(current, rng).winner() {
            Some(winner) if winner == me => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        };

        for (key, action) in path {
            if let Some(node) = self.nodes.get_mut(&key) {
                node.visits += 1;
                node.edges[action].visits += 1;
                node.edges[action].reward += reward;
            }
        }
    }

    fn playout(&self, mut state: GameState, rng: &mut StdRng) -> GameState {
        let mut steps = 0;
        while !state.is_terminal() && steps < self.rollout_limit {
            let legal = state.legal_actions();
            let action = match self.rollout {
                RolloutPolicy::CenterFirst => ROLLOUT_ORDER
                    .iter()
                    .copied()
                    .find(|col| legal.contains(col))
                    .or_else(|| legal.first().copied()),
                RolloutPolicy::Random => legal.choose(rng).copied(),
            };
            let Some(action) = action else { break };
            if state.apply_move_mut(action).is_err() {
                break;
            }
            steps += 1;
        }
        state
    }
}

/// Legal action with the highest UCT score; unvisited edges come first and
/// the lowest column wins ties.
fn select(node: &NodeStats, legal: &[usize], exploration: f64) -> usize {
    let mut best = legal[0];
    let mut best_score = f64::NEG_INFINITY;
    for &col in legal {
        let score = node.uct(col, exploration);
        if score > best_score {
            best = col;
            best_score = score;
        }
    }
    best
}

/// Agent that plays the argmax of a fresh UCT search every turn.
pub struct MctsAgent {
    config: MctsConfig,
    search: UctSearch,
    rng: StdRng,
}

impl MctsAgent {
    pub fn new(config: MctsConfig, rng: StdRng) -> Result<Self, AgentError> {
        if config.simulations == 0 {
            return Err(AgentError::EmptyBudget(config.simulations));
        }
        let search = UctSearch::new(config.rollout, config.rollout_limit);
        Ok(MctsAgent {
            config,
            search,
            rng,
        })
    }

    pub fn with_seed(config: MctsConfig, seed: u64) -> Result<Self, AgentError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    /// Per-column value estimates for the side to move.
    pub fn evaluate(&mut self, state: &GameState) -> Result<[f64; COLS], AgentError> {
        self.search.search(
            state,
            self.config.simulations,
            self.config.exploration,
            &mut self.rng,
        )
    }
}

impl Agent for MctsAgent {
    fn choose_move(&mut self, state: &GameState) -> Result<usize, AgentError> {
        if state.is_terminal() {
            return terminal_fallback(state);
        }
        let values = self.evaluate(state)?;
        let col = best_legal(&values, &state.legal_actions()).ok_or(AgentError::NoLegalMoves)?;
        debug!(
            col,
            value = values[col],
            nodes = self.search.node_count(),
            "mcts move"
        );
        Ok(col)
    }

    fn name(&self) -> &str {
        "MCTS"
    }
}
