//! Staged Q-learning agent.
//!
//! The agent learns a table of action values from its own games and unlocks
//! extra capabilities as it gains experience (see [`Level`]):
//! immediate wins, then blocks, then full tree search in place of the table.
//! Rewards are always taken from the agent's own seat.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::{AgentError, PersistenceError};
use crate::game::{BoardKey, GameOutcome, GameState, Player, COLS};
use crate::persistence::{AgentSnapshot, TableStore};

use super::agent::{best_legal, terminal_fallback, Agent};
use super::level::Level;
use super::mcts::{RolloutPolicy, UctSearch};
use super::q_table::QTable;
use super::tactics::{blocking_move, winning_move};

/// Adaptive agent hyperparameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Learning rate.
    pub alpha: f64,
    /// Discount factor. 1.0 means only the final result matters.
    pub gamma: f64,
    pub epsilon_initial: f64,
    pub epsilon_final: f64,
    /// Multiplicative decay applied once per finished game.
    pub epsilon_decay: f64,
    /// Games played at which `Win`, `Block` and `Search` unlock.
    pub thresholds: [u64; 3],
    /// Simulations per decision once `Search` is unlocked.
    pub simulations: usize,
    pub exploration: f64,
    pub rollout_limit: usize,
    pub rollout: RolloutPolicy,
    /// Magnitude of the terminal reward.
    pub reward: f64,
    /// New rows start uniform in `[-init_range, init_range]`.
    pub init_range: f64,
    /// Level used when a saved table cannot be restored.
    pub fallback_level: Level,
    /// No learning and no exploration.
    pub frozen: bool,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        AdaptiveConfig {
            alpha: 0.2,
            gamma: 1.0,
            epsilon_initial: 0.99,
            epsilon_final: 0.05,
            epsilon_decay: 0.995,
            thresholds: [20, 40, 80],
            simulations: 100,
            exploration: 1.4,
            rollout_limit: 200,
            rollout: RolloutPolicy::CenterFirst,
            reward: 1.0,
            init_range: 0.2,
            fallback_level: Level::Block,
            frozen: false,
        }
    }
}

pub struct AdaptivePolicyAgent {
    config: AdaptiveConfig,
    table: QTable,
    search: UctSearch,
    rng: StdRng,
    epsilon: f64,
    games_played: u64,
    level: Level,
    /// Last board this agent moved on, the column it picked and its colour.
    pending: Option<(BoardKey, usize, Player)>,
}

impl AdaptivePolicyAgent {
    pub fn new(config: AdaptiveConfig, rng: StdRng) -> Result<Self, AgentError> {
        if config.simulations == 0 {
            return Err(AgentError::EmptyBudget(config.simulations));
        }
        let level = Level::for_games(0, &config.thresholds);
        Ok(AdaptivePolicyAgent {
            table: QTable::new(config.init_range),
            search: UctSearch::new(config.rollout, config.rollout_limit),
            rng,
            epsilon: config.epsilon_initial,
            games_played: 0,
            level,
            pending: None,
            config,
        })
    }

    pub fn with_seed(config: AdaptiveConfig, seed: u64) -> Result<Self, AgentError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Exploration rate in use: 0 while frozen, else the decaying schedule.
    pub fn epsilon(&self) -> f64 {
        if self.config.frozen {
            0.0
        } else {
            self.epsilon
        }
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn is_frozen(&self) -> bool {
        self.config.frozen
    }

    /// Switches learning and exploration off (or back on).
    pub fn set_frozen(&mut self, frozen: bool) {
        self.config.frozen = frozen;
        self.pending = None;
    }

    fn learning(&self) -> bool {
        !self.config.frozen
    }

    fn reward_for(&self, winner: Option<Player>, me: Player) -> f64 {
        match winner {
            Some(winner) if winner == me => self.config.reward,
            Some(_) => -self.config.reward,
            None => 0.0,
        }
    }

    /// One-step update for the previous move, now that `state` is known.
    fn learn_from_step(&mut self, state: &GameState) {
        let Some((key, action, seat)) = self.pending else {
            return;
        };
        let reward = self.reward_for(state.winner(), seat);
        let bootstrap = if state.is_terminal() {
            0.0
        } else {
            self.table
                .max_legal(state.key(), &state.legal_actions(), &mut self.rng)
        };
        let target = reward + self.config.gamma * bootstrap;
        self.table
            .update_towards(key, action, target, self.config.alpha, &mut self.rng);
    }

    fn column_values(&mut self, state: &GameState) -> Result<[f64; COLS], AgentError> {
        if self.level.searches() && self.learning() {
            return self.search.search(
                state,
                self.config.simulations,
                self.config.exploration,
                &mut self.rng,
            );
        }
        if self.learning() {
            Ok(*self.table.row(state.key(), &mut self.rng))
        } else {
            Ok(self.table.get(&state.key()).copied().unwrap_or([0.0; COLS]))
        }
    }

    fn record(&mut self, state: &GameState, action: usize) -> usize {
        if self.learning() {
            self.pending = Some((state.key(), action, state.current_player()));
        }
        action
    }

    fn set_level(&mut self, level: Level) {
        if level != self.level {
            info!(from = %self.level, to = %level, games = self.games_played, "level changed");
            self.level = level;
        }
    }

    /// Current table and progress, ready for a [`TableStore`].
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::from_table(&self.table, self.level, self.games_played, self.epsilon)
    }

    /// Replaces table and progress with `snapshot`.
    pub fn restore(&mut self, snapshot: &AgentSnapshot) -> Result<(), PersistenceError> {
        snapshot.check()?;
        self.table = snapshot.to_table(self.config.init_range);
        self.level = snapshot.level;
        self.games_played = snapshot.games_played;
        self.epsilon = snapshot.epsilon.clamp(0.0, 1.0);
        self.pending = None;
        Ok(())
    }

    pub fn save_to(&self, store: &mut dyn TableStore, name: &str) -> Result<(), PersistenceError> {
        store.save(name, &self.snapshot())
    }

    /// Restores from `store`. Returns whether a table was loaded.
    ///
    /// A corrupt snapshot, or a missing one while frozen, leaves an empty
    /// table at the fallback level. A learner with nothing saved keeps its
    /// fresh state and climbs the levels as usual.
    pub fn load_from(&mut self, store: &dyn TableStore, name: &str) -> bool {
        let result = store
            .load(name)
            .and_then(|found| match found {
                Some(snapshot) => self.restore(&snapshot).map(|()| true),
                None => Ok(false),
            });

        match result {
            Ok(true) => {
                info!(
                    name,
                    rows = self.table.len(),
                    level = %self.level,
                    games = self.games_played,
                    "restored table"
                );
                true
            }
            Ok(false) if self.config.frozen => {
                warn!(name, "no saved table, playing without one");
                self.degrade();
                false
            }
            Ok(false) => {
                info!(name, "no saved table, starting fresh");
                false
            }
            Err(e) => {
                warn!(name, error = %e, "could not restore table, starting empty");
                self.degrade();
                false
            }
        }
    }

    fn degrade(&mut self) {
        self.table.clear();
        self.pending = None;
        self.set_level(self.config.fallback_level);
    }
}

impl Agent for AdaptivePolicyAgent {
    fn choose_move(&mut self, state: &GameState) -> Result<usize, AgentError> {
        if self.learning() {
            self.learn_from_step(state);
        }

        if state.is_terminal() {
            self.pending = None;
            return terminal_fallback(state);
        }

        if self.level.takes_wins() {
            if let Some(col) = winning_move(state) {
                debug!(col, "adaptive takes win");
                return Ok(self.record(state, col));
            }
        }
        if self.level.blocks() {
            if let Some(col) = blocking_move(state) {
                debug!(col, "adaptive blocks");
                return Ok(self.record(state, col));
            }
        }

        let values = self.column_values(state)?;
        let legal = state.legal_actions();
        let explore = self.learning() && self.rng.random::<f64>() < self.epsilon;
        let col = if explore {
            legal.choose(&mut self.rng).copied()
        } else {
            best_legal(&values, &legal)
        }
        .ok_or(AgentError::NoLegalMoves)?;

        debug!(col, explore, level = %self.level, "adaptive move");
        Ok(self.record(state, col))
    }

    fn name(&self) -> &str {
        "Adaptive"
    }

    fn observe_result(&mut self, outcome: GameOutcome) {
        if !self.learning() {
            self.pending = None;
            return;
        }

        if let Some((key, action, seat)) = self.pending.take() {
            let reward = outcome.value_for(seat) * self.config.reward;
            self.table
                .update_towards(key, action, reward, self.config.alpha, &mut self.rng);
        }

        if self.epsilon > self.config.epsilon_final {
            self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_final);
        }
        self.games_played += 1;
        let reached = Level::for_games(self.games_played, &self.config.thresholds);
        self.set_level(self.level.max(reached));
    }
}
