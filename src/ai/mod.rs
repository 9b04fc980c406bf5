mod adaptive;
mod agent;
pub mod heuristic;
mod level;
pub mod mcts;
mod minimax;
mod q_table;
mod random;
pub mod tactics;

pub use adaptive::{AdaptiveConfig, AdaptivePolicyAgent};
pub use agent::Agent;
pub use heuristic::{Heuristic, HeuristicWeights, ThreatHeuristic, WIN_SCORE};
pub use level::Level;
pub use mcts::{MctsAgent, MctsConfig, RolloutPolicy, UctSearch};
pub use minimax::{MinimaxAgent, MinimaxConfig};
pub use q_table::QTable;
pub use random::RandomAgent;
