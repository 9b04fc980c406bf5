//! # Connect Four agents
//!
//! A Connect Four engine and a family of agents built on it: depth-limited
//! minimax, UCT tree search and a staged tabular Q-learning agent that mixes
//! learned values with tactics and search as it gains experience.
//!
//! ## Modules
//!
//! - [`game`]: board, player, canonical board keys and the game state machine
//! - [`ai`]: agent trait, heuristic, minimax, MCTS, Q-learning and random agents
//! - [`arena`]: turn driver with forfeits, series statistics, learning curves
//! - [`persistence`]: snapshots of learned tables and where they are stored
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: structured error types

pub mod ai;
pub mod arena;
pub mod config;
pub mod error;
pub mod game;
pub mod persistence;
