//! Turn driver, series statistics and learning-curve training.

mod game;
mod stats;
mod training;

pub use game::{play_game, GameEnd, GameRecord};
pub use stats::SeriesStats;
pub use training::{episode_seed, play_series, seat_for, train_against, CurvePoint};
