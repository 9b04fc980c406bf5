use tracing::info;

use crate::ai::{AdaptivePolicyAgent, Agent, Level};
use crate::error::ArenaError;
use crate::game::Player;

use super::game::play_game;
use super::stats::SeriesStats;

/// Seat of the tracked agent in game `index` of a series: Red on even games.
pub fn seat_for(index: usize) -> Player {
    if index % 2 == 0 {
        Player::Red
    } else {
        Player::Yellow
    }
}

/// Derives a well-mixed seed for stream `index` from a base seed.
pub fn episode_seed(base: u64, index: u64) -> u64 {
    // splitmix64 finaliser
    let mut z = base.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Plays `games` games with seats alternating, `agent` Red first.
pub fn play_series(
    agent: &mut dyn Agent,
    opponent: &mut dyn Agent,
    games: usize,
) -> Result<SeriesStats, ArenaError> {
    let mut stats = SeriesStats::new();
    for index in 0..games {
        let seat = seat_for(index);
        let record = match seat {
            Player::Red => play_game(agent, opponent)?,
            Player::Yellow => play_game(opponent, agent)?,
        };
        stats.record(&record, seat);
    }
    Ok(stats)
}

/// One point on a learning curve.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CurvePoint {
    pub games_played: u64,
    pub level: Level,
    pub epsilon: f64,
    pub table_rows: usize,
    /// Results of the training games since the previous point.
    pub training: SeriesStats,
    /// Results of the frozen evaluation games at this point.
    pub evaluation: SeriesStats,
}

/// Trains `agent` against `opponent` for `games` games, pausing every
/// `eval_every` games to play `eval_games` with learning switched off.
pub fn train_against(
    agent: &mut AdaptivePolicyAgent,
    opponent: &mut dyn Agent,
    games: usize,
    eval_every: usize,
    eval_games: usize,
) -> Result<Vec<CurvePoint>, ArenaError> {
    let eval_every = eval_every.max(1);
    let mut curve = Vec::new();
    let mut window = SeriesStats::new();

    for index in 0..games {
        let seat = seat_for(index);
        let record = match seat {
            Player::Red => play_game(agent, opponent)?,
            Player::Yellow => play_game(opponent, agent)?,
        };
        window.record(&record, seat);

        if (index + 1) % eval_every == 0 || index + 1 == games {
            let was_frozen = agent.is_frozen();
            agent.set_frozen(true);
            let evaluation = play_series(agent, opponent, eval_games);
            agent.set_frozen(was_frozen);
            let evaluation = evaluation?;

            let point = CurvePoint {
                games_played: agent.games_played(),
                level: agent.level(),
                epsilon: agent.epsilon(),
                table_rows: agent.table().len(),
                training: std::mem::take(&mut window),
                evaluation,
            };
            info!(
                games = point.games_played,
                level = %point.level,
                epsilon = point.epsilon,
                rows = point.table_rows,
                train_win_rate = point.training.win_rate(),
                eval_win_rate = point.evaluation.win_rate(),
                "learning curve"
            );
            curve.push(point);
        }
    }

    Ok(curve)
}
