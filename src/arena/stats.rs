use crate::game::Player;

use super::game::{GameEnd, GameRecord};

/// Tally of a series from one agent's point of view.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SeriesStats {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    /// Games the tracked agent lost by playing an illegal column.
    pub forfeits: usize,
    /// Games the opponent lost by playing an illegal column.
    pub opponent_forfeits: usize,
    pub total_moves: usize,
}

impl SeriesStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one game in which the tracked agent sat as `seat`.
    pub fn record(&mut self, record: &GameRecord, seat: Player) {
        self.games += 1;
        self.total_moves += record.length();
        match record.end.winner() {
            Some(winner) if winner == seat => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
        if let GameEnd::Forfeit { offender, .. } = record.end {
            if offender == seat {
                self.forfeits += 1;
            } else {
                self.opponent_forfeits += 1;
            }
        }
    }

    fn rate(&self, count: usize) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        count as f64 / self.games as f64
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn average_length(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.games as f64
    }
}

impl std::fmt::Display for SeriesStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} games: {}W/{}L/{}D ({:.1}% wins, avg {:.1} moves)",
            self.games,
            self.wins,
            self.losses,
            self.draws,
            self.win_rate() * 100.0,
            self.average_length()
        )
    }
}
