use crate::game::{windows, Cell, GameOutcome, GameState, Player, ROWS};

/// Score assigned to a won position. Heuristic scores stay far below it.
pub const WIN_SCORE: f64 = 1_000_000.0;

const CENTER_COL: usize = 3;

/// Trait for evaluating a position from a player's perspective.
pub trait Heuristic {
    fn evaluate(&self, state: &GameState, perspective: Player) -> f64;
}

/// Window weights for [`ThreatHeuristic`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Three own pieces plus one empty cell in a window.
    pub open_three: f64,
    /// Two own pieces plus two empty cells.
    pub open_two: f64,
    /// Per piece in the center column.
    pub center: f64,
    /// Multiplier on opponent open threes.
    pub defense: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        HeuristicWeights {
            open_three: 50.0,
            open_two: 10.0,
            center: 3.0,
            defense: 1.6,
        }
    }
}

/// Default heuristic that scans all 4-cell windows and scores threats.
#[derive(Debug, Clone, Default)]
pub struct ThreatHeuristic {
    weights: HeuristicWeights,
}

impl ThreatHeuristic {
    pub fn new(weights: HeuristicWeights) -> Self {
        ThreatHeuristic { weights }
    }

    fn score_window(&self, own: usize, opp: usize, empty: usize) -> f64 {
        let w = &self.weights;
        match (own, opp, empty) {
            (3, 0, 1) => w.open_three,
            (2, 0, 2) => w.open_two,
            (0, 3, 1) => -w.open_three * w.defense,
            (0, 2, 2) => -w.open_two,
            _ => 0.0,
        }
    }

    fn positional(&self, state: &GameState, perspective: Player) -> f64 {
        let board = state.board();
        let own_cell = perspective.to_cell();
        let opp_cell = perspective.other().to_cell();
        let mut score = 0.0;

        for row in 0..ROWS {
            let cell = board.get(row, CENTER_COL);
            if cell == own_cell {
                score += self.weights.center;
            } else if cell == opp_cell {
                score -= self.weights.center;
            }
        }

        for window in windows() {
            let (mut own, mut opp, mut empty) = (0, 0, 0);
            for (row, col) in window {
                match board.get(row, col) {
                    Cell::Empty => empty += 1,
                    c if c == own_cell => own += 1,
                    _ => opp += 1,
                }
            }
            score += self.score_window(own, opp, empty);
        }

        score
    }
}

impl Heuristic for ThreatHeuristic {
    fn evaluate(&self, state: &GameState, perspective: Player) -> f64 {
        match state.outcome() {
            Some(GameOutcome::Winner(winner)) if winner == perspective => WIN_SCORE,
            Some(GameOutcome::Winner(_)) => -WIN_SCORE,
            Some(GameOutcome::Draw) => 0.0,
            None => self.positional(state, perspective),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    fn state_with(pieces: &[(usize, Cell)], to_move: Player) -> GameState {
        let mut board = Board::new();
        for &(col, cell) in pieces {
            board.drop_piece(col, cell).unwrap();
        }
        GameState::from_board(board, to_move)
    }

    #[test]
    fn empty_board_is_zero_for_both() {
        let h = ThreatHeuristic::default();
        let state = GameState::initial();
        assert_eq!(h.evaluate(&state, Player::Red), 0.0);
        assert_eq!(h.evaluate(&state, Player::Yellow), 0.0);
    }

    #[test]
    fn center_preference() {
        let h = ThreatHeuristic::default();
        let center = state_with(&[(3, Cell::Red)], Player::Yellow);
        let edge = state_with(&[(0, Cell::Red)], Player::Yellow);
        let center_score = h.evaluate(&center, Player::Red);
        let edge_score = h.evaluate(&edge, Player::Red);
        assert!(
            center_score > edge_score,
            "center ({center_score}) should beat edge ({edge_score})"
        );
    }

    #[test]
    fn own_open_three_scores_high() {
        let h = ThreatHeuristic::default();
        let state = state_with(
            &[(0, Cell::Red), (1, Cell::Red), (2, Cell::Red)],
            Player::Yellow,
        );
        let score = h.evaluate(&state, Player::Red);
        assert!(score > 40.0, "3-in-a-row should score high, got {score}");
        assert!(h.evaluate(&state, Player::Yellow) < -40.0);
    }

    #[test]
    fn more_opponent_threats_score_lower() {
        let h = ThreatHeuristic::default();
        let one = state_with(
            &[(0, Cell::Yellow), (1, Cell::Yellow), (2, Cell::Yellow)],
            Player::Red,
        );
        let two = state_with(
            &[
                (0, Cell::Yellow),
                (1, Cell::Yellow),
                (2, Cell::Yellow),
                (6, Cell::Yellow),
                (6, Cell::Yellow),
                (6, Cell::Yellow),
            ],
            Player::Red,
        );
        assert!(h.evaluate(&two, Player::Red) < h.evaluate(&one, Player::Red));
    }

    #[test]
    fn terminal_scores_dominate() {
        let h = ThreatHeuristic::default();
        let won = state_with(
            &[(0, Cell::Red), (1, Cell::Red), (2, Cell::Red), (3, Cell::Red)],
            Player::Red,
        );
        assert_eq!(h.evaluate(&won, Player::Red), WIN_SCORE);
        assert_eq!(h.evaluate(&won, Player::Yellow), -WIN_SCORE);

        // Board packed with open threes still stays far below a win.
        let busy = state_with(
            &[
                (0, Cell::Red),
                (1, Cell::Red),
                (2, Cell::Red),
                (4, Cell::Red),
                (4, Cell::Red),
                (4, Cell::Red),
                (3, Cell::Yellow),
            ],
            Player::Yellow,
        );
        let score = h.evaluate(&busy, Player::Red);
        assert!(score.abs() < WIN_SCORE / 10.0);
    }

    #[test]
    fn custom_weights_are_used() {
        let h = ThreatHeuristic::new(HeuristicWeights {
            open_three: 0.0,
            open_two: 0.0,
            center: 1.0,
            defense: 1.0,
        });
        let state = state_with(&[(3, Cell::Red), (3, Cell::Red)], Player::Yellow);
        assert_eq!(h.evaluate(&state, Player::Red), 2.0);
    }
}
