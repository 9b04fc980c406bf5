use crate::error::AgentError;
use crate::game::{GameOutcome, GameState, COLS};

/// Universal interface for all Connect Four agents.
pub trait Agent {
    /// Pick a column for the side to move in `state`.
    fn choose_move(&mut self, state: &GameState) -> Result<usize, AgentError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Called once the game this agent took part in has finished.
    fn observe_result(&mut self, _outcome: GameOutcome) {}
}

/// Column handed back when asked to move in a finished game: the first free
/// column, or an error if the board is full.
pub(crate) fn terminal_fallback(state: &GameState) -> Result<usize, AgentError> {
    state
        .legal_actions()
        .first()
        .copied()
        .ok_or(AgentError::NoLegalMoves)
}

/// Highest-valued legal column; the lowest column wins ties.
pub(crate) fn best_legal(values: &[f64; COLS], legal: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &col in legal {
        match best {
            Some((_, value)) if values[col] <= value => {}
            _ => best = Some((col, values[col])),
        }
    }
    best.map(|(col, _)| col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_legal_ignores_illegal_columns() {
        let values = [0.0, 9.0, 0.5, 0.1, 0.0, 0.0, 0.0];
        assert_eq!(best_legal(&values, &[0, 2, 3]), Some(2));
    }

    #[test]
    fn best_legal_breaks_ties_low() {
        let values = [1.0; COLS];
        assert_eq!(best_legal(&values, &[4, 5, 6]), Some(4));
        assert_eq!(best_legal(&values, &[]), None);
    }

    #[test]
    fn best_legal_handles_negative_values() {
        let values = [-3.0, -1.0, -2.0, -5.0, -5.0, -5.0, -5.0];
        assert_eq!(best_legal(&values, &[0, 1, 2]), Some(1));
    }
}
