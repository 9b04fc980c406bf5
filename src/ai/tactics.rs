//! One-ply tactical checks shared by the adaptive agent.

use crate::game::GameState;

/// First column (ascending) that wins immediately for the side to move.
pub fn winning_move(state: &GameState) -> Option<usize> {
    if state.is_terminal() {
        return None;
    }
    let me = state.current_player();
    state
        .successors()
        .find(|(_, next)| next.winner() == Some(me))
        .map(|(col, _)| col)
}

/// First column (ascending) where the opponent would win if it were their turn.
pub fn blocking_move(state: &GameState) -> Option<usize> {
    if state.is_terminal() {
        return None;
    }
    winning_move(&state.with_player(state.current_player().other()))
}
