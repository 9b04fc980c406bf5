use super::{Board, BoardKey, LegalActions, Player, COLS};
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

impl GameOutcome {
    /// +1 if `player` won, -1 if they lost, 0 for a draw.
    pub fn value_for(self, player: Player) -> f64 {
        match self {
            GameOutcome::Winner(winner) if winner == player => 1.0,
            GameOutcome::Winner(_) => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }
}

/// Board plus side to move and outcome.
///
/// `GameState` is `Copy`: every simulated branch owns its own board, so
/// applying a move never disturbs the state it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::Red, // Red starts
            outcome: None,
        }
    }

    /// Build a state from an arbitrary board, scanning it for a finished line.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let outcome = if board.has_four(Player::Red.to_cell()) {
            Some(GameOutcome::Winner(Player::Red))
        } else if board.has_four(Player::Yellow.to_cell()) {
            Some(GameOutcome::Winner(Player::Yellow))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        };
        GameState {
            board,
            current_player: to_move,
            outcome,
        }
    }

    /// Same position with `player` to move.
    pub fn with_player(&self, player: Player) -> Self {
        GameState {
            current_player: player,
            ..*self
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn key(&self) -> BoardKey {
        self.board.key()
    }

    pub fn move_count(&self) -> usize {
        self.board.piece_count()
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Columns with at least one free cell, ascending. Empty only on a full board.
    pub fn legal_actions(&self) -> LegalActions {
        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Every `(column, next_state)` reachable in one move, ascending by column.
    pub fn successors(&self) -> impl Iterator<Item = (usize, GameState)> + '_ {
        (0..COLS).filter_map(move |col| self.apply_move(col).ok().map(|next| (col, next)))
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = *self;
        next.apply_move_mut(column)?;
        Ok(next)
    }

    /// Apply move in place. The side to move only flips if the game goes on.
    pub fn apply_move_mut(&mut self, column: usize) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let row = self
            .board
            .drop_piece(column, self.current_player.to_cell())?;

        if self.board.check_win(row, column) {
            self.outcome = Some(GameOutcome::Winner(self.current_player));
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        } else {
            self.current_player = self.current_player.other();
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
