use tracing::{debug, warn};

use crate::ai::Agent;
use crate::error::ArenaError;
use crate::game::{GameOutcome, GameState, Player};

/// How a game finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Finished(GameOutcome),
    /// `offender` chose a column the engine rejected and lost on the spot.
    Forfeit { offender: Player, column: usize },
}

impl GameEnd {
    /// The result as seen by the agents. A forfeit counts as a win for the
    /// other side.
    pub fn outcome(self) -> GameOutcome {
        match self {
            GameEnd::Finished(outcome) => outcome,
            GameEnd::Forfeit { offender, .. } => GameOutcome::Winner(offender.other()),
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self.outcome() {
            GameOutcome::Winner(player) => Some(player),
            GameOutcome::Draw => None,
        }
    }

    pub fn is_forfeit(self) -> bool {
        matches!(self, GameEnd::Forfeit { .. })
    }
}

/// Full account of one game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Columns actually applied, in order.
    pub moves: Vec<usize>,
    pub end: GameEnd,
    pub final_state: GameState,
}

impl GameRecord {
    pub fn length(&self) -> usize {
        self.moves.len()
    }
}

/// Plays one game from the empty board, `red` moving first.
///
/// A column the engine rejects ends the game as a forfeit; there is no retry.
/// Both agents are told the result through [`Agent::observe_result`].
pub fn play_game(red: &mut dyn Agent, yellow: &mut dyn Agent) -> Result<GameRecord, ArenaError> {
    let mut state = GameState::initial();
    let mut moves = Vec::new();

    let end = loop {
        if state.is_terminal() {
            let outcome = state.outcome().ok_or(ArenaError::MissingOutcome)?;
            break GameEnd::Finished(outcome);
        }

        let player = state.current_player();
        let agent: &mut dyn Agent = match player {
            Player::Red => &mut *red,
            Player::Yellow => &mut *yellow,
        };
        let column = agent.choose_move(&state).map_err(|source| ArenaError::Agent {
            agent: agent.name().to_string(),
            source,
        })?;

        if let Err(e) = state.apply_move_mut(column) {
            warn!(agent = agent.name(), column, error = %e, "illegal move, forfeit");
            break GameEnd::Forfeit {
                offender: player,
                column,
            };
        }
        moves.push(column);
    };

    let outcome = end.outcome();
    red.observe_result(outcome);
    yellow.observe_result(outcome);
    debug!(moves = moves.len(), ?end, "game over");

    Ok(GameRecord {
        moves,
        end,
        final_state: state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MinimaxAgent, RandomAgent};
    use crate::error::AgentError;

    /// Plays a fixed script of columns, recording what it was told at the end.
    struct Scripted {
        columns: Vec<usize>,
        next: usize,
        seen: Option<GameOutcome>,
    }

    impl Scripted {
        fn new(columns: &[usize]) -> Self {
            Scripted {
                columns: columns.to_vec(),
                next: 0,
                seen: None,
            }
        }
    }

    impl Agent for Scripted {
        fn choose_move(&mut self, _state: &GameState) -> Result<usize, AgentError> {
            let col = self.columns.get(self.next).copied().ok_or(AgentError::NoLegalMoves)?;
            self.next += 1;
            Ok(col)
        }

        fn name(&self) -> &str {
            "Scripted"
        }

        fn observe_result(&mut self, outcome: GameOutcome) {
            self.seen = Some(outcome);
        }
    }

    #[test]
    fn test_scripted_vertical_win() {
        let mut red = Scripted::new(&[3, 3, 3, 3]);
        let mut yellow = Scripted::new(&[4, 4, 4]);
        let record = play_game(&mut red, &mut yellow).unwrap();

        assert_eq!(record.moves, vec![3, 4, 3, 4, 3, 4, 3]);
        assert_eq!(record.end, GameEnd::Finished(GameOutcome::Winner(Player::Red)));
        assert_eq!(record.length(), 7);
        assert_eq!(red.seen, Some(GameOutcome::Winner(Player::Red)));
        assert_eq!(yellow.seen, Some(GameOutcome::Winner(Player::Red)));
    }

    #[test]
    fn test_illegal_move_forfeits() {
        let mut red = Scripted::new(&[0, 0, 0, 9]);
        let mut yellow = Scripted::new(&[1, 1, 1]);
        let record = play_game(&mut red, &mut yellow).unwrap();

        assert_eq!(
            record.end,
            GameEnd::Forfeit {
                offender: Player::Red,
                column: 9
            }
        );
        assert!(record.end.is_forfeit());
        assert_eq!(record.end.winner(), Some(Player::Yellow));
        assert_eq!(record.moves.len(), 6);
        assert_eq!(red.seen, Some(GameOutcome::Winner(Player::Yellow)));
    }

    #[test]
    fn test_full_column_forfeits() {
        let mut red = Scripted::new(&[0, 0, 0, 0]);
        let mut yellow = Scripted::new(&[0, 0, 0, 0]);
        let record = play_game(&mut red, &mut yellow).unwrap();
        assert_eq!(
            record.end,
            GameEnd::Forfeit {
                offender: Player::Red,
                column: 0
            }
        );
    }

    #[test]
    fn test_agent_error_is_reported() {
        let mut red = Scripted::new(&[]);
        let mut yellow = Scripted::new(&[]);
        let err = play_game(&mut red, &mut yellow).unwrap_err();
        assert!(matches!(err, ArenaError::Agent { ref agent, .. } if agent == "Scripted"));
    }

    #[test]
    fn test_real_agents_finish() {
        let mut red = MinimaxAgent::new(2).unwrap();
        let mut yellow = RandomAgent::with_seed(3);
        let record = play_game(&mut red, &mut yellow).unwrap();
        assert!(record.final_state.is_terminal());
        assert!(!record.end.is_forfeit());
        assert_eq!(record.final_state.move_count(), record.length());
    }
}
