use std::path::PathBuf;

/// Reasons a move cannot be applied to a [`GameState`](crate::game::GameState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("the game is already over")]
    GameOver,
}

/// Errors raised by an agent while deciding on a move.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("no legal moves in a non-terminal position")]
    NoLegalMoves,

    #[error("search budget must be at least 1, got {0}")]
    EmptyBudget(usize),
}

/// Errors that can occur when loading or saving agent tables.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read table from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse table from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("invalid board key '{0}'")]
    InvalidKey(String),

    #[error("board key '{0}' has pieces above empty cells")]
    FloatingPieces(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while driving games between agents.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("agent '{agent}' failed to choose a move: {source}")]
    Agent { agent: String, source: AgentError },

    #[error("game should be terminal but has no outcome")]
    MissingOutcome,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(MoveError::ColumnFull(3).to_string(), "column 3 is full");
        assert_eq!(MoveError::InvalidColumn(9).to_string(), "column 9 is out of range");
        assert_eq!(MoveError::GameOver.to_string(), "the game is already over");
    }

    #[test]
    fn test_arena_error_display() {
        let err = ArenaError::Agent {
            agent: "Minimax".to_string(),
            source: AgentError::NoLegalMoves,
        };
        assert_eq!(
            err.to_string(),
            "agent 'Minimax' failed to choose a move: no legal moves in a non-terminal position"
        );
    }

    #[test]
    fn test_persistence_version_display() {
        let err = PersistenceError::Version {
            found: 7,
            expected: 1,
        };
        assert_eq!(err.to_string(), "unsupported snapshot version 7 (expected 1)");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("adaptive.alpha must be in (0, 1]".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: adaptive.alpha must be in (0, 1]"
        );
    }
}
