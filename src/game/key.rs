use std::fmt;
use std::str::FromStr;

use super::board::{Cell, COLS, ROWS};
use crate::error::PersistenceError;

const CELLS: usize = ROWS * COLS;

/// Canonical, hashable encoding of a board configuration.
///
/// Two occupancy masks with bit `row * COLS + col` set for each piece. The text
/// form lists the 42 cells row-major from the top using `.`, `R` and `Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BoardKey {
    red: u64,
    yellow: u64,
}

impl BoardKey {
    pub(crate) fn from_masks(red: u64, yellow: u64) -> Self {
        BoardKey { red, yellow }
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        let bit = 1u64 << (row * COLS + col);
        if self.red & bit != 0 {
            Cell::Red
        } else if self.yellow & bit != 0 {
            Cell::Yellow
        } else {
            Cell::Empty
        }
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                write!(f, "{}", self.cell(row, col).symbol())?;
            }
        }
        Ok(())
    }
}

impl FromStr for BoardKey {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.chars().count() != CELLS {
            return Err(PersistenceError::InvalidKey(s.to_string()));
        }
        let mut red = 0u64;
        let mut yellow = 0u64;
        for (idx, ch) in s.chars().enumerate() {
            match ch {
                'R' => red |= 1 << idx,
                'Y' => yellow |= 1 << idx,
                '.' => {}
                _ => return Err(PersistenceError::InvalidKey(s.to_string())),
            }
        }
        Ok(BoardKey { red, yellow })
    }
}

impl From<BoardKey> for String {
    fn from(key: BoardKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for BoardKey {
    type Error = PersistenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    #[test]
    fn empty_board_key_is_all_dots() {
        let key = Board::new().key();
        assert_eq!(key.to_string(), ".".repeat(CELLS));
    }

    #[test]
    fn text_roundtrip() {
        let mut board = Board::new();
        board.drop_piece(0, Cell::Red).unwrap();
        board.drop_piece(6, Cell::Yellow).unwrap();
        let key = board.key();
        let text = key.to_string();
        assert!(text.ends_with("R.....Y"));
        assert_eq!(text.parse::<BoardKey>().unwrap(), key);
    }

    #[test]
    fn rejects_bad_length_and_symbols() {
        assert!("RY".parse::<BoardKey>().is_err());
        let bad = format!("X{}", ".".repeat(CELLS - 1));
        assert!(bad.parse::<BoardKey>().is_err());
    }

    #[test]
    fn serde_uses_text_form() {
        let mut board = Board::new();
        board.drop_piece(2, Cell::Red).unwrap();
        let key = board.key();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{key}\""));
        let back: BoardKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn distinct_boards_have_distinct_keys() {
        let mut a = Board::new();
        a.drop_piece(0, Cell::Red).unwrap();
        let mut b = Board::new();
        b.drop_piece(0, Cell::Yellow).unwrap();
        assert_ne!(a.key(), b.key());
    }
}
