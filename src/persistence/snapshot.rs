use serde::{Deserialize, Serialize};

use crate::ai::{Level, QTable};
use crate::error::PersistenceError;
use crate::game::{Board, BoardKey, COLS};

/// One learned row: the board, its action values and visit counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub key: BoardKey,
    pub values: [f64; COLS],
    #[serde(default)]
    pub visits: [u32; COLS],
}

/// Everything an adaptive agent needs to resume: its table and progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub version: u32,
    pub level: Level,
    pub games_played: u64,
    pub epsilon: f64,
    pub entries: Vec<TableEntry>,
}

impl AgentSnapshot {
    pub const VERSION: u32 = 1;

    /// Captures `table`, with entries sorted by key text so output is stable.
    pub fn from_table(table: &QTable, level: Level, games_played: u64, epsilon: f64) -> Self {
        let mut entries: Vec<TableEntry> = table
            .iter()
            .map(|(key, values, visits)| TableEntry {
                key: *key,
                values: *values,
                visits,
            })
            .collect();
        entries.sort_by_cached_key(|entry| entry.key.to_string());
        AgentSnapshot {
            version: Self::VERSION,
            level,
            games_played,
            epsilon,
            entries,
        }
    }

    /// Rejects other versions and rows for boards no game can reach.
    pub fn check(&self) -> Result<(), PersistenceError> {
        if self.version != Self::VERSION {
            return Err(PersistenceError::Version {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| !Board::from_key(&entry.key).respects_gravity())
        {
            return Err(PersistenceError::FloatingPieces(entry.key.to_string()));
        }
        Ok(())
    }

    /// Rebuilds a table. New rows created later use `init_range`.
    pub fn to_table(&self, init_range: f64) -> QTable {
        let mut table = QTable::new(init_range);
        for entry in &self.entries {
            table.insert(entry.key, entry.values, entry.visits);
        }
        table
    }
}
