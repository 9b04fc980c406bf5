/// Competence stages of the adaptive agent, unlocked by games played.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    /// Learned values only.
    Tabular = 0,
    /// Also takes immediate wins.
    Win = 1,
    /// Also blocks immediate losses.
    Block = 2,
    /// Replaces table lookups with tree search.
    Search = 3,
}

impl Level {
    /// Level reached after `games` finished games, given the game counts at
    /// which `Win`, `Block` and `Search` unlock.
    pub fn for_games(games: u64, thresholds: &[u64; 3]) -> Level {
        if games >= thresholds[2] {
            Level::Search
        } else if games >= thresholds[1] {
            Level::Block
        } else if games >= thresholds[0] {
            Level::Win
        } else {
            Level::Tabular
        }
    }

    pub fn takes_wins(self) -> bool {
        self >= Level::Win
    }

    pub fn blocks(self) -> bool {
        self >= Level::Block
    }

    pub fn searches(self) -> bool {
        self >= Level::Search
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level as u8
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Level::Tabular),
            1 => Ok(Level::Win),
            2 => Ok(Level::Block),
            3 => Ok(Level::Search),
            other => Err(format!("level must be 0..=3, got {other}")),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Tabular => "tabular",
            Level::Win => "win",
            Level::Block => "block",
            Level::Search => "search",
        };
        write!(f, "{} ({})", u8::from(*self), name)
    }
}
