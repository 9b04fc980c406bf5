use std::fmt;

use super::key::BoardKey;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of aligned pieces needed to win.
pub const CONNECT: usize = 4;

/// Row/column steps for the four axes: horizontal, vertical and both diagonals.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Red => 'R',
            Cell::Yellow => 'Y',
        }
    }
}

/// A four-cell line of `(row, col)` coordinates.
pub type Window = [(usize, usize); CONNECT];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Check if a column is full (out-of-range columns count as full)
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Row a piece dropped into `col` would land on.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        let row = self.landing_row(col).ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = cell;
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Check if the piece at (row, col) is part of a line of four.
    ///
    /// Walks outward from the placed cell in both senses of every axis, so the
    /// cost is bounded by the board dimensions rather than a full rescan.
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let run = 1
                + self.count_run(row, col, dr, dc, cell)
                + self.count_run(row, col, -dr, -dc, cell);
            run >= CONNECT
        })
    }

    /// Count contiguous `cell`s starting one step away from (row, col).
    fn count_run(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.cells[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// Full scan for any line of four belonging to `cell`.
    pub fn has_four(&self, cell: Cell) -> bool {
        windows().any(|window| window.iter().all(|&(r, c)| self.cells[r][c] == cell))
    }

    /// Canonical hashable encoding of this configuration.
    pub fn key(&self) -> BoardKey {
        let mut red = 0u64;
        let mut yellow = 0u64;
        for (row, line) in self.cells.iter().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                let bit = 1u64 << (row * COLS + col);
                match cell {
                    Cell::Red => red |= bit,
                    Cell::Yellow => yellow |= bit,
                    Cell::Empty => {}
                }
            }
        }
        BoardKey::from_masks(red, yellow)
    }

    /// Rebuild a board from its key. Gravity is not checked here.
    pub fn from_key(key: &BoardKey) -> Self {
        let mut board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                board.cells[row][col] = key.cell(row, col);
            }
        }
        board
    }

    /// True when every column's pieces are stacked from the bottom.
    pub fn respects_gravity(&self) -> bool {
        (0..COLS).all(|col| {
            (1..ROWS).all(|row| {
                self.cells[row - 1][col] == Cell::Empty || self.cells[row][col] != Cell::Empty
            })
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.cells {
            let row: String = line.iter().map(|cell| cell.symbol()).collect();
            writeln!(f, "{row}")?;
        }
        write!(f, "0123456")
    }
}

/// Every four-cell window on the board (69 in total).
pub fn windows() -> impl Iterator<Item = Window> {
    DIRECTIONS.into_iter().flat_map(|(dr, dc)| {
        (0..ROWS).flat_map(move |row| {
            (0..COLS).filter_map(move |col| {
                let end_r = row as isize + dr * (CONNECT as isize - 1);
                let end_c = col as isize + dc * (CONNECT as isize - 1);
                if !(0..ROWS as isize).contains(&end_r) || !(0..COLS as isize).contains(&end_c) {
                    return None;
                }
                let mut window = [(0, 0); CONNECT];
                for (i, slot) in window.iter_mut().enumerate() {
                    *slot = (
                        (row as isize + dr * i as isize) as usize,
                        (col as isize + dc * i as isize) as usize,
                    );
                }
                Some(window)
            })
        })
    })
}
