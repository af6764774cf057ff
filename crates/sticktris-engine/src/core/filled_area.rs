use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::OutOfBoardError;

use super::board_pos::{BoardPos, COL_COUNT, ROW_COUNT};

/// Set of permanently settled cells.
///
/// Every stored cell lies on the board and no two cells share a position.
/// Iteration is row-major, bottom row first, which keeps tests and recordings
/// deterministic.
///
/// Serialized as a list of `{x, y}` cells; deserialization rejects cells
/// outside the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<BoardPos>", try_from = "Vec<BoardPos>")]
pub struct FilledArea {
    cells: BTreeSet<BoardPos>,
}

impl FilledArea {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn contains(&self, pos: BoardPos) -> bool {
        self.cells.contains(&pos)
    }

    /// Settles a cell.
    ///
    /// Returns `Ok(false)` if the cell was already settled.
    pub fn insert(&mut self, pos: BoardPos) -> Result<bool, OutOfBoardError> {
        if !pos.is_on_board() {
            return Err(OutOfBoardError { pos });
        }
        Ok(self.cells.insert(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = BoardPos> + '_ {
        self.cells.iter().copied()
    }

    /// Returns `true` if any settled cell occupies the top row.
    #[must_use]
    pub fn reaches_top_row(&self) -> bool {
        self.cells.iter().next_back().is_some_and(|pos| pos.is_in_top_row())
    }

    /// Returns `true` if every column of `row` is settled.
    #[must_use]
    pub fn is_row_filled(&self, row: usize) -> bool {
        (0..COL_COUNT).all(|column| {
            BoardPos::from_grid_index(column, row).is_some_and(|pos| self.contains(pos))
        })
    }

    /// Builds a `FilledArea` from ASCII art.
    ///
    /// `#` is a settled cell and `.` an empty one; other characters are
    /// ignored. Lines are given top to bottom and the last line is row 0, so
    /// a short picture describes the bottom rows of the board.
    ///
    /// # Panics
    ///
    /// Panics if a line does not have exactly `COL_COUNT` cells or if there
    /// are more than `ROW_COUNT` lines.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= ROW_COUNT,
            "At most {ROW_COUNT} rows are allowed, got {}",
            lines.len()
        );

        let mut area = Self::new();
        for (row, line) in lines.iter().rev().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                COL_COUNT,
                "Each row must have exactly {COL_COUNT} cells, got {} at row {row}",
                chars.len(),
            );
            for (column, _) in chars.iter().enumerate().filter(|(_, ch)| **ch == '#') {
                let pos = BoardPos::from_grid_index(column, row).unwrap();
                area.cells.insert(pos);
            }
        }
        area
    }
}

impl From<FilledArea> for Vec<BoardPos> {
    fn from(area: FilledArea) -> Self {
        area.cells.into_iter().collect()
    }
}

impl TryFrom<Vec<BoardPos>> for FilledArea {
    type Error = OutOfBoardError;

    fn try_from(cells: Vec<BoardPos>) -> Result<Self, Self::Error> {
        let mut area = Self::new();
        for pos in cells {
            area.insert(pos)?;
        }
        Ok(area)
    }
}

impl FromIterator<BoardPos> for FilledArea {
    /// Collects on-board cells, dropping any that fall outside the board.
    fn from_iter<I: IntoIterator<Item = BoardPos>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().filter(|pos| pos.is_on_board()).collect(),
        }
    }
}

impl fmt::Display for FilledArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROW_COUNT).rev() {
            for column in 0..COL_COUNT {
                let filled = BoardPos::from_grid_index(column, row).is_some_and(|p| self.contains(p));
                f.write_str(if filled { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
