//! Line clearing with sticky gravity.
//!
//! After full rows are removed, the remaining settled cells do not drop row by
//! row. Instead they are split into 4-connected groups and each group falls as
//! a rigid body until any of its cells is blocked by the floor or by a cell of
//! another group:
//!
//! ```text
//! before        full row removed     groups settled
//! ..##......    ..##......           ..........
//! ..#.......    ..#.......           ..........
//! ##########    ..........           ..##......
//! #.......#.    #.......#.           #.#.....#.
//! ```
//!
//! Groups are labeled bottom row first, left to right, and settled in label
//! order; a group that has already come to rest blocks every later group.
//!
//! A single pass can leave work behind: falling debris may complete a row, and
//! a group may land on a later group that then drops away. Passes repeat until
//! one clears no row and moves no group.

use arrayvec::ArrayVec;

use crate::{
    ToppedOutError,
    core::{BoardPos, CELL_COUNT, COL_COUNT, FilledArea, ROW_COUNT},
};

/// Summary of one settling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettleReport {
    cleared_rows: ArrayVec<usize, ROW_COUNT>,
    group_count: usize,
    moved_groups: usize,
    passes: usize,
}

impl SettleReport {
    /// Indices of the rows that were full and got cleared, bottom first within
    /// each pass.
    #[must_use]
    pub fn cleared_rows(&self) -> &[usize] {
        &self.cleared_rows
    }

    /// Number of connected groups found once the full rows were first removed.
    #[must_use]
    pub const fn group_count(&self) -> usize {
        self.group_count
    }

    /// Number of times a group fell at least one row, over all passes.
    #[must_use]
    pub const fn moved_groups(&self) -> usize {
        self.moved_groups
    }

    /// Number of clear-and-settle passes run, including the final one that
    /// changed nothing.
    #[must_use]
    pub const fn passes(&self) -> usize {
        self.passes
    }
}

/// Clears full rows from `area` and lets the remaining groups settle.
///
/// Fails without touching `area` if any settled cell occupies the top row.
pub fn clear_lines(area: &mut FilledArea) -> Result<SettleReport, ToppedOutError> {
    if area.reaches_top_row() {
        return Err(ToppedOutError);
    }

    let mut grid = SettleGrid::from_area(area);
    let mut report = SettleReport::default();
    loop {
        let cleared_rows = grid.clear_full_rows();
        let group_count = grid.label_groups();
        let mut moved_groups = 0;
        for id in 1..=group_count {
            if grid.drop_group(id) > 0 {
                moved_groups += 1;
            }
        }
        tracing::trace!(
            pass = report.passes,
            cleared_rows = ?cleared_rows,
            group_count,
            moved_groups,
            "settling pass"
        );

        if report.passes == 0 {
            report.group_count = group_count;
        }
        report.passes += 1;
        report.moved_groups += moved_groups;
        // The top row starts empty, so fewer than ROW_COUNT rows can ever fill.
        report.cleared_rows.extend(cleared_rows.iter().copied());
        if cleared_rows.is_empty() && moved_groups == 0 {
            break;
        }
        grid.unlabel();
    }

    *area = grid.to_area();
    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Cell {
    #[default]
    Empty,
    /// Settled but not yet assigned to a group.
    Filled,
    Group(usize),
}

/// Dense snapshot of the board indexed as `cells[row][column]`.
#[derive(Debug, Clone)]
struct SettleGrid {
    cells: [[Cell; COL_COUNT]; ROW_COUNT],
}

impl SettleGrid {
    fn from_area(area: &FilledArea) -> Self {
        let mut cells = [[Cell::Empty; COL_COUNT]; ROW_COUNT];
        for (column, row) in area.iter().filter_map(BoardPos::grid_index) {
            cells[row][column] = Cell::Filled;
        }
        Self { cells }
    }

    fn to_area(&self) -> FilledArea {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| **cell != Cell::Empty)
                    .filter_map(move |(column, _)| BoardPos::from_grid_index(column, row))
            })
            .collect()
    }

    fn clear_full_rows(&mut self) -> ArrayVec<usize, ROW_COUNT> {
        let mut cleared = ArrayVec::new();
        for (y, row) in self.cells.iter_mut().enumerate() {
            if row.iter().all(|cell| *cell == Cell::Filled) {
                row.fill(Cell::Empty);
                cleared.push(y);
            }
        }
        cleared
    }

    /// Assigns a group id (from 1) to every 4-connected component of filled
    /// cells and returns the number of groups.
    fn label_groups(&mut self) -> usize {
        let mut group_count = 0;
        for y in 0..ROW_COUNT {
            for x in 0..COL_COUNT {
                if self.cells[y][x] == Cell::Filled {
                    group_count += 1;
                    self.flood_fill(x, y, group_count);
                }
            }
        }
        group_count
    }

    fn unlabel(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if let Cell::Group(_) = cell {
                *cell = Cell::Filled;
            }
        }
    }

    fn flood_fill(&mut self, x: usize, y: usize, id: usize) {
        // Cells are labeled when pushed, so each one enters the stack at most once.
        let mut stack = ArrayVec::<(usize, usize), CELL_COUNT>::new();
        self.cells[y][x] = Cell::Group(id);
        stack.push((x, y));

        while let Some((x, y)) = stack.pop() {
            let neighbors = [
                (y + 1 < ROW_COUNT).then(|| (x, y + 1)),
                y.checked_sub(1).map(|y| (x, y)),
                x.checked_sub(1).map(|x| (x, y)),
                (x + 1 < COL_COUNT).then(|| (x + 1, y)),
            ];
            for (nx, ny) in neighbors.into_iter().flatten() {
                if self.cells[ny][nx] == Cell::Filled {
                    self.cells[ny][nx] = Cell::Group(id);
                    stack.push((nx, ny));
                }
            }
        }
    }

    fn members(&self, id: usize) -> ArrayVec<(usize, usize), CELL_COUNT> {
        let mut members = ArrayVec::new();
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if *cell == Cell::Group(id) {
                    members.push((x, y));
                }
            }
        }
        members
    }

    /// A group can fall when no member is on the floor and every cell below a
    /// member is empty or part of the same group.
    fn can_fall(&self, id: usize, members: &[(usize, usize)]) -> bool {
        !members.is_empty()
            && members.iter().all(|&(x, y)| {
                y > 0
                    && match self.cells[y - 1][x] {
                        Cell::Empty => true,
                        Cell::Group(other) => other == id,
                        Cell::Filled => false,
                    }
            })
    }

    /// Drops group `id` until it rests and returns the number of rows it fell.
    fn drop_group(&mut self, id: usize) -> usize {
        let mut members = self.members(id);
        let mut rows = 0;
        while self.can_fall(id, &members) {
            for &(x, y) in &members {
                self.cells[y][x] = Cell::Empty;
            }
            for member in &mut members {
                member.1 -= 1;
                self.cells[member.1][member.0] = Cell::Group(id);
            }
            rows += 1;
        }
        rows
    }
}
