use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Number of columns on the board.
pub const COL_COUNT: usize = 10;
/// Number of rows on the board.
pub const ROW_COUNT: usize = 24;
/// Total number of cells on the board.
pub const CELL_COUNT: usize = COL_COUNT * ROW_COUNT;

/// Column offset applied to a freshly generated shape.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const SPAWN_COLUMN: i32 = (COL_COUNT / 2 - 1) as i32;
/// Row offset applied to a freshly generated shape.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const SPAWN_ROW: i32 = (ROW_COUNT - 3) as i32;

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const MAX_X: i32 = COL_COUNT as i32 - 1;
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const MAX_Y: i32 = ROW_COUNT as i32 - 1;

/// Board-space coordinate of a single cell.
///
/// # Coordinate System
///
/// - `x` is the column, increasing rightward from 0
/// - `y` is the row, increasing upward from the floor (row 0)
///
/// Coordinates are signed: a rotated shape may briefly stick out past a side
/// wall before it is pushed back, and relative shape offsets are stored with
/// the same type. Settled cells always lie on the board.
///
/// Positions order row-major from the floor up, so ordered collections of
/// cells iterate bottom row first, left to right.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct BoardPos {
    x: i32,
    y: i32,
}

impl BoardPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub const fn left(self) -> Self {
        self.translated(-1, 0)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        self.translated(1, 0)
    }

    #[must_use]
    pub const fn below(self) -> Self {
        self.translated(0, -1)
    }

    /// Returns `true` if the cell lies inside `[0, COL_COUNT) x [0, ROW_COUNT)`.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.x >= 0 && self.x <= MAX_X && self.y >= 0 && self.y <= MAX_Y
    }

    #[must_use]
    pub const fn is_at_left_wall(self) -> bool {
        self.x <= 0
    }

    #[must_use]
    pub const fn is_at_right_wall(self) -> bool {
        self.x >= MAX_X
    }

    #[must_use]
    pub const fn is_past_left_wall(self) -> bool {
        self.x < 0
    }

    #[must_use]
    pub const fn is_past_right_wall(self) -> bool {
        self.x > MAX_X
    }

    #[must_use]
    pub const fn is_on_floor(self) -> bool {
        self.y == 0
    }

    #[must_use]
    pub const fn is_in_top_row(self) -> bool {
        self.y >= MAX_Y
    }

    /// Returns `(column, row)` grid indices for an on-board cell.
    #[must_use]
    pub fn grid_index(self) -> Option<(usize, usize)> {
        if !self.is_on_board() {
            return None;
        }
        Some((usize::try_from(self.x).ok()?, usize::try_from(self.y).ok()?))
    }

    /// Builds a position from `(column, row)` grid indices.
    ///
    /// Returns `None` if the indices fall outside the board.
    #[must_use]
    pub fn from_grid_index(column: usize, row: usize) -> Option<Self> {
        if column >= COL_COUNT || row >= ROW_COUNT {
            return None;
        }
        Some(Self::new(
            i32::try_from(column).ok()?,
            i32::try_from(row).ok()?,
        ))
    }
}

impl PartialOrd for BoardPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BoardPos {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}
