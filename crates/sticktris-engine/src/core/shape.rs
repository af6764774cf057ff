use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::MoveError;

use super::{
    board_pos::{BoardPos, SPAWN_COLUMN, SPAWN_ROW},
    filled_area::FilledArea,
};

/// Number of cells in every shape.
pub const SHAPE_CELLS: usize = 4;

/// A falling shape: four cells, its kind and an optional rotation pivot.
///
/// Cells are either relative template offsets (a freshly generated or preview
/// shape) or board-space positions (the active shape after [`Shape::spawned`]).
/// Movement and rotation return new `Shape` values and leave `self` untouched;
/// the legality checks that need settled cells take a [`FilledArea`].
///
/// # Example
///
/// ```
/// use sticktris_engine::{FilledArea, Shape, ShapeKind};
///
/// let area = FilledArea::new();
/// let shape = Shape::new(ShapeKind::T).spawned();
/// let moved = shape.moved_left(&area).unwrap();
/// let rotated = moved.rotated().unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    kind: ShapeKind,
    cells: [BoardPos; SHAPE_CELLS],
    pivot: Option<usize>,
}

impl Shape {
    /// Creates a shape at its template offsets.
    #[must_use]
    pub const fn new(kind: ShapeKind) -> Self {
        let template = kind.template();
        Self {
            kind,
            cells: template.cells,
            pivot: template.pivot,
        }
    }

    /// Picks one of the seven templates uniformly at random.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random())
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub const fn cells(&self) -> &[BoardPos; SHAPE_CELLS] {
        &self.cells
    }

    /// Index into [`Self::cells`] of the rotation center, `None` if the shape
    /// does not rotate.
    #[must_use]
    pub const fn pivot_index(&self) -> Option<usize> {
        self.pivot
    }

    /// Translates template offsets to the spawn position.
    #[must_use]
    pub const fn spawned(&self) -> Self {
        self.translated(SPAWN_COLUMN, SPAWN_ROW)
    }

    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        let mut cells = self.cells;
        let mut i = 0;
        while i < SHAPE_CELLS {
            cells[i] = cells[i].translated(dx, dy);
            i += 1;
        }
        Self {
            kind: self.kind,
            cells,
            pivot: self.pivot,
        }
    }

    /// Shifts the shape one column left.
    ///
    /// Refused if any cell touches the left wall or the destination of any
    /// cell is settled. Either all four cells move or none do.
    pub fn moved_left(&self, area: &FilledArea) -> Result<Self, MoveError> {
        for cell in &self.cells {
            if cell.is_at_left_wall() {
                return Err(MoveError::Wall);
            }
            if area.contains(cell.left()) {
                return Err(MoveError::Occupied);
            }
        }
        Ok(self.translated(-1, 0))
    }

    /// Shifts the shape one column right. See [`Self::moved_left`].
    pub fn moved_right(&self, area: &FilledArea) -> Result<Self, MoveError> {
        for cell in &self.cells {
            if cell.is_at_right_wall() {
                return Err(MoveError::Wall);
            }
            if area.contains(cell.right()) {
                return Err(MoveError::Occupied);
            }
        }
        Ok(self.translated(1, 0))
    }

    /// Shifts the shape one row down without any checks.
    #[must_use]
    pub const fn fallen(&self) -> Self {
        self.translated(0, -1)
    }

    /// Returns `true` if a gravity step would lock the shape: a cell sits on
    /// the floor or directly above a settled cell.
    #[must_use]
    pub fn is_resting_on(&self, area: &FilledArea) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.is_on_floor() || area.contains(cell.below()))
    }

    #[must_use]
    pub fn overlaps(&self, area: &FilledArea) -> bool {
        self.cells.iter().any(|cell| area.contains(*cell))
    }

    /// Rotates the shape 90° counterclockwise about its pivot cell.
    ///
    /// Each cell's offset `(dx, dy)` from the pivot becomes `(-dy, dx)`.
    /// Returns `None` for shapes without a pivot. No legality checks are made.
    #[must_use]
    pub fn rotated(&self) -> Option<Self> {
        let pivot = self.cells[self.pivot?];
        let cells = self.cells.map(|cell| {
            let dx = cell.x() - pivot.x();
            let dy = cell.y() - pivot.y();
            BoardPos::new(pivot.x() - dy, pivot.y() + dx)
        });
        Some(Self {
            kind: self.kind,
            cells,
            pivot: self.pivot,
        })
    }

    /// Shifts a shape sticking out past a side wall back onto the board.
    ///
    /// Uses only legal single-column moves ([`Self::moved_left`] /
    /// [`Self::moved_right`]) and fails with the first refused move.
    pub fn pushed_inside(&self, area: &FilledArea) -> Result<Self, MoveError> {
        let mut shape = *self;
        loop {
            if shape.cells.iter().any(|cell| cell.is_past_left_wall()) {
                shape = shape.moved_right(area)?;
            } else if shape.cells.iter().any(|cell| cell.is_past_right_wall()) {
                shape = shape.moved_left(area)?;
            } else {
                return Ok(shape);
            }
        }
    }
}

/// The seven shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeKind {
    L = 0,
    J = 1,
    T = 2,
    I = 3,
    Z = 4,
    S = 5,
    O = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::T,
        ShapeKind::I,
        ShapeKind::Z,
        ShapeKind::S,
        ShapeKind::O,
    ];

    const fn template(self) -> ShapeTemplate {
        SHAPE_TEMPLATES[self as usize]
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::L => 'L',
            ShapeKind::J => 'J',
            ShapeKind::T => 'T',
            ShapeKind::I => 'I',
            ShapeKind::Z => 'Z',
            ShapeKind::S => 'S',
            ShapeKind::O => 'O',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'L' => Some(ShapeKind::L),
            'J' => Some(ShapeKind::J),
            'T' => Some(ShapeKind::T),
            'I' => Some(ShapeKind::I),
            'Z' => Some(ShapeKind::Z),
            'S' => Some(ShapeKind::S),
            'O' => Some(ShapeKind::O),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ShapeTemplate {
    cells: [BoardPos; SHAPE_CELLS],
    pivot: Option<usize>,
}

const SHAPE_TEMPLATES: [ShapeTemplate; ShapeKind::LEN] = {
    const fn t(cells: [(i32, i32); SHAPE_CELLS], pivot: Option<usize>) -> ShapeTemplate {
        let mut out = [BoardPos::new(0, 0); SHAPE_CELLS];
        let mut i = 0;
        while i < SHAPE_CELLS {
            out[i] = BoardPos::new(cells[i].0, cells[i].1);
            i += 1;
        }
        ShapeTemplate { cells: out, pivot }
    }

    // (column, row) offsets, row 0 at the bottom
    [
        t([(0, 0), (0, 1), (0, 2), (1, 0)], Some(1)), // L
        t([(0, 0), (1, 0), (1, 1), (1, 2)], Some(2)), // J
        t([(0, 0), (0, 1), (0, 2), (1, 1)], Some(1)), // T
        t([(0, 0), (0, 1), (0, 2), (0, 3)], Some(2)), // I
        t([(0, 1), (1, 0), (1, 1), (2, 0)], Some(2)), // Z
        t([(0, 0), (1, 0), (1, 1), (2, 1)], Some(2)), // S
        t([(0, 0), (1, 0), (0, 1), (1, 1)], None),    // O
    ]
};

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn positions(cells: &[(i32, i32)]) -> Vec<BoardPos> {
        cells.iter().map(|&(x, y)| BoardPos::new(x, y)).collect()
    }

    #[test]
    fn test_templates_have_interior_pivot_except_o() {
        for kind in ShapeKind::ALL {
            let shape = Shape::new(kind);
            match kind {
                ShapeKind::O => assert_eq!(shape.pivot_index(), None),
                _ => assert!(shape.pivot_index().is_some_and(|i| i < SHAPE_CELLS)),
            }
        }
    }

    #[test]
    fn test_spawn_translation() {
        let shape = Shape::new(ShapeKind::I).spawned();
        assert_eq!(
            shape.cells().to_vec(),
            positions(&[(4, 21), (4, 22), (4, 23), (4, 24)])
        );
    }

    #[test]
    fn test_generate_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; ShapeKind::LEN];
        for _ in 0..500 {
            seen[Shape::generate(&mut rng).kind() as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_generate_is_deterministic_for_seed() {
        let mut rng1 = Pcg32::seed_from_u64(42);
        let mut rng2 = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(Shape::generate(&mut rng1), Shape::generate(&mut rng2));
        }
    }

    #[test]
    fn test_rotation_about_pivot() {
        // Vertical I in column 4, pivot at (4, 12)
        let shape = Shape::new(ShapeKind::I).translated(4, 10);
        let rotated = shape.rotated().unwrap();
        assert_eq!(
            rotated.cells().to_vec(),
            positions(&[(6, 12), (5, 12), (4, 12), (3, 12)])
        );
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in ShapeKind::ALL {
            let shape = Shape::new(kind).translated(4, 10);
            let Some(once) = shape.rotated() else {
                assert_eq!(kind, ShapeKind::O);
                continue;
            };
            let back = once.rotated().unwrap().rotated().unwrap().rotated().unwrap();
            assert_eq!(back, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_o_has_no_rotation() {
        assert_eq!(Shape::new(ShapeKind::O).spawned().rotated(), None);
    }

    #[test]
    fn test_moves_stop_at_walls() {
        let area = FilledArea::new();
        let at_left = Shape::new(ShapeKind::T).translated(0, 5);
        assert_eq!(at_left.moved_left(&area), Err(MoveError::Wall));

        let at_right = Shape::new(ShapeKind::T).translated(8, 5);
        assert_eq!(at_right.moved_right(&area), Err(MoveError::Wall));
        assert!(at_right.moved_left(&area).is_ok());
    }

    #[test]
    fn test_moves_stop_at_settled_cells() {
        let mut area = FilledArea::new();
        area.insert(BoardPos::new(3, 6)).unwrap();
        // T occupies columns 4..=5, rows 5..=7
        let shape = Shape::new(ShapeKind::T).translated(4, 5);
        assert_eq!(shape.moved_left(&area), Err(MoveError::Occupied));
        assert_eq!(
            shape.moved_right(&area).unwrap(),
            shape.translated(1, 0)
        );
    }

    #[test]
    fn test_resting_detection() {
        let area = FilledArea::from_ascii("....#.....");
        let on_floor = Shape::new(ShapeKind::O).translated(0, 0);
        assert!(on_floor.is_resting_on(&area));

        let above_cell = Shape::new(ShapeKind::O).translated(3, 1);
        assert!(above_cell.is_resting_on(&area));

        let floating = Shape::new(ShapeKind::O).translated(6, 1);
        assert!(!floating.is_resting_on(&area));
    }

    #[test]
    fn test_pushed_inside_from_both_walls() {
        let area = FilledArea::new();
        let past_left = Shape::new(ShapeKind::I).translated(-2, 0).rotated().unwrap();
        assert!(past_left.cells().iter().any(|c| c.is_past_left_wall()));
        let fixed = past_left.pushed_inside(&area).unwrap();
        assert!(fixed.cells().iter().all(|c| c.x() >= 0 && c.x() <= 9));

        let past_right = Shape::new(ShapeKind::I).translated(11, 0);
        let fixed = past_right.pushed_inside(&area).unwrap();
        assert!(fixed.cells().iter().all(|c| c.x() == 9));
    }

    #[test]
    fn test_pushed_inside_blocked() {
        let area = FilledArea::from_ascii("#.........");
        let past_left = Shape::new(ShapeKind::I).translated(-1, 0);
        assert_eq!(past_left.pushed_inside(&area), Err(MoveError::Occupied));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(ShapeKind::from_char('X'), None);
    }
}
