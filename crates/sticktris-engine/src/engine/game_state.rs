use serde::{Deserialize, Serialize};

use crate::{
    MoveError, RotateError,
    core::{FilledArea, Shape},
};

use super::{
    settle::{self, SettleReport},
    shape_source::{RandomShapes, ShapeSource},
};

/// Result of a single gravity tick.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum FallOutcome {
    /// The game was already over; nothing changed.
    Halted,
    /// The active shape moved down one row.
    Fell,
    /// The active shape locked, the board settled and the next shape spawned.
    Locked(SettleReport),
    /// The active shape locked and the game ended.
    ToppedOut,
}

/// Accepted outcome of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RotateOutcome {
    /// The shape has no pivot and never rotates.
    Fixed,
    /// The rotated shape replaced the active shape.
    Rotated,
}

/// A player or timer input, as recorded for replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    #[display("move-left")]
    MoveLeft,
    #[display("move-right")]
    MoveRight,
    #[display("rotate")]
    Rotate,
    #[display("fall")]
    Fall,
}

/// Read-only view of a game for a render collaborator.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GameSnapshot<'a> {
    pub filled_area: &'a FilledArea,
    pub current_shape: &'a Shape,
    pub next_shape: &'a Shape,
    pub game_over: bool,
}

/// The complete state of one game.
///
/// Holds the settled cells, the active shape (in board space), the next shape
/// (at template offsets, for preview) and the game-over flag. Every operation
/// runs to completion synchronously; refused moves and rotations leave the
/// state exactly as it was.
///
/// # Lifecycle
///
/// 1. Build with [`GameState::new`] or [`GameState::with_source`]
/// 2. Move and rotate the active shape on input
/// 3. Call [`GameState::fall`] on every gravity tick
/// 4. When the shape can fall no further, the tick locks it, clears full rows,
///    settles the remaining groups and spawns the next shape
/// 5. Once a settled cell reaches the top row the game is over and every
///    operation becomes a no-op
#[derive(Debug, Clone)]
pub struct GameState<S = RandomShapes> {
    filled_area: FilledArea,
    current_shape: Shape,
    next_shape: Shape,
    is_game_over: bool,
    source: S,
    locked_shapes: usize,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates a game with randomly seeded shapes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RandomShapes::new())
    }
}

impl<S> GameState<S>
where
    S: ShapeSource,
{
    #[must_use]
    pub fn with_source(mut source: S) -> Self {
        let current_shape = source.next_shape().spawned();
        let next_shape = source.next_shape();
        Self {
            filled_area: FilledArea::new(),
            current_shape,
            next_shape,
            is_game_over: false,
            source,
            locked_shapes: 0,
        }
    }

    #[must_use]
    pub fn filled_area(&self) -> &FilledArea {
        &self.filled_area
    }

    #[must_use]
    pub fn current_shape(&self) -> &Shape {
        &self.current_shape
    }

    #[must_use]
    pub fn next_shape(&self) -> &Shape {
        &self.next_shape
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// Number of shapes locked into the board so far.
    #[must_use]
    pub fn locked_shapes(&self) -> usize {
        self.locked_shapes
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        GameSnapshot {
            filled_area: &self.filled_area,
            current_shape: &self.current_shape,
            next_shape: &self.next_shape,
            game_over: self.is_game_over,
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        self.current_shape = self
            .current_shape
            .moved_left(&self.filled_area)
            .inspect_err(|e| tracing::trace!("move left refused: {e}"))?;
        Ok(())
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        self.current_shape = self
            .current_shape
            .moved_right(&self.filled_area)
            .inspect_err(|e| tracing::trace!("move right refused: {e}"))?;
        Ok(())
    }

    /// Rotates the active shape 90° about its pivot.
    ///
    /// The rotation is refused as a whole if any rotated cell would fall below
    /// the floor or overlap a settled cell. Cells sticking out past a side
    /// wall are pushed back with single-column moves; if that is blocked the
    /// rotation is refused too.
    pub fn try_rotate(&mut self) -> Result<RotateOutcome, RotateError> {
        if self.is_game_over {
            return Err(RotateError::GameOver);
        }
        let Some(rotated) = self.current_shape.rotated() else {
            return Ok(RotateOutcome::Fixed);
        };
        let result = self.check_rotation(rotated);
        if let Err(e) = &result {
            tracing::trace!("rotation refused: {e}");
        }
        self.current_shape = result?;
        Ok(RotateOutcome::Rotated)
    }

    fn check_rotation(&self, rotated: Shape) -> Result<Shape, RotateError> {
        for cell in rotated.cells() {
            if cell.y() < 0 {
                return Err(RotateError::BelowFloor);
            }
            if self.filled_area.contains(*cell) {
                return Err(RotateError::Occupied);
            }
        }
        rotated
            .pushed_inside(&self.filled_area)
            .map_err(|_| RotateError::Blocked)
    }

    /// Returns `true` if the active shape rests on the floor or on a settled
    /// cell, i.e. the next gravity tick locks it.
    #[must_use]
    pub fn is_colliding(&self) -> bool {
        self.current_shape.is_resting_on(&self.filled_area)
    }

    /// Advances gravity by one tick.
    pub fn fall(&mut self) -> FallOutcome {
        if self.is_game_over {
            return FallOutcome::Halted;
        }
        if !self.is_colliding() {
            self.current_shape = self.current_shape.fallen();
            return FallOutcome::Fell;
        }
        self.lock_current_shape()
    }

    fn lock_current_shape(&mut self) -> FallOutcome {
        self.locked_shapes += 1;
        let mut above_board = false;
        for cell in self.current_shape.cells() {
            if self.filled_area.insert(*cell).is_err() {
                above_board = true;
            }
        }
        if above_board {
            return self.top_out("shape locked above the board");
        }

        let report = match settle::clear_lines(&mut self.filled_area) {
            Ok(report) => report,
            Err(e) => return self.top_out(&e.to_string()),
        };
        tracing::debug!(
            kind = ?self.current_shape.kind(),
            cleared_rows = ?report.cleared_rows(),
            groups = report.group_count(),
            "shape locked"
        );

        self.current_shape = self.next_shape.spawned();
        self.next_shape = self.source.next_shape();
        if self.current_shape.overlaps(&self.filled_area) {
            return self.top_out("spawned shape overlaps settled cells");
        }
        FallOutcome::Locked(report)
    }

    fn top_out(&mut self, reason: &str) -> FallOutcome {
        self.is_game_over = true;
        tracing::info!(locked_shapes = self.locked_shapes, "game over: {reason}");
        FallOutcome::ToppedOut
    }

    /// Applies an input and returns `true` if the state changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.try_move_left().is_ok(),
            Action::MoveRight => self.try_move_right().is_ok(),
            Action::Rotate => self.try_rotate().is_ok_and(|outcome| outcome.is_rotated()),
            Action::Fall => !self.fall().is_halted(),
        }
    }
}
