//! Rules engine for a falling-block puzzle game with sticky gravity.
//!
//! The engine owns the settled cells, the falling shape and the preview shape,
//! and exposes pure state mutations (move, rotate, fall). Rendering, input
//! polling and frame pacing belong to the caller.
//!
//! ```
//! use sticktris_engine::{FallOutcome, GameState, RandomShapes, ShapeSeed};
//!
//! let seed: ShapeSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
//! let mut game = GameState::with_source(RandomShapes::with_seed(seed));
//!
//! game.try_move_left().ok();
//! game.try_rotate().ok();
//! while !game.is_game_over() {
//!     if let FallOutcome::Locked(report) = game.fall() {
//!         println!("cleared rows: {:?}", report.cleared_rows());
//!         break;
//!     }
//! }
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a lateral move of the falling shape was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("shape is touching the board edge")]
    Wall,
    #[display("destination cell is already settled")]
    Occupied,
    #[display("game is over")]
    GameOver,
}

/// Reason a rotation of the falling shape was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RotateError {
    #[display("rotated shape would reach below the floor")]
    BelowFloor,
    #[display("rotated shape would overlap settled cells")]
    Occupied,
    #[display("rotated shape cannot be shifted back inside the board")]
    Blocked,
    #[display("game is over")]
    GameOver,
}

/// A settled cell reached the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("settled cells reached the top row")]
pub struct ToppedOutError;

/// A settled cell was placed outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell {pos} lies outside the board")]
pub struct OutOfBoardError {
    pub pos: BoardPos,
}
