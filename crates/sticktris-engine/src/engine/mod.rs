//! Game rules built on the core board types.
//!
//! - [`GameState`] - one game: settled cells, active and next shape, game over
//! - [`clear_lines`] - row clearing and sticky settling after every lock
//! - [`ShapeSource`] - where new shapes come from ([`RandomShapes`],
//!   [`ScriptedShapes`])
//! - [`ShapeSeed`] - seed for deterministic shape generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameState`] from a shape source
//! 2. The caller moves and rotates the active shape on input
//! 3. The caller calls [`GameState::fall`] on every gravity tick
//! 4. A shape that can fall no further locks, the board settles and the next
//!    shape spawns
//! 5. Repeat until a settled cell reaches the top row
//!
//! # Example
//!
//! ```
//! use sticktris_engine::{Action, GameState, ScriptedShapes, ShapeKind};
//!
//! let mut game = GameState::with_source(ScriptedShapes::new([ShapeKind::O]));
//! assert!(game.apply(Action::MoveLeft));
//! assert!(!game.apply(Action::Rotate));
//!
//! while !game.fall().is_locked() {}
//! assert_eq!(game.filled_area().len(), 4);
//! ```

pub use self::{game_state::*, settle::*, shape_source::*};

mod game_state;
mod settle;
mod shape_source;
