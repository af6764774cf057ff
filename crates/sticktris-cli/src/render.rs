//! Plain-text board view for terminals and log files.

use std::fmt;

use sticktris_engine::{BoardPos, COL_COUNT, GameState, ROW_COUNT, Shape, ShapeSource};

/// Renders a game as text, top row first.
///
/// `#` is a settled cell, `@` a cell of the active shape and `.` an empty
/// cell. The board is followed by a preview of the next shape.
#[derive(Debug)]
pub(crate) struct GameView<'a, S> {
    game: &'a GameState<S>,
}

impl<'a, S> GameView<'a, S> {
    pub(crate) fn new(game: &'a GameState<S>) -> Self {
        Self { game }
    }
}

impl<S> fmt::Display for GameView<'_, S>
where
    S: ShapeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let area = self.game.filled_area();
        let active = self.game.current_shape().cells();
        for row in (0..ROW_COUNT).rev() {
            for column in 0..COL_COUNT {
                let ch = match BoardPos::from_grid_index(column, row) {
                    Some(pos) if area.contains(pos) => '#',
                    Some(pos) if active.contains(&pos) => '@',
                    _ => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }

        let next = self.game.next_shape();
        writeln!(f)?;
        writeln!(f, "next: {}", next.kind().as_char())?;
        write_preview(f, next)?;
        if self.game.is_game_over() {
            writeln!(f, "game over")?;
        }
        Ok(())
    }
}

/// Draws a shape at its template offsets inside its bounding box.
fn write_preview(f: &mut fmt::Formatter<'_>, shape: &Shape) -> fmt::Result {
    let cells = shape.cells();
    let width = cells.iter().copied().map(BoardPos::x).max().unwrap_or(0);
    let height = cells.iter().copied().map(BoardPos::y).max().unwrap_or(0);
    for y in (0..=height).rev() {
        for x in 0..=width {
            let ch = if cells.contains(&BoardPos::new(x, y)) {
                '@'
            } else {
                '.'
            };
            write!(f, "{ch}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}
