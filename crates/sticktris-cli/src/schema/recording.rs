use serde::{Deserialize, Serialize};
use sticktris_engine::{Action, FilledArea, GameState, RandomShapes, ShapeSeed};

/// A simulated game, complete enough to be replayed and checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Recording {
    /// Seed of the shape sequence
    pub seed: ShapeSeed,
    /// Every action applied, including refused ones
    pub actions: Vec<Action>,
    /// Settled cells when the recording stopped
    pub final_area: FilledArea,
    pub game_over: bool,
    /// Number of shapes locked into the board
    pub locked_shapes: usize,
}

impl Recording {
    pub(crate) fn new(seed: ShapeSeed, actions: Vec<Action>, game: &GameState) -> Self {
        Self {
            seed,
            actions,
            final_area: game.filled_area().clone(),
            game_over: game.is_game_over(),
            locked_shapes: game.locked_shapes(),
        }
    }

    /// Applies the recorded actions to a fresh game with the recorded seed.
    pub(crate) fn replay(&self) -> GameState {
        let mut game = GameState::with_source(RandomShapes::with_seed(self.seed));
        for action in &self.actions {
            game.apply(*action);
        }
        game
    }

    /// Describes the first difference between `game` and the recorded result.
    pub(crate) fn mismatch(&self, game: &GameState) -> Option<String> {
        if game.is_game_over() != self.game_over {
            return Some(format!(
                "game over flag differs: recorded {}, replayed {}",
                self.game_over,
                game.is_game_over()
            ));
        }
        if game.locked_shapes() != self.locked_shapes {
            return Some(format!(
                "locked shape count differs: recorded {}, replayed {}",
                self.locked_shapes,
                game.locked_shapes()
            ));
        }
        if *game.filled_area() != self.final_area {
            return Some(format!(
                "settled cells differ: recorded {} cells, replayed {} cells",
                self.final_area.len(),
                game.filled_area().len()
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use sticktris_engine::BoardPos;

    use super::*;

    fn recording() -> Recording {
        let seed: ShapeSeed = "ffeeddccbbaa99887766554433221100".parse().unwrap();
        let mut game = GameState::with_source(RandomShapes::with_seed(seed));
        let actions: Vec<_> = [Action::MoveLeft, Action::Rotate]
            .into_iter()
            .chain(std::iter::repeat_n(Action::Fall, 60))
            .collect();
        for action in &actions {
            game.apply(*action);
        }
        Recording::new(seed, actions, &game)
    }

    #[test]
    fn test_replay_matches_recording() {
        let recording = recording();
        assert!(recording.locked_shapes > 0);
        let game = recording.replay();
        assert_eq!(recording.mismatch(&game), None);
    }

    #[test]
    fn test_tampered_recording_detected() {
        let mut recording = recording();
        recording.final_area = FilledArea::new();
        recording.final_area.insert(BoardPos::new(0, 0)).unwrap();
        let game = recording.replay();
        let message = recording.mismatch(&game).unwrap();
        assert!(message.contains("settled cells differ"), "{message}");
    }

    #[test]
    fn test_json_format() {
        let recording = recording();
        let value = serde_json::to_value(&recording).unwrap();
        assert_eq!(value["seed"], "ffeeddccbbaa99887766554433221100");
        assert_eq!(value["actions"][0], "move-left");
        assert_eq!(value["actions"][2], "fall");

        let parsed: Recording = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, recording);
    }
}
