use std::path::PathBuf;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use sticktris_engine::{Action, GameState, RandomShapes, ShapeSeed};

use crate::{command::OutputFormat, render::GameView, schema::recording::Recording, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Shape seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<ShapeSeed>,
    /// Seed for the random input policy
    #[arg(long, default_value_t = 0)]
    policy_seed: u64,
    /// Stop after this many actions even if the game is not over
    #[arg(long, default_value_t = 10_000)]
    max_steps: usize,
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Picks inputs at random, falling more often than it moves.
#[derive(Debug, Clone)]
struct RandomPolicy {
    rng: Pcg32,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn next_action(&mut self) -> Action {
        match self.rng.random_range(0..10) {
            0..=1 => Action::MoveLeft,
            2..=3 => Action::MoveRight,
            4..=5 => Action::Rotate,
            _ => Action::Fall,
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        policy_seed,
        max_steps,
        format,
        output,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(%seed, policy_seed, max_steps, "starting simulation");

    let (game, actions) = simulate(seed, *policy_seed, *max_steps);
    tracing::info!(
        steps = actions.len(),
        locked_shapes = game.locked_shapes(),
        game_over = game.is_game_over(),
        "simulation finished"
    );

    match format {
        OutputFormat::Json => {
            let recording = Recording::new(seed, actions, &game);
            Output::save_json(&recording, output.clone())
        }
        OutputFormat::Text => Output::save_text(GameView::new(&game), output.clone()),
    }
}

fn simulate(seed: ShapeSeed, policy_seed: u64, max_steps: usize) -> (GameState, Vec<Action>) {
    let mut game = GameState::with_source(RandomShapes::with_seed(seed));
    let mut policy = RandomPolicy::new(policy_seed);
    let mut actions = Vec::new();
    while !game.is_game_over() && actions.len() < max_steps {
        let action = policy.next_action();
        game.apply(action);
        actions.push(action);
    }
    (game, actions)
}
