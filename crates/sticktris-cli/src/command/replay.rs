use std::path::PathBuf;

use anyhow::bail;

use crate::{
    command::OutputFormat,
    render::GameView,
    schema::recording::Recording,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the recording file (JSON format)
    recording_file: PathBuf,
    /// Output format for the final game state
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        recording_file,
        format,
    } = arg;

    tracing::info!(path = %recording_file.display(), "loading recording");
    let recording: Recording = util::read_json_file("recording", recording_file)?;
    tracing::info!(
        seed = %recording.seed,
        actions = recording.actions.len(),
        "replaying"
    );

    let game = recording.replay();
    if let Some(mismatch) = recording.mismatch(&game) {
        bail!(
            "Replay of {} diverged: {mismatch}",
            recording_file.display()
        );
    }
    tracing::info!(locked_shapes = game.locked_shapes(), "replay matches recording");

    match format {
        OutputFormat::Json => Output::save_json(&game.snapshot(), None),
        OutputFormat::Text => Output::save_text(GameView::new(&game), None),
    }
}
