use std::io;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use self::{replay::ReplayArg, simulate::SimulateArg};

mod replay;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log engine decisions at debug level (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game with random inputs and write the recording
    Simulate(#[clap(flatten)] SimulateArg),
    /// Re-run a recording and check that it ends the same way
    Replay(#[clap(flatten)] ReplayArg),
}

/// How results are written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Json,
    Text,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "sticktris=debug,sticktris_engine=debug"
    } else {
        "sticktris=info,sticktris_engine=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate_args() {
        let args = CommandArgs::try_parse_from([
            "sticktris",
            "-v",
            "simulate",
            "--seed",
            "0123456789abcdef0123456789abcdef",
            "--max-steps",
            "50",
            "--format",
            "text",
        ])
        .unwrap();
        assert!(args.verbose);
        assert!(matches!(args.mode, Mode::Simulate(_)));
    }

    #[test]
    fn test_reject_malformed_seed() {
        let result = CommandArgs::try_parse_from(["sticktris", "simulate", "--seed", "xyz"]);
        assert!(result.is_err());
    }
}
