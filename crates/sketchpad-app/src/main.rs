//! Replay a recorded input script and print the resulting editor state.

use clap::Parser;
use sketchpad_app::{replay, ReplayError, Script, Snapshot};
use sketchpad_core::SketchConfig;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "sketchpad-replay", about = "Replay a Sketchpad input script")]
struct Cli {
    /// JSON script of host events and actions.
    script: PathBuf,

    /// JSON editor settings. Defaults are used when omitted.
    #[arg(long, env = "SKETCHPAD_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,
}

fn run(cli: &Cli) -> Result<String, ReplayError> {
    let config = match &cli.config {
        Some(path) => SketchConfig::load(path)?,
        None => SketchConfig::default(),
    };
    let script = Script::load(&cli.script)?;
    let canvas = replay(&script, config);
    let snapshot = Snapshot::capture(&canvas);
    let output = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Replaying {}", cli.script.display());

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("sketchpad-replay: {err}");
            ExitCode::FAILURE
        }
    }
}
