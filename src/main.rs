// Entrypoint for the `actopus` CLI.
// - Keeps `main` small: set up logging, parse flags and hand over to `ui::run`.
// - Any error that reaches this point is fatal and exits non-zero.

use std::io;
use std::process::ExitCode;

use actopus::{cli::Cli, ui};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warnings only, or our debug output with -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "actopus=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match ui::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
