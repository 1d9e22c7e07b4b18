//! `lapmap` binary.

use std::process::ExitCode;

use clap::Parser;
use lapmap_config::CliArgs;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match lapmap_app::run(&args) {
        Ok(path) => {
            tracing::info!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
