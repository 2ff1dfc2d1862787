//! Binary entry point.
//!
//! Wires the `log` backend to `RUST_LOG` (defaulting to `info`) and
//! hands control to the CLI; every subcommand lives under
//! [`fakt::cli`].

use anyhow::Result;
use env_logger::Env;

use fakt::cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    cli::run()
}
