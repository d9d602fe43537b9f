//! # snnviz - headless spiking network visualizer
//!
//! Runs the clustered spiking network and orbit camera without a window:
//! step frames, export spike rasters, dump projections.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use snnviz_cli::SnnvizCli;

fn main() {
    let cli = SnnvizCli::parse();

    // Initialize logging with environment variable support; stdout is
    // reserved for command output
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = cli.execute() {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }
}
