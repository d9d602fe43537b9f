//! CLI command implementations for snnviz

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::VisualizerConfig;
use crate::error::CliResult;

pub mod completions;
pub mod init;
pub mod project;
pub mod run;

/// snnviz - headless driver for the spiking network visualizer
#[derive(Parser, Debug)]
#[command(
    name = "snnviz",
    version,
    about = "Headless driver for the spiking network visualizer",
    long_about = "snnviz builds a clustered spiking network, runs it frame by frame the way \
                  the interactive visualizer does, and exports spike rasters or camera \
                  projections for offline inspection."
)]
pub struct SnnvizCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SNNVIZ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the simulation for a number of frames
    Run(run::RunCommand),

    /// Project every neuron through the orbit camera
    Project(project::ProjectCommand),

    /// Write a default config file
    #[command(alias = "new")]
    Init(init::InitCommand),

    /// Generate shell completions
    Completions(completions::CompletionsCommand),
}

impl SnnvizCli {
    /// Execute the CLI command
    pub fn execute(self) -> CliResult<()> {
        match self.command {
            Commands::Run(cmd) => cmd.execute(load(self.config)?),
            Commands::Project(cmd) => cmd.execute(load(self.config)?),
            Commands::Init(cmd) => cmd.execute(),
            Commands::Completions(cmd) => cmd.execute(),
        }
    }
}

fn load(path: Option<PathBuf>) -> CliResult<VisualizerConfig> {
    VisualizerConfig::resolve(path.as_deref())
}
