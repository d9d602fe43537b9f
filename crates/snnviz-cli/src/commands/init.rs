//! Config file initialization command

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::config::{VisualizerConfig, CONFIG_FILE_NAME};
use crate::error::{CliError, CliResult};

const HEADER: &str = "\
# snnviz configuration
#
# Every key is optional; removed keys fall back to the defaults below.
# Changing anything under [simulation] other than the live parameters
# (threshold, leak, refractory_ticks, background_*, pulse_*,
# spike_history_len) rebuilds the network.

";

/// Write a default config file
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Target path
    #[arg(default_value = CONFIG_FILE_NAME)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn execute(self) -> CliResult<()> {
        if self.path.exists() && !self.force {
            return Err(CliError::invalid_args(format!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            )));
        }

        let body = toml::to_string_pretty(&VisualizerConfig::default())?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{}{}", HEADER, body))?;

        info!("Wrote default config to {}", self.path.display());
        Ok(())
    }
}
