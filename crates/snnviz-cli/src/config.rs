//! Configuration file handling for the snnviz CLI
//!
//! A config file is plain TOML with four optional sections:
//!
//! ```toml
//! [simulation]
//! cluster_count = 4
//! cluster_size = 30
//!
//! [camera]
//! default_distance = 1800.0
//!
//! [viewport]
//! width = 1280.0
//! height = 720.0
//!
//! [driver]
//! frames = 600
//! speed = 1.0
//! ```
//!
//! Missing keys fall back to their defaults.

use serde::{Deserialize, Serialize};
use snnviz_runtime::SimulationConfig;
use snnviz_view::{CameraParams, Viewport};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

/// File name written by `snnviz init`
pub const CONFIG_FILE_NAME: &str = "snnviz.toml";

/// Everything the CLI reads from a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Network and neuron parameters
    pub simulation: SimulationConfig,

    /// Camera tunables and reset pose
    pub camera: CameraParams,

    /// Canvas size used for projection
    pub viewport: Viewport,

    /// Frame loop settings
    pub driver: DriverConfig,
}

/// Headless frame loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Frames to run
    pub frames: u64,

    /// Ticks per frame multiplier
    pub speed: f32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            speed: 1.0,
        }
    }
}

impl VisualizerConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the config for a command
    ///
    /// An explicit path must exist. Without one the per-user config file is
    /// used if present, otherwise built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            info!("Using config {}", path.display());
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => {
                info!("Using config {}", path.display());
                Self::load_from_file(&path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        Ok(config_dir.join("snnviz").join("config.toml"))
    }
}
