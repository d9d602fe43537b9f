//! Headless frame loop
//!
//! Drives a [`Visualizer`] exactly as an interactive host would, one frame
//! at a time, and optionally exports every spike as `{tick, neuron, cluster}`.
//!
//! Example:
//!   snnviz run --frames 1200 --speed 2.5 --seed 7 --export raster.json

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use snnviz_runtime::SpikeEvent;
use snnviz_view::Visualizer;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::VisualizerConfig;
use crate::error::{CliError, CliResult};

/// Spike raster file format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Bincode,
}

/// Run the simulation for a number of frames
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Frames to run (overrides [driver].frames)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Ticks per frame (overrides [driver].speed)
    #[arg(long)]
    pub speed: Option<f32>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of clusters
    #[arg(long)]
    pub clusters: Option<usize>,

    /// Neurons per cluster
    #[arg(long)]
    pub cluster_size: Option<usize>,

    /// Write the spike raster to this file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Raster file format
    #[arg(long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Totals of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Frames executed
    pub frames: u64,
    /// Ticks executed
    pub ticks: u64,
    /// Spikes per cluster
    pub cluster_spikes: Vec<u64>,
    /// Every spike, if recorded
    pub raster: Vec<SpikeEvent>,
}

impl RunSummary {
    /// Spikes across all clusters
    pub fn total_spikes(&self) -> u64 {
        self.cluster_spikes.iter().sum()
    }
}

impl RunCommand {
    pub fn execute(self, mut config: VisualizerConfig) -> CliResult<()> {
        self.apply_overrides(&mut config);
        config.simulation.validate()?;

        let frames = config.driver.frames;
        let record = self.export.is_some();
        let progress = if self.no_progress {
            ProgressBar::hidden()
        } else {
            progress_bar(frames)
        };

        let summary = run_frames(&config, record, |_| progress.inc(1));
        progress.finish_and_clear();

        info!(
            "Ran {} frames ({} ticks), {} spikes",
            summary.frames,
            summary.ticks,
            summary.total_spikes()
        );
        for (cluster, spikes) in summary.cluster_spikes.iter().enumerate() {
            info!("  cluster {}: {} spikes", cluster, spikes);
        }

        println!(
            "frames={} ticks={} spikes={}",
            summary.frames,
            summary.ticks,
            summary.total_spikes()
        );

        if let Some(path) = &self.export {
            export_raster(&summary.raster, path, self.format)?;
        }
        Ok(())
    }

    fn apply_overrides(&self, config: &mut VisualizerConfig) {
        if let Some(frames) = self.frames {
            config.driver.frames = frames;
        }
        if let Some(speed) = self.speed {
            config.driver.speed = speed;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(clusters) = self.clusters {
            config.simulation.cluster_count = clusters;
        }
        if let Some(size) = self.cluster_size {
            config.simulation.cluster_size = size;
        }
    }
}

/// Run `config.driver.frames` frames, calling `on_frame` after each
pub fn run_frames<F>(config: &VisualizerConfig, record: bool, mut on_frame: F) -> RunSummary
where
    F: FnMut(u64),
{
    let mut vis = Visualizer::new(
        config.simulation.clone(),
        config.camera,
        config.viewport,
    );
    vis.set_speed(config.driver.speed);

    let mut summary = RunSummary {
        cluster_spikes: vec![0; vis.engine().network().cluster_count()],
        ..Default::default()
    };

    for frame in 0..config.driver.frames {
        let report = vis.frame();
        summary.frames += 1;
        summary.ticks += u64::from(report.ticks);
        for spike in &report.spikes {
            summary.cluster_spikes[spike.cluster] += 1;
        }
        if record {
            summary.raster.extend_from_slice(&report.spikes);
        }
        on_frame(frame);
    }

    debug!("Network after run: {}", vis.engine().network().stats());
    summary
}

fn progress_bar(frames: u64) -> ProgressBar {
    let bar = ProgressBar::new(frames);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} frames")
    {
        bar.set_style(style);
    }
    bar
}

fn export_raster(raster: &[SpikeEvent], path: &Path, format: ExportFormat) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match format {
        ExportFormat::Json => {
            let text = serde_json::to_string_pretty(raster)
                .map_err(|e| CliError::Generic(anyhow::anyhow!(e)))?;
            std::fs::write(path, text)
                .with_context(|| format!("writing raster to {}", path.display()))?;
        }
        ExportFormat::Bincode => {
            let bytes = bincode::serialize(raster)
                .map_err(|e| CliError::Generic(anyhow::anyhow!(e)))?;
            std::fs::write(path, bytes)
                .with_context(|| format!("writing raster to {}", path.display()))?;
        }
    }

    info!("Exported {} spikes to {}", raster.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(frames: u64, speed: f32) -> VisualizerConfig {
        let mut config = VisualizerConfig::default();
        config.simulation.seed = Some(3);
        config.driver.frames = frames;
        config.driver.speed = speed;
        config
    }

    #[test]
    fn test_run_frames_counts() {
        let mut calls = 0;
        let summary = run_frames(&config(20, 1.5), true, |_| calls += 1);
        assert_eq!(calls, 20);
        assert_eq!(summary.frames, 20);
        assert_eq!(summary.ticks, 30);
        assert_eq!(summary.cluster_spikes.len(), 4);
        assert_eq!(summary.raster.len() as u64, summary.total_spikes());
    }

    #[test]
    fn test_same_seed_same_raster() {
        let a = run_frames(&config(50, 1.0), true, |_| {});
        let b = run_frames(&config(50, 1.0), true, |_| {});
        assert_eq!(a, b);
    }

    #[test]
    fn test_overrides() {
        let cmd = RunCommand {
            frames: Some(5),
            speed: Some(2.0),
            seed: Some(11),
            clusters: Some(3),
            cluster_size: Some(7),
            export: None,
            format: ExportFormat::Json,
            no_progress: true,
        };
        let mut config = VisualizerConfig::default();
        cmd.apply_overrides(&mut config);
        assert_eq!(config.driver.frames, 5);
        assert_eq!(config.driver.speed, 2.0);
        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.simulation.neuron_count(), 21);
    }
}
