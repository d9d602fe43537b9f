//! Camera projection dump
//!
//! Builds the network from the config and writes where every neuron lands
//! on the canvas for a given camera pose.
//!
//! Example:
//!   snnviz project --yaw 0.3 --pitch 0.4 --distance 1200 --out frame.json

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use snnviz_runtime::{NeuronKind, TopologyBuilder};
use snnviz_view::{OrbitCamera, Projector, Viewport};
use std::path::PathBuf;
use tracing::info;

use crate::config::VisualizerConfig;
use crate::error::{CliError, CliResult};

/// Margin outside the canvas still counted as visible
const CULL_MARGIN: f32 = 200.0;

/// Project every neuron through the orbit camera
#[derive(Args, Debug)]
pub struct ProjectCommand {
    /// Camera yaw in radians
    #[arg(long, allow_hyphen_values = true)]
    pub yaw: Option<f32>,

    /// Camera pitch in radians (clamped away from the poles)
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<f32>,

    /// Orbit distance (clamped to the camera range)
    #[arg(long)]
    pub distance: Option<f32>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<f32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<f32>,

    /// RNG seed for the network
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (stdout if omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Camera pose written alongside the projections
#[derive(Debug, Serialize)]
pub struct CameraRecord {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

/// One projected neuron
#[derive(Debug, Serialize)]
pub struct NeuronProjection {
    pub id: u32,
    pub cluster: usize,
    pub kind: NeuronKind,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub depth: f32,
    pub visible: bool,
}

/// Complete output document
#[derive(Debug, Serialize)]
pub struct ProjectionDump {
    pub camera: CameraRecord,
    pub viewport: Viewport,
    pub neurons: Vec<NeuronProjection>,
}

impl ProjectCommand {
    pub fn execute(self, config: VisualizerConfig) -> CliResult<()> {
        let dump = self.build(config);
        let text = serde_json::to_string_pretty(&dump)
            .map_err(|e| CliError::Generic(anyhow::anyhow!(e)))?;

        match &self.out {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, text)
                    .with_context(|| format!("writing projection to {}", path.display()))?;
                info!("Wrote {} projections to {}", dump.neurons.len(), path.display());
            }
            None => println!("{}", text),
        }
        Ok(())
    }

    fn build(&self, mut config: VisualizerConfig) -> ProjectionDump {
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        let mut viewport = config.viewport;
        if let Some(width) = self.width {
            viewport.width = width;
        }
        if let Some(height) = self.height {
            viewport.height = height;
        }
        let viewport = viewport.sanitized();

        let mut camera = OrbitCamera::new(config.camera);
        camera.set_angles(
            self.yaw.unwrap_or(camera.yaw()),
            self.pitch.unwrap_or(camera.pitch()),
        );
        if let Some(distance) = self.distance {
            camera.set_distance(distance);
        }

        let network = TopologyBuilder::new(&config.simulation).build_seeded();
        let projector = Projector::new(&camera, viewport);

        let neurons = network
            .neurons()
            .iter()
            .map(|neuron| {
                let p = projector.project(neuron.position());
                NeuronProjection {
                    id: neuron.id().raw(),
                    cluster: neuron.cluster(),
                    kind: neuron.kind(),
                    x: p.x,
                    y: p.y,
                    scale: p.scale,
                    depth: p.depth,
                    visible: p.is_in_front() && p.on_screen(&viewport, CULL_MARGIN),
                }
            })
            .collect();

        ProjectionDump {
            camera: CameraRecord {
                position: camera.derive_position().into(),
                target: camera.target().into(),
                yaw: camera.yaw(),
                pitch: camera.pitch(),
                distance: camera.distance(),
            },
            viewport,
            neurons,
        }
    }
}
