//! Per-frame composition of camera and simulation
//!
//! [`Visualizer`] is what a host owns: one engine, one camera, the pending
//! input and the canvas size. Each [`Visualizer::frame`] applies input to
//! the camera first and then advances the simulation, matching the
//! camera update -> tick(s) -> render order.

use crate::{
    camera::{CameraParams, OrbitCamera},
    input::PendingInput,
    picking::{pick_neuron, DEFAULT_PICK_RADIUS},
    projector::{Projector, Viewport},
};
use snnviz_runtime::{
    ConfigChange, ConfigUpdate, FrameReport, NeuronId, Result, SimulationConfig, SimulationEngine,
};
use std::collections::VecDeque;

/// Voltage samples kept for the selected neuron
pub const TRACE_LEN: usize = 260;

/// Engine, camera and input bundled for a frame loop
#[derive(Debug)]
pub struct Visualizer {
    engine: SimulationEngine,
    camera: OrbitCamera,
    input: PendingInput,
    viewport: Viewport,
    selected: Option<NeuronId>,
    trace: VecDeque<f32>,
}

impl Visualizer {
    /// Build the network and place the camera in its default pose
    pub fn new(config: SimulationConfig, camera: CameraParams, viewport: Viewport) -> Self {
        Self {
            engine: SimulationEngine::new(config),
            camera: OrbitCamera::new(camera),
            input: PendingInput::default(),
            viewport: viewport.sanitized(),
            selected: None,
            trace: VecDeque::with_capacity(TRACE_LEN),
        }
    }

    /// The simulation
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// The camera
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// The camera, for direct manipulation outside the input queue
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Input queue consumed by the next frame
    pub fn input_mut(&mut self) -> &mut PendingInput {
        &mut self.input
    }

    /// Canvas size
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the canvas
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport.sanitized();
    }

    /// Projector for the camera's current pose
    pub fn projector(&self) -> Projector {
        Projector::new(&self.camera, self.viewport)
    }

    /// Apply pending input, then run this frame's ticks
    pub fn frame(&mut self) -> FrameReport {
        self.camera.apply_input(&mut self.input);
        let report = self.engine.advance();
        if !self.engine.is_paused() {
            self.record_trace();
        }
        report
    }

    /// Apply a partial config update; a rebuild clears the voltage trace
    pub fn set_config(&mut self, update: &ConfigUpdate) -> ConfigChange {
        let change = self.engine.set_config(update);
        if change.rebuild {
            self.after_rebuild();
        }
        change
    }

    /// Rebuild the network from the current config
    pub fn rebuild(&mut self) {
        self.engine.rebuild();
        self.after_rebuild();
    }

    /// Set the simulation speed
    pub fn set_speed(&mut self, speed: f32) {
        self.engine.set_speed(speed);
    }

    /// Pause the simulation; the camera keeps responding
    pub fn pause(&mut self) {
        self.engine.pause();
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        self.engine.resume();
    }

    /// Force a neuron to fire; `Ok(false)` while it is refractory
    pub fn inject_spike(&mut self, id: NeuronId) -> Result<bool> {
        self.engine.inject_spike(id)
    }

    /// Force a random neuron to fire
    pub fn inject_random_spike(&mut self) -> Result<Option<NeuronId>> {
        self.engine.inject_random_spike()
    }

    /// Currently selected neuron
    pub fn selected(&self) -> Option<NeuronId> {
        self.selected
    }

    /// Select the neuron under a screen point, if any
    pub fn select_at(&mut self, x: f32, y: f32) -> Option<NeuronId> {
        let hit = pick_neuron(&self.projector(), self.engine.network(), x, y, DEFAULT_PICK_RADIUS);
        if let Some(id) = hit {
            self.set_selected(Some(id));
        }
        hit
    }

    /// Select a neuron by id
    pub fn select(&mut self, id: NeuronId) -> Result<()> {
        self.engine.network().neuron(id)?;
        self.set_selected(Some(id));
        Ok(())
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) {
        self.set_selected(None);
    }

    /// Voltage samples of the selected neuron, oldest first
    pub fn voltage_trace(&self) -> impl Iterator<Item = f32> + '_ {
        self.trace.iter().copied()
    }

    fn set_selected(&mut self, id: Option<NeuronId>) {
        if self.selected != id {
            self.trace.clear();
            if let Some(id) = id {
                log::debug!("Selected neuron {}", id);
            }
        }
        self.selected = id;
    }

    fn record_trace(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        let Ok(neuron) = self.engine.network().neuron(id) else {
            return;
        };
        if self.trace.len() == TRACE_LEN {
            self.trace.pop_front();
        }
        self.trace.push_back(neuron.voltage());
    }

    fn after_rebuild(&mut self) {
        self.trace.clear();
        if let Some(id) = self.selected {
            if self.engine.network().neuron(id).is_err() {
                self.selected = None;
            }
        }
    }
}
