//! Spiking network engine behind the snnviz visualizer
//!
//! This crate owns the simulated side of the visualizer: it builds a
//! clustered neuron/synapse graph from a [`SimulationConfig`] and advances it
//! in discrete, tick-synchronous steps. Rendering code only ever reads from
//! it (positions, voltages, pulses, spike history) and writes configuration
//! back through [`SimulationEngine::set_config`].
//!
//! Within a tick every threshold decision is taken on a fully integrated
//! snapshot before any neuron fires, and synaptic input produced by a spike
//! is consumed on the target's *next* tick. There are no delayed callbacks
//! and no same-tick cascades.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod neuron;
pub mod simulation;
pub mod synapse;
pub mod topology;

pub use config::{ClusterLayout, ConfigChange, ConfigUpdate, SimulationConfig, WeightRange, WeightRanges};
pub use error::{Result, RuntimeError};
pub use neuron::{Neuron, NeuronId, NeuronKind, SpikeHistory};
pub use simulation::{FrameReport, SimulationEngine, SpikeEvent, TickReport};
pub use synapse::Synapse;
pub use topology::{Network, NetworkStats, TopologyBuilder};

pub use snnviz_math::Vec3;

/// Discrete simulation time, counted in executed ticks
pub type Tick = u64;

/// Upper bound for the per-frame speed multiplier
pub const MAX_SPEED: f32 = 64.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_integration() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.neuron_count(), config.cluster_count * config.cluster_size);

        let engine = SimulationEngine::new(config.with_seed(7));
        assert_eq!(engine.network().len(), 120);
        assert_eq!(engine.now(), 0);
    }
}
