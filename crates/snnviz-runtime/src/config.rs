//! Simulation configuration
//!
//! [`SimulationConfig`] is the complete parameter set for one network. It
//! never stores a neuron count: that is always derived from
//! `cluster_count * cluster_size`, so the two can not drift apart.
//!
//! Out-of-range values are clamped rather than rejected. [`SimulationConfig::validate`]
//! exists for hosts that want to report a bad config file before it is
//! silently corrected by [`SimulationConfig::sanitized`].

use crate::{error::*, neuron::NeuronKind, Tick};
use rand::Rng;
use snnviz_math::{clamp_finite, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted cluster count
pub const MAX_CLUSTERS: usize = 256;
/// Largest accepted cluster size
pub const MAX_CLUSTER_SIZE: usize = 4096;
/// Leak factor bounds; the open interval (0, 1) is approximated by these
pub const LEAK_RANGE: (f32, f32) = (1e-3, 0.9999);
/// Threshold bounds
pub const THRESHOLD_RANGE: (f32, f32) = (1e-2, 100.0);
/// Bound for the intra/inter connection multipliers
pub const MAX_CONNECTION_FACTOR: f32 = 10.0;
/// Bound for impulse, pulse intensity and weight magnitudes
pub const MAX_MAGNITUDE: f32 = 10.0;
/// Bound for the per-neuron spike history length
pub const MAX_SPIKE_HISTORY: usize = 1024;

/// Inclusive-exclusive magnitude range a synapse weight is drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightRange {
    /// Smallest magnitude
    pub min: f32,
    /// Largest magnitude
    pub max: f32,
}

impl WeightRange {
    /// Create a new range
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Non-negative, finite and ordered copy of this range
    pub fn sanitized(self) -> Self {
        let a = clamp_finite(self.min.abs(), 0.0, MAX_MAGNITUDE);
        let b = clamp_finite(self.max.abs(), 0.0, MAX_MAGNITUDE);
        Self::new(a.min(b), a.max(b))
    }

    /// Draw a magnitude uniformly from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }

    /// True if `magnitude` lies inside the range
    pub fn contains(&self, magnitude: f32) -> bool {
        magnitude >= self.min && magnitude <= self.max
    }
}

/// Weight magnitude ranges by (same cluster?, source type)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeightRanges {
    /// Excitatory source, same cluster
    pub intra_excitatory: WeightRange,
    /// Excitatory source, other cluster
    pub inter_excitatory: WeightRange,
    /// Inhibitory source, same cluster
    pub intra_inhibitory: WeightRange,
    /// Inhibitory source, other cluster
    pub inter_inhibitory: WeightRange,
}

impl Default for WeightRanges {
    fn default() -> Self {
        Self {
            intra_excitatory: WeightRange::new(0.4, 1.0),
            inter_excitatory: WeightRange::new(0.1, 0.4),
            intra_inhibitory: WeightRange::new(0.2, 0.6),
            inter_inhibitory: WeightRange::new(0.05, 0.2),
        }
    }
}

impl WeightRanges {
    /// Range for a connection with the given locality and source type
    pub fn for_pair(&self, same_cluster: bool, source: NeuronKind) -> WeightRange {
        match (same_cluster, source) {
            (true, NeuronKind::Excitatory) => self.intra_excitatory,
            (false, NeuronKind::Excitatory) => self.inter_excitatory,
            (true, NeuronKind::Inhibitory) => self.intra_inhibitory,
            (false, NeuronKind::Inhibitory) => self.inter_inhibitory,
        }
    }

    fn sanitized(self) -> Self {
        Self {
            intra_excitatory: self.intra_excitatory.sanitized(),
            inter_excitatory: self.inter_excitatory.sanitized(),
            intra_inhibitory: self.intra_inhibitory.sanitized(),
            inter_inhibitory: self.inter_inhibitory.sanitized(),
        }
    }
}

/// Spatial layout of cluster centres
///
/// Centres sit on a grid in the z = 0 plane, `ceil(sqrt(clusters))` columns
/// wide, centred on the origin. Neurons are scattered uniformly in a cube of
/// side `spread` around their centre.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterLayout {
    /// Distance between neighbouring cluster centres
    pub spacing: f32,
    /// Edge length of the cube neurons are scattered in
    pub spread: f32,
}

impl Default for ClusterLayout {
    fn default() -> Self {
        Self {
            spacing: 300.0,
            spread: 350.0,
        }
    }
}

impl ClusterLayout {
    /// Centre of `cluster` when `cluster_count` clusters are laid out
    pub fn center(&self, cluster: usize, cluster_count: usize) -> Vec3 {
        let count = cluster_count.max(1);
        let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
        let rows = (count + cols - 1) / cols;
        let col = cluster % cols;
        let row = cluster / cols;
        let x = (col as f32 - (cols as f32 - 1.0) / 2.0) * self.spacing;
        let y = (row as f32 - (rows as f32 - 1.0) / 2.0) * self.spacing;
        Vec3::new(x, y, 0.0)
    }

    fn sanitized(self) -> Self {
        Self {
            spacing: clamp_finite(self.spacing, 0.0, 1e5),
            spread: clamp_finite(self.spread, 0.0, 1e5),
        }
    }
}

/// Complete parameter set for one network
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Number of clusters
    pub cluster_count: usize,
    /// Neurons per cluster
    pub cluster_size: usize,
    /// Base connection probability
    pub connection_prob: f32,
    /// Multiplier on `connection_prob` for same-cluster pairs
    pub intra_cluster_factor: f32,
    /// Multiplier on `connection_prob` for cross-cluster pairs
    pub inter_cluster_factor: f32,
    /// Weight magnitude ranges
    pub weights: WeightRanges,
    /// Voltage retained per tick, in (0, 1)
    pub leak: f32,
    /// Ticks a neuron stays refractory after firing
    pub refractory_ticks: Tick,
    /// Per-tick probability of a background impulse
    pub background_rate: f32,
    /// Voltage added by one background impulse
    pub background_impulse: f32,
    /// Firing threshold
    pub threshold: f32,
    /// Probability a neuron is excitatory
    pub excitatory_fraction: f32,
    /// Visual pulse retained per tick
    pub pulse_decay: f32,
    /// Visual pulse value set on a spike
    pub pulse_intensity: f32,
    /// Neurons per cluster forced to fire at build time
    pub seeds_per_cluster: usize,
    /// Spike timestamps kept per neuron
    pub spike_history_len: usize,
    /// Cluster placement
    pub layout: ClusterLayout,
    /// RNG seed; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cluster_count: 4,
            cluster_size: 30,
            connection_prob: 0.3,
            intra_cluster_factor: 1.8,
            inter_cluster_factor: 0.08,
            weights: WeightRanges::default(),
            leak: 0.985,
            refractory_ticks: 4,
            background_rate: 0.002,
            background_impulse: 0.05,
            threshold: 1.0,
            excitatory_fraction: 0.8,
            pulse_decay: 0.95,
            pulse_intensity: 1.5,
            seeds_per_cluster: 2,
            spike_history_len: 32,
            layout: ClusterLayout::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Total neuron count, always `cluster_count * cluster_size`
    pub fn neuron_count(&self) -> usize {
        self.cluster_count * self.cluster_size
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set cluster count and size together
    pub fn with_clusters(mut self, cluster_count: usize, cluster_size: usize) -> Self {
        self.cluster_count = cluster_count;
        self.cluster_size = cluster_size;
        self
    }

    /// Connection probability for a pair with the given locality, capped at 1
    pub fn pair_probability(&self, same_cluster: bool) -> f32 {
        let factor = if same_cluster {
            self.intra_cluster_factor
        } else {
            self.inter_cluster_factor
        };
        (self.connection_prob * factor).clamp(0.0, 1.0)
    }

    /// Report the first out-of-range value, if any
    pub fn validate(&self) -> Result<()> {
        if self.cluster_count == 0 || self.cluster_count > MAX_CLUSTERS {
            return Err(RuntimeError::invalid_parameter(
                "cluster_count",
                self.cluster_count.to_string(),
                format!("in [1, {}]", MAX_CLUSTERS),
            ));
        }
        if self.cluster_size == 0 || self.cluster_size > MAX_CLUSTER_SIZE {
            return Err(RuntimeError::invalid_parameter(
                "cluster_size",
                self.cluster_size.to_string(),
                format!("in [1, {}]", MAX_CLUSTER_SIZE),
            ));
        }
        check_range("connection_prob", self.connection_prob, 0.0, 1.0)?;
        check_range("intra_cluster_factor", self.intra_cluster_factor, 0.0, MAX_CONNECTION_FACTOR)?;
        check_range("inter_cluster_factor", self.inter_cluster_factor, 0.0, MAX_CONNECTION_FACTOR)?;
        check_range("leak", self.leak, LEAK_RANGE.0, LEAK_RANGE.1)?;
        check_range("threshold", self.threshold, THRESHOLD_RANGE.0, THRESHOLD_RANGE.1)?;
        check_range("background_rate", self.background_rate, 0.0, 1.0)?;
        check_range("background_impulse", self.background_impulse, 0.0, MAX_MAGNITUDE)?;
        check_range("excitatory_fraction", self.excitatory_fraction, 0.0, 1.0)?;
        check_range("pulse_decay", self.pulse_decay, 0.0, 1.0)?;
        check_range("pulse_intensity", self.pulse_intensity, 0.0, MAX_MAGNITUDE)?;
        if self.spike_history_len == 0 || self.spike_history_len > MAX_SPIKE_HISTORY {
            return Err(RuntimeError::invalid_parameter(
                "spike_history_len",
                self.spike_history_len.to_string(),
                format!("in [1, {}]", MAX_SPIKE_HISTORY),
            ));
        }
        if self.weights.sanitized() != self.weights {
            return Err(RuntimeError::invalid_config(
                "weight ranges must be finite, non-negative and ordered min <= max",
            ));
        }
        Ok(())
    }

    /// Copy of this config with every value clamped into range
    pub fn sanitized(&self) -> Self {
        Self {
            cluster_count: clamp_count("cluster_count", self.cluster_count, 1, MAX_CLUSTERS),
            cluster_size: clamp_count("cluster_size", self.cluster_size, 1, MAX_CLUSTER_SIZE),
            connection_prob: clamp_logged("connection_prob", self.connection_prob, 0.0, 1.0),
            intra_cluster_factor: clamp_logged(
                "intra_cluster_factor",
                self.intra_cluster_factor,
                0.0,
                MAX_CONNECTION_FACTOR,
            ),
            inter_cluster_factor: clamp_logged(
                "inter_cluster_factor",
                self.inter_cluster_factor,
                0.0,
                MAX_CONNECTION_FACTOR,
            ),
            weights: self.weights.sanitized(),
            leak: clamp_logged("leak", self.leak, LEAK_RANGE.0, LEAK_RANGE.1),
            refractory_ticks: self.refractory_ticks,
            background_rate: clamp_logged("background_rate", self.background_rate, 0.0, 1.0),
            background_impulse: clamp_logged(
                "background_impulse",
                self.background_impulse,
                0.0,
                MAX_MAGNITUDE,
            ),
            threshold: clamp_logged("threshold", self.threshold, THRESHOLD_RANGE.0, THRESHOLD_RANGE.1),
            excitatory_fraction: clamp_logged("excitatory_fraction", self.excitatory_fraction, 0.0, 1.0),
            pulse_decay: clamp_logged("pulse_decay", self.pulse_decay, 0.0, 1.0),
            pulse_intensity: clamp_logged("pulse_intensity", self.pulse_intensity, 0.0, MAX_MAGNITUDE),
            seeds_per_cluster: self.seeds_per_cluster,
            spike_history_len: clamp_count("spike_history_len", self.spike_history_len, 1, MAX_SPIKE_HISTORY),
            layout: self.layout.sanitized(),
            seed: self.seed,
        }
    }

    /// Apply a partial update, clamping every provided value
    pub fn apply(&mut self, update: &ConfigUpdate) -> ConfigChange {
        let before = self.clone();
        let mut next = self.clone();

        if let Some(v) = update.cluster_count {
            next.cluster_count = v;
        }
        if let Some(v) = update.cluster_size {
            next.cluster_size = v;
        }
        if let Some(v) = update.connection_prob {
            next.connection_prob = v;
        }
        if let Some(v) = update.intra_cluster_factor {
            next.intra_cluster_factor = v;
        }
        if let Some(v) = update.inter_cluster_factor {
            next.inter_cluster_factor = v;
        }
        if let Some(v) = update.weights {
            next.weights = v;
        }
        if let Some(v) = update.leak {
            next.leak = v;
        }
        if let Some(v) = update.refractory_ticks {
            next.refractory_ticks = v;
        }
        if let Some(v) = update.background_rate {
            next.background_rate = v;
        }
        if let Some(v) = update.background_impulse {
            next.background_impulse = v;
        }
        if let Some(v) = update.threshold {
            next.threshold = v;
        }
        if let Some(v) = update.excitatory_fraction {
            next.excitatory_fraction = v;
        }
        if let Some(v) = update.pulse_decay {
            next.pulse_decay = v;
        }
        if let Some(v) = update.pulse_intensity {
            next.pulse_intensity = v;
        }
        if let Some(v) = update.seeds_per_cluster {
            next.seeds_per_cluster = v;
        }
        if let Some(v) = update.spike_history_len {
            next.spike_history_len = v;
        }
        if let Some(v) = update.layout {
            next.layout = v;
        }
        if let Some(v) = update.seed {
            next.seed = v;
        }

        *self = next.sanitized();

        let change = ConfigChange {
            changed: *self != before,
            rebuild: self.topology_differs(&before),
        };
        if change.changed {
            log::debug!(
                "Config updated (rebuild: {}, neurons: {} -> {})",
                change.rebuild,
                before.neuron_count(),
                self.neuron_count()
            );
        }
        change
    }

    /// True if `other` would produce a different graph from the same RNG stream
    pub fn topology_differs(&self, other: &SimulationConfig) -> bool {
        self.cluster_count != other.cluster_count
            || self.cluster_size != other.cluster_size
            || self.connection_prob != other.connection_prob
            || self.intra_cluster_factor != other.intra_cluster_factor
            || self.inter_cluster_factor != other.inter_cluster_factor
            || self.weights != other.weights
            || self.excitatory_fraction != other.excitatory_fraction
            || self.seeds_per_cluster != other.seeds_per_cluster
            || self.layout != other.layout
            || self.seed != other.seed
    }
}

/// Partial configuration update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(missing_docs)]
pub struct ConfigUpdate {
    pub cluster_count: Option<usize>,
    pub cluster_size: Option<usize>,
    pub connection_prob: Option<f32>,
    pub intra_cluster_factor: Option<f32>,
    pub inter_cluster_factor: Option<f32>,
    pub weights: Option<WeightRanges>,
    pub leak: Option<f32>,
    pub refractory_ticks: Option<Tick>,
    pub background_rate: Option<f32>,
    pub background_impulse: Option<f32>,
    pub threshold: Option<f32>,
    pub excitatory_fraction: Option<f32>,
    pub pulse_decay: Option<f32>,
    pub pulse_intensity: Option<f32>,
    pub seeds_per_cluster: Option<usize>,
    pub spike_history_len: Option<usize>,
    pub layout: Option<ClusterLayout>,
    /// `Some(None)` clears the seed
    pub seed: Option<Option<u64>>,
}

/// Outcome of [`SimulationConfig::apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChange {
    /// Any stored value changed
    pub changed: bool,
    /// The change affects topology and the network must be rebuilt
    pub rebuild: bool,
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(RuntimeError::invalid_parameter(
            name,
            value.to_string(),
            format!("in [{}, {}]", min, max),
        ))
    }
}

fn clamp_logged(name: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = clamp_finite(value, min, max);
    if clamped != value {
        log::warn!("{} = {} out of range, clamped to {}", name, value, clamped);
    }
    clamped
}

fn clamp_count(name: &str, value: usize, min: usize, max: usize) -> usize {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{} = {} out of range, clamped to {}", name, value, clamped);
    }
    clamped
}
