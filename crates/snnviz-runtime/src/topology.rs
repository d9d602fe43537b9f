//! Clustered network topology
//!
//! [`TopologyBuilder`] turns a [`SimulationConfig`] into a fresh [`Network`].
//! Neuron ids are contiguous per cluster (`cluster = id / cluster_size`), and
//! every ordered pair `(i, j)`, `i != j`, gets an independent Bernoulli trial
//! for a directed synapse `i -> j`. Same-cluster pairs use
//! `connection_prob * intra_cluster_factor`, cross-cluster pairs
//! `connection_prob * inter_cluster_factor`, which biases the graph toward
//! small-world clustering. Weights are not mirrored: `i -> j` and `j -> i`
//! are drawn separately.
//!
//! Networks are never patched in place. A rebuild discards the previous
//! network wholesale and builds a new one.

use crate::{
    config::SimulationConfig,
    error::*,
    neuron::{Neuron, NeuronId, NeuronKind},
    synapse::Synapse,
    Tick, Vec3,
};
use core::fmt;
use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};

/// The neuron/synapse graph
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) neurons: Vec<Neuron>,
    cluster_count: usize,
    cluster_size: usize,
}

impl Network {
    /// Number of neurons
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// True if the network has no neurons
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Number of clusters
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Neurons per cluster
    pub fn cluster_size(&self) -> usize {
        self.cluster_size
    }

    /// All neurons in id order
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Look up a neuron
    pub fn neuron(&self, id: NeuronId) -> Result<&Neuron> {
        self.neurons
            .get(id.index())
            .ok_or_else(|| RuntimeError::neuron_not_found(id.raw(), self.neurons.len()))
    }

    /// Look up a neuron for modification
    pub fn neuron_mut(&mut self, id: NeuronId) -> Result<&mut Neuron> {
        let len = self.neurons.len();
        self.neurons
            .get_mut(id.index())
            .ok_or_else(|| RuntimeError::neuron_not_found(id.raw(), len))
    }

    /// All synapses, grouped by source neuron
    pub fn synapses(&self) -> impl Iterator<Item = &Synapse> + '_ {
        self.neurons.iter().flat_map(|n| n.outgoing.iter())
    }

    /// Total synapse count
    pub fn synapse_count(&self) -> usize {
        self.neurons.iter().map(|n| n.outgoing.len()).sum()
    }

    /// Cluster of a neuron id
    pub fn cluster_of(&self, id: NeuronId) -> usize {
        id.index() / self.cluster_size.max(1)
    }

    /// Neurons of one cluster
    pub fn cluster_neurons(&self, cluster: usize) -> &[Neuron] {
        let len = self.neurons.len();
        let start = cluster.saturating_mul(self.cluster_size).min(len);
        let end = start.saturating_add(self.cluster_size).min(len);
        &self.neurons[start..end]
    }

    /// Neurons that fired within the last `window` ticks
    pub fn recently_fired(&self, now: Tick, window: Tick) -> impl Iterator<Item = &Neuron> + '_ {
        self.neurons.iter().filter(move |n| n.fired_within(now, window))
    }

    /// True if any neuron in `cluster` has `pulse / pulse_intensity` above `fraction`
    pub fn cluster_active(&self, cluster: usize, pulse_intensity: f32, fraction: f32) -> bool {
        if pulse_intensity <= 0.0 {
            return false;
        }
        self.cluster_neurons(cluster)
            .iter()
            .any(|n| n.pulse / pulse_intensity > fraction)
    }

    /// Summary counts
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats {
            neurons: self.neurons.len(),
            clusters: self.cluster_count,
            ..Default::default()
        };
        for neuron in &self.neurons {
            if neuron.kind.is_excitatory() {
                stats.excitatory += 1;
            } else {
                stats.inhibitory += 1;
            }
            for synapse in &neuron.outgoing {
                stats.synapses += 1;
                if self.cluster_of(synapse.target()) == neuron.cluster {
                    stats.intra_cluster += 1;
                } else {
                    stats.inter_cluster += 1;
                }
            }
        }
        stats
    }

    /// Fire neuron `index` at `now` and queue its synaptic output
    ///
    /// The output lands in each target's input accumulator and is only
    /// integrated on the target's next tick.
    pub(crate) fn fire(&mut self, index: usize, now: Tick, config: &SimulationConfig) {
        self.neurons[index].reset(now, config.refractory_ticks, config.pulse_intensity);
        for k in 0..self.neurons[index].outgoing.len() {
            let synapse = self.neurons[index].outgoing[k];
            self.neurons[synapse.target().index()].receive_input(synapse.weight());
        }
    }
}

/// Summary counts of a network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkStats {
    /// Neuron count
    pub neurons: usize,
    /// Cluster count
    pub clusters: usize,
    /// Synapse count
    pub synapses: usize,
    /// Synapses whose endpoints share a cluster
    pub intra_cluster: usize,
    /// Synapses crossing clusters
    pub inter_cluster: usize,
    /// Excitatory neurons
    pub excitatory: usize,
    /// Inhibitory neurons
    pub inhibitory: usize,
}

impl NetworkStats {
    /// Mean outgoing synapses per neuron
    pub fn mean_out_degree(&self) -> f32 {
        if self.neurons == 0 {
            return 0.0;
        }
        self.synapses as f32 / self.neurons as f32
    }
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} neurons in {} clusters ({} exc / {} inh), {} synapses ({} intra / {} inter, {:.2} per neuron)",
            self.neurons,
            self.clusters,
            self.excitatory,
            self.inhibitory,
            self.synapses,
            self.intra_cluster,
            self.inter_cluster,
            self.mean_out_degree()
        )
    }
}

/// Builds clustered networks from a config
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    config: SimulationConfig,
}

impl TopologyBuilder {
    /// Create a builder; the config is sanitized first
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    /// The sanitized config this builder uses
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Build with an RNG seeded from `config.seed`, or from entropy if unset
    pub fn build_seeded(&self) -> Network {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build(&mut rng)
    }

    /// Build the network, drawing all randomness from `rng`
    ///
    /// Draw order is fixed (neurons, then synapses row by row, then seed
    /// fires) so the same RNG state always yields the same network.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let config = &self.config;
        let cluster_count = config.cluster_count;
        let cluster_size = config.cluster_size;
        let total = config.neuron_count();

        let mut neurons = Vec::with_capacity(total);
        for i in 0..total {
            let cluster = i / cluster_size;
            let kind = if rng.gen::<f32>() < config.excitatory_fraction {
                NeuronKind::Excitatory
            } else {
                NeuronKind::Inhibitory
            };
            let center = config.layout.center(cluster, cluster_count);
            let spread = config.layout.spread;
            let offset = Vec3::new(
                (rng.gen::<f32>() - 0.5) * spread,
                (rng.gen::<f32>() - 0.5) * spread,
                (rng.gen::<f32>() - 0.5) * spread,
            );
            let mut neuron = Neuron::new(
                NeuronId::new(i as u32),
                cluster,
                kind,
                center + offset,
                config.spike_history_len,
            );
            neuron.voltage = rng.gen::<f32>() * 0.3;
            neurons.push(neuron);
        }

        let intra_p = config.pair_probability(true);
        let inter_p = config.pair_probability(false);
        for i in 0..total {
            let source_cluster = neurons[i].cluster;
            let source_kind = neurons[i].kind;
            let mut outgoing = Vec::new();
            for j in 0..total {
                if i == j {
                    continue;
                }
                let same_cluster = neurons[j].cluster == source_cluster;
                let p = if same_cluster { intra_p } else { inter_p };
                if rng.gen::<f32>() < p {
                    let magnitude = config.weights.for_pair(same_cluster, source_kind).sample(rng);
                    outgoing.push(Synapse::new(
                        NeuronId::new(i as u32),
                        NeuronId::new(j as u32),
                        source_kind,
                        magnitude,
                    ));
                }
            }
            neurons[i].outgoing = outgoing;
        }

        let mut network = Network {
            neurons,
            cluster_count,
            cluster_size,
        };

        let seeds = config.seeds_per_cluster.min(cluster_size);
        for cluster in 0..cluster_count {
            for offset in index::sample(rng, cluster_size, seeds).into_iter() {
                network.fire(cluster * cluster_size + offset, 0, config);
            }
        }

        log::info!("Built network: {}", network.stats());
        network
    }
}
