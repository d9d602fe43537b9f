//! Directed weighted connections

use crate::neuron::{NeuronId, NeuronKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Directed connection from `source` to `target`
///
/// Synapses refer to neurons by ID only; the source neuron owns the synapse
/// in its outgoing list. The weight sign always matches the source type:
/// the constructor takes a magnitude and applies the sign itself, so an
/// inhibitory neuron can not end up with a positive outgoing weight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Synapse {
    source: NeuronId,
    target: NeuronId,
    weight: f32,
}

impl Synapse {
    /// Create a synapse whose weight sign is fixed by `source_kind`
    pub fn new(source: NeuronId, target: NeuronId, source_kind: NeuronKind, magnitude: f32) -> Self {
        Self {
            source,
            target,
            weight: source_kind.sign() * magnitude.abs(),
        }
    }

    /// Pre-synaptic neuron
    pub fn source(&self) -> NeuronId {
        self.source
    }

    /// Post-synaptic neuron
    pub fn target(&self) -> NeuronId {
        self.target
    }

    /// Signed weight
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Absolute weight
    pub fn magnitude(&self) -> f32 {
        self.weight.abs()
    }

    /// True if the weight carries the excitatory sign
    pub fn is_excitatory(&self) -> bool {
        self.weight.is_sign_positive()
    }
}
