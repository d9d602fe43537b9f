//! Neuron model for the visualizer network
//!
//! A deliberately simple leaky integrate-and-fire unit: voltage decays
//! geometrically each tick, accumulated synaptic input is added in one step,
//! and crossing the threshold resets the voltage to zero. The `pulse` value
//! is a separate visual signal that only the renderer cares about.

use crate::{synapse::Synapse, Tick, Vec3};
use core::fmt;
use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pulse values below this snap to zero
pub const PULSE_FLOOR: f32 = 0.01;

/// Identifier of a neuron; equal to its index in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NeuronId(pub u32);

impl NeuronId {
    /// Create a new neuron ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Index into the network's neuron list
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Excitatory or inhibitory; fixes the sign of every outgoing weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NeuronKind {
    /// Positive outgoing weights
    Excitatory,
    /// Negative outgoing weights
    Inhibitory,
}

impl NeuronKind {
    /// `+1.0` for excitatory, `-1.0` for inhibitory
    pub const fn sign(&self) -> f32 {
        match self {
            NeuronKind::Excitatory => 1.0,
            NeuronKind::Inhibitory => -1.0,
        }
    }

    /// True for excitatory neurons
    pub const fn is_excitatory(&self) -> bool {
        matches!(self, NeuronKind::Excitatory)
    }
}

/// Bounded ring buffer of recent spike ticks, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeHistory {
    ticks: VecDeque<Tick>,
    capacity: usize,
}

impl SpikeHistory {
    /// Create an empty history holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ticks: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a spike, evicting the oldest entry when full
    pub fn push(&mut self, tick: Tick) {
        if self.ticks.len() == self.capacity {
            self.ticks.pop_front();
        }
        self.ticks.push_back(tick);
    }

    /// Change the capacity, dropping the oldest entries if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.ticks.len() > self.capacity {
            self.ticks.pop_front();
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of recorded spikes
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// True if no spike has been recorded
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Most recent spike
    pub fn last(&self) -> Option<Tick> {
        self.ticks.back().copied()
    }

    /// Iterate spikes oldest first
    pub fn iter(&self) -> impl Iterator<Item = Tick> + '_ {
        self.ticks.iter().copied()
    }

    /// Spikes with `tick >= since`
    pub fn count_since(&self, since: Tick) -> usize {
        self.ticks.iter().rev().take_while(|&&t| t >= since).count()
    }
}

/// One neuron and the synapses it owns
#[derive(Debug, Clone)]
pub struct Neuron {
    pub(crate) id: NeuronId,
    pub(crate) cluster: usize,
    pub(crate) kind: NeuronKind,
    pub(crate) position: Vec3,
    pub(crate) voltage: f32,
    pub(crate) pulse: f32,
    pub(crate) last_fire: Option<Tick>,
    pub(crate) refractory_until: Tick,
    pub(crate) input_accum: f32,
    pub(crate) outgoing: Vec<Synapse>,
    pub(crate) history: SpikeHistory,
}

impl Neuron {
    /// Create a resting neuron with no synapses
    pub fn new(
        id: NeuronId,
        cluster: usize,
        kind: NeuronKind,
        position: Vec3,
        history_len: usize,
    ) -> Self {
        Self {
            id,
            cluster,
            kind,
            position,
            voltage: 0.0,
            pulse: 0.0,
            last_fire: None,
            refractory_until: 0,
            input_accum: 0.0,
            outgoing: Vec::new(),
            history: SpikeHistory::new(history_len),
        }
    }

    /// Neuron ID
    pub fn id(&self) -> NeuronId {
        self.id
    }

    /// Cluster this neuron belongs to
    pub fn cluster(&self) -> usize {
        self.cluster
    }

    /// Excitatory or inhibitory
    pub fn kind(&self) -> NeuronKind {
        self.kind
    }

    /// World-space position, fixed at creation
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current membrane voltage
    pub fn voltage(&self) -> f32 {
        self.voltage
    }

    /// Current visual pulse
    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    /// Tick of the most recent spike
    pub fn last_fire(&self) -> Option<Tick> {
        self.last_fire
    }

    /// First tick at which the neuron integrates again
    pub fn refractory_until(&self) -> Tick {
        self.refractory_until
    }

    /// Input waiting to be integrated on the next tick
    pub fn pending_input(&self) -> f32 {
        self.input_accum
    }

    /// Outgoing synapses, in creation order
    pub fn outgoing(&self) -> &[Synapse] {
        &self.outgoing
    }

    /// Recent spike ticks
    pub fn spike_history(&self) -> &SpikeHistory {
        &self.history
    }

    /// Check if neuron is in refractory period
    pub fn is_refractory(&self, now: Tick) -> bool {
        now < self.refractory_until
    }

    /// True if the neuron already fired at tick `now`
    pub fn fired_at(&self, now: Tick) -> bool {
        self.last_fire == Some(now)
    }

    /// True if the neuron fired within the last `window` ticks
    pub fn fired_within(&self, now: Tick, window: Tick) -> bool {
        self.last_fire
            .map(|t| now.saturating_sub(t) < window)
            .unwrap_or(false)
    }

    /// Add synaptic or external input, integrated on the next tick
    pub fn receive_input(&mut self, current: f32) {
        self.input_accum += current;
    }

    /// Overwrite the membrane voltage
    pub fn set_voltage(&mut self, voltage: f32) {
        self.voltage = if voltage.is_finite() { voltage } else { 0.0 };
    }

    /// Decay the visual pulse
    pub(crate) fn decay_pulse(&mut self, decay: f32) {
        self.pulse *= decay;
        if self.pulse < PULSE_FLOOR {
            self.pulse = 0.0;
        }
    }

    /// Integrate accumulated input; returns false while refractory
    ///
    /// Input that arrives during the refractory window is discarded.
    pub(crate) fn integrate(&mut self, now: Tick, leak: f32) -> bool {
        if self.is_refractory(now) {
            self.input_accum = 0.0;
            return false;
        }
        self.voltage = self.voltage * leak + self.input_accum;
        self.input_accum = 0.0;
        true
    }

    /// Reset state after a spike at `now`
    pub(crate) fn reset(&mut self, now: Tick, refractory_ticks: Tick, pulse_intensity: f32) {
        self.pulse = pulse_intensity;
        self.voltage = 0.0;
        self.last_fire = Some(now);
        self.history.push(now);
        self.refractory_until = now.saturating_add(refractory_ticks);
    }
}
