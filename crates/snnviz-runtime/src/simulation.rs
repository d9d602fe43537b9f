//! Simulation engine for the visualizer network
//!
//! The engine owns the current [`Network`], its config and the RNG. One
//! [`SimulationEngine::tick`] advances every neuron by one discrete step in
//! two passes:
//!
//! 1. decay the visual pulse, integrate (`v = v * leak + input`) unless
//!    refractory, add the stochastic background impulse, and mark neurons
//!    at or above threshold;
//! 2. fire every marked neuron.
//!
//! Because all threshold decisions come from pass 1, no neuron's decision
//! depends on another neuron firing in the same tick, and the synaptic
//! output of a spike is only integrated on the following tick.
//!
//! [`SimulationEngine::advance`] is the per-frame entry point: it adds the
//! current speed to a fractional counter and runs `floor(counter)` ticks,
//! carrying the remainder to the next frame.

use crate::{
    config::{ConfigChange, ConfigUpdate, SimulationConfig},
    error::*,
    neuron::NeuronId,
    topology::{Network, TopologyBuilder},
    Tick, MAX_SPEED,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use snnviz_math::clamp_finite;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One recorded spike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpikeEvent {
    /// Tick the spike happened in
    pub tick: Tick,
    /// Neuron that fired
    pub neuron: NeuronId,
    /// Cluster of that neuron
    pub cluster: usize,
}

/// Result of a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick index that was executed
    pub tick: Tick,
    /// Neurons that fired, in id order
    pub fired: Vec<NeuronId>,
}

/// Result of one frame's worth of ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Ticks executed this frame
    pub ticks: u32,
    /// Spikes from those ticks, in tick then id order
    ///
    /// Injected spikes are not reported here.
    pub spikes: Vec<SpikeEvent>,
}

impl FrameReport {
    /// Number of spikes this frame
    pub fn spike_count(&self) -> usize {
        self.spikes.len()
    }
}

/// Simulation engine
#[derive(Debug)]
pub struct SimulationEngine {
    config: SimulationConfig,
    network: Network,
    rng: StdRng,
    now: Tick,
    speed: f32,
    tick_accumulator: f32,
    paused: bool,
    total_spikes: u64,
    marked: Vec<usize>,
}

impl SimulationEngine {
    /// Create an engine and build its first network
    ///
    /// With `config.seed` set, network and background activity are fully
    /// reproducible.
    pub fn new(config: SimulationConfig) -> Self {
        let config = config.sanitized();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let network = TopologyBuilder::new(&config).build(&mut rng);

        Self {
            config,
            network,
            rng,
            now: 0,
            speed: 1.0,
            tick_accumulator: 0.0,
            paused: false,
            total_spikes: 0,
            marked: Vec::new(),
        }
    }

    /// Current config
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get reference to network
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Get mutable reference to network
    ///
    /// Meant for hosts and tests that stimulate neurons directly; must not
    /// be used while a tick is running.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Index of the next tick to execute
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Ticks per frame multiplier
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// True while paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Spikes since the last (re)build
    ///
    /// Counts threshold crossings during ticks plus accepted injections.
    /// The seed neurons fired while building the network are not counted.
    pub fn total_spikes(&self) -> u64 {
        self.total_spikes
    }

    /// Apply a partial config update, rebuilding if topology changed
    pub fn set_config(&mut self, update: &ConfigUpdate) -> ConfigChange {
        let change = self.config.apply(update);
        if change.rebuild {
            self.rebuild();
        } else if change.changed {
            let len = self.config.spike_history_len;
            for neuron in &mut self.network.neurons {
                neuron.history.set_capacity(len);
            }
        }
        change
    }

    /// Discard the network and build a new one from the current config
    ///
    /// With a seed set the RNG is re-seeded, so rebuilding twice with the
    /// same config yields the same network.
    pub fn rebuild(&mut self) {
        if let Some(seed) = self.config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.network = TopologyBuilder::new(&self.config).build(&mut self.rng);
        self.now = 0;
        self.tick_accumulator = 0.0;
        self.total_spikes = 0;
        self.marked.clear();
    }

    /// Set the ticks-per-frame multiplier, clamped to `[0, MAX_SPEED]`
    pub fn set_speed(&mut self, speed: f32) {
        let clamped = clamp_finite(speed, 0.0, MAX_SPEED);
        if clamped != speed {
            log::warn!("speed = {} out of range, clamped to {}", speed, clamped);
        }
        self.speed = clamped;
    }

    /// Stop advancing on frames
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue advancing on frames; paused time is not caught up
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Run one frame's worth of ticks at the current speed
    pub fn advance(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        if self.paused {
            return report;
        }

        self.tick_accumulator += self.speed;
        let whole = self.tick_accumulator.floor();
        self.tick_accumulator -= whole;

        for _ in 0..whole as u32 {
            let tick = self.tick();
            report.ticks += 1;
            report.spikes.extend(tick.fired.into_iter().map(|neuron| SpikeEvent {
                tick: tick.tick,
                neuron,
                cluster: self.network.cluster_of(neuron),
            }));
        }
        report
    }

    /// Execute exactly one tick
    pub fn tick(&mut self) -> TickReport {
        let now = self.now;
        let config = &self.config;

        self.marked.clear();
        for (index, neuron) in self.network.neurons.iter_mut().enumerate() {
            neuron.decay_pulse(config.pulse_decay);

            if !neuron.integrate(now, config.leak) {
                continue;
            }

            if config.background_rate > 0.0 && self.rng.gen::<f32>() < config.background_rate {
                neuron.voltage += config.background_impulse;
            }

            // An injected spike already fired this neuron at `now`
            if neuron.voltage >= config.threshold && !neuron.fired_at(now) {
                self.marked.push(index);
            }
        }

        for &index in &self.marked {
            self.network.fire(index, now, config);
        }

        let fired: Vec<NeuronId> = self.marked.iter().map(|&i| NeuronId::new(i as u32)).collect();
        self.total_spikes += fired.len() as u64;
        if !fired.is_empty() {
            log::trace!("tick {}: {} spikes", now, fired.len());
        }

        self.now += 1;
        TickReport { tick: now, fired }
    }

    /// Force neuron `id` to fire now, bypassing the threshold
    ///
    /// Returns `Ok(false)` without firing while the neuron is refractory
    /// or has already fired at the current tick. A neuron fires at most
    /// once per tick, even with `refractory_ticks = 0`.
    pub fn inject_spike(&mut self, id: NeuronId) -> Result<bool> {
        let now = self.now;
        let neuron = self.network.neuron(id)?;
        if neuron.is_refractory(now) || neuron.fired_at(now) {
            log::debug!(
                "Ignoring injected spike into {}: refractory or already fired at tick {}",
                id,
                now
            );
            return Ok(false);
        }
        self.network.fire(id.index(), now, &self.config);
        self.total_spikes += 1;
        log::debug!("Injected spike into {} at tick {}", id, now);
        Ok(true)
    }

    /// Inject a spike into a uniformly chosen neuron
    pub fn inject_random_spike(&mut self) -> Result<Option<NeuronId>> {
        if self.network.is_empty() {
            return Ok(None);
        }
        let id = NeuronId::new(self.rng.gen_range(0..self.network.len()) as u32);
        Ok(self.inject_spike(id)?.then_some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two neurons, one excitatory synapse 0 -> 1, no background drive
    fn pair_engine(weight: f32) -> SimulationEngine {
        let config = SimulationConfig {
            background_rate: 0.0,
            seeds_per_cluster: 0,
            connection_prob: 0.0,
            excitatory_fraction: 1.0,
            ..SimulationConfig::default().with_clusters(1, 2).with_seed(3)
        };
        let mut engine = SimulationEngine::new(config);
        for neuron in &mut engine.network.neurons {
            neuron.voltage = 0.0;
        }
        let synapse = crate::synapse::Synapse::new(
            NeuronId::new(0),
            NeuronId::new(1),
            crate::neuron::NeuronKind::Excitatory,
            weight,
        );
        engine.network.neurons[0].outgoing.push(synapse);
        engine
    }

    #[test]
    fn test_threshold_crossing_fires_and_resets() {
        let mut engine = pair_engine(0.1);
        {
            let n = engine.network_mut().neuron_mut(NeuronId::new(1)).unwrap();
            n.set_voltage(0.99);
            n.receive_input(0.03);
        }
        // 0.985 * 0.99 + 0.03 = 1.00515
        let report = engine.tick();
        assert_eq!(report.fired, vec![NeuronId::new(1)]);

        let n = engine.network().neuron(NeuronId::new(1)).unwrap();
        assert_eq!(n.voltage(), 0.0);
        assert_eq!(n.last_fire(), Some(0));
        assert_eq!(n.refractory_until(), engine.config().refractory_ticks);
        assert_eq!(n.pulse(), engine.config().pulse_intensity);
    }

    #[test]
    fn test_leak_applies_before_threshold_check() {
        let mut engine = pair_engine(0.1);
        {
            let n = engine.network_mut().neuron_mut(NeuronId::new(1)).unwrap();
            n.set_voltage(0.99);
            n.receive_input(0.02);
        }
        // 0.985 * 0.99 + 0.02 = 0.99515, just below threshold
        let report = engine.tick();
        assert!(report.fired.is_empty());
        let v = engine.network().neuron(NeuronId::new(1)).unwrap().voltage();
        assert!((v - 0.99515).abs() < 1e-5);
    }

    #[test]
    fn test_injected_spike_arrives_next_tick() {
        let mut engine = pair_engine(0.5);
        assert!(engine.inject_spike(NeuronId::new(0)).unwrap());

        let target = engine.network().neuron(NeuronId::new(1)).unwrap();
        assert_eq!(target.voltage(), 0.0);
        assert_eq!(target.pending_input(), 0.5);

        engine.tick();
        let target = engine.network().neuron(NeuronId::new(1)).unwrap();
        assert_eq!(target.voltage(), 0.5);
    }

    #[test]
    fn test_inject_refused_while_refractory() {
        let mut engine = pair_engine(0.5);
        assert!(engine.inject_spike(NeuronId::new(0)).unwrap());
        assert!(!engine.inject_spike(NeuronId::new(0)).unwrap());
        assert_eq!(engine.total_spikes(), 1);
        assert!(engine.inject_spike(NeuronId::new(7)).is_err());
    }

    #[test]
    fn test_injected_neuron_does_not_refire_same_tick() {
        let mut engine = pair_engine(0.1);
        engine.config.refractory_ticks = 0;
        let id = NeuronId::new(0);

        assert!(engine.inject_spike(id).unwrap());
        assert!(!engine.inject_spike(id).unwrap());
        engine.network_mut().neuron_mut(id).unwrap().receive_input(2.0);

        let report = engine.tick();
        assert!(report.fired.is_empty());
        let n = engine.network().neuron(id).unwrap();
        assert_eq!(n.spike_history().len(), 1);
        assert_eq!(n.last_fire(), Some(0));
        assert_eq!(engine.total_spikes(), 1);

        // Voltage held over from tick 0 fires on the next tick
        assert_eq!(engine.tick().fired, vec![id]);
        assert_eq!(engine.network().neuron(id).unwrap().spike_history().len(), 2);
    }

    #[test]
    fn test_total_spikes_excludes_build_seeds() {
        let config = SimulationConfig {
            background_rate: 0.0,
            ..SimulationConfig::default().with_seed(8)
        };
        let mut engine = SimulationEngine::new(config);
        assert!(engine.network().neurons().iter().any(|n| n.last_fire() == Some(0)));
        assert_eq!(engine.total_spikes(), 0);

        let frame = engine.advance();
        assert_eq!(engine.total_spikes(), frame.spike_count() as u64);

        let idle = engine
            .network()
            .neurons()
            .iter()
            .find(|n| !n.is_refractory(engine.now()) && !n.fired_at(engine.now()))
            .map(|n| n.id())
            .unwrap();
        let before = engine.total_spikes();
        assert!(engine.inject_spike(idle).unwrap());
        assert_eq!(engine.total_spikes(), before + 1);
        assert_eq!(engine.advance().spikes.iter().filter(|s| s.neuron == idle).count(), 0);
    }

    #[test]
    fn test_speed_accumulator() {
        let mut engine = pair_engine(0.1);
        engine.set_speed(0.5);
        assert_eq!(engine.advance().ticks, 0);
        assert_eq!(engine.advance().ticks, 1);
        assert_eq!(engine.advance().ticks, 0);
        assert_eq!(engine.advance().ticks, 1);
        assert_eq!(engine.now(), 2);

        engine.set_speed(2.5);
        let ticks: u32 = (0..4).map(|_| engine.advance().ticks).sum();
        assert_eq!(ticks, 10);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut engine = pair_engine(0.1);
        engine.set_speed(-3.0);
        assert_eq!(engine.speed(), 0.0);
        engine.set_speed(f32::NAN);
        assert_eq!(engine.speed(), 0.0);
        engine.set_speed(1e9);
        assert_eq!(engine.speed(), MAX_SPEED);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = pair_engine(0.1);
        engine.pause();
        assert!(engine.is_paused());
        assert_eq!(engine.advance(), FrameReport::default());
        assert_eq!(engine.now(), 0);

        engine.resume();
        assert_eq!(engine.advance().ticks, 1);
    }

    #[test]
    fn test_set_config_rebuilds_on_count_change() {
        let mut engine = SimulationEngine::new(SimulationConfig::default().with_seed(5));
        engine.tick();

        let change = engine.set_config(&ConfigUpdate {
            cluster_size: Some(10),
            ..Default::default()
        });
        assert!(change.rebuild);
        assert_eq!(engine.network().len(), 40);
        assert_eq!(engine.now(), 0);

        let change = engine.set_config(&ConfigUpdate {
            threshold: Some(2.0),
            ..Default::default()
        });
        assert!(!change.rebuild);
        assert_eq!(engine.config().threshold, 2.0);
        assert_eq!(engine.network().len(), 40);
    }

    #[test]
    fn test_rebuild_is_reproducible_with_seed() {
        let mut engine = SimulationEngine::new(SimulationConfig::default().with_seed(21));
        let first: Vec<_> = engine.network().synapses().copied().collect();
        for _ in 0..10 {
            engine.tick();
        }
        engine.rebuild();
        let second: Vec<_> = engine.network().synapses().copied().collect();
        assert_eq!(first, second);
    }
}
