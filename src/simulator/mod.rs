//! Simulated dashboard metrics.
//!
//! A [`Simulator`] owns a [`MetricBoard`] (current gauge values plus one
//! bounded [`HistoryBuffer`] per stream) and advances it one tick at a time.
//! [`SimulatorHandle`] drives a simulator from a timer registered with a
//! [`TimerScope`](crate::scope::TimerScope).
//!
//! ```
//! use nexus_console::simulator::{catalog, Simulator};
//! use std::time::Duration;
//!
//! let mut sim = Simulator::with_seed(catalog::overview(Duration::from_secs(3)), 42);
//! sim.tick();
//! assert_eq!(sim.board().stream("realtime").map(|b| b.len()), Some(1));
//! ```

pub mod catalog;
mod rule;
mod task;

pub use rule::{MetricDef, MetricRule};
pub use task::SimulatorHandle;

use std::collections::BTreeMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::data::{HistoryBuffer, MetricSample, ThoughtKind, ThoughtPattern};

/// A named stream of samples kept in a bounded window.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSpec {
    pub name: String,
    pub capacity: usize,
    pub metrics: Vec<MetricDef>,
}

impl StreamSpec {
    pub fn new(name: impl Into<String>, capacity: usize, metrics: Vec<MetricDef>) -> Self {
        Self {
            name: name.into(),
            capacity,
            metrics,
        }
    }
}

/// Everything a simulator generates on each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorSpec {
    pub name: String,
    pub interval: Duration,
    /// Metrics whose current value is shown directly (no history).
    pub gauges: Vec<MetricDef>,
    pub streams: Vec<StreamSpec>,
    /// Capacity of the thought-pattern window, if this simulator produces one.
    pub thoughts: Option<usize>,
}

impl SimulatorSpec {
    /// Look up the rule for a gauge or stream metric.
    pub fn rule(&self, metric: &str) -> Option<MetricRule> {
        self.gauges
            .iter()
            .chain(self.streams.iter().flat_map(|s| s.metrics.iter()))
            .find(|m| m.name == metric)
            .map(|m| m.rule)
    }
}

/// Generated state read by the views.
#[derive(Debug, Clone, Serialize)]
pub struct MetricBoard {
    pub gauges: BTreeMap<String, f64>,
    pub streams: BTreeMap<String, HistoryBuffer<MetricSample>>,
    pub thoughts: Option<HistoryBuffer<ThoughtPattern>>,
    /// Number of ticks applied so far.
    pub ticks: u64,
}

impl MetricBoard {
    fn from_spec(spec: &SimulatorSpec) -> Self {
        Self {
            gauges: spec
                .gauges
                .iter()
                .map(|g| (g.name.clone(), g.rule.initial()))
                .collect(),
            streams: spec
                .streams
                .iter()
                .map(|s| (s.name.clone(), HistoryBuffer::new(s.capacity)))
                .collect(),
            thoughts: spec.thoughts.map(HistoryBuffer::new),
            ticks: 0,
        }
    }

    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.gauges.get(name).copied()
    }

    pub fn stream(&self, name: &str) -> Option<&HistoryBuffer<MetricSample>> {
        self.streams.get(name)
    }
}

/// Pseudo-random metric generator.
#[derive(Debug)]
pub struct Simulator {
    spec: SimulatorSpec,
    rng: StdRng,
    board: MetricBoard,
}

impl Simulator {
    /// Create a simulator seeded from system entropy.
    pub fn new(spec: SimulatorSpec) -> Self {
        Self::from_rng(spec, StdRng::from_entropy())
    }

    /// Create a simulator with a reproducible sequence.
    pub fn with_seed(spec: SimulatorSpec, seed: u64) -> Self {
        Self::from_rng(spec, StdRng::seed_from_u64(seed))
    }

    fn from_rng(spec: SimulatorSpec, rng: StdRng) -> Self {
        let board = MetricBoard::from_spec(&spec);
        Self { spec, rng, board }
    }

    pub fn spec(&self) -> &SimulatorSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn board(&self) -> &MetricBoard {
        &self.board
    }

    /// Advance every gauge, stream and the thought window by one step.
    pub fn tick(&mut self) {
        for gauge in &self.spec.gauges {
            let previous = self
                .board
                .gauges
                .get(&gauge.name)
                .copied()
                .unwrap_or_else(|| gauge.rule.initial());
            let next = gauge.rule.next(previous, &mut self.rng);
            self.board.gauges.insert(gauge.name.clone(), next);
        }

        for stream in &self.spec.streams {
            let buffer = self
                .board
                .streams
                .entry(stream.name.clone())
                .or_insert_with(|| HistoryBuffer::new(stream.capacity));

            let values: BTreeMap<String, f64> = stream
                .metrics
                .iter()
                .map(|m| {
                    let previous = if m.rule.is_stateful() {
                        buffer
                            .latest()
                            .and_then(|s| s.get(&m.name))
                            .unwrap_or_else(|| m.rule.initial())
                    } else {
                        m.rule.initial()
                    };
                    (m.name.clone(), m.rule.next(previous, &mut self.rng))
                })
                .collect();

            buffer.push(MetricSample::now(values));
        }

        if let Some(thoughts) = self.board.thoughts.as_mut() {
            thoughts.push(random_thought(&mut self.rng));
        }

        self.board.ticks += 1;
    }
}

fn random_thought<R: Rng + ?Sized>(rng: &mut R) -> ThoughtPattern {
    let kind = ThoughtKind::ALL[rng.gen_range(0..ThoughtKind::ALL.len())];
    ThoughtPattern {
        kind,
        intensity: rng.gen::<f64>() * 100.0,
        coherence: rng.gen::<f64>() * 100.0,
        duration_ms: 1000 + rng.gen_range(0..5000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consciousness() -> Simulator {
        Simulator::with_seed(catalog::consciousness(Duration::from_secs(2)), 99)
    }

    #[test]
    fn new_board_starts_at_initial_values() {
        let sim = consciousness();
        assert_eq!(sim.board().gauge("consciousness_level"), Some(85.0));
        assert_eq!(sim.board().ticks, 0);
        assert!(sim.board().stream("quantum_states").unwrap().is_empty());
    }

    #[test]
    fn tick_appends_to_every_stream() {
        let mut sim = consciousness();
        sim.tick();
        let board = sim.board();
        assert_eq!(board.ticks, 1);
        for name in ["quantum_states", "neural_activity"] {
            assert_eq!(board.stream(name).unwrap().len(), 1, "{name}");
        }
        assert_eq!(board.thoughts.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn streams_are_capped_at_their_capacity() {
        let mut sim = consciousness();
        for _ in 0..100 {
            sim.tick();
        }
        let board = sim.board();
        assert_eq!(board.stream("quantum_states").unwrap().len(), 20);
        assert_eq!(board.stream("neural_activity").unwrap().len(), 30);
        assert_eq!(board.thoughts.as_ref().unwrap().len(), 10);
    }

    #[test]
    fn every_value_respects_declared_bounds() {
        for spec in [
            catalog::overview(Duration::from_secs(3)),
            catalog::consciousness(Duration::from_secs(2)),
        ] {
            let mut sim = Simulator::with_seed(spec.clone(), 5);
            for _ in 0..500 {
                sim.tick();
                let board = sim.board();
                for (name, value) in &board.gauges {
                    let (min, max) = spec.rule(name).unwrap().bounds();
                    assert!(*value >= min && *value <= max, "{name}={value}");
                }
                for buffer in board.streams.values() {
                    let latest = buffer.latest().unwrap();
                    for (name, value) in &latest.values {
                        let (min, max) = spec.rule(name).unwrap().bounds();
                        assert!(*value >= min && *value <= max, "{name}={value}");
                    }
                }
            }
        }
    }

    #[test]
    fn consciousness_level_stays_between_70_and_100() {
        let mut sim = consciousness();
        for _ in 0..2_000 {
            sim.tick();
            let level = sim.board().gauge("consciousness_level").unwrap();
            assert!((70.0..=100.0).contains(&level));
        }
    }

    #[test]
    fn same_seed_produces_same_sequence() {
        let mut a = consciousness();
        let mut b = consciousness();
        for _ in 0..10 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.board().gauges, b.board().gauges);
        assert_eq!(
            a.board().stream("quantum_states").unwrap().series("coherence"),
            b.board().stream("quantum_states").unwrap().series("coherence"),
        );
    }

    #[test]
    fn thought_patterns_stay_in_range() {
        let mut sim = consciousness();
        for _ in 0..200 {
            sim.tick();
            let t = sim.board().thoughts.as_ref().unwrap().latest().unwrap().clone();
            assert!((0.0..100.0).contains(&t.intensity));
            assert!((1000..6000).contains(&t.duration_ms));
        }
    }
}
