//! The metric sets shown by the dashboard views.

use std::time::Duration;

use super::{MetricDef, MetricRule, SimulatorSpec, StreamSpec};

/// Name of the overview simulator and its live chart stream.
pub const OVERVIEW: &str = "overview";
pub const REALTIME_STREAM: &str = "realtime";

/// Name of the consciousness simulator and its streams.
pub const CONSCIOUSNESS: &str = "consciousness";
pub const QUANTUM_STREAM: &str = "quantum_states";
pub const NEURAL_STREAM: &str = "neural_activity";

/// Overview page: four efficiency lines on a 20-point live chart.
pub fn overview(interval: Duration) -> SimulatorSpec {
    SimulatorSpec {
        name: OVERVIEW.to_string(),
        interval,
        gauges: Vec::new(),
        streams: vec![StreamSpec::new(
            REALTIME_STREAM,
            20,
            vec![
                MetricDef::new("quantum", MetricRule::offset(95.0, 5.0)),
                MetricDef::new("consciousness", MetricRule::offset(98.0, 2.0)),
                MetricDef::new("neuromorphic", MetricRule::offset(97.0, 3.0)),
                MetricDef::new("orchestration", MetricRule::offset(96.0, 4.0)),
            ],
        )],
        thoughts: None,
    }
}

/// Consciousness page: drifting awareness gauges, quantum and neural
/// streams, and a short window of thought patterns.
pub fn consciousness(interval: Duration) -> SimulatorSpec {
    SimulatorSpec {
        name: CONSCIOUSNESS.to_string(),
        interval,
        gauges: vec![
            MetricDef::new("consciousness_level", MetricRule::drift(85.0, 5.0, 70.0, 100.0)),
            MetricDef::new("self_awareness", MetricRule::drift(92.0, 2.5, 80.0, 100.0)),
            MetricDef::new("metacognition", MetricRule::drift(88.0, 3.0, 75.0, 95.0)),
            MetricDef::new("episodic_memory", MetricRule::drift(94.0, 2.0, 85.0, 100.0)),
            MetricDef::new("emergent_behavior", MetricRule::drift(87.0, 4.0, 70.0, 95.0)),
            MetricDef::new("global_workspace", MetricRule::drift(91.0, 1.5, 80.0, 98.0)),
        ],
        streams: vec![
            StreamSpec::new(
                QUANTUM_STREAM,
                20,
                vec![
                    MetricDef::new("superposition", MetricRule::offset(0.0, 100.0)),
                    MetricDef::new("entanglement", MetricRule::offset(0.0, 100.0)),
                    MetricDef::new("coherence", MetricRule::offset(0.0, 100.0)),
                ],
            ),
            StreamSpec::new(
                NEURAL_STREAM,
                30,
                vec![
                    // Spike rate is the one reading outside 0-100
                    MetricDef::new("spike_rate", MetricRule::discrete(50.0, 100.0)),
                    MetricDef::new("synaptic_strength", MetricRule::offset(0.0, 100.0)),
                    MetricDef::new("plasticity", MetricRule::offset(0.0, 100.0)),
                ],
            ),
        ],
        thoughts: Some(10),
    }
}
