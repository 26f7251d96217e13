//! Timestamped metric readings produced by the simulators.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// One timestamped reading of one or more simulated gauges.
///
/// Samples are immutable once built; the buffer that holds them drops them
/// when they age out of the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    /// Local wall-clock time of the reading (`HH:MM:SS`).
    pub timestamp: String,
    /// Metric name -> value.
    pub values: BTreeMap<String, f64>,
}

impl MetricSample {
    /// Build a sample stamped with the current local time.
    pub fn now(values: BTreeMap<String, f64>) -> Self {
        Self {
            timestamp: clock_label(),
            values,
        }
    }

    /// Build a sample with an explicit timestamp label.
    pub fn at(timestamp: impl Into<String>, values: BTreeMap<String, f64>) -> Self {
        Self {
            timestamp: timestamp.into(),
            values,
        }
    }

    /// Value of a single metric, if present in this sample.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }
}

/// Current local time formatted the way the dashboards label samples.
pub fn clock_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Category of a simulated thought pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThoughtKind {
    Analytical,
    Creative,
    Intuitive,
    Logical,
    Emotional,
}

impl ThoughtKind {
    /// All kinds, in the order they are drawn from.
    pub const ALL: [ThoughtKind; 5] = [
        ThoughtKind::Analytical,
        ThoughtKind::Creative,
        ThoughtKind::Intuitive,
        ThoughtKind::Logical,
        ThoughtKind::Emotional,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ThoughtKind::Analytical => "Analytical",
            ThoughtKind::Creative => "Creative",
            ThoughtKind::Intuitive => "Intuitive",
            ThoughtKind::Logical => "Logical",
            ThoughtKind::Emotional => "Emotional",
        }
    }
}

impl fmt::Display for ThoughtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A simulated "thought" shown in the consciousness view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThoughtPattern {
    pub kind: ThoughtKind,
    /// Intensity in `[0, 100)`.
    pub intensity: f64,
    /// Coherence in `[0, 100)`.
    pub coherence: f64,
    /// Duration in milliseconds, `[1000, 6000)`.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_known_metric() {
        let sample = MetricSample::at("12:00:00", BTreeMap::from([("quantum".to_string(), 97.5)]));
        assert_eq!(sample.get("quantum"), Some(97.5));
        assert_eq!(sample.get("missing"), None);
    }

    #[test]
    fn clock_label_is_hh_mm_ss() {
        let label = clock_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }

    #[test]
    fn thought_kinds_have_distinct_labels() {
        let mut labels: Vec<_> = ThoughtKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 5);
        assert_eq!(ThoughtKind::Creative.to_string(), "Creative");
    }
}
