//! Rolling history windows for sparklines and live charts.

use std::collections::VecDeque;

use serde::Serialize;

use super::sample::MetricSample;

/// Fixed-capacity FIFO window.
///
/// Pushing past capacity evicts from the head, so the buffer always holds
/// the most recent `capacity` entries in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryBuffer<T> {
    capacity: usize,
    entries: VecDeque<T>,
}

impl<T> HistoryBuffer<T> {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append to the tail, evicting the oldest entries on overflow.
    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Read-only view of the window, oldest first.
    pub fn snapshot(&self) -> &VecDeque<T> {
        &self.entries
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.entries.iter()
    }

    /// Most recently pushed entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl HistoryBuffer<MetricSample> {
    /// Values of one metric across the window, oldest first.
    ///
    /// Samples that do not carry the metric are skipped.
    pub fn series(&self, metric: &str) -> Vec<f64> {
        self.entries.iter().filter_map(|s| s.get(metric)).collect()
    }

    /// Get sparkline data for a metric (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, metric: &str) -> Vec<u8> {
        normalize_sparkline(&self.series(metric))
    }
}

/// Normalize values to 0-7 range for sparkline display.
pub fn normalize_sparkline(values: &[f64]) -> Vec<u8> {
    if values.len() < 2 {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let range = max - min;

    // A flat line sits in the middle rather than on the floor
    if range <= f64::EPSILON {
        return vec![3; values.len()];
    }

    values
        .iter()
        .map(|&v| {
            let normalized = ((v - min) / range * 7.0) as u8;
            normalized.min(7)
        })
        .collect()
}
