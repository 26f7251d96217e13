//! Per-metric generation rules.

use rand::Rng;

/// How a simulated metric produces its next value.
///
/// The dashboards mix two styles: gauges that wander around their previous
/// reading inside fixed bounds, and readings that are redrawn from scratch on
/// every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricRule {
    /// `clamp(previous + uniform(-delta, +delta), min, max)`.
    Drift {
        initial: f64,
        delta: f64,
        min: f64,
        max: f64,
    },
    /// `base + uniform(0, spread)`.
    Offset { base: f64, spread: f64 },
    /// `base + floor(uniform(0, spread))`.
    Discrete { base: f64, spread: f64 },
}

impl MetricRule {
    pub const fn drift(initial: f64, delta: f64, min: f64, max: f64) -> Self {
        MetricRule::Drift {
            initial,
            delta,
            min,
            max,
        }
    }

    pub const fn offset(base: f64, spread: f64) -> Self {
        MetricRule::Offset { base, spread }
    }

    pub const fn discrete(base: f64, spread: f64) -> Self {
        MetricRule::Discrete { base, spread }
    }

    /// Declared `[min, max]` range every produced value falls in.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            MetricRule::Drift { min, max, .. } => (min, max),
            MetricRule::Offset { base, spread } | MetricRule::Discrete { base, spread } => {
                (base, base + spread)
            }
        }
    }

    /// Value before the first tick.
    pub fn initial(&self) -> f64 {
        match *self {
            MetricRule::Drift {
                initial, min, max, ..
            } => initial.clamp(min, max),
            MetricRule::Offset { base, .. } | MetricRule::Discrete { base, .. } => base,
        }
    }

    /// Whether the next value depends on the previous one.
    pub fn is_stateful(&self) -> bool {
        matches!(self, MetricRule::Drift { .. })
    }

    /// Draw the next value. `previous` is ignored by stateless rules.
    pub fn next<R: Rng + ?Sized>(&self, previous: f64, rng: &mut R) -> f64 {
        match *self {
            MetricRule::Drift {
                delta, min, max, ..
            } => {
                let variation = (rng.gen::<f64>() - 0.5) * 2.0 * delta;
                (previous + variation).clamp(min, max)
            }
            MetricRule::Offset { base, spread } => base + rng.gen::<f64>() * spread,
            MetricRule::Discrete { base, spread } => base + (rng.gen::<f64>() * spread).floor(),
        }
    }
}

/// A named metric and the rule that drives it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDef {
    pub name: String,
    pub rule: MetricRule,
}

impl MetricDef {
    pub fn new(name: impl Into<String>, rule: MetricRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn drift_stays_within_bounds() {
        let rule = MetricRule::drift(85.0, 5.0, 70.0, 100.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut value = rule.initial();
        for _ in 0..10_000 {
            value = rule.next(value, &mut rng);
            assert!((70.0..=100.0).contains(&value), "{value} escaped bounds");
        }
    }

    #[test]
    fn drift_moves_at_most_delta() {
        let rule = MetricRule::drift(50.0, 2.0, 0.0, 100.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut value = 50.0;
        for _ in 0..1_000 {
            let next = rule.next(value, &mut rng);
            assert!((next - value).abs() <= 2.0);
            value = next;
        }
    }

    #[test]
    fn offset_stays_within_base_and_spread() {
        let rule = MetricRule::offset(95.0, 5.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10_000 {
            let v = rule.next(0.0, &mut rng);
            assert!((95.0..100.0).contains(&v));
        }
    }

    #[test]
    fn discrete_produces_whole_numbers() {
        let rule = MetricRule::discrete(50.0, 100.0);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            let v = rule.next(0.0, &mut rng);
            assert_eq!(v.fract(), 0.0);
            assert!((50.0..150.0).contains(&v));
        }
    }

    #[test]
    fn initial_is_clamped_into_bounds() {
        assert_eq!(MetricRule::drift(120.0, 1.0, 0.0, 100.0).initial(), 100.0);
        assert_eq!(MetricRule::offset(96.0, 4.0).initial(), 96.0);
    }

    #[test]
    fn zero_spread_is_constant() {
        let rule = MetricRule::offset(42.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(rule.next(0.0, &mut rng), 42.0);
    }

    #[test]
    fn only_drift_is_stateful() {
        assert!(MetricRule::drift(1.0, 1.0, 0.0, 2.0).is_stateful());
        assert!(!MetricRule::offset(1.0, 1.0).is_stateful());
        assert!(!MetricRule::discrete(1.0, 1.0).is_stateful());
    }
}
