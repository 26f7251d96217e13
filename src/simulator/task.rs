//! Timer-driven simulator loop with pause/resume.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{MetricBoard, Simulator};
use crate::scope::TimerScope;

/// Shared handle to a simulator and its generation loop.
///
/// The handle is cheap to clone; all clones observe the same board. The loop
/// itself is owned by the [`TimerScope`] it was started in, so tearing the
/// scope down stops generation for good.
#[derive(Debug, Clone)]
pub struct SimulatorHandle {
    name: String,
    interval: Duration,
    simulator: Arc<Mutex<Simulator>>,
    active: Arc<watch::Sender<bool>>,
}

impl SimulatorHandle {
    /// Wrap a simulator. Generation does not begin until [`start`](Self::start).
    pub fn new(simulator: Simulator) -> Self {
        let name = simulator.name().to_string();
        let interval = simulator.spec().interval;
        let (active, _) = watch::channel(true);
        Self {
            name,
            interval,
            simulator: Arc::new(Mutex::new(simulator)),
            active: Arc::new(active),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register the generation loop with `scope`.
    ///
    /// The first sample is produced one interval after starting.
    pub fn start(&self, scope: &mut TimerScope) -> bool {
        let simulator = self.simulator.clone();
        let mut active = self.active.subscribe();
        let period = self.interval.max(Duration::from_millis(1));
        let name = self.name.clone();

        info!(simulator = %name, interval_ms = period.as_millis() as u64, "starting simulator");

        scope.spawn(format!("simulator:{}", self.name), async move {
            let mut timer = time::interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                if !*active.borrow_and_update() {
                    // Paused: wait for a resume, then restart the period
                    if active.changed().await.is_err() {
                        break;
                    }
                    timer.reset();
                    continue;
                }

                tokio::select! {
                    _ = timer.tick() => {
                        let ticks = {
                            let mut sim = simulator.lock();
                            sim.tick();
                            sim.board().ticks
                        };
                        debug!(simulator = %name, ticks, "simulator tick");
                    }
                    changed = active.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Stop generating new samples. Existing history is kept.
    pub fn pause(&self) {
        self.set_active(false);
    }

    /// Resume generation after [`pause`](Self::pause).
    pub fn resume(&self) {
        self.set_active(true);
    }

    pub fn set_active(&self, active: bool) {
        self.active.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        });
        debug!(simulator = %self.name, active, "simulator activity changed");
    }

    pub fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    /// Clone of the current board.
    pub fn board(&self) -> MetricBoard {
        self.simulator.lock().board().clone()
    }

    /// Read the board without cloning it.
    pub fn with_board<R>(&self, f: impl FnOnce(&MetricBoard) -> R) -> R {
        f(self.simulator.lock().board())
    }

    pub fn ticks(&self) -> u64 {
        self.simulator.lock().board().ticks
    }
}
