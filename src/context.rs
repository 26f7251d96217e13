//! The dashboard context: every component plus the scope that owns their
//! timers.
//!
//! A [`DashboardContext`] is built once at startup, started inside a tokio
//! runtime, read by the views, and shut down at a single point:
//!
//! ```text
//!            ┌───────────────── DashboardContext ─────────────────┐
//!            │                                                     │
//!  start() ─▶│  TimerScope ──┬─▶ simulator:overview   (3s tick)    │
//!            │               ├─▶ simulator:consciousness (2s tick) │
//!            │               ├─▶ clock               (1s tick)     │
//!            │               ├─▶ status              (poll loop)   │
//!            │               └─▶ prompt              (in flight)   │
//!            │                                                     │
//!            └──────────────────────── shutdown() ─────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use tokio::sync::Notify;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::api::Backend;
use crate::config::Settings;
use crate::console::{PromptConsole, SuggestionAction};
use crate::data::sample::clock_label;
use crate::data::StatusSnapshot;
use crate::scope::TimerScope;
use crate::simulator::{catalog, MetricBoard, Simulator, SimulatorHandle, SimulatorSpec};
use crate::status::StatusPoller;

/// Period of the time-of-day clock.
const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Latest poll result and when it arrived.
#[derive(Debug, Clone, Serialize)]
pub struct StatusBoard {
    pub snapshot: StatusSnapshot,
    /// Local time of the last completed poll.
    pub polled_at: Option<String>,
    pub polls: u64,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            snapshot: StatusSnapshot::pending(),
            polled_at: None,
            polls: 0,
        }
    }
}

/// Serializable view of the whole dashboard, used for export.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub overview: MetricBoard,
    pub consciousness: MetricBoard,
    pub status: StatusBoard,
    pub messages: Vec<crate::console::ConsoleMessage>,
    pub active: bool,
}

/// Owner of all dashboard components and their timers.
#[derive(Debug)]
pub struct DashboardContext {
    settings: Settings,
    backend: Arc<dyn Backend>,
    scope: TimerScope,
    started: bool,
    overview: SimulatorHandle,
    consciousness: SimulatorHandle,
    status: Arc<Mutex<StatusBoard>>,
    status_refresh: Arc<Notify>,
    console: Arc<Mutex<PromptConsole>>,
    clock: Arc<Mutex<String>>,
}

impl DashboardContext {
    /// Build every component. No timer runs until [`start`](Self::start).
    pub fn new(settings: Settings, backend: Arc<dyn Backend>) -> Self {
        let seed = settings.simulator.seed;
        let overview = SimulatorHandle::new(build_simulator(
            catalog::overview(settings.overview_interval()),
            seed,
        ));
        // Offset the second seed so both simulators don't mirror each other
        let consciousness = SimulatorHandle::new(build_simulator(
            catalog::consciousness(settings.consciousness_interval()),
            seed.map(|s| s.wrapping_add(1)),
        ));

        Self {
            settings,
            backend,
            scope: TimerScope::new(),
            started: false,
            overview,
            consciousness,
            status: Arc::new(Mutex::new(StatusBoard::default())),
            status_refresh: Arc::new(Notify::new()),
            console: Arc::new(Mutex::new(PromptConsole::new())),
            clock: Arc::new(Mutex::new(clock_label())),
        }
    }

    /// Register every timer. Must be called from within a tokio runtime.
    ///
    /// Calling it twice is a no-op.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(backend = self.backend.description(), "starting dashboard");

        self.overview.start(&mut self.scope);
        self.consciousness.start(&mut self.scope);
        self.spawn_clock();
        self.spawn_status_loop();
    }

    /// Cancel every timer and in-flight request.
    ///
    /// After this returns nothing mutates the dashboard state any more.
    pub async fn shutdown(&mut self) {
        info!(tasks = self.scope.active(), "shutting down dashboard");
        self.scope.shutdown().await;
    }

    fn spawn_clock(&mut self) {
        let clock = self.clock.clone();
        self.scope.spawn("clock", async move {
            let mut timer = time::interval(CLOCK_TICK);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                *clock.lock() = clock_label();
            }
        });
    }

    fn spawn_status_loop(&mut self) {
        let mut poller =
            StatusPoller::new(self.backend.clone()).stale_after(self.settings.stale_after());
        let board = self.status.clone();
        let refresh = self.status_refresh.clone();
        let period = self.settings.poll_interval().max(Duration::from_secs(1));

        self.scope.spawn("status", async move {
            let mut timer = time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let snapshot = tokio::select! {
                    _ = timer.tick() => poller.poll().await,
                    _ = refresh.notified() => poller.refresh().await,
                };
                let mut board = board.lock();
                board.snapshot = snapshot;
                board.polled_at = Some(clock_label());
                board.polls += 1;
                debug!(health = %board.snapshot.health, polls = board.polls, "status updated");
            }
        });
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend_description(&self) -> &str {
        self.backend.description()
    }

    pub fn overview(&self) -> &SimulatorHandle {
        &self.overview
    }

    pub fn consciousness(&self) -> &SimulatorHandle {
        &self.consciousness
    }

    /// Latest status poll result.
    pub fn status(&self) -> StatusBoard {
        self.status.lock().clone()
    }

    /// Ask the status loop to poll now, bypassing the cache.
    pub fn refresh_status(&self) {
        self.status_refresh.notify_one();
    }

    /// Current time-of-day label.
    pub fn clock(&self) -> String {
        self.clock.lock().clone()
    }

    /// Lock the console for reading or editing the input line.
    pub fn console(&self) -> MutexGuard<'_, PromptConsole> {
        self.console.lock()
    }

    /// Whether metric generation is running.
    pub fn is_active(&self) -> bool {
        self.overview.is_active() && self.consciousness.is_active()
    }

    /// Pause or resume every simulator. History is kept either way.
    pub fn set_active(&self, active: bool) {
        self.overview.set_active(active);
        self.consciousness.set_active(active);
    }

    pub fn toggle_active(&self) -> bool {
        let active = !self.is_active();
        self.set_active(active);
        active
    }

    /// Submit `text` from the console.
    ///
    /// The user message is appended before this returns; the reply is
    /// appended by a scoped task once the backend answers. Returns `false` if
    /// the submission was ignored, including after [`shutdown`](Self::shutdown).
    pub fn submit_prompt(&mut self, text: &str) -> bool {
        if self.scope.is_closed() {
            return false;
        }
        let accepted = self.console.lock().begin(text);
        match accepted {
            Some(text) => self.dispatch_prompt(text),
            None => false,
        }
    }

    /// Submit the console's input line.
    pub fn submit_input(&mut self) -> bool {
        if self.scope.is_closed() {
            return false;
        }
        let accepted = self.console.lock().begin_from_input();
        match accepted {
            Some(text) => self.dispatch_prompt(text),
            None => false,
        }
    }

    /// Apply a suggestion click, dispatching the request when it was sent.
    pub fn click_suggestion(&mut self, index: usize, send_now: bool) -> SuggestionAction {
        if self.scope.is_closed() {
            return SuggestionAction::Ignored;
        }
        let action = self.console.lock().click_suggestion(index, send_now);
        if let SuggestionAction::Submitted(text) = &action {
            self.dispatch_prompt(text.clone());
        }
        action
    }

    fn dispatch_prompt(&mut self, text: String) -> bool {
        let backend = self.backend.clone();
        let console = self.console.clone();
        self.scope.spawn("prompt", async move {
            let reply = backend.echo(&text).await;
            console.lock().finish(reply);
        })
    }

    /// Snapshot of everything shown on screen.
    pub fn state(&self) -> DashboardState {
        DashboardState {
            overview: self.overview.board(),
            consciousness: self.consciousness.board(),
            status: self.status(),
            messages: self.console.lock().messages().to_vec(),
            active: self.is_active(),
        }
    }

    /// Names of the timers and requests currently owned by the context.
    pub fn running_tasks(&self) -> Vec<&str> {
        self.scope.task_names()
    }
}

fn build_simulator(spec: SimulatorSpec, seed: Option<u64>) -> Simulator {
    match seed {
        Some(seed) => Simulator::with_seed(spec, seed),
        None => Simulator::new(spec),
    }
}
