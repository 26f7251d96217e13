//! Scoped ownership of background timers and in-flight requests.
//!
//! Every periodic task in the dashboard (metric ticks, the clock, status
//! polling) and every in-flight prompt is registered with one [`TimerScope`].
//! [`TimerScope::shutdown`] is the single teardown point: it cancels all of
//! them and waits until none can run again.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Owner of a set of spawned tasks.
///
/// Dropping the scope aborts anything still registered.
#[derive(Debug, Default)]
pub struct TimerScope {
    tasks: Vec<(String, JoinHandle<()>)>,
    closed: bool,
}

impl TimerScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task owned by this scope.
    ///
    /// Must be called from within a tokio runtime. Returns `false` (and drops
    /// the future) once the scope has been shut down.
    pub fn spawn<F>(&mut self, name: impl Into<String>, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        if self.closed {
            warn!(task = %name, "scope already shut down, not spawning");
            return false;
        }

        self.prune();
        debug!(task = %name, "spawning scoped task");
        self.tasks.push((name, tokio::spawn(task)));
        true
    }

    /// Number of registered tasks that have not finished.
    pub fn active(&self) -> usize {
        self.tasks.iter().filter(|(_, h)| !h.is_finished()).count()
    }

    /// Names of registered tasks that have not finished.
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|(_, h)| !h.is_finished())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Cancel every task and wait for each to stop.
    ///
    /// After this returns no registered task will run again.
    pub async fn shutdown(&mut self) {
        self.closed = true;
        for (_, handle) in &self.tasks {
            handle.abort();
        }
        for (name, handle) in self.tasks.drain(..) {
            match handle.await {
                Ok(()) => debug!(task = %name, "task finished before shutdown"),
                Err(e) if e.is_cancelled() => debug!(task = %name, "task cancelled"),
                Err(e) => warn!(task = %name, error = %e, "task failed"),
            }
        }
    }

    // Drop handles of tasks that already completed
    fn prune(&mut self) {
        self.tasks.retain(|(_, h)| !h.is_finished());
    }
}

impl Drop for TimerScope {
    fn drop(&mut self) {
        for (_, handle) in &self.tasks {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counting_timer(counter: Arc<AtomicU32>, period: Duration) -> impl Future<Output = ()> {
        async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_all_timers() {
        let a = Arc::new(AtomicU32::new(0));
        let b = Arc::new(AtomicU32::new(0));
        let mut scope = TimerScope::new();
        scope.spawn("a", counting_timer(a.clone(), Duration::from_secs(1)));
        scope.spawn("b", counting_timer(b.clone(), Duration::from_secs(2)));
        assert_eq!(scope.active(), 2);

        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(a.load(Ordering::SeqCst), 4);
        assert_eq!(b.load(Ordering::SeqCst), 2);

        scope.shutdown().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(a.load(Ordering::SeqCst), 4);
        assert_eq!(b.load(Ordering::SeqCst), 2);
        assert_eq!(scope.active(), 0);
    }

    #[tokio::test]
    async fn spawn_after_shutdown_is_refused() {
        let mut scope = TimerScope::new();
        scope.shutdown().await;
        assert!(scope.is_closed());
        assert!(!scope.spawn("late", async {}));
        assert_eq!(scope.active(), 0);
    }

    #[tokio::test]
    async fn finished_tasks_are_pruned_on_spawn() {
        let mut scope = TimerScope::new();
        scope.spawn("quick", async {});
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        scope.spawn("pending", std::future::pending());
        assert_eq!(scope.task_names(), vec!["pending"]);
        scope.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_scope_aborts_tasks() {
        let counter = Arc::new(AtomicU32::new(0));
        {
            let mut scope = TimerScope::new();
            scope.spawn("tick", counting_timer(counter.clone(), Duration::from_secs(1)));
            tokio::time::sleep(Duration::from_millis(1500)).await;
        }
        let seen = counter.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), seen);
    }
}
