//! Backend health polling with caching, one retry and a constant fallback.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::api::Backend;
use crate::data::{Health, StatusSnapshot};

/// How long a poll result is served from cache.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60);

/// Extra attempts after a failed health request.
const RETRIES: u32 = 1;

/// Polls the backend health endpoint.
///
/// `poll()` never fails: transport errors, error statuses and malformed
/// bodies all collapse into [`StatusSnapshot::fallback`].
#[derive(Debug)]
pub struct StatusPoller {
    backend: Arc<dyn Backend>,
    stale_after: Duration,
    cached: Option<(StatusSnapshot, Instant)>,
}

impl StatusPoller {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            stale_after: DEFAULT_STALE_AFTER,
            cached: None,
        }
    }

    /// Set how long a result stays fresh.
    pub fn stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Return the cached snapshot if still fresh, otherwise fetch a new one.
    pub async fn poll(&mut self) -> StatusSnapshot {
        if let Some((snapshot, fetched_at)) = &self.cached {
            if fetched_at.elapsed() < self.stale_after {
                debug!("serving cached status");
                return snapshot.clone();
            }
        }
        self.refresh().await
    }

    /// Fetch a new snapshot regardless of cache age.
    pub async fn refresh(&mut self) -> StatusSnapshot {
        let snapshot = self.fetch().await;
        self.cached = Some((snapshot.clone(), Instant::now()));
        snapshot
    }

    async fn fetch(&self) -> StatusSnapshot {
        for attempt in 0..=RETRIES {
            match self.backend.health().await {
                Ok(response) => {
                    // Blank status is treated like a missing one
                    let health = response
                        .status()
                        .filter(|s| !s.trim().is_empty())
                        .map(Health::from_remote)
                        .unwrap_or_else(|| StatusSnapshot::fallback().health);
                    debug!(%health, attempt, "health poll succeeded");
                    return StatusSnapshot::with_health(health);
                }
                Err(e) => {
                    warn!(
                        backend = self.backend.description(),
                        attempt,
                        error = %e,
                        "health poll failed"
                    );
                }
            }
        }
        StatusSnapshot::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedBackend;
    use crate::api::{ApiError, HealthResponse};

    fn poller(backend: &Arc<ScriptedBackend>) -> StatusPoller {
        StatusPoller::new(backend.clone() as Arc<dyn Backend>)
    }

    #[tokio::test]
    async fn network_failure_returns_fallback() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Err(ApiError::Connection("refused".into())));
        backend.push_health(Err(ApiError::Timeout));

        let snapshot = poller(&backend).poll().await;
        assert_eq!(snapshot, StatusSnapshot::fallback());
    }

    #[tokio::test]
    async fn failure_is_retried_once() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Err(ApiError::Timeout));
        backend.push_health(Ok(HealthResponse::new("DOWN")));

        let snapshot = poller(&backend).poll().await;
        assert_eq!(backend.health_calls(), 2);
        assert_eq!(snapshot.health.label(), "DOWN");
    }

    #[tokio::test]
    async fn gives_up_after_one_retry() {
        let backend = Arc::new(ScriptedBackend::new());
        for _ in 0..5 {
            backend.push_health(Err(ApiError::Status(500)));
        }
        poller(&backend).poll().await;
        assert_eq!(backend.health_calls(), 2);
    }

    #[tokio::test]
    async fn up_maps_to_excellent() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Ok(HealthResponse::new("UP")));
        let snapshot = poller(&backend).poll().await;
        assert_eq!(snapshot.health, Health::Excellent);
        assert_eq!(snapshot.uptime, "99.9%");
    }

    #[tokio::test]
    async fn down_passes_through() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Ok(HealthResponse::new("DOWN")));
        let snapshot = poller(&backend).poll().await;
        assert_eq!(snapshot.health, Health::Reported("DOWN".into()));
        assert_eq!(snapshot.security, "Secure");
        assert_eq!(snapshot.alerts, 0);
    }

    #[tokio::test]
    async fn missing_status_keeps_fallback_health() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Ok(HealthResponse::default()));
        let snapshot = poller(&backend).poll().await;
        assert_eq!(snapshot, StatusSnapshot::fallback());
        assert_eq!(backend.health_calls(), 1);
    }

    #[tokio::test]
    async fn blank_status_keeps_fallback_health() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Ok(HealthResponse::new("")));
        backend.push_health(Ok(HealthResponse::new("   ")));
        let mut poller = poller(&backend);

        assert_eq!(poller.refresh().await.health, Health::Excellent);
        assert_eq!(poller.refresh().await, StatusSnapshot::fallback());
        assert_eq!(backend.health_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_result_is_served_from_cache() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Ok(HealthResponse::new("UP")));
        backend.push_health(Ok(HealthResponse::new("DOWN")));
        let mut poller = poller(&backend);

        assert_eq!(poller.poll().await.health, Health::Excellent);
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(poller.poll().await.health, Health::Excellent);
        assert_eq!(backend.health_calls(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(poller.poll().await.health.label(), "DOWN");
        assert_eq!(backend.health_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_bypasses_cache() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Ok(HealthResponse::new("UP")));
        backend.push_health(Ok(HealthResponse::new("DEGRADED")));
        let mut poller = poller(&backend);

        poller.poll().await;
        let snapshot = poller.refresh().await;
        assert_eq!(snapshot.health.label(), "DEGRADED");
        assert_eq!(backend.health_calls(), 2);

        // The refreshed result is what the cache now serves
        assert_eq!(poller.poll().await, snapshot);
        assert_eq!(backend.health_calls(), 2);
    }

    #[tokio::test]
    async fn failure_replaces_previous_snapshot() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_health(Ok(HealthResponse::new("DOWN")));
        let mut poller = poller(&backend);

        assert_eq!(poller.refresh().await.health.label(), "DOWN");
        // Script exhausted: every further call fails
        assert_eq!(poller.refresh().await, StatusSnapshot::fallback());
    }
}
