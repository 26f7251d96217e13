//! # nexus-console
//!
//! A terminal dashboard for the NEXUS AI platform: simulated live metrics,
//! backend health, and a prompt console over the backend echo endpoint.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Application                            │
//! │  ┌─────────┐    ┌───────────┐    ┌─────────┐    ┌──────────┐     │
//! │  │  app    │───▶│  context  │───▶│   ui    │───▶│ Terminal │     │
//! │  │ (state) │    │(components)    │(render) │    │          │     │
//! │  └─────────┘    └─────┬─────┘    └─────────┘    └──────────┘     │
//! │                       │                                          │
//! │        ┌──────────────┼───────────────┬──────────────┐           │
//! │        ▼              ▼               ▼              ▼           │
//! │   simulator        status          console          scope        │
//! │  (metric ticks)  (health poll)  (prompt log)   (timer owner)     │
//! │                       │               │                          │
//! │                       └──── api ──────┘                          │
//! │                      (Backend trait, HTTP)                       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`simulator`]**: Bounded-random metric generators driven by timers
//! - **[`status`]**: Cached backend health polling with a constant fallback
//! - **[`console`]**: Prompt log and the `Idle`/`Sending` submission machine
//! - **[`api`]**: The [`Backend`] trait and its HTTP implementation
//! - **[`scope`]**: [`TimerScope`], the single owner of every background task
//! - **[`context`]**: [`DashboardContext`], wiring all of the above together
//! - **[`data`]**: Shared models: [`HistoryBuffer`], [`MetricSample`], [`StatusSnapshot`]
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Interactive dashboard against a local backend
//! nexus-console --api-url http://localhost:8094
//!
//! # One-shot health check
//! nexus-console --check
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use nexus_console::{Backend, DashboardContext, HttpBackend, Settings};
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::default();
//! let backend = HttpBackend::builder()
//!     .base_url(settings.api.base_url.clone())
//!     .build()
//!     .unwrap();
//!
//! let mut ctx = DashboardContext::new(settings, Arc::new(backend) as Arc<dyn Backend>);
//! ctx.start();
//! ctx.submit_prompt("hello");
//! ctx.shutdown().await;
//! # });
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod console;
pub mod context;
pub mod data;
pub mod events;
pub mod scope;
pub mod simulator;
pub mod status;
pub mod ui;

// Re-export main types for convenience
pub use api::{ApiError, Backend, HttpBackend};
pub use app::{App, View};
pub use config::Settings;
pub use console::{ConsoleMessage, PromptConsole, Role};
pub use context::DashboardContext;
pub use data::{Health, HistoryBuffer, MetricSample, StatusSnapshot};
pub use scope::TimerScope;
pub use simulator::{Simulator, SimulatorHandle};
pub use status::StatusPoller;
