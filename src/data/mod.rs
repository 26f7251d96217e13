//! Data models shared by the simulators, the poller and the views.
//!
//! ## Submodules
//!
//! - [`history`]: Fixed-capacity FIFO windows and sparkline normalization
//! - [`sample`]: Timestamped metric readings ([`MetricSample`]) and thought patterns
//! - [`status`]: Backend health summary ([`StatusSnapshot`], [`Health`])
//!
//! ## Data Flow
//!
//! ```text
//! Simulator tick
//!        │
//!        ├──▶ MetricSample ──▶ HistoryBuffer::push() (per stream)
//!        │
//!        └──▶ gauges (current value of drifting metrics)
//!
//! StatusPoller::poll() ──▶ StatusSnapshot (replaced wholesale)
//! ```

pub mod history;
pub mod sample;
pub mod status;

pub use history::HistoryBuffer;
pub use sample::{MetricSample, ThoughtKind, ThoughtPattern};
pub use status::{Health, StatusSnapshot};
