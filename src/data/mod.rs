//! Sample history and derived metrics.
//!
//! This module turns the stream of raw status snapshots into the numbers the
//! dashboard shows.
//!
//! ## Submodules
//!
//! - [`duration`]: Uptime and latency formatting
//! - [`history`]: Bounded chronological snapshot ring ([`HistoryBuffer`])
//! - [`metrics`]: Throughput, average latency and pool load ([`DerivedMetrics`])
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (decoded JSON)
//!        │
//!        ▼
//! HistoryBuffer::append()
//!        │
//!        └──▶ DerivedMetrics::compute() (throughput, latency, load)
//! ```

pub mod duration;
pub mod history;
pub mod metrics;

pub use history::{HistoryBuffer, MAX_HISTORY_SIZE};
pub use metrics::DerivedMetrics;
