//! Derived pool metrics.
//!
//! Pure functions over the history and the latest snapshot. Everything here is
//! recomputed from scratch on each successful tick.

use super::history::HistoryBuffer;
use crate::source::{ProcessState, Snapshot};

/// Metrics derived from the history after one successful tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    /// Connections accepted during the last tick; `None` until two samples exist.
    pub throughput: Option<u64>,
    /// Mean duration of in-flight requests, in milliseconds.
    pub avg_latency_ms: f64,
    /// Active share of the pool in percent; `None` while the total is unknown.
    pub pool_load: Option<u8>,
}

impl DerivedMetrics {
    /// Compute all metrics from the current history.
    pub fn compute(history: &HistoryBuffer) -> Self {
        Self {
            throughput: throughput(history),
            avg_latency_ms: history.latest().map_or(0.0, |s| average_latency_ms(s)),
            pool_load: history.latest().and_then(|s| pool_load(s)),
        }
    }

    /// Throughput with "not enough samples" reported as zero.
    pub fn throughput_or_zero(&self) -> u64 {
        self.throughput.unwrap_or(0)
    }

    /// Percent fill for the requests gauge, capped at 100.
    pub fn rps_percent(&self) -> u16 {
        self.throughput_or_zero().min(100) as u16
    }
}

/// Connections accepted between the previous and the latest snapshot.
///
/// The tick is fixed at one second, so this is also the per-second rate.
/// A counter that went backwards (pool restart) counts as zero.
pub fn throughput(history: &HistoryBuffer) -> Option<u64> {
    let latest = history.latest()?;
    let previous = history.previous()?;
    Some(latest.accepted_conn.saturating_sub(previous.accepted_conn))
}

/// Mean request duration in ms over running processes with a non-zero duration.
pub fn average_latency_ms(snapshot: &Snapshot) -> f64 {
    let (total_us, count) = snapshot
        .processes
        .iter()
        .filter(|p| p.state == ProcessState::Running && p.request_duration > 0)
        .fold((0u128, 0u64), |(sum, n), p| (sum + u128::from(p.request_duration), n + 1));

    if count == 0 {
        return 0.0;
    }
    total_us as f64 / count as f64 / 1000.0
}

/// Rounded active/total percentage, withheld when the total is zero.
pub fn pool_load(snapshot: &Snapshot) -> Option<u8> {
    if snapshot.total_processes == 0 {
        return None;
    }
    let percent =
        (snapshot.active_processes as f64 / snapshot.total_processes as f64 * 100.0).round();
    Some(percent.min(100.0) as u8)
}
