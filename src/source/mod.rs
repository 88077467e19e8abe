//! Status source abstraction for fetching pool snapshots.
//!
//! A [`StatusSource`] performs exactly one fetch-and-decode per call. It never
//! retries; the scheduler decides what a failure means for the current tick.

mod http;
mod snapshot;

pub use http::{status_url, HttpSource, HttpSourceBuilder};
pub use snapshot::{ProcessEntry, ProcessState, Snapshot};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::FetchError;

/// Trait for fetching one status snapshot.
///
/// # Example
///
/// ```no_run
/// use poolwatch::{HttpSource, StatusSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::new("http://localhost/status").unwrap();
/// match source.fetch().await {
///     Ok(snapshot) => println!("{} processes", snapshot.total_processes),
///     Err(e) => eprintln!("skipped: {e}"),
/// }
/// # });
/// ```
#[async_trait]
pub trait StatusSource: Send + Sync + Debug {
    /// Fetch and fully decode one snapshot.
    async fn fetch(&self) -> Result<Snapshot, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI help line.
    fn description(&self) -> &str;
}
