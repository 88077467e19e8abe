//! # poolwatch
//!
//! A live terminal dashboard for PHP-FPM style process pools.
//!
//! A background poller fetches the pool's JSON status page once a second,
//! keeps a bounded history of samples, derives throughput, average request
//! latency and pool load, and hands a complete immutable dashboard to the
//! render loop on every successful poll.
//!
//! ## Architecture
//!
//! ```text
//!  background (tokio task)              foreground (main thread)
//!
//!  ┌────────┐    ┌───────────┐  watch   ┌─────┐    ┌──────────┐
//!  │ source │───▶│ scheduler │─────────▶│ app │◀──▶│    ui    │
//!  │ (HTTP) │    │ (history, │ Arc<Dash │(loop)│    │ (Screen) │
//!  └────────┘    │  metrics) │  board>  └─────┘    └──────────┘
//!                └───────────┘
//! ```
//!
//! - **[`source`]**: The [`StatusSource`] trait and its HTTP implementation
//! - **[`data`]**: [`HistoryBuffer`], [`DerivedMetrics`] and uptime formatting
//! - **[`scheduler`]**: The [`UpdateScheduler`] tick loop and the published
//!   [`Dashboard`]
//! - **[`app`]**: The foreground loop that draws dashboards and reacts to
//!   [`UiEvent`]s
//! - **[`ui`]**: ratatui widgets and the crossterm-backed [`Screen`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the local pool
//! poolwatch
//!
//! # Another host, Russian labels, debug log to a file
//! poolwatch --url http://10.0.0.5/fpm-status --lang ru \
//!     --log-file poolwatch.log --log-level debug
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use poolwatch::{HttpSource, UpdateScheduler};
//! use tokio::sync::watch;
//!
//! # tokio_test::block_on(async {
//! let source = HttpSource::new("http://localhost/status").unwrap();
//! let (scheduler, mut dashboards) = UpdateScheduler::new(source);
//! let (_stop, shutdown) = watch::channel(false);
//! scheduler.spawn(shutdown);
//!
//! dashboards.changed().await.unwrap();
//! if let Some(dashboard) = dashboards.borrow().as_ref() {
//!     println!("{:?} req/s", dashboard.metrics.throughput);
//! };
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod locale;
pub mod logging;
pub mod scheduler;
pub mod screen;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Session};
pub use config::{Overrides, Settings};
pub use data::{DerivedMetrics, HistoryBuffer, MAX_HISTORY_SIZE};
pub use error::{FetchError, RenderInitError};
pub use locale::Locale;
pub use scheduler::{
    Dashboard, DashboardReceiver, HealthReceiver, PollHealth, SchedulerState, TickOutcome,
    UpdateScheduler,
};
pub use screen::{Screen, UiEvent};
pub use source::{HttpSource, ProcessEntry, ProcessState, Snapshot, StatusSource};
pub use ui::{DashboardView, TerminalScreen, Theme};
