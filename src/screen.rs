//! The display boundary.
//!
//! The dashboard loop talks to the display only through [`Screen`]: it hands
//! over published dashboards and receives [`UiEvent`]s back. The terminal
//! implementation lives in [`crate::ui::TerminalScreen`].

use std::time::Duration;

use anyhow::Result;

use crate::scheduler::{Dashboard, PollHealth};

/// Events the display reports back to the dashboard loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The user asked to leave.
    Quit,
    /// The display area changed size.
    Resize(u16, u16),
}

/// A display that can show dashboards and report user events.
pub trait Screen {
    /// Draw the given dashboard, or the loading placeholder when `None`,
    /// along with any ongoing fetch failure.
    fn publish(&mut self, dashboard: Option<&Dashboard>, health: &PollHealth) -> Result<()>;

    /// Recompute the widget layout for a new display size.
    fn relayout(&mut self, width: u16, height: u16) -> Result<()>;

    /// Wait up to `timeout` for the next event.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<UiEvent>>;
}
