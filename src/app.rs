//! Foreground dashboard loop.
//!
//! The loop owns no metrics state of its own: it holds the most recent
//! [`Dashboard`] the scheduler published and swaps it wholesale whenever a
//! newer one arrives.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::RenderInitError;
use crate::scheduler::{Dashboard, DashboardReceiver, HealthReceiver, PollHealth, UpdateScheduler};
use crate::screen::{Screen, UiEvent};
use crate::source::StatusSource;

/// Upper bound on how long one wait for terminal events may block.
pub const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Foreground application state.
pub struct App {
    pub running: bool,
    /// Last dashboard received from the scheduler.
    pub dashboard: Option<Arc<Dashboard>>,
    /// Last failure report received from the scheduler.
    pub health: PollHealth,
    updates: DashboardReceiver,
    health_updates: Option<HealthReceiver>,
    needs_redraw: bool,
}

impl App {
    /// Create an App reading dashboards from the scheduler's channel.
    pub fn new(mut updates: DashboardReceiver) -> Self {
        let dashboard = updates.borrow_and_update().clone();
        Self {
            running: true,
            dashboard,
            health: PollHealth::default(),
            updates,
            health_updates: None,
            needs_redraw: true,
        }
    }

    /// Also follow the scheduler's failure reports.
    pub fn with_health(mut self, mut health_updates: HealthReceiver) -> Self {
        self.health = health_updates.borrow_and_update().clone();
        self.health_updates = Some(health_updates);
        self
    }

    /// Pick up the latest publication, if there is a new one.
    ///
    /// Returns Ok(true) if the dashboard or the failure report changed, or
    /// Err if the scheduler has stopped publishing.
    pub fn sync(&mut self) -> Result<bool> {
        let mut changed = match self.updates.has_changed() {
            Ok(true) => {
                self.dashboard = self.updates.borrow_and_update().clone();
                true
            }
            Ok(false) => false,
            Err(_) => bail!("status updater stopped unexpectedly"),
        };

        if let Some(ref mut health_updates) = self.health_updates {
            if let Ok(true) = health_updates.has_changed() {
                self.health = health_updates.borrow_and_update().clone();
                changed = true;
            }
        }

        self.needs_redraw |= changed;
        Ok(changed)
    }

    /// React to one display event.
    pub fn handle_event<S: Screen>(&mut self, screen: &mut S, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::Quit => self.quit(),
            UiEvent::Resize(width, height) => {
                debug!("Resized to {}x{}", width, height);
                screen.relayout(width, height)?;
                self.needs_redraw = true;
            }
        }
        Ok(())
    }

    /// Draw if anything changed since the last draw.
    pub fn redraw<S: Screen>(&mut self, screen: &mut S) -> Result<()> {
        if self.needs_redraw {
            screen.publish(self.dashboard.as_deref(), &self.health)?;
            self.needs_redraw = false;
        }
        Ok(())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

/// A running dashboard: the display, its state and the background poller.
pub struct Session<Sc> {
    pub screen: Sc,
    pub app: App,
    /// Send `true` to stop the poller.
    pub stop: watch::Sender<bool>,
    pub poller: JoinHandle<()>,
}

/// Bring up the display, then start polling `source` on `runtime`.
///
/// If the display cannot be initialised nothing is scheduled and the
/// source is never queried.
pub fn start<S, Sc, F>(runtime: &Handle, source: S, init_screen: F) -> Result<Session<Sc>>
where
    S: StatusSource + 'static,
    Sc: Screen,
    F: FnOnce() -> Result<Sc, RenderInitError>,
{
    let screen = init_screen()?;

    let (stop, shutdown) = watch::channel(false);
    let (scheduler, dashboards) = UpdateScheduler::new(source);
    let app = App::new(dashboards).with_health(scheduler.health());
    let poller = runtime.spawn(scheduler.run(shutdown));

    Ok(Session {
        screen,
        app,
        stop,
        poller,
    })
}

/// Run the dashboard until the user quits.
pub fn run<S: Screen>(screen: &mut S, app: &mut App) -> Result<()> {
    while app.running {
        app.sync()?;
        app.redraw(screen)?;

        if let Some(event) = screen.next_event(EVENT_POLL_TIMEOUT)? {
            app.handle_event(screen, event)?;
        }
    }

    info!("Quit requested");
    Ok(())
}
