//! Crossterm-backed [`Screen`].

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::debug;

use super::dashboard::{self, DashboardView};
use super::layout::DashboardLayout;
use crate::error::RenderInitError;
use crate::events;
use crate::scheduler::{Dashboard, PollHealth};
use crate::screen::{Screen, UiEvent};

/// The dashboard drawn on the controlling terminal.
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    layout: DashboardLayout,
    view: DashboardView,
}

impl TerminalScreen {
    /// Take over the terminal: raw mode, alternate screen, panic hook.
    ///
    /// Anything already switched on is switched back off if a later step
    /// fails.
    pub fn init(view: DashboardView) -> Result<Self, RenderInitError> {
        enable_raw_mode().map_err(RenderInitError::RawMode)?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(RenderInitError::AlternateScreen(e));
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                leave_terminal();
                return Err(RenderInitError::Terminal(e));
            }
        };

        // Restore the terminal before the panic message is printed.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic| {
            leave_terminal();
            original_hook(panic);
        }));

        let size = match terminal.size() {
            Ok(size) => size,
            Err(e) => {
                leave_terminal();
                return Err(RenderInitError::Terminal(e));
            }
        };
        debug!("Terminal initialised at {}x{}", size.width, size.height);

        Ok(Self {
            terminal,
            layout: DashboardLayout::for_size(size.width, size.height),
            view,
        })
    }

    /// Hand the terminal back to the shell.
    pub fn restore(mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Screen for TerminalScreen {
    fn publish(&mut self, dashboard: Option<&Dashboard>, health: &PollHealth) -> Result<()> {
        let layout = &self.layout;
        let view = &self.view;
        self.terminal
            .draw(|frame| dashboard::render(frame, layout, view, dashboard, health))?;
        Ok(())
    }

    fn relayout(&mut self, width: u16, height: u16) -> Result<()> {
        let area = Rect::new(0, 0, width, height);
        self.terminal.resize(area)?;
        self.layout = DashboardLayout::new(area);
        Ok(())
    }

    fn next_event(&mut self, timeout: Duration) -> Result<Option<UiEvent>> {
        Ok(events::poll_event(timeout)?.and_then(events::translate))
    }
}

fn leave_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}
