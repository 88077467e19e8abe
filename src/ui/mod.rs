//! Terminal rendering using ratatui.

mod dashboard;
mod layout;
mod terminal;
mod theme;

pub use dashboard::{info_rows, render, DashboardView};
pub use layout::{DashboardLayout, MIN_HEIGHT, MIN_WIDTH};
pub use terminal::TerminalScreen;
pub use theme::Theme;
