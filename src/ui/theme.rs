//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

/// Color and style theme for the dashboard.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for widget titles.
    pub highlight: Color,
    /// Line color for the active-process series.
    pub active: Color,
    /// Line color for the idle-process series.
    pub idle: Color,
    /// Bar color of the pool load gauge.
    pub pool_gauge: Color,
    /// Bar color of the requests/sec gauge.
    pub rps_gauge: Color,
    /// Color for chart axes.
    pub axis: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for labels in the info table.
    pub label: Style,
    /// Style for placeholder text before data arrives.
    pub placeholder: Style,
    /// Style for the fetch failure notice.
    pub failure: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            active: Color::Red,
            idle: Color::Green,
            pool_gauge: Color::Blue,
            rps_gauge: Color::Green,
            axis: Color::White,
            border: Color::Gray,
            label: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            placeholder: Style::default().add_modifier(Modifier::DIM),
            failure: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            active: Color::Red,
            idle: Color::Green,
            pool_gauge: Color::Blue,
            rps_gauge: Color::Green,
            axis: Color::Black,
            border: Color::DarkGray,
            label: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            placeholder: Style::default().add_modifier(Modifier::DIM),
            failure: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Title style for widget blocks.
    pub fn title(&self) -> Style {
        Style::default().fg(self.highlight).add_modifier(Modifier::BOLD)
    }
}
