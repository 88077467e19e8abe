//! Widget placement.
//!
//! ```text
//! ┌──────────────────────────────┬───────────────────┐
//! │                              │ Pool load gauge   │
//! │ Active/idle processes chart  ├───────────────────┤
//! │                              │ Requests/sec      │
//! ├─────────┬─────────┬──────────┴───────────────────┤
//! │ Avg ms  │ Slow    │ Pool info table              │
//! ├─────────┴─────────┴──────────────────────────────┤
//! │ Help                                             │
//! └──────────────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 20;

/// Height of the info table including its border.
const INFO_HEIGHT: u16 = 9;

/// Screen regions for every dashboard widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardLayout {
    pub area: Rect,
    pub chart: Rect,
    pub pool_gauge: Rect,
    pub rps_gauge: Rect,
    pub avg_duration: Rect,
    pub slow_requests: Rect,
    pub info: Rect,
    pub help: Rect,
}

impl DashboardLayout {
    /// Split `area` into widget regions.
    pub fn new(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Percentage(60),
            Constraint::Min(INFO_HEIGHT),
            Constraint::Length(3),
        ])
        .split(area);

        let top = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);
        let gauges =
            Layout::vertical([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)]).split(top[1]);
        let middle = Layout::horizontal([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ])
        .split(rows[1]);

        Self {
            area,
            chart: top[0],
            pool_gauge: gauges[0],
            rps_gauge: gauges[1],
            avg_duration: middle[0],
            slow_requests: middle[1],
            info: middle[2],
            help: rows[2],
        }
    }

    /// Layout for a display of the given size.
    pub fn for_size(width: u16, height: u16) -> Self {
        Self::new(Rect::new(0, 0, width, height))
    }

    /// Whether the area is large enough to draw the dashboard.
    pub fn fits(&self) -> bool {
        self.area.width >= MIN_WIDTH && self.area.height >= MIN_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_tile_the_area() {
        let layout = DashboardLayout::for_size(120, 40);
        assert!(layout.fits());

        let regions = [
            layout.chart,
            layout.pool_gauge,
            layout.rps_gauge,
            layout.avg_duration,
            layout.slow_requests,
            layout.info,
            layout.help,
        ];
        let covered: u32 = regions.iter().map(|r| r.width as u32 * r.height as u32).sum();
        assert_eq!(covered, 120 * 40);

        for (i, a) in regions.iter().enumerate() {
            assert_eq!(layout.area.intersection(*a), *a);
            for b in &regions[i + 1..] {
                assert!(!a.intersects(*b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_proportions() {
        let layout = DashboardLayout::for_size(100, 50);
        assert_eq!(layout.chart.width, 60);
        assert_eq!(layout.chart.height, 30);
        assert_eq!(layout.help.height, 3);
        assert_eq!(layout.help.width, 100);
        assert!(layout.pool_gauge.height > layout.rps_gauge.height);
        assert!(layout.info.height >= INFO_HEIGHT);
    }

    #[test]
    fn test_relayout_tracks_size() {
        let small = DashboardLayout::for_size(80, 24);
        let large = DashboardLayout::for_size(200, 60);
        assert_ne!(small, large);
        assert_eq!(large.help.y, 57);
        assert!(!DashboardLayout::for_size(40, 10).fits());
    }
}
