//! SnapFrame platform core contracts.
//!
//! Monitor layout and virtual-desktop coordinate types shared by the
//! selection model and the capture engine, without coupling to a concrete
//! OS backend.

pub mod rect;

use serde::{Deserialize, Serialize};
use snapframe_common::error::SnapResult;

pub use rect::{Point, Rect};

/// Size used when no monitor information is available at all.
pub const FALLBACK_DISPLAY_SIZE: (u32, u32) = (1920, 1080);

/// Information about a connected monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorInfo {
    /// Monitor name/identifier.
    pub name: String,
    /// Resolution in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Position in the virtual desktop (pixels).
    pub x: i32,
    pub y: i32,
    /// Scale factor (for example 1.0, 1.25, 2.0).
    pub scale_factor: f64,
    /// Whether this monitor is primary.
    pub primary: bool,
}

impl MonitorInfo {
    /// A primary monitor at the origin, used when enumeration fails.
    pub fn synthetic_primary(width: u32, height: u32) -> Self {
        Self {
            name: "synthetic".to_string(),
            width,
            height,
            x: 0,
            y: 0,
            scale_factor: 1.0,
            primary: true,
        }
    }

    /// Monitor area in virtual-desktop coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Whether the point lies on this monitor (right/bottom edges excluded).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x as f64
            && point.x < (self.x + self.width as i32) as f64
            && point.y >= self.y as f64
            && point.y < (self.y + self.height as i32) as f64
    }
}

/// Union bounding box of every monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DesktopBounds {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn contains_rect(&self, rect: &Rect) -> bool {
        self.as_rect().contains_rect(rect)
    }
}

/// Where monitor layouts come from (OS backend, fixture, ...).
pub trait MonitorSource {
    /// Enumerate connected monitors in OS order.
    fn monitors(&self) -> SnapResult<Vec<MonitorInfo>>;

    /// Size of the primary display as reported outside full enumeration.
    fn primary_size(&self) -> Option<(u32, u32)> {
        None
    }
}

/// A fixed monitor layout.
#[derive(Debug, Clone, Default)]
pub struct StaticMonitors(pub Vec<MonitorInfo>);

impl MonitorSource for StaticMonitors {
    fn monitors(&self) -> SnapResult<Vec<MonitorInfo>> {
        Ok(self.0.clone())
    }

    fn primary_size(&self) -> Option<(u32, u32)> {
        primary_monitor(&self.0).map(|m| (m.width, m.height))
    }
}

/// Enumerate monitors, never returning an empty list.
///
/// An error or an empty result falls back to one synthetic monitor sized to
/// the source's primary display.
pub fn enumerate_monitors(source: &dyn MonitorSource) -> Vec<MonitorInfo> {
    let monitors = match source.monitors() {
        Ok(monitors) => monitors,
        Err(e) => {
            tracing::warn!("Monitor enumeration failed: {}", e);
            Vec::new()
        }
    };

    if !monitors.is_empty() {
        tracing::debug!(count = monitors.len(), "Enumerated monitors");
        return monitors;
    }

    let (width, height) = source.primary_size().unwrap_or(FALLBACK_DISPLAY_SIZE);
    tracing::warn!(width, height, "No monitors reported, using a synthetic primary");
    vec![MonitorInfo::synthetic_primary(width, height)]
}

/// Compute virtual desktop bounds that include all connected monitors.
pub fn virtual_desktop_bounds(monitors: &[MonitorInfo]) -> DesktopBounds {
    if monitors.is_empty() {
        return DesktopBounds {
            x: 0,
            y: 0,
            width: FALLBACK_DISPLAY_SIZE.0,
            height: FALLBACK_DISPLAY_SIZE.1,
        };
    }

    let min_x = monitors.iter().map(|m| m.x).min().unwrap_or(0);
    let min_y = monitors.iter().map(|m| m.y).min().unwrap_or(0);
    let max_x = monitors
        .iter()
        .map(|m| m.x + m.width as i32)
        .max()
        .unwrap_or(FALLBACK_DISPLAY_SIZE.0 as i32);
    let max_y = monitors
        .iter()
        .map(|m| m.y + m.height as i32)
        .max()
        .unwrap_or(FALLBACK_DISPLAY_SIZE.1 as i32);

    DesktopBounds {
        x: min_x,
        y: min_y,
        width: (max_x - min_x).max(1) as u32,
        height: (max_y - min_y).max(1) as u32,
    }
}

/// The monitor flagged primary, else the first one.
pub fn primary_monitor(monitors: &[MonitorInfo]) -> Option<&MonitorInfo> {
    monitors
        .iter()
        .find(|m| m.primary)
        .or_else(|| monitors.first())
}

/// The monitor under a point, if any.
pub fn monitor_at(monitors: &[MonitorInfo], point: Point) -> Option<&MonitorInfo> {
    monitors.iter().find(|m| m.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use snapframe_common::error::SnapError;

    fn monitor(name: &str, x: i32, y: i32, width: u32, height: u32, primary: bool) -> MonitorInfo {
        MonitorInfo {
            name: name.to_string(),
            width,
            height,
            x,
            y,
            scale_factor: 1.0,
            primary,
        }
    }

    struct FailingSource;

    impl MonitorSource for FailingSource {
        fn monitors(&self) -> SnapResult<Vec<MonitorInfo>> {
            Err(SnapError::platform("no display connection"))
        }

        fn primary_size(&self) -> Option<(u32, u32)> {
            Some((2560, 1440))
        }
    }

    #[test]
    fn virtual_bounds_cover_negative_origin_layout() {
        let monitors = vec![
            monitor("left", -1920, 0, 1920, 1080, false),
            monitor("main", 0, 0, 2560, 1440, true),
        ];

        let bounds = virtual_desktop_bounds(&monitors);
        assert_eq!(bounds.x, -1920);
        assert_eq!(bounds.y, 0);
        assert_eq!(bounds.width, 4480);
        assert_eq!(bounds.height, 1440);
    }

    #[test]
    fn virtual_bounds_cover_monitor_above_primary() {
        let monitors = vec![
            monitor("main", 0, 0, 1920, 1080, true),
            monitor("top", 200, -900, 1600, 900, false),
        ];

        let bounds = virtual_desktop_bounds(&monitors);
        assert_eq!((bounds.x, bounds.y), (0, -900));
        assert_eq!((bounds.right(), bounds.bottom()), (1920, 1080));
    }

    #[test]
    fn failing_enumeration_falls_back_to_primary_size() {
        let monitors = enumerate_monitors(&FailingSource);
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].bounds(), Rect::new(0, 0, 2560, 1440));
        assert!(monitors[0].primary);
    }

    #[test]
    fn empty_enumeration_falls_back_to_default_size() {
        let monitors = enumerate_monitors(&StaticMonitors(Vec::new()));
        assert_eq!(monitors[0].bounds(), Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn primary_falls_back_to_first_monitor() {
        let monitors = vec![
            monitor("a", -1920, 0, 1920, 1080, false),
            monitor("b", 0, 0, 1920, 1080, false),
        ];
        assert_eq!(primary_monitor(&monitors).unwrap().name, "a");
    }

    #[test]
    fn monitor_at_finds_negative_origin_monitor() {
        let monitors = vec![
            monitor("main", 0, 0, 1920, 1080, true),
            monitor("left", -1920, 0, 1920, 1080, false),
        ];
        let hit = monitor_at(&monitors, Point::new(-10.0, 500.0)).unwrap();
        assert_eq!(hit.name, "left");
        assert!(monitor_at(&monitors, Point::new(100.0, 2000.0)).is_none());
    }

    fn arb_monitor() -> impl Strategy<Value = MonitorInfo> {
        (-8000i32..8000, -8000i32..8000, 1u32..5000, 1u32..5000)
            .prop_map(|(x, y, w, h)| monitor("m", x, y, w, h, false))
    }

    proptest! {
        #[test]
        fn union_bounds_contain_every_monitor(
            mut monitors in prop::collection::vec(arb_monitor(), 1..6),
            neg_x in -8000i32..0,
            neg_y in -8000i32..0,
        ) {
            monitors[0].x = neg_x;
            monitors[0].y = neg_y;
            let bounds = virtual_desktop_bounds(&monitors);
            for m in &monitors {
                prop_assert!(bounds.x <= m.x);
                prop_assert!(bounds.y <= m.y);
                prop_assert!(bounds.right() >= m.x + m.width as i32);
                prop_assert!(bounds.bottom() >= m.y + m.height as i32);
            }
        }
    }
}
