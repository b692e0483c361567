//! Integer rectangles and pointer positions in virtual-desktop coordinates.

use serde::{Deserialize, Serialize};

/// A pointer position in virtual-desktop pixels.
///
/// Kept fractional: pointer devices and scaled UIs report sub-pixel
/// positions, and drags accumulate the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in virtual-desktop pixels.
///
/// `x`/`y` may be negative when a monitor sits left of or above the primary.
/// Missing fields deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from edge coordinates. Inverted edges give a zero-sized rect.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: (right - left).max(0) as u32,
            height: (bottom - top).max(0) as u32,
        }
    }

    /// A `width` x `height` rect centered inside `outer`.
    pub fn centered_in(outer: &Rect, width: u32, height: u32) -> Self {
        let width = width.min(outer.width);
        let height = height.min(outer.height);
        Self {
            x: outer.x + ((outer.width - width) / 2) as i32,
            y: outer.y + ((outer.height - height) / 2) as i32,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Whether the point lies inside the rect, edges included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x as f64
            && point.x <= self.right() as f64
            && point.y >= self.y as f64
            && point.y <= self.bottom() as f64
    }

    /// Whether `other` lies fully inside this rect.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Overlapping area of two rects, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > left && bottom > top).then(|| Rect::from_edges(left, top, right, bottom))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_with_negative_origin() {
        let rect = Rect::new(-1000, -50, 500, 300);
        assert_eq!(rect.right(), -500);
        assert_eq!(rect.bottom(), 250);
        assert_eq!(Rect::from_edges(-1000, -50, -500, 250), rect);
    }

    #[test]
    fn test_inverted_edges_are_empty() {
        let rect = Rect::from_edges(10, 10, 5, 20);
        assert!(rect.is_empty());
    }

    #[test]
    fn test_centered_in() {
        let outer = Rect::new(-1920, 0, 1920, 1080);
        let inner = Rect::centered_in(&outer, 960, 540);
        assert_eq!(inner, Rect::new(-1440, 270, 960, 540));
        assert!(outer.contains_rect(&inner));
    }

    #[test]
    fn test_intersection_across_monitors() {
        let selection = Rect::new(-100, 50, 300, 200);
        let left_monitor = Rect::new(-1920, 0, 1920, 1080);
        let main_monitor = Rect::new(0, 0, 1920, 1080);

        assert_eq!(
            selection.intersection(&left_monitor),
            Some(Rect::new(-100, 50, 100, 200))
        );
        assert_eq!(
            selection.intersection(&main_monitor),
            Some(Rect::new(0, 50, 200, 200))
        );
        assert_eq!(left_monitor.intersection(&main_monitor), None);
    }

    #[test]
    fn test_contains_includes_edges() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(!rect.contains(Point::new(10.5, 3.0)));
    }
}
