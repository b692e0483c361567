//! Selection geometry: clamping, handles, hit testing, and drags.
//!
//! Every operation keeps the selection at least `min_size` wide and tall
//! and fully inside the virtual desktop.

use snapframe_platform_core::{DesktopBounds, Point, Rect};

/// Minimum selection width/height in pixels.
pub const MIN_SIZE: u32 = 16;

/// Edge length of a resize handle in pixels.
pub const HANDLE_SIZE: u32 = 10;

/// One of the eight resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl HandleRole {
    /// Corners first: they win hit tests over overlapping edge handles.
    pub const ALL: [HandleRole; 8] = [
        HandleRole::NorthWest,
        HandleRole::NorthEast,
        HandleRole::SouthEast,
        HandleRole::SouthWest,
        HandleRole::North,
        HandleRole::East,
        HandleRole::South,
        HandleRole::West,
    ];

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            HandleRole::West | HandleRole::NorthWest | HandleRole::SouthWest
        )
    }

    /// Whether dragging this handle moves the right edge.
    pub fn moves_right(self) -> bool {
        matches!(
            self,
            HandleRole::East | HandleRole::NorthEast | HandleRole::SouthEast
        )
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(
            self,
            HandleRole::North | HandleRole::NorthEast | HandleRole::NorthWest
        )
    }

    /// Whether dragging this handle moves the bottom edge.
    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            HandleRole::South | HandleRole::SouthEast | HandleRole::SouthWest
        )
    }

    /// Center of the handle on the given rect.
    pub fn anchor(self, rect: &Rect) -> Point {
        let left = rect.x as f64;
        let top = rect.y as f64;
        let right = rect.right() as f64;
        let bottom = rect.bottom() as f64;
        let mid_x = rect.x as f64 + (rect.width / 2) as f64;
        let mid_y = rect.y as f64 + (rect.height / 2) as f64;

        match self {
            HandleRole::North => Point::new(mid_x, top),
            HandleRole::South => Point::new(mid_x, bottom),
            HandleRole::East => Point::new(right, mid_y),
            HandleRole::West => Point::new(left, mid_y),
            HandleRole::NorthEast => Point::new(right, top),
            HandleRole::NorthWest => Point::new(left, top),
            HandleRole::SouthEast => Point::new(right, bottom),
            HandleRole::SouthWest => Point::new(left, bottom),
        }
    }
}

/// What a pointer press grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragTarget {
    /// The rect body: translate without resizing.
    Move,
    /// A resize handle.
    Handle(HandleRole),
}

/// A handle and its square in desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub role: HandleRole,
    pub rect: Rect,
}

/// The eight handles of a selection, derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleSet {
    handles: [Handle; 8],
}

impl HandleSet {
    /// Fixed-size handles around `rect`, independent of its size.
    pub fn new(rect: &Rect, handle_size: u32) -> Self {
        let half = (handle_size / 2) as i32;
        let handles = HandleRole::ALL.map(|role| {
            let anchor = role.anchor(rect);
            Handle {
                role,
                rect: Rect::new(
                    anchor.x as i32 - half,
                    anchor.y as i32 - half,
                    handle_size,
                    handle_size,
                ),
            }
        });
        Self { handles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        self.handles.iter()
    }
}

/// Size limits applied by the geometry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_size: u32,
    pub handle_size: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            handle_size: HANDLE_SIZE,
        }
    }
}

impl Limits {
    pub fn new(min_size: u32, handle_size: u32) -> Self {
        Self {
            min_size: min_size.max(1),
            handle_size: handle_size.max(1),
        }
    }

    /// Half the handle edge: the hit tolerance around a handle center.
    pub fn handle_radius(&self) -> f64 {
        self.handle_size as f64 / 2.0
    }

    /// Fit `rect` inside `bounds`, shrinking when it is larger.
    ///
    /// Idempotent. The minimum size only gives way when the desktop itself
    /// is smaller than it.
    pub fn clamp(&self, rect: Rect, bounds: &DesktopBounds) -> Rect {
        let width = rect
            .width
            .max(self.min_size.min(bounds.width))
            .min(bounds.width);
        let height = rect
            .height
            .max(self.min_size.min(bounds.height))
            .min(bounds.height);

        Rect {
            x: rect.x.clamp(bounds.x, bounds.right() - width as i32),
            y: rect.y.clamp(bounds.y, bounds.bottom() - height as i32),
            width,
            height,
        }
    }

    /// Apply a whole-pixel pointer delta to the grabbed target.
    ///
    /// `Move` translates and clamps. A handle moves only the edges its role
    /// implies; an edge stops `min_size` short of its opposite edge (which
    /// stays fixed) and never crosses the desktop boundary.
    pub fn apply_drag(
        &self,
        rect: Rect,
        target: DragTarget,
        dx: i32,
        dy: i32,
        bounds: &DesktopBounds,
    ) -> Rect {
        let rect = self.clamp(rect, bounds);

        let role = match target {
            DragTarget::Move => {
                let moved = Rect {
                    x: rect.x.saturating_add(dx),
                    y: rect.y.saturating_add(dy),
                    ..rect
                };
                return self.clamp(moved, bounds);
            }
            DragTarget::Handle(role) => role,
        };

        let min_w = self.min_size.min(bounds.width) as i32;
        let min_h = self.min_size.min(bounds.height) as i32;
        let (mut left, mut top, mut right, mut bottom) =
            (rect.x, rect.y, rect.right(), rect.bottom());

        if role.moves_left() {
            left = left.saturating_add(dx).clamp(bounds.x, right - min_w);
        }
        if role.moves_right() {
            right = right
                .saturating_add(dx)
                .clamp(left + min_w, bounds.right());
        }
        if role.moves_top() {
            top = top.saturating_add(dy).clamp(bounds.y, bottom - min_h);
        }
        if role.moves_bottom() {
            bottom = bottom
                .saturating_add(dy)
                .clamp(top + min_h, bounds.bottom());
        }

        self.clamp(Rect::from_edges(left, top, right, bottom), bounds)
    }

    /// Hit test with this configuration's handle size.
    pub fn hit_test(&self, point: Point, rect: &Rect) -> Option<DragTarget> {
        hit_test(point, rect, self.handle_radius())
    }
}

/// Clamp with the default limits.
pub fn clamp(rect: Rect, bounds: &DesktopBounds) -> Rect {
    Limits::default().clamp(rect, bounds)
}

/// Drag with the default limits.
pub fn apply_drag(
    rect: Rect,
    target: DragTarget,
    dx: i32,
    dy: i32,
    bounds: &DesktopBounds,
) -> Rect {
    Limits::default().apply_drag(rect, target, dx, dy, bounds)
}

/// Which part of the selection lies under `point`.
///
/// Handles are squares of half-size `handle_radius` around their anchors.
/// Corners are tested before edges so they win where the squares overlap on
/// small selections; the body yields `Move`; anything else is `None`.
pub fn hit_test(point: Point, rect: &Rect, handle_radius: f64) -> Option<DragTarget> {
    for role in HandleRole::ALL {
        let anchor = role.anchor(rect);
        if (point.x - anchor.x).abs() <= handle_radius
            && (point.y - anchor.y).abs() <= handle_radius
        {
            return Some(DragTarget::Handle(role));
        }
    }

    rect.contains(point).then_some(DragTarget::Move)
}

/// Turns fractional pointer deltas into whole pixels without drift.
///
/// The sub-pixel remainder is carried to the next update; each emitted delta
/// is truncated toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragAccumulator {
    residual_x: f64,
    residual_y: f64,
}

impl DragAccumulator {
    pub fn feed(&mut self, dx: f64, dy: f64) -> (i32, i32) {
        self.residual_x += dx;
        self.residual_y += dy;
        let whole_x = self.residual_x.trunc();
        let whole_y = self.residual_y.trunc();
        self.residual_x -= whole_x;
        self.residual_y -= whole_y;
        (whole_x as i32, whole_y as i32)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
