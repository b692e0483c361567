//! Selection overlay state machine.
//!
//! The overlay covers the whole virtual desktop. Pointer events arrive in
//! desktop coordinates; a press on a handle or the body starts a drag, moves
//! feed the drag, and a release ends it. Rendering reads the derived
//! visuals (`handles`, `dim_regions`, `readout`) after every event.

use snapframe_platform_core::{DesktopBounds, Point, Rect};

use crate::geometry::{DragAccumulator, DragTarget, HandleSet, Limits};
use crate::preferences::{OptionsRecord, PersistedPreferences};

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// No drag in progress.
    Idle,
    /// Pointer held down on a handle or the body.
    Dragging(DragTarget),
}

/// How the user left the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionExit {
    Confirm(OptionsRecord),
    Cancel,
}

/// Confirmed rectangle and options of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub rect: Rect,
    pub options: OptionsRecord,
}

impl Selection {
    pub fn into_preferences(self) -> PersistedPreferences {
        PersistedPreferences::new(self.rect, self.options)
    }
}

/// The interactive rectangle of one session.
#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    rect: Rect,
    bounds: DesktopBounds,
    limits: Limits,
    state: OverlayState,
    last_pointer: Point,
    accumulator: DragAccumulator,
}

impl SelectionOverlay {
    /// Start a session from the persisted rectangle, clamped to the current
    /// desktop (the layout may have changed since it was saved).
    pub fn open(prefs: &PersistedPreferences, bounds: DesktopBounds, limits: Limits) -> Self {
        let rect = limits.clamp(prefs.rectangle, &bounds);
        if rect != prefs.rectangle {
            tracing::debug!(
                stored = ?prefs.rectangle,
                clamped = ?rect,
                "Stored selection no longer fits the desktop"
            );
        }

        Self {
            rect,
            bounds,
            limits,
            state: OverlayState::Idle,
            last_pointer: Point::default(),
            accumulator: DragAccumulator::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn bounds(&self) -> DesktopBounds {
        self.bounds
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, OverlayState::Dragging(_))
    }

    /// Begin a drag if the press hits the selection. Presses elsewhere are
    /// ignored and the overlay stays open.
    pub fn pointer_down(&mut self, point: Point) -> Option<DragTarget> {
        let target = self.limits.hit_test(point, &self.rect)?;
        self.state = OverlayState::Dragging(target);
        self.last_pointer = point;
        self.accumulator.reset();
        Some(target)
    }

    /// Feed a pointer move. Returns whether the selection changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let OverlayState::Dragging(target) = self.state else {
            return false;
        };

        let (dx, dy) = self
            .accumulator
            .feed(point.x - self.last_pointer.x, point.y - self.last_pointer.y);
        self.last_pointer = point;
        if dx == 0 && dy == 0 {
            return false;
        }

        let next = self
            .limits
            .apply_drag(self.rect, target, dx, dy, &self.bounds);
        let changed = next != self.rect;
        self.rect = next;
        changed
    }

    /// End the drag. Geometry is left as is.
    pub fn pointer_up(&mut self) {
        self.state = OverlayState::Idle;
        self.accumulator.reset();
    }

    /// What a press at `point` would grab, for cursor feedback.
    pub fn hover_target(&self, point: Point) -> Option<DragTarget> {
        match self.state {
            OverlayState::Dragging(target) => Some(target),
            OverlayState::Idle => self.limits.hit_test(point, &self.rect),
        }
    }

    /// Move the selection by whole pixels (keyboard arrows).
    pub fn nudge(&mut self, dx: i32, dy: i32) -> bool {
        if self.is_dragging() {
            return false;
        }
        let next = self
            .limits
            .apply_drag(self.rect, DragTarget::Move, dx, dy, &self.bounds);
        let changed = next != self.rect;
        self.rect = next;
        changed
    }

    /// Resize handles at their current positions.
    pub fn handles(&self) -> HandleSet {
        HandleSet::new(&self.rect, self.limits.handle_size)
    }

    /// Desktop areas outside the selection, to be tinted.
    pub fn dim_regions(&self) -> Vec<Rect> {
        let b = self.bounds;
        let r = self.rect;
        [
            Rect::from_edges(b.x, b.y, b.right(), r.y),
            Rect::from_edges(b.x, r.bottom(), b.right(), b.bottom()),
            Rect::from_edges(b.x, r.y, r.x, r.bottom()),
            Rect::from_edges(r.right(), r.y, b.right(), r.bottom()),
        ]
        .into_iter()
        .filter(|region| !region.is_empty())
        .collect()
    }

    /// Dimension readout shown next to the selection.
    pub fn readout(&self) -> String {
        format!("{} × {}", self.rect.width, self.rect.height)
    }

    /// Close the overlay, yielding the snapshot on confirm.
    pub fn finish(self, exit: SessionExit) -> Option<Selection> {
        match exit {
            SessionExit::Confirm(options) => Some(Selection {
                rect: self.rect,
                options,
            }),
            SessionExit::Cancel => None,
        }
    }
}
