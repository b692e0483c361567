//! Options panel model: the form shown beside the selection.

use std::path::PathBuf;

use snapframe_platform_core::{DesktopBounds, Rect};

use crate::overlay::SessionExit;
use crate::preferences::{snap_delay, OptionsRecord};

/// Gap between the selection and the panel (pixels).
pub const PANEL_GAP: i32 = 20;

/// Default panel size in pixels.
pub const PANEL_SIZE: (u32, u32) = (490, 170);

/// Draft options edited while the overlay is open.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsPanel {
    options: OptionsRecord,
    size: (u32, u32),
}

impl OptionsPanel {
    pub fn new(options: OptionsRecord) -> Self {
        Self {
            options,
            size: PANEL_SIZE,
        }
    }

    /// Use the measured size of the rendered panel for placement.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width.max(1), height.max(1));
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn options(&self) -> &OptionsRecord {
        &self.options
    }

    /// Direct access for form bindings (checkboxes).
    pub fn options_mut(&mut self) -> &mut OptionsRecord {
        &mut self.options
    }

    /// Set the delay, snapping to a supported value.
    pub fn set_delay_seconds(&mut self, seconds: f64) {
        self.options.delay_seconds = snap_delay(seconds);
    }

    /// Set the destination folder from user text.
    pub fn set_folder_path(&mut self, text: &str) {
        self.options.folder_path = PathBuf::from(text.trim());
    }

    /// Whether confirming would produce any output.
    pub fn has_output(&self) -> bool {
        self.options.has_output()
    }

    /// Top-left corner for the panel next to `rect`.
    ///
    /// Below the selection, flipped above when it would leave the desktop;
    /// left-aligned with the selection, right-aligned when it would overflow
    /// on the right; finally kept inside the desktop.
    pub fn placement(&self, rect: &Rect, bounds: &DesktopBounds) -> (i32, i32) {
        let width = self.size.0 as i32;
        let height = self.size.1 as i32;

        let mut y = rect.bottom() + PANEL_GAP;
        if y + height > bounds.bottom() {
            let above = rect.y - PANEL_GAP - height;
            y = if above >= bounds.y {
                above
            } else {
                bounds.bottom() - height
            };
        }

        let mut x = rect.x;
        if x + width > bounds.right() {
            x = rect.right() - width;
        }

        (
            x.clamp(bounds.x, (bounds.right() - width).max(bounds.x)),
            y.clamp(bounds.y, (bounds.bottom() - height).max(bounds.y)),
        )
    }

    pub fn confirm(self) -> SessionExit {
        SessionExit::Confirm(self.options)
    }

    pub fn cancel(self) -> SessionExit {
        SessionExit::Cancel
    }
}
