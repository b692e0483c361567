use std::path::Path;

use image::RgbaImage;
use snapframe_common::error::SnapResult;
use snapframe_platform_core::{Point, Rect};

/// Pixel source for the virtual desktop.
pub trait ScreenGrabber {
    /// Capture `rect` (virtual-desktop pixels). When `pointer` is given it is
    /// in the same coordinate space and is drawn into the image.
    fn capture(&mut self, rect: Rect, pointer: Option<Point>) -> SnapResult<RgbaImage>;

    /// Live pointer position, when the platform can report it.
    fn pointer_position(&self) -> Option<Point> {
        None
    }
}

/// Destination for the clipboard route.
pub trait ClipboardSink {
    fn write_image(&mut self, image: &RgbaImage) -> SnapResult<()>;
}

/// Destination for the folder route.
pub trait ImageFileSink {
    fn write_image(&mut self, image: &RgbaImage, path: &Path) -> SnapResult<()>;
}

pub mod clipboard;
pub mod cursor;
pub mod desktop;
pub mod file;

pub use clipboard::{ClipboardKeeper, SystemClipboard};
pub use cursor::cursor_position;
pub use desktop::{draw_pointer_marker, stitch, DesktopGrabber, XcapMonitors};
pub use file::PngFileSink;

/// The external collaborators a capture needs.
pub struct Capabilities {
    pub grabber: Box<dyn ScreenGrabber>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub files: Box<dyn ImageFileSink>,
}

impl Capabilities {
    pub fn new(
        grabber: Box<dyn ScreenGrabber>,
        clipboard: Box<dyn ClipboardSink>,
        files: Box<dyn ImageFileSink>,
    ) -> Self {
        Self {
            grabber,
            clipboard,
            files,
        }
    }

    /// Desktop implementations for a long-running process.
    pub fn system() -> Self {
        Self::with_clipboard(SystemClipboard::new())
    }

    /// Desktop implementations for a process that exits after capturing.
    /// Copied images stay in `keeper` until [`ClipboardKeeper::serve`] runs.
    pub fn system_handing_off(keeper: ClipboardKeeper) -> Self {
        Self::with_clipboard(SystemClipboard::handing_off_to(keeper))
    }

    fn with_clipboard(clipboard: SystemClipboard) -> Self {
        Self::new(
            Box::new(DesktopGrabber::new()),
            Box::new(clipboard),
            Box::new(PngFileSink),
        )
    }
}
