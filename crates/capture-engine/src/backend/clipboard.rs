//! Clipboard route backed by `arboard`.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard};

use image::RgbaImage;
use snapframe_common::error::{SnapError, SnapResult};

use super::ClipboardSink;

/// On X11 and Wayland the copying process serves the clipboard contents
/// itself; they disappear when it exits.
const PROCESS_OWNS_CLIPBOARD: bool = cfg!(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
));

fn image_data(image: &RgbaImage) -> arboard::ImageData<'_> {
    arboard::ImageData {
        width: image.width() as usize,
        height: image.height() as usize,
        bytes: Cow::Borrowed(image.as_raw()),
    }
}

fn clipboard_error(e: arboard::Error) -> SnapError {
    SnapError::output_route("clipboard", e.to_string())
}

/// System clipboard, opened on first use and kept for the process lifetime.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    keeper: Option<ClipboardKeeper>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard for a process that exits after capturing: copied images
    /// are also handed to `keeper`, which serves them after the UI closes.
    pub fn handing_off_to(keeper: ClipboardKeeper) -> Self {
        Self {
            inner: None,
            keeper: Some(keeper),
        }
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_image(&mut self, image: &RgbaImage) -> SnapResult<()> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(clipboard_error)?,
        };

        let result = clipboard.set_image(image_data(image));
        self.inner = Some(clipboard);
        result.map_err(clipboard_error)?;

        if PROCESS_OWNS_CLIPBOARD {
            if let Some(keeper) = &self.keeper {
                keeper.retain(image);
            }
        }
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Image placed on clipboard"
        );
        Ok(())
    }
}

/// The last copied image, kept so it can outlive the overlay window.
#[derive(Debug, Clone, Default)]
pub struct ClipboardKeeper {
    pending: Arc<Mutex<Option<RgbaImage>>>,
}

impl ClipboardKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<RgbaImage>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn retain(&self, image: &RgbaImage) {
        *self.lock() = Some(image.clone());
    }

    /// Size of the image waiting to be served, if any.
    pub fn pending_size(&self) -> Option<(u32, u32)> {
        self.lock().as_ref().map(RgbaImage::dimensions)
    }

    /// Serve the retained image until another application takes over the
    /// clipboard. Blocks; returns at once when nothing is pending.
    pub fn serve(&self) -> SnapResult<()> {
        let Some(image) = self.lock().take() else {
            return Ok(());
        };
        tracing::info!(
            width = image.width(),
            height = image.height(),
            "Serving clipboard contents until they are replaced"
        );
        serve_until_replaced(&image)?;
        tracing::debug!("Clipboard contents replaced by another application");
        Ok(())
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn serve_until_replaced(image: &RgbaImage) -> SnapResult<()> {
    use arboard::SetExtLinux;

    let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
    clipboard
        .set()
        .wait()
        .image(image_data(image))
        .map_err(clipboard_error)
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn serve_until_replaced(_image: &RgbaImage) -> SnapResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeper_holds_latest_copy() {
        let keeper = ClipboardKeeper::new();
        assert_eq!(keeper.pending_size(), None);

        keeper.retain(&RgbaImage::new(4, 3));
        keeper.clone().retain(&RgbaImage::new(8, 6));
        assert_eq!(keeper.pending_size(), Some((8, 6)));
    }

    #[test]
    fn test_serving_nothing_returns_immediately() {
        let keeper = ClipboardKeeper::new();
        assert!(keeper.serve().is_ok());
        assert_eq!(keeper.pending_size(), None);
    }
}
