//! Folder route: PNG files on disk.

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use snapframe_common::error::{SnapError, SnapResult};

use super::ImageFileSink;

/// Writes PNG files, creating the destination folder when missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngFileSink;

impl ImageFileSink for PngFileSink {
    fn write_image(&mut self, image: &RgbaImage, path: &Path) -> SnapResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SnapError::output_route(
                    "folder",
                    format!("cannot create {}: {e}", parent.display()),
                )
            })?;
        }

        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| SnapError::output_route("folder", e.to_string()))?;
        tracing::debug!(path = %path.display(), "Screenshot written");
        Ok(())
    }
}
