//! Screen capture and monitor enumeration through `xcap`.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;
use snapframe_common::error::{SnapError, SnapResult};
use snapframe_platform_core::{MonitorInfo, MonitorSource, Point, Rect};

use super::cursor::cursor_position;
use super::ScreenGrabber;

const MARKER_COLOR: Rgba<u8> = Rgba([220, 30, 30, 255]);
const MARKER_SHAFT: f32 = 30.0;
const MARKER_HEAD: f32 = 14.0;
const MARKER_HEAD_SPREAD_DEG: f32 = 35.0;
const MARKER_STROKE: [f32; 4] = [-1.5, -0.5, 0.5, 1.5];

/// Draw a red arrow whose tip sits on the pointer hotspot `(x, y)`.
///
/// The shaft trails down and to the right. Segments leaving the image are
/// clipped.
pub fn draw_pointer_marker(image: &mut RgbaImage, x: f32, y: f32) {
    let heading = 45f32.to_radians();
    let spread = MARKER_HEAD_SPREAD_DEG.to_radians();
    let along = |angle: f32, len: f32| (x + len * angle.cos(), y + len * angle.sin());

    let segments = [
        along(heading, MARKER_SHAFT),
        along(heading - spread, MARKER_HEAD),
        along(heading + spread, MARKER_HEAD),
    ];

    for end in segments {
        for offset in MARKER_STROKE {
            draw_line_segment_mut(image, (x + offset, y), (end.0 + offset, end.1), MARKER_COLOR);
            draw_line_segment_mut(image, (x, y + offset), (end.0, end.1 + offset), MARKER_COLOR);
        }
    }
}

/// Copy the parts of `frames` that overlap `rect` into one image of
/// `rect`'s size.
///
/// Each frame is paired with its monitor's area in desktop pixels. A frame
/// larger than its area (a scaled display) is cropped in its own pixels and
/// resized down to the area's scale. Returns `None` when no frame overlaps.
pub fn stitch(rect: Rect, frames: &[(Rect, RgbaImage)]) -> Option<RgbaImage> {
    let mut canvas = RgbaImage::new(rect.width, rect.height);
    let mut covered = false;

    for (area, frame) in frames {
        let Some(overlap) = rect.intersection(area) else {
            continue;
        };

        let scale_x = f64::from(frame.width()) / f64::from(area.width);
        let scale_y = f64::from(frame.height()) / f64::from(area.height);
        let src_x = (f64::from(overlap.x - area.x) * scale_x).round() as u32;
        let src_y = (f64::from(overlap.y - area.y) * scale_y).round() as u32;
        let src_w = ((f64::from(overlap.width) * scale_x).round() as u32)
            .min(frame.width().saturating_sub(src_x));
        let src_h = ((f64::from(overlap.height) * scale_y).round() as u32)
            .min(frame.height().saturating_sub(src_y));
        if src_w == 0 || src_h == 0 {
            continue;
        }

        let mut part = imageops::crop_imm(frame, src_x, src_y, src_w, src_h).to_image();
        if part.dimensions() != (overlap.width, overlap.height) {
            part = imageops::resize(&part, overlap.width, overlap.height, FilterType::Triangle);
        }
        imageops::replace(
            &mut canvas,
            &part,
            i64::from(overlap.x - rect.x),
            i64::from(overlap.y - rect.y),
        );
        covered = true;
    }

    covered.then_some(canvas)
}

/// Captures every monitor that overlaps the requested rect and stitches
/// the overlapping parts into one image.
#[derive(Debug, Default)]
pub struct DesktopGrabber;

impl DesktopGrabber {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenGrabber for DesktopGrabber {
    fn capture(&mut self, rect: Rect, pointer: Option<Point>) -> SnapResult<RgbaImage> {
        if rect.is_empty() {
            return Err(SnapError::capture("Selection has no area"));
        }

        let monitors = xcap::Monitor::all()
            .map_err(|e| SnapError::capture(format!("Failed to enumerate monitors: {e}")))?;

        let mut frames = Vec::new();
        for monitor in &monitors {
            let area = monitor_area(monitor)
                .map_err(|e| SnapError::capture(format!("Failed to read monitor geometry: {e}")))?;
            if rect.intersection(&area).is_none() {
                continue;
            }
            let frame = monitor
                .capture_image()
                .map_err(|e| SnapError::capture(format!("Screen capture failed: {e}")))?;
            frames.push((area, frame));
        }

        let Some(mut canvas) = stitch(rect, &frames) else {
            return Err(SnapError::capture(format!(
                "Selection {}x{} at ({}, {}) is not on any monitor",
                rect.width, rect.height, rect.x, rect.y
            )));
        };

        if let Some(point) = pointer.filter(|p| rect.contains(*p)) {
            draw_pointer_marker(
                &mut canvas,
                (point.x - rect.x as f64) as f32,
                (point.y - rect.y as f64) as f32,
            );
        }

        tracing::info!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            monitors = frames.len(),
            "Region captured"
        );
        Ok(canvas)
    }

    fn pointer_position(&self) -> Option<Point> {
        cursor_position()
    }
}

fn monitor_area(monitor: &xcap::Monitor) -> xcap::XCapResult<Rect> {
    Ok(Rect::new(
        monitor.x()?,
        monitor.y()?,
        monitor.width()?,
        monitor.height()?,
    ))
}

/// Monitor layout from `xcap`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapMonitors;

impl MonitorSource for XcapMonitors {
    fn monitors(&self) -> SnapResult<Vec<MonitorInfo>> {
        let monitors = xcap::Monitor::all()
            .map_err(|e| SnapError::platform(format!("Failed to enumerate monitors: {e}")))?;

        monitors
            .iter()
            .map(|monitor| {
                let area = monitor_area(monitor).map_err(|e| {
                    SnapError::platform(format!("Failed to read monitor geometry: {e}"))
                })?;
                Ok(MonitorInfo {
                    name: monitor.name().unwrap_or_default(),
                    width: area.width,
                    height: area.height,
                    x: area.x,
                    y: area.y,
                    scale_factor: monitor.scale_factor().map(f64::from).unwrap_or(1.0),
                    primary: monitor.is_primary().unwrap_or(false),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_tip_on_hotspot() {
        let mut image = RgbaImage::new(64, 64);
        draw_pointer_marker(&mut image, 10.0, 10.0);

        assert_eq!(image.get_pixel(10, 10), &MARKER_COLOR);
        assert_eq!(image.get_pixel(20, 20), &MARKER_COLOR);
        assert_eq!(image.get_pixel(5, 50), &Rgba([0, 0, 0, 0]));
    }

    fn gradient_frame(width: u32, height: u32, scale: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x / scale) as u8, (y / scale) as u8, 0, 255])
        })
    }

    fn close(actual: u8, expected: u8) -> bool {
        actual.abs_diff(expected) <= 1
    }

    #[test]
    fn test_stitch_across_negative_origin_and_scaled_monitor() {
        let left = Rect::new(-100, 0, 100, 50);
        let main = Rect::new(0, 0, 100, 50);
        let frames = vec![
            (left, RgbaImage::from_pixel(100, 50, Rgba([0, 0, 255, 255]))),
            (main, gradient_frame(200, 100, 2)),
        ];

        let image = stitch(Rect::new(-20, 10, 40, 20), &frames).unwrap();
        assert_eq!(image.dimensions(), (40, 20));

        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(image.get_pixel(19, 19), &Rgba([0, 0, 255, 255]));

        for (x, y) in [(20, 0), (25, 7), (39, 19)] {
            let pixel = image.get_pixel(x, y);
            let (desktop_x, desktop_y) = (x - 20, y + 10);
            assert!(
                close(pixel[0], desktop_x as u8) && close(pixel[1], desktop_y as u8),
                "pixel ({x}, {y}) = {pixel:?}"
            );
            assert_eq!(pixel[2], 0);
        }
    }

    #[test]
    fn test_stitch_unscaled_frame_is_copied_exactly() {
        let main = Rect::new(0, 0, 64, 64);
        let frames = vec![(main, gradient_frame(64, 64, 1))];

        let image = stitch(Rect::new(10, 20, 16, 16), &frames).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 0, 255]));
        assert_eq!(image.get_pixel(15, 15), &Rgba([25, 35, 0, 255]));
    }

    #[test]
    fn test_stitch_off_screen_rect_is_none() {
        let frames = vec![(Rect::new(0, 0, 64, 64), gradient_frame(64, 64, 1))];
        assert!(stitch(Rect::new(100, 100, 16, 16), &frames).is_none());
    }

    #[test]
    fn test_marker_near_edge_is_clipped() {
        let mut image = RgbaImage::new(8, 8);
        draw_pointer_marker(&mut image, 6.0, 6.0);
        assert_eq!(image.get_pixel(7, 7), &MARKER_COLOR);
    }
}
