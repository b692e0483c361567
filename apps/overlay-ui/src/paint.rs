//! Desktop ↔ viewport mapping and selection drawing.

use eframe::egui::{self, Align2, Color32, CursorIcon, FontId, Pos2, Stroke};
use snapframe_platform_core::{Point, Rect};
use snapframe_selection_model::{DragTarget, HandleRole, SelectionOverlay};

const BORDER: Color32 = Color32::from_rgb(80, 160, 255);
const HANDLE_FILL: Color32 = Color32::WHITE;
const READOUT_HEIGHT: f32 = 18.0;

/// Maps viewport points to virtual-desktop pixels.
///
/// The viewport's top-left sits at the desktop origin, which may be negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMap {
    origin_x: i32,
    origin_y: i32,
    pixels_per_point: f32,
}

impl ScreenMap {
    pub fn new(origin: (i32, i32), pixels_per_point: f32) -> Self {
        Self {
            origin_x: origin.0,
            origin_y: origin.1,
            pixels_per_point: if pixels_per_point > 0.0 {
                pixels_per_point
            } else {
                1.0
            },
        }
    }

    pub fn pixels_per_point(self) -> f32 {
        self.pixels_per_point
    }

    pub fn to_desktop(self, pos: Pos2) -> Point {
        Point::new(
            self.origin_x as f64 + f64::from(pos.x * self.pixels_per_point),
            self.origin_y as f64 + f64::from(pos.y * self.pixels_per_point),
        )
    }

    pub fn to_screen_pos(self, x: i32, y: i32) -> Pos2 {
        egui::pos2(
            (x - self.origin_x) as f32 / self.pixels_per_point,
            (y - self.origin_y) as f32 / self.pixels_per_point,
        )
    }

    pub fn to_screen(self, rect: &Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.to_screen_pos(rect.x, rect.y),
            egui::vec2(
                rect.width as f32 / self.pixels_per_point,
                rect.height as f32 / self.pixels_per_point,
            ),
        )
    }
}

/// Cursor shown over a drag target.
pub fn cursor_for(target: Option<DragTarget>) -> CursorIcon {
    match target {
        None => CursorIcon::Default,
        Some(DragTarget::Move) => CursorIcon::Move,
        Some(DragTarget::Handle(role)) => match role {
            HandleRole::North | HandleRole::South => CursorIcon::ResizeVertical,
            HandleRole::East | HandleRole::West => CursorIcon::ResizeHorizontal,
            HandleRole::NorthWest | HandleRole::SouthEast => CursorIcon::ResizeNwSe,
            HandleRole::NorthEast | HandleRole::SouthWest => CursorIcon::ResizeNeSw,
        },
    }
}

/// Dimmed surroundings, border, handles and the size readout.
pub fn paint_selection(
    ctx: &egui::Context,
    overlay: &SelectionOverlay,
    map: ScreenMap,
    dim_alpha: u8,
) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let dim = Color32::from_black_alpha(dim_alpha);

    for region in overlay.dim_regions() {
        painter.rect_filled(map.to_screen(&region), 0.0, dim);
    }

    let selection = map.to_screen(&overlay.rect());
    painter.rect_stroke(selection, 0.0, Stroke::new(1.5, BORDER));

    for handle in overlay.handles().iter() {
        let rect = map.to_screen(&handle.rect);
        painter.rect_filled(rect, 1.0, HANDLE_FILL);
        painter.rect_stroke(rect, 1.0, Stroke::new(1.0, BORDER));
    }

    // Above the selection, or inside it when there is no room.
    let (anchor, align) = if selection.top() >= READOUT_HEIGHT + 4.0 {
        (selection.left_top() + egui::vec2(0.0, -4.0), Align2::LEFT_BOTTOM)
    } else {
        (selection.left_top() + egui::vec2(6.0, 6.0), Align2::LEFT_TOP)
    };
    painter.text(
        anchor,
        align,
        overlay.readout(),
        FontId::proportional(14.0),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_negative_origin_scaled() {
        let map = ScreenMap::new((-1920, 0), 2.0);
        assert_eq!(
            map.to_desktop(egui::pos2(10.0, 5.0)),
            Point::new(-1900.0, 10.0)
        );

        let rect = map.to_screen(&Rect::new(-1900, 10, 40, 20));
        assert_eq!(rect.min, egui::pos2(10.0, 5.0));
        assert_eq!(rect.size(), egui::vec2(20.0, 10.0));
    }

    #[test]
    fn test_map_rejects_zero_scale() {
        let map = ScreenMap::new((0, 0), 0.0);
        assert_eq!(map.pixels_per_point(), 1.0);
    }

    #[test]
    fn test_cursor_per_handle() {
        assert_eq!(cursor_for(None), CursorIcon::Default);
        assert_eq!(cursor_for(Some(DragTarget::Move)), CursorIcon::Move);
        assert_eq!(
            cursor_for(Some(DragTarget::Handle(HandleRole::SouthWest))),
            CursorIcon::ResizeNeSw
        );
        assert_eq!(
            cursor_for(Some(DragTarget::Handle(HandleRole::East))),
            CursorIcon::ResizeHorizontal
        );
    }
}
