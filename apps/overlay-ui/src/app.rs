use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, Key, ViewportCommand};
use snapframe_capture_engine::{
    ChannelTrigger, ControllerEvent, ControllerState, Notice, SnapController, TriggerSource,
};
use snapframe_selection_model::{OptionsPanel, DELAY_CHOICES};

use crate::paint::{cursor_for, paint_selection, ScreenMap};

const NOTICE_DURATION: Duration = Duration::from_secs(4);
const IDLE_POLL: Duration = Duration::from_millis(100);
const WARNING: Color32 = Color32::from_rgb(230, 170, 60);
const ERROR: Color32 = Color32::from_rgb(240, 90, 90);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelAction {
    Confirm,
    Cancel,
}

pub struct OverlayApp {
    controller: SnapController,
    trigger: ChannelTrigger,
    origin: (i32, i32),
    dim_alpha: u8,
    resident: bool,
    folder_text: String,
    passthrough: Option<bool>,
    notices: Vec<Notice>,
    notices_until: Option<Instant>,
    notice_anchor: egui::Pos2,
}

impl OverlayApp {
    pub fn new(
        controller: SnapController,
        trigger: ChannelTrigger,
        origin: (i32, i32),
        dim_alpha: u8,
        resident: bool,
    ) -> Self {
        Self {
            controller,
            trigger,
            origin,
            dim_alpha,
            resident,
            folder_text: String::new(),
            passthrough: None,
            notices: Vec::new(),
            notices_until: None,
            notice_anchor: egui::pos2(40.0, 40.0),
        }
    }

    fn handle_trigger(&mut self, ctx: &egui::Context, now: Instant) {
        match self.controller.on_trigger(now) {
            ControllerEvent::SessionOpened => {
                self.notices.clear();
                self.notices_until = None;
                self.folder_text = self
                    .controller
                    .selection()
                    .map(|active| active.panel.options().folder_path.display().to_string())
                    .unwrap_or_default();
                ctx.send_viewport_cmd(ViewportCommand::Focus);
            }
            ControllerEvent::Aborted => self.finish_session(ctx, Vec::new(), now),
            _ => {}
        }
    }

    fn finish_session(&mut self, ctx: &egui::Context, notices: Vec<Notice>, now: Instant) {
        if notices.is_empty() {
            self.notices_until = None;
            if !self.resident {
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
        } else {
            self.notices_until = Some(now + NOTICE_DURATION);
        }
        self.notices = notices;
    }

    fn set_passthrough(&mut self, ctx: &egui::Context, enabled: bool) {
        if self.passthrough != Some(enabled) {
            ctx.send_viewport_cmd(ViewportCommand::MousePassthrough(enabled));
            self.passthrough = Some(enabled);
        }
    }

    fn show_selection(&mut self, ctx: &egui::Context, map: ScreenMap, now: Instant) {
        let typing = ctx.wants_keyboard_input();
        let over_panel = ctx.is_pointer_over_area();
        let (enter, escape, nudge) = ctx.input(|i| {
            let step = if i.modifiers.shift { 10 } else { 1 };
            let mut nudge = (0, 0);
            if i.key_pressed(Key::ArrowLeft) {
                nudge.0 -= step;
            }
            if i.key_pressed(Key::ArrowRight) {
                nudge.0 += step;
            }
            if i.key_pressed(Key::ArrowUp) {
                nudge.1 -= step;
            }
            if i.key_pressed(Key::ArrowDown) {
                nudge.1 += step;
            }
            (i.key_pressed(Key::Enter), i.key_pressed(Key::Escape), nudge)
        });
        let (pressed, released, pointer) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
            )
        });

        let Some(active) = self.controller.selection_mut() else {
            return;
        };

        let overlay = &mut active.overlay;
        let (px, py) = active.panel.placement(&overlay.rect(), &overlay.bounds());
        let shown = egui::Window::new("SnapFrame")
            .id(egui::Id::new("snapframe_options"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .fixed_pos(map.to_screen_pos(px, py))
            .show(ctx, |ui| options_ui(ui, &mut active.panel, &mut self.folder_text));

        let mut action = None;
        if let Some(inner) = shown {
            let size = inner.response.rect.size() * map.pixels_per_point();
            active.panel.set_size(size.x.round() as u32, size.y.round() as u32);
            action = inner.inner.flatten();
        }

        if let Some(pos) = pointer {
            let point = map.to_desktop(pos);
            if pressed && !over_panel {
                overlay.pointer_down(point);
            } else if overlay.is_dragging() {
                overlay.pointer_move(point);
            }
            if !over_panel || overlay.is_dragging() {
                ctx.set_cursor_icon(cursor_for(overlay.hover_target(point)));
            }
        }
        if released {
            overlay.pointer_up();
        }

        if !typing && nudge != (0, 0) {
            overlay.nudge(nudge.0, nudge.1);
        }

        if action.is_none() {
            if escape {
                action = Some(PanelAction::Cancel);
            } else if enter && !typing {
                action = Some(PanelAction::Confirm);
            }
        }

        match action {
            Some(PanelAction::Confirm) => {
                self.notice_anchor = map.to_screen(&overlay.rect()).left_top();
                let event = self.controller.confirm(now);
                tracing::debug!(?event, "Selection confirmed");
                ctx.request_repaint();
            }
            Some(PanelAction::Cancel) => {
                self.controller.cancel();
                self.finish_session(ctx, Vec::new(), now);
            }
            None => paint_selection(ctx, overlay, map, self.dim_alpha),
        }
    }

    fn show_notices(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(until) = self.notices_until else {
            return;
        };
        if now >= until {
            self.notices.clear();
            self.notices_until = None;
            if !self.resident {
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
            return;
        }

        egui::Area::new(egui::Id::new("snapframe_notices"))
            .fixed_pos(self.notice_anchor)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    for notice in &self.notices {
                        let color = if notice.is_error() { ERROR } else { WARNING };
                        ui.colored_label(color, notice.to_string());
                    }
                });
            });
        ctx.request_repaint_after(until - now);
    }
}

fn options_ui(
    ui: &mut egui::Ui,
    panel: &mut OptionsPanel,
    folder_text: &mut String,
) -> Option<PanelAction> {
    let mut action = None;
    let mut folder_changed = false;

    ui.spacing_mut().item_spacing.y = 6.0;
    let options = panel.options_mut();
    ui.checkbox(&mut options.include_pointer, "Include mouse pointer");
    ui.checkbox(&mut options.save_to_clipboard, "Copy to clipboard");
    ui.horizontal(|ui| {
        ui.checkbox(&mut options.save_to_folder, "Save to folder");
        let edit = egui::TextEdit::singleline(folder_text).desired_width(260.0);
        folder_changed = ui.add_enabled(options.save_to_folder, edit).changed();
    });
    ui.horizontal(|ui| {
        ui.label("Delay");
        for seconds in DELAY_CHOICES {
            let label = if seconds == 0 {
                "None".to_string()
            } else {
                format!("{seconds} seconds")
            };
            ui.radio_value(&mut options.delay_seconds, seconds, label);
        }
    });
    if !options.has_output() {
        ui.colored_label(WARNING, "No output selected: the screenshot will be discarded");
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Capture").clicked() {
            action = Some(PanelAction::Confirm);
        }
        if ui.button("Cancel").clicked() {
            action = Some(PanelAction::Cancel);
        }
    });

    if folder_changed {
        panel.set_folder_path(folder_text);
    }
    action
}

impl eframe::App for OverlayApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let map = ScreenMap::new(self.origin, ctx.pixels_per_point());

        // Before triggers: a new session opens on the monitor under the pointer.
        if let Some(pos) = ctx.input(|i| i.pointer.latest_pos()) {
            self.controller.set_pointer(map.to_desktop(pos));
        }
        for _ in 0..self.trigger.poll_activate() {
            self.handle_trigger(ctx, now);
        }
        if ctx.input(|i| i.key_pressed(Key::F12)) {
            self.handle_trigger(ctx, now);
        }

        match self.controller.state() {
            ControllerState::Selecting => self.show_selection(ctx, map, now),
            ControllerState::Capturing => match self.controller.poll(now) {
                Some(ControllerEvent::Finished(report)) => {
                    tracing::info!(
                        clipboard = report.copied_to_clipboard,
                        file = ?report.saved_file,
                        notices = report.notices.len(),
                        "Capture finished"
                    );
                    self.finish_session(ctx, report.notices, now);
                }
                _ => {
                    if let Some(remaining) = self.controller.capture_remaining(now) {
                        ctx.request_repaint_after(remaining);
                    }
                }
            },
            ControllerState::Armed => {}
        }

        let selecting = self.controller.state() == ControllerState::Selecting;
        self.set_passthrough(ctx, !selecting);
        self.show_notices(ctx, now);

        if self.resident && !selecting {
            ctx.request_repaint_after(IDLE_POLL);
        }
    }
}
