use crate::settings::{weekday_label, ScheduleSettings};
use crate::visibility::DisplayStyle;
use chrono::{DateTime, Datelike, Local};
use eframe::egui::{self, Color32, RichText};

/// Draw the clock into the root viewport. Dragging anywhere moves the window
/// while the style allows it.
pub fn show(
    ctx: &egui::Context,
    now: DateTime<Local>,
    settings: &ScheduleSettings,
    style: &DisplayStyle,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            ui.set_opacity(style.clock_opacity);

            let drag = ui.interact(
                ui.max_rect(),
                egui::Id::new("clock_drag"),
                egui::Sense::drag(),
            );
            if style.clock_movable && drag.drag_started_by(egui::PointerButton::Primary) {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }

            ui.spacing_mut().item_spacing.y = 0.0;
            ui.label(
                RichText::new(now.format("%H:%M:%S").to_string())
                    .size(settings.time_font_size as f32)
                    .strong()
                    .color(Color32::BLACK),
            );
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 20.0;
                let date_size = settings.date_font_size as f32;
                ui.label(
                    RichText::new(now.format("%Y年%m月%d日").to_string())
                        .size(date_size)
                        .strong()
                        .color(Color32::BLACK),
                );
                ui.label(
                    RichText::new(weekday_label(now.weekday()))
                        .size(date_size)
                        .strong()
                        .color(Color32::BLACK),
                );
            });
        });
}
