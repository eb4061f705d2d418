use crate::course_list::CourseList;
use crate::visibility::DisplayStyle;
use eframe::egui::{self, Color32, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    None,
    OpenSettings,
    Restart,
    Close,
}

const COURSE_ROW_HEIGHT: f32 = 40.0;

/// Draw the control buttons and the course list into the schedule viewport.
pub fn show(
    ctx: &egui::Context,
    courses: &CourseList,
    course_font_size: u32,
    style: &DisplayStyle,
) -> ScheduleAction {
    let mut action = ScheduleAction::None;
    egui::CentralPanel::default()
        .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(15.0, 10.0)))
        .show(ctx, |ui| {
            ui.set_opacity(style.schedule_opacity);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // right-to-left: last added is leftmost
                if ui.button(RichText::new("关闭").strong()).clicked() {
                    action = ScheduleAction::Close;
                }
                if ui.button(RichText::new("重启").strong()).clicked() {
                    action = ScheduleAction::Restart;
                }
                if ui.button(RichText::new("设置").strong()).clicked() {
                    action = ScheduleAction::OpenSettings;
                }
            });
            ui.add_space(8.0);

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.spacing_mut().item_spacing.y = 4.0;
                    for course in courses.entries() {
                        ui.allocate_ui_with_layout(
                            egui::vec2(ui.available_width(), COURSE_ROW_HEIGHT),
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                ui.label(
                                    RichText::new(course)
                                        .size(course_font_size as f32)
                                        .strong()
                                        .color(Color32::BLACK),
                                );
                            },
                        );
                    }
                });
        });

    if ctx.input(|i| i.viewport().close_requested()) {
        action = ScheduleAction::Close;
    }
    action
}
