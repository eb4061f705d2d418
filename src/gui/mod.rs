mod clock_window;
mod schedule_window;

pub use schedule_window::ScheduleAction;

use crate::burn_in;
use crate::course_list::CourseList;
use crate::fonts;
use crate::geometry::{OverlayLayout, CLOCK_SIZE, FALLBACK_SCREEN};
use crate::restart::restart_process;
use crate::scheduler::{Scheduler, Task};
use crate::settings::ScheduleSettings;
use crate::settings_editor::{EditorAction, SettingsEditor};
use crate::visibility::{apply_display_mode, DisplayStyle, VisibilityCoordinator};
use chrono::{Datelike, Local, Timelike};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const TOAST_SECONDS: f64 = 4.0;

pub fn schedule_viewport_id() -> egui::ViewportId {
    egui::ViewportId::from_hash_of("class_schedule_list")
}

/// Root viewport options: the clock window.
pub fn native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Class Schedule")
            .with_inner_size(CLOCK_SIZE)
            .with_decorations(false)
            .with_transparent(true)
            .with_taskbar(false)
            .with_always_on_top(),
        ..Default::default()
    }
}

/// Run the overlay until the user closes it. Settings are written back on exit.
pub fn run(settings: ScheduleSettings, settings_path: PathBuf) -> anyhow::Result<()> {
    eframe::run_native(
        "class_schedule",
        native_options(),
        Box::new(move |cc| Box::new(ScheduleApp::new(cc, settings, settings_path))),
    )
    .map_err(|e| anyhow::anyhow!("run overlay: {e}"))
}

pub struct ScheduleApp {
    settings: ScheduleSettings,
    settings_path: PathBuf,
    coordinator: VisibilityCoordinator,
    style: DisplayStyle,
    courses: CourseList,
    scheduler: Scheduler,
    rng: StdRng,
    layout: Option<OverlayLayout>,
    editor: Option<SettingsEditor>,
    toasts: Toasts,
    setup_error: Option<String>,
}

impl ScheduleApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: ScheduleSettings,
        settings_path: PathBuf,
    ) -> Self {
        let ctx = &cc.egui_ctx;
        let setup_error = match fonts::install_cjk_fonts(ctx) {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("UI setup failed: {e:#}");
                Some(format!("UI设置失败: {e:#}"))
            }
        };

        let now = Local::now();
        let coordinator =
            VisibilityCoordinator::from_policy(now.time(), &settings.topmost_time_ranges);
        let style = apply_display_mode(
            coordinator.mode(),
            settings.transparency,
            ctx,
            schedule_viewport_id(),
        );
        let mut courses = CourseList::default();
        courses.rebuild(now.weekday(), &settings);

        tracing::info!(mode = ?coordinator.mode(), "overlay initialised");
        Self {
            settings,
            settings_path,
            coordinator,
            style,
            courses,
            scheduler: Scheduler::new(Instant::now()),
            rng: StdRng::from_entropy(),
            layout: None,
            editor: None,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0]),
            setup_error,
        }
    }

    fn push_toast(&mut self, kind: ToastKind, text: String) {
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(TOAST_SECONDS),
        });
    }

    fn save_settings(&self) -> anyhow::Result<()> {
        self.settings.save(&self.settings_path)
    }

    /// Re-anchor both windows when the monitor size becomes known or changes.
    fn ensure_layout(&mut self, ctx: &egui::Context) -> OverlayLayout {
        let screen = ctx
            .input(|i| i.viewport().monitor_size)
            .unwrap_or(FALLBACK_SCREEN);
        match self.layout {
            Some(layout) if layout.screen == screen => layout,
            _ => {
                let layout = OverlayLayout::anchored(screen);
                tracing::info!(width = screen.x, height = screen.y, "anchoring overlay");
                ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(layout.clock_pos));
                self.layout = Some(layout);
                layout
            }
        }
    }

    fn run_due_tasks(&mut self, ctx: &egui::Context, layout: OverlayLayout) {
        let now = Local::now();
        for task in self.scheduler.due(Instant::now()) {
            match task {
                Task::WeekdayCheck => {
                    self.courses.refresh(now.weekday(), &self.settings);
                }
                Task::TopmostCheck => {
                    if let Some(style) = self.coordinator.tick(
                        now.time(),
                        &self.settings.topmost_time_ranges,
                        self.settings.transparency,
                        ctx,
                        schedule_viewport_id(),
                    ) {
                        self.style = style;
                    }
                }
                Task::PixelShift => {
                    let shifted = burn_in::pixel_shift(
                        &mut self.rng,
                        layout.screen,
                        self.style.schedule_visible,
                        ctx,
                        schedule_viewport_id(),
                    );
                    let schedule_pos = if self.style.schedule_visible {
                        shifted.schedule_pos
                    } else {
                        layout.schedule_pos
                    };
                    self.layout = Some(OverlayLayout {
                        schedule_pos,
                        ..shifted
                    });
                }
            }
        }
    }

    fn apply_edited_settings(&mut self, ctx: &egui::Context, settings: ScheduleSettings) {
        self.settings = settings;
        if let Err(e) = self.save_settings() {
            tracing::error!("failed to save settings: {e:#}");
            self.push_toast(ToastKind::Error, format!("保存设置失败: {e}"));
        } else {
            self.push_toast(ToastKind::Success, "设置已保存".into());
        }
        self.style = DisplayStyle::for_mode(self.coordinator.mode(), self.settings.transparency);
        let now = Local::now();
        if let Some(style) = self.coordinator.tick(
            now.time(),
            &self.settings.topmost_time_ranges,
            self.settings.transparency,
            ctx,
            schedule_viewport_id(),
        ) {
            self.style = style;
        }
        self.courses.rebuild(now.weekday(), &self.settings);
    }

    fn handle_schedule_action(&mut self, ctx: &egui::Context, action: ScheduleAction) {
        match action {
            ScheduleAction::None => {}
            ScheduleAction::OpenSettings => {
                if self.editor.is_none() {
                    self.editor = Some(SettingsEditor::new(&self.settings));
                }
            }
            ScheduleAction::Restart => match restart_process() {
                Ok(()) => ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close),
                Err(e) => {
                    tracing::error!("restart failed: {e:#}");
                    self.push_toast(ToastKind::Error, format!("重启失败: {e}"));
                }
            },
            ScheduleAction::Close => {
                tracing::info!("close requested");
                ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
            }
        }
    }

    /// Contents of the schedule viewport: course list, settings editor and toasts.
    fn schedule_frame(&mut self, ctx: &egui::Context) -> ScheduleAction {
        let action = schedule_window::show(
            ctx,
            &self.courses,
            self.settings.course_font_size,
            &self.style,
        );
        if let Some(editor) = &mut self.editor {
            match editor.ui(ctx, &self.settings) {
                EditorAction::None => {}
                EditorAction::Cancel => self.editor = None,
                EditorAction::Save(settings) => {
                    self.editor = None;
                    self.apply_edited_settings(ctx, settings);
                }
            }
        }
        self.toasts.show(ctx);
        action
    }

    fn show_setup_error(&self, ctx: &egui::Context, message: &str) {
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(480.0, 200.0)));
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("错误");
            ui.colored_label(egui::Color32::RED, message);
            if ui.button("关闭").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }
}

impl eframe::App for ScheduleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(message) = self.setup_error.clone() {
            self.show_setup_error(ctx, &message);
            return;
        }

        let layout = self.ensure_layout(ctx);
        self.run_due_tasks(ctx, layout);
        let layout = self.layout.unwrap_or(layout);

        let now = Local::now();
        clock_window::show(ctx, now, &self.settings, &self.style);

        let builder = egui::ViewportBuilder::default()
            .with_title("课程表")
            .with_decorations(false)
            .with_transparent(true)
            .with_taskbar(false)
            .with_position(layout.schedule_pos)
            .with_inner_size(layout.schedule_size)
            .with_window_level(self.style.schedule_level)
            .with_visible(self.style.schedule_visible);
        let action = ctx.show_viewport_immediate(schedule_viewport_id(), builder, |ctx, _class| {
            self.schedule_frame(ctx)
        });
        self.handle_schedule_action(ctx, action);

        // Wake up for the next clock second or scheduled task, whichever is first.
        let until_next_second =
            Duration::from_millis(1000u64.saturating_sub(now.nanosecond() as u64 / 1_000_000));
        let wait = self
            .scheduler
            .time_until_next(Instant::now())
            .min(until_next_second)
            .max(Duration::from_millis(10));
        ctx.request_repaint_after(wait);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        match self.save_settings() {
            Ok(()) => tracing::info!(path = %self.settings_path.display(), "settings saved"),
            Err(e) => tracing::error!("failed to save settings on exit: {e:#}"),
        }
    }
}
