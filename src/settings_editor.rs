use crate::settings::{ScheduleSettings, TimeRange, WEEKDAYS, WEEKDAY_LABELS};
use crate::topmost::parse_hhmm;
use anyhow::{bail, Result};
use eframe::egui;

/// Number of course rows offered per weekday; longer lists get more rows.
pub const MIN_COURSE_ROWS: usize = 15;

/// Outcome of one frame of the editor window.
#[derive(Debug)]
pub enum EditorAction {
    None,
    Save(ScheduleSettings),
    Cancel,
}

pub struct SettingsEditor {
    day: usize,
    schedules: Vec<Vec<String>>,
    transparency: f32,
    date_font_size: u32,
    time_font_size: u32,
    course_font_size: u32,
    ranges: Vec<(String, String)>,
    error: Option<String>,
}

impl SettingsEditor {
    pub fn new(settings: &ScheduleSettings) -> Self {
        let schedules = WEEKDAYS
            .iter()
            .map(|day| {
                let mut rows = settings.schedules.get(*day).cloned().unwrap_or_default();
                if rows.len() < MIN_COURSE_ROWS {
                    rows.resize(MIN_COURSE_ROWS, String::new());
                }
                rows
            })
            .collect();
        Self {
            day: 0,
            schedules,
            transparency: settings.transparency.clamp(0.1, 1.0),
            date_font_size: settings.date_font_size,
            time_font_size: settings.time_font_size,
            course_font_size: settings.course_font_size,
            ranges: settings
                .topmost_time_ranges
                .iter()
                .map(|r| (r.start.clone(), r.end.clone()))
                .collect(),
            error: None,
        }
    }

    /// Build the settings to persist. Fails if any time range is malformed.
    fn to_settings(&self, current: &ScheduleSettings) -> Result<ScheduleSettings> {
        let mut ranges = Vec::with_capacity(self.ranges.len());
        for (idx, (start, end)) in self.ranges.iter().enumerate() {
            if parse_hhmm(start).is_none() || parse_hhmm(end).is_none() {
                bail!("时间段 {} 格式错误: {start} - {end} (应为 HH:MM)", idx + 1);
            }
            ranges.push(TimeRange::new(start.trim(), end.trim()));
        }

        let mut settings = current.clone();
        settings.transparency = self.transparency;
        settings.date_font_size = self.date_font_size;
        settings.time_font_size = self.time_font_size;
        settings.course_font_size = self.course_font_size;
        settings.topmost_time_ranges = ranges;
        for (day, rows) in WEEKDAYS.iter().zip(&self.schedules) {
            let mut courses = rows.clone();
            while courses.last().is_some_and(|c| c.trim().is_empty()) {
                courses.pop();
            }
            settings.schedules.insert(day.to_string(), courses);
        }
        settings.normalize();
        Ok(settings)
    }

    pub fn ui(&mut self, ctx: &egui::Context, current: &ScheduleSettings) -> EditorAction {
        let mut open = true;
        let mut action = EditorAction::None;
        egui::Window::new("设置")
            .open(&mut open)
            .collapsible(false)
            .default_width(520.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for (idx, label) in WEEKDAY_LABELS.iter().enumerate() {
                            ui.selectable_value(&mut self.day, idx, *label);
                        }
                    });

                    ui.group(|ui| {
                        ui.label("课程表编辑");
                        if let Some(rows) = self.schedules.get_mut(self.day) {
                            for (idx, course) in rows.iter_mut().enumerate() {
                                ui.horizontal(|ui| {
                                    ui.label(format!("第{}节:", idx + 1));
                                    ui.text_edit_singleline(course);
                                });
                            }
                            if ui.button("添加一行").clicked() {
                                rows.push(String::new());
                            }
                        }
                    });

                    ui.group(|ui| {
                        ui.label("透明度设置");
                        ui.add(
                            egui::Slider::new(&mut self.transparency, 0.1..=1.0)
                                .step_by(0.1)
                                .text("透明度"),
                        );
                        ui.small("0.1: 最透明 | 1.0: 不透明");
                    });

                    ui.group(|ui| {
                        ui.label("字体大小");
                        for (label, size) in [
                            ("日期", &mut self.date_font_size),
                            ("时间", &mut self.time_font_size),
                            ("课程", &mut self.course_font_size),
                        ] {
                            ui.horizontal(|ui| {
                                ui.label(label);
                                ui.add(egui::DragValue::new(size).clamp_range(8..=200));
                            });
                        }
                    });

                    ui.group(|ui| {
                        ui.label("窗口置顶时间段");
                        let mut remove: Option<usize> = None;
                        for (idx, (start, end)) in self.ranges.iter_mut().enumerate() {
                            ui.horizontal(|ui| {
                                ui.add(egui::TextEdit::singleline(start).desired_width(60.0));
                                ui.label("到");
                                ui.add(egui::TextEdit::singleline(end).desired_width(60.0));
                                if ui.button("删除").clicked() {
                                    remove = Some(idx);
                                }
                            });
                        }
                        if let Some(i) = remove {
                            self.ranges.remove(i);
                        }
                        if ui.button("添加时间段").clicked() {
                            self.ranges.push(("08:00".into(), "18:00".into()));
                        }
                    });

                    if let Some(err) = &self.error {
                        ui.colored_label(egui::Color32::RED, err);
                    }

                    ui.horizontal(|ui| {
                        if ui.button("保存").clicked() {
                            match self.to_settings(current) {
                                Ok(settings) => action = EditorAction::Save(settings),
                                Err(e) => self.error = Some(e.to_string()),
                            }
                        }
                        if ui.button("取消").clicked() {
                            action = EditorAction::Cancel;
                        }
                    });
                });
            });
        if !open {
            action = EditorAction::Cancel;
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_and_trailing_blanks_trimmed_on_save() {
        let mut current = ScheduleSettings::default();
        current
            .schedules
            .insert("Monday".into(), vec!["Math".into(), "".into(), "Art".into()]);
        let editor = SettingsEditor::new(&current);
        assert_eq!(editor.schedules[0].len(), MIN_COURSE_ROWS);

        let saved = editor.to_settings(&current).expect("valid");
        assert_eq!(saved.schedules["Monday"], vec!["Math", "", "Art"]);
        assert_eq!(saved.schedules["Tuesday"].len(), 15);
    }

    #[test]
    fn malformed_range_blocks_save() {
        let current = ScheduleSettings::default();
        let mut editor = SettingsEditor::new(&current);
        editor.ranges.push(("25:00".into(), "06:00".into()));
        assert!(editor.to_settings(&current).is_err());

        editor.ranges.pop();
        editor.ranges.push((" 22:00".into(), "06:00 ".into()));
        let saved = editor.to_settings(&current).expect("valid");
        assert_eq!(
            saved.topmost_time_ranges.last(),
            Some(&TimeRange::new("22:00", "06:00"))
        );
    }

    #[test]
    fn edits_carry_into_saved_settings() {
        let current = ScheduleSettings::default();
        let mut editor = SettingsEditor::new(&current);
        editor.transparency = 0.5;
        editor.course_font_size = 32;
        editor.schedules[6][0] = "周日自习 ".into();
        let saved = editor.to_settings(&current).expect("valid");
        assert_eq!(saved.transparency, 0.5);
        assert_eq!(saved.course_font_size, 32);
        assert_eq!(saved.schedules["Sunday"][0], "周日自习 ");
        assert!(!saved.debug_logging);
    }
}
