use crate::settings::{weekday_key, ScheduleSettings};
use chrono::Weekday;

/// Shown when the settings lack a course list for the current weekday.
pub const FALLBACK_COURSES: [&str; 6] = ["语文", "数学", "英语", "物理", "化学", "生物"];

/// Course labels displayed by the schedule window for one weekday.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CourseList {
    weekday: Option<Weekday>,
    entries: Vec<String>,
}

impl CourseList {
    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Replace all entries with the course list for `weekday`. Empty labels
    /// are skipped.
    pub fn rebuild(&mut self, weekday: Weekday, settings: &ScheduleSettings) {
        self.entries.clear();
        match settings.courses_for(weekday) {
            Some(courses) => self
                .entries
                .extend(courses.iter().filter(|c| !c.is_empty()).cloned()),
            None => {
                tracing::warn!(day = weekday_key(weekday), "no course list, using fallback");
                self.entries
                    .extend(FALLBACK_COURSES.iter().map(|c| c.to_string()));
            }
        }
        self.weekday = Some(weekday);
        tracing::info!(
            day = weekday_key(weekday),
            courses = self.entries.len(),
            "course list rebuilt"
        );
    }

    /// Rebuild only when `weekday` differs from the last rebuilt one.
    /// Returns whether a rebuild happened.
    pub fn refresh(&mut self, weekday: Weekday, settings: &ScheduleSettings) -> bool {
        if self.weekday == Some(weekday) {
            return false;
        }
        self.rebuild(weekday, settings);
        true
    }
}
