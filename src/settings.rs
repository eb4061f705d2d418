use anyhow::{anyhow, Context, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "class_schedule_settings.json";

/// Environment variable overriding the full settings file path.
pub const SETTINGS_PATH_ENV: &str = "CLASS_SCHEDULE_SETTINGS";

/// English weekday names used as keys of [`ScheduleSettings::schedules`],
/// Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Chinese weekday labels, Monday first, as shown on the clock.
pub const WEEKDAY_LABELS: [&str; 7] = [
    "星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日",
];

/// Course list used for every weekday missing from the settings file.
pub const DEFAULT_COURSES: [&str; 15] = [
    "早读", "第一节", "第二节", "第三节", "第四节", "第五节", "限时一", "第六节", "第七节",
    "第八节", "限时二", "限时三", "第九节", "第十节", "第十一节",
];

const DEFAULT_TRANSPARENCY: f32 = 1.0;
const DEFAULT_DATE_FONT_SIZE: u32 = 16;
const DEFAULT_TIME_FONT_SIZE: u32 = 48;
const DEFAULT_COURSE_FONT_SIZE: u32 = 28;
const DEFAULT_RANGE_START: &str = "08:00";
const DEFAULT_RANGE_END: &str = "12:00";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Read a range entry. Missing or non-string bounds default to
    /// `08:00` and `12:00`; a non-object entry yields both defaults.
    fn from_value(value: &Value) -> Self {
        let bound = |key: &str, default: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(default)
                .to_owned()
        };
        Self {
            start: bound("start", DEFAULT_RANGE_START),
            end: bound("end", DEFAULT_RANGE_END),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSettings {
    /// Opacity of both windows in normal mode, `0.0` to `1.0`.
    pub transparency: f32,
    pub date_font_size: u32,
    pub time_font_size: u32,
    pub course_font_size: u32,
    /// Time-of-day windows during which only the dimmed clock is shown,
    /// pinned above other windows.
    pub topmost_time_ranges: Vec<TimeRange>,
    /// Course names keyed by English weekday name.
    pub schedules: BTreeMap<String, Vec<String>>,
    /// When enabled the logger runs at debug level and also writes a log file.
    pub debug_logging: bool,
}

// Fields are read one by one so a single mistyped value only resets that
// field. Only a non-object document is rejected.
impl<'de> Deserialize<'de> for ScheduleSettings {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(doc) => Ok(Self::from_document(&doc)),
            other => Err(de::Error::custom(format!(
                "settings document must be a JSON object, found {other}"
            ))),
        }
    }
}

/// Value of `key`, or `default` when it is absent, null or of the wrong type.
fn field<T>(
    doc: &Map<String, Value>,
    key: &str,
    default: T,
    extract: impl FnOnce(&Value) -> Option<T>,
) -> T {
    match doc.get(key) {
        None | Some(Value::Null) => default,
        Some(value) => extract(value).unwrap_or_else(|| {
            tracing::warn!(field = key, %value, "ignoring mistyped settings value");
            default
        }),
    }
}

/// Positive whole number; `28.0` is accepted as `28`.
fn font_size(value: &Value) -> Option<u32> {
    let size = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
            .map(|f| f as u64)
    })?;
    u32::try_from(size).ok().filter(|s| *s > 0)
}

fn course_lists(schedules: &Map<String, Value>) -> BTreeMap<String, Vec<String>> {
    schedules
        .iter()
        .map(|(day, value)| {
            let courses = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|course| match course.as_str() {
                        Some(name) => name.to_owned(),
                        None => {
                            tracing::warn!(day = %day, %course, "course entry is not a string");
                            String::new()
                        }
                    })
                    .collect(),
                other => {
                    tracing::warn!(day = %day, %other, "course list is not an array");
                    Vec::new()
                }
            };
            (day.clone(), courses)
        })
        .collect()
}

pub fn default_courses() -> Vec<String> {
    DEFAULT_COURSES.iter().map(|c| c.to_string()).collect()
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            transparency: DEFAULT_TRANSPARENCY,
            date_font_size: DEFAULT_DATE_FONT_SIZE,
            time_font_size: DEFAULT_TIME_FONT_SIZE,
            course_font_size: DEFAULT_COURSE_FONT_SIZE,
            topmost_time_ranges: vec![
                TimeRange::new("08:00", "12:00"),
                TimeRange::new("14:00", "18:00"),
            ],
            schedules: WEEKDAYS
                .iter()
                .map(|day| (day.to_string(), default_courses()))
                .collect(),
            debug_logging: false,
        }
    }
}

/// Where the settings returned by [`ScheduleSettings::load`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    File,
    /// Defaults were synthesized; `reason` says why the file was not used.
    Defaults { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: ScheduleSettings,
    pub source: SettingsSource,
    /// Error from persisting synthesized defaults, if that failed.
    pub persist_error: Option<String>,
}

impl ScheduleSettings {
    /// Build settings from a parsed document, defaulting each field that is
    /// absent or mistyped. Missing `topmost_time_ranges` means no ranges;
    /// weekdays missing from `schedules` get the default course list.
    pub fn from_document(doc: &Map<String, Value>) -> Self {
        let mut settings = Self {
            transparency: field(doc, "transparency", DEFAULT_TRANSPARENCY, |v| {
                v.as_f64().map(|t| t as f32)
            }),
            date_font_size: field(doc, "date_font_size", DEFAULT_DATE_FONT_SIZE, font_size),
            time_font_size: field(doc, "time_font_size", DEFAULT_TIME_FONT_SIZE, font_size),
            course_font_size: field(doc, "course_font_size", DEFAULT_COURSE_FONT_SIZE, font_size),
            topmost_time_ranges: field(doc, "topmost_time_ranges", Vec::new(), |v| {
                v.as_array()
                    .map(|ranges| ranges.iter().map(TimeRange::from_value).collect())
            }),
            schedules: field(doc, "schedules", BTreeMap::new(), |v| {
                v.as_object().map(course_lists)
            }),
            debug_logging: field(doc, "debug_logging", false, Value::as_bool),
        };
        settings.normalize();
        settings
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing, empty, not valid JSON or not an object. Defaults are written
    /// back to `path`.
    pub fn load(path: &Path) -> LoadedSettings {
        match Self::read(path) {
            Ok(settings) => LoadedSettings {
                settings,
                source: SettingsSource::File,
                persist_error: None,
            },
            Err(e) => {
                let settings = Self::default();
                let persist_error = settings.save(path).err().map(|e| format!("{e:#}"));
                LoadedSettings {
                    settings,
                    source: SettingsSource::Defaults {
                        reason: format!("{e:#}"),
                    },
                    persist_error,
                }
            }
        }
    }

    /// Read and normalize the settings file. Fails only when the file cannot
    /// be read, is empty, is not valid JSON or is not a JSON object.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        if content.trim().is_empty() {
            return Err(anyhow!("settings file {} is empty", path.display()));
        }
        serde_json::from_str(&content)
            .with_context(|| format!("deserialize settings file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("create settings parent folder {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("write settings file {}", path.display()))
    }

    /// Enforce the load-time invariants: all seven weekdays present, unknown
    /// weekday keys dropped, transparency within `[0, 1]` and non-zero font
    /// sizes.
    pub fn normalize(&mut self) {
        self.transparency = if self.transparency.is_finite() {
            self.transparency.clamp(0.0, 1.0)
        } else {
            DEFAULT_TRANSPARENCY
        };
        if self.date_font_size == 0 {
            self.date_font_size = DEFAULT_DATE_FONT_SIZE;
        }
        if self.time_font_size == 0 {
            self.time_font_size = DEFAULT_TIME_FONT_SIZE;
        }
        if self.course_font_size == 0 {
            self.course_font_size = DEFAULT_COURSE_FONT_SIZE;
        }

        let mut loaded = std::mem::take(&mut self.schedules);
        for day in WEEKDAYS {
            let courses = loaded.remove(day).unwrap_or_else(|| {
                tracing::debug!(day, "no course list for weekday, using defaults");
                default_courses()
            });
            self.schedules.insert(day.to_string(), courses);
        }
        if !loaded.is_empty() {
            tracing::warn!(keys = ?loaded.keys().collect::<Vec<_>>(), "ignoring unknown weekday keys");
        }
    }

    pub fn courses_for(&self, weekday: chrono::Weekday) -> Option<&[String]> {
        self.schedules
            .get(weekday_key(weekday))
            .map(|c| c.as_slice())
    }
}

pub fn weekday_key(weekday: chrono::Weekday) -> &'static str {
    WEEKDAYS[weekday.num_days_from_monday() as usize]
}

pub fn weekday_label(weekday: chrono::Weekday) -> &'static str {
    WEEKDAY_LABELS[weekday.num_days_from_monday() as usize]
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

/// Resolve the settings path: `CLASS_SCHEDULE_SETTINGS` if set, otherwise
/// next to the running executable.
pub fn resolve_settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_path_is_resolved_next_to_executable() {
        let exe = Path::new("/tmp/overlay/bin/class_schedule");
        let path = settings_path_from_exe_path(exe).expect("path");
        assert_eq!(path, Path::new("/tmp/overlay/bin").join(SETTINGS_FILE_NAME));
    }

    #[test]
    fn weekday_keys_follow_monday_first_order() {
        assert_eq!(weekday_key(chrono::Weekday::Mon), "Monday");
        assert_eq!(weekday_key(chrono::Weekday::Sun), "Sunday");
    }

    #[test]
    fn normalize_clamps_transparency_and_fixes_zero_fonts() {
        let mut settings = ScheduleSettings {
            transparency: 1.7,
            date_font_size: 0,
            ..ScheduleSettings::default()
        };
        settings.normalize();
        assert_eq!(settings.transparency, 1.0);
        assert_eq!(settings.date_font_size, 16);

        settings.transparency = f32::NAN;
        settings.normalize();
        assert_eq!(settings.transparency, 1.0);

        settings.transparency = -0.2;
        settings.normalize();
        assert_eq!(settings.transparency, 0.0);
    }

    #[test]
    fn normalize_drops_unknown_weekday_keys() {
        let mut settings = ScheduleSettings::default();
        settings
            .schedules
            .insert("Funday".into(), vec!["nap".into()]);
        settings.normalize();
        assert_eq!(settings.schedules.len(), 7);
        assert!(!settings.schedules.contains_key("Funday"));
    }

    #[test]
    fn font_sizes_accept_whole_floats_only() {
        assert_eq!(font_size(&serde_json::json!(28)), Some(28));
        assert_eq!(font_size(&serde_json::json!(28.0)), Some(28));
        assert_eq!(font_size(&serde_json::json!(28.5)), None);
        assert_eq!(font_size(&serde_json::json!(-4)), None);
        assert_eq!(font_size(&serde_json::json!(0)), None);
        assert_eq!(font_size(&serde_json::json!("28")), None);
    }

    #[test]
    fn non_object_range_entries_take_default_bounds() {
        let range = TimeRange::from_value(&serde_json::json!("10:00-11:00"));
        assert_eq!(range, TimeRange::new("08:00", "12:00"));
        let range = TimeRange::from_value(&serde_json::json!({ "start": 900, "end": "10:00" }));
        assert_eq!(range, TimeRange::new("08:00", "10:00"));
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(serde_json::from_str::<ScheduleSettings>("[1, 2]").is_err());
        assert!(serde_json::from_str::<ScheduleSettings>("{}").is_ok());
    }

    #[test]
    fn empty_file_is_rejected_by_strict_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "  \n").expect("write");
        assert!(ScheduleSettings::read(&path).is_err());
    }
}
