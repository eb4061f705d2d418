use class_schedule::settings::{
    ScheduleSettings, SettingsSource, TimeRange, DEFAULT_COURSES, SETTINGS_FILE_NAME, WEEKDAYS,
};
use tempfile::tempdir;

#[test]
fn saved_settings_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);

    let mut settings = ScheduleSettings::default();
    settings.transparency = 0.7;
    settings.course_font_size = 30;
    settings.topmost_time_ranges = vec![TimeRange::new("22:00", "06:00")];
    settings
        .schedules
        .insert("Monday".into(), vec!["物理".into(), "化学".into()]);
    settings.save(&path).unwrap();

    let loaded = ScheduleSettings::load(&path);
    assert_eq!(loaded.source, SettingsSource::File);
    assert_eq!(loaded.settings, settings);
}

#[test]
fn missing_file_yields_defaults_and_is_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);

    let loaded = ScheduleSettings::load(&path);
    assert!(matches!(loaded.source, SettingsSource::Defaults { .. }));
    assert!(loaded.persist_error.is_none());
    assert_eq!(loaded.settings, ScheduleSettings::default());
    assert!(path.exists());

    let reread = ScheduleSettings::read(&path).unwrap();
    assert_eq!(reread, loaded.settings);
}

#[test]
fn malformed_file_is_replaced_by_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();

    let loaded = ScheduleSettings::load(&path);
    assert!(matches!(loaded.source, SettingsSource::Defaults { .. }));
    let content = std::fs::read_to_string(&path).unwrap();
    let on_disk: ScheduleSettings = serde_json::from_str(&content).unwrap();
    assert_eq!(on_disk, ScheduleSettings::default());
}

#[test]
fn absent_fields_take_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(
        &path,
        r#"{
            "transparency": 0.5,
            "topmost_time_ranges": [{ "end": "09:30" }, {}],
            "schedules": { "Monday": ["语文", "数学"] }
        }"#,
    )
    .unwrap();

    let loaded = ScheduleSettings::load(&path);
    assert_eq!(loaded.source, SettingsSource::File);
    let settings = loaded.settings;
    assert_eq!(settings.transparency, 0.5);
    assert_eq!(settings.date_font_size, 16);
    assert_eq!(settings.time_font_size, 48);
    assert_eq!(settings.course_font_size, 28);
    assert!(!settings.debug_logging);
    assert_eq!(
        settings.topmost_time_ranges,
        vec![
            TimeRange::new("08:00", "09:30"),
            TimeRange::new("08:00", "12:00")
        ]
    );
    assert_eq!(settings.schedules["Monday"], vec!["语文", "数学"]);
    for day in WEEKDAYS.iter().filter(|d| **d != "Monday") {
        assert_eq!(settings.schedules[*day], DEFAULT_COURSES);
    }
}

#[test]
fn missing_ranges_and_schedules_are_filled_in() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, r#"{ "transparency": 0.9 }"#).unwrap();

    let settings = ScheduleSettings::read(&path).unwrap();
    assert!(settings.topmost_time_ranges.is_empty());
    assert_eq!(settings.schedules.len(), 7);
    for day in WEEKDAYS {
        assert_eq!(settings.schedules[day], DEFAULT_COURSES);
    }
}

#[test]
fn mistyped_values_only_reset_their_own_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(
        &path,
        r#"{
            "transparency": 0.6,
            "date_font_size": -3,
            "time_font_size": "big",
            "course_font_size": 28.0,
            "debug_logging": "yes",
            "topmost_time_ranges": [{ "start": "22:00", "end": "06:00" }],
            "schedules": { "Monday": ["物理", "化学"], "Tuesday": ["体育", 7] }
        }"#,
    )
    .unwrap();

    let loaded = ScheduleSettings::load(&path);
    assert_eq!(loaded.source, SettingsSource::File);
    let settings = loaded.settings;
    assert_eq!(settings.transparency, 0.6);
    assert_eq!(settings.date_font_size, 16);
    assert_eq!(settings.time_font_size, 48);
    assert_eq!(settings.course_font_size, 28);
    assert!(!settings.debug_logging);
    assert_eq!(
        settings.topmost_time_ranges,
        vec![TimeRange::new("22:00", "06:00")]
    );
    assert_eq!(settings.schedules["Monday"], vec!["物理", "化学"]);
    assert_eq!(settings.schedules["Tuesday"], vec!["体育", ""]);

    // The user's file is left as written.
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("物理"));
}

#[test]
fn null_values_fall_back_per_field() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(
        &path,
        r#"{ "transparency": null, "topmost_time_ranges": 5, "schedules": { "Friday": ["化学"] } }"#,
    )
    .unwrap();

    let loaded = ScheduleSettings::load(&path);
    assert_eq!(loaded.source, SettingsSource::File);
    assert_eq!(loaded.settings.transparency, 1.0);
    assert!(loaded.settings.topmost_time_ranges.is_empty());
    assert_eq!(loaded.settings.schedules["Friday"], vec!["化学"]);
}

#[test]
fn non_object_document_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, "[\"Monday\"]").unwrap();

    let loaded = ScheduleSettings::load(&path);
    assert!(matches!(loaded.source, SettingsSource::Defaults { .. }));
    assert_eq!(loaded.settings, ScheduleSettings::default());
}

#[test]
fn saved_file_uses_documented_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    ScheduleSettings::default().save(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    for key in [
        "transparency",
        "date_font_size",
        "time_font_size",
        "course_font_size",
        "topmost_time_ranges",
        "schedules",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(value["topmost_time_ranges"][1]["start"], "14:00");
}
