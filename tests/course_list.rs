use chrono::Weekday;
use class_schedule::course_list::{CourseList, FALLBACK_COURSES};
use class_schedule::settings::{ScheduleSettings, DEFAULT_COURSES};

#[test]
fn rebuild_uses_configured_courses_and_skips_blanks() {
    let mut settings = ScheduleSettings::default();
    settings.schedules.insert(
        "Wednesday".into(),
        vec!["数学".into(), "".into(), "语文".into(), "".into()],
    );
    let mut list = CourseList::default();
    list.rebuild(Weekday::Wed, &settings);
    assert_eq!(list.entries(), ["数学", "语文"]);
    assert_eq!(list.weekday(), Some(Weekday::Wed));
}

#[test]
fn rebuild_replaces_previous_entries() {
    let settings = ScheduleSettings::default();
    let mut list = CourseList::default();
    list.rebuild(Weekday::Mon, &settings);
    list.rebuild(Weekday::Mon, &settings);
    assert_eq!(list.entries().len(), DEFAULT_COURSES.len());
}

#[test]
fn missing_weekday_falls_back() {
    let mut settings = ScheduleSettings::default();
    settings.schedules.remove("Friday");
    let mut list = CourseList::default();
    list.rebuild(Weekday::Fri, &settings);
    assert_eq!(list.entries(), FALLBACK_COURSES);
}

#[test]
fn refresh_only_rebuilds_on_day_change() {
    let mut settings = ScheduleSettings::default();
    settings
        .schedules
        .insert("Tuesday".into(), vec!["体育".into()]);
    let mut list = CourseList::default();
    assert!(list.refresh(Weekday::Mon, &settings));
    assert!(!list.refresh(Weekday::Mon, &settings));
    assert!(list.refresh(Weekday::Tue, &settings));
    assert_eq!(list.entries(), ["体育"]);
}
