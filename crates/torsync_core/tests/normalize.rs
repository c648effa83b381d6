use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use torsync_core::{Course, CourseStatus, RawCourse};

fn raw_course() -> RawCourse {
    RawCourse {
        id: "4be1f1f9c2a7d3e0".to_string(),
        title: "Software Engineering Principles".to_string(),
        module: "Software Engineering".to_string(),
        status: "P".to_string(),
        grade: "1,3".to_string(),
        rating: "93.3 / 100".to_string(),
        credits: "5 / 5".to_string(),
        date_of_examination: "12.05.2020".to_string(),
        attempts: "1".to_string(),
    }
}

#[test]
fn raw_fields_are_coerced_to_typed_values() {
    let fetched_at = Utc.with_ymd_and_hms(2020, 6, 1, 8, 0, 0).unwrap();
    let course = Course::from_raw(&raw_course(), fetched_at);

    assert_eq!(
        course,
        Course {
            id: "4be1f1f9c2a7d3e0".to_string(),
            title: "Software Engineering Principles".to_string(),
            module: "Software Engineering".to_string(),
            status: CourseStatus::Passed,
            grade: 1.3,
            is_passed: false,
            rating: 93.3,
            credits: 5,
            date_of_examination: NaiveDate::from_ymd_opt(2020, 5, 12).unwrap(),
            attempts: 1,
            date_of_last_update: fetched_at,
        }
    );
}

#[test]
fn passed_marker_in_grade_column_sets_flag() {
    let mut raw = raw_course();
    raw.grade = "passed".to_string();
    let course = Course::from_raw(&raw, Utc::now());

    assert!(course.is_passed);
    assert_eq!(course.grade, 0.0);
}

#[test]
fn malformed_fields_fall_back_to_defaults() {
    let raw = RawCourse {
        id: "abc".to_string(),
        title: "Mystery Course".to_string(),
        ..RawCourse::default()
    };
    let fetched_at = Utc.with_ymd_and_hms(2020, 6, 1, 8, 0, 0).unwrap();
    let course = Course::from_raw(&raw, fetched_at);

    assert_eq!(course.status, CourseStatus::Unknown);
    assert_eq!(course.grade, 0.0);
    assert!(!course.is_passed);
    assert_eq!(course.rating, 0.0);
    assert_eq!(course.credits, 0);
    assert_eq!(course.date_of_examination, NaiveDate::MIN);
    assert_eq!(course.attempts, 0);
}

#[test]
fn last_update_is_taken_from_caller() {
    let first_seen = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
    let course = Course::from_raw(&raw_course(), first_seen);
    assert_eq!(course.date_of_last_update, first_seen);
}
