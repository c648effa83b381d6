use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use torsync_core::{Course, CourseStatus};
use torsync_engine::{ensure_data_dir, CourseStore, JsonFileCourseStore};

fn course(id: &str, grade: f64) -> Course {
    Course {
        id: id.to_string(),
        title: format!("Course {id}"),
        module: "Module".to_string(),
        status: CourseStatus::Passed,
        grade,
        is_passed: false,
        rating: 0.0,
        credits: 5,
        date_of_examination: NaiveDate::from_ymd_opt(2020, 5, 12).unwrap(),
        attempts: 1,
        date_of_last_update: Utc.with_ymd_and_hms(2020, 6, 1, 8, 0, 0).unwrap(),
    }
}

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("data");
    assert!(!new_dir.exists());
    ensure_data_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn all_is_empty_before_first_commit() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileCourseStore::new(temp.path().join("courses.json"));
    assert_eq!(store.all().unwrap(), vec![]);
}

#[test]
fn commit_applies_staged_adds_updates_and_removes() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("courses.json");
    let store = JsonFileCourseStore::new(path.clone());

    let mut unit = store.open_unit_of_work();
    unit.add(&[course("a", 1.3), course("b", 2.0)]);
    unit.commit().unwrap();
    assert_eq!(store.all().unwrap(), vec![course("a", 1.3), course("b", 2.0)]);

    let mut unit = store.open_unit_of_work();
    unit.update(&[course("a", 1.0)]);
    unit.remove(&[course("b", 2.0)]);
    unit.add(&[course("c", 3.0)]);
    unit.commit().unwrap();

    let expected = vec![course("a", 1.0), course("c", 3.0)];
    assert_eq!(store.all().unwrap(), expected);

    // A second handle on the same file sees the committed state.
    let reopened = JsonFileCourseStore::new(path);
    assert_eq!(reopened.all().unwrap(), expected);
}

#[test]
fn update_for_an_unknown_id_changes_nothing() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileCourseStore::new(temp.path().join("courses.json"));

    let mut unit = store.open_unit_of_work();
    unit.add(&[course("a", 1.3)]);
    unit.commit().unwrap();

    let mut unit = store.open_unit_of_work();
    unit.update(&[course("ghost", 5.0)]);
    unit.commit().unwrap();

    assert_eq!(store.all().unwrap(), vec![course("a", 1.3)]);
}

#[test]
fn uncommitted_staging_has_no_effect() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileCourseStore::new(temp.path().join("courses.json"));

    {
        let mut unit = store.open_unit_of_work();
        unit.add(&[course("a", 1.3)]);
        // Dropped without commit.
    }

    assert_eq!(store.all().unwrap(), vec![]);
}

#[test]
fn failed_commit_leaves_no_partial_state() {
    let temp = TempDir::new().unwrap();
    // The parent of the store path is a regular file, so the atomic
    // replace cannot even stage its temp file.
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();
    let store = JsonFileCourseStore::new(blocker.join("courses.json"));

    let before = store.all().unwrap();
    let mut unit = store.open_unit_of_work();
    unit.add(&[course("a", 1.3)]);
    assert!(unit.commit().is_err());
    assert_eq!(store.all().unwrap(), before);
}

#[test]
fn corrupted_store_file_is_an_error_not_a_panic() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("courses.json");
    fs::write(&path, "{ not json").unwrap();

    let store = JsonFileCourseStore::new(path);
    assert!(store.all().is_err());
}
