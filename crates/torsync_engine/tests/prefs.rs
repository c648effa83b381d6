use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use torsync_engine::{JsonFilePreferences, Preferences};

#[test]
fn last_checked_is_unset_initially() {
    let temp = TempDir::new().unwrap();
    let prefs = JsonFilePreferences::new(temp.path().join("preferences.json"));
    assert_eq!(prefs.last_checked().unwrap(), None);
}

#[test]
fn last_checked_roundtrips() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("preferences.json");
    let prefs = JsonFilePreferences::new(path.clone());

    let timestamp = Utc.with_ymd_and_hms(2020, 6, 1, 8, 30, 0).unwrap();
    prefs.set_last_checked(timestamp).unwrap();
    assert_eq!(prefs.last_checked().unwrap(), Some(timestamp));

    // A fresh handle reads the same value back from disk.
    let reopened = JsonFilePreferences::new(path);
    assert_eq!(reopened.last_checked().unwrap(), Some(timestamp));
}

#[test]
fn clear_resets_to_defaults() {
    let temp = TempDir::new().unwrap();
    let prefs = JsonFilePreferences::new(temp.path().join("preferences.json"));

    prefs
        .set_last_checked(Utc.with_ymd_and_hms(2020, 6, 1, 8, 30, 0).unwrap())
        .unwrap();
    prefs.clear().unwrap();
    assert_eq!(prefs.last_checked().unwrap(), None);
}
