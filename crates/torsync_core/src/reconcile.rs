use std::collections::HashMap;

use crate::Course;

/// Three-way partition of a course set comparison. No id appears in
/// more than one partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseSetDiff {
    /// Courses whose id is new to the stored set.
    pub added: Vec<Course>,
    /// Courses whose id is known but whose data changed.
    pub modified: Vec<Course>,
    /// Stored courses whose id no longer appears on the page.
    pub removed: Vec<Course>,
}

impl CourseSetDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Compares the stored course set against the freshly scraped one.
/// Identity is by id, modification by structural equality. Order of the
/// inputs is irrelevant; the output keeps the order of `current` (for
/// added/modified) and `existing` (for removed).
///
/// Duplicate ids inside `current` should be impossible with
/// digest-derived ids; if they occur anyway the last occurrence wins,
/// which keeps the comparison well defined instead of crashing.
pub fn compare(existing: &[Course], current: &[Course]) -> CourseSetDiff {
    let existing_by_id: HashMap<&str, &Course> =
        existing.iter().map(|course| (course.id.as_str(), course)).collect();

    let mut current_order: Vec<&str> = Vec::new();
    let mut current_by_id: HashMap<&str, &Course> = HashMap::new();
    for course in current {
        if current_by_id.insert(course.id.as_str(), course).is_none() {
            current_order.push(course.id.as_str());
        }
    }

    let mut diff = CourseSetDiff::default();

    for id in &current_order {
        let course = current_by_id[id];
        match existing_by_id.get(id) {
            None => diff.added.push(course.clone()),
            Some(&prior) if prior != course => diff.modified.push(course.clone()),
            _ => {}
        }
    }

    for course in existing {
        if !current_by_id.contains_key(course.id.as_str()) {
            diff.removed.push(course.clone());
        }
    }

    diff
}
