use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce;

/// Raw, string-only row data as scraped from the transcript page.
/// Lives only for the duration of one sync cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCourse {
    pub id: String,
    pub title: String,
    pub module: String,
    pub status: String,
    pub grade: String,
    pub rating: String,
    pub credits: String,
    pub date_of_examination: String,
    pub attempts: String,
}

/// The student's standing for a course, mapped from the portal's short
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    Unknown,
    Passed,
    Failed,
    ExamEnrolment,
    CourseEnrolment,
    CombinationExam,
    MissingResult,
    ModuleExamination,
    Transferred,
}

impl CourseStatus {
    /// Maps a raw status code to its enum value. "P, T" is a distinct
    /// two-token code meaning transferred; it is not "P" plus anything.
    /// Empty or unrecognized codes map to [`CourseStatus::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "P" => CourseStatus::Passed,
            "P, T" => CourseStatus::Transferred,
            "F" => CourseStatus::Failed,
            "EE" => CourseStatus::ExamEnrolment,
            "E" => CourseStatus::CourseEnrolment,
            "CE" => CourseStatus::CombinationExam,
            "M" => CourseStatus::MissingResult,
            "ME" => CourseStatus::ModuleExamination,
            _ => CourseStatus::Unknown,
        }
    }
}

/// Typed course record as kept in the local store. Derived `PartialEq`
/// gives structural equality over every field; the reconciler uses it
/// to decide whether a course counts as modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Digest of the cleaned title text, stable across parses of the
    /// same document. The portal stopped exposing real course ids, so
    /// the title is all there is to key on. A title edit therefore
    /// shows up as a removal plus an addition, not as a modification.
    pub id: String,
    pub title: String,
    /// Name of the module the course belongs to; empty when the course
    /// row was not preceded by a module header.
    pub module: String,
    pub status: CourseStatus,
    /// Grade in the comma-decimal locale of the portal, 0 when absent.
    pub grade: f64,
    /// True when the grade column carries the word "passed" instead of
    /// a number. A separate signal from `status`.
    pub is_passed: bool,
    /// Rating in percent (0-100), 0 when absent.
    pub rating: f64,
    /// Credits earned, the left operand of the "earned / possible" cell.
    pub credits: u32,
    /// Date the exam took or will take place. [`NaiveDate::MIN`] when
    /// the cell did not parse.
    pub date_of_examination: NaiveDate,
    pub attempts: u32,
    /// When this record's data last differed from what was stored
    /// before. Local bookkeeping, not provided by the portal.
    pub date_of_last_update: DateTime<Utc>,
}

impl Course {
    /// Coerces a raw scraped record into a typed one. `last_update` is
    /// the prior record's `date_of_last_update` when one exists, else
    /// the timestamp of the current fetch. Classifying the record as
    /// added or modified is the reconciler's job, not this function's.
    pub fn from_raw(raw: &RawCourse, last_update: DateTime<Utc>) -> Self {
        Self {
            id: raw.id.clone(),
            title: raw.title.clone(),
            module: raw.module.clone(),
            status: CourseStatus::from_code(&raw.status),
            grade: coerce::parse_decimal(&raw.grade, ','),
            is_passed: coerce::is_passed_text(&raw.grade),
            rating: coerce::parse_percent_fraction(&raw.rating),
            credits: coerce::parse_integer_fraction(&raw.credits),
            date_of_examination: coerce::parse_local_date(&raw.date_of_examination),
            attempts: coerce::parse_integer(&raw.attempts),
            date_of_last_update: last_update,
        }
    }
}
