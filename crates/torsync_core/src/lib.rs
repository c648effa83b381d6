//! Torsync core: pure course domain, field coercion, and set reconciliation.
mod coerce;
mod course;
mod reconcile;

pub use coerce::{
    is_passed_text, parse_decimal, parse_integer, parse_integer_fraction, parse_local_date,
    parse_percent_fraction,
};
pub use course::{Course, CourseStatus, RawCourse};
pub use reconcile::{compare, CourseSetDiff};
