//! Torsync engine: IO pipeline around the course synchronization core.
mod clock;
mod fetch;
mod parse;
mod prefs;
mod store;
mod sync;

pub use clock::{Clock, SystemClock};
pub use fetch::{
    CredentialError, CredentialStore, Credentials, FetchError, FetchSettings, PortalFetcher,
    StaticCredentialStore, TranscriptFetcher,
};
pub use parse::{clean_text, course_id, ParseError, TableTranscriptParser, TranscriptParser};
pub use prefs::{JsonFilePreferences, Preferences};
pub use store::{ensure_data_dir, CourseStore, JsonFileCourseStore, StoreError, UnitOfWork};
pub use sync::{CourseUpdater, SyncError, SyncOutcome};
