use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use torsync_core::{compare, Course};

use crate::clock::Clock;
use crate::fetch::{FetchError, TranscriptFetcher};
use crate::parse::{ParseError, TranscriptParser};
use crate::prefs::Preferences;
use crate::store::{CourseStore, StoreError};

/// What a completed sync cycle means for the caller. `Updated` is the
/// signal to notify the user; removals alone do not qualify, results
/// that disappeared are nothing to celebrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fetched and compared, nothing notify-worthy changed.
    UpToDate,
    /// New or updated results were persisted.
    Updated,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("download failed: {0}")]
    Network(#[from] FetchError),
    #[error("could not read the transcript page: {0}")]
    Parse(#[from] ParseError),
    #[error("saving results failed: {0}")]
    Persistence(#[from] StoreError),
    /// Reserved for a strict coercion mode; the field coercers
    /// currently default instead of rejecting.
    #[error("invalid course data: {0}")]
    Validation(String),
}

/// End-to-end course synchronization: download, parse, reconcile
/// against the local store, persist the delta in one transaction.
pub struct CourseUpdater {
    fetcher: Arc<dyn TranscriptFetcher>,
    parser: Arc<dyn TranscriptParser>,
    store: Arc<dyn CourseStore>,
    preferences: Arc<dyn Preferences>,
    clock: Arc<dyn Clock>,
    transcript_url: String,
}

impl CourseUpdater {
    pub fn new(
        fetcher: Arc<dyn TranscriptFetcher>,
        parser: Arc<dyn TranscriptParser>,
        store: Arc<dyn CourseStore>,
        preferences: Arc<dyn Preferences>,
        clock: Arc<dyn Clock>,
        transcript_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            store,
            preferences,
            clock,
            transcript_url: transcript_url.into(),
        }
    }

    /// Runs one full sync cycle. Every stage returns a result; the
    /// first failure halts the pipeline with no later side effects.
    pub async fn try_sync(&self) -> Result<SyncOutcome, SyncError> {
        log::info!("sync: downloading {}", self.transcript_url);
        let html = self.fetcher.fetch_transcript(&self.transcript_url).await?;
        let fetched_at = self.clock.now();

        log::debug!("sync: parsing {} bytes", html.len());
        let raw_courses = self.parser.try_parse(&html)?;

        // Only a page that actually parsed may advance the last-checked
        // marker; a broken page must not look like a completed check.
        self.preferences.set_last_checked(fetched_at)?;

        let existing = self.store.all()?;
        let prior_updates: HashMap<&str, _> = existing
            .iter()
            .map(|course| (course.id.as_str(), course.date_of_last_update))
            .collect();

        let current: Vec<Course> = raw_courses
            .iter()
            .map(|raw| {
                let last_update = prior_updates
                    .get(raw.id.as_str())
                    .copied()
                    .unwrap_or(fetched_at);
                Course::from_raw(raw, last_update)
            })
            .collect();

        log::debug!(
            "sync: reconciling {} stored against {} scraped courses",
            existing.len(),
            current.len()
        );
        let mut diff = compare(&existing, &current);

        if diff.is_empty() {
            log::info!("sync: no changes");
            return Ok(SyncOutcome::UpToDate);
        }

        // A modified record's data just changed, so its bookkeeping
        // timestamp moves to this fetch. Added records already carry it
        // from normalization.
        for course in &mut diff.modified {
            course.date_of_last_update = fetched_at;
        }

        log::info!(
            "sync: persisting {} added, {} modified, {} removed",
            diff.added.len(),
            diff.modified.len(),
            diff.removed.len()
        );
        let mut unit_of_work = self.store.open_unit_of_work();
        unit_of_work.add(&diff.added);
        unit_of_work.update(&diff.modified);
        unit_of_work.remove(&diff.removed);
        unit_of_work.commit()?;

        if diff.added.is_empty() && diff.modified.is_empty() {
            Ok(SyncOutcome::UpToDate)
        } else {
            Ok(SyncOutcome::Updated)
        }
    }
}
