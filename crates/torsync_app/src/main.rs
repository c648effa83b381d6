mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use sync_logging::LogDestination;
use torsync_engine::{
    ensure_data_dir, CourseUpdater, Credentials, FetchSettings, JsonFileCourseStore,
    JsonFilePreferences, PortalFetcher, Preferences, StaticCredentialStore, SyncOutcome,
    SystemClock, TableTranscriptParser,
};

use crate::config::AppConfig;

const NOTIFICATION_TEXT: &str = "Your transcript of records got updated!";

#[derive(Debug, Parser)]
#[command(
    name = "torsync",
    about = "Watches a university transcript of records for new results."
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "torsync.toml")]
    config: PathBuf,
    /// Keep running and re-check the transcript periodically.
    #[arg(long)]
    watch: bool,
    /// Log to the terminal in addition to the log file.
    #[arg(long)]
    verbose: bool,
    /// Forget the stored last-checked marker before syncing.
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    let log_path = config.data_dir.join("torsync.log");
    ensure_data_dir(&config.data_dir)?;
    if cli.verbose {
        sync_logging::initialize(LogDestination::Both(&log_path));
    } else {
        sync_logging::initialize(LogDestination::File(&log_path));
    }

    let updater = build_updater(&config);
    let preferences = JsonFilePreferences::new(config.data_dir.join("preferences.json"));

    if cli.reset {
        preferences.clear()?;
    }

    if cli.watch {
        let interval = Duration::from_secs(config.fetch_interval_minutes() * 60);
        log::info!(
            "watching transcript every {} minutes",
            config.fetch_interval_minutes()
        );
        loop {
            run_once(&updater).await;
            tokio::time::sleep(interval).await;
        }
    }

    match updater.try_sync().await {
        Ok(SyncOutcome::Updated) => {
            println!("{NOTIFICATION_TEXT}");
            Ok(())
        }
        Ok(SyncOutcome::UpToDate) => {
            println!("No new results.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// One watch-loop tick. Failures are reported and swallowed so a flaky
/// network does not kill the loop.
async fn run_once(updater: &CourseUpdater) {
    match updater.try_sync().await {
        Ok(SyncOutcome::Updated) => println!("{NOTIFICATION_TEXT}"),
        Ok(SyncOutcome::UpToDate) => log::info!("transcript unchanged"),
        Err(err) => log::warn!("sync failed: {err}"),
    }
}

fn build_updater(config: &AppConfig) -> CourseUpdater {
    let credential_store = Arc::new(StaticCredentialStore::new(Credentials {
        user_name: config.user_name.clone(),
        password: config.password.clone(),
    }));
    let fetcher = Arc::new(PortalFetcher::new(
        config.login_url.clone(),
        credential_store,
        FetchSettings::default(),
    ));
    let store = Arc::new(JsonFileCourseStore::new(
        config.data_dir.join("courses.json"),
    ));
    let preferences = Arc::new(JsonFilePreferences::new(
        config.data_dir.join("preferences.json"),
    ));

    CourseUpdater::new(
        fetcher,
        Arc::new(TableTranscriptParser),
        store,
        preferences,
        Arc::new(SystemClock),
        config.transcript_url.clone(),
    )
}
