use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Android and iOS both refuse background polling below this, so the
/// watch loop enforces the same floor.
pub const MIN_FETCH_INTERVAL_MINUTES: u64 = 15;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Login form endpoint of the portal.
    pub login_url: String,
    /// Transcript-of-records page behind the login.
    pub transcript_url: String,
    pub user_name: String,
    pub password: String,
    /// Where the course cache and preferences files live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Minutes between checks in watch mode; floored to
    /// [`MIN_FETCH_INTERVAL_MINUTES`].
    #[serde(default = "default_fetch_interval_minutes")]
    pub fetch_interval_minutes: u64,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {path:?}"))?;
        let config: AppConfig =
            toml::from_str(&data).with_context(|| format!("could not parse {path:?}"))?;
        Ok(config)
    }

    pub fn fetch_interval_minutes(&self) -> u64 {
        self.fetch_interval_minutes.max(MIN_FETCH_INTERVAL_MINUTES)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./torsync-data")
}

fn default_fetch_interval_minutes() -> u64 {
    MIN_FETCH_INTERVAL_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_minimal_config_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
login_url = "https://portal.example.com/login"
transcript_url = "https://portal.example.com/tor"
user_name = "test.user"
password = "test123"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./torsync-data"));
        assert_eq!(config.fetch_interval_minutes(), MIN_FETCH_INTERVAL_MINUTES);
    }

    #[test]
    fn interval_below_floor_is_raised() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
login_url = "https://portal.example.com/login"
transcript_url = "https://portal.example.com/tor"
user_name = "test.user"
password = "test123"
fetch_interval_minutes = 5
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.fetch_interval_minutes(), MIN_FETCH_INTERVAL_MINUTES);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::load(Path::new("/does/not/exist.toml")).is_err());
    }
}
