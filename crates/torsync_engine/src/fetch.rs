use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Strings the portal renders into the login response when the
/// credentials are rejected. The page comes back with HTTP 200 either
/// way, so the body is the only signal.
const INVALID_CREDENTIAL_MARKERS: &[&str] = &[
    "Login credentials incorrect!",
    "Anmeldedaten nicht korrekt.",
];

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Error)]
#[error("credentials unavailable: {0}")]
pub struct CredentialError(pub String);

/// Hands out the user's portal credentials. Backed by whatever secret
/// storage the caller has; the engine only sees the trait.
pub trait CredentialStore: Send + Sync {
    fn credentials(&self) -> Result<Credentials, CredentialError>;
}

/// Credential store holding a fixed pair, for config-file setups and
/// tests.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    credentials: Credentials,
}

impl StaticCredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(self.credentials.clone())
    }
}

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("Wrong user name or password. Please try again.")]
    InvalidCredentials,
    #[error("login rejected with http status {0}")]
    LoginStatus(u16),
    #[error("transcript request failed with http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Downloads the transcript page, handling authentication itself.
#[async_trait::async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch_transcript(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetcher for the university portal: posts the login form, keeps the
/// session cookie, then requests the transcript page with it.
pub struct PortalFetcher {
    login_url: String,
    credential_store: Arc<dyn CredentialStore>,
    settings: FetchSettings,
}

impl PortalFetcher {
    pub fn new(
        login_url: impl Into<String>,
        credential_store: Arc<dyn CredentialStore>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            login_url: login_url.into(),
            credential_store,
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))
    }

    async fn sign_in(&self, client: &reqwest::Client) -> Result<(), FetchError> {
        let credentials = self.credential_store.credentials()?;
        let login_url = reqwest::Url::parse(&self.login_url)
            .map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let form = [
            ("login-form", "login-form"),
            ("user", credentials.user_name.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = client
            .post(login_url)
            .form(&form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::LoginStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        if INVALID_CREDENTIAL_MARKERS
            .iter()
            .any(|marker| body.contains(marker))
        {
            return Err(FetchError::InvalidCredentials);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl TranscriptFetcher for PortalFetcher {
    async fn fetch_transcript(&self, url: &str) -> Result<String, FetchError> {
        let transcript_url =
            reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;

        let client = self.build_client()?;
        self.sign_in(&client).await?;

        let response = client
            .get(transcript_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    FetchError::Network(err.to_string())
}
