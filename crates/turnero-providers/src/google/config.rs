//! Google client credentials and Calendar configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// Google OAuth authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google OAuth token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Redirect target used when the credentials file lists none.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Full read/write access to the user's calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// OAuth 2.0 client application identity.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
    /// Where the authorization server sends the operator after consent.
    pub redirect_uri: String,
    /// Authorization endpoint.
    pub auth_uri: String,
    /// Token endpoint.
    pub token_uri: String,
    /// Scopes requested during authorization.
    pub scopes: Vec<String>,
}

/// Structure of Google's OAuth credentials JSON file.
///
/// The Cloud Console download nests the client under `installed` (desktop
/// clients) or `web` (web clients).
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<NestedCredentials>,
    web: Option<NestedCredentials>,
}

#[derive(Debug, Deserialize)]
struct NestedCredentials {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl ClientCredentials {
    /// Creates credentials against Google's endpoints with the calendar scope.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            auth_uri: GOOGLE_AUTH_URL.to_string(),
            token_uri: GOOGLE_TOKEN_URL.to_string(),
            scopes: vec![CALENDAR_SCOPE.to_string()],
        }
    }

    /// Loads credentials from a Google Cloud Console JSON file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read and an
    /// invalid data error if it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to read credentials file {}",
                path.display()
            ))
            .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses credentials from a Google credentials JSON string.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let file: CredentialsFile = serde_json::from_str(json).map_err(|e| {
            ProviderError::invalid_data("failed to parse credentials JSON").with_source(e)
        })?;

        let nested = file.installed.or(file.web).ok_or_else(|| {
            ProviderError::invalid_data("credentials file must contain an 'installed' or 'web' section")
        })?;

        let mut credentials = Self::new(nested.client_id, nested.client_secret);
        if let Some(redirect_uri) = nested.redirect_uris.into_iter().next() {
            credentials.redirect_uri = redirect_uri;
        }
        if let Some(auth_uri) = nested.auth_uri {
            credentials.auth_uri = auth_uri;
        }
        if let Some(token_uri) = nested.token_uri {
            credentials.token_uri = token_uri;
        }
        Ok(credentials)
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    /// Sets the authorization and token endpoints.
    pub fn with_endpoints(mut self, auth_uri: impl Into<String>, token_uri: impl Into<String>) -> Self {
        self.auth_uri = auth_uri.into();
        self.token_uri = token_uri.into();
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Validates that the credentials are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.client_id.is_empty() {
            return Err("client_id is required".to_string());
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required".to_string());
        }
        for (name, value) in [
            ("redirect_uri", &self.redirect_uri),
            ("auth_uri", &self.auth_uri),
            ("token_uri", &self.token_uri),
        ] {
            url::Url::parse(value).map_err(|e| format!("{name} is not a valid URL: {e}"))?;
        }
        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }
        Ok(())
    }
}

/// Configuration for the Google Calendar integration.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth client credentials.
    pub credentials: ClientCredentials,

    /// Path of the persisted user token.
    pub token_path: PathBuf,

    /// Calendar that receives booked events.
    pub calendar_id: String,

    /// Base URL of the Calendar API.
    pub api_base: String,

    /// Request timeout for OAuth and Calendar calls.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default token file, relative to the working directory.
    pub const DEFAULT_TOKEN_PATH: &'static str = "token.json";

    /// Default calendar: the authorized user's primary calendar.
    pub const DEFAULT_CALENDAR_ID: &'static str = "primary";

    /// Base URL for Google Calendar API v3.
    pub const CALENDAR_API_BASE: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Creates a new Google configuration with the given credentials.
    pub fn new(credentials: ClientCredentials) -> Self {
        Self {
            credentials,
            token_path: PathBuf::from(Self::DEFAULT_TOKEN_PATH),
            calendar_id: Self::DEFAULT_CALENDAR_ID.to_string(),
            api_base: Self::CALENDAR_API_BASE.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("turnero/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the token storage path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Sets the calendar ID.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Sets the Calendar API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.credentials
            .validate()
            .map_err(|e| format!("invalid credentials: {}", e))?;

        if self.calendar_id.is_empty() {
            return Err("calendar_id is required".to_string());
        }

        Ok(())
    }
}
