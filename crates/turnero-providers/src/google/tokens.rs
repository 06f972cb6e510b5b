//! OAuth token persistence.
//!
//! The token file holds a single JSON object with `access_token`,
//! `token_type`, `refresh_token` and `expiry`. Files written by other OAuth
//! clients in that shape (including a zero `expiry`) load unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};

/// Tokens are treated as expired this long before their actual expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// A delegated OAuth token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Bearer credential for API requests.
    pub access_token: String,

    /// Token type, normally `Bearer`.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Long-lived credential used to obtain new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token stops being accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Creates a bearer token with no refresh token and no expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token: None,
            expiry: None,
        }
    }

    /// Sets the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the expiry instant.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Sets the expiry relative to now.
    pub fn expires_in(self, seconds: i64) -> Self {
        self.with_expiry(Utc::now() + Duration::seconds(seconds))
    }

    /// Returns the effective expiry, ignoring zero timestamps.
    pub fn effective_expiry(&self) -> Option<DateTime<Utc>> {
        // Year 1 is the "zero time" some clients write for non-expiring tokens.
        self.expiry.filter(|expiry| expiry.year() > 1)
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        match self.effective_expiry() {
            Some(expiry) => Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry,
            None => false,
        }
    }

    /// Returns true if the access token can be refreshed.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// Returns the value of an `Authorization` header for this token.
    pub fn authorization_header(&self) -> String {
        let token_type = if self.token_type.is_empty() {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        format!("{} {}", token_type, self.access_token)
    }
}

/// File-backed storage for a single [`Token`].
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted token.
    ///
    /// # Errors
    ///
    /// - not found if the file does not exist
    /// - configuration error if the file exists but cannot be read
    /// - invalid data if the contents are not a usable token
    pub fn load(&self) -> ProviderResult<Token> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no token file");
                return Err(ProviderError::not_found(format!(
                    "no token file at {}",
                    self.path.display()
                )));
            }
            Err(e) => {
                return Err(ProviderError::configuration(format!(
                    "failed to read token file {}",
                    self.path.display()
                ))
                .with_source(e));
            }
        };

        let token: Token = serde_json::from_str(&content).map_err(|e| {
            ProviderError::invalid_data(format!(
                "failed to parse token file {}",
                self.path.display()
            ))
            .with_source(e)
        })?;

        if token.access_token.is_empty() {
            return Err(ProviderError::invalid_data(format!(
                "token file {} has an empty access_token",
                self.path.display()
            )));
        }

        debug!(path = %self.path.display(), "loaded token");
        Ok(token)
    }

    /// Persists `token`, replacing any previous file.
    ///
    /// The write goes to a sibling temporary file that is renamed into place,
    /// so readers never observe a partially written token.
    pub fn save(&self, token: &Token) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::configuration(format!(
                    "failed to create token directory {}",
                    parent.display()
                ))
                .with_source(e)
            })?;
        }

        let content = serde_json::to_string_pretty(token).map_err(|e| {
            ProviderError::internal("failed to serialize token").with_source(e)
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to write token file {}",
                temp_path.display()
            ))
            .with_source(e)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600)) {
                warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to restrict token file permissions"
                );
            }
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to move token file into {}",
                self.path.display()
            ))
            .with_source(e)
        })?;

        info!(path = %self.path.display(), "saved token");
        Ok(())
    }
}
