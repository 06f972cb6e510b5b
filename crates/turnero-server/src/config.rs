//! Server configuration.
//!
//! Everything lives in an optional `turnero.toml`. Every section and key has
//! a default, so an empty (or absent) file runs the server against
//! `credentials.json` and `token.json` in the working directory, booking one
//! hour slots in Buenos Aires time on the primary calendar.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [google]
//! credentials_path = "/etc/turnero/credentials.json"
//! token_path = "/var/lib/turnero/token.json"
//! calendar_id = "primary"
//!
//! [booking]
//! time_zone = "America/Argentina/Buenos_Aires"
//! duration_minutes = 60
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;

use turnero_core::{BookingPolicy, TracingOutputFormat};
use turnero_providers::google::{ClientCredentials, GoogleConfig};

use crate::error::{ServerError, ServerResult};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "turnero.toml";

/// Configuration for the turnero server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener settings.
    pub server: ServerSettings,

    /// Google credentials, token and calendar settings.
    pub google: GoogleSettings,

    /// Booking policy.
    pub booking: BookingSettings,

    /// Templates and static assets.
    pub web: WebSettings,

    /// Log output.
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Google integration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Cloud Console OAuth client file.
    pub credentials_path: PathBuf,

    /// Where the user token is persisted.
    pub token_path: PathBuf,

    /// Calendar receiving the bookings.
    pub calendar_id: String,

    /// Timeout for OAuth and Calendar requests, in seconds.
    pub timeout_secs: u64,

    /// Calendar API base URL. Only useful for testing against a stub.
    pub api_base: Option<String>,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from(GoogleConfig::DEFAULT_TOKEN_PATH),
            calendar_id: GoogleConfig::DEFAULT_CALENDAR_ID.to_string(),
            timeout_secs: GoogleConfig::DEFAULT_TIMEOUT_SECS,
            api_base: None,
        }
    }
}

/// Booking policy settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    /// IANA time zone name.
    pub time_zone: String,

    /// Appointment length in minutes.
    pub duration_minutes: i64,

    /// Text before the attendee name in the event title.
    pub summary_prefix: String,

    /// Event description.
    pub description: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            time_zone: BookingPolicy::DEFAULT_TIME_ZONE.name().to_string(),
            duration_minutes: BookingPolicy::DEFAULT_DURATION_MINUTES,
            summary_prefix: BookingPolicy::DEFAULT_SUMMARY_PREFIX.to_string(),
            description: BookingPolicy::DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Web assets settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    /// Directory served under `/static`.
    pub static_dir: PathBuf,

    /// Page template overriding the built-in one.
    pub template_path: Option<PathBuf>,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            template_path: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `pretty`, `compact` or `json`.
    pub format: Option<TracingOutputFormat>,
}

impl AppConfig {
    /// Loads configuration from an explicit path, or from
    /// [`DEFAULT_CONFIG_PATH`] when it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load_from(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text and validates it.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ServerError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialization alone cannot.
    pub fn validate(&self) -> ServerResult<()> {
        self.booking_policy()?;
        if self.google.calendar_id.is_empty() {
            return Err(ServerError::config("google.calendar_id must not be empty"));
        }
        if self.google.timeout_secs == 0 {
            return Err(ServerError::config("google.timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Builds the booking policy from the `[booking]` section.
    pub fn booking_policy(&self) -> ServerResult<BookingPolicy> {
        let time_zone = Tz::from_str(&self.booking.time_zone).map_err(|_| {
            ServerError::config(format!(
                "booking.time_zone: unknown time zone {:?}",
                self.booking.time_zone
            ))
        })?;

        let duration = chrono::Duration::try_minutes(self.booking.duration_minutes)
            .ok_or_else(|| {
                ServerError::config(format!(
                    "booking.duration_minutes: {} is out of range",
                    self.booking.duration_minutes
                ))
            })?;

        let policy = BookingPolicy::default()
            .with_time_zone(time_zone)
            .with_duration(duration)
            .with_summary_prefix(self.booking.summary_prefix.clone())
            .with_description(self.booking.description.clone());

        policy
            .validate()
            .map_err(|e| ServerError::config(format!("booking: {}", e)))?;
        Ok(policy)
    }

    /// Builds the Google configuration around loaded client credentials.
    pub fn google_config(&self, credentials: ClientCredentials) -> ServerResult<GoogleConfig> {
        let mut config = GoogleConfig::new(credentials)
            .with_token_path(&self.google.token_path)
            .with_calendar_id(self.google.calendar_id.clone())
            .with_timeout(Duration::from_secs(self.google.timeout_secs));
        if let Some(api_base) = &self.google.api_base {
            config = config.with_api_base(api_base.clone());
        }

        config
            .validate()
            .map_err(|e| ServerError::config(format!("google: {}", e)))?;
        Ok(config)
    }

    /// Returns the listen address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.google.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.google.token_path, PathBuf::from("token.json"));
        assert_eq!(config.google.calendar_id, "primary");
        assert_eq!(config.web.static_dir, PathBuf::from("static"));
        assert!(config.logging.format.is_none());

        let policy = config.booking_policy().unwrap();
        assert_eq!(policy, BookingPolicy::default());
    }

    #[test]
    fn parse_full_config() {
        let toml_content = r#"
            [server]
            host = "0.0.0.0"
            port = 9090

            [google]
            credentials_path = "/etc/turnero/credentials.json"
            token_path = "/var/lib/turnero/token.json"
            calendar_id = "turnos@example.com"
            timeout_secs = 10

            [booking]
            time_zone = "Europe/Madrid"
            duration_minutes = 30
            summary_prefix = "Cita con"
            description = "Reserva online"

            [web]
            static_dir = "/srv/turnero/static"
            template_path = "/srv/turnero/index.html"

            [logging]
            format = "json"
        "#;

        let config = AppConfig::from_toml(toml_content).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
        assert_eq!(config.google.calendar_id, "turnos@example.com");
        assert_eq!(
            config.web.template_path,
            Some(PathBuf::from("/srv/turnero/index.html"))
        );
        assert_eq!(config.logging.format, Some(TracingOutputFormat::Json));

        let policy = config.booking_policy().unwrap();
        assert_eq!(policy.time_zone, Tz::Europe__Madrid);
        assert_eq!(policy.duration, chrono::Duration::minutes(30));
        assert_eq!(policy.summary_for("Ana"), "Cita con Ana");
        assert_eq!(policy.description, "Reserva online");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml("[server]\nport = 3000\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn unknown_time_zone_is_rejected() {
        let err = AppConfig::from_toml("[booking]\ntime_zone = \"Mars/Olympus\"\n").unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        assert!(AppConfig::from_toml("[booking]\nduration_minutes = 0\n").is_err());
    }

    #[test]
    fn oversized_duration_is_a_config_error() {
        let err = AppConfig::from_toml("[booking]\nduration_minutes = 9223372036854775807\n")
            .unwrap_err();
        assert!(matches!(err, ServerError::Config { .. }));
        assert!(err.to_string().contains("duration_minutes"));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = AppConfig::from_toml("[server\nport = ").unwrap_err();
        assert!(matches!(err, ServerError::Config { .. }));
    }

    #[test]
    fn google_config_from_settings() {
        let config = AppConfig::from_toml(
            "[google]\ncalendar_id = \"team\"\ntimeout_secs = 5\napi_base = \"http://127.0.0.1:9\"\n",
        )
        .unwrap();
        let google = config
            .google_config(ClientCredentials::new("id", "secret"))
            .unwrap();

        assert_eq!(google.calendar_id, "team");
        assert_eq!(google.timeout, Duration::from_secs(5));
        assert_eq!(google.api_base, "http://127.0.0.1:9");
    }

    #[test]
    fn google_config_rejects_invalid_credentials() {
        let config = AppConfig::default();
        assert!(config.google_config(ClientCredentials::new("", "")).is_err());
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turnero.toml");
        std::fs::write(&path, "[server]\nport = 8181\n").unwrap();

        let config = AppConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.server.port, 8181);
    }
}
