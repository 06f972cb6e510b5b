//! Google Calendar API client.
//!
//! Inserts events with a bearer token taken from a shared [`TokenSource`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use turnero_core::{CalendarEvent, format_wall_clock};

use crate::error::{ProviderError, ProviderResult};
use crate::service::{BoxFuture, CalendarService, CreatedEvent};

use super::authority::TokenSource;
use super::config::GoogleConfig;

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    tokens: Arc<TokenSource>,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    /// Creates a client for the calendar named in `config`.
    pub fn new(config: &GoogleConfig, tokens: Arc<TokenSource>) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            http_client,
            tokens,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
        })
    }

    /// Returns the target calendar ID.
    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Inserts `event` and returns what the API created.
    pub async fn insert_event(&self, event: &CalendarEvent) -> ProviderResult<CreatedEvent> {
        let url = format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        );
        let token = self.tokens.token().await?;
        let body = InsertEventRequest::from_event(event);

        debug!(calendar = %self.calendar_id, summary = %event.summary, "inserting event");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout").with_source(e)
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication("access token expired or invalid"));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::authorization("access denied to calendar"));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(format!(
                "calendar {} not found",
                self.calendar_id
            )));
        }

        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::bad_request(format!("event rejected: {}", body)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e))
        })?;

        let inserted: InsertEventResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })?;

        info!(event_id = %inserted.id, calendar = %self.calendar_id, "event created");

        let mut created = CreatedEvent::new(inserted.id);
        if let Some(link) = inserted.html_link {
            created = created.with_html_link(link);
        }
        Ok(created)
    }
}

impl CalendarService for GoogleCalendarClient {
    fn name(&self) -> &str {
        "google"
    }

    fn create_event<'a>(
        &'a self,
        event: &'a CalendarEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(self.insert_event(event))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// API wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventRequest<'a> {
    summary: &'a str,
    description: &'a str,
    start: EventDateTime<'a>,
    end: EventDateTime<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attendees: Vec<EventAttendee<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDateTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
struct EventAttendee<'a> {
    email: &'a str,
}

impl<'a> InsertEventRequest<'a> {
    fn from_event(event: &'a CalendarEvent) -> Self {
        let time_zone = event.time_zone_name();
        Self {
            summary: &event.summary,
            description: &event.description,
            start: EventDateTime {
                date_time: format_wall_clock(&event.start),
                time_zone,
            },
            end: EventDateTime {
                date_time: format_wall_clock(&event.end),
                time_zone,
            },
            attendees: event
                .attendees
                .iter()
                .map(|email| EventAttendee { email })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertEventResponse {
    id: String,
    #[serde(default)]
    html_link: Option<String>,
}
