//! Google Calendar integration.
//!
//! - [`ClientCredentials`] / [`GoogleConfig`]: the OAuth client identity and
//!   where events go
//! - [`TokenStore`]: the persisted user token
//! - [`TokenAuthority`]: startup authorization through an [`OperatorPrompt`]
//! - [`TokenSource`]: refreshes the access token while the server runs
//! - [`GoogleCalendarClient`]: the [`CalendarService`] backed by Calendar API v3
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use turnero_providers::google::{
//!     ClientCredentials, ConsolePrompt, GoogleCalendarClient, GoogleConfig, OAuthClient,
//!     TokenAuthority, TokenStore,
//! };
//!
//! let config = GoogleConfig::new(ClientCredentials::from_file("credentials.json")?);
//! let oauth = OAuthClient::new(config.credentials.clone(), config.timeout)?;
//! let authority = TokenAuthority::new(
//!     oauth,
//!     TokenStore::new(&config.token_path),
//!     Arc::new(ConsolePrompt),
//! );
//!
//! let token = authority.acquire_token().await?;
//! let tokens = Arc::new(authority.into_source(token));
//! let client = GoogleCalendarClient::new(&config, tokens)?;
//! ```
//!
//! [`CalendarService`]: crate::service::CalendarService

mod authority;
mod client;
mod config;
mod oauth;
mod tokens;

pub use authority::{ConsolePrompt, OperatorPrompt, TokenAuthority, TokenSource};
pub use client::GoogleCalendarClient;
pub use config::{
    CALENDAR_SCOPE, ClientCredentials, DEFAULT_REDIRECT_URI, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL,
    GoogleConfig,
};
pub use oauth::{OAuthClient, extract_code};
pub use tokens::{Token, TokenStore};
