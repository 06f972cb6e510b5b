//! Google OAuth and Calendar plumbing for turnero.
//!
//! - [`CalendarService`] - the seam the booking flow calls to create events
//! - [`google`] - credentials, token persistence, authorization and the
//!   Calendar API client
//! - [`ProviderError`] - error type shared by all of the above
//!
//! # Architecture
//!
//! ```text
//! credentials.json ──▶ ClientCredentials ──▶ OAuthClient
//!                                                 │
//! token.json ◀──────▶ TokenStore ◀──── TokenAuthority ◀── OperatorPrompt
//!                         │                  │
//!                         └──── TokenSource ◀┘
//!                                   │
//!                                   ▼
//!                         GoogleCalendarClient ──▶ Calendar API
//!                                   │
//!                          dyn CalendarService
//! ```

pub mod error;
pub mod google;
pub mod service;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use service::{BoxFuture, CalendarService, CreatedEvent};
