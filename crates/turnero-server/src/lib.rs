//! turnero booking server.
//!
//! Serves the booking form, turns submitted bookings into Google Calendar
//! events and handles the one-time operator authorization at startup.
//!
//! # Components
//!
//! - **BookingOrchestrator**: form input to calendar event to outcome
//! - **Renderer**: handlebars page for the form and confirmation
//! - **router**: axum routes and static files
//! - **commands**: startup for `serve` and `auth`

pub mod booking;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;

pub use booking::{BookingFailure, BookingOrchestrator, BookingResult};
pub use config::AppConfig;
pub use error::{ServerError, ServerResult};
pub use render::{PageView, Renderer};
pub use routes::{AppState, BookingForm, router};
