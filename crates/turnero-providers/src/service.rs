//! CalendarService trait definition.
//!
//! This module defines [`CalendarService`], the seam between the booking
//! orchestrator and the remote calendar. The production implementation is
//! [`GoogleCalendarClient`]; tests substitute their own.
//!
//! [`GoogleCalendarClient`]: crate::google::GoogleCalendarClient

use std::future::Future;
use std::pin::Pin;

use turnero_core::CalendarEvent;

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so a single
/// `Arc<dyn CalendarService>` can be shared by all request handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An event successfully created on the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    /// Identifier assigned by the calendar service.
    pub id: String,
    /// Link to the event in the calendar web UI, if returned.
    pub html_link: Option<String>,
}

impl CreatedEvent {
    /// Creates a new created-event record.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html_link: None,
        }
    }

    /// Builder method to set the web link.
    pub fn with_html_link(mut self, link: impl Into<String>) -> Self {
        self.html_link = Some(link.into());
        self
    }
}

/// Creates events on a remote calendar.
///
/// # Implementation Notes
///
/// - Implementations must be `Send + Sync`; one instance serves every
///   concurrent booking.
/// - No retries: a remote failure is returned immediately.
/// - No validation of the event shape; callers hand over a fully derived
///   [`CalendarEvent`].
pub trait CalendarService: Send + Sync {
    /// Returns the name of the backing service (e.g. `"google"`).
    fn name(&self) -> &str;

    /// Inserts `event` into the configured calendar.
    fn create_event<'a>(
        &'a self,
        event: &'a CalendarEvent,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>>;
}
