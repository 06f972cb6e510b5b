//! Calendar events derived from booking requests.
//!
//! A [`CalendarEvent`] is the provider-agnostic description of the
//! appointment to create. It is derived deterministically from a
//! [`BookingRequest`] and a [`BookingPolicy`]: the same input always yields
//! the same event.

use chrono::{Duration, NaiveDateTime};
use chrono_tz::Tz;

use crate::booking::BookingRequest;
use crate::error::BookingError;
use crate::policy::BookingPolicy;
use crate::time::parse_local_start;

/// An appointment to be created on the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Event title.
    pub summary: String,
    /// Event body text.
    pub description: String,
    /// Local wall-clock start, interpreted in `time_zone`.
    pub start: NaiveDateTime,
    /// Local wall-clock end, interpreted in `time_zone`.
    pub end: NaiveDateTime,
    /// Time zone for both `start` and `end`.
    pub time_zone: Tz,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
}

impl CalendarEvent {
    /// Derives the event for a booking request.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError`] when the request's date and time do not
    /// parse as `YYYY-MM-DDTHH:MM`, or when the appointment would end past
    /// the representable date range.
    pub fn from_request(
        request: &BookingRequest,
        policy: &BookingPolicy,
    ) -> Result<Self, BookingError> {
        let start = parse_local_start(&request.date, &request.time)?;
        let end = start
            .checked_add_signed(policy.duration)
            .ok_or_else(|| {
                BookingError::out_of_range(format!("{}T{}", request.date, request.time))
            })?;

        Ok(Self {
            summary: policy.summary_for(&request.name),
            description: policy.description.clone(),
            start,
            end,
            time_zone: policy.time_zone,
            attendees: vec![request.email.clone()],
        })
    }

    /// Returns the event duration.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns the IANA name of the event time zone.
    pub fn time_zone_name(&self) -> &'static str {
        self.time_zone.name()
    }
}
