//! Booking request and confirmation types.

use serde::Serialize;

/// Raw booking input as submitted by the visitor.
///
/// Fields are kept as the original strings: none of them is validated here
/// and the date/time are only parsed when the event is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    /// Attendee name.
    pub name: String,
    /// Attendee email.
    pub email: String,
    /// Requested date (`YYYY-MM-DD`).
    pub date: String,
    /// Requested local time (`HH:MM`).
    pub time: String,
}

impl BookingRequest {
    /// Creates a new booking request.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: date.into(),
            time: time.into(),
        }
    }
}

/// Confirmation data for a booked appointment.
///
/// Echoes the unparsed request values so the confirmation page shows exactly
/// what the visitor typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    pub name: String,
    pub date: String,
    pub time: String,
    /// Identifier assigned by the calendar service.
    pub event_id: String,
}

impl BookingConfirmation {
    /// Builds a confirmation from the original request and the remote event id.
    pub fn new(request: &BookingRequest, event_id: impl Into<String>) -> Self {
        Self {
            name: request.name.clone(),
            date: request.date.clone(),
            time: request.time.clone(),
            event_id: event_id.into(),
        }
    }
}
