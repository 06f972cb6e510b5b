//! Booking orchestration.
//!
//! A booking moves through `Received → Validated → Submitted` and ends
//! either `Confirmed` or `Rejected`. Nothing is persisted locally, so a
//! rejection at any step leaves no state behind.

use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{info, warn};

use turnero_core::{BookingConfirmation, BookingError, BookingPolicy, BookingRequest, CalendarEvent};
use turnero_providers::{CalendarService, ProviderError};

/// Why a booking was not made.
#[derive(Debug)]
pub enum BookingFailure {
    /// The date or time did not parse. Nothing was sent to the calendar.
    InvalidDateTime(BookingError),
    /// The calendar service refused or failed the insert.
    RemoteBooking(ProviderError),
}

impl BookingFailure {
    /// HTTP status reported to the visitor.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDateTime(_) => StatusCode::BAD_REQUEST,
            Self::RemoteBooking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text message shown to the visitor.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidDateTime(_) => "Fecha u hora inválida",
            Self::RemoteBooking(_) => "Error al crear el evento",
        }
    }
}

/// Outcome of one booking attempt.
#[derive(Debug)]
pub enum BookingResult {
    Confirmed(BookingConfirmation),
    Rejected(BookingFailure),
}

impl BookingResult {
    /// Returns true if the event was created.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

/// Turns booking requests into calendar events.
///
/// Holds the shared calendar service; one instance serves all requests.
#[derive(Clone)]
pub struct BookingOrchestrator {
    service: Arc<dyn CalendarService>,
    policy: BookingPolicy,
}

impl BookingOrchestrator {
    /// Creates an orchestrator booking through `service` under `policy`.
    pub fn new(service: Arc<dyn CalendarService>, policy: BookingPolicy) -> Self {
        Self { service, policy }
    }

    /// Validates `request`, creates the event and reports the outcome.
    pub async fn handle_booking(&self, request: BookingRequest) -> BookingResult {
        info!(
            name = %request.name,
            date = %request.date,
            time = %request.time,
            "booking received"
        );

        let event = match CalendarEvent::from_request(&request, &self.policy) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "booking rejected: invalid date or time");
                return BookingResult::Rejected(BookingFailure::InvalidDateTime(e));
            }
        };
        info!(
            start = %event.start,
            end = %event.end,
            time_zone = event.time_zone_name(),
            "booking validated"
        );

        info!(service = self.service.name(), "booking submitted");
        match self.service.create_event(&event).await {
            Ok(created) => {
                info!(event_id = %created.id, "booking confirmed");
                BookingResult::Confirmed(BookingConfirmation::new(&request, created.id))
            }
            Err(e) => {
                warn!(error = %e, "booking rejected: calendar service failed");
                BookingResult::Rejected(BookingFailure::RemoteBooking(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use turnero_core::format_wall_clock;
    use turnero_providers::{BoxFuture, CreatedEvent, ProviderResult};

    use super::*;

    /// Records every event and answers with a fixed outcome.
    #[derive(Default)]
    struct FakeCalendar {
        events: Mutex<Vec<CalendarEvent>>,
        fail: bool,
    }

    impl FakeCalendar {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn events(&self) -> Vec<CalendarEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl CalendarService for FakeCalendar {
        fn name(&self) -> &str {
            "fake"
        }

        fn create_event<'a>(
            &'a self,
            event: &'a CalendarEvent,
        ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
            Box::pin(async move {
                self.events.lock().unwrap().push(event.clone());
                if self.fail {
                    Err(ProviderError::server("API error (500)"))
                } else {
                    Ok(CreatedEvent::new("evt-1"))
                }
            })
        }
    }

    fn orchestrator(calendar: Arc<FakeCalendar>) -> BookingOrchestrator {
        BookingOrchestrator::new(calendar, BookingPolicy::default())
    }

    #[tokio::test]
    async fn valid_booking_is_confirmed() {
        let calendar = Arc::new(FakeCalendar::default());
        let request = BookingRequest::new("Ana", "ana@example.com", "2025-03-10", "09:00");

        let result = orchestrator(calendar.clone()).handle_booking(request).await;

        let BookingResult::Confirmed(confirmation) = result else {
            panic!("expected confirmation, got {result:?}");
        };
        assert_eq!(confirmation.name, "Ana");
        assert_eq!(confirmation.date, "2025-03-10");
        assert_eq!(confirmation.time, "09:00");
        assert_eq!(confirmation.event_id, "evt-1");

        let events = calendar.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Consulta con Ana");
        assert_eq!(format_wall_clock(&events[0].start), "2025-03-10T09:00:00");
        assert_eq!(format_wall_clock(&events[0].end), "2025-03-10T10:00:00");
        assert_eq!(events[0].attendees, vec!["ana@example.com".to_string()]);
    }

    #[tokio::test]
    async fn malformed_inputs_never_reach_the_calendar() {
        let calendar = Arc::new(FakeCalendar::default());
        let orchestrator = orchestrator(calendar.clone());

        let inputs = [
            ("2025-03-10", "25:00"),
            ("2025-03-10", "09:60"),
            ("2025-13-01", "09:00"),
            ("2025-02-30", "09:00"),
            ("2025/03/10", "09:00"),
            ("2025-03-10", "9h"),
            ("", ""),
        ];

        for (date, time) in inputs {
            let request = BookingRequest::new("Ana", "ana@example.com", date, time);
            let result = orchestrator.handle_booking(request).await;
            match result {
                BookingResult::Rejected(failure @ BookingFailure::InvalidDateTime(_)) => {
                    assert_eq!(failure.status_code(), StatusCode::BAD_REQUEST);
                    assert_eq!(failure.public_message(), "Fecha u hora inválida");
                }
                other => panic!("{date} {time}: expected invalid date/time, got {other:?}"),
            }
        }

        assert!(calendar.events().is_empty());
    }

    #[tokio::test]
    async fn remote_failure_is_rejected_with_500() {
        let calendar = Arc::new(FakeCalendar::failing());
        let request = BookingRequest::new("Ana", "ana@example.com", "2025-03-10", "09:00");

        let result = orchestrator(calendar.clone()).handle_booking(request).await;

        let BookingResult::Rejected(failure) = result else {
            panic!("expected rejection, got {result:?}");
        };
        assert!(matches!(failure, BookingFailure::RemoteBooking(_)));
        assert_eq!(failure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failure.public_message(), "Error al crear el evento");
        assert_eq!(calendar.events().len(), 1);
    }

    #[tokio::test]
    async fn name_and_email_are_passed_through_unvalidated() {
        let calendar = Arc::new(FakeCalendar::default());
        let request = BookingRequest::new("", "not-an-email", "2025-03-10", "09:00");

        let result = orchestrator(calendar.clone()).handle_booking(request).await;

        assert!(result.is_confirmed());
        assert_eq!(calendar.events()[0].attendees, vec!["not-an-email".to_string()]);
    }
}
