//! Core types: booking requests, calendar events, booking policy, tracing

pub mod booking;
pub mod error;
pub mod event;
pub mod policy;
pub mod time;
pub mod tracing;

pub use booking::{BookingConfirmation, BookingRequest};
pub use error::BookingError;
pub use event::CalendarEvent;
pub use policy::BookingPolicy;
pub use time::{LOCAL_DATETIME_FORMAT, WALL_CLOCK_FORMAT, format_wall_clock, parse_local_start};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
