//! Booking error types.

use thiserror::Error;

/// Errors raised while turning raw form input into a calendar event.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The submitted date and time do not form a valid local instant.
    #[error("invalid date/time {input:?}: {source}")]
    InvalidDateTime {
        /// The combined `date T time` string that failed to parse.
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The submitted date and time are not laid out as `YYYY-MM-DDTHH:MM`.
    #[error("malformed date/time {input:?}: expected YYYY-MM-DDTHH:MM")]
    MalformedDateTime { input: String },

    /// The appointment would end past the representable calendar range.
    #[error("date/time {input:?} is out of range")]
    OutOfRange { input: String },
}

impl BookingError {
    /// Creates an invalid date/time error for the given input.
    pub fn invalid_date_time(input: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::InvalidDateTime {
            input: input.into(),
            source,
        }
    }

    /// Creates an error for input that does not have the fixed layout.
    pub fn malformed_date_time(input: impl Into<String>) -> Self {
        Self::MalformedDateTime {
            input: input.into(),
        }
    }

    /// Creates an error for an appointment that cannot be represented.
    pub fn out_of_range(input: impl Into<String>) -> Self {
        Self::OutOfRange {
            input: input.into(),
        }
    }

    /// Returns true if this error was caused by bad date/time input.
    ///
    /// Every variant qualifies; the visitor sees the same rejection.
    pub fn is_invalid_date_time(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateTime { .. } | Self::MalformedDateTime { .. } | Self::OutOfRange { .. }
        )
    }
}
