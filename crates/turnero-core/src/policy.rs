//! Booking policy: the fixed time zone, duration and wording applied to
//! every event created from the booking form.

use chrono::Duration;
use chrono_tz::Tz;

/// Policy constants applied when deriving a [`CalendarEvent`].
///
/// [`CalendarEvent`]: crate::event::CalendarEvent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPolicy {
    /// IANA time zone every booking is interpreted in.
    pub time_zone: Tz,
    /// Length of every booked appointment.
    pub duration: Duration,
    /// Text placed before the attendee name in the event summary.
    pub summary_prefix: String,
    /// Fixed event description.
    pub description: String,
}

impl BookingPolicy {
    /// Default appointment length in minutes.
    pub const DEFAULT_DURATION_MINUTES: i64 = 60;

    /// Default summary prefix.
    pub const DEFAULT_SUMMARY_PREFIX: &'static str = "Consulta con";

    /// Default event description.
    pub const DEFAULT_DESCRIPTION: &'static str = "Turno reservado desde la web";

    /// Default time zone.
    pub const DEFAULT_TIME_ZONE: Tz = Tz::America__Argentina__Buenos_Aires;

    /// Sets the time zone.
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Sets the appointment duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the summary prefix.
    pub fn with_summary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.summary_prefix = prefix.into();
        self
    }

    /// Sets the event description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builds the event summary for an attendee. The name is embedded verbatim.
    pub fn summary_for(&self, name: &str) -> String {
        if self.summary_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", self.summary_prefix, name)
        }
    }

    /// Validates the policy.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration <= Duration::zero() {
            return Err("booking duration must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            time_zone: Self::DEFAULT_TIME_ZONE,
            duration: Duration::minutes(Self::DEFAULT_DURATION_MINUTES),
            summary_prefix: Self::DEFAULT_SUMMARY_PREFIX.to_string(),
            description: Self::DEFAULT_DESCRIPTION.to_string(),
        }
    }
}
