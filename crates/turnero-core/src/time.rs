//! Local date/time parsing for booking slots.
//!
//! Bookings arrive as two separate form fields (`YYYY-MM-DD` and `HH:MM`).
//! They are joined with a `T` and parsed as a single naive local instant;
//! the time zone is attached later from the [`BookingPolicy`].
//!
//! [`BookingPolicy`]: crate::policy::BookingPolicy

use chrono::NaiveDateTime;

use crate::error::BookingError;

/// Pattern the combined `date T time` string must match.
pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Wall-clock representation sent to the calendar service (no offset).
pub const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a booking date and time into a naive local instant.
///
/// Fails with [`BookingError::MalformedDateTime`] when the combined string
/// is not laid out exactly as `dddd-dd-ddTdd:dd`, and with
/// [`BookingError::InvalidDateTime`] when it names an impossible date
/// (e.g. February 30th) or time (e.g. 25:00).
pub fn parse_local_start(date: &str, time: &str) -> Result<NaiveDateTime, BookingError> {
    let input = format!("{date}T{time}");
    // chrono accepts signs, padding and short fields; the form does not.
    if !has_fixed_layout(&input) {
        return Err(BookingError::malformed_date_time(input));
    }
    NaiveDateTime::parse_from_str(&input, LOCAL_DATETIME_FORMAT)
        .map_err(|e| BookingError::invalid_date_time(input, e))
}

fn has_fixed_layout(input: &str) -> bool {
    const LAYOUT: &[u8] = b"dddd-dd-ddTdd:dd";
    let bytes = input.as_bytes();
    bytes.len() == LAYOUT.len()
        && bytes.iter().zip(LAYOUT).all(|(&b, &l)| match l {
            b'd' => b.is_ascii_digit(),
            _ => b == l,
        })
}

/// Formats a naive instant as local wall-clock time with seconds.
pub fn format_wall_clock(dt: &NaiveDateTime) -> String {
    dt.format(WALL_CLOCK_FORMAT).to_string()
}
