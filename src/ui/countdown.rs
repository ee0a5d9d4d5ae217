//! Time left on a reservation.
//!
//! Reservations run for a fixed window from `booking_time`. Nothing here
//! enforces expiry; the backend owns that. This only renders the countdown.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Length of a reservation
pub const BOOKING_WINDOW_MINUTES: i64 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    /// No (parseable) start time: the whole window is shown
    FullWindow,
    /// Whole minutes remaining, rounded down
    Remaining { minutes: i64 },
    /// Past due
    Expiring,
}

impl std::fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullWindow => write!(f, "{}m 00s", BOOKING_WINDOW_MINUTES),
            Self::Remaining { minutes } => write!(f, "{}m left", minutes),
            Self::Expiring => write!(f, "Expiring..."),
        }
    }
}

/// Parse a backend timestamp. RFC 3339 is taken as-is; naive timestamps
/// (the backend stores UTC without an offset) are read as UTC.
pub fn parse_booking_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `booking_time + window - now`, bucketed for display.
pub fn time_left(booking_time: Option<&str>, now: DateTime<Utc>) -> TimeLeft {
    let Some(booked_at) = booking_time.and_then(parse_booking_time) else {
        return TimeLeft::FullWindow;
    };

    let remaining = booked_at + Duration::minutes(BOOKING_WINDOW_MINUTES) - now;
    if remaining <= Duration::zero() {
        TimeLeft::Expiring
    } else {
        TimeLeft::Remaining {
            minutes: remaining.num_minutes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ago(now: DateTime<Utc>, minutes: i64) -> String {
        (now - Duration::minutes(minutes)).to_rfc3339()
    }

    #[test]
    fn test_one_minute_left() {
        let now = Utc::now();
        let t = time_left(Some(&ago(now, 44)), now);
        assert_eq!(t, TimeLeft::Remaining { minutes: 1 });
        assert_eq!(t.to_string(), "1m left");
    }

    #[test]
    fn test_past_due_is_expiring() {
        let now = Utc::now();
        assert_eq!(time_left(Some(&ago(now, 46)), now).to_string(), "Expiring...");
        assert_eq!(time_left(Some(&ago(now, 45)), now), TimeLeft::Expiring);
    }

    #[test]
    fn test_partial_minutes_round_down() {
        let now = Utc::now();
        let booked = (now - Duration::seconds(10 * 60 + 30)).to_rfc3339();
        // 34m30s remaining
        assert_eq!(time_left(Some(&booked), now).to_string(), "34m left");
    }

    #[test]
    fn test_missing_or_garbled_time_shows_full_window() {
        let now = Utc::now();
        assert_eq!(time_left(None, now).to_string(), "45m 00s");
        assert_eq!(time_left(Some("yesterday-ish"), now), TimeLeft::FullWindow);
    }

    #[test]
    fn test_parse_naive_timestamps_as_utc() {
        let expected = DateTime::parse_from_rfc3339("2026-10-19T09:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_booking_time("2026-10-19T09:15:00"), Some(expected));
        assert_eq!(parse_booking_time("2026-10-19 09:15:00"), Some(expected));
        assert_eq!(
            parse_booking_time("2026-10-19T09:15:00.250000").map(|t| t.timestamp()),
            Some(expected.timestamp())
        );
        assert_eq!(parse_booking_time("2026-10-19T11:15:00+02:00"), Some(expected));
    }
}
