//! Departure time labels.

use std::fmt;

use chrono::{DateTime, NaiveTime, TimeZone};

use crate::domain::{Departure, departure_instant, minutes_until};

/// What to show in a departure's time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureLabel {
    /// Leaving within the current minute.
    Now,
    /// Left within the last minute or so.
    Left,
    /// Leaving in 1 to 59 minutes.
    Minutes(i64),
    /// Further away (or long gone): local wall-clock time.
    Clock(NaiveTime),
    /// The departure time could not be represented.
    Unavailable,
}

impl fmt::Display for DepartureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartureLabel::Now => f.write_str("NOW"),
            DepartureLabel::Left => f.write_str("LEFT"),
            DepartureLabel::Minutes(n) => write!(f, "{n} min"),
            DepartureLabel::Clock(time) => write!(f, "{}", time.format("%H:%M")),
            DepartureLabel::Unavailable => f.write_str("--:--"),
        }
    }
}

/// Label a departure relative to `now`.
///
/// Only the clock time depends on `now`'s time zone; relative labels are
/// the same in every zone. Labels go stale as time passes, so callers
/// recompute them on every tick.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use transit_board::board::{DepartureLabel, label};
/// # use transit_board::domain::{Departure, GtfsId, RealtimeState, Trip};
/// # let departure = Departure {
/// #     scheduled_arrival: 36_180, realtime_arrival: 36_180, arrival_delay: 0,
/// #     scheduled_departure: 36_180, realtime_departure: 36_180, departure_delay: 0,
/// #     realtime: false, realtime_state: RealtimeState::Scheduled,
/// #     service_day: 1_710_453_600, headsign: String::new(),
/// #     trip: Trip { route_short_name: "550".into(), gtfs_id: GtfsId::parse("HSL:2550").unwrap() },
/// # };
/// let tz = FixedOffset::east_opt(2 * 3600).unwrap();
/// // 10:00 local; the departure is scheduled at 10:03
/// let now = tz.timestamp_opt(1_710_453_600 + 36_000, 0).unwrap();
/// assert_eq!(label(&departure, &now), DepartureLabel::Minutes(3));
/// assert_eq!(label(&departure, &now).to_string(), "3 min");
/// ```
pub fn label<Tz: TimeZone>(departure: &Departure, now: &DateTime<Tz>) -> DepartureLabel {
    let Some(at) = departure_instant(departure, &now.timezone()) else {
        return DepartureLabel::Unavailable;
    };

    match minutes_until(&at, now) {
        0 => DepartureLabel::Now,
        -1 => DepartureLabel::Left,
        n @ 1..=59 => DepartureLabel::Minutes(n),
        _ => DepartureLabel::Clock(at.time()),
    }
}
