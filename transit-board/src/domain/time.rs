//! Service-day time handling.
//!
//! The provider expresses departure times as second offsets from the local
//! midnight that starts the service day. Offsets beyond 24 hours belong to
//! trips that run past midnight but are scheduled on the previous day.

use chrono::{DateTime, TimeZone, Utc};

use super::departure::Departure;

/// Source of the current instant.
///
/// Board rendering never reads the wall clock directly so that labels can
/// be computed for any chosen "now".
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Absolute instant of a departure, using the realtime estimate when the
/// departure is tracked.
///
/// `service_day` is already the instant of the feed's local midnight, so the
/// result does not depend on `tz`; the zone only controls how it renders.
/// Returns `None` only when the result falls outside chrono's range.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, Timelike};
/// use transit_board::domain::departure_instant;
/// # use transit_board::domain::{Departure, GtfsId, RealtimeState, Trip};
/// # let departure = Departure {
/// #     scheduled_arrival: 0, realtime_arrival: 0, arrival_delay: 0,
/// #     scheduled_departure: 25 * 3600, realtime_departure: 25 * 3600, departure_delay: 0,
/// #     realtime: false, realtime_state: RealtimeState::Scheduled,
/// #     // 2024-03-15 00:00 at UTC+2
/// #     service_day: 1_710_453_600, headsign: String::new(),
/// #     trip: Trip { route_short_name: "N".into(), gtfs_id: GtfsId::parse("HSL:N").unwrap() },
/// # };
/// let tz = FixedOffset::east_opt(2 * 3600).unwrap();
/// // 25 hours after midnight is 01:00 the next day
/// let at = departure_instant(&departure, &tz).unwrap();
/// assert_eq!((at.hour(), at.minute()), (1, 0));
/// ```
pub fn departure_instant<Tz: TimeZone>(departure: &Departure, tz: &Tz) -> Option<DateTime<Tz>> {
    let epoch = departure
        .service_day
        .checked_add(departure.effective_departure())?;
    Some(DateTime::from_timestamp(epoch, 0)?.with_timezone(tz))
}

/// Whole minutes from `now` until `at`, rounded to nearest with halves
/// rounded up (so -1.5 becomes -1 and 2.5 becomes 3).
pub fn minutes_until<Tz: TimeZone>(at: &DateTime<Tz>, now: &DateTime<Tz>) -> i64 {
    let millis = at.clone().signed_duration_since(now.clone()).num_milliseconds();
    millis.saturating_add(30_000).div_euclid(60_000)
}
