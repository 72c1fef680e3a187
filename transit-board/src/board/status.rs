//! Realtime tracking status of a departure.

use std::fmt;

use crate::domain::Departure;

/// Whether a departure is tracked, and by how much it deviates from the
/// timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    Scheduled,
    /// `delay` is the departure delay in seconds; negative when early.
    Realtime { delay: i64 },
}

impl Tracking {
    pub fn of(departure: &Departure) -> Self {
        if departure.realtime {
            Tracking::Realtime {
                delay: departure.departure_delay,
            }
        } else {
            Tracking::Scheduled
        }
    }

    /// Delay rounded to whole minutes, halves rounding up. `None` when the
    /// departure is untracked or exactly on time.
    pub fn delay_minutes(&self) -> Option<i64> {
        match *self {
            Tracking::Realtime { delay } if delay != 0 => {
                Some(delay.saturating_add(30).div_euclid(60))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Tracking {
    /// `Scheduled`, `Real-time`, `Real-time (+2 min)` or `Real-time (-1 min)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tracking::Scheduled => f.write_str("Scheduled"),
            Tracking::Realtime { delay } => {
                f.write_str("Real-time")?;
                match self.delay_minutes() {
                    // A small delay can still round to zero; the sign
                    // follows the raw delay.
                    Some(minutes) if *delay > 0 => write!(f, " (+{minutes} min)"),
                    Some(minutes) => write!(f, " ({minutes} min)"),
                    None => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GtfsId, RealtimeState, Trip};

    fn dep(realtime: bool, delay: i64) -> Departure {
        let offset = 36_000;
        Departure {
            scheduled_arrival: offset,
            realtime_arrival: offset + delay,
            arrival_delay: delay,
            scheduled_departure: offset,
            realtime_departure: offset + delay,
            departure_delay: delay,
            realtime,
            realtime_state: if realtime {
                RealtimeState::Updated
            } else {
                RealtimeState::Scheduled
            },
            service_day: 1_710_453_600,
            headsign: "Kamppi".to_string(),
            trip: Trip {
                route_short_name: "550".to_string(),
                gtfs_id: GtfsId::parse("HSL:550_1").unwrap(),
            },
        }
    }

    fn shown(realtime: bool, delay: i64) -> String {
        Tracking::of(&dep(realtime, delay)).to_string()
    }

    #[test]
    fn late_departure_shows_positive_delay() {
        assert_eq!(shown(true, 120), "Real-time (+2 min)");
        assert_eq!(shown(true, 90), "Real-time (+2 min)");
        assert_eq!(shown(true, 89), "Real-time (+1 min)");
    }

    #[test]
    fn early_departure_shows_negative_delay() {
        assert_eq!(shown(true, -60), "Real-time (-1 min)");
        // -1.5 rounds up to -1
        assert_eq!(shown(true, -90), "Real-time (-1 min)");
        assert_eq!(shown(true, -91), "Real-time (-2 min)");
    }

    #[test]
    fn on_time_departure_has_no_delay() {
        assert_eq!(shown(true, 0), "Real-time");
        assert_eq!(Tracking::of(&dep(true, 0)).delay_minutes(), None);
    }

    #[test]
    fn small_delays_round_to_zero() {
        assert_eq!(shown(true, 20), "Real-time (+0 min)");
        assert_eq!(shown(true, -20), "Real-time (0 min)");
    }

    #[test]
    fn untracked_departure_ignores_delay() {
        assert_eq!(shown(false, 0), "Scheduled");
        assert_eq!(shown(false, 300), "Scheduled");
        assert_eq!(Tracking::of(&dep(false, 300)), Tracking::Scheduled);
    }
}
