//! Departure records as served by the provider.

use serde::{Deserialize, Deserializer, Serialize};

use super::stop::{GtfsId, Stop, VehicleMode};

/// Realtime status of a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealtimeState {
    Scheduled,
    Updated,
    Canceled,
    Added,
    Modified,
}

/// The trip serving a departure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Rider-facing route number, e.g. `"550"` or `"M1"`.
    pub route_short_name: String,
    pub gtfs_id: GtfsId,
}

/// A single departure from a stop.
///
/// All times are seconds offset from `service_day`, which is the unix
/// timestamp of local midnight at the start of the service day. Offsets can
/// exceed 86400 for late-night trips belonging to the previous day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub scheduled_arrival: i64,
    pub realtime_arrival: i64,
    pub arrival_delay: i64,
    pub scheduled_departure: i64,
    pub realtime_departure: i64,
    pub departure_delay: i64,
    pub realtime: bool,
    pub realtime_state: RealtimeState,
    pub service_day: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headsign: String,
    pub trip: Trip,
}

impl Departure {
    /// Departure offset in seconds, preferring the realtime estimate when
    /// the departure is tracked.
    pub fn effective_departure(&self) -> i64 {
        if self.realtime {
            self.realtime_departure
        } else {
            self.scheduled_departure
        }
    }

    /// Absolute departure time in unix seconds.
    pub fn departure_epoch(&self) -> i64 {
        self.service_day.saturating_add(self.effective_departure())
    }

    pub fn is_canceled(&self) -> bool {
        self.realtime_state == RealtimeState::Canceled
    }

    /// Route name of the serving trip.
    pub fn route(&self) -> &str {
        &self.trip.route_short_name
    }
}

/// A stop together with its upcoming departures, in the order received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDetails {
    pub gtfs_id: GtfsId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_mode: Option<VehicleMode>,
    #[serde(rename = "stoptimesWithoutPatterns", default, deserialize_with = "null_as_default")]
    pub departures: Vec<Departure>,
}

impl StopDetails {
    /// The stop record without its departures.
    pub fn stop(&self) -> Stop {
        Stop {
            gtfs_id: self.gtfs_id.clone(),
            name: self.name.clone(),
            code: self.code.clone().filter(|c| !c.is_empty()),
            vehicle_mode: self.vehicle_mode.clone(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
