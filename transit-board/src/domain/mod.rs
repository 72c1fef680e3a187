//! Domain types for the departure board.
//!
//! Stops, departures and the time arithmetic around service days. Types
//! that carry invariants (`GtfsId`, `SearchTerm`) enforce them at
//! construction time.

mod departure;
mod stop;
mod time;

pub use departure::{Departure, RealtimeState, StopDetails, Trip};
pub use stop::{
    GtfsId, InvalidGtfsId, InvalidSearchTerm, InvalidVehicleMode, SearchTerm, Stop,
    StopSearchItem, VehicleMode,
};
pub use time::{Clock, FixedClock, SystemClock, departure_instant, minutes_until};
