//! Departure board presentation.
//!
//! Pure functions that turn a stop's raw departures into display rows, and
//! the ticker that drives their periodic recomputation.
//!
//! Labels such as `"3 min"` depend on the current time, so boards are
//! re-rendered on every tick even though the order only changes when new
//! departures are fetched.

mod label;
mod status;
mod ticker;
mod view;

pub use label::{DepartureLabel, label};
pub use status::Tracking;
pub use ticker::{DEFAULT_TICK, Ticker, TickerStopped};
pub use view::{BoardRow, empty_message, rows, view};
