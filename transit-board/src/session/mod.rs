//! Session controller.
//!
//! A [`Session`] ties the favorites store, the transit client and the
//! departure board together. It is owned by a single task; network calls
//! are awaited outside of it and their results applied afterwards, with
//! late results for a stop that is no longer selected being dropped.

mod notifier;
mod state;


pub use notifier::{LogNotifier, Notification, Notifier, Severity};
pub use state::{Board, DeparturesRequest, LOAD_FAILED, STOP_NOT_FOUND, Session, SessionError};
