//! Application state for one user session.

use chrono::{DateTime, TimeZone};
use tracing::{debug, info};

use crate::board::{self, BoardRow};
use crate::domain::{GtfsId, SearchTerm, Stop, StopDetails, StopSearchItem, VehicleMode};
use crate::favorites::{AddOutcome, FavoritesStore, KeyValueStore};
use crate::transit::{TransitError, TransitQuery};

use super::notifier::{Notification, Notifier};

/// Board message when the provider does not know the selected stop.
pub const STOP_NOT_FOUND: &str = "Could not find details for this stop.";

/// Board message when departures could not be fetched.
pub const LOAD_FAILED: &str =
    "Failed to load departures. Please check your connection and try again.";

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{0} is not a favorite stop")]
    NotAFavorite(GtfsId),
}

/// What the departure board currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Board {
    /// No stop selected.
    #[default]
    Empty,
    /// Waiting for departures of this stop.
    Loading(GtfsId),
    Ready(StopDetails),
    /// Loading failed; the message is meant for display.
    Failed(String),
}

/// An outstanding departures fetch.
///
/// Carries the stop it was issued for, so a response arriving after the
/// user switched stops can be recognised and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct DeparturesRequest {
    stop_id: GtfsId,
}

impl DeparturesRequest {
    pub fn stop_id(&self) -> &GtfsId {
        &self.stop_id
    }
}

/// Favorites, the selected stop and its departure board.
///
/// The selected stop is always one of the favorites: removing it clears the
/// selection and the board.
#[derive(Debug)]
pub struct Session<S, N> {
    favorites: FavoritesStore<S>,
    selected: Option<GtfsId>,
    board: Board,
    route_filter: String,
    notifier: N,
}

impl<S: KeyValueStore, N: Notifier> Session<S, N> {
    pub fn new(favorites: FavoritesStore<S>, notifier: N) -> Self {
        Self {
            favorites,
            selected: None,
            board: Board::Empty,
            route_filter: String::new(),
            notifier,
        }
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    /// The selected favorite, if any.
    pub fn selected(&self) -> Option<&Stop> {
        self.selected.as_ref().and_then(|id| self.favorites.get(id))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn route_filter(&self) -> &str {
        &self.route_filter
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn add_favorite(&mut self, stop: Stop) -> AddOutcome {
        let name = stop.name.clone();
        let outcome = self.favorites.add(stop);
        let notification = match outcome {
            AddOutcome::Added => Notification::info(
                "Stop Added",
                format!("{name} has been added to your favorites."),
            ),
            AddOutcome::AlreadyFavorite => Notification::info(
                "Already Favorite",
                format!("{name} is already in your favorites."),
            ),
        };
        self.notifier.notify(notification);
        outcome
    }

    /// Remove a favorite; removing the selected stop also clears the board.
    pub fn remove_favorite(&mut self, id: &GtfsId) -> Option<Stop> {
        let removed = self.favorites.remove(id)?;
        if self.selected.as_ref() == Some(id) {
            self.clear_selection();
        }
        self.notifier.notify(Notification::info(
            "Stop Removed",
            "The stop has been removed from your favorites.",
        ));
        Some(removed)
    }

    /// Select a favorite and put the board into loading state.
    ///
    /// The returned request must be completed with
    /// [`apply_departures`](Self::apply_departures).
    pub fn select(&mut self, id: &GtfsId) -> Result<DeparturesRequest, SessionError> {
        if !self.favorites.contains(id) {
            return Err(SessionError::NotAFavorite(id.clone()));
        }
        self.selected = Some(id.clone());
        self.board = Board::Loading(id.clone());
        Ok(DeparturesRequest {
            stop_id: id.clone(),
        })
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.board = Board::Empty;
    }

    /// Complete a departures request.
    ///
    /// Returns `false` without touching the board if the request is stale,
    /// i.e. a different stop (or none) has been selected since it was issued.
    pub fn apply_departures(
        &mut self,
        request: DeparturesRequest,
        result: Result<Option<StopDetails>, TransitError>,
    ) -> bool {
        if self.selected.as_ref() != Some(&request.stop_id) {
            debug!(stop = %request.stop_id, "discarding stale departures");
            return false;
        }

        let name = self
            .favorites
            .get(&request.stop_id)
            .map_or_else(|| request.stop_id.to_string(), |s| s.name.clone());

        self.board = match result {
            Ok(Some(details)) => {
                info!(stop = %request.stop_id, departures = details.departures.len(), "loaded departures");
                Board::Ready(details)
            }
            Ok(None) => {
                self.notifier.notify(Notification::error(
                    "Error",
                    format!("Could not fetch schedule for {name}. Stop details not found."),
                ));
                Board::Failed(STOP_NOT_FOUND.to_string())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(
                    "Network Error",
                    format!("Could not fetch schedule for {name}: {e}"),
                ));
                Board::Failed(LOAD_FAILED.to_string())
            }
        };
        true
    }

    /// Select a favorite and fetch its departures.
    pub async fn load_departures<Q: TransitQuery>(
        &mut self,
        client: &Q,
        id: &GtfsId,
    ) -> Result<(), SessionError> {
        let request = self.select(id)?;
        let result = client.get_stop_departures(request.stop_id()).await;
        self.apply_departures(request, result);
        Ok(())
    }

    /// Search stops by name.
    ///
    /// Terms shorter than three characters are rejected here, without a
    /// request. Every failure (and an empty result) raises a notification.
    pub async fn search<Q: TransitQuery>(
        &mut self,
        client: &Q,
        raw_term: &str,
        modes: &[VehicleMode],
    ) -> Result<Vec<StopSearchItem>, TransitError> {
        let term = match SearchTerm::parse(raw_term) {
            Ok(term) => term,
            Err(e) => {
                self.notifier.notify(Notification::error(
                    "Search term too short",
                    format!(
                        "Please enter at least {} characters to search.",
                        SearchTerm::MIN_CHARS
                    ),
                ));
                return Err(e.into());
            }
        };

        match client.search_stops(&term, modes).await {
            Ok(stops) => {
                if stops.is_empty() {
                    let qualifier = if modes.is_empty() {
                        ""
                    } else {
                        " for the selected vehicle types"
                    };
                    self.notifier.notify(Notification::info(
                        "No stops found",
                        format!("No stops found matching \"{term}\"{qualifier}."),
                    ));
                }
                Ok(stops)
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::error("Search Error", e.to_string()));
                Err(e)
            }
        }
    }

    pub fn set_route_filter(&mut self, filter: impl Into<String>) {
        self.route_filter = filter.into();
    }

    /// Board rows for display at `now`; empty unless departures are loaded.
    pub fn rows<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<BoardRow<'_>> {
        match &self.board {
            Board::Ready(details) => board::rows(&details.departures, &self.route_filter, now),
            _ => Vec::new(),
        }
    }
}
