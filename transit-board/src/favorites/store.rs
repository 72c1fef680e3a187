//! The user's favorite stops.

use tracing::{debug, warn};

use crate::domain::{GtfsId, Stop};

use super::storage::KeyValueStore;

/// Storage key holding the favorites as a JSON array.
pub const FAVORITES_KEY: &str = "favoriteStops";

/// Result of [`FavoritesStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyFavorite,
}

/// Ordered set of favorite stops, unique by GTFS id.
///
/// Every mutation writes the whole collection back to the underlying store.
/// Storage failures are logged and otherwise ignored: the in-memory list
/// stays authoritative for the rest of the session.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    store: S,
    stops: Vec<Stop>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Load favorites from `store`.
    ///
    /// Missing data is an empty list. Unreadable or corrupt data is logged
    /// and also treated as empty. Duplicate ids keep their first occurrence.
    pub fn load(store: S) -> Self {
        let stops = match store.get(FAVORITES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Stop>>(&json) {
                Ok(stops) => dedupe(stops),
                Err(e) => {
                    warn!(error = %e, "stored favorites are corrupt; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read favorites; starting empty");
                Vec::new()
            }
        };
        debug!(count = stops.len(), "loaded favorites");

        Self { store, stops }
    }

    /// Append `stop` unless a stop with the same id is already present.
    pub fn add(&mut self, stop: Stop) -> AddOutcome {
        if self.contains(&stop.gtfs_id) {
            return AddOutcome::AlreadyFavorite;
        }
        self.stops.push(stop);
        self.persist();
        AddOutcome::Added
    }

    /// Remove the stop with `id`, returning it if it was present.
    pub fn remove(&mut self, id: &GtfsId) -> Option<Stop> {
        let index = self.stops.iter().position(|s| &s.gtfs_id == id)?;
        let removed = self.stops.remove(index);
        self.persist();
        Some(removed)
    }

    /// Favorites in the order they were added.
    pub fn list(&self) -> &[Stop] {
        &self.stops
    }

    pub fn contains(&self, id: &GtfsId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &GtfsId) -> Option<&Stop> {
        self.stops.iter().find(|s| &s.gtfs_id == id)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.stops) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialize favorites");
                return;
            }
        };
        if let Err(e) = self.store.set(FAVORITES_KEY, &json) {
            warn!(error = %e, "could not save favorites");
        }
    }
}

fn dedupe(stops: Vec<Stop>) -> Vec<Stop> {
    let mut unique: Vec<Stop> = Vec::with_capacity(stops.len());
    for stop in stops {
        if !unique.iter().any(|s| s.gtfs_id == stop.gtfs_id) {
            unique.push(stop);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VehicleMode;
    use crate::favorites::{FileStore, MemoryStore, StorageError};
    use tempfile::tempdir;

    fn stop(id: &str, name: &str) -> Stop {
        Stop {
            gtfs_id: GtfsId::parse(id).unwrap(),
            name: name.to_string(),
            code: None,
            vehicle_mode: Some(VehicleMode::Bus),
        }
    }

    fn id(s: &str) -> GtfsId {
        GtfsId::parse(s).unwrap()
    }

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable {
                message: "disabled".into(),
            })
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable {
                message: "disabled".into(),
            })
        }
    }

    #[test]
    fn add_is_idempotent_by_id() {
        let mut favorites = FavoritesStore::load(MemoryStore::new());
        assert_eq!(favorites.add(stop("HSL:1", "Kamppi")), AddOutcome::Added);
        assert_eq!(
            favorites.add(stop("HSL:1", "Kamppi (renamed)")),
            AddOutcome::AlreadyFavorite
        );
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.list()[0].name, "Kamppi");
    }

    #[test]
    fn keeps_insertion_order() {
        let mut favorites = FavoritesStore::load(MemoryStore::new());
        favorites.add(stop("HSL:2", "Rautatientori"));
        favorites.add(stop("HSL:1", "Kamppi"));
        let ids: Vec<&str> = favorites.list().iter().map(|s| s.gtfs_id.as_str()).collect();
        assert_eq!(ids, ["HSL:2", "HSL:1"]);
    }

    #[test]
    fn remove_returns_the_stop() {
        let mut favorites = FavoritesStore::load(MemoryStore::new());
        favorites.add(stop("HSL:1", "Kamppi"));
        favorites.add(stop("HSL:2", "Rautatientori"));

        assert_eq!(favorites.remove(&id("HSL:1")).unwrap().name, "Kamppi");
        assert!(favorites.remove(&id("HSL:1")).is_none());
        assert!(!favorites.contains(&id("HSL:1")));
        assert!(favorites.contains(&id("HSL:2")));
    }

    #[test]
    fn persists_across_loads() {
        let dir = tempdir().unwrap();

        let mut favorites = FavoritesStore::load(FileStore::new(dir.path()));
        favorites.add(stop("HSL:1", "Kamppi"));
        favorites.add(stop("HSL:2", "Rautatientori"));
        favorites.remove(&id("HSL:1"));

        let reloaded = FavoritesStore::load(FileStore::new(dir.path()));
        assert_eq!(reloaded.list(), [stop("HSL:2", "Rautatientori")]);
    }

    #[test]
    fn writes_the_whole_collection_as_json() {
        let dir = tempdir().unwrap();
        let mut favorites = FavoritesStore::load(FileStore::new(dir.path()));
        favorites.add(stop("HSL:1", "Kamppi"));

        let json = std::fs::read_to_string(dir.path().join("favoriteStops.json")).unwrap();
        assert_eq!(
            json,
            r#"[{"gtfsId":"HSL:1","name":"Kamppi","vehicleMode":"BUS"}]"#
        );
    }

    #[test]
    fn corrupt_data_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(FAVORITES_KEY, "{not json").unwrap();
        assert!(FavoritesStore::load(store).is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut store = MemoryStore::new();
        store
            .set(
                FAVORITES_KEY,
                r#"[{"gtfsId":"HSL:1","name":"First"},{"gtfsId":"HSL:2","name":"Other"},{"gtfsId":"HSL:1","name":"Second"}]"#,
            )
            .unwrap();

        let favorites = FavoritesStore::load(store);
        assert_eq!(favorites.len(), 2);
        assert_eq!(favorites.get(&id("HSL:1")).unwrap().name, "First");
    }

    #[test]
    fn unavailable_storage_degrades_to_memory() {
        let mut favorites = FavoritesStore::load(BrokenStore);
        assert!(favorites.is_empty());

        assert_eq!(favorites.add(stop("HSL:1", "Kamppi")), AddOutcome::Added);
        assert!(favorites.contains(&id("HSL:1")));
        assert!(favorites.remove(&id("HSL:1")).is_some());
    }
}
