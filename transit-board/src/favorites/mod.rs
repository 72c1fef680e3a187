//! Favorite stops and where they are kept.

mod storage;
mod store;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{AddOutcome, FAVORITES_KEY, FavoritesStore};
