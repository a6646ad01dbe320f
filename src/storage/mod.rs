// src/storage/mod.rs
//! # Storage Module
//!
//! Key-value persistence in the shape of browser local storage: string keys,
//! string values, whole collections serialized as one JSON document per key.
//! - `MemoryStore` for tests and ephemeral sessions
//! - `JsonFileStore` for persistence across restarts

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::common::LibraryResult;

/// Registered members, a JSON array of `Member`
pub const REGISTERED_USERS_KEY: &str = "registered_users";
/// Borrow records, a JSON array of `BorrowRecord`
pub const BORROW_RECORDS_KEY: &str = "borrow_records";
/// The signed-in `AuthUser`
pub const CURRENT_USER_KEY: &str = "currentUser";

pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> LibraryResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> LibraryResult<()>;
    fn remove_item(&self, key: &str) -> LibraryResult<()>;
    fn clear(&self) -> LibraryResult<()>;
}

/// Load a JSON value stored under `key`, `None` when the key is absent
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> LibraryResult<Option<T>>
where
    T: DeserializeOwned,
{
    match store.get_item(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Load a JSON array stored under `key`; an absent key is an empty collection
pub fn load_collection<T>(store: &dyn KeyValueStore, key: &str) -> LibraryResult<Vec<T>>
where
    T: DeserializeOwned,
{
    let items: Vec<T> = load_json(store, key)?.unwrap_or_default();
    debug!(key = %key, count = items.len(), "Loaded collection from storage");
    Ok(items)
}

/// Load a JSON array stored under `key`, one entry at a time.
///
/// Entries that do not deserialize as `T` are skipped, and a document that
/// is not an array reads as empty. Only unreadable JSON is an error.
pub fn load_collection_skipping_invalid<T>(
    store: &dyn KeyValueStore,
    key: &str,
) -> LibraryResult<Vec<T>>
where
    T: DeserializeOwned,
{
    let entries = match load_json::<serde_json::Value>(store, key)? {
        Some(serde_json::Value::Array(entries)) => entries,
        Some(_) => {
            warn!(key = %key, "Stored collection is not an array, reading as empty");
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    let total = entries.len();
    let items: Vec<T> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(key = %key, index, error = %e, "Skipping unreadable stored entry");
                None
            }
        })
        .collect();
    debug!(
        key = %key,
        count = items.len(),
        skipped = total - items.len(),
        "Loaded collection from storage"
    );
    Ok(items)
}

pub fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> LibraryResult<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw)
}
