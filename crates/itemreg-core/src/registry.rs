//! Registry trait

use crate::{Filter, Item, Result};

/// CRUD and listing over all items of one payload type
///
/// Every operation runs in its own transaction and is all-or-nothing.
/// Listing order is whatever order the backend iterates keys in; callers
/// must not depend on it.
pub trait Registry<T>: Send + Sync {
    /// Store `item`, replacing any existing item with the same id
    fn create_or_update(&self, item: Item<T>) -> Result<Item<T>>;

    /// Get the item stored under `id`
    fn read(&self, id: &str) -> Result<Item<T>>;

    /// Remove the item stored under `id` and return it
    ///
    /// Deleting an id that does not exist is a `NotFound` error.
    fn delete(&self, id: &str) -> Result<Item<T>>;

    /// All items accepted by `filter`
    ///
    /// Stops at the first record that cannot be decoded.
    fn list_items(&self, filter: &dyn Filter<T>) -> Result<Vec<Item<T>>>;

    /// Ids of all stored items
    fn list_ids(&self) -> Result<Vec<String>>;
}
