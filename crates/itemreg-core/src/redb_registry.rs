//! redb-backed registry

use crate::codec::{decode, encode};
use crate::error::Fault;
use crate::{Filter, Item, Operation, Registry, RegistryError, RegistryOptions, Result};
use itemreg_storage::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info};

/// Persistent registry backed by a redb [`Store`]
///
/// Owns its store exclusively. The registry keeps no cache: every call
/// opens a fresh transaction, so one instance can be shared between
/// threads behind an `Arc`.
pub struct RedbRegistry<T> {
    store: Store,
    scan_batch: usize,
    _payload: PhantomData<fn() -> T>,
}

impl<T> RedbRegistry<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open (or create) a registry in the directory `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(dir, &RegistryOptions::default())
    }

    /// Open (or create) a registry in `dir` with explicit options
    pub fn open_with(dir: impl AsRef<Path>, options: &RegistryOptions) -> Result<Self> {
        let store = Store::open(dir, &options.store)
            .map_err(|source| RegistryError::Storage { op: Operation::Open, source })?;
        info!(path = %store.path().display(), scan_batch = options.scan_batch, "opened registry");

        Ok(Self::from_store(store).with_scan_batch(options.scan_batch))
    }

    /// Attach a registry to an already open store
    pub fn from_store(store: Store) -> Self {
        Self {
            store,
            scan_batch: crate::DEFAULT_SCAN_BATCH,
            _payload: PhantomData,
        }
    }

    pub fn with_scan_batch(mut self, scan_batch: usize) -> Self {
        self.scan_batch = scan_batch.max(1);
        self
    }

    /// The underlying store
    ///
    /// Writes made directly through the store bypass payload encoding.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Release the storage handle
    pub fn close(self) {
        self.store.close();
    }
}

impl<T> Registry<T> for RedbRegistry<T>
where
    T: Serialize + DeserializeOwned,
{
    fn create_or_update(&self, item: Item<T>) -> Result<Item<T>> {
        let op = Operation::CreateOrUpdate;
        let bytes = encode(&item).map_err(|fault| fault.during(op))?;

        self.store
            .write(|scope| {
                scope.put(&item.id, &bytes)?;
                Ok::<_, Fault>(())
            })
            .map_err(|fault| fault.during(op))?;

        debug!(id = %item.id, bytes = bytes.len(), "stored item");
        Ok(item)
    }

    fn read(&self, id: &str) -> Result<Item<T>> {
        self.store
            .read(|scope| {
                let bytes = scope.get(id)?.ok_or_else(|| Fault::NotFound(id.to_string()))?;
                decode(id, &bytes)
            })
            .map_err(|fault| fault.during(Operation::Read))
    }

    // Lookup and removal share one write transaction, so the returned item
    // is exactly the one removed. A record that fails to decode is left in
    // place.
    fn delete(&self, id: &str) -> Result<Item<T>> {
        let item = self
            .store
            .write(|scope| {
                let bytes = scope.remove(id)?.ok_or_else(|| Fault::NotFound(id.to_string()))?;
                decode(id, &bytes)
            })
            .map_err(|fault| fault.during(Operation::Delete))?;

        debug!(id, "deleted item");
        Ok(item)
    }

    fn list_items(&self, filter: &dyn Filter<T>) -> Result<Vec<Item<T>>> {
        let mut items = Vec::new();
        let mut scanned = 0usize;

        self.store
            .read(|scope| {
                scope.scan(self.scan_batch, |batch| {
                    scanned += batch.len();
                    for entry in batch {
                        let item = decode(&entry.key, &entry.value)?;
                        if filter.matches(&item) {
                            items.push(item);
                        }
                    }
                    Ok::<_, Fault>(())
                })
            })
            .map_err(|fault| fault.during(Operation::ListItems))?;

        debug!(scanned, matched = items.len(), "listed items");
        Ok(items)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        self.store
            .read(|scope| {
                scope.scan_keys(self.scan_batch, |batch| {
                    ids.extend(batch);
                    Ok::<_, Fault>(())
                })
            })
            .map_err(|fault| fault.during(Operation::ListIds))?;

        debug!(count = ids.len(), "listed ids");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{All, ErrorKind};
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        name: String,
        size: u32,
    }

    fn widget(id: &str, size: u32) -> Item<Widget> {
        Item::new(id, Widget { name: format!("widget {id}"), size })
    }

    fn corrupt(registry: &RedbRegistry<Widget>, id: &str) {
        registry
            .store()
            .write(|scope| scope.put(id, b"{not json"))
            .unwrap();
    }

    #[test]
    fn test_stored_value_is_item_json() {
        let dir = tempdir().unwrap();
        let registry = RedbRegistry::<Widget>::open(dir.path()).unwrap();

        registry.create_or_update(widget("w1", 3)).unwrap();

        let raw = registry
            .store()
            .read(|scope| scope.get("w1"))
            .unwrap()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "w1", "data": {"name": "widget w1", "size": 3}})
        );
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();

        {
            let registry = RedbRegistry::<Widget>::open(dir.path()).unwrap();
            registry.create_or_update(widget("kept", 1)).unwrap();
            registry.close();
        }

        {
            let registry = RedbRegistry::<Widget>::open(dir.path()).unwrap();
            assert_eq!(registry.read("kept").unwrap(), widget("kept", 1));
        }
    }

    #[test]
    fn test_open_fails_while_database_is_held() {
        let dir = tempdir().unwrap();
        let _held = RedbRegistry::<Widget>::open(dir.path()).unwrap();

        let err = RedbRegistry::<Widget>::open(dir.path()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.operation(), Operation::Open);
        assert!(err.to_string().starts_with("failed to open database: "));
    }

    #[test]
    fn test_read_corrupt_record() {
        let dir = tempdir().unwrap();
        let registry = RedbRegistry::<Widget>::open(dir.path()).unwrap();
        corrupt(&registry, "bad");

        let err = registry.read("bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
        assert!(err.to_string().starts_with("failed to read item: "));
    }

    #[test]
    fn test_list_items_fails_fast_on_corrupt_record() {
        let dir = tempdir().unwrap();
        let registry = RedbRegistry::<Widget>::open(dir.path()).unwrap();
        registry.create_or_update(widget("a", 1)).unwrap();
        registry.create_or_update(widget("c", 2)).unwrap();
        corrupt(&registry, "b");

        let err = registry.list_items(&All).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
        assert_eq!(err.operation(), Operation::ListItems);

        // Keys are still enumerable without decoding values
        let ids = registry.list_ids().unwrap();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_delete_corrupt_record_rolls_back() {
        let dir = tempdir().unwrap();
        let registry = RedbRegistry::<Widget>::open(dir.path()).unwrap();
        corrupt(&registry, "bad");

        let err = registry.delete("bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deserialization);
        assert_eq!(registry.list_ids().unwrap(), vec!["bad"]);
    }

    #[test]
    fn test_small_scan_batch_lists_everything() {
        let dir = tempdir().unwrap();
        let options = RegistryOptions {
            scan_batch: 2,
            ..RegistryOptions::default()
        };
        let registry = RedbRegistry::<Widget>::open_with(dir.path(), &options).unwrap();

        for i in 0..7 {
            registry.create_or_update(widget(&format!("w{i}"), i)).unwrap();
        }

        let even = registry
            .list_items(&|item: &Item<Widget>| item.data.size % 2 == 0)
            .unwrap();
        assert_eq!(even.len(), 4);
        assert_eq!(registry.list_ids().unwrap().len(), 7);
    }

    #[test]
    fn test_zero_scan_batch_is_clamped() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path(), &Default::default()).unwrap();
        let registry = RedbRegistry::<Widget>::from_store(store).with_scan_batch(0);

        registry.create_or_update(widget("only", 1)).unwrap();
        assert_eq!(registry.list_items(&All).unwrap().len(), 1);
        assert!(registry.path().ends_with("registry.redb"));
    }
}
