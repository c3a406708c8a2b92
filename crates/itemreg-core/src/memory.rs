//! In-memory registry implementation for testing

use crate::codec::{decode, encode};
use crate::error::Fault;
use crate::{Filter, Item, Operation, Registry, Result};
use itemreg_storage::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory registry implementation
///
/// Non-persistent: all data is lost when the registry is dropped. Items are
/// encoded exactly as the persistent registry encodes them, so encoding
/// failures surface the same way. Keys iterate in byte order.
pub struct InMemoryRegistry<T> {
    items: RwLock<BTreeMap<String, Vec<u8>>>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> InMemoryRegistry<T> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            _payload: PhantomData,
        }
    }

    fn entries(&self) -> std::result::Result<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>, Fault> {
        self.items
            .read()
            .map_err(|err| Fault::Storage(StorageError::Poisoned(err.to_string())))
    }

    fn entries_mut(
        &self,
    ) -> std::result::Result<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>, Fault> {
        self.items
            .write()
            .map_err(|err| Fault::Storage(StorageError::Poisoned(err.to_string())))
    }
}

impl<T> Default for InMemoryRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> for InMemoryRegistry<T>
where
    T: Serialize + DeserializeOwned,
{
    fn create_or_update(&self, item: Item<T>) -> Result<Item<T>> {
        let op = Operation::CreateOrUpdate;
        let bytes = encode(&item).map_err(|fault| fault.during(op))?;
        self.entries_mut()
            .map_err(|fault| fault.during(op))?
            .insert(item.id.clone(), bytes);
        Ok(item)
    }

    fn read(&self, id: &str) -> Result<Item<T>> {
        let op = Operation::Read;
        let entries = self.entries().map_err(|fault| fault.during(op))?;
        let item = match entries.get(id) {
            Some(bytes) => decode(id, bytes),
            None => Err(Fault::NotFound(id.to_string())),
        }
        .map_err(|fault| fault.during(op))?;
        Ok(item)
    }

    fn delete(&self, id: &str) -> Result<Item<T>> {
        let op = Operation::Delete;
        let mut entries = self.entries_mut().map_err(|fault| fault.during(op))?;

        // Decode before removing so a corrupt record stays in place
        let item = match entries.get(id) {
            Some(bytes) => decode(id, bytes),
            None => Err(Fault::NotFound(id.to_string())),
        }
        .map_err(|fault| fault.during(op))?;

        entries.remove(id);
        Ok(item)
    }

    fn list_items(&self, filter: &dyn Filter<T>) -> Result<Vec<Item<T>>> {
        let op = Operation::ListItems;
        let entries = self.entries().map_err(|fault| fault.during(op))?;

        let mut items = Vec::new();
        for (id, bytes) in entries.iter() {
            let item = decode(id, bytes).map_err(|fault| fault.during(op))?;
            if filter.matches(&item) {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let entries = self
            .entries()
            .map_err(|fault| fault.during(Operation::ListIds))?;
        Ok(entries.keys().cloned().collect())
    }
}
