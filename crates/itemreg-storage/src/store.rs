//! redb-backed store with scoped transactions

use crate::{Result, StorageError, StoreOptions};
use redb::{Database, ReadOnlyTable, ReadableTable, ReadableTableMetadata, Table, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// Table definitions
const ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("items");

/// A key and its raw value, as read during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Vec<u8>,
}

/// Owner of one open redb database
///
/// All data lives in a single `.redb` file inside the storage directory.
/// redb serializes writers: at most one write transaction exists at a time
/// and `begin_write` blocks until the previous one has finished. Readers
/// run concurrently against MVCC snapshots.
pub struct Store {
    db: Database,
    path: PathBuf,
}

impl Store {
    /// Create or open the store inside `dir`
    ///
    /// Fails if the directory cannot be created or if another handle
    /// already holds the database file.
    pub fn open(dir: impl AsRef<Path>, options: &StoreOptions) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&options.file_name);

        let mut builder = Database::builder();
        if let Some(bytes) = options.cache_size {
            builder.set_cache_size(bytes);
        }
        let db = builder.create(&path)?;

        // Initialize tables so read transactions never see a missing table
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(ITEMS_TABLE)?;
        }
        write_txn.commit()?;

        info!(path = %path.display(), "opened store");
        Ok(Self { db, path })
    }

    /// Get the file path of this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` inside a read-only transaction
    ///
    /// Everything `f` observes comes from one snapshot. The transaction is
    /// released when this returns, whatever `f` returned.
    pub fn read<R, E>(
        &self,
        f: impl FnOnce(&ReadScope) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E>
    where
        E: From<StorageError>,
    {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(ITEMS_TABLE).map_err(StorageError::from)?;
        let scope = ReadScope { table };
        f(&scope)
    }

    /// Run `f` inside a read-write transaction
    ///
    /// Mutations made through the scope are committed only if `f` returns
    /// `Ok`. An `Err` aborts the transaction and discards all of them.
    pub fn write<R, E>(
        &self,
        f: impl FnOnce(&mut WriteScope<'_>) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E>
    where
        E: From<StorageError>,
    {
        let write_txn = self.db.begin_write().map_err(StorageError::from)?;
        let outcome = {
            let table = write_txn.open_table(ITEMS_TABLE).map_err(StorageError::from)?;
            let mut scope = WriteScope { table };
            f(&mut scope)
        };

        match outcome {
            Ok(value) => {
                write_txn.commit().map_err(StorageError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = write_txn.abort() {
                    warn!(error = %abort_err, "failed to roll back write transaction");
                }
                debug!("write transaction rolled back");
                Err(err)
            }
        }
    }

    /// Release the database handle
    pub fn close(self) {
        info!(path = %self.path.display(), "closing store");
        drop(self.db);
    }
}

/// Read access to the items table within one snapshot
pub struct ReadScope {
    table: ReadOnlyTable<&'static str, &'static [u8]>,
}

impl ReadScope {
    /// Get the raw value stored under `key`
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|bytes| bytes.value().to_vec()))
    }

    /// Number of keys in the snapshot
    pub fn len(&self) -> Result<u64> {
        Ok(self.table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Walk every entry in key order
    ///
    /// Entries are handed to `visit` in batches of at most `batch` (a zero
    /// batch is treated as one). An error from `visit` stops the walk.
    pub fn scan<E>(
        &self,
        batch: usize,
        mut visit: impl FnMut(Vec<Entry>) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E>
    where
        E: From<StorageError>,
    {
        let batch = batch.max(1);
        let mut buffer = Vec::with_capacity(batch);

        for entry in self.table.iter().map_err(StorageError::from)? {
            let (key, value) = entry.map_err(StorageError::from)?;
            buffer.push(Entry {
                key: key.value().to_string(),
                value: value.value().to_vec(),
            });
            if buffer.len() == batch {
                visit(std::mem::replace(&mut buffer, Vec::with_capacity(batch)))?;
            }
        }

        if !buffer.is_empty() {
            visit(buffer)?;
        }
        Ok(())
    }

    /// Walk every key in key order without copying values
    pub fn scan_keys<E>(
        &self,
        batch: usize,
        mut visit: impl FnMut(Vec<String>) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E>
    where
        E: From<StorageError>,
    {
        let batch = batch.max(1);
        let mut buffer = Vec::with_capacity(batch);

        for entry in self.table.iter().map_err(StorageError::from)? {
            let (key, _) = entry.map_err(StorageError::from)?;
            buffer.push(key.value().to_string());
            if buffer.len() == batch {
                visit(std::mem::replace(&mut buffer, Vec::with_capacity(batch)))?;
            }
        }

        if !buffer.is_empty() {
            visit(buffer)?;
        }
        Ok(())
    }
}

/// Write access to the items table within one transaction
pub struct WriteScope<'txn> {
    table: Table<'txn, &'static str, &'static [u8]>,
}

impl<'txn> WriteScope<'txn> {
    /// Get the raw value stored under `key`, including uncommitted writes
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|bytes| bytes.value().to_vec()))
    }

    /// Store `value` under `key` (insert or replace)
    pub fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.table.insert(key, value)?;
        Ok(())
    }

    /// Remove `key`, returning the value it held
    pub fn remove(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.table.remove(key)?.map(|bytes| bytes.value().to_vec()))
    }
}
