//! Itemreg Storage - Transactional key-value adapter
//!
//! This crate owns the single open handle to the embedded redb database
//! backing a registry and hands out scoped transactions over it:
//! - Read scopes observe one consistent snapshot
//! - Write scopes commit atomically, or roll back on any error
//!
//! Keys are strings and values are opaque bytes. Encoding payloads is the
//! caller's job.

mod error;
mod options;
mod store;

pub use error::{StorageError, Result};
pub use options::StoreOptions;
pub use store::{Entry, ReadScope, Store, WriteScope};
