//! Itemreg Core - Generic persistent item registry
//!
//! A registry stores [`Item`]s of one payload type under string ids and
//! supports create-or-update, read, delete, filtered listing and id
//! enumeration. Two implementations are provided:
//! - [`RedbRegistry`]: persistent, backed by the redb store in `itemreg-storage`
//! - [`InMemoryRegistry`]: non-persistent, for tests and scratch data
//!
//! Payloads are stored as JSON documents of the whole item
//! (`{"id": ..., "data": ...}`).

mod codec;
mod error;
mod item;
mod memory;
mod options;
mod redb_registry;
mod registry;

pub use error::{ErrorKind, Operation, RegistryError, Result};
pub use item::{All, Filter, Item};
pub use memory::InMemoryRegistry;
pub use options::{RegistryOptions, DEFAULT_SCAN_BATCH};
pub use redb_registry::RedbRegistry;
pub use registry::Registry;
