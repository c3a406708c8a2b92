//! Itemreg - A generic persistent item registry
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use itemreg_core as registry;
pub use itemreg_storage as storage;

pub use itemreg_core::{
    All, ErrorKind, Filter, InMemoryRegistry, Item, Operation, RedbRegistry, Registry,
    RegistryError, RegistryOptions,
};
