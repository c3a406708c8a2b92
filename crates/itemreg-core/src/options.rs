//! Registry configuration

use itemreg_storage::StoreOptions;
use serde::Deserialize;

/// Number of entries a listing scan pulls from the store at a time.
pub const DEFAULT_SCAN_BATCH: usize = 50;

/// Options for opening a [`RedbRegistry`](crate::RedbRegistry)
///
/// Deserializable so it can be loaded from a config file; missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
    #[serde(flatten)]
    pub store: StoreOptions,

    /// Look-ahead window for listing scans
    pub scan_batch: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            store: StoreOptions::default(),
            scan_batch: DEFAULT_SCAN_BATCH,
        }
    }
}
