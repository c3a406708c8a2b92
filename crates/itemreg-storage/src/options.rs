//! Options for opening a store

use serde::Deserialize;

/// File name used inside the registry directory when none is configured.
pub const DEFAULT_FILE_NAME: &str = "registry.redb";

/// How a [`Store`](crate::Store) opens its database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Name of the redb file created inside the storage directory
    pub file_name: String,

    /// Page cache size in bytes; `None` keeps redb's default
    pub cache_size: Option<usize>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            cache_size: None,
        }
    }
}

impl StoreOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = StoreOptions::default();
        assert_eq!(options.file_name, DEFAULT_FILE_NAME);
        assert_eq!(options.cache_size, None);
    }

    #[test]
    fn test_builders() {
        let options = StoreOptions::default()
            .with_file_name("items.redb")
            .with_cache_size(1 << 20);
        assert_eq!(options.file_name, "items.redb");
        assert_eq!(options.cache_size, Some(1 << 20));
    }
}
