use itemreg::{Item, RedbRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    #[serde(rename = "Name")]
    pub name: String,
}

pub fn named(id: &str, name: &str) -> Item<Named> {
    Item::new(id, Named { name: name.to_string() })
}

/// A registry in a fresh temporary directory; keep the directory alive
/// for as long as the registry is used
pub fn temp_registry() -> (RedbRegistry<Named>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let registry = RedbRegistry::open(dir.path()).expect("Failed to open registry");
    (registry, dir)
}

pub fn set_of<I, S>(values: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
