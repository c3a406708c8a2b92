//! Item and filter types

use serde::{Deserialize, Serialize};

/// A stored record: a unique id and its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item<T> {
    /// Storage key; chosen by the caller and never changed afterwards
    pub id: String,

    /// Caller-defined payload
    pub data: T,
}

impl<T> Item<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Predicate selecting items during a listing
///
/// Filters must be pure. Any `Fn(&Item<T>) -> bool` closure is a filter.
pub trait Filter<T> {
    fn matches(&self, item: &Item<T>) -> bool;
}

impl<T, F> Filter<T> for F
where
    F: Fn(&Item<T>) -> bool,
{
    fn matches(&self, item: &Item<T>) -> bool {
        self(item)
    }
}

/// Filter that accepts every item
#[derive(Debug, Clone, Copy, Default)]
pub struct All;

impl<T> Filter<T> for All {
    fn matches(&self, _item: &Item<T>) -> bool {
        true
    }
}
