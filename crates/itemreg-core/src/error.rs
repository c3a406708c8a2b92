//! Error types for registry operations

use itemreg_storage::StorageError;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Registry operation an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Open,
    CreateOrUpdate,
    Read,
    Delete,
    ListItems,
    ListIds,
}

impl Operation {
    /// Stable message prefix for errors raised by this operation
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Open => "failed to open database",
            Operation::CreateOrUpdate => "failed to create or update item",
            Operation::Read => "failed to read item",
            Operation::Delete => "failed to delete item",
            Operation::ListItems => "failed to list items",
            Operation::ListIds => "failed to list ids",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_prefix())
    }
}

/// Classification of a [`RegistryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The storage engine failed to open, commit or iterate
    Storage,
    /// No record exists under the requested id
    NotFound,
    /// The payload could not be encoded
    Serialization,
    /// Stored bytes could not be decoded into the payload type
    Deserialization,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{op}: {source}")]
    Storage {
        op: Operation,
        #[source]
        source: StorageError,
    },

    #[error("{op}: item not found: {id}")]
    NotFound { op: Operation, id: String },

    #[error("{op}: cannot serialize item {id}: {source}")]
    Serialization {
        op: Operation,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{op}: cannot deserialize item {id}: {source}")]
    Deserialization {
        op: Operation,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Storage { .. } => ErrorKind::Storage,
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::Serialization { .. } => ErrorKind::Serialization,
            RegistryError::Deserialization { .. } => ErrorKind::Deserialization,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            RegistryError::Storage { op, .. }
            | RegistryError::NotFound { op, .. }
            | RegistryError::Serialization { op, .. }
            | RegistryError::Deserialization { op, .. } => *op,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Failure inside a registry operation, before it is tagged with the
/// operation that raised it
#[derive(Debug)]
pub(crate) enum Fault {
    Storage(StorageError),
    NotFound(String),
    Serialization(String, serde_json::Error),
    Deserialization(String, serde_json::Error),
}

impl Fault {
    pub(crate) fn during(self, op: Operation) -> RegistryError {
        match self {
            Fault::Storage(source) => RegistryError::Storage { op, source },
            Fault::NotFound(id) => RegistryError::NotFound { op, id },
            Fault::Serialization(id, source) => RegistryError::Serialization { op, id, source },
            Fault::Deserialization(id, source) => RegistryError::Deserialization { op, id, source },
        }
    }
}

impl From<StorageError> for Fault {
    fn from(err: StorageError) -> Self {
        Fault::Storage(err)
    }
}
