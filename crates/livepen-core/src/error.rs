//! Error types for Livepen

use thiserror::Error;

use crate::share::ShareError;
use crate::storage::StorageError;

/// Result type alias using Livepen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Livepen persistence operations
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying key-value store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored value could not be parsed
    #[error("Stored data under `{key}` is corrupt: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized for storage
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A snippet was saved without a name
    #[error("Snippet name must not be empty")]
    EmptySnippetName,

    /// A snippet with this name exists and overwriting was declined
    #[error("A snippet named `{0}` already exists")]
    SnippetExists(String),

    /// Share token could not be produced or read
    #[error(transparent)]
    Share(#[from] ShareError),
}
