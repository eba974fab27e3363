//! Error types for storage, persistence and id generation

use thiserror::Error;

/// Boxed codec error so `PersistError` stays independent of the codec in use
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures reported by a key-value store backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key:?} ({needed} bytes needed, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures while loading or saving a persistent value
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("malformed stored entry at {key:?}: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("could not serialize value for {key:?}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("could not persist {key:?}: {source}")]
    Persistence {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl PersistError {
    /// Namespaced storage key the failure relates to
    pub fn key(&self) -> &str {
        match self {
            PersistError::Deserialization { key, .. }
            | PersistError::Serialization { key, .. }
            | PersistError::Persistence { key, .. } => key,
        }
    }
}

/// Requested id range has `min > max`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid id range: min {min} is greater than max {max}")]
pub struct InvalidRangeError {
    pub min: i64,
    pub max: i64,
}
