use thiserror::Error;

use crate::kv::Key;

/// Failure reported by a key-value store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("write rejected for key {key}")]
    WriteFailed { key: Key },
    #[error("read failed for key {key}")]
    ReadFailed { key: Key },
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a save, load or delete.
///
/// None of these are fatal: the operation simply did not happen.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write record {key}")]
    StorageWriteFailed {
        key: Key,
        #[source]
        source: StoreError,
    },
    #[error("failed to read record {key}")]
    StorageReadFailed {
        key: Key,
        #[source]
        source: StoreError,
    },
    #[error("record {key} is missing or corrupt")]
    CorruptOrMissingRecord { key: Key },
    #[error("slot index {0} is out of range")]
    InvalidSlotIndex(usize),
    #[error("slot {0} is empty")]
    EmptySlot(usize),
}

pub type Result<T, E = PersistError> = std::result::Result<T, E>;
