//! Save/load subsystem: a small integer-keyed record store and the codec that
//! maps game snapshots, slot metadata and high scores onto it.
//!
//! - [`kv`]: the [`KeyValueStore`] trait and the in-memory [`MemoryStore`]
//! - [`file_store`]: a JSON-file-backed store for desktop hosts
//! - [`codec`]: key layout and byte format of every record
//! - [`slots`]: the five save slots and the [`SaveManager`] that owns them
//! - [`error`]: store and persistence errors

pub mod codec;
pub mod error;
pub mod file_store;
pub mod kv;
pub mod slots;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use error::{PersistError, StoreError};
pub use file_store::JsonFileStore;
pub use kv::{Key, KeyValueStore, MemoryStore};
pub use slots::{choose_slot, SaveManager, SaveSlot, EMPTY_SLOT_NAME};
