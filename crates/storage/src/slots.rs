//! Save slots: choosing, writing, reading and deleting saved games.
//!
//! A save writes the game header, then the six board chunks, and only after
//! all of them succeeded the save counter and the slot metadata. A slot is
//! therefore never marked occupied by a save that did not finish. If an
//! interrupted save overwrote some of an older save's records in the same
//! slot, the header generation or board hash no longer matches and loading
//! that slot reports it as corrupt.

use log::{debug, info, warn};

use blocktris_core::{HighScoreTable, SessionSnapshot};

use crate::codec::{
    assemble_snapshot, board_chunks, chunk_key, decode_counter, decode_header,
    decode_high_scores, decode_slot, encode_counter, encode_header, encode_high_scores,
    encode_slot, header_key, meta_key, CHUNK_COUNT, CHUNK_LEN, HIGH_SCORES_KEY,
    SAVE_COUNTER_KEY,
};
use crate::error::{PersistError, Result};
use crate::kv::{Key, KeyValueStore};
use crate::types::NUM_SLOTS;

/// Display name of a slot with nothing in it
pub const EMPTY_SLOT_NAME: &str = "Empty";

/// First timestamp handed out on a fresh store
const FIRST_TIMESTAMP: u32 = 1;

/// Metadata of one save slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveSlot {
    pub occupied: bool,
    /// Save counter value at the time of the save; larger is newer.
    pub timestamp: u32,
    pub display_name: String,
}

/// Pick the slot a new save goes to: the first free slot, otherwise the
/// occupied slot with the oldest timestamp (first by index on a tie).
pub fn choose_slot(slots: &[SaveSlot]) -> usize {
    if let Some(free) = slots.iter().position(|s| !s.occupied) {
        return free;
    }
    slots
        .iter()
        .enumerate()
        .min_by_key(|&(index, slot)| (slot.timestamp, index))
        .map_or(0, |(index, _)| index)
}

/// Owns the store and the in-memory copy of the slot table.
#[derive(Debug)]
pub struct SaveManager<S> {
    store: S,
    slots: [SaveSlot; NUM_SLOTS],
    counter: u32,
}

impl<S: KeyValueStore> SaveManager<S> {
    /// Read the slot table and the save counter from `store`.
    ///
    /// Unreadable or corrupt slot metadata counts as an empty slot.
    pub fn open(store: S) -> Self {
        let mut slots: [SaveSlot; NUM_SLOTS] = Default::default();
        for (index, slot) in slots.iter_mut().enumerate() {
            let key = meta_key(index);
            match store.get(key) {
                Ok(Some(bytes)) => match decode_slot(&bytes) {
                    Some(decoded) => *slot = decoded,
                    None => warn!("slot {} metadata is corrupt, treating as empty", index),
                },
                Ok(None) => {}
                Err(e) => warn!("slot {} metadata unreadable: {}", index, e),
            }
        }

        let stored_counter = match store.get(SAVE_COUNTER_KEY) {
            Ok(Some(bytes)) => decode_counter(&bytes),
            Ok(None) => None,
            Err(e) => {
                warn!("save counter unreadable: {}", e);
                None
            }
        };
        // Never hand out a timestamp that an existing slot already has
        let newest = slots
            .iter()
            .filter(|s| s.occupied)
            .map(|s| s.timestamp.saturating_add(1))
            .max()
            .unwrap_or(FIRST_TIMESTAMP);
        let counter = stored_counter.unwrap_or(FIRST_TIMESTAMP).max(newest);

        info!(
            "save slots loaded: {} occupied, next timestamp {}",
            slots.iter().filter(|s| s.occupied).count(),
            counter
        );
        Self {
            store,
            slots,
            counter,
        }
    }

    pub fn slots(&self) -> &[SaveSlot] {
        &self.slots
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// True iff any slot holds a save
    pub fn has_any_save(&self) -> bool {
        self.slots.iter().any(|s| s.occupied)
    }

    /// Stored name of the slot, or `"Empty"` if it is free or out of range.
    pub fn slot_display_name(&self, index: usize) -> &str {
        match self.slots.get(index) {
            Some(slot) if slot.occupied => &slot.display_name,
            _ => EMPTY_SLOT_NAME,
        }
    }

    /// Save `snapshot` into the slot picked by [`choose_slot`] and return its index.
    ///
    /// On failure the in-memory and stored slot metadata are unchanged.
    pub fn save(&mut self, snapshot: &SessionSnapshot) -> Result<usize> {
        let index = choose_slot(&self.slots);
        let timestamp = self.counter;

        self.put(header_key(index), &encode_header(snapshot, timestamp))?;
        for (chunk, bytes) in board_chunks(&snapshot.board).iter().enumerate() {
            self.put(chunk_key(index, chunk), bytes)?;
        }

        let slot = SaveSlot {
            occupied: true,
            timestamp,
            display_name: format!("Save {}", timestamp),
        };
        let next_counter = timestamp.wrapping_add(1);
        self.put(SAVE_COUNTER_KEY, &encode_counter(next_counter))?;
        self.counter = next_counter;
        self.put(meta_key(index), &encode_slot(&slot))?;

        info!("saved to slot {} as {:?}", index, slot.display_name);
        self.slots[index] = slot;
        Ok(index)
    }

    /// Read the save in slot `index` back into a snapshot.
    pub fn load(&self, index: usize) -> Result<SessionSnapshot> {
        let slot = self
            .slots
            .get(index)
            .ok_or(PersistError::InvalidSlotIndex(index))?;
        if !slot.occupied {
            return Err(PersistError::EmptySlot(index));
        }

        let key = header_key(index);
        let header = self
            .get(key)?
            .as_deref()
            .and_then(decode_header)
            .ok_or(PersistError::CorruptOrMissingRecord { key })?;
        if header.generation != slot.timestamp {
            warn!(
                "slot {} header generation {} does not match timestamp {}",
                index, header.generation, slot.timestamp
            );
            return Err(PersistError::CorruptOrMissingRecord { key });
        }

        let mut board_bytes = Vec::with_capacity(CHUNK_COUNT * CHUNK_LEN);
        for chunk in 0..CHUNK_COUNT {
            let key = chunk_key(index, chunk);
            match self.get(key)? {
                Some(bytes) if bytes.len() == CHUNK_LEN => board_bytes.extend_from_slice(&bytes),
                _ => return Err(PersistError::CorruptOrMissingRecord { key }),
            }
        }

        let snapshot = assemble_snapshot(&header, &board_bytes)
            .ok_or(PersistError::CorruptOrMissingRecord { key })?;
        if snapshot.board.collides(snapshot.position, &snapshot.active) {
            warn!("slot {} active piece overlaps its board", index);
            return Err(PersistError::CorruptOrMissingRecord { key });
        }
        info!("loaded slot {} ({})", index, slot.display_name);
        Ok(snapshot)
    }

    /// Free slot `index` and remove all of its records. Records that are
    /// already missing are fine.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        if index >= NUM_SLOTS {
            return Err(PersistError::InvalidSlotIndex(index));
        }
        self.slots[index] = SaveSlot::default();

        self.remove(meta_key(index))?;
        self.remove(header_key(index))?;
        for chunk in 0..CHUNK_COUNT {
            self.remove(chunk_key(index, chunk))?;
        }
        info!("deleted slot {}", index);
        Ok(())
    }

    /// Stored high-score table; empty if missing or unreadable.
    pub fn load_high_scores(&self) -> HighScoreTable {
        match self.store.get(HIGH_SCORES_KEY) {
            Ok(Some(bytes)) => decode_high_scores(&bytes).unwrap_or_else(|| {
                warn!("high-score record is corrupt, starting empty");
                HighScoreTable::new()
            }),
            Ok(None) => HighScoreTable::new(),
            Err(e) => {
                warn!("high-score record unreadable: {}", e);
                HighScoreTable::new()
            }
        }
    }

    pub fn store_high_scores(&mut self, table: &HighScoreTable) -> Result<()> {
        self.put(HIGH_SCORES_KEY, &encode_high_scores(table))
    }

    /// Run store compaction if the backend asks for it. Returns whether it ran.
    pub fn maintain(&mut self) -> bool {
        if !self.store.needs_compaction() {
            return false;
        }
        match self.store.compact() {
            Ok(()) => {
                debug!("store compacted");
                true
            }
            Err(e) => {
                warn!("store compaction failed: {}", e);
                false
            }
        }
    }

    fn put(&mut self, key: Key, bytes: &[u8]) -> Result<()> {
        debug!("put {} ({} bytes)", key, bytes.len());
        self.store.put(key, bytes).map_err(|source| {
            warn!("write of record {} failed: {}", key, source);
            PersistError::StorageWriteFailed { key, source }
        })
    }

    fn get(&self, key: Key) -> Result<Option<Vec<u8>>> {
        self.store
            .get(key)
            .map_err(|source| PersistError::StorageReadFailed { key, source })
    }

    fn remove(&mut self, key: Key) -> Result<()> {
        self.store
            .delete(key)
            .map_err(|source| PersistError::StorageWriteFailed { key, source })
    }
}
