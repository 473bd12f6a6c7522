//! Fixed-size ranked list of the best final scores.

use arrayvec::ArrayVec;

use crate::types::HIGH_SCORE_CAPACITY;

/// Up to five scores in descending order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: ArrayVec<u32, HIGH_SCORE_CAPACITY>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from stored scores; order is restored and extras beyond
    /// capacity are dropped.
    pub fn from_scores(scores: impl IntoIterator<Item = u32>) -> Self {
        let mut table = Self::new();
        for score in scores {
            table.insert(score);
        }
        table
    }

    /// True when the table has room, or `score` beats its lowest entry.
    pub fn is_high_score(&self, score: u32) -> bool {
        if !self.entries.is_full() {
            return true;
        }
        self.entries.last().map_or(true, |&min| score > min)
    }

    /// Insert keeping descending order, dropping the lowest entry when full.
    ///
    /// Returns the 0-based rank, or None if the score did not qualify.
    pub fn insert(&mut self, score: u32) -> Option<usize> {
        if !self.is_high_score(score) {
            return None;
        }
        if self.entries.is_full() {
            self.entries.pop();
        }
        // Equal scores keep their earlier rank
        let rank = self
            .entries
            .iter()
            .position(|&existing| existing < score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, score);
        Some(rank)
    }

    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All five rows for display, zero-padded
    pub fn padded(&self) -> [u32; HIGH_SCORE_CAPACITY] {
        let mut rows = [0; HIGH_SCORE_CAPACITY];
        rows[..self.entries.len()].copy_from_slice(&self.entries);
        rows
    }
}
