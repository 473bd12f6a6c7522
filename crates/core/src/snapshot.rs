//! Plain-data copy of a game session.
//!
//! This is everything a save slot records: the persistence codec turns it into
//! byte records and back, and [`crate::GameSession::restore`] rebuilds a live
//! session from it.

use crate::board::Board;
use crate::pieces::{Piece, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: Board,
    pub active: Piece,
    pub position: Position,
    /// Always in spawn orientation
    pub next: Piece,
    pub level: u32,
    pub lines: u32,
    pub score: u32,
}
