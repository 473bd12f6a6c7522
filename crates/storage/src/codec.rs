//! Byte layout of every persisted record.
//!
//! # Key layout
//!
//! | Key | Record |
//! |-----|--------|
//! | 14 | high-score table |
//! | 15 | save counter |
//! | 16 + slot | slot metadata |
//! | 32 + slot * 10 | game header of the slot's save |
//! | 32 + slot * 10 + 1..=6 | board chunks 0..=5 |
//!
//! All integers are little-endian and every record except the high-score
//! table has a fixed size, so a size mismatch marks a record as corrupt.

use blocktris_core::{
    calculate_level, Board, HighScoreTable, Piece, PieceShape, Position, SessionSnapshot, BOARD_SIZE,
};

use crate::kv::Key;
use crate::slots::SaveSlot;
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, HIGH_SCORE_CAPACITY};

pub const HIGH_SCORES_KEY: Key = 14;
pub const SAVE_COUNTER_KEY: Key = 15;
pub const META_BASE: Key = 16;
pub const DATA_BASE: Key = 32;
pub const DATA_STRIDE: Key = 10;

/// Board chunks per save
pub const CHUNK_COUNT: usize = 6;
/// Bytes per board chunk
pub const CHUNK_LEN: usize = BOARD_SIZE / CHUNK_COUNT;

pub const FORMAT_VERSION: u8 = 1;
pub const HEADER_LEN: usize = 39;
pub const SLOT_NAME_CAPACITY: usize = 16;
pub const SLOT_META_LEN: usize = 6 + SLOT_NAME_CAPACITY;
pub const COUNTER_LEN: usize = 4;

const _: () = assert!(CHUNK_LEN * CHUNK_COUNT == BOARD_SIZE);

/// Highest anchor row a stored piece may have above the board
const MIN_ANCHOR_Y: i16 = -2;

pub fn meta_key(slot: usize) -> Key {
    META_BASE + slot as Key
}

pub fn header_key(slot: usize) -> Key {
    DATA_BASE + slot as Key * DATA_STRIDE
}

pub fn chunk_key(slot: usize, chunk: usize) -> Key {
    header_key(slot) + 1 + chunk as Key
}

/// Decoded game header: everything in a save except the board cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHeader {
    /// Timestamp of the slot this header was written for
    pub generation: u32,
    pub active: Piece,
    pub next: PieceKind,
    pub position: Position,
    pub lines: u32,
    pub level: u32,
    pub score: u32,
    pub board_hash: u64,
}

/// FNV-1a 64-bit
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

pub fn encode_header(snapshot: &SessionSnapshot, generation: u32) -> [u8; HEADER_LEN] {
    let mut w = Writer::<HEADER_LEN>::new();
    w.u8(FORMAT_VERSION);
    w.u32(generation);
    w.u8(snapshot.active.color_id());
    for &(dx, dy) in &snapshot.active.offsets {
        w.i8(dx);
        w.i8(dy);
    }
    w.u8(snapshot.next.color_id());
    w.i16(snapshot.position.x);
    w.i16(snapshot.position.y);
    w.u32(snapshot.lines);
    w.u32(snapshot.level);
    w.u32(snapshot.score);
    w.u64(fnv1a64(&snapshot.board.to_bytes()));
    w.finish()
}

pub fn decode_header(bytes: &[u8]) -> Option<GameHeader> {
    if bytes.len() != HEADER_LEN {
        return None;
    }
    let mut r = Reader::new(bytes);
    if r.u8()? != FORMAT_VERSION {
        return None;
    }
    let generation = r.u32()?;
    let kind = PieceKind::from_color_id(r.u8()?)?;
    let mut offsets: PieceShape = [(0, 0); 4];
    for offset in offsets.iter_mut() {
        *offset = (r.i8()?, r.i8()?);
    }
    let active = Piece::from_parts(kind, offsets)?;
    let next = PieceKind::from_color_id(r.u8()?)?;
    let position = Position::new(r.i16()?, r.i16()?);
    if !(0..BOARD_WIDTH as i16).contains(&position.x)
        || !(MIN_ANCHOR_Y..BOARD_HEIGHT as i16).contains(&position.y)
    {
        return None;
    }
    let lines = r.u32()?;
    let level = r.u32()?;
    // Level never falls below what the cleared lines give
    if level < calculate_level(lines) {
        return None;
    }
    Some(GameHeader {
        generation,
        active,
        next,
        position,
        lines,
        level,
        score: r.u32()?,
        board_hash: r.u64()?,
    })
}

/// Split the board into its fixed-size chunks, in write order.
pub fn board_chunks(board: &Board) -> [[u8; CHUNK_LEN]; CHUNK_COUNT] {
    let bytes = board.to_bytes();
    let mut chunks = [[0u8; CHUNK_LEN]; CHUNK_COUNT];
    for (chunk, src) in chunks.iter_mut().zip(bytes.chunks_exact(CHUNK_LEN)) {
        chunk.copy_from_slice(src);
    }
    chunks
}

/// Rebuild a snapshot from a header and the concatenated board chunks.
/// Returns None if the board bytes are invalid or do not match the header hash.
pub fn assemble_snapshot(header: &GameHeader, board_bytes: &[u8]) -> Option<SessionSnapshot> {
    if fnv1a64(board_bytes) != header.board_hash {
        return None;
    }
    let board = Board::from_bytes(board_bytes)?;
    Some(SessionSnapshot {
        board,
        active: header.active,
        position: header.position,
        next: Piece::new(header.next),
        level: header.level,
        lines: header.lines,
        score: header.score,
    })
}

pub fn encode_slot(slot: &SaveSlot) -> [u8; SLOT_META_LEN] {
    let name = slot.display_name.as_bytes();
    let name_len = name.len().min(SLOT_NAME_CAPACITY);
    let mut w = Writer::<SLOT_META_LEN>::new();
    w.u8(slot.occupied as u8);
    w.u32(slot.timestamp);
    w.u8(name_len as u8);
    w.bytes(&name[..name_len]);
    w.finish()
}

pub fn decode_slot(bytes: &[u8]) -> Option<SaveSlot> {
    if bytes.len() != SLOT_META_LEN {
        return None;
    }
    let mut r = Reader::new(bytes);
    let occupied = match r.u8()? {
        0 => false,
        1 => true,
        _ => return None,
    };
    let timestamp = r.u32()?;
    let name_len = r.u8()? as usize;
    if name_len > SLOT_NAME_CAPACITY {
        return None;
    }
    let display_name = std::str::from_utf8(r.take(name_len)?).ok()?.to_string();
    Some(SaveSlot {
        occupied,
        timestamp,
        display_name,
    })
}

pub fn encode_counter(counter: u32) -> [u8; COUNTER_LEN] {
    counter.to_le_bytes()
}

pub fn decode_counter(bytes: &[u8]) -> Option<u32> {
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

pub fn encode_high_scores(table: &HighScoreTable) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 4 * table.len());
    out.push(table.len() as u8);
    for score in table.entries() {
        out.extend_from_slice(&score.to_le_bytes());
    }
    out
}

pub fn decode_high_scores(bytes: &[u8]) -> Option<HighScoreTable> {
    let (&count, rest) = bytes.split_first()?;
    let count = count as usize;
    if count > HIGH_SCORE_CAPACITY || rest.len() != count * 4 {
        return None;
    }
    let scores = rest
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]));
    Some(HighScoreTable::from_scores(scores))
}

/// Fixed-size little-endian writer
struct Writer<const N: usize> {
    buf: [u8; N],
    pos: usize,
}

impl<const N: usize> Writer<N> {
    fn new() -> Self {
        Self {
            buf: [0; N],
            pos: 0,
        }
    }

    fn bytes(&mut self, b: &[u8]) {
        self.buf[self.pos..self.pos + b.len()].copy_from_slice(b);
        self.pos += b.len();
    }

    fn u8(&mut self, v: u8) {
        self.bytes(&[v]);
    }

    fn i8(&mut self, v: i8) {
        self.bytes(&v.to_le_bytes());
    }

    fn i16(&mut self, v: i16) {
        self.bytes(&v.to_le_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.bytes(&v.to_le_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.bytes(&v.to_le_bytes());
    }

    /// Remaining bytes stay zero (name padding)
    fn finish(self) -> [u8; N] {
        self.buf
    }
}

struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.buf.len() < n {
            return None;
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Some(head)
    }

    fn array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N)?.try_into().ok()
    }

    fn u8(&mut self) -> Option<u8> {
        Some(self.array::<1>()?[0])
    }

    fn i8(&mut self) -> Option<i8> {
        self.array().map(i8::from_le_bytes)
    }

    fn i16(&mut self) -> Option<i16> {
        self.array().map(i16::from_le_bytes)
    }

    fn u32(&mut self) -> Option<u32> {
        self.array().map(u32::from_le_bytes)
    }

    fn u64(&mut self) -> Option<u64> {
        self.array().map(u64::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn sample_snapshot() -> SessionSnapshot {
        let mut board = Board::new();
        board.set(0, 20, Cell::Filled(PieceKind::S));
        board.set(9, 0, Cell::Filled(PieceKind::I));
        SessionSnapshot {
            board,
            active: Piece::new(PieceKind::J).rotated(),
            position: Position::new(3, -1),
            next: Piece::new(PieceKind::T),
            level: 4,
            lines: 37,
            score: 12_400,
        }
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(meta_key(0), 16);
        assert_eq!(meta_key(4), 20);
        assert_eq!(header_key(0), 32);
        assert_eq!(chunk_key(0, 0), 33);
        assert_eq!(chunk_key(4, 5), 32 + 40 + 6);
        assert_eq!(CHUNK_LEN, 35);
    }

    #[test]
    fn test_header_layout_is_fixed() {
        let snap = sample_snapshot();
        let bytes = encode_header(&snap, 9);
        assert_eq!(bytes[0], FORMAT_VERSION);
        assert_eq!(&bytes[1..5], &9u32.to_le_bytes());
        assert_eq!(bytes[5], PieceKind::J.color_id());

        let header = decode_header(&bytes).unwrap();
        assert_eq!(header.generation, 9);
        assert_eq!(header.active, snap.active);
        assert_eq!(header.position, Position::new(3, -1));
        assert_eq!(header.score, 12_400);
    }

    #[test]
    fn test_header_rejects_wrong_size_and_bad_piece() {
        let bytes = encode_header(&sample_snapshot(), 1);
        assert_eq!(decode_header(&bytes[..HEADER_LEN - 1]), None);

        let mut bad_kind = bytes;
        bad_kind[5] = 0;
        assert_eq!(decode_header(&bad_kind), None);

        // Offsets of a different shape
        let mut bad_offsets = bytes;
        bad_offsets[6] = 5;
        assert_eq!(decode_header(&bad_offsets), None);
    }

    #[test]
    fn test_header_rejects_impossible_fields() {
        let bytes = encode_header(&sample_snapshot(), 1);
        let patched = |at: usize, value: &[u8]| {
            let mut b = bytes;
            b[at..at + value.len()].copy_from_slice(value);
            decode_header(&b)
        };
        // Anchor x at bytes 15..17, y at 17..19
        assert_eq!(patched(15, &10i16.to_le_bytes()), None);
        assert_eq!(patched(15, &(-1i16).to_le_bytes()), None);
        assert_eq!(patched(17, &(-3i16).to_le_bytes()), None);
        assert_eq!(patched(17, &21i16.to_le_bytes()), None);
        assert_eq!(patched(17, &i16::MAX.to_le_bytes()), None);
        assert!(patched(17, &20i16.to_le_bytes()).is_some());

        // Lines at 19..23, level at 23..27
        assert_eq!(patched(23, &0u32.to_le_bytes()), None);
        assert_eq!(patched(19, &u32::MAX.to_le_bytes()), None);
        assert!(patched(23, &10u32.to_le_bytes()).is_some());
    }

    #[test]
    fn test_chunks_reassemble_and_hash_is_checked() {
        let snap = sample_snapshot();
        let header = decode_header(&encode_header(&snap, 1)).unwrap();
        let bytes: Vec<u8> = board_chunks(&snap.board).concat();
        assert_eq!(assemble_snapshot(&header, &bytes), Some(snap));

        let mut tampered = bytes;
        tampered[100] = 3;
        assert_eq!(assemble_snapshot(&header, &tampered), None);
    }

    #[test]
    fn test_slot_meta() {
        let slot = SaveSlot {
            occupied: true,
            timestamp: 42,
            display_name: "Save 42".to_string(),
        };
        let bytes = encode_slot(&slot);
        assert_eq!(bytes.len(), SLOT_META_LEN);
        assert_eq!(decode_slot(&bytes), Some(slot));
        assert_eq!(decode_slot(&bytes[..4]), None);

        let mut bad_flag = bytes;
        bad_flag[0] = 2;
        assert_eq!(decode_slot(&bad_flag), None);
    }

    #[test]
    fn test_high_scores_record() {
        let table = HighScoreTable::from_scores([900, 100, 400]);
        let bytes = encode_high_scores(&table);
        assert_eq!(bytes[0], 3);
        assert_eq!(decode_high_scores(&bytes), Some(table));
        assert_eq!(decode_high_scores(&[2, 0, 0]), None);
        assert_eq!(decode_high_scores(&[]), None);
    }
}
