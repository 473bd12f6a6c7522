//! Pieces module - Tetromino shapes and rotation
//!
//! Every piece is four offsets around an anchor cell. Rotation is a plain
//! quarter turn of the offsets around the anchor, (x, y) -> (-y, x), with no
//! wall kicks: a rotation that would collide is simply rejected by the caller.

use crate::types::{PieceKind, BOARD_WIDTH};

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the anchor
pub type PieceShape = [MinoOffset; 4];

/// Spawn anchor for new pieces
pub const SPAWN_POSITION: Position = Position {
    x: BOARD_WIDTH as i16 / 2 - 1,
    y: 0,
};

/// Get the spawn shape for a piece kind
pub fn get_shape(kind: PieceKind) -> PieceShape {
    match kind {
        PieceKind::I => [(-1, 0), (0, 0), (1, 0), (2, 0)],
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::T => [(-1, 0), (0, 0), (1, 0), (0, 1)],
        PieceKind::L => [(1, -1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::J => [(-1, -1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::S => [(0, 0), (1, 0), (-1, 1), (0, 1)],
        PieceKind::Z => [(-1, 0), (0, 0), (0, 1), (1, 1)],
    }
}

/// Anchor of the active piece on the board. `y` may be negative while a
/// piece is still entering from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Shifted copy; saturates at the `i16` range.
    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// A tetromino in some orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub offsets: PieceShape,
}

impl Piece {
    /// A piece in its spawn orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            offsets: get_shape(kind),
        }
    }

    /// Rebuild a piece from stored parts.
    ///
    /// Returns None unless `offsets` is one of the four orientations of `kind`.
    pub fn from_parts(kind: PieceKind, offsets: PieceShape) -> Option<Self> {
        let mut candidate = Self::new(kind);
        for _ in 0..4 {
            if candidate.offsets == offsets {
                return Some(candidate);
            }
            candidate = candidate.turned();
        }
        None
    }

    pub fn color_id(&self) -> u8 {
        self.kind.color_id()
    }

    /// Quarter turn of the offsets, identity for the O piece.
    ///
    /// Does not check the board; the caller must reject the result if it collides.
    pub fn rotated(&self) -> Self {
        if self.kind.is_rotation_invariant() {
            return *self;
        }
        self.turned()
    }

    fn turned(&self) -> Self {
        let mut offsets = self.offsets;
        for (x, y) in offsets.iter_mut() {
            let old_x = *x;
            *x = -*y;
            *y = old_x;
        }
        Self {
            kind: self.kind,
            offsets,
        }
    }

    /// Absolute cells of the piece anchored at `pos`
    pub fn cells_at(&self, pos: Position) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.offsets.iter().map(move |&(dx, dy)| {
            (
                pos.x.saturating_add(dx as i16),
                pos.y.saturating_add(dy as i16),
            )
        })
    }
}
