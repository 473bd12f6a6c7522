//! Pieces module tests - shapes, spawn and rotation

use blocktris::core::{get_shape, Piece, Position, SPAWN_POSITION};
use blocktris::types::PieceKind;

#[test]
fn test_shape_table() {
    assert_eq!(get_shape(PieceKind::I), [(-1, 0), (0, 0), (1, 0), (2, 0)]);
    assert_eq!(get_shape(PieceKind::O), [(0, 0), (1, 0), (0, 1), (1, 1)]);
    assert_eq!(get_shape(PieceKind::T), [(-1, 0), (0, 0), (1, 0), (0, 1)]);
    assert_eq!(get_shape(PieceKind::L), [(1, -1), (-1, 0), (0, 0), (1, 0)]);
    assert_eq!(get_shape(PieceKind::J), [(-1, -1), (-1, 0), (0, 0), (1, 0)]);
    assert_eq!(get_shape(PieceKind::S), [(0, 0), (1, 0), (-1, 1), (0, 1)]);
    assert_eq!(get_shape(PieceKind::Z), [(-1, 0), (0, 0), (0, 1), (1, 1)]);
}

#[test]
fn test_color_ids() {
    let ids: Vec<u8> = PieceKind::ALL
        .iter()
        .map(|&k| Piece::new(k).color_id())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_spawn_position() {
    assert_eq!(SPAWN_POSITION, Position::new(4, 0));
}

#[test]
fn test_o_rotation_is_identity() {
    let o = Piece::new(PieceKind::O);
    let mut piece = o;
    for _ in 0..4 {
        piece = piece.rotated();
        assert_eq!(piece, o);
    }
}

#[test]
fn test_quarter_turn() {
    let t = Piece::new(PieceKind::T).rotated();
    // (x, y) -> (-y, x)
    assert_eq!(t.offsets, [(0, -1), (0, 0), (0, 1), (-1, 0)]);
    assert_eq!(t.kind, PieceKind::T);
}

#[test]
fn test_four_turns_return_to_spawn() {
    for kind in PieceKind::ALL {
        let spawn = Piece::new(kind);
        let turned = spawn.rotated().rotated().rotated().rotated();
        assert_eq!(turned, spawn, "{:?}", kind);
    }
}

#[test]
fn test_rotation_does_not_mutate() {
    let i = Piece::new(PieceKind::I);
    let _ = i.rotated();
    assert_eq!(i.offsets, get_shape(PieceKind::I));
}

#[test]
fn test_cells_at_offsets_from_anchor() {
    let cells: Vec<(i16, i16)> = Piece::new(PieceKind::I)
        .cells_at(Position::new(4, 0))
        .collect();
    assert_eq!(cells, vec![(3, 0), (4, 0), (5, 0), (6, 0)]);
}
