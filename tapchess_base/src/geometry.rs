use crate::types::{PieceKind, Rank, Side};

/// Pieces of the back rank, from file `a` to file `h`
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Number of pieces each side starts with
pub const PIECES_PER_SIDE: u8 = 16;

pub const fn back_rank(s: Side) -> Rank {
    match s {
        Side::White => Rank::R1,
        Side::Black => Rank::R8,
    }
}

pub const fn pawn_rank(s: Side) -> Rank {
    match s {
        Side::White => Rank::R2,
        Side::Black => Rank::R7,
    }
}
