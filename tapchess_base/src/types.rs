use derive_more::Display;
use std::fmt;
use std::hint;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordParseError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceParseError {
    #[error("unexpected piece char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SideParseError {
    #[error("unexpected side char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

/// Board column, `a` is column 0
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => File::A,
            1 => File::B,
            2 => File::C,
            3 => File::D,
            4 => File::E,
            5 => File::F,
            6 => File::G,
            7 => File::H,
            _ => hint::unreachable_unchecked(),
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(Self::from_index((u32::from(c) - u32::from('a')) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board row
///
/// Ranks are indexed from the top of the board: [`Rank::R8`] (Black's back rank) is row 0 and
/// [`Rank::R1`] (White's back rank) is row 7.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => Rank::R8,
            1 => Rank::R7,
            2 => Rank::R6,
            3 => Rank::R5,
            4 => Rank::R4,
            5 => Rank::R3,
            6 => Rank::R2,
            7 => Rank::R1,
            _ => hint::unreachable_unchecked(),
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Self::from_index((u32::from('8') - u32::from(c)) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'8' - *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// A cell on the board which is guaranteed to be in range
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord(u8);

impl Coord {
    pub const fn from_index(val: usize) -> Coord {
        assert!(val < 64, "coord must be between 0 and 63");
        Coord(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Coord {
        Coord(((rank as u8) << 3) | file as u8)
    }

    /// Returns the cell at `row` and `col`, or `None` if any of them is outside `0..8`
    pub const fn from_row_col(row: i32, col: i32) -> Option<Coord> {
        if !is_in_bounds(row, col) {
            return None;
        }
        Some(Coord(((row as u8) << 3) | col as u8))
    }

    pub const fn file(&self) -> File {
        unsafe { File::from_index_unchecked((self.0 & 7) as usize) }
    }

    pub const fn rank(&self) -> Rank {
        unsafe { Rank::from_index_unchecked((self.0 >> 3) as usize) }
    }

    pub const fn row(&self) -> usize {
        (self.0 >> 3) as usize
    }

    pub const fn col(&self) -> usize {
        (self.0 & 7) as usize
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Coord)
    }
}

/// Returns `true` if `(row, col)` lies on the 8×8 board
#[inline]
pub const fn is_in_bounds(row: i32, col: i32) -> bool {
    0 <= row && row < 8 && 0 <= col && col < 8
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 64 {
            return write!(f, "Coord({})", self);
        }
        write!(f, "Coord(?{:?})", self.0)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file_ch, rank_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file_ch), Some(rank_ch), None) => (file_ch, rank_ch),
            _ => return Err(CoordParseError::BadLength),
        };
        Ok(Coord::from_parts(
            File::from_char(file_ch).ok_or(CoordParseError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(CoordParseError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    pub const fn inv(&self) -> Side {
        match *self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const fn is_white(&self) -> bool {
        matches!(*self, Side::White)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        [Side::White, Side::Black].into_iter()
    }

    pub fn as_char(&self) -> char {
        match *self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'w' => Some(Side::White),
            'b' => Some(Side::Black),
            _ => None,
        }
    }

    pub fn as_long_str(&self) -> &'static str {
        match *self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Side::from_char(ch).ok_or(SideParseError::UnexpectedChar(ch)),
            _ => Err(SideParseError::BadLength),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Rook = 1,
    Knight = 2,
    Bishop = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Symbol drawn for this kind, regardless of side
    pub const fn glyph(&self) -> char {
        match *self {
            PieceKind::Pawn => '♟',
            PieceKind::Rook => '♜',
            PieceKind::Knight => '♞',
            PieceKind::Bishop => '♝',
            PieceKind::Queen => '♛',
            PieceKind::King => '♚',
        }
    }

    pub const fn as_char(&self) -> char {
        match *self {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c {
            'p' => Some(PieceKind::Pawn),
            'r' => Some(PieceKind::Rook),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A game piece
///
/// Pieces have no identity beyond their value: two white pawns are equal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn new(side: Side, kind: PieceKind) -> Piece {
        Piece { kind, side }
    }

    pub const fn is_white(&self) -> bool {
        self.side.is_white()
    }

    pub const fn is_black(&self) -> bool {
        !self.side.is_white()
    }

    /// Returns the ASCII letter of the piece, uppercase for White and lowercase for Black
    pub fn as_char(&self) -> char {
        let c = self.kind.as_char();
        match self.side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// Returns the Unicode chess symbol of the piece, outlined for White and filled for Black
    pub fn as_utf8_char(&self) -> char {
        match self.side {
            Side::White => ['♙', '♖', '♘', '♗', '♕', '♔'][self.kind as usize],
            Side::Black => self.kind.glyph(),
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = PieceKind::from_char(c.to_ascii_lowercase())?;
        Some(Piece::new(side, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Piece::from_char(ch).ok_or(PieceParseError::UnexpectedChar(ch)),
            _ => Err(PieceParseError::BadLength),
        }
    }
}

#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    #[display(fmt = "all pieces captured")]
    AllPiecesCaptured,
    #[display(fmt = "time forfeit")]
    TimeForfeit,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Outcome {
    pub winner: Side,
    pub reason: WinReason,
}

impl Outcome {
    pub const fn win(winner: Side, reason: WinReason) -> Outcome {
        Outcome { winner, reason }
    }

    pub const fn loser(&self) -> Side {
        self.winner.inv()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} wins by {}", self.winner.as_long_str(), self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file() {
        for (idx, file) in File::iter().enumerate() {
            assert_eq!(file.index(), idx);
            assert_eq!(File::from_index(idx), file);
            assert_eq!(File::from_char(file.as_char()), Some(file));
        }
    }

    #[test]
    fn test_rank() {
        for (idx, rank) in Rank::iter().enumerate() {
            assert_eq!(rank.index(), idx);
            assert_eq!(Rank::from_index(idx), rank);
            assert_eq!(Rank::from_char(rank.as_char()), Some(rank));
        }
    }

    #[test]
    fn test_coord() {
        let mut coords = Vec::new();
        for rank in Rank::iter() {
            for file in File::iter() {
                let coord = Coord::from_parts(file, rank);
                assert_eq!(coord.file(), file);
                assert_eq!(coord.rank(), rank);
                assert_eq!(coord.row(), rank.index());
                assert_eq!(coord.col(), file.index());
                coords.push(coord);
            }
        }
        assert_eq!(coords, Coord::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_row_col() {
        assert_eq!(
            Coord::from_row_col(0, 0),
            Some(Coord::from_parts(File::A, Rank::R8))
        );
        assert_eq!(
            Coord::from_row_col(6, 4),
            Some(Coord::from_parts(File::E, Rank::R2))
        );
        for (row, col) in [(-1, 0), (0, -1), (8, 0), (0, 8), (i32::MIN, i32::MAX)] {
            assert!(!is_in_bounds(row, col));
            assert_eq!(Coord::from_row_col(row, col), None);
        }
    }

    #[test]
    fn test_coord_str() {
        assert_eq!(Coord::from_row_col(0, 0).unwrap().to_string(), "a8");
        assert_eq!(Coord::from_row_col(7, 7).unwrap().to_string(), "h1");
        assert_eq!(
            Coord::from_str("b4"),
            Ok(Coord::from_parts(File::B, Rank::R4))
        );
        assert_eq!(
            Coord::from_str("h9"),
            Err(CoordParseError::UnexpectedRankChar('9'))
        );
        assert_eq!(
            Coord::from_str("i4"),
            Err(CoordParseError::UnexpectedFileChar('i'))
        );
        assert_eq!(Coord::from_str("a"), Err(CoordParseError::BadLength));
        assert_eq!(Coord::from_str("é4"), Err(CoordParseError::UnexpectedFileChar('é')));
    }

    #[test]
    fn test_side() {
        assert_eq!(Side::White.inv(), Side::Black);
        assert_eq!(Side::Black.inv(), Side::White);
        assert_eq!(Side::from_str("b"), Ok(Side::Black));
        assert_eq!(Side::from_str("x"), Err(SideParseError::UnexpectedChar('x')));
        assert_eq!(Side::from_str("wb"), Err(SideParseError::BadLength));
    }

    #[test]
    fn test_piece_str() {
        for side in Side::iter() {
            for kind in PieceKind::ALL {
                let piece = Piece::new(side, kind);
                assert_eq!(Piece::from_str(&piece.to_string()), Ok(piece));
            }
        }
        assert_eq!(
            Piece::from_char('Q'),
            Some(Piece::new(Side::White, PieceKind::Queen))
        );
        assert_eq!(Piece::from_str("x"), Err(PieceParseError::UnexpectedChar('x')));
        assert_eq!(Piece::from_str(""), Err(PieceParseError::BadLength));
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(PieceKind::Pawn.glyph(), '♟');
        assert_eq!(PieceKind::King.glyph(), '♚');
        assert_eq!(Piece::new(Side::White, PieceKind::Rook).as_utf8_char(), '♖');
        assert_eq!(Piece::new(Side::Black, PieceKind::Rook).as_utf8_char(), '♜');
    }

    #[test]
    fn test_outcome() {
        let outcome = Outcome::win(Side::Black, WinReason::TimeForfeit);
        assert_eq!(outcome.loser(), Side::White);
        assert_eq!(outcome.to_string(), "Black wins by time forfeit");
        assert_eq!(
            Outcome::win(Side::White, WinReason::AllPiecesCaptured).to_string(),
            "White wins by all pieces captured"
        );
    }
}
