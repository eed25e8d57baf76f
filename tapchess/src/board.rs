//! Board and related things

use crate::bitboard::Bitboard;
use crate::geometry::{self, PIECES_PER_SIDE};
use crate::types::{self, Coord, File, Piece, PieceKind, Rank, Side};

use std::fmt::{self, Display};
use std::str::FromStr;

use arrayvec::ArrayVec;
use log::debug;
use thiserror::Error;

/// Error making a move on the board
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// Row or column is outside `0..8`
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },
    /// There is no piece to move
    #[error("no piece on {0}")]
    EmptySource(Coord),
    /// Destination holds a piece of the mover's side
    #[error("{0} is occupied by a piece of the same side")]
    SelfCapture(Coord),
}

/// Error parsing the piece placement text of a board
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    /// More pieces of one side than a game starts with
    #[error("too many pieces of side {0:?}")]
    TooManyPieces(Side),
}

/// Move applied to the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    /// Source cell
    pub from: Coord,
    /// Destination cell
    pub to: Coord,
    /// Piece that moved
    pub piece: Piece,
    /// Piece removed from the destination cell, if any
    pub captured: Option<Piece>,
}

impl Move {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)
    }
}

/// Game board
///
/// Holds an 8×8 grid of optional pieces, together with the number of remaining pieces for each
/// side. The counters are updated on every capture and are never recomputed from the grid, so
/// [`Board::piece_count()`] is O(1).
///
/// Coordinates are given either as a checked [`Coord`] or as raw signed `(row, col)` pairs. Row 0
/// is the top of the board, where Black starts. Raw coordinates outside the board never cause a
/// panic: they read as "no piece" and moves involving them fail without changing anything.
///
/// # Example
///
/// ```
/// # use tapchess::{Board, Piece, PieceKind, Side};
/// #
/// let mut board = Board::initial();
/// assert_eq!(board.piece_at(6, 0), Some(Piece::new(Side::White, PieceKind::Pawn)));
/// assert!(board.move_piece(6, 0, 4, 0));
/// assert!(board.is_empty(6, 0));
/// assert!(!board.move_piece(6, 0, 5, 0));
/// assert!(!board.move_piece(9, 0, 5, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
    counts: [u8; 2],
    captured: [ArrayVec<Piece, 16>; 2],
}

impl Board {
    /// Returns a board without any pieces
    ///
    /// Both sides have zero pieces left on such board.
    pub fn empty() -> Board {
        Board {
            cells: [None; 64],
            counts: [0; 2],
            captured: [ArrayVec::new(), ArrayVec::new()],
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board::empty();
        res.setup();
        res
    }

    fn setup(&mut self) {
        for side in Side::iter() {
            for (file, kind) in File::iter().zip(geometry::BACK_RANK) {
                self.put2(file, geometry::back_rank(side), Piece::new(side, kind));
                self.put2(
                    file,
                    geometry::pawn_rank(side),
                    Piece::new(side, PieceKind::Pawn),
                );
            }
            self.counts[side.index()] = PIECES_PER_SIDE;
        }
    }

    #[inline]
    fn put2(&mut self, file: File, rank: Rank, piece: Piece) {
        self.cells[Coord::from_parts(file, rank).index()] = Some(piece);
    }

    /// Restores the initial position
    ///
    /// All the cells are cleared first, so the result doesn't depend on the previous state.
    pub fn reset(&mut self) {
        self.cells = [None; 64];
        for list in &mut self.captured {
            list.clear();
        }
        self.setup();
        debug!("board reset");
    }

    /// Parses a board from the piece placement part of FEN
    ///
    /// Does the same as [`Board::from_str`]. The piece counters are taken from the parsed layout.
    pub fn from_placement(s: &str) -> Result<Board, PlacementParseError> {
        Board::from_str(s)
    }

    /// Converts the board into the piece placement part of FEN
    pub fn as_placement(&self) -> String {
        self.to_string()
    }

    /// Returns the contents of the cell `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.cells[c.index()]
    }

    /// Returns the piece at `row` and `col`, or `None` if the cell is empty or outside the board
    #[inline]
    pub fn piece_at(&self, row: i32, col: i32) -> Option<Piece> {
        Coord::from_row_col(row, col).and_then(|c| self.get(c))
    }

    /// Returns `true` if `row` and `col` are both in `0..8`
    #[inline]
    pub fn is_valid_position(&self, row: i32, col: i32) -> bool {
        types::is_in_bounds(row, col)
    }

    /// Returns `true` if the cell is on the board and holds no piece
    #[inline]
    pub fn is_empty(&self, row: i32, col: i32) -> bool {
        Coord::from_row_col(row, col).map_or(false, |c| self.is_free(c))
    }

    #[inline]
    pub fn is_free(&self, c: Coord) -> bool {
        self.cells[c.index()].is_none()
    }

    /// Moves the piece from `from` to `to`, capturing whatever occupies `to`
    ///
    /// This is a mechanical relocation: no movement rules are checked, except that a piece
    /// cannot capture a piece of its own side. On error, the board is left unchanged.
    pub fn make_move(&mut self, from: Coord, to: Coord) -> Result<Move, MoveError> {
        let piece = self.get(from).ok_or(MoveError::EmptySource(from))?;
        let captured = self.get(to);
        if let Some(target) = captured {
            if target.side == piece.side {
                return Err(MoveError::SelfCapture(to));
            }
            let count = &mut self.counts[target.side.index()];
            debug_assert!(*count > 0, "captured a piece of a side with no pieces");
            *count -= 1;
            self.captured[piece.side.index()].push(target);
        }
        self.cells[to.index()] = Some(piece);
        self.cells[from.index()] = None;

        #[cfg(feature = "selftest")]
        self.selftest();

        Ok(Move {
            from,
            to,
            piece,
            captured,
        })
    }

    /// Same as [`Board::make_move()`], but takes raw coordinates
    pub fn try_move_piece(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<Move, MoveError> {
        let from = Coord::from_row_col(from_row, from_col).ok_or(MoveError::OutOfBounds {
            row: from_row,
            col: from_col,
        })?;
        let to = Coord::from_row_col(to_row, to_col).ok_or(MoveError::OutOfBounds {
            row: to_row,
            col: to_col,
        })?;
        self.make_move(from, to)
    }

    /// Moves a piece, returning `true` on success
    ///
    /// Fails without changing the board if any of the cells is outside the board, if the source
    /// cell is empty, or if the destination holds a piece of the same side.
    pub fn move_piece(&mut self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) -> bool {
        match self.try_move_piece(from_row, from_col, to_row, to_col) {
            Ok(_) => true,
            Err(e) => {
                debug!("move rejected: {}", e);
                false
            }
        }
    }

    /// Returns the number of pieces of side `s` still on the board
    #[inline]
    pub fn piece_count(&self, s: Side) -> u8 {
        self.counts[s.index()]
    }

    /// Returns `true` if side `s` has no pieces left
    #[inline]
    pub fn has_lost(&self, s: Side) -> bool {
        self.piece_count(s) == 0
    }

    /// Returns the pieces captured by side `s`, in the order they were taken
    #[inline]
    pub fn captured(&self, s: Side) -> &[Piece] {
        &self.captured[s.index()]
    }

    /// Returns the set of cells occupied by side `s`
    ///
    /// Unlike [`Board::piece_count()`], this function scans the whole grid.
    pub fn occupancy(&self, s: Side) -> Bitboard {
        self.iter()
            .filter(|(_, p)| p.side == s)
            .map(|(c, _)| c)
            .collect()
    }

    /// Iterates over all the occupied cells, row by row from the top
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::iter().filter_map(move |c| self.get(c).map(|p| (c, p)))
    }

    #[cfg(feature = "selftest")]
    fn selftest(&self) {
        for side in Side::iter() {
            assert_eq!(
                self.occupancy(side).len(),
                u32::from(self.piece_count(side)),
                "piece counter of {:?} is out of sync",
                side
            );
        }
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use tapchess::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::initial()
    }
}

fn parse_cells(s: &str) -> Result<[Option<Piece>; 64], PlacementParseError> {
    type Error = PlacementParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut pos = 0_usize;
    let mut cells = [None; 64];
    for ch in s.chars() {
        match ch {
            '1'..='8' => {
                let add = (u32::from(ch) - u32::from('0')) as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
                pos += add;
            }
            '/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                cells[pos] = Some(Piece::from_char(ch).ok_or(Error::UnexpectedChar(ch))?);
                file += 1;
                pos += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }
    debug_assert_eq!(pos, 64);

    Ok(cells)
}

impl FromStr for Board {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        let cells = parse_cells(s)?;
        let mut counts = [0_u8; 2];
        for piece in cells.iter().flatten() {
            let count = &mut counts[piece.side.index()];
            if *count == PIECES_PER_SIDE {
                return Err(PlacementParseError::TooManyPieces(piece.side));
            }
            *count += 1;
        }
        Ok(Board {
            cells,
            counts,
            captured: [ArrayVec::new(), ArrayVec::new()],
        })
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            if rank.index() != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for file in File::iter() {
                let piece = match self.get(Coord::from_parts(file, rank)) {
                    Some(piece) => piece,
                    None => {
                        empty += 1;
                        continue;
                    }
                };
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", piece)?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn cell(c: Option<Piece>) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(b.get(Coord::from_parts(file, rank))))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn cell(c: Option<Piece>) -> char {
        c.map_or('.', |p| p.as_char())
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';

    fn cell(c: Option<Piece>) -> char {
        c.map_or('.', |p| p.as_utf8_char())
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const INI_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn assert_counts_in_sync(b: &Board) {
        for side in Side::iter() {
            assert_eq!(b.occupancy(side).len(), u32::from(b.piece_count(side)));
            assert_eq!(
                usize::from(b.piece_count(side)) + b.captured(side.inv()).len(),
                usize::from(PIECES_PER_SIDE)
            );
        }
        let white = b.occupancy(Side::White);
        let black = b.occupancy(Side::Black);
        assert!((white & black).is_empty());
        for c in Coord::iter() {
            assert_eq!(!(white | black).contains(c), b.is_free(c));
        }
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(b.as_placement(), INI_PLACEMENT);
        assert_eq!(Board::from_placement(INI_PLACEMENT), Ok(Board::initial()));
        assert_eq!(b.piece_count(Side::White), 16);
        assert_eq!(b.piece_count(Side::Black), 16);
        assert_eq!(
            b.piece_at(7, 3),
            Some(Piece::new(Side::White, PieceKind::Queen))
        );
        assert_eq!(
            b.piece_at(0, 4),
            Some(Piece::new(Side::Black, PieceKind::King))
        );
        assert_counts_in_sync(&b);
    }

    #[test]
    fn test_reset_from_empty() {
        let mut b = Board::empty();
        assert!(b.has_lost(Side::White));
        b.reset();
        assert_eq!(
            b.piece_at(6, 0),
            Some(Piece::new(Side::White, PieceKind::Pawn))
        );
        assert_eq!(
            b.piece_at(1, 0),
            Some(Piece::new(Side::Black, PieceKind::Pawn))
        );
        assert_eq!(b.piece_at(4, 4), None);
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn test_bounds() {
        let mut b = Board::initial();
        let before = b.clone();
        for (row, col) in [(-1, 0), (0, -1), (8, 0), (0, 8), (-5, 12), (100, 100)] {
            assert!(!b.is_valid_position(row, col));
            assert_eq!(b.piece_at(row, col), None);
            assert!(!b.is_empty(row, col));
            assert!(!b.move_piece(row, col, 4, 4));
            assert!(!b.move_piece(6, 0, row, col));
            assert_eq!(
                b.try_move_piece(6, 0, row, col),
                Err(MoveError::OutOfBounds { row, col })
            );
        }
        assert_eq!(b, before);
        assert!(b.is_valid_position(0, 0));
        assert!(b.is_valid_position(7, 7));
        assert!(b.is_empty(4, 4));
    }

    #[test]
    fn test_move_and_capture() {
        let mut b = Board::initial();
        let mv = b.try_move_piece(6, 4, 1, 3).unwrap();
        assert_eq!(mv.piece, Piece::new(Side::White, PieceKind::Pawn));
        assert_eq!(mv.captured, Some(Piece::new(Side::Black, PieceKind::Pawn)));
        assert_eq!(mv.to_string(), "e2xd7");
        assert!(b.is_empty(6, 4));
        assert_eq!(b.piece_count(Side::Black), 15);
        assert_eq!(b.piece_count(Side::White), 16);
        assert_eq!(
            b.captured(Side::White),
            &[Piece::new(Side::Black, PieceKind::Pawn)]
        );
        assert_counts_in_sync(&b);

        let mv = b.try_move_piece(1, 0, 3, 0).unwrap();
        assert!(!mv.is_capture());
        assert_eq!(mv.to_string(), "a7-a5");
    }

    #[test]
    fn test_empty_source() {
        let mut b = Board::initial();
        assert_eq!(
            b.try_move_piece(4, 4, 5, 5),
            Err(MoveError::EmptySource(Coord::from_row_col(4, 4).unwrap()))
        );
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn test_self_capture() {
        let mut b = Board::initial();
        assert!(!b.move_piece(6, 0, 6, 1));
        assert_eq!(
            b.try_move_piece(7, 0, 7, 1),
            Err(MoveError::SelfCapture(Coord::from_row_col(7, 1).unwrap()))
        );
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn test_capture_all() {
        let mut b = Board::initial();
        let blacks: Vec<Coord> = b.occupancy(Side::Black).into_iter().collect();
        assert_eq!(blacks.len(), 16);
        let mut rook = Coord::from_row_col(7, 0).unwrap();
        for target in blacks {
            assert!(!b.has_lost(Side::Black));
            let mv = b.make_move(rook, target).unwrap();
            assert!(mv.is_capture());
            rook = target;
        }
        assert!(b.has_lost(Side::Black));
        assert_eq!(b.piece_count(Side::Black), 0);
        assert_eq!(b.piece_count(Side::White), 16);
        assert_eq!(b.captured(Side::White).len(), 16);
        assert!(b.occupancy(Side::Black).is_empty());
    }

    #[test]
    fn test_random_moves_keep_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut b = Board::initial();
        for _ in 0..5000 {
            let from_row = rng.gen_range(-1..9);
            let from_col = rng.gen_range(-1..9);
            let to_row = rng.gen_range(-1..9);
            let to_col = rng.gen_range(-1..9);
            let before = b.clone();
            if !b.move_piece(from_row, from_col, to_row, to_col) {
                assert_eq!(b, before);
            }
            assert_counts_in_sync(&b);
        }

        b.reset();
        assert_eq!(b, Board::initial());
        assert_counts_in_sync(&b);
    }

    #[test]
    fn test_placement() {
        const PLACEMENT: &str = "4k3/8/8/3p4/8/8/PPP5/4K3";

        let b = Board::from_placement(PLACEMENT).unwrap();
        assert_eq!(b.as_placement(), PLACEMENT);
        assert_eq!(b.piece_count(Side::White), 4);
        assert_eq!(b.piece_count(Side::Black), 2);
        assert_eq!(
            b.piece_at(3, 3),
            Some(Piece::new(Side::Black, PieceKind::Pawn))
        );
        assert!(b.captured(Side::White).is_empty());

        assert_eq!(
            Board::from_placement("8/8/8/8/8/8/8/8").unwrap().as_placement(),
            "8/8/8/8/8/8/8/8"
        );
    }

    #[test]
    fn test_bad_placement() {
        type Error = PlacementParseError;

        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
            Err(Error::Underflow)
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8"),
            Err(Error::Overflow)
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(Error::RankUnderflow(Rank::R7))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(Error::UnexpectedChar('9'))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/44p/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(Error::RankOverflow(Rank::R6))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/P7/PPPPPPPP/RNBQKBNR"),
            Err(Error::TooManyPieces(Side::White))
        );
    }

    #[test]
    fn test_pretty_utf8() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let res = "
8│....♚...
7│........
6│........
5│........
4│........
3│........
2│........
1│♖...♔...
─┼────────
 │abcdefgh
";
        assert_eq!(b.pretty(PrettyStyle::Utf8).to_string().trim(), res.trim());
    }
}
