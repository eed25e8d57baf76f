use crate::types::Coord;
use derive_more::{BitAnd, BitOr, Not};
use std::fmt;

/// Set of cells, bit `i` standing for the cell with [`Coord::index()`] equal to `i`
///
/// Used for occupancy snapshots. Sets of the two sides combine with `|`, `&` and `!`.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash, BitAnd, BitOr, Not)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    pub fn insert(&mut self, coord: Coord) {
        self.0 |= 1_u64 << coord.index();
    }

    pub const fn contains(&self, coord: Coord) -> bool {
        self.0 & (1_u64 << coord.index()) != 0
    }

    /// Number of cells in the set
    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Coord> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Bitboard {
        let mut res = Bitboard::EMPTY;
        for coord in iter {
            res.insert(coord);
        }
        res
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Bitboard({})", self)
    }
}

/// Rows from the top, `1` for a cell in the set, column `0` leftmost
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, coord) in Coord::iter().enumerate() {
            if i != 0 && coord.col() == 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", if self.contains(coord) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Iterator over the cells of a [`Bitboard`], in [`Coord::index()`] order
pub struct Cells(u64);

impl Iterator for Cells {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(Coord::from_index(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Cells {}

impl IntoIterator for Bitboard {
    type Item = Coord;
    type IntoIter = Cells;

    fn into_iter(self) -> Cells {
        Cells(self.0)
    }
}
