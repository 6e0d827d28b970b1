use std::fmt::{Debug, Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;

pub(crate) type Coord = usize;
pub(crate) type Dimension = NonZero<Coord>;

/// A square `(row, col)` on a board. The top left corner is `Square { row: 0, col: 0 }`, so rows grow downward.
///
/// Squares display in the classic notation: a column letter and the row counted from the bottom, `a1` being the bottom left.
/// Because that notation needs the board height, [`Display`] requires the square to be wrapped by [`Square::on`].
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd)]
pub struct Square {
    /// Row index, counted from the top.
    pub row: Coord,
    /// Column index, counted from the left.
    pub col: Coord,
}

impl Square {
    /// Construct a square at `(row, col)`.
    #[inline]
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.row, self.col)
    }

    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self::new(self.row.wrapping_add_signed(rhs.0), self.col.wrapping_add_signed(rhs.1))
    }

    /// The square directly above this one, if not already in the top row.
    #[inline]
    pub fn above(&self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| Self::new(row, self.col))
    }

    /// Whether `self` is higher on the board than `other` (regardless of column).
    #[inline]
    pub fn is_above(&self, other: &Self) -> bool {
        self.row < other.row
    }

    /// Adapt this square for display on a board with `rows` rows.
    #[inline]
    pub fn on(self, rows: Coord) -> DisplaySquare {
        DisplaySquare { square: self, rows }
    }

    /// Parse classic notation such as `c3` on a board with `rows` rows.
    ///
    /// Returns [`None`] if the text is malformed or names a row outside `1..=rows`.
    pub fn parse(text: &str, rows: Coord) -> Option<Self> {
        let mut chars = text.trim().chars();
        let letter = chars.next()?.to_ascii_lowercase();
        if !letter.is_ascii_lowercase() {
            return None;
        }
        let number: Coord = chars.as_str().parse().ok()?;
        if number == 0 || number > rows {
            return None;
        }

        Some(Self::new(rows - number, (letter as u8 - b'a') as Coord))
    }
}

impl Debug for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(Ix, Ix)> for Square {
    fn from(value: (Ix, Ix)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// A [`Square`] paired with the board height, for display.
#[derive(Clone, Copy)]
pub struct DisplaySquare {
    square: Square,
    rows: Coord,
}

impl Display for DisplaySquare {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.square.col as u8) as char, self.rows - self.square.row)
    }
}

#[cfg(test)]
mod tests {
    use super::Square;

    #[test]
    fn classic_notation() {
        assert_eq!(Square::parse("a1", 6), Some(Square::new(5, 0)));
        assert_eq!(Square::parse("G6", 6), Some(Square::new(0, 6)));
        assert_eq!(Square::parse("b7", 6), None);
        assert_eq!(Square::parse("b0", 6), None);
        assert_eq!(format!("{}", Square::new(3, 4).on(6)), "e3");
    }

    #[test]
    fn above_top_row() {
        assert_eq!(Square::new(0, 2).above(), None);
        assert_eq!(Square::new(4, 2).above(), Some(Square::new(3, 2)));
        assert!(Square::new(1, 0).is_above(&Square::new(2, 6)));
    }
}
