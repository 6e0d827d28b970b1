use strum::VariantArray;

use crate::square::Square;

/// The four orientations a line of connected squares can take.
///
/// Every variant steps "forward" so that walking from a line's first square visits each square once.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub(crate) enum Direction {
    Horizontal,
    Vertical,
    // up and to the right
    Diagonal,
    // down and to the right
    AntiDiagonal,
}

impl Direction {
    /// Attempt the step from `square` in this direction.
    ///
    /// Steps off the top of the board wrap around to a huge row index, which every bounds check rejects.
    pub(crate) fn attempt_from(&self, square: Square) -> Square {
        match self {
            Self::Horizontal => square.offset_by((0, 1)),
            Self::Vertical => square.offset_by((1, 0)),
            Self::Diagonal => square.offset_by((-1, 1)),
            Self::AntiDiagonal => square.offset_by((1, 1)),
        }
    }
}
