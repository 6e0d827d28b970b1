//! Building boards from dimensions and the moves played so far.

use std::fmt::{Display, Formatter};
use std::num::NonZero;

use crate::board::{Board, MoveError};
use crate::square::{Coord, Dimension, Square};

/// Reasons a builder may become invalid while building.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// The board is too small in both directions to fit a single line of `num_to_connect` squares.
    TooSmall,
    /// The board has more columns than there are letters to name them.
    TooWide {
        /// Columns requested.
        cols: Coord,
    },
    /// A move was rejected by the board being built.
    IllegalMove {
        /// Zero-based position of the move in the sequence.
        index: usize,
        /// Why the board rejected it.
        err: MoveError,
    },
    /// A move in classic notation could not be parsed.
    Unparsable {
        /// The offending text.
        text: String,
    },
}

impl std::error::Error for BuilderInvalidReason {}

impl Display for BuilderInvalidReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderInvalidReason::TooSmall => write!(f, "Board cannot fit a single connecting line"),
            BuilderInvalidReason::TooWide { cols } => {
                write!(f, "Board has {} columns, at most {} can be named", cols, MAX_COLS)
            }
            BuilderInvalidReason::IllegalMove { index, err } => write!(f, "Move #{} is illegal: {}", index + 1, err),
            BuilderInvalidReason::Unparsable { text } => write!(f, "Could not parse move {:?}", text),
        }
    }
}

/// Columns are named by a single letter.
pub const MAX_COLS: Coord = 26;

/// A builder for [`Board`]s: dimensions, the length of a winning line, and the moves played so far.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once a builder is invalid, further calls do nothing.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    board: Board,
    played: usize,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for BoardBuilder {
    /// The standard Connect Four board: 6 rows, 7 columns, 4 to connect.
    fn default() -> Self {
        Self::with_dims((NonZero::new(6).unwrap(), NonZero::new(7).unwrap()))
    }
}

impl BoardBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(rows, cols)` order.
    ///
    /// May cause the builder to enter a [`TooSmall`](BuilderInvalidReason::TooSmall) invalid state if neither
    /// dimension fits four in a row, or a [`TooWide`](BuilderInvalidReason::TooWide) one beyond [`MAX_COLS`] columns.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        let mut ret = Self {
            board: Board::empty(dims, 4),
            played: 0,
            invalid_reasons: Default::default(),
        };
        if dims.1.get() > MAX_COLS {
            ret.invalid_reasons.push(BuilderInvalidReason::TooWide { cols: dims.1.get() });
        }
        ret.check_fits();
        ret
    }

    fn check_fits(&mut self) {
        let n = self.board.num_to_connect;
        if n == 0 || (n > self.board.rows() && n > self.board.cols()) {
            self.invalid_reasons.push(BuilderInvalidReason::TooSmall);
        }
    }

    /// Set the number of pieces to connect. Defaults to 4.
    ///
    /// May cause the builder to enter a [`TooSmall`](BuilderInvalidReason::TooSmall) invalid state, and leaves it
    /// again if the new length fits.
    /// If the builder is invalid for any reason other than its dimensions, this function does nothing.
    pub fn num_to_connect(&mut self, num_to_connect: usize) -> &mut Self {
        let dimensional = |reason: &BuilderInvalidReason| {
            matches!(reason, BuilderInvalidReason::TooSmall | BuilderInvalidReason::TooWide { .. })
        };
        if !self.invalid_reasons.iter().all(dimensional) {
            return self;
        }

        self.invalid_reasons.retain(|reason| *reason != BuilderInvalidReason::TooSmall);

        self.board.num_to_connect = num_to_connect;
        self.check_fits();
        self
    }

    /// Drop a piece into `col` for whoever is to move at that point of the sequence.
    ///
    /// May cause the builder to enter an [`IllegalMove`](BuilderInvalidReason::IllegalMove) invalid state if `col` is
    /// out of bounds or full.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn play(&mut self, col: Coord) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if let Err(err) = self.board.make_move(col) {
            self.invalid_reasons.push(BuilderInvalidReason::IllegalMove { index: self.played, err });
        }
        self.played += 1;
        self
    }

    /// Play a whitespace separated sequence of moves, either as squares in classic notation (`d1 d2 c1`) or as bare
    /// column letters (`d d c`). Only the column of a square is used.
    ///
    /// May cause the builder to enter an [`Unparsable`](BuilderInvalidReason::Unparsable) invalid state, or any state
    /// [`Self::play`] may cause.
    pub fn play_moves(&mut self, moves: &str) -> &mut Self {
        for text in moves.split_whitespace() {
            if !self.invalid_reasons.is_empty() {
                return self;
            }

            let col = if text.len() == 1 {
                text.chars().next()
                    .filter(|letter| letter.is_ascii_alphabetic())
                    .map(|letter| (letter.to_ascii_lowercase() as u8 - b'a') as Coord)
            } else {
                Square::parse(text, self.board.rows()).map(|square| square.col)
            };

            match col {
                Some(col) => { self.play(col); }
                None => self.invalid_reasons.push(BuilderInvalidReason::Unparsable { text: text.to_string() }),
            }
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Board, &Vec<BuilderInvalidReason>> {
        match self.is_valid() {
            None => Ok(self.board.clone()),
            Some(reasons) => Err(reasons),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use super::*;
    use crate::board::MoveError;

    #[test]
    fn replays_moves() {
        let board = BoardBuilder::default().play_moves("d1 d2 c").build().unwrap();
        assert_eq!(format!("{}", board), ".......
.......
.......
.......
...o...
..xx...
");
    }

    #[test]
    fn rejects_full_column() {
        let mut builder = BoardBuilder::with_dims((NonZero::new(2).unwrap(), NonZero::new(4).unwrap()));
        builder.play(0).play(0).play(0).play(1);
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::IllegalMove { index: 2, err: MoveError::ColumnFull }]);
    }

    #[test]
    fn rejects_tiny_board() {
        let builder = BoardBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(3).unwrap()));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::TooSmall]));

        let mut builder = BoardBuilder::with_dims((NonZero::new(3).unwrap(), NonZero::new(3).unwrap()));
        assert!(builder.num_to_connect(3).is_valid().is_none());
    }

    #[test]
    fn rejects_unnameable_columns() {
        let mut builder = BoardBuilder::with_dims((NonZero::new(6).unwrap(), NonZero::new(160).unwrap()));
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::TooWide { cols: 160 }]));
        assert_eq!(builder.num_to_connect(5).is_valid(), Some(&vec![BuilderInvalidReason::TooWide { cols: 160 }]));

        let widest = BoardBuilder::with_dims((NonZero::new(6).unwrap(), NonZero::new(MAX_COLS).unwrap())).build().unwrap();
        assert_eq!(format!("{}", Square::new(5, MAX_COLS - 1).on(widest.rows())), "z1");
    }

    #[test]
    fn rejects_garbage() {
        let mut builder = BoardBuilder::default();
        builder.play_moves("a1 ?? b1");
        assert!(builder.is_valid().is_some());
        assert_eq!(builder.build().unwrap_err(), &vec![BuilderInvalidReason::Unparsable { text: "??".to_string() }]);
    }
}
