use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;

use crate::cell::{Cell, Player};
use crate::square::{Coord, Dimension, Square};

/// Reasons a move may be rejected by a [`Board`] or the managers built on it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MoveError {
    /// The column or square lies outside the board.
    OutOfBounds,
    /// The column has no empty square left.
    ColumnFull,
    /// The square is empty but not directly playable; the square below it is still empty, or it is already taken.
    NotPlayable {
        /// The rejected square.
        square: Square,
    },
    /// There is no move to take back.
    NothingToUndo,
}

impl std::error::Error for MoveError {}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::OutOfBounds => write!(f, "Move lies outside the board"),
            MoveError::ColumnFull => write!(f, "Move was played into a full column"),
            MoveError::NotPlayable { square } => write!(f, "Square {:?} is not directly playable", square),
            MoveError::NothingToUndo => write!(f, "No move left to undo"),
        }
    }
}

/// A Connect Four style board of `rows` by `cols` squares, where pieces drop to the lowest empty square of a column.
///
/// [`Board`]s should be built using a [`BoardBuilder`](crate::builder::BoardBuilder).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    // rows, cols
    pub(crate) dims: (Dimension, Dimension),
    pub(crate) num_to_connect: usize,
    // number of pieces in each column
    heights: Vec<Coord>,
    history: Vec<Square>,
}

impl Board {
    pub(crate) fn empty(dims: (Dimension, Dimension), num_to_connect: usize) -> Self {
        Self {
            cells: Array2::from_shape_simple_fn((dims.0.get(), dims.1.get()), Cell::default),
            dims,
            num_to_connect,
            heights: vec![0; dims.1.get()],
            history: Vec::with_capacity(dims.0.get() * dims.1.get()),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> Coord {
        self.dims.0.get()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> Coord {
        self.dims.1.get()
    }

    /// Number of pieces a player must connect to win.
    #[inline]
    pub fn num_to_connect(&self) -> usize {
        self.num_to_connect
    }

    /// Whether `square` lies on the board.
    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        square.row < self.rows() && square.col < self.cols()
    }

    /// Owner of `square`, or [`None`] if it is empty.
    ///
    /// Panics if `square` is outside the board.
    #[inline]
    pub fn get(&self, square: Square) -> Option<Player> {
        self.cells[square.as_index()].owner()
    }

    /// Whether nobody has played on `square` yet.
    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.cells[square.as_index()] == Cell::Empty
    }

    /// Whether the next piece dropped into the column of `square` lands on `square`.
    #[inline]
    pub fn is_playable(&self, square: Square) -> bool {
        self.contains(square) && self.playable_in_column(square.col) == Some(square)
    }

    /// The square the next piece dropped into `col` lands on, or [`None`] if the column is full.
    #[inline]
    pub fn playable_in_column(&self, col: Coord) -> Option<Square> {
        let height = self.heights[col];
        (height < self.rows()).then(|| Square::new(self.rows() - 1 - height, col))
    }

    /// All directly playable squares, left to right.
    pub fn playable_squares(&self) -> Vec<Square> {
        (0..self.cols()).filter_map(|col| self.playable_in_column(col)).collect_vec()
    }

    /// Whether `row` is odd when counting rows from the bottom, starting at 1.
    #[inline]
    pub fn is_odd_row(&self, row: Coord) -> bool {
        (self.rows() - row) % 2 == 1
    }

    /// Whether `row` is even when counting rows from the bottom, starting at 1.
    #[inline]
    pub fn is_even_row(&self, row: Coord) -> bool {
        !self.is_odd_row(row)
    }

    /// The square directly above `square`, if any.
    #[inline]
    pub fn square_above(&self, square: Square) -> Option<Square> {
        square.above()
    }

    /// The square directly below `square`, if any.
    #[inline]
    pub fn square_below(&self, square: Square) -> Option<Square> {
        (square.row + 1 < self.rows()).then(|| Square::new(square.row + 1, square.col))
    }

    /// All squares of `col` from the top row down.
    pub(crate) fn column(&self, col: Coord) -> impl Iterator<Item = Square> {
        (0..self.rows()).map(move |row| Square::new(row, col))
    }

    /// White moves on an even number of pieces, Black on an odd number.
    #[inline]
    pub fn player_to_move(&self) -> Player {
        if self.history.len() % 2 == 0 { Player::White } else { Player::Black }
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> &[Square] {
        &self.history
    }

    /// Drop a piece for the player to move into `col`, returning the square it landed on.
    pub fn make_move(&mut self, col: Coord) -> Result<Square, MoveError> {
        if col >= self.cols() {
            return Err(MoveError::OutOfBounds);
        }
        let square = self.playable_in_column(col).ok_or(MoveError::ColumnFull)?;

        self.cells[square.as_index()] = Cell::Taken { player: self.player_to_move() };
        self.heights[col] += 1;
        self.history.push(square);
        Ok(square)
    }

    /// Take back the most recent move, returning where it was played and by whom.
    pub fn undo_move(&mut self) -> Result<(Square, Player), MoveError> {
        let square = self.history.pop().ok_or(MoveError::NothingToUndo)?;
        let player = self.get(square).ok_or(MoveError::NothingToUndo)?;

        self.cells[square.as_index()] = Cell::Empty;
        self.heights[square.col] -= 1;
        Ok((square, player))
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.rows() * (self.cols() + 1));

        for row in self.cells.rows() {
            for cell in row {
                out.push(cell.owner().map_or('.', |player| player.display()));
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}
