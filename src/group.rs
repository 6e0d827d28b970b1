use std::fmt::{Debug, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::cell::Player;
use crate::direction::Direction;
use crate::square::{Coord, Square};

/// A straight line of squares on which `player` could still connect, i.e. a potential winning line.
///
/// Groups are the "problems" the solver has to refute for the opposing side.
/// Squares are kept sorted, so two groups over the same line for the same player are equal.
#[derive(Clone, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Group {
    /// The player who would win by owning every square.
    pub player: Player,
    squares: Vec<Square>,
}

impl Group {
    /// Construct a group from its squares, in any order.
    pub fn new(player: Player, squares: impl IntoIterator<Item = Square>) -> Self {
        Self { player, squares: squares.into_iter().sorted().collect_vec() }
    }

    /// Squares of this group, top to bottom then left to right.
    #[inline]
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Whether `square` is part of this group.
    #[inline]
    pub fn contains(&self, square: &Square) -> bool {
        self.squares.binary_search(square).is_ok()
    }

    /// Whether some square of this group lies in `col`.
    #[inline]
    pub fn touches_column(&self, col: Coord) -> bool {
        self.squares.iter().any(|square| square.col == col)
    }
}

impl Debug for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}[{}]", self.player, self.squares.iter().map(|square| format!("{:?}", square)).join("-"))
    }
}

/// Every line of `num_to_connect` squares that fits on a board, independent of occupancy.
#[derive(Clone, Debug)]
pub(crate) struct Geometry {
    lines: Vec<Vec<Square>>,
    by_square: Array2<Vec<usize>>,
}

impl Geometry {
    pub(crate) fn new(rows: Coord, cols: Coord, num_to_connect: usize) -> Self {
        let on_board = |square: &Square| square.row < rows && square.col < cols;
        let mut lines = Vec::new();

        for (row, col) in (0..rows).cartesian_product(0..cols) {
            for direction in Direction::VARIANTS {
                let line = std::iter::successors(Some(Square::new(row, col)), |square| Some(direction.attempt_from(*square)))
                    .take(num_to_connect)
                    .take_while(on_board)
                    .collect_vec();
                if line.len() == num_to_connect {
                    lines.push(line.into_iter().sorted().collect_vec());
                }
            }
        }

        let mut by_square = Array2::from_shape_simple_fn((rows, cols), Vec::new);
        for (index, line) in lines.iter().enumerate() {
            for square in line {
                by_square[square.as_index()].push(index);
            }
        }

        Self { lines, by_square }
    }

    #[inline]
    pub(crate) fn lines(&self) -> &[Vec<Square>] {
        &self.lines
    }

    #[inline]
    pub(crate) fn lines_through(&self, square: Square) -> &[usize] {
        &self.by_square[square.as_index()]
    }

    /// Whether some line contains both `a` and `b`.
    pub(crate) fn connectable(&self, a: Square, b: Square) -> bool {
        a != b && self.lines_through(a).iter().any(|line| self.lines[*line].contains(&b))
    }

    pub(crate) fn groups_for(&self, player: Player) -> impl Iterator<Item = Group> + '_ {
        self.lines.iter().map(move |line| Group { player, squares: line.clone() })
    }
}

/// The groups of one player over the full [`Geometry`], indexed by column.
///
/// Solutions are converted against every line on the board rather than the currently live ones, so that a solution
/// depends on its rule alone.
#[derive(Clone, Debug)]
pub(crate) struct GroupIndex {
    groups: Vec<Group>,
    by_column: Vec<Vec<usize>>,
}

impl GroupIndex {
    pub(crate) fn new(geometry: &Geometry, player: Player, cols: Coord) -> Self {
        let groups = geometry.groups_for(player).collect_vec();
        let mut by_column = vec![Vec::new(); cols];
        for (index, group) in groups.iter().enumerate() {
            for col in group.squares().iter().map(|square| square.col).unique() {
                by_column[col].push(index);
            }
        }

        Self { groups, by_column }
    }

    /// Groups with at least one square in any of `cols`, each once.
    pub(crate) fn touching_columns(&self, cols: impl IntoIterator<Item = Coord>) -> impl Iterator<Item = &Group> {
        cols.into_iter()
            .flat_map(|col| self.by_column[col].iter().copied())
            .sorted()
            .dedup()
            .map(|index| &self.groups[index])
    }
}
