use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use ndarray::Array3;
use strum::VariantArray;
use tracing::trace;

use crate::board::{Board, MoveError};
use crate::cell::Player;
use crate::group::{Geometry, Group};
use crate::square::{Coord, Square};

/// Tracks the potential groups of both players on a [`Board`] it owns.
///
/// A group stays potential while none of its squares belongs to the opponent. Every move by a player removes the
/// opponent's groups through the square played, and taking the move back restores exactly those.
#[derive(Clone, Debug)]
pub struct ProblemManager {
    board: Board,
    geometry: Geometry,
    // [player][line]
    groups: [Vec<Group>; 2],
    alive: [Vec<bool>; 2],
    // [player][row][col] -> live line indices
    by_square: Array3<BTreeSet<usize>>,
    line_of: HashMap<Vec<Square>, usize>,
    // line indices of the mover's opponent removed by each move
    history: Vec<Vec<usize>>,
}

impl ProblemManager {
    /// Start tracking `board`, computing its current potential groups from scratch.
    pub fn new(board: Board) -> Self {
        let geometry = Geometry::new(board.rows(), board.cols(), board.num_to_connect());
        let groups = [Player::White, Player::Black].map(|player| geometry.groups_for(player).collect_vec());
        let line_of = geometry.lines().iter().enumerate().map(|(index, line)| (line.clone(), index)).collect();

        let mut ret = Self {
            alive: [vec![true; geometry.lines().len()], vec![true; geometry.lines().len()]],
            by_square: Array3::from_shape_simple_fn((2, board.rows(), board.cols()), BTreeSet::new),
            board,
            geometry,
            groups,
            line_of,
            history: Vec::new(),
        };

        for player in Player::VARIANTS {
            for (index, line) in ret.geometry.lines().iter().enumerate() {
                if line.iter().any(|square| ret.board.get(*square) == Some(player.other())) {
                    ret.alive[player.index()][index] = false;
                    continue;
                }
                for square in line {
                    ret.by_square[(player.index(), square.row, square.col)].insert(index);
                }
            }
        }

        ret
    }

    /// The board being tracked.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub(crate) fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Every group `player` could still complete.
    pub fn potential_groups(&self, player: Player) -> impl Iterator<Item = &Group> {
        self.groups[player.index()].iter()
            .zip(self.alive[player.index()].iter())
            .filter(|(_, alive)| **alive)
            .map(|(group, _)| group)
    }

    /// Potential groups of `player` running through `square`.
    pub fn potential_groups_at(&self, player: Player, square: Square) -> impl Iterator<Item = &Group> {
        self.by_square[(player.index(), square.row, square.col)].iter().map(move |index| &self.groups[player.index()][*index])
    }

    /// Potential groups of `player` with at least one square in `col`, each once.
    pub fn potential_groups_touching(&self, player: Player, col: Coord) -> impl Iterator<Item = &Group> {
        self.board.column(col)
            .flat_map(|square| self.by_square[(player.index(), square.row, square.col)].iter().copied())
            .sorted()
            .dedup()
            .map(move |index| &self.groups[player.index()][index])
    }

    /// Whether `group` is still potential for its player.
    pub fn is_potential(&self, group: &Group) -> bool {
        self.line_of.get(group.squares())
            .is_some_and(|index| self.alive[group.player.index()][*index])
    }

    /// Play `col` for the player to move, returning the opponent groups the move removed.
    pub fn make_move(&mut self, col: Coord) -> Result<Vec<Group>, MoveError> {
        let player = self.board.player_to_move();
        let square = self.board.make_move(col)?;
        let victim = player.other().index();

        let removed = self.geometry.lines_through(square).iter()
            .copied()
            .filter(|index| self.alive[victim][*index])
            .collect_vec();
        for index in removed.iter() {
            self.alive[victim][*index] = false;
            for square in self.geometry.lines()[*index].iter() {
                self.by_square[(victim, square.row, square.col)].remove(index);
            }
        }

        trace!(?square, ?player, removed = removed.len(), "problem manager move");
        let ret = removed.iter().map(|index| self.groups[victim][*index].clone()).collect_vec();
        self.history.push(removed);
        Ok(ret)
    }

    /// Take back the most recent move, returning the groups it restored.
    pub fn undo_move(&mut self) -> Result<Vec<Group>, MoveError> {
        let removed = self.history.pop().ok_or(MoveError::NothingToUndo)?;
        let (square, player) = self.board.undo_move()?;
        let victim = player.other().index();

        for index in removed.iter() {
            self.alive[victim][*index] = true;
            for square in self.geometry.lines()[*index].iter() {
                self.by_square[(victim, square.row, square.col)].insert(*index);
            }
        }

        trace!(?square, ?player, restored = removed.len(), "problem manager undo");
        Ok(removed.iter().map(|index| self.groups[victim][*index].clone()).collect_vec())
    }
}
