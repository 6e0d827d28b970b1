use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use tracing::{debug, trace};

use crate::board::MoveError;
use crate::cell::Player;
use crate::group::{Group, GroupIndex};
use crate::problem::ProblemManager;
use crate::rules::manager::{all_managers, RuleManager};
use crate::rules::{Rule, RuleContext, Tactic};
use crate::square::{Coord, Square};

/// A [`Rule`] together with the groups of the opponent it refutes.
///
/// Only useful rules become solutions, so [`Self::problems_solved`] is never empty. Two solutions are equal when they
/// reserve the same squares and refute the same groups, whichever rule they came from.
#[derive(Clone)]
pub struct Solution {
    pub(crate) rule: Rule,
    squares: BTreeSet<Square>,
    claimeven_bottom_squares: BTreeSet<Square>,
    problems_solved: BTreeSet<Group>,
}

impl Solution {
    /// Convert `rule` against every line of the opponent, live or not.
    pub(crate) fn from_rule(rule: Rule, index: &GroupIndex) -> Option<Self> {
        let candidates = index.touching_columns(rule.columns())
            .filter(|group| rule.solves(group))
            .collect_vec();
        if candidates.is_empty() || !rule.is_useful(&candidates) {
            return None;
        }

        let problems_solved = candidates.into_iter().cloned().collect();
        Some(Self {
            squares: rule.squares(),
            claimeven_bottom_squares: rule.claimeven_bottom_squares(),
            problems_solved,
            rule,
        })
    }

    /// The rule this solution was built from.
    #[inline]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Squares reserved by the rule.
    #[inline]
    pub fn squares(&self) -> &BTreeSet<Square> {
        &self.squares
    }

    /// Lower squares of the claimevens embedded in the rule.
    #[inline]
    pub fn claimeven_bottom_squares(&self) -> &BTreeSet<Square> {
        &self.claimeven_bottom_squares
    }

    /// Groups of the opponent refuted, over the whole board regardless of whether they are still potential.
    #[inline]
    pub fn problems_solved(&self) -> &BTreeSet<Group> {
        &self.problems_solved
    }

    /// Columns containing at least one reserved square.
    pub fn columns(&self) -> BTreeSet<Coord> {
        self.squares.iter().map(|square| square.col).collect()
    }

    /// Whether this solution comes from an oddthreat or a threat combination.
    #[inline]
    pub fn is_win_condition(&self) -> bool {
        self.rule.is_win_condition()
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.claimeven_bottom_squares == other.claimeven_bottom_squares
            && self.problems_solved == other.problems_solved
    }
}

impl Eq for Solution {}

impl Hash for Solution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.squares.hash(state);
        self.claimeven_bottom_squares.hash(state);
        self.problems_solved.hash(state);
    }
}

impl Debug for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution({}, {:?}, solves {})", self.rule.kind(), self.squares, self.problems_solved.len())
    }
}

/// Keeps the solutions available to one player current across moves.
///
/// Each of the eleven rule families has its own incremental manager; a move only re-derives the instances touching the
/// column played, and only rules whose instances changed are converted again.
pub struct SolutionManager {
    player: Player,
    index: GroupIndex,
    managers: Vec<Box<dyn RuleManager>>,
    solutions: HashMap<Rule, Solution>,
    moves: usize,
}

impl SolutionManager {
    /// Find every solution for `player` on the board tracked by `problems`.
    pub fn new(problems: &ProblemManager, player: Player) -> Self {
        let board = problems.board();
        let index = GroupIndex::new(problems.geometry(), player.other(), board.cols());
        let managers = all_managers(RuleContext::new(problems, player));

        let solutions: HashMap<_, _> = managers.iter()
            .flat_map(|manager| manager.rules())
            .filter_map(|rule| Solution::from_rule(rule.clone(), &index).map(|solution| (rule, solution)))
            .collect();
        debug!(%player, solutions = solutions.len(), "built solution manager");

        Self { player, index, managers, solutions, moves: 0 }
    }

    /// The player these solutions are for.
    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// Every current solution.
    pub fn get_solutions(&self) -> HashSet<Solution> {
        self.solutions.values().cloned().collect()
    }

    /// Current solutions coming from oddthreats and threat combinations.
    pub fn get_win_conditions(&self) -> HashSet<Solution> {
        self.solutions.values().filter(|solution| solution.is_win_condition()).cloned().collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.solutions.values()
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.moves > 0
    }

    /// Update after a move into `col`, where `problems` already reflects the move. Returns `(removed, added)`.
    pub fn make_move(&mut self, problems: &ProblemManager, col: Coord) -> (Vec<Solution>, Vec<Solution>) {
        let ctx = RuleContext::new(problems, self.player);
        let mut removed = Vec::new();
        let mut added = Vec::new();

        for manager in self.managers.iter_mut() {
            let (gone, new) = manager.make_move(ctx, col);
            removed.extend(gone.iter().filter_map(|rule| self.solutions.remove(rule)));
            for rule in new {
                if let Some(solution) = Solution::from_rule(rule.clone(), &self.index) {
                    added.push(solution.clone());
                    self.solutions.insert(rule, solution);
                }
            }
        }

        self.moves += 1;
        trace!(player = %self.player, col, removed = removed.len(), added = added.len(), "solution manager move");
        (removed, added)
    }

    /// Reverse the most recent [`Self::make_move`]. Returns `(added, removed)` of the move being reversed.
    pub fn undo_move(&mut self) -> Result<(Vec<Solution>, Vec<Solution>), MoveError> {
        if !self.can_undo() {
            return Err(MoveError::NothingToUndo);
        }

        let mut added = Vec::new();
        let mut removed = Vec::new();
        for manager in self.managers.iter_mut() {
            let (new, gone) = manager.undo_move().ok_or(MoveError::NothingToUndo)?;
            added.extend(new.iter().filter_map(|rule| self.solutions.remove(rule)));
            for rule in gone {
                if let Some(solution) = Solution::from_rule(rule.clone(), &self.index) {
                    removed.push(solution.clone());
                    self.solutions.insert(rule, solution);
                }
            }
        }

        self.moves -= 1;
        Ok((added, removed))
    }
}

impl Debug for SolutionManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolutionManager")
            .field("player", &self.player)
            .field("solutions", &self.solutions.len())
            .field("moves", &self.moves)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::builder::BoardBuilder;
    use crate::cell::Player;
    use crate::group::{Group, GroupIndex};
    use crate::problem::ProblemManager;
    use crate::rules::{Rule, Vertical};
    use crate::square::Square;

    use super::{Solution, SolutionManager};

    #[test]
    fn vertical_solves_two_groups() {
        // white holds e1, so of the vertical lines through e3 and e4 only the upper two are still open to black
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("e1").build().unwrap());
        let index = GroupIndex::new(problems.geometry(), Player::Black, problems.board().cols());
        let vertical = Vertical::new(Square::new(2, 4), Square::new(3, 4)).unwrap();
        let solution = Solution::from_rule(Rule::Vertical(vertical), &index).unwrap();
        assert_eq!(solution.problems_solved().len(), 3);

        let live: BTreeSet<_> = solution.problems_solved().iter().filter(|group| problems.is_potential(group)).cloned().collect();
        let expected: BTreeSet<_> = [1, 0]
            .map(|top| Group::new(Player::Black, (top..top + 4).map(|row| Square::new(row, 4))))
            .into_iter()
            .collect();
        assert_eq!(live, expected);
    }

    #[test]
    fn duplicate_rules_are_equal_solutions() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let index = GroupIndex::new(problems.geometry(), Player::White, problems.board().cols());
        let a = Solution::from_rule(Rule::Vertical(Vertical::new(Square::new(4, 0), Square::new(5, 0)).unwrap()), &index);
        let b = Solution::from_rule(Rule::Vertical(Vertical::new(Square::new(4, 0), Square::new(5, 0)).unwrap()), &index);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn move_and_undo_restore_solutions() {
        let mut problems = ProblemManager::new(BoardBuilder::default().play_moves("d1").build().unwrap());
        let mut manager = SolutionManager::new(&problems, Player::Black);
        let before = manager.get_solutions();
        assert!(!before.is_empty());
        assert!(manager.get_win_conditions().is_empty());

        problems.make_move(2).unwrap();
        let (removed, added) = manager.make_move(&problems, 2);
        assert!(!removed.is_empty());
        assert_eq!(manager.get_solutions(), SolutionManager::new(&problems, Player::Black).get_solutions());

        problems.undo_move().unwrap();
        let (undone_added, undone_removed) = manager.undo_move().unwrap();
        assert_eq!(undone_added.len(), added.len());
        assert_eq!(undone_removed.len(), removed.len());
        assert_eq!(manager.get_solutions(), before);
        assert!(manager.undo_move().is_err());
    }
}
