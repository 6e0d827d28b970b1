use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;
use petgraph::graphmap::UnGraphMap;
use tracing::{debug, trace};

use crate::bitset::BitSet;
use crate::board::{Board, MoveError};
use crate::cell::Player;
use crate::combination::{allowed, precedence};
use crate::group::Group;
use crate::problem::ProblemManager;
use crate::rules::Rule;
use crate::solution::{Solution, SolutionManager};
use crate::solver::CoverSolver;
use crate::square::{Coord, Square};

type SolutionId = usize;

struct Entry {
    // its rule is the one among `rules` that comes first in the combination order
    solution: Solution,
    rules: Vec<Rule>,
}

fn representative(rules: &[Rule]) -> Option<&Rule> {
    rules.iter().min_by_key(|rule| (precedence(rule.kind()), rule.kind()))
}

/// The solutions of one player, the groups of the opponent they refute, and which solutions combine.
///
/// The three relations are patched on every move instead of being rebuilt, and [`Self::evaluate`] searches them for a
/// set of solutions refuting every group the opponent could still complete.
pub struct GraphManager {
    player: Player,
    problems: ProblemManager,
    solutions: SolutionManager,
    ids: HashMap<Solution, SolutionId>,
    entries: HashMap<SolutionId, Entry>,
    next_id: SolutionId,
    // one entry per current problem
    problem_to_solutions: HashMap<Group, HashSet<SolutionId>>,
    // restricted to current problems
    solution_to_problems: HashMap<SolutionId, HashSet<Group>>,
    // every group some solution solves, current or not
    by_group: HashMap<Group, HashSet<SolutionId>>,
    compatible: UnGraphMap<SolutionId, ()>,
}

impl GraphManager {
    /// Relate the solutions of `solutions` to the groups tracked by `problems`.
    ///
    /// Both must describe the same board.
    pub fn new(problems: ProblemManager, solutions: SolutionManager) -> Self {
        let player = solutions.player();
        let problem_to_solutions = problems.potential_groups(player.other())
            .map(|group| (group.clone(), HashSet::new()))
            .collect();
        let initial = solutions.iter().cloned().collect_vec();

        let mut ret = Self {
            player,
            problems,
            solutions,
            ids: HashMap::new(),
            entries: HashMap::new(),
            next_id: 0,
            problem_to_solutions,
            solution_to_problems: HashMap::new(),
            by_group: HashMap::new(),
            compatible: UnGraphMap::new(),
        };
        for solution in initial {
            ret.add_solution(solution);
        }

        debug!(
            %player,
            problems = ret.problem_to_solutions.len(),
            solutions = ret.entries.len(),
            edges = ret.compatible.edge_count(),
            "built graph manager"
        );
        ret
    }

    /// Track `board` and the solutions of `player` on it.
    pub fn from_board(board: Board, player: Player) -> Self {
        let problems = ProblemManager::new(board);
        let solutions = SolutionManager::new(&problems, player);
        Self::new(problems, solutions)
    }

    /// The player whose solutions are used.
    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// The board as of the latest move.
    #[inline]
    pub fn board(&self) -> &Board {
        self.problems.board()
    }

    /// Potential groups of both players.
    #[inline]
    pub fn problems(&self) -> &ProblemManager {
        &self.problems
    }

    /// Solutions of [`Self::player`].
    #[inline]
    pub fn solutions(&self) -> &SolutionManager {
        &self.solutions
    }

    /// Every current problem, with the solutions refuting it.
    pub fn problem_to_solutions(&self) -> HashMap<Group, HashSet<Solution>> {
        self.problem_to_solutions.iter()
            .map(|(group, ids)| (group.clone(), self.materialize(ids.iter())))
            .collect()
    }

    /// Every solution, with the current problems it refutes.
    pub fn solution_to_problems(&self) -> HashMap<Solution, HashSet<Group>> {
        self.solution_to_problems.iter()
            .map(|(id, groups)| (self.entries[id].solution.clone(), groups.clone()))
            .collect()
    }

    /// Every solution, with the solutions it may be combined with, itself included.
    pub fn solution_to_solutions(&self) -> HashMap<Solution, HashSet<Solution>> {
        self.entries.iter()
            .map(|(id, entry)| {
                let mut with = self.materialize(self.compatible.neighbors(*id).collect_vec().iter());
                with.insert(entry.solution.clone());
                (entry.solution.clone(), with)
            })
            .collect()
    }

    fn materialize<'a>(&self, ids: impl Iterator<Item = &'a SolutionId>) -> HashSet<Solution> {
        ids.map(|id| self.entries[id].solution.clone()).collect()
    }

    /// Play the directly playable square `(row, col)` for the player to move.
    pub fn make_move(&mut self, row: Coord, col: Coord) -> Result<(), MoveError> {
        let board = self.problems.board();
        let square = Square::new(row, col);
        if !board.contains(square) {
            return Err(MoveError::OutOfBounds);
        }
        if board.playable_in_column(col).ok_or(MoveError::ColumnFull)? != square {
            return Err(MoveError::NotPlayable { square });
        }

        let mover = board.player_to_move();
        let refuted = self.problems.make_move(col)?;
        if mover == self.player {
            for group in refuted.iter() {
                self.remove_problem(group);
            }
        }

        let (removed, added) = self.solutions.make_move(&self.problems, col);
        for solution in removed.iter() {
            self.remove_solution(solution);
        }
        for solution in added.iter() {
            self.add_solution(solution.clone());
        }

        trace!(?square, %mover, removed = removed.len(), added = added.len(), "graph manager move");
        Ok(())
    }

    /// Take back the most recent [`Self::make_move`].
    pub fn undo_move(&mut self) -> Result<(), MoveError> {
        if !self.solutions.can_undo() {
            return Err(MoveError::NothingToUndo);
        }

        for group in self.problems.undo_move()? {
            if group.player != self.player {
                self.restore_problem(group);
            }
        }

        let (added, removed) = self.solutions.undo_move()?;
        for solution in added.iter() {
            self.remove_solution(solution);
        }
        for solution in removed.iter() {
            self.add_solution(solution.clone());
        }

        trace!(removed = added.len(), restored = removed.len(), "graph manager undo");
        Ok(())
    }

    fn remove_problem(&mut self, group: &Group) {
        let Some(ids) = self.problem_to_solutions.remove(group) else {
            return;
        };
        for id in ids {
            if let Some(groups) = self.solution_to_problems.get_mut(&id) {
                groups.remove(group);
            }
        }
    }

    fn restore_problem(&mut self, group: Group) {
        let ids = self.by_group.get(&group).cloned().unwrap_or_default();
        for id in ids.iter() {
            if let Some(groups) = self.solution_to_problems.get_mut(id) {
                groups.insert(group.clone());
            }
        }
        self.problem_to_solutions.insert(group, ids);
    }

    fn add_solution(&mut self, solution: Solution) {
        if let Some(id) = self.ids.get(&solution).copied() {
            let Some(entry) = self.entries.get_mut(&id) else {
                return;
            };
            entry.rules.push(solution.rule);
            self.refresh_representative(id);
            return;
        }

        let id = self.next_id;
        self.next_id += 1;

        let mut current = HashSet::new();
        for group in solution.problems_solved() {
            self.by_group.entry(group.clone()).or_default().insert(id);
            if let Some(ids) = self.problem_to_solutions.get_mut(group) {
                ids.insert(id);
                current.insert(group.clone());
            }
        }

        self.ids.insert(solution.clone(), id);
        self.solution_to_problems.insert(id, current);
        self.entries.insert(id, Entry { rules: vec![solution.rule.clone()], solution });
        self.connect(id);
    }

    fn remove_solution(&mut self, solution: &Solution) {
        let Some(id) = self.ids.get(solution).copied() else {
            return;
        };
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        if let Some(position) = entry.rules.iter().position(|rule| rule == solution.rule()) {
            entry.rules.swap_remove(position);
        }
        if !entry.rules.is_empty() {
            self.refresh_representative(id);
            return;
        }

        self.ids.remove(solution);
        let entry = self.entries.remove(&id);
        for group in self.solution_to_problems.remove(&id).into_iter().flatten() {
            if let Some(ids) = self.problem_to_solutions.get_mut(&group) {
                ids.remove(&id);
            }
        }
        for group in entry.iter().flat_map(|entry| entry.solution.problems_solved()) {
            if let Some(ids) = self.by_group.get_mut(group) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.by_group.remove(group);
                }
            }
        }
        self.compatible.remove_node(id);
    }

    /// Make the entry's solution carry its first rule, recomputing edges if that changes how it combines.
    fn refresh_representative(&mut self, id: SolutionId) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        let Some(rule) = representative(&entry.rules).cloned() else {
            return;
        };
        let changed = rule.kind() != entry.solution.rule.kind();
        entry.solution.rule = rule;
        if changed {
            self.connect(id);
        }
    }

    fn connect(&mut self, id: SolutionId) {
        self.compatible.remove_node(id);
        self.compatible.add_node(id);

        let solution = &self.entries[&id].solution;
        let neighbors = self.entries.iter()
            .filter(|(other, entry)| **other != id && allowed(solution, &entry.solution))
            .map(|(other, _)| *other)
            .collect_vec();
        for other in neighbors {
            self.compatible.add_edge(id, other, ());
        }
    }

    /// A set of mutually compatible solutions refuting every current problem, or [`None`] if there is none.
    ///
    /// When the solutions are White's, the set must also contain a win condition, which is what lets White profit from
    /// the opponent being refuted.
    pub fn evaluate(&self) -> Option<HashSet<Solution>> {
        // ordered by content, not by arrival
        let ids = self.entries.iter()
            .sorted_by(|(_, a), (_, b)| {
                (a.solution.squares(), a.solution.problems_solved()).cmp(&(b.solution.squares(), b.solution.problems_solved()))
            })
            .map(|(id, _)| *id)
            .collect_vec();
        let position: HashMap<SolutionId, usize> = ids.iter().enumerate().map(|(index, id)| (*id, index)).collect();
        let problems: HashMap<&Group, usize> = self.problem_to_solutions.keys()
            .sorted()
            .enumerate()
            .map(|(index, group)| (group, index))
            .collect();
        let needs_win = self.player == Player::White;
        let num_requirements = problems.len() + usize::from(needs_win);

        let covers = ids.iter()
            .map(|id| {
                let mut met: BitSet = self.solution_to_problems[id].iter().map(|group| problems[group]).collect();
                if needs_win && self.entries[id].solution.is_win_condition() {
                    met.insert(problems.len());
                }
                met
            })
            .collect_vec();
        let compatible = ids.iter()
            .map(|id| {
                let mut with: BitSet = self.compatible.neighbors(*id).map(|other| position[&other]).collect();
                with.insert(position[id]);
                with
            })
            .collect_vec();

        let ret = CoverSolver::new(num_requirements, compatible, covers)
            .solve()
            .map(|chosen| chosen.into_iter().map(|index| self.entries[&ids[index]].solution.clone()).collect::<HashSet<_>>());
        debug!(
            player = %self.player,
            problems = problems.len(),
            solutions = ids.len(),
            proven = ret.is_some(),
            used = ret.as_ref().map_or(0, HashSet::len),
            "evaluated position"
        );
        ret
    }
}

impl Debug for GraphManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphManager")
            .field("player", &self.player)
            .field("problems", &self.problem_to_solutions.len())
            .field("solutions", &self.entries.len())
            .field("edges", &self.compatible.edge_count())
            .finish()
    }
}
