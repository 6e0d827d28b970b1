use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::cell::Player;
use crate::group::Group;
use crate::rules::{columns_of, Claimeven, Family, RuleContext, RuleKind, Tactic, Vertical};
use crate::square::{Coord, Square};

/// One way to fill the empty squares of a potential group of Black.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub(crate) enum Filler {
    Claimeven(Claimeven),
    Vertical(Vertical),
}

impl Filler {
    pub(crate) fn squares(&self) -> [Square; 2] {
        match self {
            Filler::Claimeven(claimeven) => [claimeven.upper(), claimeven.lower()],
            Filler::Vertical(vertical) => [vertical.upper(), vertical.lower()],
        }
    }

    pub(crate) fn solves(&self, group: &Group) -> bool {
        match self {
            Filler::Claimeven(claimeven) => claimeven.solves(group),
            Filler::Vertical(vertical) => vertical.solves(group),
        }
    }
}

/// A potential group of Black without squares in the top row, whose empty squares are filled by [`Claimeven`]s and
/// [`Vertical`]s.
///
/// Black completes the group unless White plays one of its empty squares, which lets Black take the square above it, the
/// *successor*. Every group of White through all successors is refuted as well.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Before {
    group: Group,
    verticals: Vec<Vertical>,
    claimevens: Vec<Claimeven>,
    successors: Vec<Square>,
}

impl Before {
    /// The group being completed.
    #[inline]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Verticals used, sorted.
    #[inline]
    pub fn verticals(&self) -> &[Vertical] {
        &self.verticals
    }

    /// Claimevens used, sorted.
    #[inline]
    pub fn claimevens(&self) -> &[Claimeven] {
        &self.claimevens
    }

    /// The squares directly above each empty square of the group.
    #[inline]
    pub fn successors(&self) -> &[Square] {
        &self.successors
    }

    pub(crate) fn contains_all_successors(&self, group: &Group) -> bool {
        self.successors.iter().all(|square| group.contains(square))
    }

    pub(crate) fn fillers(&self) -> impl Iterator<Item = Filler> + '_ {
        self.claimevens.iter().map(|claimeven| Filler::Claimeven(*claimeven))
            .chain(self.verticals.iter().map(|vertical| Filler::Vertical(*vertical)))
    }

    /// Every way to fill `group`, whether useful or not.
    pub(crate) fn variations(ctx: RuleContext, group: &Group) -> Vec<Self> {
        let board = ctx.board();
        if group.squares().iter().any(|square| square.row == 0) {
            return Vec::new();
        }

        let empty = ctx.empty_squares(group);
        if empty.is_empty() {
            return Vec::new();
        }

        let mut successors = Vec::with_capacity(empty.len());
        let mut options = Vec::with_capacity(empty.len());
        for square in empty {
            let Some(successor) = square.above() else {
                return Vec::new();
            };
            successors.push(successor);

            let mut here = Vec::with_capacity(2);
            if board.is_odd_row(square.row) {
                here.extend(Claimeven::new(successor, square).ok().map(Filler::Claimeven));
            } else {
                here.extend(Vertical::new(successor, square).ok().map(Filler::Vertical));
                here.extend(Claimeven::at(ctx, square).map(Filler::Claimeven));
            }
            options.push(here);
        }

        options.into_iter()
            .multi_cartesian_product()
            .filter_map(|fillers| {
                let fillers = fillers.into_iter().sorted().dedup().collect_vec();
                let disjoint = fillers.iter()
                    .tuple_combinations()
                    .all(|(a, b)| a.squares().iter().all(|square| !b.squares().contains(square)));
                disjoint.then(|| Self::from_fillers(group.clone(), fillers, successors.clone()))
            })
            .collect_vec()
    }

    pub(crate) fn from_fillers(group: Group, fillers: Vec<Filler>, successors: Vec<Square>) -> Self {
        let mut verticals = Vec::new();
        let mut claimevens = Vec::new();
        for filler in fillers {
            match filler {
                Filler::Claimeven(claimeven) => claimevens.push(claimeven),
                Filler::Vertical(vertical) => verticals.push(vertical),
            }
        }
        verticals.sort();
        claimevens.sort();

        Self { group, verticals, claimevens, successors }
    }
}

impl Debug for Before {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Before({:?}, {:?}, {:?})", self.group, self.verticals, self.claimevens)
    }
}

impl Tactic for Before {
    fn solves(&self, group: &Group) -> bool {
        self.contains_all_successors(group) || self.fillers().any(|filler| filler.solves(group))
    }

    fn squares(&self) -> BTreeSet<Square> {
        self.fillers().flat_map(|filler| filler.squares()).collect()
    }

    fn claimeven_bottom_squares(&self) -> BTreeSet<Square> {
        self.claimevens.iter().map(|claimeven| claimeven.lower()).collect()
    }

    fn columns(&self) -> BTreeSet<Coord> {
        columns_of(self.group.squares())
    }

    fn is_useful(&self, solved: &[&Group]) -> bool {
        solved.iter().any(|group| self.contains_all_successors(group) && !self.fillers().any(|filler| filler.solves(group)))
    }
}

impl Family for Before {
    const KIND: RuleKind = RuleKind::Before;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        if ctx.player != Player::Black {
            return HashSet::new();
        }
        ctx.own_groups().flat_map(|group| Self::variations(ctx, group)).collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        if ctx.player != Player::Black {
            return HashSet::new();
        }
        ctx.own_groups_touching(col).flat_map(|group| Self::variations(ctx, group)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::BoardBuilder;
    use crate::cell::Player;
    use crate::group::Group;
    use crate::problem::ProblemManager;
    use crate::rules::{Family, RuleContext, Tactic};
    use crate::square::Square;

    use super::Before;

    #[test]
    fn odd_row_group_uses_claimevens() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let ctx = RuleContext::new(&problems, Player::Black);
        let row_three = Group::new(Player::Black, (0..4).map(|col| Square::new(3, col)));

        let variations = Before::variations(ctx, &row_three);
        assert_eq!(variations.len(), 1);
        let before = &variations[0];
        assert_eq!(before.claimevens().len(), 4);
        assert!(before.verticals().is_empty());
        assert!(before.solves(&Group::new(Player::White, (0..4).map(|col| Square::new(2, col)))));
        assert!(!before.solves(&Group::new(Player::White, (1..5).map(|col| Square::new(1, col)))));
    }

    #[test]
    fn even_row_group_mixes_fillers() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let ctx = RuleContext::new(&problems, Player::Black);
        let row_two = Group::new(Player::Black, (2..6).map(|col| Square::new(4, col)));
        // each even square takes a vertical above it or a claimeven below it
        assert_eq!(Before::variations(ctx, &row_two).len(), 16);

        let top = Group::new(Player::Black, (0..4).map(|col| Square::new(0, col)));
        assert!(Before::variations(ctx, &top).is_empty());
        assert!(Before::find_all(RuleContext::new(&problems, Player::White)).is_empty());
    }
}
