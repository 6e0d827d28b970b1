use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::cell::Player;
use crate::group::Group;
use crate::rules::{columns_of, Claimeven, Family, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// A potential group of Black whose empty squares are all even and can each be claimed by a [`Claimeven`].
///
/// Once the claimevens are played out Black has completed the group, so White must prevent it by playing below; every
/// group of White running above the empty squares is refuted as well.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Aftereven {
    group: Group,
    claimevens: Vec<Claimeven>,
}

impl Aftereven {
    /// The group being completed.
    #[inline]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// One claimeven per empty square of the group, sorted.
    #[inline]
    pub fn claimevens(&self) -> &[Claimeven] {
        &self.claimevens
    }

    fn from_group(ctx: RuleContext, group: &Group) -> Option<Self> {
        let empty = ctx.empty_squares(group);
        if empty.is_empty() {
            return None;
        }

        let claimevens = empty.into_iter()
            .map(|square| Claimeven::at(ctx, square))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { group: group.clone(), claimevens: claimevens.into_iter().sorted().collect_vec() })
    }

    fn solves_above(&self, group: &Group) -> bool {
        self.claimevens.iter().all(|claimeven| {
            group.squares().iter().any(|square| square.col == claimeven.upper().col && square.is_above(&claimeven.upper()))
        })
    }
}

impl Debug for Aftereven {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aftereven({:?}, {:?})", self.group, self.claimevens)
    }
}

impl Tactic for Aftereven {
    fn solves(&self, group: &Group) -> bool {
        self.solves_above(group) || self.claimevens.iter().any(|claimeven| claimeven.solves(group))
    }

    fn squares(&self) -> BTreeSet<Square> {
        self.claimevens.iter().flat_map(|claimeven| claimeven.squares()).collect()
    }

    fn claimeven_bottom_squares(&self) -> BTreeSet<Square> {
        self.claimevens.iter().map(|claimeven| claimeven.lower()).collect()
    }

    fn columns(&self) -> BTreeSet<Coord> {
        columns_of(self.group.squares())
    }

    fn is_useful(&self, solved: &[&Group]) -> bool {
        solved.iter().any(|group| !self.claimevens.iter().any(|claimeven| claimeven.solves(group)))
    }
}

impl Family for Aftereven {
    const KIND: RuleKind = RuleKind::Aftereven;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        if ctx.player != Player::Black {
            return HashSet::new();
        }
        ctx.own_groups().filter_map(|group| Self::from_group(ctx, group)).collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        if ctx.player != Player::Black {
            return HashSet::new();
        }
        ctx.own_groups_touching(col).filter_map(|group| Self::from_group(ctx, group)).collect()
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

    use super::Aftereven;

    #[test]
    fn completes_row_two() {
        // black holds b2 and c2, leaving a2 and d2 on the even row
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("b1 b2 c1 c2 f1").build().unwrap());
        let found = Aftereven::find_all(RuleContext::new(&problems, Player::Black));
        let row_two = Group::new(Player::Black, (0..4).map(|col| Square::new(4, col)));
        let aftereven = found.iter().find(|aftereven| *aftereven.group() == row_two).unwrap();

        assert_eq!(aftereven.claimevens().len(), 2);
        assert!(aftereven.solves(&Group::new(Player::White, (0..4).map(|col| Square::new(3, col)))));
        assert!(!aftereven.solves(&Group::new(Player::White, (1..5).map(|col| Square::new(3, col)))));
        assert!(Aftereven::find_all(RuleContext::new(&problems, Player::White)).is_empty());
    }
}
