use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::group::Group;
use crate::rules::{Family, InvalidRule, RuleContext, RuleKind, Tactic, Vertical};
use crate::square::{Coord, Square};

/// Two [`Vertical`]s in different columns with connectable upper squares.
///
/// Besides what the verticals solve, one of the two upper squares can always be taken, so a group running through both
/// is refuted as well.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Lowinverse {
    first: Vertical,
    second: Vertical,
}

impl Lowinverse {
    /// Combine two verticals, in either order.
    pub fn new(a: Vertical, b: Vertical) -> Result<Self, InvalidRule> {
        if a == b {
            return Err(InvalidRule::IdenticalSquares);
        }
        if a.upper().col == b.upper().col {
            return Err(InvalidRule::SameColumn);
        }

        Ok(Self { first: a.min(b), second: a.max(b) })
    }

    /// Both verticals, smaller first.
    #[inline]
    pub fn verticals(&self) -> (Vertical, Vertical) {
        (self.first, self.second)
    }

    fn touches_both_uppers(&self, group: &Group) -> bool {
        group.contains(&self.first.upper()) && group.contains(&self.second.upper())
    }

    fn pairs(ctx: RuleContext, left: &[Vertical], right: &[Vertical]) -> HashSet<Self> {
        let geometry = ctx.problems.geometry();
        left.iter()
            .cartesian_product(right.iter())
            .filter(|(a, b)| geometry.connectable(a.upper(), b.upper()))
            .filter_map(|(a, b)| Self::new(*a, *b).ok())
            .collect()
    }
}

impl Debug for Lowinverse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lowinverse({:?}, {:?})", self.first, self.second)
    }
}

impl Tactic for Lowinverse {
    fn solves(&self, group: &Group) -> bool {
        self.touches_both_uppers(group) || self.first.solves(group) || self.second.solves(group)
    }

    fn squares(&self) -> BTreeSet<Square> {
        self.first.squares().into_iter().chain(self.second.squares()).collect()
    }

    fn columns(&self) -> BTreeSet<Coord> {
        BTreeSet::from([self.first.upper().col, self.second.upper().col])
    }

    fn is_useful(&self, solved: &[&Group]) -> bool {
        solved.iter().any(|group| self.touches_both_uppers(group) && !self.first.solves(group) && !self.second.solves(group))
    }
}

impl Family for Lowinverse {
    const KIND: RuleKind = RuleKind::Lowinverse;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        let verticals = Vertical::find_all(ctx).into_iter().collect_vec();
        Self::pairs(ctx, &verticals, &verticals)
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        let (here, elsewhere): (Vec<_>, Vec<_>) = Vertical::find_all(ctx).into_iter()
            .partition(|vertical| vertical.upper().col == col);
        Self::pairs(ctx, &here, &elsewhere)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::BoardBuilder;
    use crate::cell::Player;
    use crate::group::Group;
    use crate::problem::ProblemManager;
    use crate::rules::{Family, InvalidRule, RuleContext, Tactic, Vertical};
    use crate::square::Square;

    use super::Lowinverse;

    #[test]
    fn same_column_is_rejected() {
        let a = Vertical::new(Square::new(3, 0), Square::new(4, 0)).unwrap();
        let b = Vertical::new(Square::new(1, 0), Square::new(2, 0)).unwrap();
        assert_eq!(Lowinverse::new(a, b), Err(InvalidRule::SameColumn));
    }

    #[test]
    fn solves_row_through_uppers() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let a = Vertical::new(Square::new(3, 1), Square::new(4, 1)).unwrap();
        let b = Vertical::new(Square::new(3, 3), Square::new(4, 3)).unwrap();
        let lowinverse = Lowinverse::new(a, b).unwrap();
        assert!(Lowinverse::find_touching(RuleContext::new(&problems, Player::Black), 1).contains(&lowinverse));

        let row = Group::new(Player::White, (0..4).map(|col| Square::new(3, col)));
        assert!(lowinverse.solves(&row));
        assert!(lowinverse.is_useful(&[&row]));
        let column = Group::new(Player::White, (1..5).map(|row| Square::new(row, 1)));
        assert!(lowinverse.solves(&column));
        assert!(!lowinverse.is_useful(&[&column]));
    }
}
