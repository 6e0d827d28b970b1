use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::group::Group;
use crate::rules::{Family, InvalidRule, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// Three directly playable squares, the middle one odd.
///
/// Either `first` and the square above `second` can both be claimed, or `second` and `third` can.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Baseclaim {
    first: Square,
    second: Square,
    third: Square,
    above_second: Square,
}

impl Baseclaim {
    /// Build a baseclaim; `second` must have a square above it.
    pub fn new(first: Square, second: Square, third: Square) -> Result<Self, InvalidRule> {
        if first == second || second == third || first == third {
            return Err(InvalidRule::IdenticalSquares);
        }
        if first.col == second.col || second.col == third.col || first.col == third.col {
            return Err(InvalidRule::SameColumn);
        }
        let above_second = second.above().ok_or(InvalidRule::NotStacked)?;

        Ok(Self { first, second, third, above_second })
    }

    /// The three playable squares in order.
    #[inline]
    pub fn playable(&self) -> (Square, Square, Square) {
        (self.first, self.second, self.third)
    }

    fn at(ctx: RuleContext, squares: (Square, Square, Square)) -> Option<Self> {
        let (first, second, third) = squares;
        if !ctx.board().is_odd_row(second.row) {
            return None;
        }
        Self::new(first, second, third).ok()
    }
}

impl Debug for Baseclaim {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Baseclaim({:?}, {:?}, {:?})", self.first, self.second, self.third)
    }
}

impl Tactic for Baseclaim {
    fn solves(&self, group: &Group) -> bool {
        (group.contains(&self.first) && group.contains(&self.above_second))
            || (group.contains(&self.second) && group.contains(&self.third))
    }

    fn squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.first, self.second, self.third, self.above_second])
    }

    fn claimeven_bottom_squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.second])
    }

    fn columns(&self) -> BTreeSet<Coord> {
        BTreeSet::from([self.first.col, self.second.col, self.third.col])
    }
}

impl Family for Baseclaim {
    const KIND: RuleKind = RuleKind::Baseclaim;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        ctx.board().playable_squares().into_iter()
            .permutations(3)
            .filter_map(|squares| Self::at(ctx, (squares[0], squares[1], squares[2])))
            .collect()
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

    use super::Baseclaim;

    #[test]
    fn second_square_must_be_odd() {
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("a b c").build().unwrap());
        let found = Baseclaim::find_all(RuleContext::new(&problems, Player::Black));
        // four odd squares remain playable, each between any ordered pair of the other six
        assert_eq!(found.len(), 4 * 6 * 5);
        assert!(found.iter().all(|baseclaim| baseclaim.playable().1.row == 5));
        assert_eq!(Baseclaim::find_touching(RuleContext::new(&problems, Player::Black), 0).len(), 4 * 5 * 2);
    }

    #[test]
    fn pairs_outer_and_inner_squares() {
        let baseclaim = Baseclaim::new(Square::new(5, 0), Square::new(5, 1), Square::new(5, 2)).unwrap();
        let across = Group::new(Player::White, [Square::new(5, 0), Square::new(4, 1), Square::new(3, 2), Square::new(2, 3)]);
        assert!(baseclaim.solves(&across));
        let bottom = Group::new(Player::White, (1..5).map(|col| Square::new(5, col)));
        assert!(baseclaim.solves(&bottom));
        let upward = Group::new(Player::White, (2..6).map(|row| Square::new(row, 1)));
        assert!(!baseclaim.solves(&upward));
    }
}
