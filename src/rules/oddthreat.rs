use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::cell::Player;
use crate::group::Group;
use crate::rules::{columns_of, Family, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// A potential group of White missing only one odd square, which nobody can play yet.
///
/// With zugzwang in White's favor, Black will never get that square nor anything above it in the column, and White gets
/// the odd squares below it as well.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Oddthreat {
    group: Group,
    empty: Square,
    odd_squares_below: Vec<Square>,
}

impl Oddthreat {
    /// The nearly complete group.
    #[inline]
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// The square White is waiting to complete the group on.
    #[inline]
    pub fn empty_square(&self) -> Square {
        self.empty
    }

    /// Odd empty squares of the column between the one directly playable and [`Self::empty_square`].
    #[inline]
    pub fn odd_squares_below(&self) -> &[Square] {
        &self.odd_squares_below
    }

    fn from_group(ctx: RuleContext, group: &Group) -> Option<Self> {
        let board = ctx.board();
        let empty_squares = ctx.empty_squares(group);
        let [empty] = empty_squares[..] else {
            return None;
        };
        if !board.is_odd_row(empty.row) || board.is_playable(empty) {
            return None;
        }

        let frontier = board.playable_in_column(empty.col)?;
        let odd_squares_below = (empty.row + 1..frontier.row)
            .filter(|row| board.is_odd_row(*row))
            .map(|row| Square::new(row, empty.col))
            .collect_vec();

        Some(Self { group: group.clone(), empty, odd_squares_below })
    }
}

impl Debug for Oddthreat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Oddthreat({:?} at {:?})", self.group, self.empty)
    }
}

impl Tactic for Oddthreat {
    fn solves(&self, group: &Group) -> bool {
        group.squares().iter().any(|square| square.col == self.empty.col && square.row <= self.empty.row)
            || self.odd_squares_below.iter().any(|square| group.contains(square))
    }

    fn squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.empty])
    }

    fn columns(&self) -> BTreeSet<Coord> {
        columns_of(self.group.squares())
    }
}

impl Family for Oddthreat {
    const KIND: RuleKind = RuleKind::Oddthreat;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        if ctx.player != Player::White {
            return HashSet::new();
        }
        ctx.own_groups().filter_map(|group| Self::from_group(ctx, group)).collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        if ctx.player != Player::White {
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

    use super::Oddthreat;

    #[test]
    fn row_three_threat() {
        // white holds a3 b3 c3 on top of filled columns, d3 is still two moves away
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("a1 a2 b1 b2 c1 c2 a3 g1 b3 g2 c3").build().unwrap());
        let found = Oddthreat::find_all(RuleContext::new(&problems, Player::White));
        let threat = found.iter().find(|threat| threat.empty_square() == Square::new(3, 3)).unwrap();
        assert!(threat.odd_squares_below().is_empty());

        let through = Group::new(Player::Black, (3..7).map(|col| Square::new(3, col)));
        assert!(threat.solves(&through));
        let above = Group::new(Player::Black, (0..4).map(|row| Square::new(row, 3)));
        assert!(threat.solves(&above));
        let below = Group::new(Player::Black, (3..7).map(|col| Square::new(4, col)));
        assert!(!threat.solves(&below));
        assert!(Oddthreat::find_all(RuleContext::new(&problems, Player::Black)).is_empty());
    }

    #[test]
    fn collects_odd_squares_below() {
        // white tops columns a to c on row five while column d is still empty
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("a a a a a g b b b b b g c c c c c").build().unwrap());
        let ctx = RuleContext::new(&problems, Player::White);
        let row_five = Group::new(Player::White, (0..4).map(|col| Square::new(1, col)));
        assert!(problems.is_potential(&row_five));
        let threat = Oddthreat::find_touching(ctx, 3).into_iter().find(|threat| threat.group() == &row_five).unwrap();
        assert_eq!(threat.odd_squares_below(), &[Square::new(3, 3)]);
        assert!(threat.solves(&Group::new(Player::Black, (3..7).map(|col| Square::new(3, col)))));
    }
}
