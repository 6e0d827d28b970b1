use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;

use crate::group::Group;
use crate::rules::{Family, InvalidRule, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// Three stacked empty squares, the upper one even, as used by a [`Highinverse`].
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Column {
    upper: Square,
    middle: Square,
    lower: Square,
    directly_playable: bool,
}

impl Column {
    /// Stack `upper`, `middle` and `lower`, recording whether `lower` can be played right away.
    pub fn new(upper: Square, middle: Square, lower: Square, directly_playable: bool) -> Result<Self, InvalidRule> {
        if upper == middle || middle == lower {
            return Err(InvalidRule::IdenticalSquares);
        }
        if middle.above() != Some(upper) || lower.above() != Some(middle) {
            return Err(InvalidRule::NotStacked);
        }

        Ok(Self { upper, middle, lower, directly_playable })
    }

    /// The even square on top.
    #[inline]
    pub fn upper(&self) -> Square {
        self.upper
    }

    /// The odd square in between.
    #[inline]
    pub fn middle(&self) -> Square {
        self.middle
    }

    /// The even square at the bottom.
    #[inline]
    pub fn lower(&self) -> Square {
        self.lower
    }

    /// Whether [`Self::lower`] was directly playable when this column was found.
    #[inline]
    pub fn directly_playable(&self) -> bool {
        self.directly_playable
    }

    fn at(ctx: RuleContext, upper: Square) -> Option<Self> {
        let board = ctx.board();
        let middle = board.square_below(upper)?;
        let lower = board.square_below(middle)?;
        if !board.is_even_row(upper.row) || ![upper, middle, lower].iter().all(|square| board.is_empty(*square)) {
            return None;
        }

        Some(Self { upper, middle, lower, directly_playable: board.is_playable(lower) })
    }

    fn find_in(ctx: RuleContext, col: Coord) -> Vec<Self> {
        ctx.board().column(col).filter_map(|upper| Self::at(ctx, upper)).collect_vec()
    }
}

impl Debug for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column({:?}, {:?}, {:?}{})", self.upper, self.middle, self.lower, if self.directly_playable { ", playable" } else { "" })
    }
}

/// Two [`Column`]s in different columns.
///
/// Of each column either the two upper squares or the middle square can be taken, which pairs the squares of the two
/// columns in six ways; the two pairings involving a lower square need that square to be directly playable.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Highinverse {
    first: Column,
    second: Column,
}

impl Highinverse {
    /// Combine two columns, in either order.
    pub fn new(a: Column, b: Column) -> Result<Self, InvalidRule> {
        if a == b {
            return Err(InvalidRule::IdenticalSquares);
        }
        if a.upper.col == b.upper.col {
            return Err(InvalidRule::SameColumn);
        }

        Ok(Self { first: a.min(b), second: a.max(b) })
    }

    /// Both columns, smaller first.
    #[inline]
    pub fn columns_used(&self) -> (Column, Column) {
        (self.first, self.second)
    }
}

impl Debug for Highinverse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Highinverse({:?}, {:?})", self.first, self.second)
    }
}

impl Tactic for Highinverse {
    fn solves(&self, group: &Group) -> bool {
        let (a, b) = (&self.first, &self.second);
        let both = |x: Square, y: Square| group.contains(&x) && group.contains(&y);

        both(a.upper, b.upper)
            || both(a.middle, b.middle)
            || both(a.middle, a.upper)
            || both(b.middle, b.upper)
            || (a.directly_playable && both(a.lower, b.upper))
            || (b.directly_playable && both(b.lower, a.upper))
    }

    fn squares(&self) -> BTreeSet<Square> {
        [self.first, self.second].iter()
            .flat_map(|column| [column.upper, column.middle, column.lower])
            .collect()
    }

    fn columns(&self) -> BTreeSet<Coord> {
        BTreeSet::from([self.first.upper.col, self.second.upper.col])
    }
}

impl Family for Highinverse {
    const KIND: RuleKind = RuleKind::Highinverse;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        (0..ctx.board().cols())
            .flat_map(|col| Column::find_in(ctx, col))
            .tuple_combinations()
            .filter_map(|(a, b)| Self::new(a, b).ok())
            .collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        let here = Column::find_in(ctx, col);
        let elsewhere = (0..ctx.board().cols())
            .filter(|other| *other != col)
            .flat_map(|other| Column::find_in(ctx, other))
            .collect_vec();

        here.iter()
            .cartesian_product(elsewhere.iter())
            .filter_map(|(a, b)| Self::new(*a, *b).ok())
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

    use super::{Column, Highinverse};

    #[test]
    fn lower_pairing_needs_playable_square() {
        let a = Column::new(Square::new(2, 0), Square::new(3, 0), Square::new(4, 0), true).unwrap();
        let b = Column::new(Square::new(2, 2), Square::new(3, 2), Square::new(4, 2), false).unwrap();
        let highinverse = Highinverse::new(a, b).unwrap();

        let rising = Group::new(Player::White, [Square::new(4, 0), Square::new(3, 1), Square::new(2, 2), Square::new(1, 3)]);
        assert!(highinverse.solves(&rising));
        let falling = Group::new(Player::White, [Square::new(2, 0), Square::new(3, 1), Square::new(4, 2), Square::new(5, 3)]);
        assert!(!highinverse.solves(&falling));
        let upper_row = Group::new(Player::White, (0..4).map(|col| Square::new(2, col)));
        assert!(highinverse.solves(&upper_row));
        let lower_row = Group::new(Player::White, (0..4).map(|col| Square::new(4, col)));
        assert!(!highinverse.solves(&lower_row));
    }

    #[test]
    fn found_on_empty_board() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let ctx = RuleContext::new(&problems, Player::Black);
        // two stacks per column
        assert_eq!(Highinverse::find_all(ctx).len(), 14 * 13 / 2 - 7);
        assert_eq!(Highinverse::find_touching(ctx, 6).len(), 2 * 12);
    }
}
