use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use crate::group::Group;
use crate::rules::{Family, InvalidRule, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// Two stacked empty squares, the upper one odd. Whoever plays `lower`, the other side can answer on `upper`.
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Vertical {
    upper: Square,
    lower: Square,
}

impl Vertical {
    /// Pair `upper` with the square directly below it.
    pub fn new(upper: Square, lower: Square) -> Result<Self, InvalidRule> {
        if upper == lower {
            return Err(InvalidRule::IdenticalSquares);
        }
        if lower.above() != Some(upper) {
            return Err(InvalidRule::NotStacked);
        }

        Ok(Self { upper, lower })
    }

    /// The odd square on top.
    #[inline]
    pub fn upper(&self) -> Square {
        self.upper
    }

    /// The even square below it.
    #[inline]
    pub fn lower(&self) -> Square {
        self.lower
    }

    pub(crate) fn at(ctx: RuleContext, upper: Square) -> Option<Self> {
        let board = ctx.board();
        let lower = board.square_below(upper)?;
        (board.is_odd_row(upper.row) && board.is_empty(upper) && board.is_empty(lower)).then_some(Self { upper, lower })
    }
}

impl Debug for Vertical {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vertical({:?}, {:?})", self.upper, self.lower)
    }
}

impl Tactic for Vertical {
    fn solves(&self, group: &Group) -> bool {
        group.contains(&self.upper) && group.contains(&self.lower)
    }

    fn squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.upper, self.lower])
    }

    fn columns(&self) -> BTreeSet<Coord> {
        BTreeSet::from([self.upper.col])
    }
}

impl Family for Vertical {
    const KIND: RuleKind = RuleKind::Vertical;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        (0..ctx.board().cols()).flat_map(|col| Self::find_touching(ctx, col)).collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        ctx.board().column(col).filter_map(|upper| Self::at(ctx, upper)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::BoardBuilder;
    use crate::cell::Player;
    use crate::problem::ProblemManager;
    use crate::rules::{Family, RuleContext};
    use crate::square::Square;

    use super::Vertical;

    #[test]
    fn empty_board_has_two_per_column() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let found = Vertical::find_all(RuleContext::new(&problems, Player::White));
        assert_eq!(found.len(), 14);
        assert!(found.contains(&Vertical::new(Square::new(3, 2), Square::new(4, 2)).unwrap()));
        assert!(!found.contains(&Vertical::new(Square::new(2, 2), Square::new(3, 2)).unwrap()));
    }
}
