use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use crate::group::Group;
use crate::rules::{Family, InvalidRule, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// Two stacked empty squares, the upper one even.
///
/// The controller of zugzwang answers every move on `lower` with `upper`, so they always get the upper square.
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Claimeven {
    upper: Square,
    lower: Square,
}

impl Claimeven {
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

    /// The even square claimed.
    #[inline]
    pub fn upper(&self) -> Square {
        self.upper
    }

    /// The square given away.
    #[inline]
    pub fn lower(&self) -> Square {
        self.lower
    }

    /// The claimeven with `upper` on top, if the position allows one there.
    pub(crate) fn at(ctx: RuleContext, upper: Square) -> Option<Self> {
        let board = ctx.board();
        let lower = board.square_below(upper)?;
        (board.is_even_row(upper.row) && board.is_empty(upper) && board.is_empty(lower)).then_some(Self { upper, lower })
    }
}

impl Debug for Claimeven {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Claimeven({:?}, {:?})", self.upper, self.lower)
    }
}

impl Tactic for Claimeven {
    fn solves(&self, group: &Group) -> bool {
        group.contains(&self.upper)
    }

    fn squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.upper, self.lower])
    }

    fn claimeven_bottom_squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.lower])
    }

    fn columns(&self) -> BTreeSet<Coord> {
        BTreeSet::from([self.upper.col])
    }
}

impl Family for Claimeven {
    const KIND: RuleKind = RuleKind::Claimeven;

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
    use crate::rules::{Family, InvalidRule, RuleContext};
    use crate::square::Square;

    use super::Claimeven;

    #[test]
    fn shape_is_checked() {
        assert_eq!(Claimeven::new(Square::new(2, 0), Square::new(2, 0)), Err(InvalidRule::IdenticalSquares));
        assert_eq!(Claimeven::new(Square::new(2, 0), Square::new(4, 0)), Err(InvalidRule::NotStacked));
        assert_eq!(Claimeven::new(Square::new(3, 0), Square::new(2, 0)), Err(InvalidRule::NotStacked));
        assert!(Claimeven::new(Square::new(4, 0), Square::new(5, 0)).is_ok());
    }

    #[test]
    fn empty_board_has_three_per_column() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let found = Claimeven::find_all(RuleContext::new(&problems, Player::Black));
        assert_eq!(found.len(), 21);
        assert!(found.contains(&Claimeven::new(Square::new(0, 6), Square::new(1, 6)).unwrap()));
    }

    #[test]
    fn odd_upper_after_one_move() {
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("d1").build().unwrap());
        let found = Claimeven::find_touching(RuleContext::new(&problems, Player::Black), 3);
        // the bottom pair lost its lower square
        assert_eq!(found.len(), 2);
    }
}
