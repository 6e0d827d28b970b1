use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

use itertools::Itertools;
use unordered_pair::UnorderedPair;

use crate::group::Group;
use crate::rules::{Family, InvalidRule, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// Two directly playable squares. When the opponent takes one, the other can be taken in reply.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Baseinverse {
    // kept sorted, smaller first
    squares: UnorderedPair<Square>,
}

impl Baseinverse {
    /// Pair two distinct squares, in either order.
    pub fn new(a: Square, b: Square) -> Result<Self, InvalidRule> {
        if a == b {
            return Err(InvalidRule::IdenticalSquares);
        }
        if a.col == b.col {
            return Err(InvalidRule::SameColumn);
        }

        Ok(Self { squares: UnorderedPair::from((a.min(b), a.max(b))) })
    }

    /// Both squares, smaller first.
    #[inline]
    pub fn pair(&self) -> (Square, Square) {
        (self.squares.0, self.squares.1)
    }
}

impl Hash for Baseinverse {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pair().hash(state);
    }
}

impl Debug for Baseinverse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Baseinverse({:?}, {:?})", self.squares.0, self.squares.1)
    }
}

impl Tactic for Baseinverse {
    fn solves(&self, group: &Group) -> bool {
        group.contains(&self.squares.0) && group.contains(&self.squares.1)
    }

    fn squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.squares.0, self.squares.1])
    }

    fn columns(&self) -> BTreeSet<Coord> {
        BTreeSet::from([self.squares.0.col, self.squares.1.col])
    }
}

impl Family for Baseinverse {
    const KIND: RuleKind = RuleKind::Baseinverse;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        ctx.board().playable_squares().into_iter()
            .tuple_combinations()
            .filter_map(|(a, b)| Self::new(a, b).ok())
            .collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        let board = ctx.board();
        let Some(square) = board.playable_in_column(col) else {
            return HashSet::new();
        };

        board.playable_squares().into_iter()
            .filter_map(|other| Self::new(square, other).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::BoardBuilder;
    use crate::cell::Player;
    use crate::problem::ProblemManager;
    use crate::rules::{Family, InvalidRule, RuleContext};
    use crate::square::Square;

    use super::Baseinverse;

    #[test]
    fn order_does_not_matter() {
        let a = Square::new(5, 1);
        let b = Square::new(4, 3);
        assert_eq!(Baseinverse::new(a, b), Baseinverse::new(b, a));
        assert_eq!(Baseinverse::new(a, a), Err(InvalidRule::IdenticalSquares));
    }

    #[test]
    fn pairs_playable_squares() {
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("a b").build().unwrap());
        let ctx = RuleContext::new(&problems, Player::Black);
        assert_eq!(Baseinverse::find_all(ctx).len(), 21);
        assert_eq!(Baseinverse::find_touching(ctx, 0).len(), 6);
        assert!(Baseinverse::find_touching(ctx, 0).contains(&Baseinverse::new(Square::new(4, 0), Square::new(4, 1)).unwrap()));
    }
}
