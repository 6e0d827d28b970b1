use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use itertools::Itertools;
use strum::{Display, VariantArray};

use crate::cell::Player;
use crate::group::Group;
use crate::rules::{columns_of, Family, RuleContext, RuleKind, Tactic};
use crate::square::{Coord, Square};

/// How the two stacked squares of a [`ThreatCombination`] relate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Display, VariantArray)]
pub enum ThreatCombinationKind {
    /// The even square is directly above the odd one.
    EvenAboveOdd,
    /// The odd square is directly above the even one, which cannot be played yet.
    OddAboveNotDirectlyPlayableEven,
    /// The odd square is directly above the even one, which can be played right away.
    OddAboveDirectlyPlayableEven,
}

/// Two potential groups of White missing two squares each, crossing at a square nobody can play yet.
///
/// The squares left over are stacked in another column, one even and one odd, so whichever way that column fills up
/// White completes one of the groups or keeps an odd threat.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct ThreatCombination {
    even_group: Group,
    odd_group: Group,
    shared: Square,
    even: Square,
    odd: Square,
    kind: ThreatCombinationKind,
    odd_below: Vec<Square>,
}

impl ThreatCombination {
    /// The group completed by the even square.
    #[inline]
    pub fn even_group(&self) -> &Group {
        &self.even_group
    }

    /// The group completed by the odd square.
    #[inline]
    pub fn odd_group(&self) -> &Group {
        &self.odd_group
    }

    /// The square both groups need.
    #[inline]
    pub fn shared(&self) -> Square {
        self.shared
    }

    /// The stacked square the even group needs.
    #[inline]
    pub fn even_square(&self) -> Square {
        self.even
    }

    /// The stacked square the odd group needs.
    #[inline]
    pub fn odd_square(&self) -> Square {
        self.odd
    }

    /// Arrangement of the stacked squares.
    #[inline]
    pub fn kind(&self) -> ThreatCombinationKind {
        self.kind
    }

    fn upper(&self) -> Square {
        self.even.min(self.odd)
    }

    fn from_pair(ctx: RuleContext, a: &Group, b: &Group) -> Option<Self> {
        let board = ctx.board();
        let (empty_a, empty_b) = (ctx.empty_squares(a), ctx.empty_squares(b));
        if empty_a.len() != 2 || empty_b.len() != 2 || a == b {
            return None;
        }

        let shared = empty_a.iter().filter(|square| empty_b.contains(square)).copied().collect_vec();
        let [shared] = shared[..] else {
            return None;
        };
        if board.is_playable(shared) {
            return None;
        }

        let rest = |empty: &[Square]| empty.iter().copied().find(|square| *square != shared);
        let (rest_a, rest_b) = (rest(&empty_a)?, rest(&empty_b)?);
        if rest_a.col != rest_b.col || rest_a.col == shared.col || rest_a.row.abs_diff(rest_b.row) != 1 {
            return None;
        }

        let ((even_group, even), (odd_group, odd)) = if board.is_even_row(rest_a.row) {
            ((a, rest_a), (b, rest_b))
        } else {
            ((b, rest_b), (a, rest_a))
        };

        let kind = if even.is_above(&odd) {
            ThreatCombinationKind::EvenAboveOdd
        } else if board.is_playable(even) {
            ThreatCombinationKind::OddAboveDirectlyPlayableEven
        } else {
            ThreatCombinationKind::OddAboveNotDirectlyPlayableEven
        };

        let odd_below = match (kind, board.playable_in_column(odd.col)) {
            (ThreatCombinationKind::EvenAboveOdd, Some(frontier)) => (odd.row + 1..frontier.row)
                .filter(|row| board.is_odd_row(*row))
                .map(|row| Square::new(row, odd.col))
                .collect_vec(),
            _ => Vec::new(),
        };

        Some(Self {
            even_group: even_group.clone(),
            odd_group: odd_group.clone(),
            shared,
            even,
            odd,
            kind,
            odd_below,
        })
    }

    fn candidates<'a>(ctx: RuleContext<'a>, groups: impl Iterator<Item = &'a Group>) -> Vec<&'a Group> {
        groups.filter(|group| ctx.empty_squares(group).len() == 2).collect_vec()
    }
}

impl Debug for ThreatCombination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ThreatCombination({}, {:?} and {:?} at {:?})", self.kind, self.even_group, self.odd_group, self.shared)
    }
}

impl Tactic for ThreatCombination {
    fn solves(&self, group: &Group) -> bool {
        let upper = self.upper();
        group.squares().iter().any(|square| {
            (square.col == upper.col && square.row <= upper.row)
                || (square.col == self.shared.col && square.is_above(&self.shared))
                || self.odd_below.contains(square)
        })
    }

    fn squares(&self) -> BTreeSet<Square> {
        BTreeSet::from([self.shared, self.even, self.odd])
    }

    fn columns(&self) -> BTreeSet<Coord> {
        columns_of(self.even_group.squares().iter().chain(self.odd_group.squares()))
    }
}

impl Family for ThreatCombination {
    const KIND: RuleKind = RuleKind::ThreatCombination;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        if ctx.player != Player::White {
            return HashSet::new();
        }

        Self::candidates(ctx, ctx.own_groups()).into_iter()
            .tuple_combinations()
            .filter_map(|(a, b)| Self::from_pair(ctx, a, b))
            .collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        if ctx.player != Player::White {
            return HashSet::new();
        }

        let here = Self::candidates(ctx, ctx.own_groups_touching(col));
        let all = Self::candidates(ctx, ctx.own_groups());
        here.iter()
            .cartesian_product(all.iter())
            .filter_map(|(a, b)| Self::from_pair(ctx, a, b))
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

    use super::{ThreatCombination, ThreatCombinationKind};

    #[test]
    fn crossing_threats() {
        // white holds b4 c4 on row four and f2 g1 on the diagonal through d4 and e3
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("g b b b b c c c c f f").build().unwrap());
        let ctx = RuleContext::new(&problems, Player::White);
        let row_four = Group::new(Player::White, (1..5).map(|col| Square::new(2, col)));
        let diagonal = Group::new(Player::White, [Square::new(2, 3), Square::new(3, 4), Square::new(4, 5), Square::new(5, 6)]);

        let found = ThreatCombination::find_all(ctx);
        let combination = found.iter()
            .find(|combination| combination.even_group() == &row_four && combination.odd_group() == &diagonal)
            .unwrap();
        assert_eq!(combination.shared(), Square::new(2, 3));
        assert_eq!(combination.even_square(), Square::new(2, 4));
        assert_eq!(combination.odd_square(), Square::new(3, 4));
        assert_eq!(combination.kind(), ThreatCombinationKind::EvenAboveOdd);

        assert!(combination.solves(&Group::new(Player::Black, (3..7).map(|col| Square::new(1, col)))));
        assert!(combination.solves(&Group::new(Player::Black, (0..4).map(|row| Square::new(row, 3)))));
        assert!(!combination.solves(&Group::new(Player::Black, (3..7).map(|col| Square::new(3, col)))));

        assert!(ThreatCombination::find_touching(ctx, 4).contains(combination));
        assert!(!ThreatCombination::find_touching(ctx, 0).contains(combination));
        assert!(ThreatCombination::find_all(RuleContext::new(&problems, Player::Black)).is_empty());
    }

    #[test]
    fn empty_board_has_none() {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        assert!(ThreatCombination::find_all(RuleContext::new(&problems, Player::White)).is_empty());
    }
}
