//! Which pairs of solutions may be relied upon at the same time.

use std::collections::BTreeSet;

use crate::rules::RuleKind;
use crate::solution::Solution;
use crate::square::{Coord, Square};

/// What has to hold for two solutions to combine, by the kinds of their rules.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Check {
    Never,
    /// The other solution keeps out of every column the win condition reserves a square in.
    OutsideColumns { win_first: bool },
    ColumnWise,
    BelowInverse { inverse_first: bool },
    Disjoint,
}

/// Order in which rule kinds are considered when dispatching on a pair. Win conditions come first.
pub(crate) fn precedence(kind: RuleKind) -> u8 {
    match kind {
        RuleKind::Oddthreat | RuleKind::ThreatCombination => 0,
        RuleKind::Claimeven => 1,
        RuleKind::Baseinverse => 2,
        RuleKind::Vertical => 3,
        RuleKind::Aftereven => 4,
        RuleKind::Lowinverse => 5,
        RuleKind::Highinverse => 6,
        RuleKind::Baseclaim => 7,
        RuleKind::Before => 8,
        RuleKind::Specialbefore => 9,
    }
}

fn check(a: RuleKind, b: RuleKind) -> Check {
    use RuleKind::*;

    let swapped = precedence(b) < precedence(a);
    let (first, second) = if swapped { (b, a) } else { (a, b) };
    match (first, second) {
        (Oddthreat | ThreatCombination, Oddthreat | ThreatCombination | Aftereven | Before | Specialbefore) => Check::Never,
        (Oddthreat | ThreatCombination, _) => Check::OutsideColumns { win_first: !swapped },
        (Claimeven, Aftereven | Before | Specialbefore) => Check::ColumnWise,
        (Vertical, Before | Specialbefore) => Check::ColumnWise,
        (Aftereven | Before | Specialbefore, Aftereven | Before | Specialbefore) => Check::ColumnWise,
        (Claimeven, Lowinverse | Highinverse) => Check::BelowInverse { inverse_first: swapped },
        (Lowinverse | Highinverse, Aftereven | Baseclaim | Before | Specialbefore) => {
            Check::BelowInverse { inverse_first: !swapped }
        }
        _ => Check::Disjoint,
    }
}

/// Whether `a` and `b` can be part of the same proof. Symmetric.
pub fn allowed(a: &Solution, b: &Solution) -> bool {
    match check(a.rule().kind(), b.rule().kind()) {
        Check::Never => false,
        Check::OutsideColumns { win_first } => {
            let (win, other) = if win_first { (a, b) } else { (b, a) };
            outside_columns(&win.columns(), other)
        }
        Check::ColumnWise => column_wise_disjoint_or_equal(a, b),
        Check::BelowInverse { inverse_first } => {
            let (inverse, other) = if inverse_first { (a, b) } else { (b, a) };
            disjoint(a, b) && no_claimeven_below_or_at_inverse(inverse, other)
        }
        Check::Disjoint => disjoint(a, b),
    }
}

fn outside_columns(cols: &BTreeSet<Coord>, other: &Solution) -> bool {
    other.squares().iter().all(|square| !cols.contains(&square.col))
}

pub(crate) fn disjoint(a: &Solution, b: &Solution) -> bool {
    a.squares().is_disjoint(b.squares())
}

fn in_column(squares: &BTreeSet<Square>, col: Coord) -> BTreeSet<Square> {
    squares.iter().copied().filter(|square| square.col == col).collect()
}

/// In every column both use, the two either reserve exactly the same squares or none in common.
pub(crate) fn column_wise_disjoint_or_equal(a: &Solution, b: &Solution) -> bool {
    a.columns().intersection(&b.columns()).all(|col| {
        let (here_a, here_b) = (in_column(a.squares(), *col), in_column(b.squares(), *col));
        here_a == here_b || here_a.is_disjoint(&here_b)
    })
}

/// No claimeven of `other` starts at or below a square of `inverse` in the same column.
pub(crate) fn no_claimeven_below_or_at_inverse(inverse: &Solution, other: &Solution) -> bool {
    !other.claimeven_bottom_squares().iter().any(|bottom| {
        inverse.squares().iter().any(|square| square.col == bottom.col && bottom.row >= square.row)
    })
}

#[cfg(test)]
mod tests {
    use strum::VariantArray;

    use crate::builder::BoardBuilder;
    use crate::cell::Player;
    use crate::group::GroupIndex;
    use crate::problem::ProblemManager;
    use crate::rules::{Baseinverse, Claimeven, Column, Highinverse, Lowinverse, Rule, RuleKind, Vertical};
    use crate::solution::Solution;
    use crate::square::Square;

    use super::{allowed, check};

    fn index() -> (ProblemManager, GroupIndex) {
        let problems = ProblemManager::new(BoardBuilder::default().build().unwrap());
        let index = GroupIndex::new(problems.geometry(), Player::White, problems.board().cols());
        (problems, index)
    }

    fn claimeven(index: &GroupIndex, row: usize, col: usize) -> Solution {
        Solution::from_rule(Rule::Claimeven(Claimeven::new(Square::new(row, col), Square::new(row + 1, col)).unwrap()), index).unwrap()
    }

    #[test]
    fn dispatch_is_symmetric() {
        for a in RuleKind::VARIANTS {
            for b in RuleKind::VARIANTS {
                let (there, back) = (check(*a, *b), check(*b, *a));
                match (there, back) {
                    (super::Check::OutsideColumns { win_first: x }, super::Check::OutsideColumns { win_first: y })
                        if a != b && a.is_win_condition() != b.is_win_condition() => assert_ne!(x, y),
                    (super::Check::BelowInverse { inverse_first: x }, super::Check::BelowInverse { inverse_first: y }) => {
                        assert_ne!(x, y)
                    }
                    _ => assert_eq!(there, back, "{a} against {b}"),
                }
            }
        }
    }

    #[test]
    fn claimevens_must_not_overlap() {
        let (_problems, index) = index();
        let low = claimeven(&index, 4, 0);
        let next_door = claimeven(&index, 4, 1);
        assert!(allowed(&low, &next_door));
        assert!(allowed(&low, &claimeven(&index, 2, 0)));
        let vertical = Solution::from_rule(Rule::Vertical(Vertical::new(Square::new(3, 0), Square::new(4, 0)).unwrap()), &index).unwrap();
        assert!(!allowed(&low, &vertical));
        let baseinverse = Solution::from_rule(Rule::Baseinverse(Baseinverse::new(Square::new(5, 1), Square::new(5, 2)).unwrap()), &index).unwrap();
        assert!(allowed(&low, &baseinverse));
        assert!(!allowed(&next_door, &baseinverse));
    }

    #[test]
    fn claimeven_below_inverse() {
        let (_problems, index) = index();
        let lowinverse = Lowinverse::new(
            Vertical::new(Square::new(3, 0), Square::new(4, 0)).unwrap(),
            Vertical::new(Square::new(3, 1), Square::new(4, 1)).unwrap(),
        ).unwrap();
        let inverse = Solution::from_rule(Rule::Lowinverse(lowinverse), &index).unwrap();

        // the claimeven above the inverse is fine, one starting below it in the same column is not
        assert!(allowed(&inverse, &claimeven(&index, 0, 0)));
        let columns = Highinverse::new(
            Column::new(Square::new(0, 2), Square::new(1, 2), Square::new(2, 2), false).unwrap(),
            Column::new(Square::new(0, 3), Square::new(1, 3), Square::new(2, 3), false).unwrap(),
        ).unwrap();
        let high = Solution::from_rule(Rule::Highinverse(columns), &index).unwrap();
        let under_high = claimeven(&index, 4, 2);
        assert!(!allowed(&high, &under_high));
        assert!(!allowed(&under_high, &high));
        assert!(allowed(&high, &claimeven(&index, 4, 4)));
    }
}
