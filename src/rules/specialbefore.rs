use std::collections::{BTreeSet, HashSet};
use std::fmt::{Debug, Formatter};

use crate::cell::Player;
use crate::group::Group;
use crate::rules::before::Filler;
use crate::rules::{Before, Family, RuleContext, RuleKind, Tactic, Vertical};
use crate::square::{Coord, Square};

/// A [`Before`] in which the directly playable lower square of one of its verticals, `internal`, is paired with another
/// directly playable square, `external`, instead.
///
/// The vertical must be the only one of its column in the before.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Specialbefore {
    before: Before,
    vertical: Vertical,
    external: Square,
}

impl Specialbefore {
    /// The before this was derived from.
    #[inline]
    pub fn before(&self) -> &Before {
        &self.before
    }

    /// The playable lower square of the replaced vertical.
    #[inline]
    pub fn internal(&self) -> Square {
        self.vertical.lower()
    }

    /// The playable square paired with [`Self::internal`].
    #[inline]
    pub fn external(&self) -> Square {
        self.external
    }

    fn remaining(&self) -> impl Iterator<Item = Filler> + '_ {
        self.before.fillers().filter(|filler| *filler != Filler::Vertical(self.vertical))
    }

    fn solved_by_remaining(&self, group: &Group) -> bool {
        self.remaining().any(|filler| filler.solves(group))
    }

    /// Every specialbefore of `group`, restricted to external squares satisfying `external_ok`.
    fn variations(ctx: RuleContext, group: &Group, external_ok: impl Fn(&Square) -> bool) -> Vec<Self> {
        let board = ctx.board();
        let playable = board.playable_squares();
        let mut ret = Vec::new();

        for before in Before::variations(ctx, group) {
            for vertical in before.verticals().iter().copied() {
                let internal = vertical.lower();
                let unique = before.verticals().iter().filter(|other| other.lower().col == internal.col).count() == 1;
                if !unique || !board.is_playable(internal) {
                    continue;
                }

                let used = before.fillers()
                    .filter(|filler| *filler != Filler::Vertical(vertical))
                    .flat_map(|filler| filler.squares())
                    .collect::<BTreeSet<_>>();

                for external in playable.iter().copied() {
                    if external == internal || group.contains(&external) || used.contains(&external) || !external_ok(&external) {
                        continue;
                    }
                    ret.push(Self { before: before.clone(), vertical, external });
                }
            }
        }

        ret
    }
}

impl Debug for Specialbefore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Specialbefore({:?}, internal {:?}, external {:?})", self.before, self.internal(), self.external)
    }
}

impl Tactic for Specialbefore {
    fn solves(&self, group: &Group) -> bool {
        self.solved_by_remaining(group)
            || (group.contains(&self.external) && self.before.contains_all_successors(group))
            || (group.contains(&self.external) && group.contains(&self.internal()))
    }

    fn squares(&self) -> BTreeSet<Square> {
        self.remaining()
            .flat_map(|filler| filler.squares())
            .chain([self.internal(), self.external])
            .collect()
    }

    fn claimeven_bottom_squares(&self) -> BTreeSet<Square> {
        self.before.claimeven_bottom_squares()
    }

    fn columns(&self) -> BTreeSet<Coord> {
        let mut ret = self.before.columns();
        ret.insert(self.external.col);
        ret
    }

    fn is_useful(&self, solved: &[&Group]) -> bool {
        solved.iter().any(|group| !self.solved_by_remaining(group))
    }
}

impl Family for Specialbefore {
    const KIND: RuleKind = RuleKind::Specialbefore;

    fn find_all(ctx: RuleContext) -> HashSet<Self> {
        if ctx.player != Player::Black {
            return HashSet::new();
        }
        ctx.own_groups().flat_map(|group| Self::variations(ctx, group, |_| true)).collect()
    }

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        if ctx.player != Player::Black {
            return HashSet::new();
        }

        ctx.own_groups()
            .flat_map(|group| {
                if group.touches_column(col) {
                    Self::variations(ctx, group, |_| true)
                } else {
                    Self::variations(ctx, group, |external| external.col == col)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::BoardBuilder;
    use crate::cell::Player;
    use crate::group::Group;
    use crate::problem::ProblemManager;
    use crate::rules::{Family, RuleContext, Tactic, Vertical};
    use crate::square::Square;

    use super::Specialbefore;

    #[test]
    fn pairs_internal_with_external() {
        // c2 to f2 are playable, so the group along them can only be filled with verticals
        let problems = ProblemManager::new(BoardBuilder::default().play_moves("c1 d1 e1 f1").build().unwrap());
        let ctx = RuleContext::new(&problems, Player::Black);
        let row_two = Group::new(Player::Black, (2..6).map(|col| Square::new(4, col)));

        let found = Specialbefore::find_all(ctx);
        // any of the four verticals, with a1, b1 or g1 outside
        assert_eq!(found.iter().filter(|special| special.before().group() == &row_two).count(), 12);

        let internal = Square::new(4, 2);
        let external = Square::new(5, 1);
        let special = found.iter()
            .find(|special| special.before().group() == &row_two && special.internal() == internal && special.external() == external)
            .unwrap();
        assert!(special.before().verticals().contains(&Vertical::new(Square::new(3, 2), internal).unwrap()));
        assert!(!special.squares().contains(&Square::new(3, 2)));

        let diagonal = Group::new(Player::White, [Square::new(5, 1), Square::new(4, 2), Square::new(3, 3), Square::new(2, 4)]);
        assert!(special.solves(&diagonal));
        assert!(special.is_useful(&[&diagonal]));
        let column = Group::new(Player::White, (1..5).map(|row| Square::new(row, 4)));
        assert!(special.solves(&column));
        assert!(!special.is_useful(&[&column]));

        assert!(Specialbefore::find_touching(ctx, 1).contains(special));
        assert!(Specialbefore::find_touching(ctx, 2).contains(special));
        assert!(!Specialbefore::find_touching(ctx, 0).contains(special));
    }
}
