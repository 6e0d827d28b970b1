//! The eleven tactics of the knowledge-based approach, how to recognize them on a board, and which groups each one refutes.
//!
//! Every tactic is a plain value naming the squares it is made of. Whether an instance exists depends only on the
//! occupancy of its [`columns`](Tactic::columns), which is what lets the [`manager`] keep the set of instances current
//! one move at a time.

use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter};
use std::hash::Hash;

use strum::{EnumDiscriminants, VariantArray};

pub use aftereven::Aftereven;
pub use baseclaim::Baseclaim;
pub use baseinverse::Baseinverse;
pub use before::Before;
pub use claimeven::Claimeven;
pub use highinverse::{Column, Highinverse};
pub use lowinverse::Lowinverse;
pub use oddthreat::Oddthreat;
pub use specialbefore::Specialbefore;
pub use threat_combination::{ThreatCombination, ThreatCombinationKind};
pub use vertical::Vertical;

use crate::board::Board;
use crate::cell::Player;
use crate::group::Group;
use crate::problem::ProblemManager;
use crate::square::{Coord, Square};

pub(crate) mod aftereven;
pub(crate) mod baseclaim;
pub(crate) mod baseinverse;
pub(crate) mod before;
pub(crate) mod claimeven;
pub(crate) mod highinverse;
pub(crate) mod lowinverse;
pub(crate) mod manager;
pub(crate) mod oddthreat;
pub(crate) mod specialbefore;
pub(crate) mod threat_combination;
pub(crate) mod vertical;

/// Reasons a rule could not be constructed from the squares given.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InvalidRule {
    /// Two squares which must differ are the same square.
    IdenticalSquares,
    /// Two squares which must be directly on top of one another are not.
    NotStacked,
    /// Two parts which must lie in different columns share one.
    SameColumn,
}

impl std::error::Error for InvalidRule {}

impl Display for InvalidRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidRule::IdenticalSquares => write!(f, "Rule was given the same square twice"),
            InvalidRule::NotStacked => write!(f, "Rule squares must be vertically adjacent"),
            InvalidRule::SameColumn => write!(f, "Rule parts must lie in different columns"),
        }
    }
}

/// Functionality shared by every tactic.
pub trait Tactic {
    /// Whether owning this tactic's guarantee refutes `group`.
    fn solves(&self, group: &Group) -> bool;
    /// Every square the tactic reserves. Two tactics sharing a square generally cannot both be relied upon.
    fn squares(&self) -> BTreeSet<Square>;
    /// Lower squares of embedded claimevens, which the compatibility rules for inverses need to know about.
    fn claimeven_bottom_squares(&self) -> BTreeSet<Square> {
        BTreeSet::new()
    }
    /// Columns whose occupancy this instance depends on.
    fn columns(&self) -> BTreeSet<Coord>;
    /// Whether the groups this tactic solves include one that its own components do not already solve.
    ///
    /// `solved` only ever contains groups [`Self::solves`] accepts.
    fn is_useful(&self, solved: &[&Group]) -> bool {
        !solved.is_empty()
    }
}

/// A recognized instance of one of the eleven tactics.
///
/// Oddthreats and threat combinations are the win conditions: they describe how White can profit from zugzwang, whereas
/// every other tactic describes how the side in control of zugzwang can refute groups.
#[derive(Clone, Debug, Eq, Hash, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(RuleKind), derive(VariantArray, strum::Display, Hash, Ord, PartialOrd))]
pub enum Rule {
    /// Follow up in the same column to claim an even square.
    Claimeven(Claimeven),
    /// One of two playable squares.
    Baseinverse(Baseinverse),
    /// One of two stacked squares.
    Vertical(Vertical),
    /// Claimevens completing an own group, refuting the groups above it.
    Aftereven(Aftereven),
    /// Two verticals paired by their upper squares.
    Lowinverse(Lowinverse),
    /// Two columns of three squares paired crosswise.
    Highinverse(Highinverse),
    /// Three playable squares combining a baseinverse with a claimeven.
    Baseclaim(Baseclaim),
    /// Claimevens and verticals completing an own group before groups through its successors.
    Before(Before),
    /// A before using one of its lower squares as a baseinverse.
    Specialbefore(Specialbefore),
    /// An odd threat for White.
    Oddthreat(Oddthreat),
    /// Two threats of White crossing at a shared square.
    ThreatCombination(ThreatCombination),
}

macro_rules! dispatch {
    ($self:ident, $rule:ident => $body:expr) => {
        match $self {
            Rule::Claimeven($rule) => $body,
            Rule::Baseinverse($rule) => $body,
            Rule::Vertical($rule) => $body,
            Rule::Aftereven($rule) => $body,
            Rule::Lowinverse($rule) => $body,
            Rule::Highinverse($rule) => $body,
            Rule::Baseclaim($rule) => $body,
            Rule::Before($rule) => $body,
            Rule::Specialbefore($rule) => $body,
            Rule::Oddthreat($rule) => $body,
            Rule::ThreatCombination($rule) => $body,
        }
    };
}

impl Rule {
    /// Which of the eleven tactics this is.
    #[inline]
    pub fn kind(&self) -> RuleKind {
        RuleKind::from(self)
    }

    /// Whether this rule wins for White by zugzwang rather than refuting groups.
    #[inline]
    pub fn is_win_condition(&self) -> bool {
        self.kind().is_win_condition()
    }
}

impl RuleKind {
    /// See [`Rule::is_win_condition`].
    #[inline]
    pub fn is_win_condition(&self) -> bool {
        matches!(self, RuleKind::Oddthreat | RuleKind::ThreatCombination)
    }
}

impl Tactic for Rule {
    fn solves(&self, group: &Group) -> bool {
        dispatch!(self, rule => rule.solves(group))
    }

    fn squares(&self) -> BTreeSet<Square> {
        dispatch!(self, rule => rule.squares())
    }

    fn claimeven_bottom_squares(&self) -> BTreeSet<Square> {
        dispatch!(self, rule => rule.claimeven_bottom_squares())
    }

    fn columns(&self) -> BTreeSet<Coord> {
        dispatch!(self, rule => rule.columns())
    }

    fn is_useful(&self, solved: &[&Group]) -> bool {
        dispatch!(self, rule => rule.is_useful(solved))
    }
}

/// What the rule finders look at: the board, and the player whose tactics are being recognized.
#[derive(Copy, Clone)]
pub(crate) struct RuleContext<'a> {
    pub(crate) problems: &'a ProblemManager,
    pub(crate) player: Player,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(problems: &'a ProblemManager, player: Player) -> Self {
        Self { problems, player }
    }

    #[inline]
    pub(crate) fn board(&self) -> &'a Board {
        self.problems.board()
    }

    /// Potential groups of the player the tactics are for.
    pub(crate) fn own_groups(&self) -> impl Iterator<Item = &'a Group> {
        self.problems.potential_groups(self.player)
    }

    pub(crate) fn own_groups_touching(&self, col: Coord) -> impl Iterator<Item = &'a Group> {
        self.problems.potential_groups_touching(self.player, col)
    }

    /// Empty squares of `group`, top to bottom.
    pub(crate) fn empty_squares(&self, group: &Group) -> Vec<Square> {
        group.squares().iter().copied().filter(|square| self.board().is_empty(*square)).collect()
    }
}

/// A tactic family: how to find its instances on a whole board, or only those touching one column.
///
/// `find_touching(ctx, col)` must return exactly the members of `find_all(ctx)` whose columns include `col`.
pub(crate) trait Family: Tactic + Clone + Eq + Hash + std::fmt::Debug + Into<Rule> + 'static {
    const KIND: RuleKind;

    fn find_all(ctx: RuleContext) -> HashSet<Self>;

    fn find_touching(ctx: RuleContext, col: Coord) -> HashSet<Self> {
        Self::find_all(ctx).into_iter().filter(|rule| rule.columns().contains(&col)).collect()
    }
}

macro_rules! into_rule {
    ($($family:ident),*) => {
        $(
            impl From<$family> for Rule {
                fn from(value: $family) -> Self {
                    Rule::$family(value)
                }
            }
        )*
    };
}

into_rule!(Claimeven, Baseinverse, Vertical, Aftereven, Lowinverse, Highinverse, Baseclaim, Before, Specialbefore, Oddthreat, ThreatCombination);

/// Columns of `squares`.
pub(crate) fn columns_of<'a>(squares: impl IntoIterator<Item = &'a Square>) -> BTreeSet<Coord> {
    squares.into_iter().map(|square| square.col).collect()
}
