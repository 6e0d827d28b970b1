#![warn(missing_docs)]

//! # `victor`
//!
//! A knowledge-based prover for [Connect Four](https://en.wikipedia.org/wiki/Connect_Four) positions after L.V. Allis'
//! program *Victor*, working on boards of any size.
//! Begin by building a board with a [`BoardBuilder`], replaying the moves of the game so far.
//! Hand it to a [`GraphManager`] along with the player to prove the position for, then call
//! [`evaluate()`](GraphManager::evaluate) to obtain a set of [`Solution`]s which together refute every winning line the
//! opponent has left.
//!
//! A proof for Black shows that White cannot win; a proof for White shows that White wins, and therefore contains one of
//! the win conditions. [`None`] only means that the tactics known here are not enough, not that the position is lost.
//!
//! # Internals
//! Every line of four squares a player could still complete is a *problem* for the opponent. Eleven tactics, the
//! [`Rule`]s, describe how the side in control of zugzwang can make sure it gets at least one square of certain lines.
//! A rule refuting at least one problem that its component rules alone do not becomes a [`Solution`].
//!
//! A high level overview is as follows:
//!
//! 1. The [`ProblemManager`] keeps the potential groups of both players.
//! 2. The [`SolutionManager`] keeps one incremental manager per tactic, re-deriving only the instances touching the column
//! played, and converts rules into solutions.
//! 3. The [`GraphManager`] relates solutions to the problems they solve, and solutions to one another through
//! [`allowed`], a symmetric table deciding which pairs of tactics may be relied upon together.
//!
//! Proving the position is then a covering problem: choose pairwise allowed solutions such that every problem is solved.
//! This is searched by backtracking over the problem with the fewest remaining candidates.
//! All three managers follow moves and take them back without being rebuilt.

pub use board::{Board, MoveError};
pub use builder::{BoardBuilder, BuilderInvalidReason};
pub use cell::Player;
pub use combination::allowed;
pub use graph::GraphManager;
pub use group::Group;
pub use problem::ProblemManager;
pub use rules::{InvalidRule, Rule, RuleKind, Tactic};
pub use solution::{Solution, SolutionManager};
pub use square::{DisplaySquare, Square};

pub(crate) mod bitset;
pub(crate) mod board;
pub mod builder;
pub(crate) mod cell;
pub(crate) mod combination;
pub(crate) mod direction;
pub(crate) mod graph;
pub(crate) mod group;
pub(crate) mod problem;
pub mod rules;
pub(crate) mod solution;
pub(crate) mod solver;
pub(crate) mod square;
#[cfg(test)]
pub(crate) mod arbitrary;
