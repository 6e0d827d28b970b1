use std::collections::HashSet;

use itertools::Itertools;
use tracing::trace;

use crate::rules::{
    Aftereven, Baseclaim, Baseinverse, Before, Claimeven, Family, Highinverse, Lowinverse, Oddthreat, Rule, RuleContext,
    Specialbefore, ThreatCombination, Vertical,
};
use crate::square::Coord;

/// Keeps the instances of one tactic family current across moves.
pub(crate) trait RuleManager {
    /// Every instance currently on the board.
    fn rules(&self) -> Vec<Rule>;
    /// Update after a move into `col`, with `ctx` describing the position after it. Returns `(removed, added)`.
    fn make_move(&mut self, ctx: RuleContext, col: Coord) -> (Vec<Rule>, Vec<Rule>);
    /// Reverse the most recent update. Returns `(added, removed)` of the update being reversed.
    fn undo_move(&mut self) -> Option<(Vec<Rule>, Vec<Rule>)>;
    /// Every instance on the board described by `ctx`, found from scratch.
    #[cfg(test)]
    fn find_all(&self, ctx: RuleContext) -> HashSet<Rule>;
}

pub(crate) struct FamilyManager<F: Family> {
    instances: HashSet<F>,
    // removed, added
    history: Vec<(Vec<F>, Vec<F>)>,
}

impl<F: Family> FamilyManager<F> {
    pub(crate) fn new(ctx: RuleContext) -> Self {
        Self { instances: F::find_all(ctx), history: Vec::new() }
    }
}

fn to_rules<F: Family>(instances: &[F]) -> Vec<Rule> {
    instances.iter().cloned().map_into().collect_vec()
}

impl<F: Family> RuleManager for FamilyManager<F> {
    fn rules(&self) -> Vec<Rule> {
        self.instances.iter().cloned().map_into().collect_vec()
    }

    fn make_move(&mut self, ctx: RuleContext, col: Coord) -> (Vec<Rule>, Vec<Rule>) {
        let fresh = F::find_touching(ctx, col);
        let removed = self.instances.iter()
            .filter(|instance| instance.columns().contains(&col) && !fresh.contains(instance))
            .cloned()
            .collect_vec();
        let added = fresh.into_iter()
            .filter(|instance| !self.instances.contains(instance))
            .collect_vec();

        for instance in removed.iter() {
            self.instances.remove(instance);
        }
        self.instances.extend(added.iter().cloned());
        trace!(kind = %F::KIND, removed = removed.len(), added = added.len(), "rule manager move");

        let ret = (to_rules(&removed), to_rules(&added));
        self.history.push((removed, added));
        ret
    }

    fn undo_move(&mut self) -> Option<(Vec<Rule>, Vec<Rule>)> {
        let (removed, added) = self.history.pop()?;
        for instance in added.iter() {
            self.instances.remove(instance);
        }
        self.instances.extend(removed.iter().cloned());

        Some((to_rules(&added), to_rules(&removed)))
    }

    #[cfg(test)]
    fn find_all(&self, ctx: RuleContext) -> HashSet<Rule> {
        F::find_all(ctx).into_iter().map_into().collect()
    }
}

/// One manager per family, win conditions last.
pub(crate) fn all_managers(ctx: RuleContext) -> Vec<Box<dyn RuleManager>> {
    vec![
        Box::new(FamilyManager::<Claimeven>::new(ctx)),
        Box::new(FamilyManager::<Baseinverse>::new(ctx)),
        Box::new(FamilyManager::<Vertical>::new(ctx)),
        Box::new(FamilyManager::<Aftereven>::new(ctx)),
        Box::new(FamilyManager::<Lowinverse>::new(ctx)),
        Box::new(FamilyManager::<Highinverse>::new(ctx)),
        Box::new(FamilyManager::<Baseclaim>::new(ctx)),
        Box::new(FamilyManager::<Before>::new(ctx)),
        Box::new(FamilyManager::<Specialbefore>::new(ctx)),
        Box::new(FamilyManager::<Oddthreat>::new(ctx)),
        Box::new(FamilyManager::<ThreatCombination>::new(ctx)),
    ]
}
