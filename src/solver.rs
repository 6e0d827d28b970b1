use std::cmp::Reverse;

use itertools::Itertools;

use crate::bitset::BitSet;

/// Searches for a set of pairwise compatible candidates which together meet every requirement.
///
/// Candidates and requirements are plain indices. Use [`Self::solve`] to attempt to find a cover.
pub(crate) struct CoverSolver {
    num_requirements: usize,
    // [candidate] -> candidates it may be combined with
    compatible: Vec<BitSet>,
    // [candidate] -> requirements it meets
    covers: Vec<BitSet>,
    // [requirement] -> candidates meeting it
    candidates: Vec<BitSet>,
}

impl CoverSolver {
    /// `compatible` and `covers` are indexed by candidate and must have the same length.
    pub(crate) fn new(num_requirements: usize, compatible: Vec<BitSet>, covers: Vec<BitSet>) -> Self {
        let mut candidates = vec![BitSet::with_len(covers.len()); num_requirements];
        for (candidate, met) in covers.iter().enumerate() {
            for requirement in met.iter() {
                candidates[requirement].insert(candidate);
            }
        }

        Self { num_requirements, compatible, covers, candidates }
    }

    /// Candidates making up a cover, ascending, or [`None`] if there is none.
    pub(crate) fn solve(&self) -> Option<Vec<usize>> {
        let mut chosen = Vec::new();
        let found = self.search(
            BitSet::full(self.covers.len()),
            BitSet::with_len(self.num_requirements),
            &mut chosen,
        );
        found.then(|| chosen.into_iter().sorted().collect_vec())
    }

    /// The uncovered requirement with the fewest allowed candidates, along with that count.
    ///
    /// [`None`] once everything is covered.
    fn most_constrained(&self, allowed: &BitSet, covered: &BitSet) -> Option<(usize, usize)> {
        (0..self.num_requirements)
            .filter(|requirement| !covered.contains(*requirement))
            .map(|requirement| (requirement, self.candidates[requirement].intersection_len(allowed)))
            .min_by_key(|(_, count)| *count)
    }

    fn search(&self, mut allowed: BitSet, covered: BitSet, chosen: &mut Vec<usize>) -> bool {
        let Some((requirement, count)) = self.most_constrained(&allowed, &covered) else {
            return true;
        };
        if count == 0 {
            return false;
        }

        let mut options = self.candidates[requirement].clone();
        options &= &allowed;
        let options = options.iter()
            .sorted_by_key(|candidate| Reverse(self.covers[*candidate].len()))
            .collect_vec();

        for candidate in options {
            let mut next_allowed = allowed.clone();
            next_allowed &= &self.compatible[candidate];
            let mut next_covered = covered.clone();
            next_covered |= &self.covers[candidate];

            chosen.push(candidate);
            if self.search(next_allowed, next_covered, chosen) {
                return true;
            }
            chosen.pop();
            // every cover using this candidate has been ruled out
            allowed.remove(candidate);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use crate::bitset::BitSet;

    use super::CoverSolver;

    fn sets(of: &[&[usize]]) -> Vec<BitSet> {
        of.iter().map(|indices| indices.iter().copied().collect()).collect()
    }

    #[test]
    fn finds_compatible_cover() {
        // 0 covers everything but clashes with 2, which alone meets requirement 2
        let covers = sets(&[&[0, 1], &[1], &[2], &[0]]);
        let compatible = sets(&[&[0, 1, 3], &[0, 1, 2, 3], &[1, 2, 3], &[0, 1, 2, 3]]);
        let solver = CoverSolver::new(3, compatible, covers);
        assert_eq!(solver.solve(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn reports_missing_cover() {
        let covers = sets(&[&[0], &[1]]);
        let compatible = sets(&[&[0], &[1]]);
        assert_eq!(CoverSolver::new(2, compatible, covers).solve(), None);

        assert_eq!(CoverSolver::new(0, Vec::new(), Vec::new()).solve(), Some(Vec::new()));
    }
}
