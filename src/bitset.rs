use std::fmt::{self, Debug};
use std::ops::{BitAndAssign, BitOrAssign};

/// A growable set of small indices, one bit per index.
///
/// Used by the covering search, where candidate and coverage sets are intersected at every node.
#[derive(Clone, Default, Eq, PartialEq)]
pub(crate) struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    /// An empty set able to hold indices below `len` without reallocating.
    pub(crate) fn with_len(len: usize) -> Self {
        Self { words: vec![0; len.div_ceil(64)] }
    }

    /// A set holding every index below `len`.
    pub(crate) fn full(len: usize) -> Self {
        let mut ret = Self::with_len(len);
        for word in ret.words.iter_mut() {
            *word = u64::MAX;
        }
        if len % 64 != 0 {
            if let Some(last) = ret.words.last_mut() {
                *last = (1u64 << (len % 64)) - 1;
            }
        }
        ret
    }

    #[inline]
    pub(crate) fn insert(&mut self, index: usize) {
        let word = index / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (index % 64);
    }

    #[inline]
    pub(crate) fn remove(&mut self, index: usize) {
        if let Some(word) = self.words.get_mut(index / 64) {
            *word &= !(1u64 << (index % 64));
        }
    }

    #[inline]
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.words.get(index / 64).is_some_and(|word| word & (1u64 << (index % 64)) != 0)
    }

    pub(crate) fn len(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Size of the intersection with `other`, without building it.
    pub(crate) fn intersection_len(&self, other: &Self) -> usize {
        self.words.iter().zip(other.words.iter()).map(|(a, b)| (a & b).count_ones() as usize).sum()
    }

    /// Indices in the set, ascending.
    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, word)| {
            let mut bits = *word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let offset = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(i * 64 + offset)
            })
        })
    }
}

impl BitAndAssign<&BitSet> for BitSet {
    fn bitand_assign(&mut self, rhs: &BitSet) {
        for (i, word) in self.words.iter_mut().enumerate() {
            *word &= rhs.words.get(i).copied().unwrap_or(0);
        }
    }
}

impl BitOrAssign<&BitSet> for BitSet {
    fn bitor_assign(&mut self, rhs: &BitSet) {
        if rhs.words.len() > self.words.len() {
            self.words.resize(rhs.words.len(), 0);
        }
        for (word, other) in self.words.iter_mut().zip(rhs.words.iter()) {
            *word |= other;
        }
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut ret = Self::default();
        for index in iter {
            ret.insert(index);
        }
        ret
    }
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::BitSet;

    #[test]
    fn across_words() {
        let mut set: BitSet = [3, 64, 130].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(64) && !set.contains(65));

        let full = BitSet::full(131);
        assert_eq!(full.len(), 131);
        assert_eq!(full.intersection_len(&set), 3);
        assert_eq!(set.intersection_len(&BitSet::full(100)), 2);

        set &= &BitSet::full(100);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 64]);
        set.remove(3);
        set |= &[7].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![7, 64]);
    }
}
