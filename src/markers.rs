//! Change markers: one bit per element, set when the element is not part of
//! the common subsequence.
//!
//! Reading the unset positions of both sides in order yields the LCS witness.

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-length bit vector over the positions of one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerSet {
    words: Vec<u64>,
    len: usize,
}

impl MarkerSet {
    /// Create an all-clear marker set for a sequence of `len` elements.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Number of positions covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the set covers no positions at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether `index` is marked as changed.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "marker index {index} out of range 0..{}", self.len);
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Mark `index` as changed.
    #[inline]
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "marker index {index} out of range 0..{}", self.len);
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
    }

    /// Mark every index in `range` as changed.
    pub fn set_range(&mut self, range: std::ops::Range<usize>) {
        assert!(
            range.end <= self.len,
            "marker range {range:?} out of range 0..{}",
            self.len
        );
        for index in range {
            self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
        }
    }

    /// Number of marked positions.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of marked positions inside `range`.
    pub fn count_ones_in(&self, range: std::ops::Range<usize>) -> usize {
        range.filter(|&i| self.get(i)).count()
    }

    /// Iterate over marked positions in increasing order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.get(i))
    }

    /// Iterate over unmarked positions in increasing order.
    pub fn zeros(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| !self.get(i))
    }
}

/// Marker sets for both sides of one diff.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeMarkers {
    /// Positions of the first sequence that are deleted.
    pub first: MarkerSet,
    /// Positions of the second sequence that are inserted.
    pub second: MarkerSet,
}

impl ChangeMarkers {
    /// Create empty markers for sequences of the given lengths.
    pub fn new(len1: usize, len2: usize) -> Self {
        Self {
            first: MarkerSet::new(len1),
            second: MarkerSet::new(len2),
        }
    }

    /// Total number of marked positions on both sides.
    pub fn edit_count(&self) -> usize {
        self.first.count_ones() + self.second.count_ones()
    }

    /// Check if no position is marked.
    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }

    /// Mark `count1` positions from `start1` and `count2` positions from
    /// `start2` as changed.
    pub fn mark_ranges(&mut self, start1: usize, count1: usize, start2: usize, count2: usize) {
        self.first.set_range(start1..start1 + count1);
        self.second.set_range(start2..start2 + count2);
    }

    /// Check that the unmarked positions of `first` and `second` form a
    /// common subsequence.
    pub fn is_common_subsequence<T: PartialEq>(&self, first: &[T], second: &[T]) -> bool {
        if self.first.len() != first.len() || self.second.len() != second.len() {
            return false;
        }
        let mut kept1 = self.first.zeros().map(|i| &first[i]);
        let mut kept2 = self.second.zeros().map(|i| &second[i]);
        loop {
            match (kept1.next(), kept2.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => {}
                _ => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_across_words() {
        let mut set = MarkerSet::new(130);
        set.set(0);
        set.set(64);
        set.set(129);
        assert!(set.get(0));
        assert!(set.get(64));
        assert!(set.get(129));
        assert!(!set.get(63));
        assert_eq!(set.count_ones(), 3);
        assert_eq!(set.ones().collect::<Vec<_>>(), vec![0, 64, 129]);
    }

    #[test]
    fn test_set_range() {
        let mut set = MarkerSet::new(10);
        set.set_range(3..7);
        set.set_range(5..5);
        assert_eq!(set.ones().collect::<Vec<_>>(), vec![3, 4, 5, 6]);
        assert_eq!(set.count_ones_in(0..5), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        let mut set = MarkerSet::new(4);
        set.set(4);
    }

    #[test]
    fn test_common_subsequence_check() {
        let a = [1, 2, 3];
        let b = [1, 9, 3];
        let mut markers = ChangeMarkers::new(3, 3);
        assert!(!markers.is_common_subsequence(&a, &b));
        markers.first.set(1);
        markers.second.set(1);
        assert!(markers.is_common_subsequence(&a, &b));
        assert_eq!(markers.edit_count(), 2);
    }
}
