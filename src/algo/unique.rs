//! Unique-anchor matching.
//!
//! Finds the largest monotone matching between elements that occur exactly
//! once in both ranges. Patience diff uses these pairs as anchors to split a
//! problem into independent blocks.
//!
//! # Algorithm
//!
//! 1. Count occurrences in the first range
//! 2. Pair each first-range singleton with its single occurrence in the second range
//! 3. Longest increasing subsequence of the induced partial permutation,
//!    by patience sorting with binary search over the pile tops
//!
//! # Complexity
//!
//! - Time: O(n + m + k log k) where k is the number of unique common elements
//! - Space: O(n + k)

use std::ops::Range;

use rustc_hash::FxHashMap;

/// Anchor pairs produced by [`UniqueLcs`].
///
/// Indices are relative to the start of the ranges that were matched.
/// `first` and `second` have equal length and both strictly increase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorMatch {
    pub first: Vec<usize>,
    pub second: Vec<usize>,
}

impl AnchorMatch {
    /// Number of anchor pairs.
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Iterate over `(first, second)` pairs in increasing order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.first.iter().copied().zip(self.second.iter().copied())
    }
}

#[derive(Clone, Copy)]
enum Occurrence {
    Once(usize),
    Many,
}

/// Longest increasing matching over elements unique in both ranges.
#[derive(Debug, Clone)]
pub struct UniqueLcs<'a> {
    first: &'a [u32],
    second: &'a [u32],
    range1: Range<usize>,
    range2: Range<usize>,
}

impl<'a> UniqueLcs<'a> {
    /// Match over the whole of both sequences.
    pub fn new(first: &'a [u32], second: &'a [u32]) -> Self {
        Self {
            first,
            second,
            range1: 0..first.len(),
            range2: 0..second.len(),
        }
    }

    /// Restrict matching to the given sub-ranges.
    pub fn with_ranges(mut self, range1: Range<usize>, range2: Range<usize>) -> Self {
        assert!(range1.end <= self.first.len(), "first range {range1:?} out of bounds");
        assert!(range2.end <= self.second.len(), "second range {range2:?} out of bounds");
        self.range1 = range1;
        self.range2 = range2;
        self
    }

    pub fn execute(&self) -> AnchorMatch {
        let first = &self.first[self.range1.clone()];
        let second = &self.second[self.range2.clone()];

        let mut occurrences: FxHashMap<u32, Occurrence> =
            FxHashMap::with_capacity_and_hasher(first.len(), Default::default());
        for (i, &value) in first.iter().enumerate() {
            occurrences
                .entry(value)
                .and_modify(|o| *o = Occurrence::Many)
                .or_insert(Occurrence::Once(i));
        }

        // matches[i] = position in `second` of the partner of first[i]
        let mut matches: Vec<Option<usize>> = vec![None; first.len()];
        for (j, value) in second.iter().enumerate() {
            let Some(occurrence) = occurrences.get_mut(value) else {
                continue;
            };
            if let Occurrence::Once(i) = *occurrence {
                if matches[i].is_none() {
                    matches[i] = Some(j);
                } else {
                    // Second occurrence in `second`: no longer unique
                    matches[i] = None;
                    *occurrence = Occurrence::Many;
                }
            }
        }

        longest_increasing(&matches)
    }
}

/// Patience sorting over `matches`, skipping unmatched positions.
fn longest_increasing(matches: &[Option<usize>]) -> AnchorMatch {
    // Every placed card: (first index, second index, card below in the previous pile)
    let mut cards: Vec<(usize, usize, Option<usize>)> = Vec::new();
    // Card index on top of each pile
    let mut piles: Vec<usize> = Vec::new();

    for (i, matched) in matches.iter().enumerate() {
        let Some(j) = *matched else {
            continue;
        };
        let pile = piles.partition_point(|&top| cards[top].1 < j);
        let below = pile.checked_sub(1).map(|p| piles[p]);
        cards.push((i, j, below));
        if pile == piles.len() {
            piles.push(cards.len() - 1);
        } else {
            piles[pile] = cards.len() - 1;
        }
    }

    let mut result = AnchorMatch {
        first: Vec::with_capacity(piles.len()),
        second: Vec::with_capacity(piles.len()),
    };
    let mut current = piles.last().copied();
    while let Some(card) = current {
        let (i, j, below) = cards[card];
        result.first.push(i);
        result.second.push(j);
        current = below;
    }
    result.first.reverse();
    result.second.reverse();
    result
}
