//! Patience diff: anchor on unique common elements, recurse into the gaps.
//!
//! Elements that occur exactly once on both sides are very likely to be real
//! correspondences (a function signature, a closing brace with unique
//! context). Matching them first splits the problem into small independent
//! blocks; only blocks without any unique anchor go to Myers.
//!
//! The result is a valid common subsequence but not always the longest one.
//!
//! # Bounded Mode
//!
//! On large inputs with nothing unique to anchor on, Myers degrades towards
//! O(n * m). [`PatienceLcs::execute_bounded`] refuses such blocks with
//! [`DiffError::TooBig`] instead, so the caller can fall back to a coarser
//! result.

use std::ops::Range;

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::markers::ChangeMarkers;

use super::myers::MyersLcs;
use super::unique::UniqueLcs;

/// Heuristic LCS over sub-ranges of two sequences.
#[derive(Debug, Clone)]
pub struct PatienceLcs<'a> {
    first: &'a [u32],
    second: &'a [u32],
    range1: Range<usize>,
    range2: Range<usize>,
    max_exact_cells: usize,
    reduction_check_depth: usize,
}

impl<'a> PatienceLcs<'a> {
    /// Diff the whole of both sequences with default limits.
    pub fn new(first: &'a [u32], second: &'a [u32]) -> Self {
        let config = DiffConfig::default();
        Self {
            first,
            second,
            range1: 0..first.len(),
            range2: 0..second.len(),
            max_exact_cells: config.max_exact_cells,
            reduction_check_depth: config.reduction_check_depth,
        }
    }

    /// Restrict the diff to the given sub-ranges.
    pub fn with_ranges(mut self, range1: Range<usize>, range2: Range<usize>) -> Self {
        assert!(range1.end <= self.first.len(), "first range {range1:?} out of bounds");
        assert!(range2.end <= self.second.len(), "second range {range2:?} out of bounds");
        self.range1 = range1;
        self.range2 = range2;
        self
    }

    /// Take the bounded-mode limits from `config`.
    pub fn with_config(mut self, config: &DiffConfig) -> Self {
        self.max_exact_cells = config.max_exact_cells;
        self.reduction_check_depth = config.reduction_check_depth;
        self
    }

    /// Mark every position inside the ranges that is not on the computed
    /// common subsequence. Never fails.
    pub fn execute(&self, markers: &mut ChangeMarkers) -> DiffResult<()> {
        self.check_markers(markers);
        self.run(self.range1.clone(), self.range2.clone(), None, markers)
    }

    /// Like [`execute`](Self::execute), but gives up with `TooBig` when a
    /// block stays large and cannot be anchored.
    ///
    /// Markers may be partially written when this fails.
    pub fn execute_bounded(&self, markers: &mut ChangeMarkers) -> DiffResult<()> {
        self.check_markers(markers);
        self.run(
            self.range1.clone(),
            self.range2.clone(),
            Some(self.reduction_check_depth),
            markers,
        )
    }

    fn check_markers(&self, markers: &ChangeMarkers) {
        assert_eq!(markers.first.len(), self.first.len(), "first marker length mismatch");
        assert_eq!(markers.second.len(), self.second.len(), "second marker length mismatch");
    }

    /// `levels` is `None` when unbounded, otherwise the number of recursion
    /// levels left before every block is checked for reduction.
    fn run(
        &self,
        mut range1: Range<usize>,
        mut range2: Range<usize>,
        levels: Option<usize>,
        markers: &mut ChangeMarkers,
    ) -> DiffResult<()> {
        let prefix = self.common_prefix(&range1, &range2);
        range1.start += prefix;
        range2.start += prefix;
        let suffix = self.common_suffix(&range1, &range2);
        range1.end -= suffix;
        range2.end -= suffix;

        if range1.is_empty() || range2.is_empty() {
            markers.mark_ranges(range1.start, range1.len(), range2.start, range2.len());
            return Ok(());
        }

        if levels == Some(0) {
            self.check_reduction(range1.len(), range2.len())?;
        }
        let next = levels.map(|l| l.saturating_sub(1));

        let anchors = UniqueLcs::new(self.first, self.second)
            .with_ranges(range1.clone(), range2.clone())
            .execute();

        if anchors.is_empty() {
            if levels.is_some() {
                self.check_reduction(range1.len(), range2.len())?;
            }
            MyersLcs::new(self.first, self.second)
                .with_ranges(range1, range2)
                .execute(markers);
            return Ok(());
        }

        // Gaps between consecutive anchors, left to right
        let mut from1 = range1.start;
        let mut from2 = range2.start;
        for (a1, a2) in anchors.pairs() {
            let (to1, to2) = (range1.start + a1, range2.start + a2);
            self.run(from1..to1, from2..to2, next, markers)?;
            from1 = to1 + 1;
            from2 = to2 + 1;
        }
        self.run(from1..range1.end, from2..range2.end, next, markers)
    }

    /// A block is acceptable when it covers less than half of either side, or
    /// when Myers on it stays within the cell budget.
    fn check_reduction(&self, count1: usize, count2: usize) -> DiffResult<()> {
        if count1 * 2 < self.range1.len() || count2 * 2 < self.range2.len() {
            return Ok(());
        }
        if count1.saturating_mul(count2) <= self.max_exact_cells {
            return Ok(());
        }
        tracing::debug!(count1, count2, "patience diff could not reduce block");
        Err(DiffError::too_big(count1, count2))
    }

    fn common_prefix(&self, range1: &Range<usize>, range2: &Range<usize>) -> usize {
        self.first[range1.clone()]
            .iter()
            .zip(&self.second[range2.clone()])
            .take_while(|(a, b)| a == b)
            .count()
    }

    fn common_suffix(&self, range1: &Range<usize>, range2: &Range<usize>) -> usize {
        self.first[range1.clone()]
            .iter()
            .rev()
            .zip(self.second[range2.clone()].iter().rev())
            .take_while(|(a, b)| a == b)
            .count()
    }
}
