//! Myers Diff Algorithm over integer-coded sequences
//!
//! Computes a minimum edit script between sub-ranges of two sequences and
//! records it as change markers.
//!
//! # Algorithm Choice: Why Myers?
//!
//! | Algorithm | Time | Space | Best for |
//! |-----------|------|-------|----------|
//! | DP | O(n*m) | O(n*m) | Tiny inputs |
//! | **Myers** | O((n+m)*d) | O(d^2) steps | **Exact, small edit distance** |
//! | Patience | O(n log n) | O(n) | Large inputs, heuristic |
//!
//! # Space Complexity Note
//!
//! The textbook version keeps a trace of `V` per edit (O(d*(n+m))). Here each
//! explored step is stored once in [`LinkedDiffPaths`], linked to the step it
//! extends, so memory is proportional to the steps actually visited.
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986)
//!
//! # Implementation Notes
//!
//! - Only points inside the `n x m` grid are explored
//! - Tie-break is the standard forward greedy: insertion when `V[k-1] < V[k+1]`

use std::ops::Range;

use crate::markers::ChangeMarkers;

use super::paths::{LinkedDiffPaths, StepKey};

/// Furthest x on a diagonal that no path has reached.
const UNREACHED: isize = -1;

// =============================================================================
// Public API
// =============================================================================

/// Exact LCS over sub-ranges of two sequences.
///
/// ```
/// use tola_diff::algo::MyersLcs;
/// use tola_diff::ChangeMarkers;
///
/// let first = [1, 2, 3];
/// let second = [1, 3];
/// let mut markers = ChangeMarkers::new(3, 2);
/// MyersLcs::new(&first, &second).execute(&mut markers);
/// assert_eq!(markers.first.ones().collect::<Vec<_>>(), vec![1]);
/// ```
#[derive(Debug, Clone)]
pub struct MyersLcs<'a> {
    first: &'a [u32],
    second: &'a [u32],
    range1: Range<usize>,
    range2: Range<usize>,
}

impl<'a> MyersLcs<'a> {
    /// Diff the whole of both sequences.
    pub fn new(first: &'a [u32], second: &'a [u32]) -> Self {
        Self {
            first,
            second,
            range1: 0..first.len(),
            range2: 0..second.len(),
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

    /// Mark every position inside the ranges that is not on the LCS.
    ///
    /// Positions outside the ranges are left untouched. Returns the edit
    /// distance between the two ranges.
    pub fn execute(&self, markers: &mut ChangeMarkers) -> usize {
        match self.try_execute(usize::MAX, markers) {
            Some(d) => d,
            None => unreachable!("unbounded search always reaches the corner"),
        }
    }

    /// Like [`execute`](Self::execute), but gives up once the edit distance
    /// exceeds `max_edits`.
    ///
    /// Returns `None` with the markers untouched in that case. The search
    /// costs O((n + m) * max_edits) at most.
    pub fn try_execute(&self, max_edits: usize, markers: &mut ChangeMarkers) -> Option<usize> {
        assert_eq!(markers.first.len(), self.first.len(), "first marker length mismatch");
        assert_eq!(markers.second.len(), self.second.len(), "second marker length mismatch");

        let start1 = self.range1.start;
        let start2 = self.range2.start;
        let n = self.range1.len();
        let m = self.range2.len();

        // Quick paths
        if n == 0 || m == 0 {
            if n + m > max_edits {
                return None;
            }
            markers.mark_ranges(start1, n, start2, m);
            return Some(n + m);
        }

        let (paths, d) = self.forward(n, m, max_edits)?;
        paths.apply_changes(n, m, start1, start2, markers);
        Some(d)
    }

    // =========================================================================
    // Myers Algorithm Core
    // =========================================================================

    /// Explore the edit graph by edit count until the corner is reached.
    ///
    /// For each d, tracks the furthest-reaching path on each diagonal
    /// k = x - y, together with the key of the step that got there.
    /// `None` when the corner needs more than `max_edits` edits.
    fn forward(&self, n: usize, m: usize, max_edits: usize) -> Option<(LinkedDiffPaths, usize)> {
        let first = &self.first[self.range1.clone()];
        let second = &self.second[self.range2.clone()];

        let snake = |mut x: usize, mut y: usize| {
            while x < n && y < m && first[x] == second[y] {
                x += 1;
                y += 1;
            }
            x
        };

        let mut paths = LinkedDiffPaths::with_capacity(n + m);

        // Diagonals k in [-m, n], stored at k + m + 1 so k - 1 and k + 1 are
        // always addressable.
        let offset = m as isize + 1;
        let mut v = vec![UNREACHED; n + m + 3];
        let mut keys = vec![StepKey::NONE; n + m + 3];

        let x = snake(0, 0);
        let key = paths.encode_step(x, x, x, false, StepKey::NONE);
        if x == n && x == m {
            return Some((paths, 0));
        }
        v[offset as usize] = x as isize;
        keys[offset as usize] = key;

        for d in 1..=max_edits.min(n + m) {
            let d = d as isize;
            let lo = (-d).max(-(m as isize));
            let hi = d.min(n as isize);
            // Keep the parity of d
            let lo = if (lo + d) % 2 == 0 { lo } else { lo + 1 };

            for k in (lo..=hi).step_by(2) {
                let kk = (k + offset) as usize;

                // Insertion keeps x and moves down from diagonal k + 1
                let insertion = (v[kk + 1] != UNREACHED && v[kk + 1] - k <= m as isize)
                    .then_some(v[kk + 1]);
                // Deletion moves right from diagonal k - 1
                let deletion = (v[kk - 1] != UNREACHED && v[kk - 1] < n as isize)
                    .then(|| v[kk - 1] + 1);

                let (x, is_insertion, prev) = match (insertion, deletion) {
                    (Some(ix), Some(dx)) if dx <= ix => (ix, true, keys[kk + 1]),
                    (_, Some(dx)) => (dx, false, keys[kk - 1]),
                    (Some(ix), None) => (ix, true, keys[kk + 1]),
                    (None, None) => {
                        v[kk] = UNREACHED;
                        continue;
                    }
                };

                let x = x as usize;
                let y = (x as isize - k) as usize;
                let end = snake(x, y);
                let run = end - x;
                let key = paths.encode_step(end, y + run, run, is_insertion, prev);

                if end == n && y + run == m {
                    return Some((paths, d as usize));
                }
                v[kk] = end as isize;
                keys[kk] = key;
            }
        }

        None
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(first: &[u32], second: &[u32]) -> (Vec<usize>, Vec<usize>, usize) {
        let mut markers = ChangeMarkers::new(first.len(), second.len());
        let d = MyersLcs::new(first, second).execute(&mut markers);
        assert!(markers.is_common_subsequence(first, second));
        assert_eq!(markers.edit_count(), d);
        (
            markers.first.ones().collect(),
            markers.second.ones().collect(),
            d,
        )
    }

    #[test]
    fn test_empty_sequences() {
        assert_eq!(diff(&[], &[]), (vec![], vec![], 0));
    }

    #[test]
    fn test_insert_all() {
        assert_eq!(diff(&[], &[1, 2, 3]), (vec![], vec![0, 1, 2], 3));
    }

    #[test]
    fn test_delete_all() {
        assert_eq!(diff(&[1, 2, 3], &[]), (vec![0, 1, 2], vec![], 3));
    }

    #[test]
    fn test_no_changes() {
        assert_eq!(diff(&[1, 2, 3], &[1, 2, 3]), (vec![], vec![], 0));
    }

    #[test]
    fn test_single_insert() {
        assert_eq!(diff(&[1, 3], &[1, 2, 3]), (vec![], vec![1], 1));
    }

    #[test]
    fn test_single_delete() {
        assert_eq!(diff(&[1, 2, 3], &[1, 3]), (vec![1], vec![], 1));
    }

    #[test]
    fn test_mixed_operations() {
        // delete 2, delete 4, insert 5
        let (deleted, inserted, d) = diff(&[1, 2, 3, 4], &[1, 5, 3]);
        assert_eq!(d, 3);
        assert_eq!(deleted, vec![1, 3]);
        assert_eq!(inserted, vec![1]);
    }

    #[test]
    fn test_complete_reorder() {
        let (_, _, d) = diff(&[1, 2, 3], &[3, 2, 1]);
        assert_eq!(d, 4);
    }

    #[test]
    fn test_classic_myers_example() {
        // ABCABBA -> CBABAC, edit distance 5
        let a = [1, 2, 3, 1, 2, 2, 1];
        let b = [3, 2, 1, 2, 1, 3];
        let (_, _, d) = diff(&a, &b);
        assert_eq!(d, 5);
    }

    #[test]
    fn test_nothing_in_common() {
        assert_eq!(diff(&[1, 2], &[3, 4, 5]), (vec![0, 1], vec![0, 1, 2], 5));
    }

    #[test]
    fn test_ranges_leave_outside_untouched() {
        let first = [7, 1, 2, 3, 7];
        let second = [8, 1, 3, 8];
        let mut markers = ChangeMarkers::new(first.len(), second.len());
        let d = MyersLcs::new(&first, &second)
            .with_ranges(1..4, 1..3)
            .execute(&mut markers);
        assert_eq!(d, 1);
        assert_eq!(markers.first.ones().collect::<Vec<_>>(), vec![2]);
        assert_eq!(markers.second.count_ones(), 0);
    }

    #[test]
    fn test_edit_budget() {
        let first = [1, 2, 3, 4];
        let second = [1, 5, 3];
        let mut markers = ChangeMarkers::new(4, 3);
        assert_eq!(MyersLcs::new(&first, &second).try_execute(2, &mut markers), None);
        assert!(markers.is_empty());
        assert_eq!(MyersLcs::new(&first, &second).try_execute(3, &mut markers), Some(3));
        assert!(markers.is_common_subsequence(&first, &second));

        let mut markers = ChangeMarkers::new(4, 0);
        assert_eq!(MyersLcs::new(&first, &[]).try_execute(3, &mut markers), None);
        assert_eq!(MyersLcs::new(&first, &[]).try_execute(4, &mut markers), Some(4));
    }

    #[test]
    fn test_two_ranges_into_same_markers() {
        let first = [1, 2, 9, 3, 4];
        let second = [1, 4, 9, 3];
        let mut markers = ChangeMarkers::new(first.len(), second.len());
        MyersLcs::new(&first, &second)
            .with_ranges(0..2, 0..2)
            .execute(&mut markers);
        MyersLcs::new(&first, &second)
            .with_ranges(3..5, 3..4)
            .execute(&mut markers);
        assert!(!markers.first.get(2));
        assert!(!markers.second.get(2));
        assert!(markers.is_common_subsequence(&first, &second));
    }
}
