//! Reindexing: shrink a diff problem before running LCS on it.
//!
//! An element of one sequence that never occurs in the other can never be
//! matched, so it is dropped before the expensive part runs. The reduced
//! markers are later expanded back: every dropped element is a change.

use rustc_hash::FxHashSet;

use crate::change::LcsBuilder;
use crate::markers::{ChangeMarkers, MarkerSet};

/// Side of a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl Side {
    #[inline]
    fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// Maps a reduced diff problem back to the original sequences.
///
/// One instance serves exactly one diff call.
#[derive(Debug, Default)]
pub struct Reindexer {
    /// Original index of every retained element, per side
    old_indices: [Vec<usize>; 2],
    original_lengths: [usize; 2],
}

impl Reindexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop elements that cannot take part in any common subsequence.
    ///
    /// `first` keeps what occurs in `second`; `second` then keeps what occurs
    /// in the reduced `first`. Relative order is preserved.
    pub fn discard_unique(&mut self, first: &[u32], second: &[u32]) -> (Vec<u32>, Vec<u32>) {
        let reduced1 = self.discard(second, first, Side::First);
        let reduced2 = self.discard(&reduced1, second, Side::Second);
        (reduced1, reduced2)
    }

    fn discard(&mut self, needed: &[u32], to_discard: &[u32], side: Side) -> Vec<u32> {
        let needed: FxHashSet<u32> = needed.iter().copied().collect();
        let mut kept = Vec::with_capacity(to_discard.len());
        let mut indices = Vec::with_capacity(to_discard.len());
        for (i, &value) in to_discard.iter().enumerate() {
            if needed.contains(&value) {
                kept.push(value);
                indices.push(i);
            }
        }
        self.original_lengths[side.index()] = to_discard.len();
        self.old_indices[side.index()] = indices;
        kept
    }

    /// Length of the reduced sequence on `side`.
    pub fn reduced_len(&self, side: Side) -> usize {
        self.old_indices[side.index()].len()
    }

    /// Length of the original sequence on `side`.
    pub fn original_len(&self, side: Side) -> usize {
        self.original_lengths[side.index()]
    }

    /// Original index of the element at `reduced` in the reduced sequence.
    pub fn restore_index(&self, reduced: usize, side: Side) -> usize {
        let indices = &self.old_indices[side.index()];
        assert!(
            reduced < indices.len(),
            "reduced index {reduced} out of range 0..{} on {side:?} side",
            indices.len()
        );
        indices[reduced]
    }

    /// Replay markers computed on the reduced sequences into `builder`, in
    /// original index space.
    pub fn reindex(&self, reduced: &ChangeMarkers, builder: &mut impl LcsBuilder) {
        let [len1, len2] = self.original_lengths;
        assert_eq!(
            reduced.first.len(),
            self.reduced_len(Side::First),
            "first markers do not match the reduced sequence"
        );
        assert_eq!(
            reduced.second.len(),
            self.reduced_len(Side::Second),
            "second markers do not match the reduced sequence"
        );

        let expanded;
        let nothing_discarded =
            self.reduced_len(Side::First) == len1 && self.reduced_len(Side::Second) == len2;
        let changes = if nothing_discarded {
            reduced
        } else {
            expanded = self.expand(reduced);
            &expanded
        };

        replay(changes, len1, len2, builder);
    }

    /// Markers over the original sequences: reduced markers mapped back, and
    /// every discarded element marked.
    fn expand(&self, reduced: &ChangeMarkers) -> ChangeMarkers {
        let [len1, len2] = self.original_lengths;
        let mut markers = ChangeMarkers::new(len1, len2);
        mark_side(&self.old_indices[0], &reduced.first, len1, &mut markers.first);
        mark_side(&self.old_indices[1], &reduced.second, len2, &mut markers.second);
        markers
    }
}

fn mark_side(indices: &[usize], reduced: &MarkerSet, len: usize, markers: &mut MarkerSet) {
    let mut next_kept = 0;
    for (r, &original) in indices.iter().enumerate() {
        // Discarded run before this element
        markers.set_range(next_kept..original);
        if reduced.get(r) {
            markers.set(original);
        }
        next_kept = original + 1;
    }
    markers.set_range(next_kept..len);
}

/// Scan markers into maximal equal and change runs.
fn replay(changes: &ChangeMarkers, len1: usize, len2: usize, builder: &mut impl LcsBuilder) {
    let mut x = 0;
    let mut y = 0;
    let mut pending = (0, 0);
    while x < len1 && y < len2 {
        let start = x;
        while x < len1 && y < len2 && !changes.first.get(x) && !changes.second.get(y) {
            x += 1;
            y += 1;
        }
        if x > start {
            flush(&mut pending, builder);
            builder.add_equal(x - start);
        }

        while x < len1 && changes.first.get(x) {
            pending.0 += 1;
            x += 1;
        }
        while y < len2 && changes.second.get(y) {
            pending.1 += 1;
            y += 1;
        }
    }
    pending.0 += len1 - x;
    pending.1 += len2 - y;
    flush(&mut pending, builder);
}

fn flush(pending: &mut (usize, usize), builder: &mut impl LcsBuilder) {
    if *pending != (0, 0) {
        builder.add_change(pending.0, pending.1);
        *pending = (0, 0);
    }
}
