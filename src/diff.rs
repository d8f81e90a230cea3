//! Sequence diff driver.
//!
//! Ties the pieces together into one call:
//!
//! ```text
//! first, second
//!   │  strip common prefix / suffix
//!   ▼
//! Reindexer::discard_unique      drop elements absent from the other side
//!   │
//!   ▼
//! Myers | Patience               markers over the reduced sequences
//!   │
//!   ▼
//! Reindexer::reindex ──▶ ChangeBuilder ──▶ ChangeList
//! ```
//!
//! # Example
//!
//! ```
//! use tola_diff::{build_changes_for, Change};
//!
//! let changes = build_changes_for(&["1", "2", "3"], &["a", "2", "b"]).unwrap();
//! assert_eq!(
//!     changes.as_slice(),
//!     &[Change::new(0, 0, 1, 1), Change::new(2, 2, 1, 1)]
//! );
//! ```

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::algo::{MyersLcs, PatienceLcs, Reindexer};
use crate::change::{ChangeBuilder, ChangeList, LcsBuilder};
use crate::config::{Algorithm, DiffConfig};
use crate::error::DiffResult;
use crate::markers::ChangeMarkers;

// =============================================================================
// Public API
// =============================================================================

/// Diff two integer-coded sequences with the default configuration.
pub fn build_changes(first: &[u32], second: &[u32]) -> DiffResult<ChangeList> {
    build_changes_with_config(first, second, &DiffConfig::default())
}

/// Diff two integer-coded sequences.
///
/// Fails only with `TooBig`, when the configured algorithm is bounded and
/// the input cannot be reduced.
pub fn build_changes_with_config(
    first: &[u32],
    second: &[u32],
    config: &DiffConfig,
) -> DiffResult<ChangeList> {
    let start_shift = common_prefix(first, second);
    let end_cut = common_suffix(&first[start_shift..], &second[start_shift..]);
    let first = &first[start_shift..first.len() - end_cut];
    let second = &second[start_shift..second.len() - end_cut];

    tracing::trace!(
        len1 = first.len(),
        len2 = second.len(),
        start_shift,
        end_cut,
        "building changes"
    );

    let mut builder = ChangeBuilder::new(start_shift);
    if first.is_empty() || second.is_empty() {
        builder.add_change(first.len(), second.len());
        return Ok(builder.finish());
    }

    let mut reindexer = Reindexer::new();
    let (reduced1, reduced2) = reindexer.discard_unique(first, second);
    if reduced1.is_empty() {
        // Nothing in common
        builder.add_change(first.len(), second.len());
        return Ok(builder.finish());
    }

    let mut markers = ChangeMarkers::new(reduced1.len(), reduced2.len());
    run_lcs(&reduced1, &reduced2, config, &mut markers)?;
    reindexer.reindex(&markers, &mut builder);
    Ok(builder.finish())
}

/// Diff two sequences of arbitrary hashable items.
pub fn build_changes_for<T: Hash + Eq>(first: &[T], second: &[T]) -> DiffResult<ChangeList> {
    let mut enumerator = Enumerator::new();
    let first = enumerator.enumerate(first);
    let second = enumerator.enumerate(second);
    build_changes(&first, &second)
}

/// Diff two texts line by line.
pub fn diff_lines(text1: &str, text2: &str) -> DiffResult<ChangeList> {
    let mut enumerator = Enumerator::new();
    let first = enumerator.enumerate(text1.lines());
    let second = enumerator.enumerate(text2.lines());
    build_changes(&first, &second)
}

/// Diff many independent sequence pairs in parallel.
#[cfg(feature = "parallel")]
pub fn build_changes_batch(
    pairs: &[(&[u32], &[u32])],
    config: &DiffConfig,
) -> Vec<DiffResult<ChangeList>> {
    use rayon::prelude::*;

    pairs
        .par_iter()
        .map(|(first, second)| build_changes_with_config(first, second, config))
        .collect()
}

// =============================================================================
// Enumerator
// =============================================================================

/// Assigns equal items equal integer codes.
///
/// Use one enumerator for both sides of a diff so codes are comparable.
#[derive(Debug)]
pub struct Enumerator<T> {
    codes: FxHashMap<T, u32>,
}

impl<T: Hash + Eq> Default for Enumerator<T> {
    fn default() -> Self {
        Self {
            codes: FxHashMap::default(),
        }
    }
}

impl<T: Hash + Eq> Enumerator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Code of `item`, assigning the next free code on first sight.
    ///
    /// # Panics
    ///
    /// Panics once more than `u32::MAX + 1` distinct items have been seen.
    pub fn code(&mut self, item: T) -> u32 {
        let next = self.codes.len();
        *self.codes.entry(item).or_insert_with(|| next_code(next))
    }

    /// Codes of all `items`, in order.
    pub fn enumerate(&mut self, items: impl IntoIterator<Item = T>) -> Vec<u32> {
        items.into_iter().map(|item| self.code(item)).collect()
    }

    /// Number of distinct items seen.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn run_lcs(
    first: &[u32],
    second: &[u32],
    config: &DiffConfig,
    markers: &mut ChangeMarkers,
) -> DiffResult<()> {
    match config.algorithm {
        Algorithm::Myers => {
            MyersLcs::new(first, second).execute(markers);
            Ok(())
        }
        Algorithm::Patience => PatienceLcs::new(first, second)
            .with_config(config)
            .execute(markers),
        Algorithm::PatienceBounded => PatienceLcs::new(first, second)
            .with_config(config)
            .execute_bounded(markers),
        Algorithm::Auto => {
            let myers = MyersLcs::new(first, second);
            if first.len().saturating_mul(second.len()) <= config.max_exact_cells {
                myers.execute(markers);
                return Ok(());
            }
            // Large but similar inputs still finish in O((n + m) * d)
            let max_edits = config.max_exact_cells / (first.len() + second.len());
            if myers.try_execute(max_edits, markers).is_some() {
                return Ok(());
            }
            tracing::debug!(
                len1 = first.len(),
                len2 = second.len(),
                max_edits,
                "edit distance exceeds exact budget, using bounded patience"
            );
            PatienceLcs::new(first, second)
                .with_config(config)
                .execute_bounded(markers)
        }
    }
}

fn next_code(len: usize) -> u32 {
    u32::try_from(len).expect("more distinct items than u32 codes")
}

fn common_prefix(first: &[u32], second: &[u32]) -> usize {
    first.iter().zip(second).take_while(|(a, b)| a == b).count()
}

fn common_suffix(first: &[u32], second: &[u32]) -> usize {
    first
        .iter()
        .rev()
        .zip(second.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

// =============================================================================
// Tests
// =============================================================================
