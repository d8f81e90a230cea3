//! Property tests for the sequence diff.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use tola_diff::algo::{MyersLcs, PatienceLcs, Reindexer, UniqueLcs};
use tola_diff::{
    build_changes, build_changes_with_config, translate_line, Algorithm, Change, ChangeBuilder,
    ChangeList, ChangeMarkers, DiffConfig,
};

// =============================================================================
// Helpers
// =============================================================================

/// Small alphabet so sequences share plenty of elements.
fn sequence() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..6, 0..40)
}

/// Textbook O(n * m) LCS length.
fn lcs_len(first: &[u32], second: &[u32]) -> usize {
    let mut table = vec![vec![0usize; second.len() + 1]; first.len() + 1];
    for i in (0..first.len()).rev() {
        for j in (0..second.len()).rev() {
            table[i][j] = if first[i] == second[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table[0][0]
}

fn optimal_edits(first: &[u32], second: &[u32]) -> usize {
    first.len() + second.len() - 2 * lcs_len(first, second)
}

fn myers(first: &[u32], second: &[u32]) -> (ChangeMarkers, usize) {
    let mut markers = ChangeMarkers::new(first.len(), second.len());
    let d = MyersLcs::new(first, second).execute(&mut markers);
    (markers, d)
}

/// Rebuild `second` from `first` and the change records, checking that
/// every record starts where the equal run before it ends.
fn apply(first: &[u32], second: &[u32], changes: &ChangeList) -> Vec<u32> {
    let mut out = Vec::with_capacity(second.len());
    let mut next = 0;
    for change in changes {
        out.extend_from_slice(&first[next..change.line0]);
        assert_eq!(out.len(), change.line1, "misaligned record {change:?}");
        out.extend_from_slice(&second[change.line1..change.end1()]);
        next = change.end0();
    }
    out.extend_from_slice(&first[next..]);
    out
}

/// Longest chain of unique-in-both pairs increasing on both sides, O(k^2).
fn unique_chain_len(first: &[u32], second: &[u32]) -> usize {
    let count = |seq: &[u32], value: u32| seq.iter().filter(|&&v| v == value).count();
    // Pairs come out ordered by `i`, so only `j` needs checking
    let pairs: Vec<(usize, usize)> = first
        .iter()
        .enumerate()
        .filter(|&(_, &v)| count(first, v) == 1 && count(second, v) == 1)
        .filter_map(|(i, &v)| second.iter().position(|&w| w == v).map(|j| (i, j)))
        .collect();

    let mut best = vec![1usize; pairs.len()];
    for k in 0..pairs.len() {
        for l in 0..k {
            if pairs[l].1 < pairs[k].1 {
                best[k] = best[k].max(best[l] + 1);
            }
        }
    }
    best.into_iter().max().unwrap_or(0)
}

fn all_algorithms() -> [Algorithm; 4] {
    [
        Algorithm::Auto,
        Algorithm::Myers,
        Algorithm::Patience,
        Algorithm::PatienceBounded,
    ]
}

// =============================================================================
// Literal scenarios
// =============================================================================

#[test]
fn test_literal_scenarios() {
    assert!(build_changes(&[1, 2, 3], &[1, 2, 3]).unwrap().is_empty());

    // "1 2 3" vs "a 2 b" with a = 10, b = 11
    let changes = build_changes(&[1, 2, 3], &[10, 2, 11]).unwrap();
    assert_eq!(
        changes.as_slice(),
        &[Change::new(0, 0, 1, 1), Change::new(2, 2, 1, 1)]
    );

    let changes = build_changes(&[1, 2, 3], &[1, 2, 10, 11, 2, 3]).unwrap();
    assert_eq!(changes.as_slice(), &[Change::new(2, 2, 0, 3)]);

    let anchors = UniqueLcs::new(&[1, 1, 2, 2, 10], &[10, 1, 1, 2, 2]).execute();
    assert_eq!(anchors.pairs().collect::<Vec<_>>(), vec![(4, 0)]);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn myers_is_valid_and_optimal(first in sequence(), second in sequence()) {
        let (markers, d) = myers(&first, &second);
        prop_assert!(markers.is_common_subsequence(&first, &second));
        prop_assert_eq!(markers.edit_count(), d);
        prop_assert_eq!(d, optimal_edits(&first, &second));
    }

    #[test]
    fn patience_is_valid_never_better_than_myers(first in sequence(), second in sequence()) {
        let mut markers = ChangeMarkers::new(first.len(), second.len());
        PatienceLcs::new(&first, &second).execute(&mut markers).unwrap();
        prop_assert!(markers.is_common_subsequence(&first, &second));
        prop_assert!(markers.edit_count() >= optimal_edits(&first, &second));
    }

    #[test]
    fn identity_has_no_changes(first in sequence()) {
        for algorithm in all_algorithms() {
            let config = DiffConfig::with_algorithm(algorithm);
            let changes = build_changes_with_config(&first, &first, &config).unwrap();
            prop_assert!(changes.is_empty());
        }
    }

    #[test]
    fn changes_rebuild_second_and_coalesce(first in sequence(), second in sequence()) {
        for algorithm in all_algorithms() {
            let config = DiffConfig::with_algorithm(algorithm);
            let changes = build_changes_with_config(&first, &second, &config).unwrap();

            prop_assert_eq!(apply(&first, &second, &changes), second.clone());
            prop_assert!(changes.iter().all(|c| c.deleted + c.inserted > 0));
            for pair in changes.as_slice().windows(2) {
                prop_assert!(pair[0].end0() < pair[1].line0, "{:?}", pair);
                prop_assert_eq!(
                    pair[1].line0 - pair[0].end0(),
                    pair[1].line1 - pair[0].end1()
                );
            }

            let markers = changes.markers(first.len(), second.len());
            prop_assert!(markers.is_common_subsequence(&first, &second));
        }
    }

    #[test]
    fn exact_driver_is_optimal(first in sequence(), second in sequence()) {
        let config = DiffConfig::with_algorithm(Algorithm::Myers);
        let changes = build_changes_with_config(&first, &second, &config).unwrap();
        prop_assert_eq!(changes.edit_count(), optimal_edits(&first, &second));
        // Small inputs stay within the exact budget
        prop_assert_eq!(build_changes(&first, &second).unwrap(), changes);
    }

    #[test]
    fn reindex_round_trip(first in sequence(), second in sequence()) {
        let mut reindexer = Reindexer::new();
        let (reduced1, reduced2) = reindexer.discard_unique(&first, &second);
        let (reduced_markers, _) = myers(&reduced1, &reduced2);

        let mut builder = ChangeBuilder::new(0);
        reindexer.reindex(&reduced_markers, &mut builder);
        let changes = builder.finish();

        let markers = changes.markers(first.len(), second.len());
        prop_assert!(markers.is_common_subsequence(&first, &second));
        prop_assert_eq!(markers.edit_count(), myers(&first, &second).1);
    }

    #[test]
    fn unique_anchors_are_unique_and_increasing(first in sequence(), second in sequence()) {
        let anchors = UniqueLcs::new(&first, &second).execute();
        let count = |seq: &[u32], value: u32| seq.iter().filter(|&&v| v == value).count();

        for (i, j) in anchors.pairs() {
            prop_assert_eq!(first[i], second[j]);
            prop_assert_eq!(count(&first, first[i]), 1);
            prop_assert_eq!(count(&second, second[j]), 1);
        }
        for pair in anchors.first.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for pair in anchors.second.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn unique_anchors_are_a_longest_chain(
        first in prop::collection::vec(0u32..30, 0..40),
        second in prop::collection::vec(0u32..30, 0..40),
    ) {
        let anchors = UniqueLcs::new(&first, &second).execute();
        prop_assert_eq!(anchors.len(), unique_chain_len(&first, &second));
    }

    #[test]
    fn translated_lines_point_at_equal_elements(first in sequence(), second in sequence()) {
        let changes = build_changes(&first, &second).unwrap();
        let markers = changes.markers(first.len(), second.len());
        for line in 0..first.len() {
            match translate_line(&changes, line) {
                Some(target) => {
                    prop_assert_eq!(first[line], second[target]);
                }
                None => {
                    prop_assert!(markers.first.get(line));
                }
            }
        }
    }
}
