//! Tuning knobs for the sequence diff driver.
//!
//! The thresholds here are heuristics, not contracts. They decide when the
//! driver stops trusting the exact algorithm and when a bounded patience diff
//! gives up with [`DiffError::TooBig`](crate::DiffError::TooBig).

/// Default upper bound on `N * M` of a reduced problem handed to Myers.
pub const DEFAULT_MAX_EXACT_CELLS: usize = 1_000_000;

/// Default number of patience recursion levels before the reduction check
/// starts firing in bounded mode.
pub const DEFAULT_REDUCTION_CHECK_DEPTH: usize = 2;

/// LCS algorithm used on the reduced problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Myers when the reduced problem is small enough, bounded patience otherwise.
    #[default]
    Auto,
    /// Always the exact Myers algorithm. Never fails, may be slow.
    Myers,
    /// Patience without size bound. Never fails.
    Patience,
    /// Patience that fails with `TooBig` on irreducible large inputs.
    PatienceBounded,
}

/// Configuration for sequence diffing.
///
/// Use this to tune diff behavior for specific inputs:
/// - Increase limits for large generated files
/// - Decrease limits for faster fallback on unrelated inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffConfig {
    /// Algorithm selection.
    /// Default: `Algorithm::Auto`
    pub algorithm: Algorithm,
    /// Largest `N * M` handed to Myers without anchoring.
    /// Default: 1_000_000
    pub max_exact_cells: usize,
    /// Patience recursion depth at which bounded mode starts checking that
    /// blocks shrink.
    /// Default: 2
    pub reduction_check_depth: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Auto,
            max_exact_cells: DEFAULT_MAX_EXACT_CELLS,
            reduction_check_depth: DEFAULT_REDUCTION_CHECK_DEPTH,
        }
    }
}

impl DiffConfig {
    /// Create config with a fixed algorithm and default limits.
    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Create config for large inputs (higher limits).
    pub fn large() -> Self {
        Self {
            max_exact_cells: 16 * DEFAULT_MAX_EXACT_CELLS,
            reduction_check_depth: 4,
            ..Self::default()
        }
    }

    /// Create config for small inputs (lower limits, faster fallback).
    pub fn small() -> Self {
        Self {
            max_exact_cells: DEFAULT_MAX_EXACT_CELLS / 16,
            reduction_check_depth: 1,
            ..Self::default()
        }
    }
}
