//! tola-diff - Sequence and Tree Diff Engine
//!
//! ## Core Concepts
//!
//! **Integer-coded sequences**: every input is turned into `u32` codes first
//! (see [`Enumerator`]), so the algorithms only ever compare integers.
//!
//! **Pipeline**: common prefix/suffix are stripped, elements without a
//! counterpart are dropped ([`algo::Reindexer`]), an LCS algorithm marks the
//! rest, and the markers are replayed into a [`ChangeList`].
//!
//! ## Modules
//! - `algo`: LCS algorithms (Myers, patience, unique anchors, reindexing)
//! - `change`: change records and the builder that coalesces them
//! - `diff`: the driver and input adapters
//! - `tree`: ordered tree diff on top of the sequence diff
//! - `markers`: per-element change flags
//!
//! ## Usage
//!
//! ```
//! use tola_diff::{diff_lines, translate_line};
//!
//! let old = "one\ntwo\nthree\n";
//! let new = "zero\none\nthree\n";
//! let changes = diff_lines(old, new).unwrap();
//!
//! assert_eq!(changes.len(), 2);
//! assert_eq!(translate_line(&changes, 0), Some(1));
//! assert_eq!(translate_line(&changes, 1), None);
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Algorithms: myers, patience, unique anchors, reindexing
pub mod algo;

/// Change records and builders
pub mod change;

/// Diff configuration
pub mod config;

/// Sequence diff driver and input adapters
pub mod diff;

/// Error types
pub mod error;

/// Change marker bit sets
pub mod markers;

/// Prelude for common imports
pub mod prelude;

/// Ordered tree diff
pub mod tree;

// =============================================================================
// Re-exports
// =============================================================================

// Sequence diff
pub use change::{translate_line, Change, ChangeBuilder, ChangeList, ChangeRef, LcsBuilder};
pub use config::{Algorithm, DiffConfig};
pub use diff::{build_changes, build_changes_for, build_changes_with_config, diff_lines, Enumerator};

#[cfg(feature = "parallel")]
pub use diff::build_changes_batch;

// Markers
pub use markers::{ChangeMarkers, MarkerSet};

// Tree diff
pub use tree::{
    diff_trees, diff_trees_with_config, PairState, ShallowNodeComparator, ThreeState,
    TreeChangeBuilder, TreeDiffConfig, TreeDiffStats, TreeEdit, TreeStructure,
};

// Error types
pub use error::{DiffError, DiffResult};

// =============================================================================
// Tests
// =============================================================================
