//! Prelude module for common imports.
//!
//! ```
//! use tola_diff::prelude::*;
//!
//! let changes = diff_lines("a\nb\n", "a\nc\n").unwrap();
//! assert_eq!(changes.as_slice(), &[Change::new(1, 1, 1, 1)]);
//! ```

// Sequence diff
pub use crate::change::{Change, ChangeBuilder, ChangeList, ChangeRef, LcsBuilder};
pub use crate::config::{Algorithm, DiffConfig};
pub use crate::diff::{build_changes, build_changes_for, build_changes_with_config, diff_lines, Enumerator};

#[cfg(feature = "parallel")]
pub use crate::diff::build_changes_batch;

// Markers
pub use crate::markers::{ChangeMarkers, MarkerSet};

// Tree diff
pub use crate::tree::{
    diff_trees, diff_trees_with_config, Children, PairState, ShallowNodeComparator, ThreeState,
    TreeChangeBuilder, TreeDiffConfig, TreeDiffStats, TreeEdit, TreeStructure,
};

// Error
pub use crate::error::{DiffError, DiffResult};
