//! LCS algorithms over integer-coded sequences.
//!
//! - `unique`: unique-anchor matcher (patience pre-pass)
//! - `reindex`: drop unmatched elements, map results back
//! - `paths`: compact arena of edit graph steps
//! - `myers`: exact Myers diff
//! - `patience`: heuristic patience diff with bounded mode

mod myers;
mod paths;
mod patience;
mod reindex;
mod unique;

pub use myers::MyersLcs;
pub use paths::{LinkedDiffPaths, StepKey};
pub use patience::PatienceLcs;
pub use reindex::{Reindexer, Side};
pub use unique::{AnchorMatch, UniqueLcs};
