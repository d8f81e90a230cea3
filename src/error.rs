//! Error types for tola-diff.
//!
//! The only recoverable failure is a bounded heuristic diff giving up on an
//! input it cannot reduce. Everything else is an invariant violation and
//! panics.

use thiserror::Error;

/// Errors that can occur during diff operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The bounded patience diff could not anchor the input well enough to
    /// keep the remaining exact sub-problem small.
    #[error("sequences too big for diff: {first} x {second} elements remain unanchored")]
    TooBig {
        /// Unanchored elements left on the first side
        first: usize,
        /// Unanchored elements left on the second side
        second: usize,
    },
}

/// Result type alias for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;

impl DiffError {
    /// Create a too-big error for a block of the given size.
    pub fn too_big(first: usize, second: usize) -> Self {
        Self::TooBig { first, second }
    }

    /// Check if this error signals an oversized input.
    pub fn is_too_big(&self) -> bool {
        matches!(self, Self::TooBig { .. })
    }
}
