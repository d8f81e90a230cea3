//! Compact store for edit-graph paths.
//!
//! Myers explores the edit graph one edit at a time. Instead of keeping a
//! snapshot of every diagonal per edit (O(d * (n + m)) memory) or an N x M
//! matrix, each explored step is appended to an arena and linked to the step
//! it extends. Only the steps actually visited are stored.
//!
//! A step is one edit move (insertion or deletion) followed by `run`
//! diagonal matches, ending at `(x, y)`. The first step of a path has no
//! predecessor and no edit move: it is the initial snake from `(0, 0)`.
//!
//! ```text
//!   (0,0) ──snake──▶ A ──del──▶ ─snake─▶ B ──ins──▶ ─snake─▶ (n,m)
//!           start          step(prev = start)   step(prev = B's key)
//! ```

use crate::markers::ChangeMarkers;

/// Opaque handle of one encoded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepKey(u32);

impl StepKey {
    /// "No predecessor": marks the start of a path.
    pub const NONE: StepKey = StepKey(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Step {
    x: u32,
    y: u32,
    run: u32,
    insertion: bool,
    prev: StepKey,
}

/// Arena of edit-graph steps, addressed by [`StepKey`].
#[derive(Debug, Default)]
pub struct LinkedDiffPaths {
    steps: Vec<Step>,
}

impl LinkedDiffPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    /// Number of steps stored.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a step ending at `(x, y)` and return its key.
    ///
    /// `is_insertion` selects the edit move that precedes the diagonal run;
    /// it is ignored for a start step (`prev == StepKey::NONE`).
    pub fn encode_step(
        &mut self,
        x: usize,
        y: usize,
        run: usize,
        is_insertion: bool,
        prev: StepKey,
    ) -> StepKey {
        assert!(run <= x && run <= y, "diagonal run {run} longer than ({x}, {y})");
        let key = u32::try_from(self.steps.len())
            .ok()
            .filter(|&k| k != StepKey::NONE.0)
            .expect("edit graph path store exhausted");
        self.steps.push(Step {
            x: to_coord(x),
            y: to_coord(y),
            run: to_coord(run),
            insertion: is_insertion,
            prev,
        });
        StepKey(key)
    }

    /// Mark every edit on the path ending at `(end_x, end_y)`.
    ///
    /// Coordinates are local to the diffed ranges; `start1`/`start2` shift
    /// them into marker positions. Diagonal runs stay unmarked. Setting bits
    /// is idempotent, so applying the same path twice is harmless.
    pub fn apply_changes(
        &self,
        end_x: usize,
        end_y: usize,
        start1: usize,
        start2: usize,
        markers: &mut ChangeMarkers,
    ) {
        let Some(mut key) = self.find_end(end_x, end_y) else {
            assert!(
                end_x == 0 && end_y == 0,
                "no path ends at ({end_x}, {end_y})"
            );
            return;
        };

        let mut x = end_x;
        let mut y = end_y;
        loop {
            let step = self.steps[key.0 as usize];
            debug_assert_eq!((step.x as usize, step.y as usize), (x, y));
            x -= step.run as usize;
            y -= step.run as usize;

            if step.prev.is_none() {
                assert!(x == 0 && y == 0, "path start at ({x}, {y}) is not the origin");
                return;
            }

            if step.insertion {
                y -= 1;
                markers.second.set(start2 + y);
            } else {
                x -= 1;
                markers.first.set(start1 + x);
            }
            key = step.prev;
        }
    }

    /// Most recent step ending at `(x, y)`.
    fn find_end(&self, x: usize, y: usize) -> Option<StepKey> {
        self.steps
            .iter()
            .rposition(|s| s.x as usize == x && s.y as usize == y)
            .map(|i| StepKey(i as u32))
    }
}

#[inline]
fn to_coord(value: usize) -> u32 {
    u32::try_from(value).expect("edit graph coordinate exceeds u32")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_only_path_marks_nothing() {
        let mut paths = LinkedDiffPaths::new();
        paths.encode_step(3, 3, 3, false, StepKey::NONE);

        let mut markers = ChangeMarkers::new(3, 3);
        paths.apply_changes(3, 3, 0, 0, &mut markers);
        assert!(markers.is_empty());
    }

    #[test]
    fn test_origin_without_steps() {
        let paths = LinkedDiffPaths::new();
        let mut markers = ChangeMarkers::new(0, 0);
        paths.apply_changes(0, 0, 0, 0, &mut markers);
        assert!(markers.is_empty());
    }

    #[test]
    fn test_insert_and_delete_are_marked() {
        // first = [a, b, c], second = [a, x, c]
        let mut paths = LinkedDiffPaths::new();
        let start = paths.encode_step(1, 1, 1, false, StepKey::NONE);
        let del = paths.encode_step(2, 1, 0, false, start);
        let ins = paths.encode_step(3, 3, 1, true, del);
        assert_eq!(ins.as_raw(), 2);

        let mut markers = ChangeMarkers::new(3, 3);
        paths.apply_changes(3, 3, 0, 0, &mut markers);
        assert_eq!(markers.first.ones().collect::<Vec<_>>(), vec![1]);
        assert_eq!(markers.second.ones().collect::<Vec<_>>(), vec![1]);

        // Idempotent
        paths.apply_changes(3, 3, 0, 0, &mut markers);
        assert_eq!(markers.edit_count(), 2);
    }

    #[test]
    fn test_offsets_shift_markers() {
        let mut paths = LinkedDiffPaths::new();
        let start = paths.encode_step(0, 0, 0, false, StepKey::NONE);
        paths.encode_step(1, 0, 0, false, start);

        let mut markers = ChangeMarkers::new(5, 5);
        paths.apply_changes(1, 0, 4, 2, &mut markers);
        assert_eq!(markers.first.ones().collect::<Vec<_>>(), vec![4]);
        assert!(markers.second.ones().next().is_none());
    }

    #[test]
    #[should_panic(expected = "no path ends")]
    fn test_missing_end_panics() {
        let paths = LinkedDiffPaths::new();
        let mut markers = ChangeMarkers::new(2, 2);
        paths.apply_changes(2, 2, 0, 0, &mut markers);
    }
}
