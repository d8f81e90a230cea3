//! Change scripts: the flat output of a sequence diff.
//!
//! A [`ChangeList`] is a singly linked list of [`Change`] records in strictly
//! increasing position order, stored as an index-addressed arena. Each record
//! describes one run where the sequences differ; everything between records
//! is equal.
//!
//! ```text
//! first:  a b [c d] e f [ ] g
//! second: a b [x  ] e f [y] g
//!              ^ Change { line0: 2, line1: 2, deleted: 2, inserted: 1 }
//!                        ^ Change { line0: 6, line1: 5, deleted: 0, inserted: 1 }
//! ```

use std::ops::Deref;

use crate::markers::ChangeMarkers;

/// Receiver of the equal/change runs of a diff, in order.
pub trait LcsBuilder {
    /// `length` elements are equal on both sides.
    fn add_equal(&mut self, length: usize);
    /// `deleted` elements of the first sequence are replaced by `inserted`
    /// elements of the second.
    fn add_change(&mut self, deleted: usize, inserted: usize);
}

/// One run of differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Change {
    /// Start of the run in the first sequence
    pub line0: usize,
    /// Start of the run in the second sequence
    pub line1: usize,
    /// Number of elements of the first sequence in the run
    pub deleted: usize,
    /// Number of elements of the second sequence in the run
    pub inserted: usize,
}

impl Change {
    pub fn new(line0: usize, line1: usize, deleted: usize, inserted: usize) -> Self {
        Self {
            line0,
            line1,
            deleted,
            inserted,
        }
    }

    /// End of the run in the first sequence (exclusive).
    #[inline]
    pub fn end0(&self) -> usize {
        self.line0 + self.deleted
    }

    /// End of the run in the second sequence (exclusive).
    #[inline]
    pub fn end1(&self) -> usize {
        self.line1 + self.inserted
    }
}

/// Linked list of changes; empty when the sequences are identical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeList {
    changes: Vec<Change>,
}

impl ChangeList {
    /// List with no changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Head of the list, `None` when the sequences are identical.
    pub fn first(&self) -> Option<ChangeRef<'_>> {
        self.at(0)
    }

    fn at(&self, index: usize) -> Option<ChangeRef<'_>> {
        (index < self.changes.len()).then_some(ChangeRef { list: self, index })
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[Change] {
        &self.changes
    }

    /// Marker sets over sequences of the given lengths.
    pub fn markers(&self, len1: usize, len2: usize) -> ChangeMarkers {
        let mut markers = ChangeMarkers::new(len1, len2);
        for change in &self.changes {
            markers.mark_ranges(change.line0, change.deleted, change.line1, change.inserted);
        }
        markers
    }

    /// Total number of changed elements on both sides.
    pub fn edit_count(&self) -> usize {
        self.changes.iter().map(|c| c.deleted + c.inserted).sum()
    }
}

impl<'a> IntoIterator for &'a ChangeList {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Cursor on one record of a [`ChangeList`].
#[derive(Debug, Clone, Copy)]
pub struct ChangeRef<'a> {
    list: &'a ChangeList,
    index: usize,
}

impl<'a> ChangeRef<'a> {
    /// Next record, `None` at the end of the list.
    pub fn link(&self) -> Option<ChangeRef<'a>> {
        self.list.at(self.index + 1)
    }

    /// The record itself, detached from the list.
    pub fn change(&self) -> Change {
        self.list.changes[self.index]
    }
}

impl Deref for ChangeRef<'_> {
    type Target = Change;

    fn deref(&self) -> &Change {
        &self.list.changes[self.index]
    }
}

/// Builds a coalesced [`ChangeList`] from [`LcsBuilder`] callbacks.
#[derive(Debug, Default)]
pub struct ChangeBuilder {
    index1: usize,
    index2: usize,
    changes: Vec<Change>,
}

impl ChangeBuilder {
    /// Builder whose positions start after a common prefix of `start_shift`
    /// elements.
    pub fn new(start_shift: usize) -> Self {
        Self {
            index1: start_shift,
            index2: start_shift,
            changes: Vec::new(),
        }
    }

    pub fn finish(self) -> ChangeList {
        ChangeList {
            changes: self.changes,
        }
    }

    fn skip(&mut self, first: usize, second: usize) {
        self.index1 += first;
        self.index2 += second;
    }
}

impl LcsBuilder for ChangeBuilder {
    fn add_equal(&mut self, length: usize) {
        self.skip(length, length);
    }

    fn add_change(&mut self, deleted: usize, inserted: usize) {
        if deleted == 0 && inserted == 0 {
            return;
        }
        match self.changes.last_mut() {
            // No equal run since the last change: extend it
            Some(last) if last.end0() == self.index1 && last.end1() == self.index2 => {
                last.deleted += deleted;
                last.inserted += inserted;
            }
            _ => self
                .changes
                .push(Change::new(self.index1, self.index2, deleted, inserted)),
        }
        self.skip(deleted, inserted);
    }
}

/// Position in the second sequence of `line` from the first, or `None` if
/// the line was deleted.
pub fn translate_line(changes: &ChangeList, line: usize) -> Option<usize> {
    let mut shift: isize = 0;
    for change in changes {
        if line < change.line0 {
            break;
        }
        if line < change.end0() {
            return None;
        }
        shift += change.inserted as isize - change.deleted as isize;
    }
    Some((line as isize + shift) as usize)
}
