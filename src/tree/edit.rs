//! Recorded tree edit events.

use super::TreeChangeBuilder;

/// One structural edit, as passed to a [`TreeChangeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEdit<O, N> {
    /// `old` and its subtree were replaced by `new`.
    Replaced { old: O, new: N },
    /// `child` was removed from `parent`.
    Deleted { parent: O, child: O },
    /// `child` was inserted into `parent` at `position`.
    Inserted { parent: O, child: N, position: usize },
}

impl<O, N> TreeEdit<O, N> {
    /// The old node the edit applies to.
    pub fn target(&self) -> &O {
        match self {
            Self::Replaced { old, .. } => old,
            Self::Deleted { parent, .. } | Self::Inserted { parent, .. } => parent,
        }
    }
}

/// Records every event in order.
impl<O, N> TreeChangeBuilder<O, N> for Vec<TreeEdit<O, N>> {
    fn node_replaced(&mut self, old: O, new: N) {
        self.push(TreeEdit::Replaced { old, new });
    }

    fn node_deleted(&mut self, parent: O, child: O) {
        self.push(TreeEdit::Deleted { parent, child });
    }

    fn node_inserted(&mut self, parent: O, child: N, position: usize) {
        self.push(TreeEdit::Inserted {
            parent,
            child,
            position,
        });
    }
}
