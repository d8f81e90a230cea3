//! Ordered Tree Diff
//!
//! Generalizes the sequence diff to trees: the children of every matched
//! node pair are diffed as a sequence, and matched children are diffed
//! recursively.
//!
//! # Architecture: Capabilities
//!
//! ```text
//! TreeStructure (old)  ──┐
//! TreeStructure (new)  ──┼──▶ diff_trees ──▶ TreeChangeBuilder
//! ShallowNodeComparator ─┘        │
//!                                 ▼
//!                      diff::build_changes_with_config
//! ```
//!
//! Nodes are opaque handles. The differ only reads children, hash codes and
//! comparator answers; it never stores or mutates a tree.
//!
//! # Algorithm
//!
//! Per node pair:
//!
//! ```text
//! Unvisited ──▶ Compared ──┬──▶ Replaced   types differ, or a limit is hit
//!                          ├──▶ Recursed   events emitted below the pair
//!                          └──▶ Matched    children processed, no events
//! ```
//!
//! 1. Different types: `node_replaced`
//! 2. Both childless: matched if deeply equal, replaced otherwise
//! 3. Children coded by hash and diffed as sequences
//! 4. Unmatched children become `node_deleted` / `node_inserted`
//! 5. Matched children recurse unless the comparator proves them equal
//!
//! A hash match alone never resolves a pair. It only lines the children up
//! for the sequence diff; `deep_equal` decides whether to descend.
//!
//! # Replay Order
//!
//! Within one change record all deletions come before the insertions, and
//! `position` is the index in the new child list. Applying the events in
//! order to the old tree therefore yields the shape of the new tree.

mod edit;

pub use edit::TreeEdit;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::config::DiffConfig;
use crate::diff::build_changes_with_config;

/// Default maximum depth for recursive diffing before fallback to replace.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 500;

/// Default difference in child counts above which a parent is replaced
/// instead of diffed.
pub const DEFAULT_CHANGE_PARENT_THRESHOLD: usize = 20;

/// Children buffer returned by [`TreeStructure::children`].
pub type Children<N> = SmallVec<[N; 8]>;

// =============================================================================
// Capabilities
// =============================================================================

/// Read access to a tree.
pub trait TreeStructure {
    /// Node handle. Cloned into events, never mutated.
    type Node: Clone;

    /// Children of `node`, in order.
    fn children(&self, node: &Self::Node) -> Children<Self::Node>;

    /// Parent of `node`, `None` for the root.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Hash of the subtree rooted at `node`.
    ///
    /// Must agree between the old and the new tree for nodes the comparator
    /// considers equal.
    fn hash_code(&self, node: &Self::Node) -> u64;
}

/// Answer of a comparison that may be too expensive to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreeState {
    Equal,
    Different,
    Unsure,
}

impl From<bool> for ThreeState {
    fn from(equal: bool) -> Self {
        if equal { Self::Equal } else { Self::Different }
    }
}

/// Shallow comparison of an old node against a new one.
pub trait ShallowNodeComparator<O, N> {
    /// Nodes have the same type; a pair of different types is replaced.
    fn types_equal(&self, old: &O, new: &N) -> bool;

    /// Nodes have the same subtree hash.
    fn hash_codes_equal(&self, old: &O, new: &N) -> bool;

    /// Whether the subtrees are equal. `Unsure` makes the differ descend.
    fn deep_equal(&self, old: &O, new: &N) -> ThreeState;
}

/// Receiver of structural edit events.
pub trait TreeChangeBuilder<O, N> {
    /// `old` and its subtree are replaced by `new`.
    fn node_replaced(&mut self, old: O, new: N);

    /// `child` is removed from `parent`.
    fn node_deleted(&mut self, parent: O, child: O);

    /// `child` is inserted into `parent` at `position` of the new child list.
    fn node_inserted(&mut self, parent: O, child: N, position: usize);
}

// =============================================================================
// Configuration and Results
// =============================================================================

/// Configuration for tree diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeDiffConfig {
    /// Sequence diff used for every children list.
    pub diff: DiffConfig,
    /// Maximum recursion depth before fallback to replace.
    /// Default: 500
    pub max_depth: usize,
    /// Child count difference above which the parent is replaced.
    /// Default: 20
    pub change_parent_threshold: usize,
}

impl Default for TreeDiffConfig {
    fn default() -> Self {
        Self {
            diff: DiffConfig::default(),
            max_depth: DEFAULT_MAX_TREE_DEPTH,
            change_parent_threshold: DEFAULT_CHANGE_PARENT_THRESHOLD,
        }
    }
}

impl TreeDiffConfig {
    /// Create config with custom limits.
    pub fn new(max_depth: usize, change_parent_threshold: usize) -> Self {
        Self {
            max_depth,
            change_parent_threshold,
            ..Self::default()
        }
    }

    /// Use `diff` for the children sequences.
    pub fn with_diff(mut self, diff: DiffConfig) -> Self {
        self.diff = diff;
        self
    }
}

/// Terminal state of a node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairState {
    /// Replaced as a whole, not descended.
    Replaced,
    /// Descended, with events emitted below.
    Recursed,
    /// Descended, nothing to do.
    #[default]
    Matched,
}

/// Statistics from tree diff operation
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct TreeDiffStats {
    /// Terminal state of the root pair
    pub root: PairState,
    /// Number of node pairs compared
    pub pairs_compared: usize,
    /// Number of matched pairs skipped as deeply equal
    pub pairs_skipped: usize,
    /// Number of nodes replaced
    pub nodes_replaced: usize,
    /// Number of nodes deleted
    pub nodes_deleted: usize,
    /// Number of nodes inserted
    pub nodes_inserted: usize,
    /// Number of parents replaced because a limit was hit
    pub fallbacks: usize,
}

impl TreeDiffStats {
    /// Number of events emitted.
    pub fn event_count(&self) -> usize {
        self.nodes_replaced + self.nodes_deleted + self.nodes_inserted
    }

    /// Check if any changes were detected
    pub fn has_changes(&self) -> bool {
        self.event_count() > 0
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Diff two trees with the default configuration.
///
/// # Example
///
/// ```
/// use tola_diff::tree::{Children, ThreeState};
/// use tola_diff::{diff_trees, ShallowNodeComparator, TreeEdit, TreeStructure};
///
/// /// Node `i` is `(label, children)`.
/// struct Tree(Vec<(char, Vec<usize>)>);
///
/// impl Tree {
///     fn label(&self, node: usize) -> char {
///         self.0[node].0
///     }
/// }
///
/// impl TreeStructure for Tree {
///     type Node = usize;
///
///     fn children(&self, node: &usize) -> Children<usize> {
///         self.0[*node].1.iter().copied().collect()
///     }
///
///     fn parent(&self, node: &usize) -> Option<usize> {
///         self.0.iter().position(|(_, children)| children.contains(node))
///     }
///
///     fn hash_code(&self, node: &usize) -> u64 {
///         u64::from(self.label(*node))
///     }
/// }
///
/// struct ByLabel<'a>(&'a Tree, &'a Tree);
///
/// impl ShallowNodeComparator<usize, usize> for ByLabel<'_> {
///     fn types_equal(&self, old: &usize, new: &usize) -> bool {
///         self.0.label(*old) == self.1.label(*new)
///     }
///
///     fn hash_codes_equal(&self, old: &usize, new: &usize) -> bool {
///         self.types_equal(old, new)
///     }
///
///     fn deep_equal(&self, _old: &usize, _new: &usize) -> ThreeState {
///         ThreeState::Unsure
///     }
/// }
///
/// // r(a, b) -> r(b)
/// let old = Tree(vec![('r', vec![1, 2]), ('a', vec![]), ('b', vec![])]);
/// let new = Tree(vec![('r', vec![1]), ('b', vec![])]);
///
/// let mut events: Vec<TreeEdit<usize, usize>> = Vec::new();
/// let stats = diff_trees(&old, &new, 0, 0, &ByLabel(&old, &new), &mut events);
///
/// assert_eq!(events, vec![TreeEdit::Deleted { parent: 0, child: 1 }]);
/// assert_eq!(stats.nodes_deleted, 1);
/// ```
pub fn diff_trees<TO, TN, C, B>(
    old_tree: &TO,
    new_tree: &TN,
    old_root: TO::Node,
    new_root: TN::Node,
    comparator: &C,
    builder: &mut B,
) -> TreeDiffStats
where
    TO: TreeStructure,
    TN: TreeStructure,
    C: ShallowNodeComparator<TO::Node, TN::Node>,
    B: TreeChangeBuilder<TO::Node, TN::Node>,
{
    diff_trees_with_config(
        old_tree,
        new_tree,
        old_root,
        new_root,
        comparator,
        builder,
        TreeDiffConfig::default(),
    )
}

/// Diff two trees with custom configuration.
///
/// Never fails: whenever a children list cannot be diffed within the
/// configured limits, its parent is replaced instead.
pub fn diff_trees_with_config<TO, TN, C, B>(
    old_tree: &TO,
    new_tree: &TN,
    old_root: TO::Node,
    new_root: TN::Node,
    comparator: &C,
    builder: &mut B,
    config: TreeDiffConfig,
) -> TreeDiffStats
where
    TO: TreeStructure,
    TN: TreeStructure,
    C: ShallowNodeComparator<TO::Node, TN::Node>,
    B: TreeChangeBuilder<TO::Node, TN::Node>,
{
    let mut ctx = TreeDiffContext {
        old_tree,
        new_tree,
        comparator,
        builder,
        config,
        stats: TreeDiffStats::default(),
    };
    let root = ctx.diff_pair(&old_root, &new_root, 0);
    ctx.stats.root = root;
    ctx.stats
}

// =============================================================================
// Internal Context
// =============================================================================

struct TreeDiffContext<'a, TO, TN, C, B> {
    old_tree: &'a TO,
    new_tree: &'a TN,
    comparator: &'a C,
    builder: &'a mut B,
    config: TreeDiffConfig,
    stats: TreeDiffStats,
}

impl<TO, TN, C, B> TreeDiffContext<'_, TO, TN, C, B>
where
    TO: TreeStructure,
    TN: TreeStructure,
    C: ShallowNodeComparator<TO::Node, TN::Node>,
    B: TreeChangeBuilder<TO::Node, TN::Node>,
{
    fn diff_pair(&mut self, old: &TO::Node, new: &TN::Node, depth: usize) -> PairState {
        self.stats.pairs_compared += 1;

        if !self.comparator.types_equal(old, new) {
            return self.replace(old, new);
        }

        let old_children = self.old_tree.children(old);
        let new_children = self.new_tree.children(new);

        if old_children.is_empty() && new_children.is_empty() {
            let equal = match self.comparator.deep_equal(old, new) {
                ThreeState::Equal => true,
                ThreeState::Unsure => self.comparator.hash_codes_equal(old, new),
                ThreeState::Different => false,
            };
            return if equal {
                PairState::Matched
            } else {
                self.replace(old, new)
            };
        }

        if depth > self.config.max_depth {
            tracing::debug!(depth, "tree too deep, replacing subtree");
            return self.fall_back(old, new);
        }
        let count_diff = old_children.len().abs_diff(new_children.len());
        if count_diff > self.config.change_parent_threshold {
            tracing::debug!(
                old = old_children.len(),
                new = new_children.len(),
                "child counts too far apart, replacing parent"
            );
            return self.fall_back(old, new);
        }

        let (codes1, codes2) = self.code_children(&old_children, &new_children);
        let changes = match build_changes_with_config(&codes1, &codes2, &self.config.diff) {
            Ok(changes) => changes,
            Err(err) => {
                tracing::debug!(%err, "children diff gave up, replacing parent");
                return self.fall_back(old, new);
            }
        };

        let events_before = self.stats.event_count();
        let mut next1 = 0;
        let mut next2 = 0;
        for change in &changes {
            self.diff_matched(
                &old_children[next1..change.line0],
                &new_children[next2..change.line1],
                depth,
            );
            for child in &old_children[change.line0..change.end0()] {
                self.builder.node_deleted(old.clone(), child.clone());
                self.stats.nodes_deleted += 1;
            }
            for position in change.line1..change.end1() {
                self.builder
                    .node_inserted(old.clone(), new_children[position].clone(), position);
                self.stats.nodes_inserted += 1;
            }
            next1 = change.end0();
            next2 = change.end1();
        }
        self.diff_matched(&old_children[next1..], &new_children[next2..], depth);

        if self.stats.event_count() > events_before {
            PairState::Recursed
        } else {
            PairState::Matched
        }
    }

    /// Resolve children the sequence diff lined up with each other.
    fn diff_matched(&mut self, old: &[TO::Node], new: &[TN::Node], depth: usize) {
        debug_assert_eq!(old.len(), new.len());
        for (old_child, new_child) in old.iter().zip(new) {
            let proven_equal = self.comparator.types_equal(old_child, new_child)
                && self.comparator.hash_codes_equal(old_child, new_child)
                && self.comparator.deep_equal(old_child, new_child) == ThreeState::Equal;
            if proven_equal {
                self.stats.pairs_skipped += 1;
            } else {
                self.diff_pair(old_child, new_child, depth + 1);
            }
        }
    }

    /// Integer codes for both children lists.
    ///
    /// Equal codes always mean the comparator agrees on type and hash. An old
    /// child's class is the set of same-hash new children it agrees with;
    /// old children with the same class share a code, and each new child
    /// takes the code of the first class it belongs to.
    fn code_children(&self, old: &[TO::Node], new: &[TN::Node]) -> (Vec<u32>, Vec<u32>) {
        let mut by_hash: FxHashMap<u64, SmallVec<[usize; 4]>> = FxHashMap::default();
        for (j, child) in new.iter().enumerate() {
            by_hash.entry(self.new_tree.hash_code(child)).or_default().push(j);
        }

        let mut classes: FxHashMap<SmallVec<[usize; 4]>, u32> = FxHashMap::default();
        let mut next_code = 0u32;
        let mut fresh = || {
            next_code += 1;
            next_code - 1
        };

        let mut codes1 = Vec::with_capacity(old.len());
        let mut codes2: Vec<Option<u32>> = vec![None; new.len()];
        for child in old {
            let agreeing: SmallVec<[usize; 4]> = by_hash
                .get(&self.old_tree.hash_code(child))
                .into_iter()
                .flatten()
                .copied()
                .filter(|&j| {
                    self.comparator.types_equal(child, &new[j])
                        && self.comparator.hash_codes_equal(child, &new[j])
                })
                .collect();
            if agreeing.is_empty() {
                codes1.push(fresh());
                continue;
            }

            let code = match classes.get(&agreeing) {
                Some(&code) => code,
                None => {
                    let code = fresh();
                    for &j in &agreeing {
                        codes2[j].get_or_insert(code);
                    }
                    classes.insert(agreeing, code);
                    code
                }
            };
            codes1.push(code);
        }

        let codes2 = codes2
            .into_iter()
            .map(|code| code.unwrap_or_else(&mut fresh))
            .collect();
        (codes1, codes2)
    }

    fn replace(&mut self, old: &TO::Node, new: &TN::Node) -> PairState {
        self.builder.node_replaced(old.clone(), new.clone());
        self.stats.nodes_replaced += 1;
        PairState::Replaced
    }

    fn fall_back(&mut self, old: &TO::Node, new: &TN::Node) -> PairState {
        self.stats.fallbacks += 1;
        self.replace(old, new)
    }
}

// =============================================================================
// Tests
// =============================================================================
