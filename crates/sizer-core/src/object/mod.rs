//! Decoded representations of the four object kinds the engine aggregates over, plus the
//! per-object size/shape aggregates `spec.md` §3 defines.

pub mod commit;
pub mod tag;
pub mod tree;

pub use commit::parse_commit;
pub use tag::parse_tag;
pub use tree::{parse_tree, EntryKind, TreeEntry};

use crate::counter::{Count32, Count64};
use serde::Serialize;

/// `{size: counter32}` — a blob's size is its entire aggregate; it has no dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlobSize {
    pub size: Count32,
}

/// The aggregate shape of a tree: maxima over descendant paths, additive expanded counts,
/// and an additive total blob size. `expanded_tree_count` is initialized to 1 (the tree
/// itself) before any descendant is folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeSize {
    pub max_path_depth: Count32,
    pub max_path_length: Count32,
    /// Direct entries in this tree's own body — not the cumulative count across the
    /// expanded subtree. This is what `MaxTreeEntries` reports.
    pub entry_count: Count32,
    pub expanded_tree_count: Count32,
    pub expanded_blob_count: Count32,
    pub expanded_link_count: Count32,
    pub expanded_submodule_count: Count32,
    pub expanded_blob_size: Count64,
}

impl Default for TreeSize {
    fn default() -> Self {
        TreeSize {
            max_path_depth: Count32::ZERO,
            max_path_length: Count32::ZERO,
            entry_count: Count32::ZERO,
            expanded_tree_count: Count32::new(1),
            expanded_blob_count: Count32::ZERO,
            expanded_link_count: Count32::ZERO,
            expanded_submodule_count: Count32::ZERO,
            expanded_blob_size: Count64::ZERO,
        }
    }
}

impl TreeSize {
    /// Fold a named descendant's size into `self`. See `spec.md` §4.4 "Fold operation".
    pub fn add_descendant_tree(&mut self, name_len: usize, child: &TreeSize) {
        self.entry_count.increment(1);
        self.max_path_depth
            .adjust_max_if_necessary(child.max_path_depth.get() + 1);
        let candidate_len = if child.max_path_length.get() > 0 {
            name_len as u32 + 1 + child.max_path_length.get()
        } else {
            name_len as u32
        };
        self.max_path_length.adjust_max_if_necessary(candidate_len);

        self.expanded_tree_count.increment(child.expanded_tree_count.get());
        self.expanded_blob_count.increment(child.expanded_blob_count.get());
        self.expanded_link_count.increment(child.expanded_link_count.get());
        self.expanded_submodule_count
            .increment(child.expanded_submodule_count.get());
        self.expanded_blob_size.increment(child.expanded_blob_size.get());
    }

    /// Fold in a direct blob entry named `name_len` bytes long, sized `blob_size`.
    pub fn add_blob(&mut self, name_len: usize, blob_size: Count32) {
        self.entry_count.increment(1);
        self.max_path_depth.adjust_max_if_necessary(1);
        self.max_path_length.adjust_max_if_necessary(name_len as u32);
        self.expanded_blob_count.increment(1);
        self.expanded_blob_size.increment(blob_size.get() as u64);
    }

    pub fn add_submodule(&mut self) {
        self.entry_count.increment(1);
        self.expanded_submodule_count.increment(1);
    }

    pub fn add_symlink(&mut self, name_len: usize) {
        self.entry_count.increment(1);
        self.max_path_depth.adjust_max_if_necessary(1);
        self.max_path_length.adjust_max_if_necessary(name_len as u32);
        self.expanded_link_count.increment(1);
    }
}

/// The height of the ancestor DAG rooted at this commit, inclusive of the commit
/// itself, plus its direct parent count — carried alongside `max_ancestor_depth` so the
/// history-wide `MaxParentCount` metric has a per-commit value to fold in without a
/// second pass over commit bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitSize {
    pub max_ancestor_depth: Count32,
    pub parent_count: Count32,
}

/// `{tag_depth: counter32}` — length of the chain of annotated-tag-to-annotated-tag
/// references ending at a non-tag object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagSize {
    pub tag_depth: Count32,
}
