//! Tree size aggregation.
//!
//! A tree's aggregate depends on the aggregates of every subtree it references. The
//! two-phase walk (`spec.md` §6) retrieves tree bodies in an order chosen to have most
//! children already resolved by the time their parent arrives, but doesn't guarantee
//! it — so a tree whose child isn't resolved yet is parked as [`TreeState::Pending`]
//! and the child registers it as a listener. When the child resolves, it notifies its
//! listeners, which may cascade into finalizing grandparents in the same call.

use std::collections::HashMap;

use gix_hash::ObjectId;

use crate::graph::blob::BlobTable;
use crate::object::tree::{EntryKind, TreeEntry};
use crate::object::{BlobSize, TreeSize};
use crate::path_resolver::{Placeholder, PathResolver};

struct PendingFold {
    size: TreeSize,
    waiting_on: usize,
    listeners: Vec<(ObjectId, usize)>,
}

enum TreeState {
    /// Referenced by a parent before its own body has been processed.
    Awaited { listeners: Vec<(ObjectId, usize)> },
    Pending(PendingFold),
    Resolved(TreeSize),
}

#[derive(Default)]
pub struct TreeGraph {
    states: HashMap<ObjectId, TreeState>,
    /// Trees waiting on a direct blob entry whose body hasn't arrived yet, keyed by
    /// the blob's OID. Blobs carry no ordering guarantee relative to trees (`spec.md`
    /// §6 only orders the tree/commit/tag buckets against each other), so a tree can
    /// just as easily be processed before one of its own blob entries as after.
    blob_waiters: HashMap<ObjectId, Vec<(ObjectId, usize)>>,
}

impl TreeGraph {
    pub fn new() -> Self {
        TreeGraph::default()
    }

    pub fn get_resolved(&self, oid: &ObjectId) -> Option<TreeSize> {
        match self.states.get(oid) {
            Some(TreeState::Resolved(size)) => Some(*size),
            _ => None,
        }
    }

    fn entry_mut(&mut self, oid: ObjectId) -> &mut TreeState {
        self.states
            .entry(oid)
            .or_insert_with(|| TreeState::Awaited { listeners: Vec::new() })
    }

    /// Mark `oid` as referenced (from the header-enumeration pass), creating an
    /// `Awaited` placeholder if this is the first time it's been seen. Lets the
    /// caller distinguish "not seen yet" from "never referenced at all".
    pub fn mark_referenced(&mut self, oid: ObjectId) {
        self.entry_mut(oid);
    }

    /// Process a tree body: fold in every entry that's already resolvable, and
    /// register as a listener on every one that isn't. Returns the set of trees
    /// (this one, and any transitive listeners) that became resolved as a result,
    /// paired with their final size, in the order they resolved.
    pub fn begin_tree(
        &mut self,
        oid: ObjectId,
        entries: &[TreeEntry],
        blobs: &BlobTable,
        resolver: &mut dyn PathResolver,
        parent_placeholder: Option<Placeholder>,
    ) -> Vec<(ObjectId, TreeSize)> {
        let mut fold = PendingFold {
            size: TreeSize::default(),
            waiting_on: 0,
            listeners: match self.states.remove(&oid) {
                Some(TreeState::Awaited { listeners }) => listeners,
                Some(other) => {
                    // Already processed (shouldn't happen for a well-formed stream); put it
                    // back untouched and bail rather than double-count.
                    self.states.insert(oid, other);
                    return Vec::new();
                }
                None => Vec::new(),
            },
        };

        for entry in entries {
            let name_len = entry.name.len();
            resolver.record_name(parent_placeholder, &entry.name, entry.oid);
            match entry.kind {
                EntryKind::Blob => match blobs.get(&entry.oid) {
                    Some(size) => fold.size.add_blob(name_len, size.size),
                    None => {
                        self.blob_waiters.entry(entry.oid).or_default().push((oid, name_len));
                        fold.waiting_on += 1;
                    }
                },
                EntryKind::Symlink => fold.size.add_symlink(name_len),
                EntryKind::Submodule => fold.size.add_submodule(),
                EntryKind::Tree => match self.entry_mut(entry.oid) {
                    TreeState::Resolved(child) => {
                        let child = *child;
                        fold.size.add_descendant_tree(name_len, &child);
                    }
                    TreeState::Awaited { listeners } => {
                        listeners.push((oid, name_len));
                        fold.waiting_on += 1;
                    }
                    TreeState::Pending(pending) => {
                        pending.listeners.push((oid, name_len));
                        fold.waiting_on += 1;
                    }
                },
            }
        }

        let mut finalized = Vec::new();
        if fold.waiting_on == 0 {
            let size = fold.size;
            self.finalize(oid, size, &mut finalized);
        } else {
            self.states.insert(oid, TreeState::Pending(fold));
        }
        finalized
    }

    fn finalize(&mut self, oid: ObjectId, size: TreeSize, finalized: &mut Vec<(ObjectId, TreeSize)>) {
        let listeners = match self.states.remove(&oid) {
            Some(TreeState::Pending(p)) => p.listeners,
            Some(TreeState::Awaited { listeners }) => listeners,
            _ => Vec::new(),
        };
        self.states.insert(oid, TreeState::Resolved(size));
        finalized.push((oid, size));

        for (listener_oid, name_len) in listeners {
            let Some(TreeState::Pending(pending)) = self.states.get_mut(&listener_oid) else {
                continue;
            };
            pending.size.add_descendant_tree(name_len, &size);
            pending.waiting_on -= 1;
            if pending.waiting_on == 0 {
                let TreeState::Pending(pending) = self.states.remove(&listener_oid).unwrap() else {
                    unreachable!()
                };
                self.finalize(listener_oid, pending.size, finalized);
            }
        }
    }

    /// A blob body has just arrived; fold it into every tree that was waiting on it
    /// as a direct entry, cascading into grandparents the same way `finalize` does.
    pub fn resolve_blob(&mut self, oid: ObjectId, size: BlobSize) -> Vec<(ObjectId, TreeSize)> {
        let mut finalized = Vec::new();
        let Some(waiters) = self.blob_waiters.remove(&oid) else {
            return finalized;
        };
        for (listener_oid, name_len) in waiters {
            let Some(TreeState::Pending(pending)) = self.states.get_mut(&listener_oid) else {
                continue;
            };
            pending.size.add_blob(name_len, size.size);
            pending.waiting_on -= 1;
            if pending.waiting_on == 0 {
                let TreeState::Pending(pending) = self.states.remove(&listener_oid).unwrap() else {
                    unreachable!()
                };
                self.finalize(listener_oid, pending.size, &mut finalized);
            }
        }
        finalized
    }

    /// Records still `Awaited`/`Pending` — nonzero after a complete walk means some
    /// referenced tree or blob body never arrived, which `spec.md` §8 treats as an
    /// engine bug rather than a reportable condition.
    pub fn unresolved_count(&self) -> usize {
        self.states.values().filter(|s| !matches!(s, TreeState::Resolved(_))).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::BlobSize;
    use crate::path_resolver::NullResolver;
    use pretty_assertions::assert_eq;

    fn oid(byte: u8) -> ObjectId {
        let mut bytes = [0u8; 20];
        bytes[19] = byte;
        ObjectId::from_bytes_or_panic(&bytes)
    }

    fn entry(name: &str, kind: EntryKind, oid: ObjectId) -> TreeEntry {
        TreeEntry {
            name: bstr::BString::from(name),
            kind,
            oid,
        }
    }

    #[test]
    fn resolves_immediately_when_all_children_known() {
        let mut graph = TreeGraph::new();
        let mut blobs = BlobTable::new();
        let mut resolver = NullResolver::new();
        let blob_oid = oid(1);
        blobs.insert(blob_oid, BlobSize { size: crate::counter::Count32::new(42) });

        let entries = vec![entry("file.txt", EntryKind::Blob, blob_oid)];
        let finalized = graph.begin_tree(oid(2), &entries, &blobs, &mut resolver, None);

        assert_eq!(finalized.len(), 1);
        assert_eq!(finalized[0].1.expanded_blob_count.get(), 1);
        assert_eq!(finalized[0].1.expanded_blob_size.get(), 42);
    }

    #[test]
    fn tree_processed_before_its_own_blob_defers_then_resolves() {
        let mut graph = TreeGraph::new();
        let blobs = BlobTable::new();
        let mut resolver = NullResolver::new();

        let blob_oid = oid(1);
        let tree_oid = oid(2);
        let entries = vec![entry("file.txt", EntryKind::Blob, blob_oid)];

        // the tree body arrives first; its blob entry isn't in `blobs` yet.
        let finalized = graph.begin_tree(tree_oid, &entries, &blobs, &mut resolver, None);
        assert!(finalized.is_empty(), "tree should still be pending on its blob");
        assert_eq!(graph.unresolved_count(), 1);

        let finalized = graph.resolve_blob(blob_oid, BlobSize { size: crate::counter::Count32::new(11) });
        assert_eq!(finalized.len(), 1);
        assert_eq!(finalized[0].0, tree_oid);
        assert_eq!(finalized[0].1.expanded_blob_count.get(), 1);
        assert_eq!(finalized[0].1.expanded_blob_size.get(), 11);
        assert_eq!(graph.unresolved_count(), 0);
    }

    #[test]
    fn defers_then_cascades_when_child_resolves_later() {
        let mut graph = TreeGraph::new();
        let blobs = BlobTable::new();
        let mut resolver = NullResolver::new();

        let child = oid(1);
        let parent = oid(2);
        graph.mark_referenced(child);

        let parent_entries = vec![entry("subdir", EntryKind::Tree, child)];
        let finalized = graph.begin_tree(parent, &parent_entries, &blobs, &mut resolver, None);
        assert!(finalized.is_empty(), "parent should still be pending");

        let child_entries: Vec<TreeEntry> = Vec::new();
        let finalized = graph.begin_tree(child, &child_entries, &blobs, &mut resolver, None);

        assert_eq!(finalized.len(), 2);
        assert_eq!(finalized[0].0, child);
        assert_eq!(finalized[1].0, parent);
        assert_eq!(finalized[1].1.expanded_tree_count.get(), 2);
    }
}
