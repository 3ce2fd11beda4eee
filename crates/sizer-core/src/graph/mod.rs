//! The dependency-tracked aggregation graph.
//!
//! Five independently mutex-guarded zones — blob, tree, commit, tag, history — let the
//! driver's reader and writer feeder threads (`spec.md` §6) and the CPU-bound fold work
//! proceed without a single global lock serializing everything. Because folding a tag can
//! touch history, and folding a tree can touch history too, any code path that needs more
//! than one zone at once must acquire them in the fixed order `blob < tree < tag <
//! history` to avoid deadlock; [`AggregationGraph::fold_blob`]/[`fold_tree`]/[`fold_tag`]
//! are written to respect it (blob, tree, or tag lock first, history lock second, each
//! released before the next is taken — no two zone locks are ever held at once).

pub mod blob;
pub mod commit;
pub mod history;
pub mod tag;
pub mod tree;

use std::sync::Mutex;

use gix_hash::ObjectId;

use crate::object::{BlobSize, CommitHeader, TagHeader, TreeEntry};
use crate::oid::ObjectKind;
use crate::path_resolver::{Placeholder, PathResolver};

pub use blob::BlobTable;
pub use commit::CommitGraph;
pub use history::{HistorySize, HistorySnapshot, Record, RefGroup};
pub use tag::TagGraph;
pub use tree::TreeGraph;

/// The aggregation graph. One instance is shared (behind an `Arc`) across the driver
/// and its feeder threads for the duration of a single walk.
pub struct AggregationGraph {
    blobs: Mutex<BlobTable>,
    trees: Mutex<TreeGraph>,
    commits: Mutex<CommitGraph>,
    tags: Mutex<TagGraph>,
    history: Mutex<HistorySize>,
}

impl Default for AggregationGraph {
    fn default() -> Self {
        AggregationGraph {
            blobs: Mutex::new(BlobTable::new()),
            trees: Mutex::new(TreeGraph::new()),
            commits: Mutex::new(CommitGraph::new()),
            tags: Mutex::new(TagGraph::new()),
            history: Mutex::new(HistorySize::new()),
        }
    }
}

impl AggregationGraph {
    pub fn new() -> Self {
        AggregationGraph::default()
    }

    pub fn mark_tree_referenced(&self, oid: ObjectId) {
        self.trees.lock().unwrap().mark_referenced(oid);
    }

    pub fn mark_commit_referenced(&self, oid: ObjectId) {
        self.commits.lock().unwrap().mark_referenced(oid);
    }

    pub fn mark_tag_referenced(&self, oid: ObjectId) {
        self.tags.lock().unwrap().mark_referenced(oid);
    }

    /// Fold a blob body in. The blob itself has no dependencies and is recorded into
    /// history right away, but a tree whose entry pointed at this blob before the
    /// blob's own body arrived may have been waiting on it (blobs and trees are
    /// retrieved in whatever order the header pass reported them, with no ordering
    /// guarantee between the two buckets) — `placeholder_of` resolves a path for any
    /// such tree this unblocks, the same as `fold_tree`'s own finalized trees.
    pub fn fold_blob(
        &self,
        oid: ObjectId,
        placeholder: Option<Placeholder>,
        size: BlobSize,
        placeholder_of: impl Fn(ObjectId) -> Option<Placeholder>,
    ) {
        self.blobs.lock().unwrap().insert(oid, size);
        self.history.lock().unwrap().record_blob(oid, placeholder, size.size);

        let finalized = self.trees.lock().unwrap().resolve_blob(oid, size);
        if finalized.is_empty() {
            return;
        }
        let mut history = self.history.lock().unwrap();
        for (finalized_oid, tree_size) in &finalized {
            history.record_tree(*finalized_oid, placeholder_of(*finalized_oid), tree_size);
        }
    }

    pub fn blob_size(&self, oid: &ObjectId) -> Option<BlobSize> {
        self.blobs.lock().unwrap().get(oid)
    }

    /// Fold a tree body in, resolving any listeners this unblocks. `placeholder_of`
    /// is consulted once per finalized tree to record a path for the history table.
    pub fn fold_tree(
        &self,
        oid: ObjectId,
        entries: &[TreeEntry],
        resolver: &mut dyn PathResolver,
        parent_placeholder: Option<Placeholder>,
        placeholder_of: impl Fn(ObjectId) -> Option<Placeholder>,
    ) {
        let finalized = {
            let blobs = self.blobs.lock().unwrap();
            let mut trees = self.trees.lock().unwrap();
            trees.begin_tree(oid, entries, &blobs, resolver, parent_placeholder)
        };
        if finalized.is_empty() {
            return;
        }
        let mut history = self.history.lock().unwrap();
        for (finalized_oid, size) in &finalized {
            history.record_tree(*finalized_oid, placeholder_of(*finalized_oid), size);
        }
    }

    pub fn tree_size(&self, oid: &ObjectId) -> Option<crate::object::TreeSize> {
        self.trees.lock().unwrap().get_resolved(oid)
    }

    pub fn fold_commit(
        &self,
        oid: ObjectId,
        header: &CommitHeader,
        placeholder_of: impl Fn(ObjectId) -> Option<Placeholder>,
    ) {
        let finalized = self.commits.lock().unwrap().begin_commit(oid, &header.parents);
        if finalized.is_empty() {
            return;
        }
        let mut history = self.history.lock().unwrap();
        for (finalized_oid, size) in &finalized {
            history.record_commit(*finalized_oid, placeholder_of(*finalized_oid), size);
        }
    }

    pub fn commit_size(&self, oid: &ObjectId) -> Option<crate::object::CommitSize> {
        self.commits.lock().unwrap().get_resolved(oid)
    }

    pub fn fold_tag(
        &self,
        oid: ObjectId,
        header: &TagHeader,
        placeholder_of: impl Fn(ObjectId) -> Option<Placeholder>,
    ) {
        let finalized = {
            let mut tags = self.tags.lock().unwrap();
            tags.begin_tag(oid, header.target, header.target_kind)
        };
        if finalized.is_empty() {
            return;
        }
        let mut history = self.history.lock().unwrap();
        for (finalized_oid, size) in &finalized {
            history.record_tag(*finalized_oid, placeholder_of(*finalized_oid), size);
        }
    }

    pub fn tag_size(&self, oid: &ObjectId) -> Option<crate::object::TagSize> {
        self.tags.lock().unwrap().get_resolved(oid)
    }

    /// An object store can report an object's type as `Missing`; this still needs a
    /// way to be folded into bookkeeping as "known to be absent" rather than left
    /// perpetually pending. Treated as a protocol-level concern upstream in `walk`,
    /// not here — the graph has no notion of "missing", only of kinds it understands.
    pub fn expect_known_kind(kind: ObjectKind) -> crate::error::Result<()> {
        if kind == ObjectKind::Missing {
            Err(crate::error::SizerError::Protocol(
                "object store reported a missing object".into(),
            ))
        } else {
            Ok(())
        }
    }

    /// Called once per walked reference after the scan completes, per `spec.md` §4.5's
    /// finalization step.
    pub fn record_reference(&self, group: RefGroup) {
        self.history.lock().unwrap().record_reference(group);
    }

    /// Residual tree records still `Pending`/`Awaited` once the walk claims to be
    /// done — should always be zero; a nonzero count is the invariant violation
    /// `spec.md` §8 calls out.
    pub fn unresolved_tree_count(&self) -> usize {
        self.trees.lock().unwrap().unresolved_count()
    }

    /// Residual tag records still `Pending`/`Awaited` once the walk claims to be done.
    pub fn unresolved_tag_count(&self) -> usize {
        self.tags.lock().unwrap().unresolved_count()
    }

    pub fn snapshot_history(&self, resolver: &mut dyn PathResolver) -> HistorySnapshot {
        HistorySnapshot::from_history(&self.history.lock().unwrap(), resolver)
    }
}
