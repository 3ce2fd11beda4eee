//! The two-phase streaming walker.
//!
//! Phase one enumerates every object reachable from the walk's roots — a
//! `rev-list --objects`-style pass that reports each object's OID and kind but not its
//! body. Phase two retrieves bodies — a `cat-file --batch`-style pass — and folds each
//! one into the [`AggregationGraph`] as it arrives. Keeping the two passes separate
//! (rather than fetching a body the moment an OID is discovered) is what lets the
//! upstream collaborator order the retrieval pass to minimize outstanding dependencies:
//! trees reverse-chronologically, commits chronologically, tags in stream order
//! (`spec.md` §6). `sizer-core` trusts that ordering rather than re-deriving it —
//! the collaborator that produced it is in a much better position to know, since it
//! has access to commit timestamps and the object store's native layout.

pub mod cancel;
pub mod root;

use std::collections::HashMap;

use gix_hash::ObjectId;

use crate::error::{Result, SizerError};
use crate::graph::AggregationGraph;
use crate::object::{parse_commit, parse_tag, parse_tree, BlobSize};
use crate::oid::ObjectKind;
use crate::path_resolver::{Placeholder, PathResolver};

pub use cancel::CancellationToken;
pub use root::{DefaultRefGrouper, ReferenceRoot, RefGroup, RefGrouper, RootSource};

/// Enumerates the objects reachable from a set of root OIDs, without retrieving bodies.
/// Implemented in `sizer-cli` over a `rev-list --objects`-style subprocess; implemented
/// over an in-memory fixture in tests.
pub trait HeaderSource: Send {
    fn enumerate(&mut self, roots: &[ObjectId]) -> Result<Vec<(ObjectId, ObjectKind)>>;
}

/// Retrieves one object's body, given its OID and previously-reported kind.
pub trait BodySource: Send {
    fn fetch(&mut self, oid: ObjectId, kind: ObjectKind) -> Result<Vec<u8>>;
}

/// Receives batched progress ticks as the body-retrieval pass makes headway. A no-op
/// implementation is provided for `()`.
pub trait WalkProgress {
    fn on_object_processed(&mut self, kind: ObjectKind);
}

impl WalkProgress for () {
    fn on_object_processed(&mut self, _kind: ObjectKind) {}
}

/// Drives a complete walk: resolve roots, enumerate headers, retrieve and fold bodies.
pub struct WalkerDriver<'a> {
    graph: &'a AggregationGraph,
    resolver: &'a mut dyn PathResolver,
    cancel: CancellationToken,
    placeholders: HashMap<ObjectId, Placeholder>,
}

impl<'a> WalkerDriver<'a> {
    pub fn new(graph: &'a AggregationGraph, resolver: &'a mut dyn PathResolver, cancel: CancellationToken) -> Self {
        WalkerDriver {
            graph,
            resolver,
            cancel,
            placeholders: HashMap::new(),
        }
    }

    fn placeholder_of(&self, oid: ObjectId) -> Option<Placeholder> {
        self.placeholders.get(&oid).copied()
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(SizerError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run a complete walk from `roots` using `headers` for enumeration and `bodies` for
    /// retrieval, folding every object into the graph. `progress` is ticked once per
    /// object processed in the body-retrieval pass.
    pub fn run(
        &mut self,
        roots: &[ReferenceRoot],
        headers: &mut dyn HeaderSource,
        bodies: &mut dyn BodySource,
        progress: &mut dyn WalkProgress,
    ) -> Result<()> {
        for root in roots {
            let placeholder = self.resolver.record_root(&root.name, root.oid);
            self.placeholders.entry(root.oid).or_insert(placeholder);
        }

        let root_oids: Vec<ObjectId> = roots.iter().map(|r| r.oid).collect();
        let entries = headers.enumerate(&root_oids)?;

        // First sub-pass: register every tree/commit/tag OID as referenced so the
        // aggregation graph's pending/listener bookkeeping has somewhere to attach
        // regardless of which order bodies actually arrive in. A commit or tag reached
        // only via another commit's `parent` edge (never a root, never a tree child)
        // would otherwise have no placeholder at all; fall back to its own hex OID so
        // it still gets one, per the both-null-or-both-set path invariant.
        for (oid, kind) in &entries {
            match kind {
                ObjectKind::Tree => self.graph.mark_tree_referenced(*oid),
                ObjectKind::Commit => self.graph.mark_commit_referenced(*oid),
                ObjectKind::Tag => self.graph.mark_tag_referenced(*oid),
                ObjectKind::Blob | ObjectKind::Missing => {}
            }
            if matches!(kind, ObjectKind::Commit | ObjectKind::Tag) && !self.placeholders.contains_key(oid) {
                let hex = oid.to_hex().to_string();
                let placeholder = self.resolver.record_root(hex.as_bytes(), *oid);
                self.placeholders.insert(*oid, placeholder);
            }
        }

        for (oid, kind) in entries {
            self.check_cancelled()?;
            AggregationGraph::expect_known_kind(kind)?;
            let data = bodies.fetch(oid, kind)?;
            self.fold_one(oid, kind, &data)?;
            progress.on_object_processed(kind);
        }

        // Finalization: one more pass over the root set, counting each reference,
        // mirroring the walk's own bookkeeping step rather than folding reference
        // counting into the object loop above.
        for root in roots {
            self.graph.record_reference(root.group);
        }

        let residual_trees = self.graph.unresolved_tree_count();
        let residual_tags = self.graph.unresolved_tag_count();
        if residual_trees > 0 || residual_tags > 0 {
            return Err(SizerError::Invariant(format!(
                "{residual_trees} tree record(s) and {residual_tags} tag record(s) never resolved"
            )));
        }

        Ok(())
    }

    fn fold_one(&mut self, oid: ObjectId, kind: ObjectKind, data: &[u8]) -> Result<()> {
        match kind {
            ObjectKind::Blob => {
                let size = BlobSize {
                    size: crate::counter::Count32::new(data.len() as u32),
                };
                let placeholders = &self.placeholders;
                self.graph
                    .fold_blob(oid, self.placeholder_of(oid), size, |o| placeholders.get(&o).copied());
            }
            ObjectKind::Tree => {
                let entries = parse_tree(&oid, data)?;
                let parent_placeholder = self.placeholder_of(oid);
                let resolver = &mut *self.resolver;
                // Pre-record placeholders for every entry so later lookups by
                // `placeholder_of` succeed even for entries not yet folded.
                let mut new_placeholders = Vec::new();
                for entry in &entries {
                    let p = resolver.record_name(parent_placeholder, &entry.name, entry.oid);
                    new_placeholders.push((entry.oid, p));
                }
                for (child_oid, p) in new_placeholders {
                    self.placeholders.entry(child_oid).or_insert(p);
                }
                let placeholders = &self.placeholders;
                self.graph.fold_tree(oid, &entries, resolver, parent_placeholder, |o| {
                    placeholders.get(&o).copied()
                });
            }
            ObjectKind::Commit => {
                let header = parse_commit(&oid, data)?;
                self.placeholders
                    .entry(header.tree)
                    .or_insert_with(|| self.placeholder_of(oid).unwrap_or(Placeholder(u64::MAX)));
                let placeholders = &self.placeholders;
                self.graph.fold_commit(oid, &header, |o| placeholders.get(&o).copied());
            }
            ObjectKind::Tag => {
                let header = parse_tag(&oid, data)?;
                let placeholders = &self.placeholders;
                self.graph.fold_tag(oid, &header, |o| placeholders.get(&o).copied());
            }
            ObjectKind::Missing => unreachable!("checked by expect_known_kind"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_resolver::NullResolver;
    use bstr::BString;
    use pretty_assertions::assert_eq;

    fn oid(byte: u8) -> ObjectId {
        let mut bytes = [0u8; 20];
        bytes[19] = byte;
        ObjectId::from_bytes_or_panic(&bytes)
    }

    struct FixedHeaderSource(Vec<(ObjectId, ObjectKind)>);
    impl HeaderSource for FixedHeaderSource {
        fn enumerate(&mut self, _roots: &[ObjectId]) -> Result<Vec<(ObjectId, ObjectKind)>> {
            Ok(self.0.clone())
        }
    }

    struct FixedBodySource(HashMap<ObjectId, Vec<u8>>);
    impl BodySource for FixedBodySource {
        fn fetch(&mut self, oid: ObjectId, _kind: ObjectKind) -> Result<Vec<u8>> {
            self.0
                .get(&oid)
                .cloned()
                .ok_or(SizerError::MissingObject(oid))
        }
    }

    #[test]
    fn single_commit_single_blob_walk_resolves_sizes() {
        let blob = oid(1);
        let tree = oid(2);
        let commit = oid(3);

        let mut tree_body = Vec::new();
        tree_body.extend_from_slice(b"100644 file.txt\0");
        tree_body.extend_from_slice(blob.as_slice());

        let commit_body = format!("tree {}\nauthor A <a@x> 0 +0000\ncommitter A <a@x> 0 +0000\n\nmsg\n", tree.to_hex());

        let mut bodies = HashMap::new();
        bodies.insert(blob, b"hello world".to_vec());
        bodies.insert(tree, tree_body);
        bodies.insert(commit, commit_body.into_bytes());

        let mut headers = FixedHeaderSource(vec![
            (commit, ObjectKind::Commit),
            (tree, ObjectKind::Tree),
            (blob, ObjectKind::Blob),
        ]);
        let mut bodies = FixedBodySource(bodies);

        let graph = AggregationGraph::new();
        let mut resolver = NullResolver::new();
        let roots = vec![ReferenceRoot {
            name: BString::from("refs/heads/main"),
            oid: commit,
            group: RefGroup::Branch,
        }];

        let mut driver = WalkerDriver::new(&graph, &mut resolver, CancellationToken::new());
        driver.run(&roots, &mut headers, &mut bodies, &mut ()).unwrap();

        assert_eq!(graph.blob_size(&blob).unwrap().size.get(), 11);
        assert_eq!(graph.tree_size(&tree).unwrap().expanded_blob_count.get(), 1);
        assert_eq!(graph.commit_size(&commit).unwrap().max_ancestor_depth.get(), 1);

        let snapshot = graph.snapshot_history(&mut resolver);
        assert_eq!(snapshot.unique_blob_count, 1);
        assert_eq!(snapshot.unique_tree_count, 1);
        assert_eq!(snapshot.unique_commit_count, 1);
    }

    #[test]
    fn cancellation_stops_the_walk() {
        let commit = oid(1);
        let mut headers = FixedHeaderSource(vec![(commit, ObjectKind::Commit)]);
        let mut bodies = FixedBodySource(HashMap::new());
        let graph = AggregationGraph::new();
        let mut resolver = NullResolver::new();
        let token = CancellationToken::new();
        token.cancel();
        let roots = vec![ReferenceRoot {
            name: BString::from("refs/heads/main"),
            oid: commit,
            group: RefGroup::Branch,
        }];

        let mut driver = WalkerDriver::new(&graph, &mut resolver, token);
        let result = driver.run(&roots, &mut headers, &mut bodies, &mut ());
        assert!(matches!(result, Err(SizerError::Cancelled)));
    }

    #[test]
    fn missing_object_kind_is_a_protocol_error() {
        let blob = oid(1);
        let mut headers = FixedHeaderSource(vec![(blob, ObjectKind::Missing)]);
        let mut bodies = FixedBodySource(HashMap::new());
        let graph = AggregationGraph::new();
        let mut resolver = NullResolver::new();
        let roots = vec![ReferenceRoot {
            name: BString::from("refs/heads/main"),
            oid: blob,
            group: RefGroup::Branch,
        }];

        let mut driver = WalkerDriver::new(&graph, &mut resolver, CancellationToken::new());
        let result = driver.run(&roots, &mut headers, &mut bodies, &mut ());
        assert!(matches!(result, Err(SizerError::Protocol(_))));
    }
}
