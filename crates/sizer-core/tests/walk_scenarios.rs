//! End-to-end walk scenarios driven entirely through in-memory fakes, exercising
//! `sizer_core`'s public API the way `sizer-cli` would, minus any real subprocess.

use std::collections::HashMap;

use bstr::BString;
use gix_hash::ObjectId;
use pretty_assertions::assert_eq;

use sizer_core::path_resolver::{FullResolver, NullResolver};
use sizer_core::walk::root::{RefGroup as RootGroup, ReferenceRoot};
use sizer_core::{AggregationGraph, BodySource, CancellationToken, HeaderSource, ObjectKind, Result, WalkerDriver};

fn oid(byte: u8) -> ObjectId {
    let mut bytes = [0u8; 20];
    bytes[19] = byte;
    ObjectId::from_bytes_or_panic(&bytes)
}

struct FixedHeaders(Vec<(ObjectId, ObjectKind)>);
impl HeaderSource for FixedHeaders {
    fn enumerate(&mut self, _roots: &[ObjectId]) -> Result<Vec<(ObjectId, ObjectKind)>> {
        Ok(self.0.clone())
    }
}

struct FixedBodies(HashMap<ObjectId, Vec<u8>>);
impl BodySource for FixedBodies {
    fn fetch(&mut self, oid: ObjectId, _kind: ObjectKind) -> Result<Vec<u8>> {
        self.0
            .get(&oid)
            .cloned()
            .ok_or(sizer_core::SizerError::MissingObject(oid))
    }
}

fn tree_body(entries: &[(&str, &str, ObjectId)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (mode, name, child) in entries {
        body.extend_from_slice(mode.as_bytes());
        body.push(b' ');
        body.extend_from_slice(name.as_bytes());
        body.push(0);
        body.extend_from_slice(child.as_slice());
    }
    body
}

fn commit_body(tree: ObjectId, parents: &[ObjectId]) -> Vec<u8> {
    let mut s = format!("tree {}\n", tree.to_hex());
    for p in parents {
        s.push_str(&format!("parent {}\n", p.to_hex()));
    }
    s.push_str("author A <a@x> 0 +0000\ncommitter A <a@x> 0 +0000\n\nmsg\n");
    s.into_bytes()
}

fn tag_body(target: ObjectId, target_kind: &str) -> Vec<u8> {
    format!(
        "object {}\ntype {target_kind}\ntag v1\ntagger A <a@x> 0 +0000\n\nmsg\n",
        target.to_hex()
    )
    .into_bytes()
}

#[test]
fn wide_tree_aggregates_many_direct_blobs() {
    let commit = oid(200);
    let tree = oid(201);
    let blobs: Vec<ObjectId> = (1..=20).map(oid).collect();

    let names: Vec<String> = (0..blobs.len()).map(|i| format!("file{i}")).collect();
    let entries: Vec<(&str, &str, ObjectId)> = names
        .iter()
        .zip(&blobs)
        .map(|(name, &b)| ("100644", name.as_str(), b))
        .collect();

    let mut bodies = HashMap::new();
    for &b in &blobs {
        bodies.insert(b, b"x".repeat(10));
    }
    bodies.insert(tree, tree_body(&entries));
    bodies.insert(commit, commit_body(tree, &[]));

    let mut headers = vec![(commit, ObjectKind::Commit), (tree, ObjectKind::Tree)];
    headers.extend(blobs.iter().map(|&b| (b, ObjectKind::Blob)));

    let graph = AggregationGraph::new();
    let mut resolver = NullResolver::new();
    let roots = vec![ReferenceRoot {
        name: BString::from("refs/heads/main"),
        oid: commit,
        group: RootGroup::Branch,
    }];

    let mut driver = WalkerDriver::new(&graph, &mut resolver, CancellationToken::new());
    driver
        .run(&roots, &mut FixedHeaders(headers), &mut FixedBodies(bodies), &mut ())
        .unwrap();

    let size = graph.tree_size(&tree).unwrap();
    assert_eq!(size.expanded_blob_count.get(), 20);
    assert_eq!(size.expanded_blob_size.get(), 200);
    assert_eq!(size.max_path_depth.get(), 1);
    // direct entry count, not the expanded count (which also includes the tree itself).
    assert_eq!(size.entry_count.get(), 20);

    let snapshot = graph.snapshot_history(&mut resolver);
    assert_eq!(snapshot.max_tree_entries, 20);
    assert_eq!(snapshot.max_expanded_blob_size, 200);
}

#[test]
fn duplicate_subtree_is_counted_once_but_folded_into_both_parents() {
    let shared_blob = oid(1);
    let shared_tree = oid(2);
    let left = oid(3);
    let right = oid(4);
    let root = oid(5);
    let commit = oid(6);

    let mut bodies = HashMap::new();
    bodies.insert(shared_blob, b"hello".to_vec());
    bodies.insert(shared_tree, tree_body(&[("100644", "f", shared_blob)]));
    bodies.insert(left, tree_body(&[("40000", "shared", shared_tree)]));
    bodies.insert(right, tree_body(&[("40000", "shared", shared_tree)]));
    bodies.insert(root, tree_body(&[("40000", "left", left), ("40000", "right", right)]));
    bodies.insert(commit, commit_body(root, &[]));

    let headers = vec![
        (commit, ObjectKind::Commit),
        (root, ObjectKind::Tree),
        (left, ObjectKind::Tree),
        (right, ObjectKind::Tree),
        (shared_tree, ObjectKind::Tree),
        (shared_blob, ObjectKind::Blob),
    ];

    let graph = AggregationGraph::new();
    let mut resolver = FullResolver::new();
    let roots = vec![ReferenceRoot {
        name: BString::from("refs/heads/main"),
        oid: commit,
        group: RootGroup::Branch,
    }];

    let mut driver = WalkerDriver::new(&graph, &mut resolver, CancellationToken::new());
    driver
        .run(&roots, &mut FixedHeaders(headers), &mut FixedBodies(bodies), &mut ())
        .unwrap();

    assert_eq!(graph.tree_size(&left).unwrap().expanded_blob_count.get(), 1);
    assert_eq!(graph.tree_size(&right).unwrap().expanded_blob_count.get(), 1);
    // root sees two copies of the shared blob, one via each path.
    assert_eq!(graph.tree_size(&root).unwrap().expanded_blob_count.get(), 2);

    let snapshot = graph.snapshot_history(&mut resolver);
    // but the blob and the shared tree are each only counted once in unique totals.
    assert_eq!(snapshot.unique_blob_count, 1);
    assert_eq!(snapshot.unique_tree_count, 4);
}

#[test]
fn two_hop_tag_chain_accumulates_depth() {
    let commit = oid(10);
    let inner_tag = oid(11);
    let outer_tag = oid(12);

    let mut bodies = HashMap::new();
    bodies.insert(commit, commit_body(oid(13), &[]));
    bodies.insert(oid(13), tree_body(&[]));
    bodies.insert(inner_tag, tag_body(commit, "commit"));
    bodies.insert(outer_tag, tag_body(inner_tag, "tag"));

    let headers = vec![
        (outer_tag, ObjectKind::Tag),
        (inner_tag, ObjectKind::Tag),
        (commit, ObjectKind::Commit),
        (oid(13), ObjectKind::Tree),
    ];

    let graph = AggregationGraph::new();
    let mut resolver = NullResolver::new();
    let roots = vec![ReferenceRoot {
        name: BString::from("refs/tags/v2"),
        oid: outer_tag,
        group: RootGroup::Tag,
    }];

    let mut driver = WalkerDriver::new(&graph, &mut resolver, CancellationToken::new());
    driver
        .run(&roots, &mut FixedHeaders(headers), &mut FixedBodies(bodies), &mut ())
        .unwrap();

    assert_eq!(graph.tag_size(&inner_tag).unwrap().tag_depth.get(), 1);
    assert_eq!(graph.tag_size(&outer_tag).unwrap().tag_depth.get(), 2);
}

#[test]
fn empty_repo_produces_a_report_with_no_remarkable_metrics() {
    let graph = AggregationGraph::new();
    let mut resolver = NullResolver::new();
    let roots: Vec<ReferenceRoot> = Vec::new();

    let mut driver = WalkerDriver::new(&graph, &mut resolver, CancellationToken::new());
    driver
        .run(&roots, &mut FixedHeaders(Vec::new()), &mut FixedBodies(HashMap::new()), &mut ())
        .unwrap();

    let snapshot = graph.snapshot_history(&mut resolver);
    let report = sizer_core::build_report(&snapshot);
    let table = sizer_core::render_table(&report, 1);
    assert_eq!(table, "No problems above the current threshold were found\n");
}

#[test]
fn zero_byte_blob_is_sized_correctly() {
    let commit = oid(20);
    let tree = oid(21);
    let blob = oid(22);

    let mut bodies = HashMap::new();
    bodies.insert(blob, Vec::new());
    bodies.insert(tree, tree_body(&[("100644", "empty.txt", blob)]));
    bodies.insert(commit, commit_body(tree, &[]));

    let headers = vec![
        (commit, ObjectKind::Commit),
        (tree, ObjectKind::Tree),
        (blob, ObjectKind::Blob),
    ];

    let graph = AggregationGraph::new();
    let mut resolver = NullResolver::new();
    let roots = vec![ReferenceRoot {
        name: BString::from("refs/heads/main"),
        oid: commit,
        group: RootGroup::Branch,
    }];

    let mut driver = WalkerDriver::new(&graph, &mut resolver, CancellationToken::new());
    driver
        .run(&roots, &mut FixedHeaders(headers), &mut FixedBodies(bodies), &mut ())
        .unwrap();

    assert_eq!(graph.blob_size(&blob).unwrap().size.get(), 0);
}
