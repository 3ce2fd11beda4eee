//! History-wide totals and maxima.
//!
//! Unlike the per-object tables in [`super::tree`]/[`super::commit`]/[`super::tag`], this
//! has no dependency structure of its own: every resolved blob/tree/commit/tag simply gets
//! folded in as it finalizes, so there is nothing to defer. What it does track, per
//! `spec.md` §4.6, is which single object currently holds the record for each metric, so
//! the report can name "the biggest thing" rather than just its size.

use gix_hash::ObjectId;
use serde::Serialize;

use crate::counter::{Count32, Count64};
use crate::object::{CommitSize, TagSize, TreeSize};
use crate::path_resolver::{Placeholder, PathResolver};

/// The category a reference falls into, used to group the "references" section of the
/// rendered report (`spec.md` §7). Defined here, alongside the counters it feeds,
/// rather than in `walk::root` where `ReferenceRoot` lives, and re-exported from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefGroup {
    Branch,
    Tag,
    Remote,
    Other,
}

/// Tracks the object that currently holds the record for one scalar metric, along with
/// a placeholder usable to recover its path. Ties favor the most recently considered
/// object, matching the walk's chronological processing order.
#[derive(Debug, Clone, Copy)]
pub struct Record<V> {
    pub value: V,
    pub oid: Option<ObjectId>,
    pub placeholder: Option<Placeholder>,
}

impl<V: Default> Default for Record<V> {
    fn default() -> Self {
        Record {
            value: V::default(),
            oid: None,
            placeholder: None,
        }
    }
}

impl Record<Count32> {
    fn consider(&mut self, oid: ObjectId, placeholder: Option<Placeholder>, value: Count32) {
        if self.value.adjust_max_if_possible(value.get()) {
            self.oid = Some(oid);
            self.placeholder = placeholder;
        }
    }
}

impl Record<Count64> {
    fn consider(&mut self, oid: ObjectId, placeholder: Option<Placeholder>, value: Count64) {
        if self.value.adjust_max_if_possible(value.get()) {
            self.oid = Some(oid);
            self.placeholder = placeholder;
        }
    }
}

#[derive(Default)]
pub struct HistorySize {
    pub unique_blob_count: Count64,
    pub unique_blob_size: Count64,
    pub unique_tree_count: Count64,
    pub unique_commit_count: Count64,
    pub unique_tag_count: Count64,
    pub reference_count: Count64,
    pub branch_reference_count: Count64,
    pub tag_reference_count: Count64,
    pub remote_reference_count: Count64,
    pub other_reference_count: Count64,

    pub max_blob_size: Record<Count32>,
    pub max_checkout_path_depth: Record<Count32>,
    pub max_checkout_path_length: Record<Count32>,
    pub max_tree_entries: Record<Count32>,
    pub max_expanded_blob_size: Record<Count64>,
    pub max_commit_ancestor_depth: Record<Count32>,
    pub max_parent_count: Record<Count32>,
    pub max_tag_depth: Record<Count32>,
}

impl HistorySize {
    pub fn new() -> Self {
        HistorySize::default()
    }

    pub fn record_blob(&mut self, oid: ObjectId, placeholder: Option<Placeholder>, size: Count32) {
        self.unique_blob_count.increment(1);
        self.unique_blob_size.increment(size.get() as u64);
        self.max_blob_size.consider(oid, placeholder, size);
    }

    pub fn record_tree(&mut self, oid: ObjectId, placeholder: Option<Placeholder>, size: &TreeSize) {
        self.unique_tree_count.increment(1);
        self.max_checkout_path_depth.consider(oid, placeholder, size.max_path_depth);
        self.max_checkout_path_length
            .consider(oid, placeholder, size.max_path_length);
        self.max_tree_entries.consider(oid, placeholder, size.entry_count);
        self.max_expanded_blob_size
            .consider(oid, placeholder, size.expanded_blob_size);
    }

    pub fn record_commit(&mut self, oid: ObjectId, placeholder: Option<Placeholder>, size: &CommitSize) {
        self.unique_commit_count.increment(1);
        self.max_commit_ancestor_depth
            .consider(oid, placeholder, size.max_ancestor_depth);
        self.max_parent_count.consider(oid, placeholder, size.parent_count);
    }

    pub fn record_tag(&mut self, oid: ObjectId, placeholder: Option<Placeholder>, size: &TagSize) {
        self.unique_tag_count.increment(1);
        self.max_tag_depth.consider(oid, placeholder, size.tag_depth);
    }

    /// Called once per walked reference after the scan completes, per `spec.md` §4.5's
    /// finalization step. Increments the flat total plus whichever group counter
    /// `group` names, so the report's per-group reference breakdown has something to
    /// show rather than just the total.
    pub fn record_reference(&mut self, group: RefGroup) {
        self.reference_count.increment(1);
        match group {
            RefGroup::Branch => self.branch_reference_count.increment(1),
            RefGroup::Tag => self.tag_reference_count.increment(1),
            RefGroup::Remote => self.remote_reference_count.increment(1),
            RefGroup::Other => self.other_reference_count.increment(1),
        }
    }
}

/// Resolve a record's path for reporting: the resolver's answer if it has one,
/// otherwise the object's own hex OID, per `spec.md` §4.3's OID-hex fallback
/// guarantee. `None` only when the record was never set at all.
fn resolve_record_path<V>(record: &Record<V>, resolver: &mut dyn PathResolver) -> Option<String> {
    let oid = record.oid?;
    if let Some(placeholder) = record.placeholder {
        if let Some(path) = resolver.request_path(placeholder) {
            return Some(path.to_string());
        }
    }
    Some(oid.to_hex().to_string())
}

/// A snapshot-friendly, serde-serializable form of [`HistorySize`] for structured
/// output, detached from the live `Record` placeholders. Each `max_*` metric carries
/// a sibling `max_*_path`, resolved once at snapshot time (while the path resolver
/// that issued the placeholders is still alive) rather than the placeholder itself,
/// which would be meaningless once that resolver goes away.
#[derive(Debug, Serialize)]
pub struct HistorySnapshot {
    pub unique_blob_count: u64,
    pub unique_blob_size: u64,
    pub unique_tree_count: u64,
    pub unique_commit_count: u64,
    pub unique_tag_count: u64,
    pub reference_count: u64,
    pub branch_reference_count: u64,
    pub tag_reference_count: u64,
    pub remote_reference_count: u64,
    pub other_reference_count: u64,

    pub max_blob_size: u32,
    pub max_blob_size_path: Option<String>,
    pub max_checkout_path_depth: u32,
    pub max_checkout_path_depth_path: Option<String>,
    pub max_checkout_path_length: u32,
    pub max_checkout_path_length_path: Option<String>,
    pub max_tree_entries: u32,
    pub max_tree_entries_path: Option<String>,
    pub max_expanded_blob_size: u64,
    pub max_expanded_blob_size_path: Option<String>,
    pub max_commit_ancestor_depth: u32,
    pub max_commit_ancestor_depth_path: Option<String>,
    pub max_parent_count: u32,
    pub max_parent_count_path: Option<String>,
    pub max_tag_depth: u32,
    pub max_tag_depth_path: Option<String>,
}

impl HistorySnapshot {
    /// Build a snapshot from the live history table, resolving every `max_*` record's
    /// path through `resolver` before it's detached from the walk. Call once, right
    /// after the walk finishes and before the resolver is dropped.
    pub fn from_history(h: &HistorySize, resolver: &mut dyn PathResolver) -> Self {
        HistorySnapshot {
            unique_blob_count: h.unique_blob_count.get(),
            unique_blob_size: h.unique_blob_size.get(),
            unique_tree_count: h.unique_tree_count.get(),
            unique_commit_count: h.unique_commit_count.get(),
            unique_tag_count: h.unique_tag_count.get(),
            reference_count: h.reference_count.get(),
            branch_reference_count: h.branch_reference_count.get(),
            tag_reference_count: h.tag_reference_count.get(),
            remote_reference_count: h.remote_reference_count.get(),
            other_reference_count: h.other_reference_count.get(),

            max_blob_size: h.max_blob_size.value.get(),
            max_blob_size_path: resolve_record_path(&h.max_blob_size, resolver),
            max_checkout_path_depth: h.max_checkout_path_depth.value.get(),
            max_checkout_path_depth_path: resolve_record_path(&h.max_checkout_path_depth, resolver),
            max_checkout_path_length: h.max_checkout_path_length.value.get(),
            max_checkout_path_length_path: resolve_record_path(&h.max_checkout_path_length, resolver),
            max_tree_entries: h.max_tree_entries.value.get(),
            max_tree_entries_path: resolve_record_path(&h.max_tree_entries, resolver),
            max_expanded_blob_size: h.max_expanded_blob_size.value.get(),
            max_expanded_blob_size_path: resolve_record_path(&h.max_expanded_blob_size, resolver),
            max_commit_ancestor_depth: h.max_commit_ancestor_depth.value.get(),
            max_commit_ancestor_depth_path: resolve_record_path(&h.max_commit_ancestor_depth, resolver),
            max_parent_count: h.max_parent_count.value.get(),
            max_parent_count_path: resolve_record_path(&h.max_parent_count, resolver),
            max_tag_depth: h.max_tag_depth.value.get(),
            max_tag_depth_path: resolve_record_path(&h.max_tag_depth, resolver),
        }
    }
}
