//! Tag chain-depth aggregation.
//!
//! A tag's `tag_depth` is `1` if its target is not itself a tag, or `target.tag_depth + 1`
//! if it is. Tags are processed in the order they stream from the object store
//! (`spec.md` §6), which does not guarantee a tag's target tag has already resolved, so
//! this uses the same pending/listener shape as [`super::tree`] and [`super::commit`].

use std::collections::HashMap;

use gix_hash::ObjectId;

use crate::counter::Count32;
use crate::object::TagSize;
use crate::oid::ObjectKind;

enum TagState {
    Awaited { listeners: Vec<ObjectId> },
    Pending { listeners: Vec<ObjectId> },
    Resolved(TagSize),
}

#[derive(Default)]
pub struct TagGraph {
    states: HashMap<ObjectId, TagState>,
}

impl TagGraph {
    pub fn new() -> Self {
        TagGraph::default()
    }

    pub fn get_resolved(&self, oid: &ObjectId) -> Option<TagSize> {
        match self.states.get(oid) {
            Some(TagState::Resolved(size)) => Some(*size),
            _ => None,
        }
    }

    fn entry_mut(&mut self, oid: ObjectId) -> &mut TagState {
        self.states
            .entry(oid)
            .or_insert_with(|| TagState::Awaited { listeners: Vec::new() })
    }

    pub fn mark_referenced(&mut self, oid: ObjectId) {
        self.entry_mut(oid);
    }

    /// Process a tag whose target has declared kind `target_kind` and OID `target`.
    /// If the target isn't a tag, this resolves immediately.
    pub fn begin_tag(
        &mut self,
        oid: ObjectId,
        target: ObjectId,
        target_kind: ObjectKind,
    ) -> Vec<(ObjectId, TagSize)> {
        let listeners = match self.states.remove(&oid) {
            Some(TagState::Awaited { listeners }) | Some(TagState::Pending { listeners }) => listeners,
            Some(resolved @ TagState::Resolved(_)) => {
                self.states.insert(oid, resolved);
                return Vec::new();
            }
            None => Vec::new(),
        };

        if target_kind != ObjectKind::Tag {
            let mut finalized = Vec::new();
            self.finalize(oid, listeners, 0, &mut finalized);
            return finalized;
        }

        match self.entry_mut(target) {
            TagState::Resolved(target_size) => {
                let depth = target_size.tag_depth.get();
                let mut finalized = Vec::new();
                self.finalize(oid, listeners, depth, &mut finalized);
                finalized
            }
            TagState::Awaited { listeners: target_listeners } => {
                target_listeners.push(oid);
                self.states.insert(oid, TagState::Pending { listeners });
                Vec::new()
            }
            TagState::Pending { .. } => {
                // The target tag is itself mid-resolution waiting on something further down
                // the chain; piggyback on its listener list by re-registering as awaited.
                if let Some(TagState::Pending { listeners: target_listeners }) = self.states.get_mut(&target) {
                    target_listeners.push(oid);
                }
                self.states.insert(oid, TagState::Pending { listeners });
                Vec::new()
            }
        }
    }

    fn finalize(
        &mut self,
        oid: ObjectId,
        listeners: Vec<ObjectId>,
        target_depth: u32,
        finalized: &mut Vec<(ObjectId, TagSize)>,
    ) {
        let size = TagSize {
            tag_depth: Count32::new(target_depth + 1),
        };
        self.states.insert(oid, TagState::Resolved(size));
        finalized.push((oid, size));

        for listener_oid in listeners {
            // The listener was waiting on `oid`'s depth specifically; re-drive it now that
            // `oid` is resolved by re-running begin_tag with the now-known target size.
            let listener_listeners = match self.states.remove(&listener_oid) {
                Some(TagState::Pending { listeners }) => listeners,
                Some(other) => {
                    self.states.insert(listener_oid, other);
                    continue;
                }
                None => Vec::new(),
            };
            self.finalize(listener_oid, listener_listeners, size.tag_depth.get(), finalized);
        }
    }

    /// Records still `Awaited`/`Pending` once the walk claims to be done — nonzero
    /// means some referenced tag's target never arrived.
    pub fn unresolved_count(&self) -> usize {
        self.states.values().filter(|s| !matches!(s, TagState::Resolved(_))).count()
    }
}
