//! Commit ancestor-depth aggregation.
//!
//! A commit's `max_ancestor_depth` is one more than the greatest `max_ancestor_depth`
//! among its parents (zero parents ⇒ depth 1). Commits are retrieved in chronological
//! order (`spec.md` §6), so parents are almost always already resolved by the time a
//! child arrives; the same pending/listener structure as [`super::tree`] covers the
//! remaining cases (shallow clones, out-of-order arrival).

use std::collections::HashMap;

use gix_hash::ObjectId;

use crate::object::CommitSize;

struct PendingFold {
    max_parent_depth: u32,
    parent_count: u32,
    waiting_on: usize,
    listeners: Vec<ObjectId>,
}

enum CommitState {
    Awaited { listeners: Vec<ObjectId> },
    Pending(PendingFold),
    Resolved(CommitSize),
}

#[derive(Default)]
pub struct CommitGraph {
    states: HashMap<ObjectId, CommitState>,
}

impl CommitGraph {
    pub fn new() -> Self {
        CommitGraph::default()
    }

    pub fn get_resolved(&self, oid: &ObjectId) -> Option<CommitSize> {
        match self.states.get(oid) {
            Some(CommitState::Resolved(size)) => Some(*size),
            _ => None,
        }
    }

    fn entry_mut(&mut self, oid: ObjectId) -> &mut CommitState {
        self.states
            .entry(oid)
            .or_insert_with(|| CommitState::Awaited { listeners: Vec::new() })
    }

    pub fn mark_referenced(&mut self, oid: ObjectId) {
        self.entry_mut(oid);
    }

    pub fn begin_commit(&mut self, oid: ObjectId, parents: &[ObjectId]) -> Vec<(ObjectId, CommitSize)> {
        let mut fold = PendingFold {
            max_parent_depth: 0,
            parent_count: parents.len() as u32,
            waiting_on: 0,
            listeners: match self.states.remove(&oid) {
                Some(CommitState::Awaited { listeners }) => listeners,
                Some(other) => {
                    self.states.insert(oid, other);
                    return Vec::new();
                }
                None => Vec::new(),
            },
        };

        for &parent in parents {
            match self.entry_mut(parent) {
                CommitState::Resolved(size) => {
                    let depth = size.max_ancestor_depth.get();
                    fold.max_parent_depth = fold.max_parent_depth.max(depth);
                }
                CommitState::Awaited { listeners } => {
                    listeners.push(oid);
                    fold.waiting_on += 1;
                }
                CommitState::Pending(pending) => {
                    pending.listeners.push(oid);
                    fold.waiting_on += 1;
                }
            }
        }

        let mut finalized = Vec::new();
        if fold.waiting_on == 0 {
            let depth = fold.max_parent_depth;
            let parent_count = fold.parent_count;
            self.finalize(oid, depth, parent_count, &mut finalized);
        } else {
            self.states.insert(oid, CommitState::Pending(fold));
        }
        finalized
    }

    fn finalize(
        &mut self,
        oid: ObjectId,
        max_parent_depth: u32,
        parent_count: u32,
        finalized: &mut Vec<(ObjectId, CommitSize)>,
    ) {
        use crate::counter::Count32;

        let listeners = match self.states.remove(&oid) {
            Some(CommitState::Pending(p)) => p.listeners,
            Some(CommitState::Awaited { listeners }) => listeners,
            _ => Vec::new(),
        };
        let size = CommitSize {
            max_ancestor_depth: Count32::new(max_parent_depth + 1),
            parent_count: Count32::new(parent_count),
        };
        self.states.insert(oid, CommitState::Resolved(size));
        finalized.push((oid, size));

        for listener_oid in listeners {
            let Some(CommitState::Pending(pending)) = self.states.get_mut(&listener_oid) else {
                continue;
            };
            pending.max_parent_depth = pending.max_parent_depth.max(size.max_ancestor_depth.get());
            pending.waiting_on -= 1;
            if pending.waiting_on == 0 {
                let CommitState::Pending(pending) = self.states.remove(&listener_oid).unwrap() else {
                    unreachable!()
                };
                self.finalize(listener_oid, pending.max_parent_depth, pending.parent_count, finalized);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(byte: u8) -> ObjectId {
        let mut bytes = [0u8; 20];
        bytes[19] = byte;
        ObjectId::from_bytes_or_panic(&bytes)
    }

    #[test]
    fn root_commit_has_depth_one() {
        let mut g = CommitGraph::new();
        let finalized = g.begin_commit(oid(1), &[]);
        assert_eq!(finalized[0].1.max_ancestor_depth.get(), 1);
    }

    #[test]
    fn linear_chain_accumulates_depth() {
        let mut g = CommitGraph::new();
        g.begin_commit(oid(1), &[]);
        g.begin_commit(oid(2), &[oid(1)]);
        let finalized = g.begin_commit(oid(3), &[oid(2)]);
        assert_eq!(finalized[0].1.max_ancestor_depth.get(), 3);
    }

    #[test]
    fn merge_commit_takes_the_deeper_parent() {
        let mut g = CommitGraph::new();
        g.begin_commit(oid(1), &[]);
        g.begin_commit(oid(2), &[oid(1)]);
        g.begin_commit(oid(3), &[oid(2)]);
        let finalized = g.begin_commit(oid(4), &[oid(1), oid(3)]);
        assert_eq!(finalized[0].1.max_ancestor_depth.get(), 4);
        assert_eq!(finalized[0].1.parent_count.get(), 2);
    }

    #[test]
    fn out_of_order_arrival_defers_then_cascades() {
        let mut g = CommitGraph::new();
        g.mark_referenced(oid(1));
        let finalized = g.begin_commit(oid(2), &[oid(1)]);
        assert!(finalized.is_empty());
        let finalized = g.begin_commit(oid(1), &[]);
        assert_eq!(finalized.len(), 2);
        assert_eq!(finalized[1].1.max_ancestor_depth.get(), 2);
    }
}
