//! The full, in-order path resolver.
//!
//! Every call to [`FullResolver::record_name`] or [`record_root`](FullResolver::record_root)
//! allocates a node holding its parent placeholder (if any) and its own name component.
//! [`request_path`](FullResolver::request_path) walks that parent chain to the root and joins
//! the names with `/`.
//!
//! Memory for a node is only held as long as something still needs it: each node tracks a
//! "seeker" count — one for every child node that chains through it, plus one more while a
//! caller is actively holding the placeholder — and frees itself (decrementing its own
//! parent's count in turn) once that count reaches zero. This lets the resolver run for an
//! entire repository walk without holding every path component ever seen in memory at once;
//! only the components on a currently "live" path are retained.

use std::collections::HashMap;

use bstr::BString;
use gix_hash::ObjectId;

use super::{NameStyle, Placeholder, PathResolver};

struct Node {
    parent: Option<Placeholder>,
    name: BString,
    seekers: u32,
}

#[derive(Default)]
pub struct FullResolver {
    next: u64,
    nodes: HashMap<u64, Node>,
}

impl FullResolver {
    pub fn new() -> Self {
        FullResolver::default()
    }

    fn alloc(&mut self, parent: Option<Placeholder>, name: BString) -> Placeholder {
        if let Some(p) = parent {
            if let Some(node) = self.nodes.get_mut(&p.0) {
                node.seekers += 1;
            }
        }
        let id = self.next;
        self.next += 1;
        self.nodes.insert(
            id,
            Node {
                parent,
                name,
                seekers: 1,
            },
        );
        Placeholder(id)
    }

    fn release(&mut self, id: u64) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.seekers > 1 {
            node.seekers -= 1;
            return;
        }
        let parent = node.parent;
        self.nodes.remove(&id);
        if let Some(p) = parent {
            self.release(p.0);
        }
    }
}

impl PathResolver for FullResolver {
    fn style(&self) -> NameStyle {
        NameStyle::Full
    }

    fn record_name(&mut self, parent: Option<Placeholder>, name: &[u8], _oid: ObjectId) -> Placeholder {
        self.alloc(parent, BString::from(name.to_vec()))
    }

    fn record_root(&mut self, label: &[u8], _oid: ObjectId) -> Placeholder {
        self.alloc(None, BString::from(label.to_vec()))
    }

    fn request_path(&mut self, placeholder: Placeholder) -> Option<BString> {
        let mut components = Vec::new();
        let mut cursor = Some(placeholder);
        while let Some(p) = cursor {
            let node = self.nodes.get(&p.0)?;
            components.push(node.name.clone());
            cursor = node.parent;
        }
        components.reverse();
        Some(join_components(&components))
    }

    fn forget(&mut self, placeholder: Placeholder) {
        self.release(placeholder.0);
    }
}

/// Joins a root label with its descendant path components using Git's own `ref:path`
/// convention — a colon after the root, then `/` between path components.
fn join_components(components: &[BString]) -> BString {
    let mut out = Vec::new();
    for (i, c) in components.iter().enumerate() {
        if i == 1 {
            out.push(b':');
        } else if i > 1 {
            out.push(b'/');
        }
        out.extend_from_slice(c.as_slice());
    }
    BString::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid() -> ObjectId {
        ObjectId::null(gix_hash::Kind::Sha1)
    }

    #[test]
    fn renders_nested_path() {
        let mut r = FullResolver::new();
        let root = r.record_root(b"refs/heads/main", oid());
        let src = r.record_name(Some(root), b"src", oid());
        let file = r.record_name(Some(src), b"main.rs", oid());
        assert_eq!(r.request_path(file), Some(BString::from("refs/heads/main:src/main.rs")));
    }

    #[test]
    fn root_alone_renders_its_own_label() {
        let mut r = FullResolver::new();
        let root = r.record_root(b"refs/heads/main", oid());
        assert_eq!(r.request_path(root), Some(BString::from("refs/heads/main")));
    }

    #[test]
    fn forgetting_a_leaf_frees_the_whole_dry_chain() {
        let mut r = FullResolver::new();
        let root = r.record_root(b"root", oid());
        let mid = r.record_name(Some(root), b"mid", oid());
        let leaf = r.record_name(Some(mid), b"leaf", oid());

        r.forget(leaf);
        r.forget(mid);
        r.forget(root);

        assert!(r.nodes.is_empty());
    }

    #[test]
    fn a_shared_parent_stays_alive_until_every_child_is_forgotten() {
        let mut r = FullResolver::new();
        let root = r.record_root(b"root", oid());
        let a = r.record_name(Some(root), b"a", oid());
        let b = r.record_name(Some(root), b"b", oid());

        r.forget(a);
        assert_eq!(r.request_path(root), Some(BString::from("root")));

        r.forget(b);
        r.forget(root);
        assert!(r.nodes.is_empty());
    }
}
