//! Reference roots: the named starting points (branches, tags, remote-tracking refs,
//! or a bare detached OID) a walk begins from, and how they're grouped for reporting.

use bstr::BString;
use gix_hash::ObjectId;

/// The category a reference falls into, used to group the "references" section of the
/// rendered report (`spec.md` §7). Lives in `graph::history` alongside the counters it
/// feeds; re-exported here since a root's group is decided at resolution time.
pub use crate::graph::history::RefGroup;

/// A single resolved reference: its full name, the object it currently points at, and
/// which group it belongs to.
#[derive(Debug, Clone)]
pub struct ReferenceRoot {
    pub name: BString,
    pub oid: ObjectId,
    pub group: RefGroup,
}

/// A source of references to walk from — typically a `for-each-ref`-style subprocess
/// collaborator in `sizer-cli`, or an in-memory fixture in tests.
pub trait RootSource: Send {
    fn list_refs(&mut self) -> crate::error::Result<Vec<(BString, ObjectId)>>;
}

/// Classifies a raw reference name (`refs/heads/main`, `refs/tags/v1.0`, ...) into a
/// [`RefGroup`]. Kept as a trait, rather than a fixed set of prefixes, so a caller can
/// supply project-specific grouping (e.g. treating `refs/pull/*` as its own group)
/// without the core engine needing to know about it.
pub trait RefGrouper: Send {
    fn group(&self, ref_name: &[u8]) -> RefGroup;
}

/// Groups by the standard Git namespace prefixes.
pub struct DefaultRefGrouper;

impl RefGrouper for DefaultRefGrouper {
    fn group(&self, ref_name: &[u8]) -> RefGroup {
        if ref_name.starts_with(b"refs/heads/") {
            RefGroup::Branch
        } else if ref_name.starts_with(b"refs/tags/") {
            RefGroup::Tag
        } else if ref_name.starts_with(b"refs/remotes/") {
            RefGroup::Remote
        } else {
            RefGroup::Other
        }
    }
}

/// Resolve every reference `source` reports into a grouped [`ReferenceRoot`] list.
pub fn resolve_roots(
    source: &mut dyn RootSource,
    grouper: &dyn RefGrouper,
) -> crate::error::Result<Vec<ReferenceRoot>> {
    let refs = source.list_refs()?;
    Ok(refs
        .into_iter()
        .map(|(name, oid)| {
            let group = grouper.group(&name);
            ReferenceRoot { name, oid, group }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grouper_classifies_standard_namespaces() {
        let g = DefaultRefGrouper;
        assert_eq!(g.group(b"refs/heads/main"), RefGroup::Branch);
        assert_eq!(g.group(b"refs/tags/v1.0"), RefGroup::Tag);
        assert_eq!(g.group(b"refs/remotes/origin/main"), RefGroup::Remote);
        assert_eq!(g.group(b"refs/notes/commits"), RefGroup::Other);
    }
}
