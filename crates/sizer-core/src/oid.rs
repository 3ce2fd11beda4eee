//! Object identifiers and the object-type tag.
//!
//! The engine never opens an on-disk object database itself (see
//! `spec.md` §6): it only ever receives object headers and bodies that a
//! collaborator has already read from a `rev-list`/`cat-file`-style
//! subprocess. So the OID type here is the standalone `gix_hash::ObjectId`
//! — fixed-length, totally ordered, hex-displayable, hashable — without
//! pulling in the full `gix` repository-access crate.

pub use gix_hash::{Kind as HashKind, ObjectId};

/// Tagged variant over the object types the store can report, plus `Missing` for a
/// `cat-file`-style "missing" response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
    Missing,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
            ObjectKind::Missing => "missing",
        }
    }

    pub fn parse(s: &str) -> Option<ObjectKind> {
        match s {
            "blob" => Some(ObjectKind::Blob),
            "tree" => Some(ObjectKind::Tree),
            "commit" => Some(ObjectKind::Commit),
            "tag" => Some(ObjectKind::Tag),
            "missing" => Some(ObjectKind::Missing),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
