//! Tree body parsing.
//!
//! Grounded on the teacher's zero-copy parsing style (`input-enumerator`'s use of
//! `gix_object` iterators rather than building owned intermediate structs per entry)
//! and on `spec.md` §4.2's entry-mode classification.

use bstr::BString;
use gix_hash::ObjectId;
use gix_object::tree::EntryKind as GixEntryKind;
use gix_object::TreeRefIter;

use crate::error::{ParseErrorKind, SizerError};

/// The four shapes a tree entry's mode can take, per `spec.md` §4.2's mask
/// `0o170000`: `0o040000` is a subtree, `0o160000` a submodule (gitlink),
/// `0o120000` a symlink, and anything else (`0o100644`, `0o100755`, ...) a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Tree,
    Blob,
    Symlink,
    Submodule,
}

impl From<GixEntryKind> for EntryKind {
    fn from(k: GixEntryKind) -> Self {
        match k {
            GixEntryKind::Tree => EntryKind::Tree,
            GixEntryKind::Link => EntryKind::Symlink,
            GixEntryKind::Commit => EntryKind::Submodule,
            GixEntryKind::Blob | GixEntryKind::BlobExecutable => EntryKind::Blob,
        }
    }
}

/// A single decoded tree entry, stripped down to what the aggregation graph needs:
/// the referenced object's kind and OID, and the entry's own name (for path-length
/// and path-depth bookkeeping).
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub name: BString,
    pub kind: EntryKind,
    pub oid: ObjectId,
}

/// Parse a raw tree body into its entries, in on-disk order.
///
/// On-disk order is not necessarily the order the caller wants to fold entries in;
/// `graph::tree` re-sorts as needed. This function only decodes.
pub fn parse_tree(oid: &ObjectId, data: &[u8]) -> Result<Vec<TreeEntry>, SizerError> {
    let mut entries = Vec::new();
    for entry in TreeRefIter::from_bytes(data) {
        let entry = entry.map_err(|_| SizerError::Parse {
            oid: oid.to_owned(),
            kind: ParseErrorKind::Tree,
        })?;
        entries.push(TreeEntry {
            name: BString::from(entry.filename.to_vec()),
            kind: EntryKind::from(entry.mode.kind()),
            oid: entry.oid.to_owned(),
        });
    }
    Ok(entries)
}
