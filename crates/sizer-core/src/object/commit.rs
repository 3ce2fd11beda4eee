//! Commit body parsing.

use gix_hash::ObjectId;
use gix_object::CommitRef;
use smallvec::SmallVec;

use crate::error::{ParseErrorKind, SizerError};

/// A decoded commit header: only the `tree` and `parent` lines matter to the
/// aggregation graph, since everything else (author, message, gpgsig, ...) is
/// out of scope for size aggregation.
///
/// Parents are kept in a `SmallVec` sized for the overwhelmingly common case of
/// zero, one, or two parents (root, ordinary, merge commit) without a heap
/// allocation, matching the teacher's use of `smallvec` for small, usually-short
/// per-object collections.
#[derive(Debug, Clone)]
pub struct CommitHeader {
    pub tree: ObjectId,
    pub parents: SmallVec<[ObjectId; 2]>,
}

pub fn parse_commit(oid: &ObjectId, data: &[u8]) -> Result<CommitHeader, SizerError> {
    let parse_error = || SizerError::Parse {
        oid: oid.to_owned(),
        kind: ParseErrorKind::Commit,
    };

    let commit = CommitRef::from_bytes(data).map_err(|_| parse_error())?;
    let parents = commit.parents().map(|p| p.to_owned()).collect();

    Ok(CommitHeader {
        tree: commit.tree(),
        parents,
    })
}
