//! Path resolution: turning "this blob/tree is reachable via path P under commit C"
//! bookkeeping into a human-readable path string for the report's "biggest objects"
//! listing, without keeping every path in memory for the whole walk.
//!
//! `spec.md` §5 requires two interchangeable strategies here: a cheap one that never
//! renders real paths (used when the report doesn't need them), and a full one that
//! reconstructs a path by walking a parent chain recorded while the tree/commit walk
//! was in progress. Both are exposed behind the [`PathResolver`] trait so the graph
//! code is indifferent to which is active.

pub mod full;
pub mod none;

use bstr::BString;
use gix_hash::ObjectId;

pub use full::FullResolver;
pub use none::{HashResolver, NullResolver};

/// How a resolved path should be rendered when no record of it is available, or when
/// the resolver has chosen not to track real paths at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// Paths are never rendered; callers see `None`.
    None,
    /// Paths are rendered as the object's hex OID instead of a real path.
    Hash,
    /// Paths are rendered as the real slash-joined path, when known.
    Full,
}

/// An opaque handle to a path under construction. The aggregation graph hands these
/// out and back in without needing to know whether the underlying resolver is tracking
/// real path components or doing nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placeholder(pub(crate) u64);

/// A strategy for resolving object OIDs to human-readable paths.
///
/// Implementations must be safe to call from multiple worker contexts; the engine
/// serializes access through the same mutex zones documented in `spec.md` §6, so
/// implementations do not need their own internal locking, but must not assume
/// single-threaded access absent that serialization.
pub trait PathResolver: Send {
    /// The rendering strategy this resolver implements, surfaced so the graph layer
    /// can skip path bookkeeping entirely when it would be wasted (`NameStyle::None`).
    fn style(&self) -> NameStyle;

    /// Record that `oid` was reached from `parent` (a placeholder previously returned
    /// by this resolver, or `None` for a root) via a path component named `name`.
    /// Returns a placeholder for `oid` under this parent/name.
    fn record_name(&mut self, parent: Option<Placeholder>, name: &[u8], oid: ObjectId) -> Placeholder;

    /// Record a root: a reference or bare OID given at the top of the walk with no
    /// parent path component (e.g. the tree of the commit a branch points at).
    fn record_root(&mut self, label: &[u8], oid: ObjectId) -> Placeholder;

    /// A later stage of the walk (tree/commit/tag folding) wants to know the path to
    /// `placeholder`, once available. The resolver is free to answer immediately or
    /// defer; `sizer-core`'s graph layer only calls this once the fold it's attached
    /// to has actually finished, so no deferral mechanism is required here.
    fn request_path(&mut self, placeholder: Placeholder) -> Option<BString>;

    /// Release bookkeeping for `placeholder`: no future caller will ask for its path.
    /// A `NullResolver`/`HashResolver` can no-op this; `FullResolver` uses it to free
    /// parent-chain memory once every seeker has been satisfied.
    fn forget(&mut self, placeholder: Placeholder);
}
