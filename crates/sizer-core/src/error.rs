use std::fmt;

use gix_hash::ObjectId;

/// The kind of malformed object body encountered while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A tree entry was missing its mode, name, or OID.
    Tree,
    /// A commit body was missing a `tree` header or had a malformed `parent` header.
    Commit,
    /// A tag body was missing an `object` or `type` header.
    Tag,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::Tree => "tree",
            ParseErrorKind::Commit => "commit",
            ParseErrorKind::Tag => "tag",
        };
        f.write_str(s)
    }
}

/// Errors produced by the size-aggregation engine.
///
/// This is a closed enum rather than a type-erased error so that callers
/// (and the testable properties in the engine's test suite) can match on
/// the kind of failure, as required of a subprocess-driven walker that must
/// distinguish "the child process misbehaved" from "the object body was
/// malformed" from "the walk was cancelled".
#[derive(Debug)]
pub enum SizerError {
    /// The object-store child process failed to start, exited non-zero, or a pipe I/O
    /// operation on it failed.
    Subprocess(std::io::Error),

    /// The object-store protocol produced something the walker did not expect: a
    /// malformed header line, a truncated body, an unexpected object type, or a
    /// reference line with the wrong number of fields.
    Protocol(String),

    /// A tree, commit, or tag body could not be parsed.
    Parse { oid: ObjectId, kind: ParseErrorKind },

    /// The object store reported that a requested object does not exist.
    MissingObject(ObjectId),

    /// The walk was cancelled via a `CancellationToken`.
    Cancelled,

    /// An internal invariant was violated: double registration, residue left after the
    /// walk, or a path-placeholder state that should be unreachable. These indicate bugs
    /// in the engine, not bad input.
    Invariant(String),
}

impl fmt::Display for SizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizerError::Subprocess(e) => write!(f, "object-store subprocess error: {e}"),
            SizerError::Protocol(msg) => write!(f, "object-store protocol error: {msg}"),
            SizerError::Parse { oid, kind } => {
                write!(f, "failed to parse {kind} object {oid}")
            }
            SizerError::MissingObject(oid) => write!(f, "object {oid} is missing from the store"),
            SizerError::Cancelled => f.write_str("walk was cancelled"),
            SizerError::Invariant(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for SizerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SizerError::Subprocess(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SizerError {
    fn from(err: std::io::Error) -> Self {
        SizerError::Subprocess(err)
    }
}

pub type Result<T> = std::result::Result<T, SizerError>;
