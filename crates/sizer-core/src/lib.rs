//! Streaming size-aggregation engine for a Git-style object store.
//!
//! This crate has no subprocess-spawning or I/O of its own: it's driven by a
//! [`walk::HeaderSource`]/[`walk::BodySource`]/[`walk::RootSource`] trio supplied by the
//! caller, so it can be exercised against an in-memory fixture in tests and against a
//! real `git`-speaking subprocess in `sizer-cli` without any code here changing.

pub mod counter;
pub mod error;
pub mod graph;
pub mod object;
pub mod oid;
pub mod path_resolver;
pub mod render;
pub mod walk;

pub use error::{ParseErrorKind, Result, SizerError};
pub use graph::AggregationGraph;
pub use oid::{HashKind, ObjectId, ObjectKind};
pub use render::{build_report, render_table, Report, StructuredReport};
pub use walk::{
    BodySource, CancellationToken, DefaultRefGrouper, HeaderSource, ReferenceRoot, RefGroup, RefGrouper,
    RootSource, WalkProgress, WalkerDriver,
};
