//! # driftwatch-contracts
//!
//! Shared types, schemas, and contracts for the DRIFTWATCH tracker.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod error;
pub mod issue;
pub mod namespace;
pub mod report;
pub mod schema;

pub use error::{TrackerError, TrackerResult};
pub use issue::{InputId, Issue, IssueKind, TrackReport};
pub use namespace::Namespace;
pub use report::{Informer, Report, ReportMetadata, Stats};
pub use schema::Schema;
