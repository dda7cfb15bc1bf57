//! # driftwatch-core
//!
//! The analysis engine: schema validation, per-session validator trees,
//! and drift aggregation.
//!
//! The shape of an analysis run:
//!
//! 1. Build a [`Tracker`] from a schema. All structural validation happens
//!    here; a tracker that exists is a tracker whose schema is well formed.
//! 2. Open a [`Session`]. Each session eagerly compiles its own validator
//!    tree and owns all mutable state for the run.
//! 3. Feed inputs through [`Session::track`]; every per-input finding comes
//!    back as data in a `TrackReport`, never as an error.
//! 4. Call [`Session::end`] to drain the aggregators into the final
//!    [`Report`](driftwatch_contracts::Report): drift findings (always
//!    present, never used, single value, unexercised enum values) plus
//!    optional statistical informers.

pub mod session;
pub mod tracker;

mod validator;

pub use session::{Session, SessionOptions};
pub use tracker::Tracker;
