//! Configuration error types for the DRIFTWATCH tracker.
//!
//! Only construction-time problems surface here — a malformed schema, an
//! unusable identifier property, a pattern that does not compile, a session
//! used after `end()`. Data-level validation problems are never errors;
//! they are returned as `Issue` values inside a normal `TrackReport`.

use thiserror::Error;

/// The unified configuration error type for the tracker crates.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The schema violates a structural invariant (e.g. a `required` name
    /// with no matching property, or more than one `id` flag).
    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },

    /// The property designated as the session identifier is missing, not
    /// required, or not a string/number.
    #[error("identifier property '{property}' {reason}")]
    InvalidIdentifier { property: String, reason: String },

    /// A declared `pattern` constraint failed to compile.
    #[error("invalid pattern for property '{property}': {reason}")]
    InvalidPattern { property: String, reason: String },

    /// `track()` was called on a session that has already ended.
    #[error("session has already ended")]
    SessionEnded,
}

/// Convenience alias used throughout the DRIFTWATCH crates.
pub type TrackerResult<T> = Result<T, TrackerError>;
