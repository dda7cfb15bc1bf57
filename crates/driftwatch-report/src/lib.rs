//! # driftwatch-report
//!
//! Human-readable rendering of tracker output, with a thin logging layer
//! on top.
//!
//! Rendering and emission are separate: the `render_*` functions produce
//! plain lines (and are what the tests exercise), while the `log_*`
//! functions push those lines through `tracing` at sensible levels.

pub mod printer;

pub use printer::{log_report, log_track_report, render_report, render_track_report};
