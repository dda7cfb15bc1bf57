//! End-of-session report types.
//!
//! A `Report` is produced exactly once per session by `end()` and is
//! immutable afterwards. `properties` holds the drift issues drained from
//! the aggregators; `informations` holds the statistical informers, only
//! populated when informational inspection was requested.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{issue::Issue, namespace::Namespace};

/// Observed statistics for one namespace, shaped by the declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stats {
    String(StringStats),
    Number(NumberStats),
    Array(ArrayStats),
    Enum(EnumStats),
}

/// Length distribution of an observed string property.
///
/// When every observed value had the same length, `length` is set and the
/// min/max pair is omitted. `empty`/`not_empty` are only counted for
/// optional properties and omitted when zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringStats {
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_empty: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// Running extrema of an observed numeric property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberStats {
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

/// Item-count distribution of an observed array property. Mirrors
/// `StringStats`: a constant length collapses into `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayStats {
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_empty: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// Per-value usage histogram of an observed enum property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumStats {
    pub count: u64,
    #[serde(rename = "enum")]
    pub used: BTreeMap<String, u64>,
}

/// An end-of-session statistical summary for one namespace. Not a
/// validation failure — informers exist for side-by-side comparison of
/// declared constraints (`infos`) with observed behavior (`stats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Informer {
    pub property: Namespace,
    /// The declared type name of the node ("string", "integer", …).
    #[serde(rename = "type")]
    pub type_name: String,
    pub stats: Stats,
    /// The subset of the schema's own declared constraints relevant to this
    /// type. Omitted when the node declares none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infos: Option<Map<String, Value>>,
}

/// Auxiliary bookkeeping attached to a `Report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Version of the crate that produced the report.
    pub version: String,
    /// Object validators built for the session's tree.
    pub object_validator_count: u32,
    /// Leaf (property) validators built for the session's tree.
    pub property_validator_count: u32,
}

/// The final artifact of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub metadata: ReportMetadata,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_ms: i64,
    /// True iff `properties` is empty.
    pub success: bool,
    /// Drift issues drained from the aggregators.
    pub properties: Vec<Issue>,
    /// Statistical informers, sorted depth-major by namespace. Empty unless
    /// informational inspection was enabled.
    pub informations: Vec<Informer>,
}
