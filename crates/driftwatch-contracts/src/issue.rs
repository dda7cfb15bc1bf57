//! Per-call validation results.
//!
//! Every problem found while tracking an input is reported as data — an
//! `Issue` inside a `TrackReport` — never as an error. Configuration
//! problems use `TrackerError` instead (see `error`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::namespace::Namespace;

/// The closed set of problems the tracker can report.
///
/// Data-level kinds (`REQUIRED`, `TYPE`, bounds, …) come out of `track()`;
/// drift kinds (`NEVER_USED`, `ALWAYS_PRESENT`, `SINGLE_VALUE`,
/// `ENUM_VALUES`) come out of `end()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// The input's identifier value was already seen in this session.
    AlreadyTracked,
    /// An input key the schema does not declare.
    Unknown,
    /// The runtime type does not match the declared type.
    Type,
    /// Drift: an optional property was null/absent on every tracked input.
    NeverUsed,
    /// Drift: an optional property was non-null on every tracked input.
    AlwaysPresent,
    /// Drift: a required property carried the same value on every input.
    SingleValue,
    /// Drift: only a strict subset of the declared enum values was exercised.
    EnumValues,
    /// The value is not a member of the declared enum.
    EnumUnknown,
    /// A required property is missing or null.
    Required,
    Minimum,
    Maximum,
    Integer,
    MinLength,
    MaxLength,
    MinItems,
    MaxItems,
    Pattern,
}

/// A single validation problem found at one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub property: Namespace,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub description: String,
    /// An offending or illustrative value, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl Issue {
    pub fn new(property: Namespace, kind: IssueKind, description: impl Into<String>) -> Self {
        Issue {
            property,
            kind,
            description: description.into(),
            example: None,
        }
    }

    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// The identifier value extracted from one input — a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputId {
    Str(String),
    Num(serde_json::Number),
}

impl InputId {
    /// Extract an identifier from a runtime value. Only strings and numbers
    /// qualify; anything else yields `None`.
    pub fn from_value(value: &Value) -> Option<InputId> {
        match value {
            Value::String(s) => Some(InputId::Str(s.clone())),
            Value::Number(n) => Some(InputId::Num(n.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for InputId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputId::Str(s) => write!(f, "{s}"),
            InputId::Num(n) => write!(f, "{n}"),
        }
    }
}

/// The outcome of tracking a single input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReport {
    /// True iff `properties` is empty.
    pub success: bool,
    /// The input's identifier value, when the schema designates one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_id: Option<InputId>,
    pub properties: Vec<Issue>,
}

impl TrackReport {
    pub fn new(input_id: Option<InputId>, properties: Vec<Issue>) -> Self {
        TrackReport {
            success: properties.is_empty(),
            input_id,
            properties,
        }
    }
}
