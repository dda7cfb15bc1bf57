//! Dot-joined property paths.
//!
//! A `Namespace` identifies where in the schema tree a check or statistic
//! applies (`"info.gender"`, `"list.tag"`). Root-level properties carry no
//! leading dot; the root object itself is the empty namespace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dot-joined property path used as the aggregation key throughout the
/// tracker. Array elements share the namespace of the array itself — element
/// issues are deliberately not disambiguated by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// The empty namespace of the root object.
    pub fn root() -> Self {
        Namespace(String::new())
    }

    /// Append a property name, inserting a dot unless this is the root.
    pub fn child(&self, property: &str) -> Self {
        if self.0.is_empty() {
            Namespace(property.to_string())
        } else {
            Namespace(format!("{}.{}", self.0, property))
        }
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of path segments. The root namespace has depth zero.
    pub fn depth(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split('.').count()
        }
    }

    /// Depth-major, case-insensitive ordering key. Report output sorts
    /// shallow properties before deep ones, alphabetically within a level.
    pub fn sort_key(&self) -> (usize, String) {
        (self.depth(), self.0.to_lowercase())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Namespace(value.to_string())
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Namespace(value)
    }
}
