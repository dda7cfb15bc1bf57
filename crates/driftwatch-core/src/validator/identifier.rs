//! Duplicate-input detection via the designated identifier property.

use std::collections::HashSet;

use driftwatch_contracts::{
    schema::ObjectSchema, InputId, Issue, IssueKind, Schema, TrackerError, TrackerResult,
};
use serde_json::Value;

/// Tracks identifier values seen during one session. When an input carries
/// an id that was already observed, the whole input is short-circuited with
/// a single `ALREADY_TRACKED` issue and no other checks run.
#[derive(Debug)]
pub(crate) struct IdentifierValidator {
    property: String,
    /// `multiple: true` on the id property disables uniqueness tracking.
    multiple: bool,
    seen: HashSet<InputId>,
}

impl IdentifierValidator {
    /// Validate the identifier configuration against the root object. The
    /// designated property must exist, be required, and be a string or a
    /// number — anything else is a fatal configuration error.
    pub(crate) fn new(root: &ObjectSchema, property: &str) -> TrackerResult<Self> {
        let schema = root.properties.get(property).ok_or_else(|| {
            TrackerError::InvalidIdentifier {
                property: property.to_string(),
                reason: "is not declared in the schema".to_string(),
            }
        })?;

        if !root.required.contains(property) {
            return Err(TrackerError::InvalidIdentifier {
                property: property.to_string(),
                reason: "must be required".to_string(),
            });
        }

        let multiple = match schema {
            Schema::String(_) | Schema::Number(_) | Schema::Integer(_) => {
                schema.flags().map_or(false, |flags| flags.multiple)
            }
            _ => {
                return Err(TrackerError::InvalidIdentifier {
                    property: property.to_string(),
                    reason: "must be a string or a number".to_string(),
                })
            }
        };

        Ok(IdentifierValidator {
            property: property.to_string(),
            multiple,
            seen: HashSet::new(),
        })
    }

    /// Record the input's id and report a duplicate. Inputs without a
    /// usable id value are never short-circuited.
    pub(crate) fn check(&mut self, input: &Value) -> Option<Issue> {
        let id = input
            .get(self.property.as_str())
            .and_then(InputId::from_value)?;

        if self.multiple {
            return None;
        }
        if self.seen.insert(id) {
            return None;
        }
        Some(Issue::new(
            self.property.as_str().into(),
            IssueKind::AlreadyTracked,
            "input already tracked",
        ))
    }
}
