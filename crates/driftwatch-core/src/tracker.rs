//! Schema validation and session creation.
//!
//! A `Tracker` holds one validated schema and hands out independent
//! [`Session`]s over it. All structural checks happen here, once, so that
//! `session()` and `track()` can assume a well-formed tree: the root must
//! be an object, every `required` name must be declared, and at most one
//! direct root property may carry the identifier flag.

use std::sync::Arc;

use tracing::debug;

use driftwatch_contracts::{Namespace, Schema, TrackerError, TrackerResult};

use crate::session::{Session, SessionOptions};
use crate::validator::{compile, identifier::IdentifierValidator, CompileCx};

/// Entry point: a validated schema plus tracker-level configuration.
///
/// Cheap to clone and safe to share; each session compiled from it owns
/// its validator tree outright.
#[derive(Debug, Clone)]
pub struct Tracker {
    root: Arc<Schema>,
    identifier_property: Option<String>,
    summary_result: bool,
}

impl Tracker {
    /// Validate `schema` and build a tracker over it.
    ///
    /// Fails with [`TrackerError::InvalidSchema`] on structural problems,
    /// [`TrackerError::InvalidIdentifier`] on a misplaced or mistyped
    /// identifier flag, and [`TrackerError::InvalidPattern`] when a string
    /// pattern does not compile.
    pub fn new(schema: Schema) -> TrackerResult<Self> {
        let Schema::Object(root) = &schema else {
            return Err(TrackerError::InvalidSchema {
                reason: "root schema must be an object".to_string(),
            });
        };

        check_node(&schema, &Namespace::root())?;
        let identifier_property = find_identifier(&schema)?;

        if let Some(property) = &identifier_property {
            // Surfaces the required/type rules before any session exists.
            IdentifierValidator::new(root, property)?;
        }

        // Trial compile so pattern errors are construction errors, not
        // per-session surprises.
        let mut cx = CompileCx::new(false, false);
        compile(&schema, Namespace::root(), false, &mut cx)?;

        debug!(
            identifier = identifier_property.as_deref().unwrap_or("<none>"),
            object_validators = cx.object_validator_count,
            property_validators = cx.property_validator_count,
            "tracker created"
        );

        Ok(Tracker {
            root: Arc::new(schema),
            identifier_property,
            summary_result: false,
        })
    }

    /// Collapse repeated issues: each `(property, kind)` pair is reported
    /// at most once per session.
    pub fn summary_result(mut self, enabled: bool) -> Self {
        self.summary_result = enabled;
        self
    }

    /// Start an independent analysis session.
    pub fn session(&self, options: SessionOptions) -> TrackerResult<Session> {
        Session::new(
            &self.root,
            self.identifier_property.as_deref(),
            self.summary_result,
            options,
        )
    }
}

/// Recursive structural check: every `required` name must be declared.
fn check_node(schema: &Schema, namespace: &Namespace) -> TrackerResult<()> {
    match schema {
        Schema::Object(object) => {
            for name in &object.required {
                if !object.properties.contains_key(name) {
                    return Err(TrackerError::InvalidSchema {
                        reason: format!(
                            "required property '{}' is not declared",
                            namespace.child(name)
                        ),
                    });
                }
            }
            for (name, child) in &object.properties {
                check_node(child, &namespace.child(name))?;
            }
            Ok(())
        }
        Schema::Array(array) => check_node(&array.items, namespace),
        _ => Ok(()),
    }
}

/// Locate the identifier flag. At most one property may carry it, and it
/// must sit directly under the root object.
fn find_identifier(schema: &Schema) -> TrackerResult<Option<String>> {
    let Schema::Object(root) = schema else {
        return Ok(None);
    };

    let mut found: Option<String> = None;
    for (name, child) in &root.properties {
        let direct = child
            .flags()
            .map(|flags| flags.id)
            .unwrap_or(false);
        if direct {
            if let Some(previous) = &found {
                return Err(TrackerError::InvalidIdentifier {
                    property: name.clone(),
                    reason: format!("conflicts with identifier '{previous}'"),
                });
            }
            found = Some(name.clone());
        }
        check_no_nested_identifier(child, &Namespace::root().child(name))?;
    }
    Ok(found)
}

/// Identifier flags below the root are rejected outright.
fn check_no_nested_identifier(schema: &Schema, namespace: &Namespace) -> TrackerResult<()> {
    match schema {
        Schema::Object(object) => {
            for (name, child) in &object.properties {
                let child_ns = namespace.child(name);
                if child.flags().map(|flags| flags.id).unwrap_or(false) {
                    return Err(TrackerError::InvalidIdentifier {
                        property: child_ns.to_string(),
                        reason: "must be a direct property of the root object".to_string(),
                    });
                }
                check_no_nested_identifier(child, &child_ns)?;
            }
            Ok(())
        }
        Schema::Array(array) => {
            if array.items.flags().map(|flags| flags.id).unwrap_or(false) {
                return Err(TrackerError::InvalidIdentifier {
                    property: namespace.to_string(),
                    reason: "must be a direct property of the root object".to_string(),
                });
            }
            check_no_nested_identifier(&array.items, namespace)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn root_must_be_an_object() {
        let err = Tracker::new(schema(json!({ "type": "string" }))).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidSchema { .. }));
    }

    #[test]
    fn required_names_must_be_declared() {
        let err = Tracker::new(schema(json!({
            "type": "object",
            "required": ["ghost"],
            "properties": { "name": { "type": "string" } },
        })))
        .unwrap_err();

        match err {
            TrackerError::InvalidSchema { reason } => {
                assert!(reason.contains("ghost"), "unexpected reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn required_names_are_checked_in_nested_objects() {
        let err = Tracker::new(schema(json!({
            "type": "object",
            "properties": {
                "info": {
                    "type": "object",
                    "required": ["missing"],
                    "properties": {},
                },
            },
        })))
        .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidSchema { .. }));
    }

    #[test]
    fn invalid_pattern_is_a_construction_error() {
        let err = Tracker::new(schema(json!({
            "type": "object",
            "properties": { "name": { "type": "string", "pattern": "(" } },
        })))
        .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidPattern { .. }));
    }

    #[test]
    fn identifier_must_be_required() {
        let err = Tracker::new(schema(json!({
            "type": "object",
            "properties": { "id": { "type": "string", "id": true } },
        })))
        .unwrap_err();

        match err {
            TrackerError::InvalidIdentifier { property, reason } => {
                assert_eq!(property, "id");
                assert!(reason.contains("required"), "unexpected reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identifier_must_be_a_string_or_a_number() {
        let err = Tracker::new(schema(json!({
            "type": "object",
            "required": ["id"],
            "properties": { "id": { "type": "boolean", "id": true } },
        })))
        .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidIdentifier { .. }));
    }

    #[test]
    fn at_most_one_identifier() {
        let err = Tracker::new(schema(json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": {
                "a": { "type": "string", "id": true },
                "b": { "type": "string", "id": true },
            },
        })))
        .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidIdentifier { .. }));
    }

    #[test]
    fn nested_identifier_flags_are_rejected() {
        let err = Tracker::new(schema(json!({
            "type": "object",
            "properties": {
                "info": {
                    "type": "object",
                    "required": ["id"],
                    "properties": { "id": { "type": "string", "id": true } },
                },
            },
        })))
        .unwrap_err();

        match err {
            TrackerError::InvalidIdentifier { property, .. } => {
                assert_eq!(property, "info.id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn a_valid_schema_yields_sessions() {
        let tracker = Tracker::new(schema(json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "id": { "type": "string", "id": true },
                "tags": { "type": "array", "items": { "type": "string" } },
            },
        })))
        .unwrap();

        let session = tracker.session(SessionOptions::default()).unwrap();
        assert_ne!(session.id().to_string(), "");
    }
}
