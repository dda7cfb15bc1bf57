//! Enum membership checking.

use driftwatch_contracts::{
    schema::{EnumSchema, EnumValue},
    Issue, IssueKind, Namespace,
};
use serde_json::{Map, Value};

/// Membership check against the declared value set. Only string and number
/// inputs are checked — other runtime types pass through, since an enum
/// node carries no generic type check of its own.
pub(crate) fn check_members(
    values: &[EnumValue],
    namespace: &Namespace,
    value: &Value,
) -> Option<Issue> {
    if !matches!(value, Value::String(_) | Value::Number(_)) {
        return None;
    }
    if values.iter().any(|declared| declared.matches(value)) {
        return None;
    }
    let declared = values
        .iter()
        .map(EnumValue::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Some(
        Issue::new(
            namespace.clone(),
            IssueKind::EnumUnknown,
            format!("property value not in enum values [{declared}]"),
        )
        .with_example(value.clone()),
    )
}

/// Echo of the declared enum options for informer records.
pub(crate) fn infos(schema: &EnumSchema) -> Map<String, Value> {
    let mut infos = Map::new();
    if schema.ignore_unused_values {
        infos.insert("ignoreUnusedValues".to_string(), true.into());
    }
    infos
}
