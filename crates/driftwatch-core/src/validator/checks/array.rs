//! Array length bounds.

use driftwatch_contracts::{schema::ArraySchema, Issue, IssueKind, Namespace};
use serde_json::{Map, Value};

use super::Constraint;

pub(crate) fn compile(schema: &ArraySchema) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    if let Some(min) = schema.min_items {
        constraints.push(Constraint::MinItems(min));
    }
    if let Some(max) = schema.max_items {
        constraints.push(Constraint::MaxItems(max));
    }
    constraints
}

pub(crate) fn check_min_items(min: usize, namespace: &Namespace, value: &Value) -> Option<Issue> {
    let items = value.as_array()?;
    if items.len() < min {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::MinItems,
                format!("array length is too short ({min} minimum)"),
            )
            .with_example(items.len()),
        );
    }
    None
}

pub(crate) fn check_max_items(max: usize, namespace: &Namespace, value: &Value) -> Option<Issue> {
    let items = value.as_array()?;
    if items.len() > max {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::MaxItems,
                format!("array length is too long ({max} maximum)"),
            )
            .with_example(items.len()),
        );
    }
    None
}

/// Echo of the declared array constraints for informer records.
pub(crate) fn infos(schema: &ArraySchema) -> Map<String, Value> {
    let mut infos = Map::new();
    if let Some(min) = schema.min_items {
        infos.insert("minItems".to_string(), min.into());
    }
    if let Some(max) = schema.max_items {
        infos.insert("maxItems".to_string(), max.into());
    }
    infos
}
