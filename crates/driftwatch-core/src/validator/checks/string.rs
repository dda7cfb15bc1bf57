//! String constraints: length bounds and pattern matching.

use driftwatch_contracts::{
    schema::StringSchema, Issue, IssueKind, Namespace, TrackerError, TrackerResult,
};
use regex::Regex;
use serde_json::{Map, Value};

use super::Constraint;

/// Build the constraint chain for a string leaf. The pattern is compiled
/// here, once per session — a malformed pattern aborts session construction.
pub(crate) fn compile(
    schema: &StringSchema,
    namespace: &Namespace,
) -> TrackerResult<Vec<Constraint>> {
    let mut constraints = Vec::new();
    if let Some(min) = schema.min_length {
        constraints.push(Constraint::MinLength(min));
    }
    if let Some(max) = schema.max_length {
        constraints.push(Constraint::MaxLength(max));
    }
    if let Some(pattern) = &schema.pattern {
        let compiled = Regex::new(pattern).map_err(|e| TrackerError::InvalidPattern {
            property: namespace.to_string(),
            reason: e.to_string(),
        })?;
        constraints.push(Constraint::Pattern(compiled));
    }
    Ok(constraints)
}

pub(crate) fn check_min_length(min: usize, namespace: &Namespace, value: &Value) -> Option<Issue> {
    let text = value.as_str()?;
    let length = text.chars().count();
    if length < min {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::MinLength,
                format!("property must have at least {min} characters"),
            )
            .with_example(format!("\"{text}\" ({length})")),
        );
    }
    None
}

pub(crate) fn check_max_length(max: usize, namespace: &Namespace, value: &Value) -> Option<Issue> {
    let text = value.as_str()?;
    let length = text.chars().count();
    if length > max {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::MaxLength,
                format!("property must not be greater than {max} characters"),
            )
            .with_example(format!("\"{text}\" ({length})")),
        );
    }
    None
}

pub(crate) fn check_pattern(pattern: &Regex, namespace: &Namespace, value: &Value) -> Option<Issue> {
    let text = value.as_str()?;
    if !pattern.is_match(text) {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::Pattern,
                "property format is invalid",
            )
            .with_example(text),
        );
    }
    None
}

/// Echo of the declared string constraints for informer records.
pub(crate) fn infos(schema: &StringSchema) -> Map<String, Value> {
    let mut infos = Map::new();
    if let Some(min) = schema.min_length {
        infos.insert("minLength".to_string(), min.into());
    }
    if let Some(max) = schema.max_length {
        infos.insert("maxLength".to_string(), max.into());
    }
    if let Some(pattern) = &schema.pattern {
        infos.insert("pattern".to_string(), pattern.as_str().into());
    }
    infos
}
