//! Numeric constraints: integer-ness and inclusive/exclusive bounds.

use driftwatch_contracts::{schema::NumberSchema, Issue, IssueKind, Namespace};
use serde_json::{Map, Value};

use super::Constraint;

/// Build the constraint chain for a number or integer leaf. The integer
/// check comes first so a fractional value reports `INTEGER` rather than a
/// bound violation.
pub(crate) fn compile(schema: &NumberSchema, integer: bool) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    if integer {
        constraints.push(Constraint::Integer);
    }
    if let Some(min) = schema.minimum {
        constraints.push(Constraint::Minimum(min));
    }
    if let Some(min) = schema.exclusive_minimum {
        constraints.push(Constraint::ExclusiveMinimum(min));
    }
    if let Some(max) = schema.maximum {
        constraints.push(Constraint::Maximum(max));
    }
    if let Some(max) = schema.exclusive_maximum {
        constraints.push(Constraint::ExclusiveMaximum(max));
    }
    constraints
}

pub(crate) fn check_integer(namespace: &Namespace, value: &Value) -> Option<Issue> {
    let number = value.as_f64()?;
    if number.fract() != 0.0 {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::Integer,
                "property must be an integer",
            )
            .with_example(value.clone()),
        );
    }
    None
}

pub(crate) fn check_minimum(min: f64, namespace: &Namespace, value: &Value) -> Option<Issue> {
    let number = value.as_f64()?;
    if number < min {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::Minimum,
                format!("property must be at least {min}"),
            )
            .with_example(value.clone()),
        );
    }
    None
}

pub(crate) fn check_exclusive_minimum(
    min: f64,
    namespace: &Namespace,
    value: &Value,
) -> Option<Issue> {
    let number = value.as_f64()?;
    if number <= min {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::Minimum,
                format!("property must be greater than {min}"),
            )
            .with_example(value.clone()),
        );
    }
    None
}

pub(crate) fn check_maximum(max: f64, namespace: &Namespace, value: &Value) -> Option<Issue> {
    let number = value.as_f64()?;
    if number > max {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::Maximum,
                format!("property must not be greater than {max}"),
            )
            .with_example(value.clone()),
        );
    }
    None
}

pub(crate) fn check_exclusive_maximum(
    max: f64,
    namespace: &Namespace,
    value: &Value,
) -> Option<Issue> {
    let number = value.as_f64()?;
    if number >= max {
        return Some(
            Issue::new(
                namespace.clone(),
                IssueKind::Maximum,
                format!("property must be less than {max}"),
            )
            .with_example(value.clone()),
        );
    }
    None
}

/// Echo of the declared numeric constraints for informer records.
pub(crate) fn infos(schema: &NumberSchema) -> Map<String, Value> {
    let mut infos = Map::new();
    if let Some(min) = schema.minimum {
        infos.insert("minimum".to_string(), min.into());
    }
    if let Some(min) = schema.exclusive_minimum {
        infos.insert("exclusiveMinimum".to_string(), min.into());
    }
    if let Some(max) = schema.maximum {
        infos.insert("maximum".to_string(), max.into());
    }
    if let Some(max) = schema.exclusive_maximum {
        infos.insert("exclusiveMaximum".to_string(), max.into());
    }
    infos
}
