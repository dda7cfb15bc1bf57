//! Concrete per-type rule sets.
//!
//! Every constraint a leaf can carry is one `Constraint` variant, built once
//! at compile time (patterns included) and evaluated per input value. A
//! constraint either passes (`None`) or produces the issue to report — the
//! leaf chain stops at the first hit.

use driftwatch_contracts::{schema::EnumValue, Issue, Namespace, Schema};
use regex::Regex;
use serde_json::Value;

pub(crate) mod array;
pub(crate) mod enums;
pub(crate) mod number;
pub(crate) mod string;

/// A compiled, type-specific check attached to one leaf validator.
#[derive(Debug)]
pub(crate) enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Integer,
    Minimum(f64),
    ExclusiveMinimum(f64),
    Maximum(f64),
    ExclusiveMaximum(f64),
    Enum(Vec<EnumValue>),
    MinItems(usize),
    MaxItems(usize),
}

impl Constraint {
    /// Evaluate against a non-null, type-checked value.
    pub(crate) fn check(&self, namespace: &Namespace, value: &Value) -> Option<Issue> {
        match self {
            Constraint::MinLength(min) => string::check_min_length(*min, namespace, value),
            Constraint::MaxLength(max) => string::check_max_length(*max, namespace, value),
            Constraint::Pattern(pattern) => string::check_pattern(pattern, namespace, value),
            Constraint::Integer => number::check_integer(namespace, value),
            Constraint::Minimum(min) => number::check_minimum(*min, namespace, value),
            Constraint::ExclusiveMinimum(min) => {
                number::check_exclusive_minimum(*min, namespace, value)
            }
            Constraint::Maximum(max) => number::check_maximum(*max, namespace, value),
            Constraint::ExclusiveMaximum(max) => {
                number::check_exclusive_maximum(*max, namespace, value)
            }
            Constraint::Enum(values) => enums::check_members(values, namespace, value),
            Constraint::MinItems(min) => array::check_min_items(*min, namespace, value),
            Constraint::MaxItems(max) => array::check_max_items(*max, namespace, value),
        }
    }
}

/// The `example` attached to a `REQUIRED` issue: the declared type in
/// brackets, or the declared value set for enums and arrays of enums.
pub(crate) fn required_example(schema: &Schema) -> String {
    match schema {
        Schema::Enum(e) => format!("[{}]", join_values(&e.values)),
        Schema::Array(a) => match a.items.as_ref() {
            Schema::Enum(e) => format!("[{}]", join_values(&e.values)),
            _ => format!("[{}]", schema.type_name()),
        },
        _ => format!("[{}]", schema.type_name()),
    }
}

fn join_values(values: &[EnumValue]) -> String {
    values
        .iter()
        .map(EnumValue::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_example_brackets_the_type_name() {
        let schema: Schema = serde_json::from_value(json!({ "type": "string" })).unwrap();
        assert_eq!(required_example(&schema), "[string]");
    }

    #[test]
    fn required_example_lists_enum_values() {
        let schema: Schema =
            serde_json::from_value(json!({ "type": "enum", "values": ["MAN", "WOMAN"] }))
                .unwrap();
        assert_eq!(required_example(&schema), "[MAN | WOMAN]");
    }

    #[test]
    fn required_example_lists_values_for_arrays_of_enum() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "array",
            "items": { "type": "enum", "values": ["A", "B"] },
        }))
        .unwrap();
        assert_eq!(required_example(&schema), "[A | B]");
    }
}
