//! The structural schema model.
//!
//! A `Schema` describes the expected shape and constraints of one node of an
//! input value. It is produced by an external generator, is immutable for the
//! lifetime of every session that reads it, and is the only input the core
//! consumes — the tracker never mutates or reshapes it.
//!
//! The union is closed: every node carries a `"type"` tag and deserializes
//! into exactly one variant, so the compiler can match exhaustively instead
//! of falling back to a runtime "unknown type" branch.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node of the schema tree.
///
/// `Number` and `Integer` share a payload — the variant itself carries the
/// integer-ness, and the `INTEGER` constraint checks the fractional part
/// separately from the generic type check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Integer(NumberSchema),
    Boolean(BooleanSchema),
    Enum(EnumSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    /// Accept anything, no deep checks. Also covers JSON `null` typed nodes.
    #[serde(rename = "any", alias = "null")]
    Any(AnySchema),
}

impl Schema {
    /// The declared type name, as it appears in issue descriptions and
    /// informer records.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number(_) => "number",
            Schema::Integer(_) => "integer",
            Schema::Boolean(_) => "boolean",
            Schema::Enum(_) => "enum",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::Any(_) => "any",
        }
    }

    /// Per-leaf flags (`id`, `multiple`, `ignore_unused_property`).
    /// Object nodes carry none.
    pub fn flags(&self) -> Option<&LeafFlags> {
        match self {
            Schema::String(s) => Some(&s.flags),
            Schema::Number(s) | Schema::Integer(s) => Some(&s.flags),
            Schema::Boolean(s) => Some(&s.flags),
            Schema::Enum(s) => Some(&s.flags),
            Schema::Array(s) => Some(&s.flags),
            Schema::Any(s) => Some(&s.flags),
            Schema::Object(_) => None,
        }
    }
}

/// Flags shared by every non-object node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeafFlags {
    /// Marks the session-wide identifier property. At most one property in
    /// the whole tree may carry this, and it must be a required string or
    /// number directly under the root.
    #[serde(skip_serializing_if = "is_false")]
    pub id: bool,

    /// On the identifier property: the same id may legitimately appear in
    /// several inputs, so uniqueness tracking is disabled.
    #[serde(skip_serializing_if = "is_false")]
    pub multiple: bool,

    /// Suppress presence/constancy analytics for this node.
    #[serde(skip_serializing_if = "is_false")]
    pub ignore_unused_property: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the value must match. Compiled once per session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(flatten)]
    pub flags: LeafFlags,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberSchema {
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Exclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Exclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<f64>,
    #[serde(flatten)]
    pub flags: LeafFlags,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanSchema {
    #[serde(flatten)]
    pub flags: LeafFlags,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnySchema {
    #[serde(flatten)]
    pub flags: LeafFlags,
}

/// A closed value set over strings and numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumSchema {
    pub values: Vec<EnumValue>,
    /// Suppress the end-of-session `ENUM_VALUES` usage report.
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore_unused_values: bool,
    #[serde(flatten)]
    pub flags: LeafFlags,
}

/// A single declared enum member — a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Str(String),
    Num(serde_json::Number),
}

impl EnumValue {
    /// True when the runtime value equals this declared member.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (EnumValue::Str(s), Value::String(v)) => s == v,
            (EnumValue::Num(n), Value::Number(v)) => n == v,
            _ => false,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Str(s) => f.write_str(s),
            EnumValue::Num(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    /// Declared properties, by name. Input keys outside this map are flagged
    /// as `UNKNOWN`.
    #[serde(default)]
    pub properties: BTreeMap<String, Schema>,
    /// Names of properties that must be present and non-null. Must be a
    /// subset of `properties` — enforced at tracker construction.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArraySchema {
    pub items: Box<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(flatten)]
    pub flags: LeafFlags,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_schema_deserializes_with_constraints() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "string",
            "minLength": 1,
            "maxLength": 8,
            "pattern": "^\\w+$",
        }))
        .unwrap();

        match schema {
            Schema::String(s) => {
                assert_eq!(s.min_length, Some(1));
                assert_eq!(s.max_length, Some(8));
                assert_eq!(s.pattern.as_deref(), Some("^\\w+$"));
                assert!(!s.flags.id);
            }
            other => panic!("expected string schema, got {other:?}"),
        }
    }

    #[test]
    fn integer_and_number_are_distinct_variants() {
        let number: Schema = serde_json::from_value(json!({ "type": "number" })).unwrap();
        let integer: Schema = serde_json::from_value(json!({ "type": "integer" })).unwrap();
        assert_eq!(number.type_name(), "number");
        assert_eq!(integer.type_name(), "integer");
    }

    #[test]
    fn leaf_flags_flatten_into_the_node() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "number",
            "id": true,
            "multiple": true,
        }))
        .unwrap();

        let flags = schema.flags().unwrap();
        assert!(flags.id);
        assert!(flags.multiple);
        assert!(!flags.ignore_unused_property);
    }

    #[test]
    fn enum_values_accept_strings_and_numbers() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "enum",
            "values": ["MAN", "WOMAN", 3],
        }))
        .unwrap();

        match schema {
            Schema::Enum(e) => {
                assert_eq!(e.values.len(), 3);
                assert!(e.values[0].matches(&json!("MAN")));
                assert!(e.values[2].matches(&json!(3)));
                assert!(!e.values[2].matches(&json!("3")));
                assert_eq!(e.values[1].to_string(), "WOMAN");
            }
            other => panic!("expected enum schema, got {other:?}"),
        }
    }

    #[test]
    fn object_schema_round_trips() {
        let input = json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "integer", "minimum": 0.0, "maximum": 99.0 },
            },
        });

        let schema: Schema = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&schema).unwrap(), input);
    }

    #[test]
    fn null_type_is_an_alias_for_any() {
        let schema: Schema = serde_json::from_value(json!({ "type": "null" })).unwrap();
        assert_eq!(schema.type_name(), "any");
    }

    #[test]
    fn nested_arrays_deserialize() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "array",
            "minItems": 1,
            "items": {
                "type": "object",
                "required": ["tag"],
                "properties": { "tag": { "type": "string" } },
            },
        }))
        .unwrap();

        match schema {
            Schema::Array(a) => {
                assert_eq!(a.min_items, Some(1));
                assert_eq!(a.items.type_name(), "object");
            }
            other => panic!("expected array schema, got {other:?}"),
        }
    }
}
