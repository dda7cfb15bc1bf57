//! Object validation: declared children plus unknown-key detection.

use driftwatch_contracts::{
    schema::ObjectSchema, Informer, Issue, IssueKind, Namespace, TrackerResult,
};
use serde_json::Value;

use super::{compile, CompileCx, NodeValidator};

/// A compiled validator for one object node. Issues from children
/// accumulate — object validation never aborts early.
#[derive(Debug)]
pub(crate) struct ObjectValidator {
    namespace: Namespace,
    /// One compiled validator per declared property, in name order.
    children: Vec<(String, NodeValidator)>,
}

impl ObjectValidator {
    pub(crate) fn compile(
        schema: &ObjectSchema,
        namespace: Namespace,
        cx: &mut CompileCx,
    ) -> TrackerResult<Self> {
        cx.object_validator_count += 1;

        let children = schema
            .properties
            .iter()
            .map(|(name, child)| {
                let validator = compile(
                    child,
                    namespace.child(name),
                    schema.required.contains(name),
                    cx,
                )?;
                Ok((name.clone(), validator))
            })
            .collect::<TrackerResult<Vec<_>>>()?;

        Ok(ObjectValidator {
            namespace,
            children,
        })
    }

    /// Validate every declared child against its input field (absent when
    /// the key is missing) and flag undeclared keys. A null or missing
    /// object produces no issues; a non-object input exposes all its
    /// required children as missing.
    pub(crate) fn validate(&mut self, value: Option<&Value>, out: &mut Vec<Issue>) {
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => return,
        };
        let fields = value.as_object();

        for (name, child) in &mut self.children {
            child.validate(fields.and_then(|f| f.get(name.as_str())), out);
        }

        if let Some(fields) = fields {
            for (key, field) in fields {
                if self.children.iter().any(|(name, _)| name == key) {
                    continue;
                }
                out.push(
                    Issue::new(
                        self.namespace.child(key),
                        IssueKind::Unknown,
                        "unknown property",
                    )
                    .with_example(field.clone()),
                );
            }
        }
    }

    pub(crate) fn finish(&self, issues: &mut Vec<Issue>, informations: &mut Vec<Informer>) {
        for (_, child) in &self.children {
            child.finish(issues, informations);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_contracts::Schema;
    use serde_json::json;

    fn compile_object(schema: serde_json::Value) -> ObjectValidator {
        let schema: Schema = serde_json::from_value(schema).unwrap();
        let Schema::Object(object) = schema else {
            panic!("fixture must be an object schema");
        };
        let mut cx = CompileCx::new(false, false);
        ObjectValidator::compile(&object, Namespace::root(), &mut cx).unwrap()
    }

    fn person_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "number" },
            },
        })
    }

    #[test]
    fn valid_input_produces_no_issues() {
        let mut validator = compile_object(person_schema());
        let mut out = Vec::new();
        validator.validate(Some(&json!({ "name": "Jean", "age": 35 })), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_keys_are_flagged_with_their_value() {
        let mut validator = compile_object(person_schema());
        let mut out = Vec::new();
        validator.validate(Some(&json!({ "name": "Jean", "extra": true })), &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].property.as_str(), "extra");
        assert_eq!(out[0].kind, IssueKind::Unknown);
        assert_eq!(out[0].description, "unknown property");
        assert_eq!(out[0].example, Some(json!(true)));
    }

    #[test]
    fn issues_accumulate_across_children() {
        let mut validator = compile_object(person_schema());
        let mut out = Vec::new();
        validator.validate(Some(&json!({ "age": "old", "extra": 1 })), &mut out);

        let kinds: Vec<IssueKind> = out.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::Type, IssueKind::Required, IssueKind::Unknown]
        );
    }

    #[test]
    fn null_object_produces_no_issues() {
        let mut validator = compile_object(person_schema());
        let mut out = Vec::new();
        validator.validate(Some(&json!(null)), &mut out);
        validator.validate(None, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn non_object_input_exposes_required_children() {
        let mut validator = compile_object(person_schema());
        let mut out = Vec::new();
        validator.validate(Some(&json!(42)), &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].property.as_str(), "name");
        assert_eq!(out[0].kind, IssueKind::Required);
    }

    #[test]
    fn nested_namespaces_are_dot_joined() {
        let mut validator = compile_object(json!({
            "type": "object",
            "properties": {
                "info": {
                    "type": "object",
                    "required": ["gender"],
                    "properties": { "gender": { "type": "string" } },
                },
            },
        }));

        let mut out = Vec::new();
        validator.validate(Some(&json!({ "info": {} })), &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].property.as_str(), "info.gender");
    }
}
