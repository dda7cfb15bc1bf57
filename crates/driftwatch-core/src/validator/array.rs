//! Array validation: bounds on the array itself, then every element.

use driftwatch_contracts::{schema::ArraySchema, Informer, Issue, Namespace, Schema, TrackerResult};
use serde_json::Value;

use super::leaf::LeafValidator;
use super::{compile, CompileCx, NodeValidator};

/// A compiled validator for one array node. The array value itself runs
/// through a leaf chain (required/type/length bounds/stats); each element is
/// then validated with the items validator under the *same* namespace —
/// element issues are not disambiguated by index.
#[derive(Debug)]
pub(crate) struct ArrayValidator {
    array: LeafValidator,
    items: Box<NodeValidator>,
}

impl ArrayValidator {
    /// The items validator inherits the array's own `required` flag — a
    /// required array with optional items would be contradictory.
    pub(crate) fn compile(
        schema: &Schema,
        array: &ArraySchema,
        namespace: Namespace,
        required: bool,
        cx: &mut CompileCx,
    ) -> TrackerResult<Self> {
        cx.object_validator_count += 1;

        Ok(ArrayValidator {
            array: LeafValidator::compile(schema, namespace.clone(), required, cx)?,
            items: Box::new(compile(&array.items, namespace, required, cx)?),
        })
    }

    pub(crate) fn validate(&mut self, value: Option<&Value>, out: &mut Vec<Issue>) {
        // A bounds violation on the array does not stop element validation;
        // a type mismatch does (the match below sees no array).
        out.extend(self.array.validate(value));

        if let Some(Value::Array(elements)) = value {
            for element in elements {
                self.items.validate(Some(element), out);
            }
        }
    }

    pub(crate) fn finish(&self, issues: &mut Vec<Issue>, informations: &mut Vec<Informer>) {
        self.array.finish(issues, informations);
        self.items.finish(issues, informations);
    }
}
