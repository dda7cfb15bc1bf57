//! The validator-tree compiler.
//!
//! `compile` turns a schema node into a session-bound `NodeValidator`,
//! recursively. The session owns its tree outright and builds it eagerly at
//! construction — there is no cross-session cache, so aggregation state can
//! live inline in each node and every node's namespace is fixed at compile
//! time.
//!
//! Two validation styles compose here: leaf chains abort early (one issue
//! per property per call), while object and array validators accumulate
//! everything their children report.

use driftwatch_contracts::{Informer, Issue, Namespace, Schema, TrackerResult};
use serde_json::Value;

pub(crate) mod aggregate;
pub(crate) mod array;
pub(crate) mod checks;
pub(crate) mod identifier;
pub(crate) mod leaf;
pub(crate) mod object;

use array::ArrayValidator;
use leaf::LeafValidator;
use object::ObjectValidator;

/// Compilation context: session-level options plus the construction
/// counters reported in end-of-session metadata.
#[derive(Debug)]
pub(crate) struct CompileCx {
    pub(crate) inspect: bool,
    pub(crate) info_values: bool,
    pub(crate) object_validator_count: u32,
    pub(crate) property_validator_count: u32,
}

impl CompileCx {
    pub(crate) fn new(inspect: bool, info_values: bool) -> Self {
        CompileCx {
            inspect,
            info_values,
            object_validator_count: 0,
            property_validator_count: 0,
        }
    }
}

/// A compiled validator for one schema node.
#[derive(Debug)]
pub(crate) enum NodeValidator {
    Object(ObjectValidator),
    Array(ArrayValidator),
    Leaf(LeafValidator),
}

impl NodeValidator {
    /// Validate one input value (`None` = field missing), appending every
    /// issue found to `out`.
    pub(crate) fn validate(&mut self, value: Option<&Value>, out: &mut Vec<Issue>) {
        match self {
            NodeValidator::Object(object) => object.validate(value, out),
            NodeValidator::Array(array) => array.validate(value, out),
            NodeValidator::Leaf(leaf) => out.extend(leaf.validate(value)),
        }
    }

    /// Drain the subtree's aggregators into end-of-session output.
    pub(crate) fn finish(&self, issues: &mut Vec<Issue>, informations: &mut Vec<Informer>) {
        match self {
            NodeValidator::Object(object) => object.finish(issues, informations),
            NodeValidator::Array(array) => array.finish(issues, informations),
            NodeValidator::Leaf(leaf) => leaf.finish(issues, informations),
        }
    }
}

/// Compile `schema` into a validator rooted at `namespace`. Dispatches on
/// the node tag; cost is O(schema size), paid once per session.
pub(crate) fn compile(
    schema: &Schema,
    namespace: Namespace,
    required: bool,
    cx: &mut CompileCx,
) -> TrackerResult<NodeValidator> {
    match schema {
        Schema::Object(object) => Ok(NodeValidator::Object(ObjectValidator::compile(
            object, namespace, cx,
        )?)),
        Schema::Array(array) => Ok(NodeValidator::Array(ArrayValidator::compile(
            schema, array, namespace, required, cx,
        )?)),
        _ => Ok(NodeValidator::Leaf(LeafValidator::compile(
            schema, namespace, required, cx,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compile_counts_object_and_property_validators() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "list": { "type": "array", "items": { "type": "number" } },
                "info": {
                    "type": "object",
                    "properties": { "gender": { "type": "string" } },
                },
            },
        }))
        .unwrap();

        let mut cx = CompileCx::new(true, true);
        compile(&schema, Namespace::root(), false, &mut cx).unwrap();

        // Root and "info" objects, plus the array node.
        assert_eq!(cx.object_validator_count, 3);
        // "name", "gender", the array itself, and its items leaf.
        assert_eq!(cx.property_validator_count, 4);
    }
}
