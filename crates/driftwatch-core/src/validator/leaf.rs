//! The per-leaf check chain.
//!
//! A `LeafValidator` runs a fixed-order, abort-early chain over one scalar
//! (or array-valued) node: required, presence bookkeeping, the optional
//! short-circuit, single-value bookkeeping, the type check, statistical
//! bookkeeping, then the compiled type-specific constraints. Only the first
//! problem per call is reported — a value that is both the wrong type and
//! too long reports `TYPE` alone.

use driftwatch_contracts::{Informer, Issue, IssueKind, Namespace, Schema, TrackerResult};
use serde_json::Value;

use super::aggregate::{EnumUsageState, PresenceState, SingleValueState, StatsState};
use super::checks::{self, array, enums, number, string, Constraint};
use super::CompileCx;

/// The runtime type a leaf demands of its input. Enum and `any` nodes carry
/// no generic type check.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ExpectedType {
    String,
    Number,
    Boolean,
    Array,
}

impl ExpectedType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ExpectedType::String => value.is_string(),
            // `integer` accepts any number here; fractional parts are the
            // INTEGER constraint's concern.
            ExpectedType::Number => value.is_number(),
            ExpectedType::Boolean => value.is_boolean(),
            ExpectedType::Array => value.is_array(),
        }
    }
}

/// A compiled, session-bound validator for one non-object schema node.
#[derive(Debug)]
pub(crate) struct LeafValidator {
    namespace: Namespace,
    type_name: &'static str,
    required: bool,
    required_example: String,
    expected: Option<ExpectedType>,
    constraints: Vec<Constraint>,
    presence: Option<PresenceState>,
    single_value: Option<SingleValueState>,
    enum_usage: Option<EnumUsageState>,
    stats: Option<StatsState>,
}

impl LeafValidator {
    /// Build the chain for `schema`. Fails only on configuration problems
    /// (today: a pattern that does not compile).
    pub(crate) fn compile(
        schema: &Schema,
        namespace: Namespace,
        required: bool,
        cx: &mut CompileCx,
    ) -> TrackerResult<Self> {
        cx.property_validator_count += 1;

        let flags = schema.flags().cloned().unwrap_or_default();
        let info_values = cx.inspect && cx.info_values;

        let (expected, constraints, stats) = match schema {
            Schema::String(s) => (
                Some(ExpectedType::String),
                string::compile(s, &namespace)?,
                info_values.then(|| StatsState::string(required, string::infos(s))),
            ),
            Schema::Number(s) => (
                Some(ExpectedType::Number),
                number::compile(s, false),
                info_values.then(|| StatsState::number(number::infos(s))),
            ),
            Schema::Integer(s) => (
                Some(ExpectedType::Number),
                number::compile(s, true),
                info_values.then(|| StatsState::number(number::infos(s))),
            ),
            Schema::Boolean(_) => (Some(ExpectedType::Boolean), Vec::new(), None),
            Schema::Enum(s) => (
                None,
                vec![Constraint::Enum(s.values.clone())],
                info_values.then(|| StatsState::enumeration(enums::infos(s))),
            ),
            Schema::Array(s) => (
                Some(ExpectedType::Array),
                array::compile(s),
                info_values.then(|| StatsState::array(array::infos(s))),
            ),
            Schema::Any(_) => (None, Vec::new(), None),
            // Objects are handled by the object validator, never here.
            Schema::Object(_) => (None, Vec::new(), None),
        };

        let presence = (cx.inspect && !required && !flags.ignore_unused_property)
            .then(PresenceState::default);

        let simple_scalar = matches!(
            schema,
            Schema::String(_)
                | Schema::Number(_)
                | Schema::Integer(_)
                | Schema::Boolean(_)
                | Schema::Enum(_)
        );
        let single_value = (cx.inspect && required && !flags.ignore_unused_property && simple_scalar)
            .then(SingleValueState::default);

        let enum_usage = match schema {
            Schema::Enum(s) if cx.inspect && !s.ignore_unused_values => {
                Some(EnumUsageState::new(s.values.clone()))
            }
            _ => None,
        };

        Ok(LeafValidator {
            required_example: checks::required_example(schema),
            type_name: schema.type_name(),
            namespace,
            required,
            expected,
            constraints,
            presence,
            single_value,
            enum_usage,
            stats,
        })
    }

    /// Run the chain against one input value (`None` = field missing).
    /// Missing and JSON null are equivalent throughout.
    pub(crate) fn validate(&mut self, value: Option<&Value>) -> Option<Issue> {
        let absent = value.map_or(true, Value::is_null);

        if let Some(presence) = &mut self.presence {
            presence.observe(absent);
        }

        if absent {
            if self.required {
                return Some(
                    Issue::new(
                        self.namespace.clone(),
                        IssueKind::Required,
                        "required property is missing",
                    )
                    .with_example(self.required_example.clone()),
                );
            }
            // Absence of an optional field is never itself an error.
            return None;
        }
        let value = value?;

        if let Some(single_value) = &mut self.single_value {
            single_value.observe(value);
        }

        if let Some(expected) = self.expected {
            if !expected.accepts(value) {
                let rendered = serde_json::to_string(value).unwrap_or_default();
                return Some(
                    Issue::new(
                        self.namespace.clone(),
                        IssueKind::Type,
                        format!("property type is not {}", self.type_name),
                    )
                    .with_example(rendered),
                );
            }
        }

        if let Some(enum_usage) = &mut self.enum_usage {
            enum_usage.observe(value);
        }
        if let Some(stats) = &mut self.stats {
            stats.observe(value);
        }

        self.constraints
            .iter()
            .find_map(|constraint| constraint.check(&self.namespace, value))
    }

    /// Drain the aggregators into end-of-session issues and informers.
    pub(crate) fn finish(&self, issues: &mut Vec<Issue>, informations: &mut Vec<Informer>) {
        if let Some(presence) = &self.presence {
            issues.extend(presence.finish(&self.namespace));
        }
        if let Some(single_value) = &self.single_value {
            issues.extend(single_value.finish(&self.namespace));
        }
        if let Some(enum_usage) = &self.enum_usage {
            issues.extend(enum_usage.finish(&self.namespace));
        }
        if let Some(stats) = &self.stats {
            informations.extend(stats.finish(&self.namespace, self.type_name));
        }
    }
}
