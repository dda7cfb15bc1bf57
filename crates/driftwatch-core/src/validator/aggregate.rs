//! Session-scoped aggregation state.
//!
//! Each compiled leaf owns the accumulators relevant to its node: presence
//! booleans for optional properties, a capped distinct-value sample for
//! required scalars, the observed enum value set, and the informational
//! statistics. State is mutated as a side effect of validation, never reset
//! mid-session, and drained exactly once when the session ends.

use std::collections::{BTreeMap, BTreeSet};

use driftwatch_contracts::{
    report::{ArrayStats, EnumStats, NumberStats, Stats, StringStats},
    schema::EnumValue,
    Informer, Issue, IssueKind, Namespace,
};
use serde_json::{Map, Value};

/// Tracks whether an optional property was ever null / ever non-null across
/// the session. At drain time, "never null" becomes `ALWAYS_PRESENT` and
/// "never non-null" becomes `NEVER_USED`; a session that never observed the
/// enclosing object emits neither.
#[derive(Debug, Default)]
pub(crate) struct PresenceState {
    observed: u64,
    ever_null: bool,
    ever_non_null: bool,
}

impl PresenceState {
    pub(crate) fn observe(&mut self, absent: bool) {
        self.observed += 1;
        self.ever_null |= absent;
        self.ever_non_null |= !absent;
    }

    pub(crate) fn finish(&self, namespace: &Namespace) -> Option<Issue> {
        if self.observed == 0 {
            return None;
        }
        if !self.ever_null {
            return Some(Issue::new(
                namespace.clone(),
                IssueKind::AlwaysPresent,
                "optional property always present",
            ));
        }
        if !self.ever_non_null {
            return Some(Issue::new(
                namespace.clone(),
                IssueKind::NeverUsed,
                "optional property never used",
            ));
        }
        None
    }
}

/// A bounded sample of distinct observed values for a required scalar.
/// Growth stops at two — "exactly one distinct value" is all the drain rule
/// needs, so this is a sampling cap, not an exhaustive set.
#[derive(Debug, Default)]
pub(crate) struct SingleValueState {
    values: Vec<Value>,
}

impl SingleValueState {
    pub(crate) fn observe(&mut self, value: &Value) {
        if self.values.len() < 2 && !self.values.contains(value) {
            self.values.push(value.clone());
        }
    }

    pub(crate) fn finish(&self, namespace: &Namespace) -> Option<Issue> {
        if self.values.len() != 1 {
            return None;
        }
        Some(
            Issue::new(
                namespace.clone(),
                IssueKind::SingleValue,
                "property always has the same single value",
            )
            .with_example(self.values[0].clone()),
        )
    }
}

/// The full set of enum values exercised during the session. Reported at
/// drain time when it is a non-empty strict subset of the declared set.
#[derive(Debug)]
pub(crate) struct EnumUsageState {
    declared: Vec<EnumValue>,
    used: BTreeSet<String>,
}

impl EnumUsageState {
    pub(crate) fn new(declared: Vec<EnumValue>) -> Self {
        EnumUsageState {
            declared,
            used: BTreeSet::new(),
        }
    }

    pub(crate) fn observe(&mut self, value: &Value) {
        match value {
            Value::String(s) => {
                self.used.insert(s.clone());
            }
            Value::Number(n) => {
                self.used.insert(n.to_string());
            }
            _ => {}
        }
    }

    pub(crate) fn finish(&self, namespace: &Namespace) -> Option<Issue> {
        if self.used.is_empty() {
            return None;
        }
        let unused = self
            .declared
            .iter()
            .any(|declared| !self.used.contains(&declared.to_string()));
        if !unused {
            return None;
        }
        let used = self.used.iter().cloned().collect::<Vec<_>>().join(" | ");
        Some(
            Issue::new(namespace.clone(), IssueKind::EnumValues, "values used")
                .with_example(used),
        )
    }
}

/// Informational statistics for one leaf, plus the declared-constraint echo
/// emitted alongside them. Only built when the session requests info values.
#[derive(Debug)]
pub(crate) struct StatsState {
    kind: StatsKind,
    infos: Map<String, Value>,
}

#[derive(Debug)]
pub(crate) enum StatsKind {
    String {
        count: u64,
        empty: u64,
        not_empty: u64,
        min_length: Option<usize>,
        max_length: Option<usize>,
        /// Empty/non-empty counters only apply to optional properties.
        track_empty: bool,
    },
    Number {
        count: u64,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Array {
        count: u64,
        empty: u64,
        not_empty: u64,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Enum {
        count: u64,
        used: BTreeMap<String, u64>,
    },
}

impl StatsState {
    pub(crate) fn new(kind: StatsKind, infos: Map<String, Value>) -> Self {
        StatsState { kind, infos }
    }

    pub(crate) fn string(required: bool, infos: Map<String, Value>) -> Self {
        StatsState::new(
            StatsKind::String {
                count: 0,
                empty: 0,
                not_empty: 0,
                min_length: None,
                max_length: None,
                track_empty: !required,
            },
            infos,
        )
    }

    pub(crate) fn number(infos: Map<String, Value>) -> Self {
        StatsState::new(
            StatsKind::Number {
                count: 0,
                minimum: None,
                maximum: None,
            },
            infos,
        )
    }

    pub(crate) fn array(infos: Map<String, Value>) -> Self {
        StatsState::new(
            StatsKind::Array {
                count: 0,
                empty: 0,
                not_empty: 0,
                min_items: None,
                max_items: None,
            },
            infos,
        )
    }

    pub(crate) fn enumeration(infos: Map<String, Value>) -> Self {
        StatsState::new(
            StatsKind::Enum {
                count: 0,
                used: BTreeMap::new(),
            },
            infos,
        )
    }

    /// Record one type-checked value.
    pub(crate) fn observe(&mut self, value: &Value) {
        match &mut self.kind {
            StatsKind::String {
                count,
                empty,
                not_empty,
                min_length,
                max_length,
                track_empty,
            } => {
                let Some(text) = value.as_str() else { return };
                let length = text.chars().count();
                *count += 1;
                if *track_empty {
                    if length == 0 {
                        *empty += 1;
                    } else {
                        *not_empty += 1;
                    }
                }
                *min_length = Some(min_length.map_or(length, |m| m.min(length)));
                *max_length = Some(max_length.map_or(length, |m| m.max(length)));
            }
            StatsKind::Number {
                count,
                minimum,
                maximum,
            } => {
                let Some(number) = value.as_f64() else { return };
                *count += 1;
                *minimum = Some(minimum.map_or(number, |m| m.min(number)));
                *maximum = Some(maximum.map_or(number, |m| m.max(number)));
            }
            StatsKind::Array {
                count,
                empty,
                not_empty,
                min_items,
                max_items,
            } => {
                let Some(items) = value.as_array() else { return };
                let length = items.len();
                *count += 1;
                if length == 0 {
                    *empty += 1;
                } else {
                    *not_empty += 1;
                }
                *min_items = Some(min_items.map_or(length, |m| m.min(length)));
                *max_items = Some(max_items.map_or(length, |m| m.max(length)));
            }
            StatsKind::Enum { count, used } => {
                let key = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => return,
                };
                *count += 1;
                *used.entry(key).or_insert(0) += 1;
            }
        }
    }

    /// Reduce to an informer record. Nothing is emitted for a leaf that
    /// never observed a value.
    pub(crate) fn finish(&self, namespace: &Namespace, type_name: &str) -> Option<Informer> {
        let stats = match &self.kind {
            StatsKind::String {
                count,
                empty,
                not_empty,
                min_length,
                max_length,
                ..
            } => {
                if *count == 0 {
                    return None;
                }
                let constant = min_length == max_length;
                Stats::String(StringStats {
                    count: *count,
                    empty: (*empty > 0).then_some(*empty),
                    not_empty: (*not_empty > 0).then_some(*not_empty),
                    length: constant.then(|| min_length.unwrap_or(0)),
                    min_length: (!constant).then(|| min_length.unwrap_or(0)),
                    max_length: (!constant).then(|| max_length.unwrap_or(0)),
                })
            }
            StatsKind::Number {
                count,
                minimum,
                maximum,
            } => {
                if *count == 0 {
                    return None;
                }
                Stats::Number(NumberStats {
                    count: *count,
                    minimum: *minimum,
                    maximum: *maximum,
                })
            }
            StatsKind::Array {
                count,
                empty,
                not_empty,
                min_items,
                max_items,
            } => {
                if *count == 0 {
                    return None;
                }
                let constant = min_items == max_items;
                Stats::Array(ArrayStats {
                    count: *count,
                    empty: (*empty > 0).then_some(*empty),
                    not_empty: (*not_empty > 0).then_some(*not_empty),
                    items: constant.then(|| min_items.unwrap_or(0)),
                    min_items: (!constant).then(|| min_items.unwrap_or(0)),
                    max_items: (!constant).then(|| max_items.unwrap_or(0)),
                })
            }
            StatsKind::Enum { count, used } => {
                if *count == 0 {
                    return None;
                }
                Stats::Enum(EnumStats {
                    count: *count,
                    used: used.clone(),
                })
            }
        };

        Some(Informer {
            property: namespace.clone(),
            type_name: type_name.to_string(),
            stats,
            infos: (!self.infos.is_empty()).then(|| self.infos.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ns() -> Namespace {
        Namespace::from("field")
    }

    #[test]
    fn presence_always_present_when_never_null() {
        let mut state = PresenceState::default();
        state.observe(false);
        state.observe(false);

        let issue = state.finish(&ns()).unwrap();
        assert_eq!(issue.kind, IssueKind::AlwaysPresent);
    }

    #[test]
    fn presence_never_used_when_never_non_null() {
        let mut state = PresenceState::default();
        state.observe(true);
        state.observe(true);

        let issue = state.finish(&ns()).unwrap();
        assert_eq!(issue.kind, IssueKind::NeverUsed);
    }

    #[test]
    fn presence_mixed_usage_emits_nothing() {
        let mut state = PresenceState::default();
        state.observe(true);
        state.observe(false);
        assert!(state.finish(&ns()).is_none());
    }

    #[test]
    fn presence_zero_observations_emits_nothing() {
        let state = PresenceState::default();
        assert!(state.finish(&ns()).is_none());
    }

    #[test]
    fn single_value_fires_on_one_distinct_value() {
        let mut state = SingleValueState::default();
        state.observe(&json!("Kevin"));
        state.observe(&json!("Kevin"));

        let issue = state.finish(&ns()).unwrap();
        assert_eq!(issue.kind, IssueKind::SingleValue);
        assert_eq!(issue.example, Some(json!("Kevin")));
    }

    #[test]
    fn single_value_silent_after_second_distinct_value() {
        let mut state = SingleValueState::default();
        state.observe(&json!("Kevin"));
        state.observe(&json!("Jean"));
        state.observe(&json!("Paul"));
        assert!(state.finish(&ns()).is_none());
    }

    #[test]
    fn enum_usage_reports_strict_subsets_sorted() {
        let declared = vec![
            EnumValue::Str("C".to_string()),
            EnumValue::Str("A".to_string()),
            EnumValue::Str("B".to_string()),
        ];
        let mut state = EnumUsageState::new(declared);
        state.observe(&json!("B"));
        state.observe(&json!("A"));

        let issue = state.finish(&ns()).unwrap();
        assert_eq!(issue.kind, IssueKind::EnumValues);
        assert_eq!(issue.example, Some(json!("A | B")));
    }

    #[test]
    fn enum_usage_silent_when_all_values_exercised() {
        let declared = vec![EnumValue::Str("A".to_string()), EnumValue::Str("B".to_string())];
        let mut state = EnumUsageState::new(declared);
        state.observe(&json!("A"));
        state.observe(&json!("B"));
        assert!(state.finish(&ns()).is_none());
    }

    #[test]
    fn enum_usage_silent_with_no_observations() {
        let state = EnumUsageState::new(vec![EnumValue::Str("A".to_string())]);
        assert!(state.finish(&ns()).is_none());
    }

    #[test]
    fn string_stats_collapse_constant_lengths() {
        let mut state = StatsState::string(false, Map::new());
        state.observe(&json!("abcd"));
        state.observe(&json!("wxyz"));

        let informer = state.finish(&ns(), "string").unwrap();
        match informer.stats {
            Stats::String(s) => {
                assert_eq!(s.count, 2);
                assert_eq!(s.length, Some(4));
                assert_eq!(s.min_length, None);
                assert_eq!(s.not_empty, Some(2));
                assert_eq!(s.empty, None);
            }
            other => panic!("expected string stats, got {other:?}"),
        }
    }

    #[test]
    fn number_stats_track_extrema() {
        let mut state = StatsState::number(Map::new());
        state.observe(&json!(12));
        state.observe(&json!(-3));
        state.observe(&json!(7));

        let informer = state.finish(&ns(), "number").unwrap();
        match informer.stats {
            Stats::Number(s) => {
                assert_eq!(s.count, 3);
                assert_eq!(s.minimum, Some(-3.0));
                assert_eq!(s.maximum, Some(12.0));
            }
            other => panic!("expected number stats, got {other:?}"),
        }
    }

    #[test]
    fn stats_with_no_observations_emit_nothing() {
        let state = StatsState::number(Map::new());
        assert!(state.finish(&ns(), "number").is_none());
    }

    #[test]
    fn enum_stats_build_a_histogram() {
        let mut state = StatsState::enumeration(Map::new());
        state.observe(&json!("MAN"));
        state.observe(&json!("MAN"));
        state.observe(&json!("WOMAN"));

        let informer = state.finish(&ns(), "enum").unwrap();
        match informer.stats {
            Stats::Enum(s) => {
                assert_eq!(s.count, 3);
                assert_eq!(s.used.get("MAN"), Some(&2));
                assert_eq!(s.used.get("WOMAN"), Some(&1));
            }
            other => panic!("expected enum stats, got {other:?}"),
        }
    }
}
