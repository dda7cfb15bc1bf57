//! One bounded-lifetime analysis run.
//!
//! A `Session` owns a freshly compiled validator tree and drives it over a
//! stream of inputs sharing one schema. `track()` validates a single input
//! and feeds the aggregators; `end()` drains them into the final `Report`.
//! Sessions move through exactly two states, `Active` then `Ended`, and the
//! transition is one-way: tracking after `end()` is a configuration error,
//! while repeated `end()` calls return the cached report unchanged.
//!
//! `&mut self` on both operations gives the single-threaded contract for
//! free — a session's aggregator state is plain maps and counters with no
//! internal locking, serialized by the borrow checker. Independent sessions
//! over the same tracker share nothing mutable.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};
use uuid::Uuid;

use driftwatch_contracts::{
    InputId, Issue, IssueKind, Namespace, Report, ReportMetadata, Schema, TrackReport,
    TrackerError, TrackerResult,
};
use serde_json::Value;

use crate::validator::{
    compile, identifier::IdentifierValidator, CompileCx, NodeValidator,
};

/// Per-session switches.
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Enable the drift aggregators (presence, single-value, enum usage).
    pub inspect: bool,
    /// Additionally collect statistical informers. Only meaningful when
    /// `inspect` is on.
    pub info_values: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            inspect: true,
            info_values: false,
        }
    }
}

/// A session-scoped analyzer over one schema.
///
/// Created by [`Tracker::session`](crate::Tracker::session); dropped (or
/// simply left alone) after `end()`.
pub struct Session {
    id: Uuid,
    root: NodeValidator,
    identifier: Option<IdentifierValidator>,
    identifier_property: Option<String>,
    /// `(property, kind)` pairs already reported, when summary mode is on.
    summary_seen: Option<HashSet<(Namespace, IssueKind)>>,
    object_validator_count: u32,
    property_validator_count: u32,
    started_at: DateTime<Utc>,
    /// `Some` once ended; doubles as the idempotence cache.
    report: Option<Report>,
}

impl Session {
    pub(crate) fn new(
        schema: &Schema,
        identifier_property: Option<&str>,
        summary_result: bool,
        options: SessionOptions,
    ) -> TrackerResult<Self> {
        let mut cx = CompileCx::new(options.inspect, options.inspect && options.info_values);
        let root = compile(schema, Namespace::root(), false, &mut cx)?;

        let identifier = match (identifier_property, schema) {
            (Some(property), Schema::Object(object)) => {
                Some(IdentifierValidator::new(object, property)?)
            }
            _ => None,
        };

        let id = Uuid::new_v4();
        debug!(
            session = %id,
            object_validators = cx.object_validator_count,
            property_validators = cx.property_validator_count,
            "session created"
        );

        Ok(Session {
            id,
            root,
            identifier,
            identifier_property: identifier_property.map(str::to_string),
            summary_seen: summary_result.then(HashSet::new),
            object_validator_count: cx.object_validator_count,
            property_validator_count: cx.property_validator_count,
            started_at: Utc::now(),
            report: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Validate one input and feed the aggregators.
    ///
    /// Every problem comes back as data inside the `TrackReport`; the only
    /// error is calling this after `end()`. A duplicate identifier
    /// short-circuits the whole input with a single `ALREADY_TRACKED` issue.
    pub fn track(&mut self, input: &Value) -> TrackerResult<TrackReport> {
        if self.report.is_some() {
            return Err(TrackerError::SessionEnded);
        }

        let input_id = self
            .identifier_property
            .as_deref()
            .and_then(|property| input.get(property))
            .and_then(InputId::from_value);

        if let Some(identifier) = &mut self.identifier {
            if let Some(issue) = identifier.check(input) {
                let properties = self.filter_summary(vec![issue]);
                return Ok(TrackReport::new(input_id, properties));
            }
        }

        let mut issues = Vec::new();
        self.root.validate(Some(input), &mut issues);
        trace!(session = %self.id, issues = issues.len(), "input tracked");

        let properties = self.filter_summary(issues);
        Ok(TrackReport::new(input_id, properties))
    }

    /// End the session and drain the aggregators into the final report.
    /// Idempotent: every call returns the same cached report.
    pub fn end(&mut self) -> Report {
        if let Some(report) = &self.report {
            return report.clone();
        }

        let mut properties = Vec::new();
        let mut informations = Vec::new();
        self.root.finish(&mut properties, &mut informations);
        informations.sort_by_cached_key(|informer| informer.property.sort_key());

        let ended_at = Utc::now();
        let report = Report {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                object_validator_count: self.object_validator_count,
                property_validator_count: self.property_validator_count,
            },
            started_at: self.started_at,
            ended_at,
            duration_ms: (ended_at - self.started_at).num_milliseconds(),
            success: properties.is_empty(),
            properties,
            informations,
        };

        debug!(
            session = %self.id,
            success = report.success,
            issues = report.properties.len(),
            informations = report.informations.len(),
            "session ended"
        );

        self.report = Some(report.clone());
        report
    }

    /// In summary mode, keep only the first occurrence of each
    /// `(property, kind)` pair across the whole session.
    fn filter_summary(&mut self, issues: Vec<Issue>) -> Vec<Issue> {
        let Some(seen) = &mut self.summary_seen else {
            return issues;
        };
        issues
            .into_iter()
            .filter(|issue| seen.insert((issue.property.clone(), issue.kind)))
            .collect()
    }
}
