//! Line rendering for track and session reports.

use driftwatch_contracts::{Issue, Report, TrackReport};
use serde_json::Value;
use tracing::{info, warn};

/// Cap on issue lines rendered for a single input. Keeps a badly drifted
/// input from flooding the log.
const MAX_ISSUE_LINES: usize = 20;

/// One line per issue: `[id] property description: example`, sorted
/// depth-major by namespace, truncated past [`MAX_ISSUE_LINES`].
pub fn render_track_report(report: &TrackReport) -> Vec<String> {
    let mut issues: Vec<&Issue> = report.properties.iter().collect();
    issues.sort_by_cached_key(|issue| issue.property.sort_key());

    let id = report
        .input_id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut lines: Vec<String> = issues
        .iter()
        .take(MAX_ISSUE_LINES)
        .map(|issue| render_issue(&id, issue))
        .collect();
    if issues.len() > MAX_ISSUE_LINES {
        lines.push(format!("[{id}] ... {} more", issues.len() - MAX_ISSUE_LINES));
    }
    lines
}

fn render_issue(id: &str, issue: &Issue) -> String {
    match &issue.example {
        Some(example) => format!(
            "[{id}] {} {}: {}",
            issue.property,
            issue.description,
            render_value(example)
        ),
        None => format!("[{id}] {} {}", issue.property, issue.description),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render the end-of-session report: a summary line, then one line per
/// drift finding and per informer.
pub fn render_report(report: &Report) -> Vec<String> {
    let mut lines = vec![format!(
        "session {} in {}ms, {} finding(s), {} informer(s)",
        if report.success { "clean" } else { "drifted" },
        report.duration_ms,
        report.properties.len(),
        report.informations.len(),
    )];

    for issue in &report.properties {
        lines.push(render_issue("-", issue));
    }
    for informer in &report.informations {
        let stats = serde_json::to_string(&informer.stats).unwrap_or_default();
        lines.push(format!(
            "[-] {} ({}) {}",
            informer.property, informer.type_name, stats
        ));
    }
    lines
}

/// Log a per-input report. Clean inputs are silent.
pub fn log_track_report(report: &TrackReport) {
    if report.success {
        return;
    }
    for line in render_track_report(report) {
        warn!("{line}");
    }
}

/// Log the end-of-session report. Findings go to `warn`, everything else
/// to `info`.
pub fn log_report(report: &Report) {
    for (index, line) in render_report(report).iter().enumerate() {
        if index > 0 && index <= report.properties.len() {
            warn!("{line}");
        } else {
            info!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_contracts::{InputId, IssueKind, Namespace};
    use serde_json::json;

    fn issue(property: &str, kind: IssueKind, description: &str) -> Issue {
        Issue::new(Namespace::from(property), kind, description)
    }

    #[test]
    fn issues_are_rendered_depth_major() {
        let report = TrackReport::new(
            Some(InputId::Str("abc".to_string())),
            vec![
                issue("info.gender", IssueKind::EnumUnknown, "value not in enum"),
                issue("name", IssueKind::Required, "property is required"),
            ],
        );

        let lines = render_track_report(&report);
        assert_eq!(
            lines,
            vec![
                "[abc] name property is required",
                "[abc] info.gender value not in enum",
            ]
        );
    }

    #[test]
    fn string_examples_are_rendered_bare() {
        let report = TrackReport::new(
            None,
            vec![issue("name", IssueKind::Required, "property is required")
                .with_example(json!("[string]"))],
        );

        let lines = render_track_report(&report);
        assert_eq!(lines, vec!["[-] name property is required: [string]"]);
    }

    #[test]
    fn long_reports_are_truncated() {
        let issues = (0..25)
            .map(|i| issue(&format!("p{i:02}"), IssueKind::Required, "property is required"))
            .collect();
        let report = TrackReport::new(None, issues);

        let lines = render_track_report(&report);
        assert_eq!(lines.len(), MAX_ISSUE_LINES + 1);
        assert_eq!(lines.last().unwrap(), "[-] ... 5 more");
    }

    #[test]
    fn clean_session_report_is_a_single_summary_line() {
        let report = Report {
            metadata: driftwatch_contracts::ReportMetadata {
                version: "0.1.0".to_string(),
                object_validator_count: 1,
                property_validator_count: 2,
            },
            started_at: chrono::Utc::now(),
            ended_at: chrono::Utc::now(),
            duration_ms: 3,
            success: true,
            properties: vec![],
            informations: vec![],
        };

        let lines = render_report(&report);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("session clean in 3ms"));
    }
}
