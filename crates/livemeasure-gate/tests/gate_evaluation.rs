//! Deeper tests for gate evaluation: TOML-defined gates against a
//! populated matrix, leak scoping, and threshold semantics.

use livemeasure_gate::{GateDefinition, GateStatus, evaluate_gate};
use livemeasure_matrix::MeasureMatrix;
use livemeasure_types::{Component, Metric, MetricId, MetricKind, Qualifier};

fn project() -> Component {
    Component {
        id: "p1".into(),
        key: "proj".into(),
        qualifier: Qualifier::Project,
        ancestor_ids: vec![],
        project_id: "p1".into(),
    }
}

fn matrix() -> MeasureMatrix {
    let metrics = vec![
        Metric {
            id: MetricId(1),
            key: "bugs".into(),
            kind: MetricKind::Numeric,
        },
        Metric {
            id: MetricId(2),
            key: "new_violations".into(),
            kind: MetricKind::Numeric,
        },
        Metric {
            id: MetricId(3),
            key: "coverage".into(),
            kind: MetricKind::Numeric,
        },
    ];
    let mut matrix = MeasureMatrix::new(&[project()], metrics, vec![]);
    matrix.set_value(&"p1".into(), "bugs", 0.0).unwrap();
    matrix
        .set_leak_value(&"p1".into(), "new_violations", 7.0)
        .unwrap();
    matrix.set_value(&"p1".into(), "coverage", 62.0).unwrap();
    matrix
}

const GATE_TOML: &str = r#"
name = "release"

[[conditions]]
metric_key = "bugs"
op = "gt"
error_threshold = 0

[[conditions]]
metric_key = "new_violations"
op = "gt"
error_threshold = 10
warn_threshold = 5
on_leak = true

[[conditions]]
metric_key = "coverage"
op = "lt"
error_threshold = 50
warn_threshold = 80
"#;

#[test]
fn toml_gate_against_populated_matrix() {
    let gate = GateDefinition::from_toml(GATE_TOML).unwrap();
    let summary = evaluate_gate(&gate, &"p1".into(), &matrix());

    // bugs ok, new_violations warn (7 > 5 but not > 10), coverage warn.
    assert_eq!(summary.status, GateStatus::Warn);
    let statuses: Vec<GateStatus> = summary.results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![GateStatus::Ok, GateStatus::Warn, GateStatus::Warn]
    );
}

#[test]
fn gate_metric_keys_cover_leak_conditions() {
    let gate = GateDefinition::from_toml(GATE_TOML).unwrap();
    let keys = gate.metric_keys();
    assert!(keys.contains("bugs"));
    assert!(keys.contains("new_violations"));
    assert!(keys.contains("coverage"));
    assert_eq!(keys.len(), 3);
}

#[test]
fn leak_condition_ignores_current_slot() {
    let gate = GateDefinition::from_toml(
        r#"
name = "leak-only"

[[conditions]]
metric_key = "new_violations"
op = "gt"
error_threshold = 0
on_leak = true
"#,
    )
    .unwrap();

    // Current slot set, leak slot empty: the condition reads the leak
    // slot and falls back to the missing-measure policy (default error).
    let mut no_leak = MeasureMatrix::new(
        &[project()],
        vec![Metric {
            id: MetricId(2),
            key: "new_violations".into(),
            kind: MetricKind::Numeric,
        }],
        vec![],
    );
    no_leak
        .set_value(&"p1".into(), "new_violations", 0.0)
        .unwrap();

    let summary = evaluate_gate(&gate, &"p1".into(), &no_leak);
    assert_eq!(summary.status, GateStatus::Error);
    assert_eq!(summary.results[0].measured, None);
}

#[test]
fn default_gate_is_empty_and_passes() {
    let gate = GateDefinition::default();
    let summary = evaluate_gate(&gate, &"p1".into(), &matrix());
    assert_eq!(summary.status, GateStatus::Ok);
    assert!(summary.results.is_empty());
}
