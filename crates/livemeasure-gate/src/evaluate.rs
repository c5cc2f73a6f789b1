//! Gate evaluation against a populated measure matrix.

use livemeasure_matrix::MeasureMatrix;
use livemeasure_types::ComponentId;

use crate::types::{
    Comparator, Condition, ConditionResult, GateDefinition, GateStatus, GateSummary,
    MissingMeasurePolicy,
};

/// Evaluate a gate against the project component's measures in the final
/// matrix. Deterministic: same matrix and definition, same summary.
#[must_use]
pub fn evaluate_gate(
    gate: &GateDefinition,
    project: &ComponentId,
    matrix: &MeasureMatrix,
) -> GateSummary {
    let results = gate
        .conditions
        .iter()
        .map(|condition| evaluate_condition(condition, gate.missing_measure_policy, project, matrix))
        .collect();
    GateSummary::from_results(results)
}

fn evaluate_condition(
    condition: &Condition,
    missing_policy: MissingMeasurePolicy,
    project: &ComponentId,
    matrix: &MeasureMatrix,
) -> ConditionResult {
    let measured = if condition.on_leak {
        matrix.leak_value(project, &condition.metric_key)
    } else {
        matrix.value(project, &condition.metric_key)
    };

    let status = match measured {
        None => match missing_policy {
            MissingMeasurePolicy::Ok => GateStatus::Ok,
            MissingMeasurePolicy::Warn => GateStatus::Warn,
            MissingMeasurePolicy::Error => GateStatus::Error,
        },
        Some(value) => {
            if violates(condition.op, value, condition.error_threshold) {
                GateStatus::Error
            } else if condition
                .warn_threshold
                .is_some_and(|warn| violates(condition.op, value, warn))
            {
                GateStatus::Warn
            } else {
                GateStatus::Ok
            }
        }
    };

    ConditionResult {
        condition: condition.clone(),
        status,
        measured,
    }
}

/// Whether `measured <op> threshold` holds. Equality is epsilon-tolerant
/// so recomputed doubles compare like their persisted form.
fn violates(op: Comparator, measured: f64, threshold: f64) -> bool {
    match op {
        Comparator::Gt => measured > threshold,
        Comparator::Lt => measured < threshold,
        Comparator::Eq => (measured - threshold).abs() < f64::EPSILON,
        Comparator::Ne => (measured - threshold).abs() >= f64::EPSILON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemeasure_types::{Component, Metric, MetricId, MetricKind, Qualifier};

    fn project_component() -> Component {
        Component {
            id: "p1".into(),
            key: "proj".into(),
            qualifier: Qualifier::Project,
            ancestor_ids: vec![],
            project_id: "p1".into(),
        }
    }

    fn matrix_with(value: Option<f64>, leak: Option<f64>) -> MeasureMatrix {
        let mut matrix = MeasureMatrix::new(
            &[project_component()],
            vec![Metric {
                id: MetricId(1),
                key: "bugs".into(),
                kind: MetricKind::Numeric,
            }],
            vec![],
        );
        if let Some(v) = value {
            matrix.set_value(&"p1".into(), "bugs", v).unwrap();
        }
        if let Some(v) = leak {
            matrix.set_leak_value(&"p1".into(), "bugs", v).unwrap();
        }
        matrix
    }

    fn condition(op: Comparator, error: f64, warn: Option<f64>, on_leak: bool) -> Condition {
        Condition {
            metric_key: "bugs".into(),
            op,
            error_threshold: error,
            warn_threshold: warn,
            on_leak,
        }
    }

    fn gate(conditions: Vec<Condition>) -> GateDefinition {
        GateDefinition {
            name: "g".into(),
            conditions,
            missing_measure_policy: MissingMeasurePolicy::default(),
        }
    }

    #[test]
    fn error_threshold_violation_rates_error() {
        let matrix = matrix_with(Some(2.0), None);
        let summary = evaluate_gate(
            &gate(vec![condition(Comparator::Gt, 0.0, None, false)]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Error);
        assert_eq!(summary.results[0].measured, Some(2.0));
    }

    #[test]
    fn warn_threshold_rates_warn_when_error_holds() {
        let matrix = matrix_with(Some(7.0), None);
        let summary = evaluate_gate(
            &gate(vec![condition(Comparator::Gt, 10.0, Some(5.0), false)]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Warn);
    }

    #[test]
    fn passing_condition_rates_ok() {
        let matrix = matrix_with(Some(0.0), None);
        let summary = evaluate_gate(
            &gate(vec![condition(Comparator::Gt, 0.0, None, false)]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Ok);
    }

    #[test]
    fn leak_conditions_read_the_leak_slot() {
        let matrix = matrix_with(Some(9.0), Some(0.0));
        let summary = evaluate_gate(
            &gate(vec![condition(Comparator::Gt, 0.0, None, true)]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Ok);
        assert_eq!(summary.results[0].measured, Some(0.0));
    }

    #[test]
    fn worst_status_wins() {
        let matrix = matrix_with(Some(7.0), None);
        let summary = evaluate_gate(
            &gate(vec![
                condition(Comparator::Gt, 100.0, None, false),      // ok
                condition(Comparator::Gt, 10.0, Some(5.0), false),  // warn
                condition(Comparator::Gt, 0.0, None, false),        // error
            ]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Error);
        let statuses: Vec<GateStatus> = summary.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![GateStatus::Ok, GateStatus::Warn, GateStatus::Error]
        );
    }

    #[test]
    fn missing_measure_follows_policy() {
        let matrix = matrix_with(None, None);
        for (policy, expected) in [
            (MissingMeasurePolicy::Ok, GateStatus::Ok),
            (MissingMeasurePolicy::Warn, GateStatus::Warn),
            (MissingMeasurePolicy::Error, GateStatus::Error),
        ] {
            let mut g = gate(vec![condition(Comparator::Gt, 0.0, None, false)]);
            g.missing_measure_policy = policy;
            let summary = evaluate_gate(&g, &"p1".into(), &matrix);
            assert_eq!(summary.status, expected, "policy {policy:?}");
            assert_eq!(summary.results[0].measured, None);
        }
    }

    #[test]
    fn lt_and_ne_comparators() {
        let matrix = matrix_with(Some(70.0), None);

        // coverage-style: below 80 is a violation
        let summary = evaluate_gate(
            &gate(vec![condition(Comparator::Lt, 80.0, None, false)]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Error);

        let summary = evaluate_gate(
            &gate(vec![condition(Comparator::Ne, 70.0, None, false)]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Ok);
    }

    #[test]
    fn eq_comparator_is_epsilon_tolerant() {
        let matrix = matrix_with(Some(5.0), None);
        let summary = evaluate_gate(
            &gate(vec![condition(Comparator::Eq, 5.0, None, false)]),
            &"p1".into(),
            &matrix,
        );
        assert_eq!(summary.status, GateStatus::Error);
    }
}
