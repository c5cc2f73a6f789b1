//! Gate definition and outcome types.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from gate definition loading.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("failed to read gate file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse gate TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Gate status, worst-of ordered: OK < WARN < ERROR.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    #[default]
    Ok,
    Warn,
    Error,
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateStatus::Ok => write!(f, "OK"),
            GateStatus::Warn => write!(f, "WARN"),
            GateStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Violation comparator: a condition trips when
/// `measured <comparator> threshold` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Greater than (>)
    #[default]
    Gt,
    /// Less than (<)
    Lt,
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Gt => write!(f, ">"),
            Comparator::Lt => write!(f, "<"),
            Comparator::Eq => write!(f, "=="),
            Comparator::Ne => write!(f, "!="),
        }
    }
}

/// What a condition reports when its metric has no computed value.
/// Fail-closed (`Error`) by default; the gate definition owns this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingMeasurePolicy {
    Ok,
    Warn,
    #[default]
    Error,
}

/// One threshold condition over a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Metric key the condition reads.
    pub metric_key: String,

    /// Violation comparator.
    #[serde(default)]
    pub op: Comparator,

    /// Threshold whose violation rates ERROR.
    pub error_threshold: f64,

    /// Optional softer threshold whose violation rates WARN.
    #[serde(default)]
    pub warn_threshold: Option<f64>,

    /// Read the leak slot instead of the current slot.
    #[serde(default)]
    pub on_leak: bool,
}

/// A quality gate: a set of conditions whose worst evaluation is the
/// project's gate status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateDefinition {
    pub name: String,
    pub conditions: Vec<Condition>,

    /// Policy for conditions whose metric is absent from the matrix.
    pub missing_measure_policy: MissingMeasurePolicy,
}

impl GateDefinition {
    /// Parse a gate definition from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, GateError> {
        Ok(toml::from_str(s)?)
    }

    /// Load a gate definition from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, GateError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// All metric keys the gate reads. The refresh orchestrator loads
    /// these even when no formula targets them.
    #[must_use]
    pub fn metric_keys(&self) -> std::collections::BTreeSet<String> {
        self.conditions
            .iter()
            .map(|c| c.metric_key.clone())
            .collect()
    }
}

/// Evaluation of a single condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub condition: Condition,
    pub status: GateStatus,
    /// The value read from the matrix, if any.
    pub measured: Option<f64>,
}

/// Immutable outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSummary {
    /// Worst status among all conditions.
    pub status: GateStatus,
    pub results: Vec<ConditionResult>,
}

impl GateSummary {
    #[must_use]
    pub fn from_results(results: Vec<ConditionResult>) -> Self {
        let status = results
            .iter()
            .map(|r| r.status)
            .max()
            .unwrap_or(GateStatus::Ok);
        Self { status, results }
    }
}
