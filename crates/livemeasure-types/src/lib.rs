//! # livemeasure-types
//!
//! **Tier 1 (Contract)**
//!
//! Pure data structures shared by the livemeasure refresh pipeline.
//! No I/O or business logic.
//!
//! ## What belongs here
//! * Component tree and metric identity types
//! * Rating ordinals and issue grouping rows
//! * Snapshot/branch/config records handed over by collaborators
//!
//! ## What does NOT belong here
//! * Measure storage or change tracking (use livemeasure-matrix)
//! * Formula or gate evaluation logic

#![forbid(unsafe_code)]

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a single component (file, directory, module, project).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of the project that owns a component subtree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Numeric identifier of a metric in the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(pub u32);

/// Kind of a component, used only for bottom-up ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    File,
    UnitTestFile,
    Directory,
    Module,
    SubProject,
    Project,
}

impl Qualifier {
    /// Fixed total order for the formula pass: leaves first, project last.
    #[must_use]
    pub fn bottom_up_rank(self) -> u8 {
        match self {
            Qualifier::File => 0,
            Qualifier::UnitTestFile => 1,
            Qualifier::Directory => 2,
            Qualifier::Module => 3,
            Qualifier::SubProject => 4,
            Qualifier::Project => 5,
        }
    }
}

/// One node of the component tree, as returned by the tree source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    /// Human-readable key for diagnostics (path-like).
    pub key: String,
    pub qualifier: Qualifier,
    /// Ancestor ids from root to parent, excluding self.
    pub ancestor_ids: Vec<ComponentId>,
    pub project_id: ProjectId,
}

impl Component {
    /// The unique root of a refresh batch: a project with no parent.
    #[must_use]
    pub fn is_root_project(&self) -> bool {
        self.qualifier == Qualifier::Project && self.ancestor_ids.is_empty()
    }
}

/// Value type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Numeric,
    Rating,
}

/// A metric definition, loaded by stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub id: MetricId,
    pub key: String,
    pub kind: MetricKind,
}

/// Errors from rating ordinal conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating ordinal out of range (expected 1..=5): {0}")]
    OutOfRange(i64),
}

/// Ordinal quality rating, A (best) through E (worst).
///
/// Stored and persisted as its ordinal (A=1..E=5) so ratings compare and
/// aggregate like any other numeric measure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rating {
    A = 1,
    B = 2,
    C = 3,
    D = 4,
    E = 5,
}

impl Rating {
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: i64) -> Result<Self, RatingError> {
        match ordinal {
            1 => Ok(Rating::A),
            2 => Ok(Rating::B),
            3 => Ok(Rating::C),
            4 => Ok(Rating::D),
            5 => Ok(Rating::E),
            other => Err(RatingError::OutOfRange(other)),
        }
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.ordinal())
    }

    /// The worse of two ratings (E is worst).
    #[must_use]
    pub fn worst(self, other: Rating) -> Rating {
        self.max(other)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
            Rating::E => "E",
        };
        f.write_str(letter)
    }
}

/// Issue severity, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

/// Issue rule type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    CodeSmell,
    Bug,
    Vulnerability,
}

/// Pre-grouped issue statistics for one component, as returned by the
/// issue source. `in_leak` is true when every issue in the group was
/// created at or after the leak-period cutoff handed to the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueGroup {
    pub rule_type: RuleType,
    pub severity: Severity,
    pub resolved: bool,
    pub in_leak: bool,
    pub count: u64,
    /// Remediation effort in minutes, summed over the group.
    #[serde(default)]
    pub effort_minutes: u64,
}

/// A measure row as loaded from (and flushed back to) the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedMeasure {
    pub component: ComponentId,
    pub metric_id: MetricId,
    pub value: Option<f64>,
    pub leak_value: Option<f64>,
}

/// The last analysis snapshot of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub uuid: String,
    /// Start of the leak period, epoch milliseconds. Absent when the
    /// analysis defines no baseline; leak semantics are then disabled.
    pub period_date_ms: Option<i64>,
}

/// The branch a project refresh applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub uuid: String,
    pub key: String,
    #[serde(default)]
    pub is_main: bool,
}

/// Errors from project configuration parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Effective project configuration used during a refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Ascending debt-ratio thresholds for ratings B..E.
    pub rating_grid: Vec<f64>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            rating_grid: vec![0.05, 0.1, 0.2, 0.5],
        }
    }
}

impl ProjectConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
