//! Collaborator contracts.
//!
//! The refresh core has no network or file-format boundary of its own;
//! these traits are the seams where persistence, issue retrieval, and
//! gate/config loading plug in. Calls are synchronous and fallible; any
//! retry policy belongs to the implementation, not to this core.

use anyhow::Result;
use std::collections::BTreeSet;

use livemeasure_gate::GateDefinition;
use livemeasure_matrix::Measure;
use livemeasure_types::{
    Branch, Component, ComponentId, IssueGroup, Metric, MetricId, PersistedMeasure, ProjectConfig,
    ProjectId, Snapshot,
};

/// Component tree and analysis history.
pub trait TreeSource {
    /// Resolve components (with qualifier and ancestor path) by id.
    fn components(&self, ids: &BTreeSet<ComponentId>) -> Result<Vec<Component>>;

    /// The project's last analysis snapshot, if it was ever analyzed.
    fn last_analysis(&self, project: &ProjectId) -> Result<Option<Snapshot>>;

    /// The branch the project lives on.
    fn branch(&self, project: &ProjectId) -> Result<Option<Branch>>;
}

/// Metric definitions and persisted measures.
pub trait MeasureStore {
    fn metrics(&self, keys: &BTreeSet<String>) -> Result<Vec<Metric>>;

    fn measures(
        &self,
        components: &BTreeSet<ComponentId>,
        metrics: &[MetricId],
    ) -> Result<Vec<PersistedMeasure>>;

    /// Insert-or-update the changed measures of one project as a single
    /// atomic unit: all commit together, or none do.
    fn save_measures(&mut self, project: &ProjectId, changed: &[Measure]) -> Result<()>;
}

/// Grouped issue statistics per component.
pub trait IssueSource {
    /// Issue groups under `component`, split by leak membership against
    /// `leak_cutoff_ms` (issues created at or after the cutoff are leak).
    fn issue_groups(
        &self,
        component: &ComponentId,
        leak_cutoff_ms: i64,
    ) -> Result<Vec<IssueGroup>>;
}

/// Effective quality gate and project configuration.
pub trait GateSource {
    fn gate(&self, project: &ProjectId, branch: &Branch) -> Result<GateDefinition>;

    fn project_config(&self, project: &ProjectId) -> Result<ProjectConfig>;
}
