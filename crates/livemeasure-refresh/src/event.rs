//! Per-project change events.

use livemeasure_gate::GateSummary;
use livemeasure_types::{Branch, Component, ProjectConfig, Snapshot};

/// One event per successfully refreshed project. The gate outcome is
/// computed during the refresh but exposed through an accessor so callers
/// that only care about the measure flush never touch it.
#[derive(Debug, Clone)]
pub struct QgChangeEvent {
    pub project: Component,
    pub branch: Branch,
    pub analysis: Snapshot,
    pub config: ProjectConfig,
    gate_summary: GateSummary,
}

impl QgChangeEvent {
    #[must_use]
    pub fn new(
        project: Component,
        branch: Branch,
        analysis: Snapshot,
        config: ProjectConfig,
        gate_summary: GateSummary,
    ) -> Self {
        Self {
            project,
            branch,
            analysis,
            config,
            gate_summary,
        }
    }

    /// Deferred accessor for the quality gate outcome.
    #[must_use]
    pub fn gate_outcome(&self) -> &GateSummary {
        &self.gate_summary
    }
}
