//! The refresh driver.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info_span};

use livemeasure_formula::{DebtRatingGrid, FormulaError, FormulaRegistry, run_formulas};
use livemeasure_gate::evaluate_gate;
use livemeasure_issues::{IssueCounter, leak_cutoff};
use livemeasure_matrix::MeasureMatrix;
use livemeasure_types::{Component, ComponentId, MetricId, ProjectId};

use crate::error::RefreshError;
use crate::event::QgChangeEvent;
use crate::sources::{GateSource, IssueSource, MeasureStore, TreeSource};

/// Top-level driver binding the formula registry to a set of
/// collaborators. One instance can serve many refresh calls; each call's
/// per-project state (matrix, counters) is created and dropped inside it.
pub struct Refresher<T, M, I, G> {
    tree: T,
    store: M,
    issues: I,
    gates: G,
    registry: FormulaRegistry,
}

impl<T, M, I, G> Refresher<T, M, I, G>
where
    T: TreeSource,
    M: MeasureStore,
    I: IssueSource,
    G: GateSource,
{
    pub fn new(tree: T, store: M, issues: I, gates: G, registry: FormulaRegistry) -> Self {
        Self {
            tree,
            store,
            issues,
            gates,
            registry,
        }
    }

    /// Refresh every project touched by `batch` and return one change
    /// event per project that had a last analysis.
    ///
    /// Projects are processed independently in deterministic id order;
    /// the first failing project stops the call, but persistence for a
    /// failing project never happens (the flush is the final step of its
    /// refresh), and earlier projects in the batch are already complete.
    /// Callers wanting full isolation submit per-project batches.
    pub fn refresh(&mut self, batch: &[Component]) -> Result<Vec<QgChangeEvent>, RefreshError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_project: BTreeMap<ProjectId, Vec<&Component>> = BTreeMap::new();
        for component in batch {
            by_project
                .entry(component.project_id.clone())
                .or_default()
                .push(component);
        }

        let mut events = Vec::with_capacity(by_project.len());
        for (project_id, touched) in by_project {
            let span = info_span!("refresh_project", project = %project_id);
            let _guard = span.enter();
            if let Some(event) = self.refresh_project(&project_id, &touched)? {
                events.push(event);
            }
        }
        Ok(events)
    }

    fn refresh_project(
        &mut self,
        project_id: &ProjectId,
        touched: &[&Component],
    ) -> Result<Option<QgChangeEvent>, RefreshError> {
        // Touched components plus all their ancestors, deduplicated.
        let mut ids: BTreeSet<ComponentId> = BTreeSet::new();
        for component in touched {
            ids.insert(component.id.clone());
            ids.extend(component.ancestor_ids.iter().cloned());
        }

        let mut components = self
            .tree
            .components(&ids)
            .map_err(RefreshError::source_stage("loading component tree"))?;
        sort_bottom_up(&mut components);

        let project = components
            .iter()
            .find(|c| c.is_root_project())
            .cloned()
            .ok_or(RefreshError::MissingProject)?;

        let Some(analysis) = self
            .tree
            .last_analysis(project_id)
            .map_err(RefreshError::source_stage("loading last analysis"))?
        else {
            debug!("project was never analyzed, nothing to refresh");
            return Ok(None);
        };
        let baseline = analysis.period_date_ms;

        let branch = self
            .tree
            .branch(project_id)
            .map_err(RefreshError::source_stage("loading branch"))?
            .ok_or_else(|| RefreshError::MissingBranch(project_id.clone()))?;

        let gate = self
            .gates
            .gate(project_id, &branch)
            .map_err(RefreshError::source_stage("loading quality gate"))?;
        let config = self
            .gates
            .project_config(project_id)
            .map_err(RefreshError::source_stage("loading project config"))?;
        let grid = DebtRatingGrid::from_config(&config)?;

        // Load every metric any formula or gate condition reads.
        let mut metric_keys = self.registry.metric_keys();
        metric_keys.extend(gate.metric_keys());
        let metrics = self
            .store
            .metrics(&metric_keys)
            .map_err(RefreshError::source_stage("loading metrics"))?;
        let metric_ids: Vec<MetricId> = metrics.iter().map(|m| m.id).collect();
        let persisted = self
            .store
            .measures(&ids, &metric_ids)
            .map_err(RefreshError::source_stage("loading measures"))?;

        let mut matrix = MeasureMatrix::new(&components, metrics, persisted);

        let cutoff = leak_cutoff(baseline);
        let issue_source = &self.issues;
        run_formulas(
            &mut matrix,
            &components,
            &self.registry,
            baseline,
            &grid,
            |component| {
                let groups = issue_source
                    .issue_groups(&component.id, cutoff)
                    .map_err(|e| FormulaError::msg(format!("{e:#}")))?;
                Ok(IssueCounter::new(&groups))
            },
        )?;

        let summary = evaluate_gate(&gate, &project.id, &matrix);

        let changed = matrix.changed();
        debug!(
            changed = changed.len(),
            status = %summary.status,
            "formula pass complete"
        );
        if !changed.is_empty() {
            self.store
                .save_measures(project_id, &changed)
                .map_err(RefreshError::source_stage("persisting measures"))?;
        }

        Ok(Some(QgChangeEvent::new(
            project, branch, analysis, config, summary,
        )))
    }
}

/// Sort leaves-first by qualifier rank, with a stable id tiebreak so the
/// pass order is deterministic. Ancestry always crosses qualifier ranks,
/// so every descendant is fully processed before its ancestors.
pub fn sort_bottom_up(components: &mut [Component]) {
    components.sort_by(|a, b| {
        a.qualifier
            .bottom_up_rank()
            .cmp(&b.qualifier.bottom_up_rank())
            .then_with(|| a.id.cmp(&b.id))
    });
}
