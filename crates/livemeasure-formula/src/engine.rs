//! Bottom-up formula pass.

use thiserror::Error;

use livemeasure_issues::IssueCounter;
use livemeasure_matrix::MeasureMatrix;
use livemeasure_types::Component;

use crate::context::FormulaContext;
use crate::grid::DebtRatingGrid;
use crate::registry::{FormulaError, FormulaRegistry};

/// Errors from the formula pass, carrying the offending metric and
/// component for diagnostics.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to compute {metric_key} on {component}: {source}")]
    Compute {
        metric_key: String,
        component: String,
        #[source]
        source: FormulaError,
    },

    #[error("failed to load issues for {component}: {source}")]
    Issues {
        component: String,
        #[source]
        source: FormulaError,
    },
}

/// Run every applicable formula for every component, in the given
/// bottom-up order. The caller provides components sorted leaves-first so
/// parent aggregates see finalized child measures.
///
/// Leak formulas are skipped entirely when `baseline_ms` is `None`; the
/// leak slot is then never written.
///
/// `issues_for` supplies the per-component issue statistics; it is called
/// once per component, before that component's formulas.
pub fn run_formulas<F>(
    matrix: &mut MeasureMatrix,
    components_bottom_up: &[Component],
    registry: &FormulaRegistry,
    baseline_ms: Option<i64>,
    grid: &DebtRatingGrid,
    mut issues_for: F,
) -> Result<(), EngineError>
where
    F: FnMut(&Component) -> Result<IssueCounter, FormulaError>,
{
    let has_baseline = baseline_ms.is_some();

    for component in components_bottom_up {
        let issues = issues_for(component).map_err(|source| EngineError::Issues {
            component: component.key.clone(),
            source,
        })?;

        for formula in registry.iter() {
            if formula.on_leak() && !has_baseline {
                continue;
            }
            let mut ctx = FormulaContext::new(
                matrix,
                component,
                formula.metric_key(),
                formula.on_leak(),
                grid,
            );
            formula
                .compute(&mut ctx, &issues)
                .map_err(|source| EngineError::Compute {
                    metric_key: formula.metric_key().to_string(),
                    component: component.key.clone(),
                    source,
                })?;
        }
    }
    Ok(())
}
