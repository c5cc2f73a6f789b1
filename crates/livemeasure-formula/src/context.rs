//! Per-invocation formula context.
//!
//! The context is an explicit value handed to each formula call, binding
//! the current component and target metric for exactly that call. Writes
//! route to the current or leak slot according to the formula's leak flag,
//! so a formula never names its own metric or slot.

use livemeasure_matrix::{MeasureMatrix, MeasureValue};
use livemeasure_types::Component;

use crate::grid::DebtRatingGrid;
use crate::registry::FormulaError;

/// Read/write view of the matrix scoped to one (component, formula) pair.
pub struct FormulaContext<'a> {
    matrix: &'a mut MeasureMatrix,
    component: &'a Component,
    metric_key: &'a str,
    on_leak: bool,
    grid: &'a DebtRatingGrid,
}

impl<'a> FormulaContext<'a> {
    pub(crate) fn new(
        matrix: &'a mut MeasureMatrix,
        component: &'a Component,
        metric_key: &'a str,
        on_leak: bool,
        grid: &'a DebtRatingGrid,
    ) -> Self {
        Self {
            matrix,
            component,
            metric_key,
            on_leak,
            grid,
        }
    }

    /// The component this invocation computes for.
    #[must_use]
    pub fn component(&self) -> &Component {
        self.component
    }

    /// Thresholds for debt-ratio ratings, from project configuration.
    #[must_use]
    pub fn rating_grid(&self) -> &DebtRatingGrid {
        self.grid
    }

    /// Current-slot read of another metric on the bound component.
    /// Descendant values are never read directly; parent formulas see
    /// them only through measures already aggregated bottom-up.
    #[must_use]
    pub fn value(&self, metric_key: &str) -> Option<f64> {
        self.matrix.value(&self.component.id, metric_key)
    }

    /// Write this formula's result. Routed to the leak slot when the
    /// formula is leak-scoped, to the current slot otherwise.
    pub fn set_value(&mut self, value: impl Into<MeasureValue>) -> Result<(), FormulaError> {
        if self.on_leak {
            self.matrix
                .set_leak_value(&self.component.id, self.metric_key, value)?;
        } else {
            self.matrix
                .set_value(&self.component.id, self.metric_key, value)?;
        }
        Ok(())
    }
}
