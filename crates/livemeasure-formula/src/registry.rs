//! Formula contract and ordered registry.

use std::collections::BTreeSet;

use thiserror::Error;

use livemeasure_issues::IssueCounter;
use livemeasure_matrix::MatrixError;

use crate::context::FormulaContext;
use crate::standard;

/// Errors raised inside a formula computation.
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

impl FormulaError {
    pub fn msg(message: impl Into<String>) -> Self {
        FormulaError::Message(message.into())
    }
}

/// A pure computation producing one metric's value for one component.
///
/// Leak formulas (`on_leak() == true`) write the leak slot and only run
/// when the project's last analysis defines a baseline.
pub trait Formula: Send + Sync {
    /// The metric this formula targets.
    fn metric_key(&self) -> &str;

    /// Whether the result is leak-period-scoped.
    fn on_leak(&self) -> bool {
        false
    }

    /// Compute the value and write it through the context.
    fn compute(
        &self,
        ctx: &mut FormulaContext<'_>,
        issues: &IssueCounter,
    ) -> Result<(), FormulaError>;
}

/// Ordered collection of formulas.
///
/// Execution order within a component is registration order. A formula
/// reading another metric's freshly computed value on the same component
/// must be registered after its producer; the engine does not analyze
/// metric dependencies.
#[derive(Default)]
pub struct FormulaRegistry {
    formulas: Vec<Box<dyn Formula>>,
}

impl FormulaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard issue-metric set: violation counts by severity and
    /// type, technical-debt effort, and their leak-period variants.
    #[must_use]
    pub fn issue_formulas() -> Self {
        let mut registry = Self::new();
        for formula in standard::issue_formulas() {
            registry.formulas.push(formula);
        }
        registry
    }

    pub fn register(&mut self, formula: impl Formula + 'static) {
        self.formulas.push(Box::new(formula));
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Formula> {
        self.formulas.iter().map(Box::as_ref)
    }

    /// All metric keys any registered formula targets; the load planner
    /// unions these with the gate's keys.
    #[must_use]
    pub fn metric_keys(&self) -> BTreeSet<String> {
        self.formulas
            .iter()
            .map(|f| f.metric_key().to_string())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}
