//! # livemeasure-formula
//!
//! **Tier 2 (Engine)**
//!
//! The formula contract and the bottom-up evaluation pass that recomputes
//! issue-derived metrics over a component tree.
//!
//! ## What belongs here
//! * The `Formula` trait and `FormulaRegistry`
//! * The per-invocation `FormulaContext` (current vs. leak slot routing)
//! * The `run_formulas` bottom-up pass
//! * The debt rating grid and the standard issue-count formula set
//!
//! ## What does NOT belong here
//! * Measure storage (use livemeasure-matrix)
//! * Quality gate evaluation (use livemeasure-gate)
//!
//! ## Example
//! ```ignore
//! use livemeasure_formula::{FormulaRegistry, run_formulas, DebtRatingGrid};
//!
//! let registry = FormulaRegistry::issue_formulas();
//! run_formulas(&mut matrix, &components, &registry, baseline, &grid, |c| {
//!     Ok(issue_counter_for(c))
//! })?;
//! ```

#![forbid(unsafe_code)]

mod context;
mod engine;
mod grid;
mod registry;
mod standard;

pub use context::FormulaContext;
pub use engine::{EngineError, run_formulas};
pub use grid::{DebtRatingGrid, GridError};
pub use registry::{Formula, FormulaError, FormulaRegistry};
