//! # livemeasure-gate
//!
//! **Tier 3 (Policy Evaluation)**
//!
//! Quality gate evaluation over the final measure matrix of a refresh.
//!
//! ## What belongs here
//! * Gate definition types and TOML parsing
//! * Condition evaluation and worst-of status aggregation
//! * The metric-key set a gate depends on
//!
//! ## Example
//! ```ignore
//! use livemeasure_gate::{GateDefinition, evaluate_gate};
//!
//! let gate = GateDefinition::from_file("gate.toml".as_ref())?;
//! let summary = evaluate_gate(&gate, &project_id, &matrix);
//! ```

#![forbid(unsafe_code)]

mod evaluate;
mod types;

pub use evaluate::evaluate_gate;
pub use types::{
    Comparator, Condition, ConditionResult, GateDefinition, GateError, GateStatus, GateSummary,
    MissingMeasurePolicy,
};
