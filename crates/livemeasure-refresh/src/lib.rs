//! # livemeasure-refresh
//!
//! **Tier 4 (Orchestration)**
//!
//! Drives a live-measure refresh: groups touched components by owning
//! project, loads the component tree and supporting context, runs the
//! formula engine bottom-up, re-evaluates the quality gate, flushes
//! changed measures, and emits one change event per project.
//!
//! ## What belongs here
//! * Collaborator traits for tree/measure/issue/gate sources
//! * The `Refresher` driver and its error taxonomy
//! * The `QgChangeEvent` output type
//!
//! ## What does NOT belong here
//! * Storage implementations (bring your own collaborators)
//! * Event transport or notification
//!
//! ## Example
//! ```ignore
//! use livemeasure_formula::FormulaRegistry;
//! use livemeasure_refresh::Refresher;
//!
//! let mut refresher = Refresher::new(tree, store, issues, gates,
//!     FormulaRegistry::issue_formulas());
//! let events = refresher.refresh(&touched_components)?;
//! ```

#![forbid(unsafe_code)]

mod error;
mod event;
mod refresh;
mod sources;

pub use error::RefreshError;
pub use event::QgChangeEvent;
pub use refresh::{Refresher, sort_bottom_up};
pub use sources::{GateSource, IssueSource, MeasureStore, TreeSource};
