//! # livemeasure-matrix
//!
//! **Tier 2 (Engine)**
//!
//! Sparse in-memory store of (component, metric) measures for one refresh,
//! tracking which entries changed against their loaded state.
//!
//! ## What belongs here
//! * The `MeasureMatrix` and its current/leak value slots
//! * Change tracking against loaded measures
//!
//! ## What does NOT belong here
//! * Formula evaluation (use livemeasure-formula)
//! * Persistence (the refresh orchestrator flushes `changed()`)

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use livemeasure_types::{Component, ComponentId, Metric, MetricId, PersistedMeasure, Rating};

/// Errors from matrix misuse. These indicate a programming error in the
/// caller (a formula writing a metric that was never loaded), surfaced as
/// typed errors rather than panics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("unknown metric key: {0}")]
    UnknownMetric(String),

    #[error("component not part of this refresh: {0}")]
    UnknownComponent(ComponentId),
}

/// A value written into the matrix: plain numbers, or ratings stored as
/// their ordinal (A=1..E=5).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureValue {
    Number(f64),
    Rating(Rating),
}

impl MeasureValue {
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            MeasureValue::Number(n) => n,
            MeasureValue::Rating(r) => r.as_f64(),
        }
    }
}

impl From<f64> for MeasureValue {
    fn from(n: f64) -> Self {
        MeasureValue::Number(n)
    }
}

impl From<u64> for MeasureValue {
    fn from(n: u64) -> Self {
        MeasureValue::Number(n as f64)
    }
}

impl From<Rating> for MeasureValue {
    fn from(r: Rating) -> Self {
        MeasureValue::Rating(r)
    }
}

/// One measure entry as exposed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub component: ComponentId,
    pub metric_id: MetricId,
    pub metric_key: String,
    pub value: Option<f64>,
    pub leak_value: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Row {
    value: Option<f64>,
    leak_value: Option<f64>,
    loaded_value: Option<f64>,
    loaded_leak_value: Option<f64>,
}

impl Row {
    fn is_changed(&self) -> bool {
        !same_slot(self.value, self.loaded_value) || !same_slot(self.leak_value, self.loaded_leak_value)
    }
}

/// Numeric slot equality; epsilon-tolerant so an idempotent re-computation
/// never produces a spurious write.
fn same_slot(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
        _ => false,
    }
}

/// Sparse, mutable, change-tracked store of per-component-per-metric
/// values for one refresh operation. Owned by exactly one refresh; never
/// shared across projects.
#[derive(Debug, Default)]
pub struct MeasureMatrix {
    metrics_by_key: BTreeMap<String, Metric>,
    metric_keys_by_id: BTreeMap<MetricId, String>,
    component_ids: BTreeSet<ComponentId>,
    rows: BTreeMap<(ComponentId, MetricId), Row>,
    dirty: BTreeSet<(ComponentId, MetricId)>,
}

impl MeasureMatrix {
    /// Build a matrix for a fixed component set and metric set, seeded
    /// from already-persisted measures. Persisted rows referencing a
    /// metric outside `metrics` are ignored (the load planner selects
    /// rows by metric id, so this only happens on caller bugs).
    #[must_use]
    pub fn new(
        components: &[Component],
        metrics: Vec<Metric>,
        persisted: Vec<PersistedMeasure>,
    ) -> Self {
        let mut matrix = MeasureMatrix {
            component_ids: components.iter().map(|c| c.id.clone()).collect(),
            ..MeasureMatrix::default()
        };
        for metric in metrics {
            matrix.metric_keys_by_id.insert(metric.id, metric.key.clone());
            matrix.metrics_by_key.insert(metric.key.clone(), metric);
        }
        for row in persisted {
            if !matrix.metric_keys_by_id.contains_key(&row.metric_id) {
                continue;
            }
            matrix.rows.insert(
                (row.component, row.metric_id),
                Row {
                    value: row.value,
                    leak_value: row.leak_value,
                    loaded_value: row.value,
                    loaded_leak_value: row.leak_value,
                },
            );
        }
        matrix
    }

    /// Metric definition by key, if it was loaded for this refresh.
    #[must_use]
    pub fn metric(&self, key: &str) -> Option<&Metric> {
        self.metrics_by_key.get(key)
    }

    /// Current-slot read.
    #[must_use]
    pub fn value(&self, component: &ComponentId, metric_key: &str) -> Option<f64> {
        let metric = self.metrics_by_key.get(metric_key)?;
        self.rows
            .get(&(component.clone(), metric.id))
            .and_then(|row| row.value)
    }

    /// Leak-slot read.
    #[must_use]
    pub fn leak_value(&self, component: &ComponentId, metric_key: &str) -> Option<f64> {
        let metric = self.metrics_by_key.get(metric_key)?;
        self.rows
            .get(&(component.clone(), metric.id))
            .and_then(|row| row.leak_value)
    }

    /// Current-slot write. A write equal to the loaded value clears the
    /// entry from the changed set.
    pub fn set_value(
        &mut self,
        component: &ComponentId,
        metric_key: &str,
        value: impl Into<MeasureValue>,
    ) -> Result<(), MatrixError> {
        self.write(component, metric_key, value.into(), Slot::Current)
    }

    /// Leak-slot write; change tracking is independent from the current slot.
    pub fn set_leak_value(
        &mut self,
        component: &ComponentId,
        metric_key: &str,
        value: impl Into<MeasureValue>,
    ) -> Result<(), MatrixError> {
        self.write(component, metric_key, value.into(), Slot::Leak)
    }

    fn write(
        &mut self,
        component: &ComponentId,
        metric_key: &str,
        value: MeasureValue,
        slot: Slot,
    ) -> Result<(), MatrixError> {
        let metric = self
            .metrics_by_key
            .get(metric_key)
            .ok_or_else(|| MatrixError::UnknownMetric(metric_key.to_string()))?;
        if !self.component_ids.contains(component) {
            return Err(MatrixError::UnknownComponent(component.clone()));
        }

        let key = (component.clone(), metric.id);
        let row = self.rows.entry(key.clone()).or_default();
        match slot {
            Slot::Current => row.value = Some(value.as_f64()),
            Slot::Leak => row.leak_value = Some(value.as_f64()),
        }
        if row.is_changed() {
            self.dirty.insert(key);
        } else {
            self.dirty.remove(&key);
        }
        Ok(())
    }

    /// All entries whose current or leak value differs from the loaded
    /// state, in deterministic (component, metric) order. Consumed at the
    /// end of a refresh for persistence.
    #[must_use]
    pub fn changed(&self) -> Vec<Measure> {
        self.dirty
            .iter()
            .filter_map(|key| {
                let row = self.rows.get(key)?;
                let metric_key = self.metric_keys_by_id.get(&key.1)?;
                Some(Measure {
                    component: key.0.clone(),
                    metric_id: key.1,
                    metric_key: metric_key.clone(),
                    value: row.value,
                    leak_value: row.leak_value,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Current,
    Leak,
}
