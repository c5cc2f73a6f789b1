//! # livemeasure-issues
//!
//! **Tier 2 (Engine)**
//!
//! Read-only issue statistics for one component, bucketed by leak-period
//! membership. Built once per component before its formula pass.
//!
//! ## What belongs here
//! * The `IssueCounter` and its bucket accessors
//! * The leak cutoff rule for baseline-less projects
//!
//! ## What does NOT belong here
//! * Issue retrieval (the refresh orchestrator owns the issue source)
//! * Metric computation (use livemeasure-formula)

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use livemeasure_types::{IssueGroup, RuleType, Severity};

/// Which time window a query reads: everything, or only issues created
/// inside the leak period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Overall,
    Leak,
}

/// Cutoff timestamp handed to the issue source. Without a baseline every
/// issue is non-leak, so the cutoff is the maximum representable time.
#[must_use]
pub fn leak_cutoff(baseline_ms: Option<i64>) -> i64 {
    baseline_ms.unwrap_or(i64::MAX)
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    unresolved: u64,
    resolved: u64,
    effort_minutes: u64,
}

/// Pre-aggregated issue statistics for one component. Severity and type
/// counts cover unresolved issues only; resolved issues contribute to
/// `count_resolved` and effort sums.
#[derive(Debug, Default)]
pub struct IssueCounter {
    overall: Stats,
    leak: Stats,
}

#[derive(Debug, Default)]
struct Stats {
    by_severity: BTreeMap<Severity, u64>,
    by_type: BTreeMap<RuleType, u64>,
    totals: Totals,
}

impl Stats {
    fn add(&mut self, group: &IssueGroup) {
        if group.resolved {
            self.totals.resolved += group.count;
        } else {
            self.totals.unresolved += group.count;
            *self.by_severity.entry(group.severity).or_default() += group.count;
            *self.by_type.entry(group.rule_type).or_default() += group.count;
        }
        self.totals.effort_minutes += group.effort_minutes;
    }
}

impl IssueCounter {
    /// Aggregate grouped issue rows. Leak groups contribute to both
    /// buckets; the overall bucket always covers every issue.
    #[must_use]
    pub fn new(groups: &[IssueGroup]) -> Self {
        let mut counter = IssueCounter::default();
        for group in groups {
            counter.overall.add(group);
            if group.in_leak {
                counter.leak.add(group);
            }
        }
        counter
    }

    fn stats(&self, bucket: Bucket) -> &Stats {
        match bucket {
            Bucket::Overall => &self.overall,
            Bucket::Leak => &self.leak,
        }
    }

    /// Unresolved issues of the given severity.
    #[must_use]
    pub fn count_by_severity(&self, bucket: Bucket, severity: Severity) -> u64 {
        self.stats(bucket)
            .by_severity
            .get(&severity)
            .copied()
            .unwrap_or(0)
    }

    /// Unresolved issues of the given rule type.
    #[must_use]
    pub fn count_by_type(&self, bucket: Bucket, rule_type: RuleType) -> u64 {
        self.stats(bucket)
            .by_type
            .get(&rule_type)
            .copied()
            .unwrap_or(0)
    }

    /// All unresolved issues.
    #[must_use]
    pub fn count_unresolved(&self, bucket: Bucket) -> u64 {
        self.stats(bucket).totals.unresolved
    }

    /// All resolved issues.
    #[must_use]
    pub fn count_resolved(&self, bucket: Bucket) -> u64 {
        self.stats(bucket).totals.resolved
    }

    /// Unresolved plus resolved.
    #[must_use]
    pub fn total(&self, bucket: Bucket) -> u64 {
        let totals = self.stats(bucket).totals;
        totals.unresolved + totals.resolved
    }

    /// Remediation effort in minutes, resolved and unresolved alike.
    #[must_use]
    pub fn sum_effort(&self, bucket: Bucket) -> u64 {
        self.stats(bucket).totals.effort_minutes
    }
}
