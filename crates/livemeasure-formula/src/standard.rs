//! The standard issue-metric formula set.
//!
//! Each entry is a (metric key, leak flag, selector) row over the
//! component's `IssueCounter`; the table doubles as the default formula
//! registration order.

use livemeasure_issues::{Bucket, IssueCounter};
use livemeasure_types::{RuleType, Severity};

use crate::context::FormulaContext;
use crate::registry::{Formula, FormulaError};

struct IssueCountFormula {
    key: &'static str,
    on_leak: bool,
    select: fn(&IssueCounter, Bucket) -> u64,
}

impl Formula for IssueCountFormula {
    fn metric_key(&self) -> &str {
        self.key
    }

    fn on_leak(&self) -> bool {
        self.on_leak
    }

    fn compute(
        &self,
        ctx: &mut FormulaContext<'_>,
        issues: &IssueCounter,
    ) -> Result<(), FormulaError> {
        let bucket = if self.on_leak {
            Bucket::Leak
        } else {
            Bucket::Overall
        };
        ctx.set_value((self.select)(issues, bucket))?;
        Ok(())
    }
}

fn severity(c: &IssueCounter, bucket: Bucket, s: Severity) -> u64 {
    c.count_by_severity(bucket, s)
}

fn rule_type(c: &IssueCounter, bucket: Bucket, t: RuleType) -> u64 {
    c.count_by_type(bucket, t)
}

pub(crate) fn issue_formulas() -> Vec<Box<dyn Formula>> {
    let rows: Vec<IssueCountFormula> = vec![
        IssueCountFormula {
            key: "violations",
            on_leak: false,
            select: |c, b| c.count_unresolved(b),
        },
        IssueCountFormula {
            key: "blocker_violations",
            on_leak: false,
            select: |c, b| severity(c, b, Severity::Blocker),
        },
        IssueCountFormula {
            key: "critical_violations",
            on_leak: false,
            select: |c, b| severity(c, b, Severity::Critical),
        },
        IssueCountFormula {
            key: "major_violations",
            on_leak: false,
            select: |c, b| severity(c, b, Severity::Major),
        },
        IssueCountFormula {
            key: "minor_violations",
            on_leak: false,
            select: |c, b| severity(c, b, Severity::Minor),
        },
        IssueCountFormula {
            key: "info_violations",
            on_leak: false,
            select: |c, b| severity(c, b, Severity::Info),
        },
        IssueCountFormula {
            key: "bugs",
            on_leak: false,
            select: |c, b| rule_type(c, b, RuleType::Bug),
        },
        IssueCountFormula {
            key: "vulnerabilities",
            on_leak: false,
            select: |c, b| rule_type(c, b, RuleType::Vulnerability),
        },
        IssueCountFormula {
            key: "code_smells",
            on_leak: false,
            select: |c, b| rule_type(c, b, RuleType::CodeSmell),
        },
        IssueCountFormula {
            key: "sqale_index",
            on_leak: false,
            select: |c, b| c.sum_effort(b),
        },
        IssueCountFormula {
            key: "new_violations",
            on_leak: true,
            select: |c, b| c.count_unresolved(b),
        },
        IssueCountFormula {
            key: "new_bugs",
            on_leak: true,
            select: |c, b| rule_type(c, b, RuleType::Bug),
        },
        IssueCountFormula {
            key: "new_vulnerabilities",
            on_leak: true,
            select: |c, b| rule_type(c, b, RuleType::Vulnerability),
        },
        IssueCountFormula {
            key: "new_code_smells",
            on_leak: true,
            select: |c, b| rule_type(c, b, RuleType::CodeSmell),
        },
        IssueCountFormula {
            key: "new_technical_debt",
            on_leak: true,
            select: |c, b| c.sum_effort(b),
        },
    ];
    rows.into_iter()
        .map(|f| Box::new(f) as Box<dyn Formula>)
        .collect()
}
