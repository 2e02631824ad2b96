//! Aggregation of scenario results.
//!
//! Pure functions of the verifier output; no side effects beyond producing
//! the summary value.

use crate::AdapterKind;
use crate::scenario::ScenarioResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-adapter rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterSummary {
    pub adapter: AdapterKind,
    pub total: usize,
    pub passed: usize,
    /// Failed property names, in scenario order.
    pub failed: Vec<String>,
    /// Properties that held only in weakened form, in scenario order.
    pub weakened: Vec<String>,
}

/// Aggregated outcome of a verification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub adapters: Vec<AdapterSummary>,
    pub total_checks: usize,
    pub total_passed: usize,
}

impl Summary {
    /// True when every check of every adapter passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.total_passed == self.total_checks
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}/{} checks passed across {} adapters",
            self.total_passed,
            self.total_checks,
            self.adapters.len()
        )?;
        for adapter in &self.adapters {
            write!(f, "  {}: {}/{}", adapter.adapter, adapter.passed, adapter.total)?;
            if !adapter.failed.is_empty() {
                write!(f, " failed: {}", adapter.failed.join(", "))?;
            }
            if !adapter.weakened.is_empty() {
                write!(f, " weakened: {}", adapter.weakened.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Rolls scenario results up into a [`Summary`].
#[must_use]
pub fn summarize(results: &[ScenarioResult]) -> Summary {
    let adapters: Vec<AdapterSummary> = results
        .iter()
        .map(|result| AdapterSummary {
            adapter: result.adapter,
            total: result.checks.len(),
            passed: result.checks.iter().filter(|check| check.passed).count(),
            failed: result.failed_properties(),
            weakened: result
                .checks
                .iter()
                .filter(|check| check.weakened)
                .map(|check| check.property.clone())
                .collect(),
        })
        .collect();

    let total_checks = adapters.iter().map(|a| a.total).sum();
    let total_passed = adapters.iter().map(|a| a.passed).sum();

    Summary {
        adapters,
        total_checks,
        total_passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Check;

    fn check(property: &str, passed: bool, weakened: bool) -> Check {
        Check {
            property: property.to_string(),
            passed,
            message: String::new(),
            weakened,
        }
    }

    #[test]
    fn counts_add_up() {
        let results = vec![
            ScenarioResult {
                adapter: AdapterKind::Closure,
                checks: vec![check("a", true, false), check("b", false, false)],
            },
            ScenarioResult {
                adapter: AdapterKind::UniqueToken,
                checks: vec![check("c", true, true)],
            },
        ];

        let summary = summarize(&results);
        assert_eq!(summary.total_checks, 3);
        assert_eq!(summary.total_passed, 2);
        assert!(!summary.all_passed());
        assert_eq!(summary.adapters[0].failed, vec!["b".to_string()]);
        assert_eq!(summary.adapters[1].weakened, vec!["c".to_string()]);
    }

    #[test]
    fn empty_input_is_all_passed() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_checks, 0);
        assert!(summary.all_passed());
    }

    #[test]
    fn display_mentions_failures_and_weakenings() {
        let results = vec![ScenarioResult {
            adapter: AdapterKind::Shared,
            checks: vec![check("no-leak", false, false), check("probe", true, true)],
        }];

        let rendered = summarize(&results).to_string();
        assert!(rendered.contains("shared"));
        assert!(rendered.contains("failed: no-leak"));
        assert!(rendered.contains("weakened: probe"));
    }
}
