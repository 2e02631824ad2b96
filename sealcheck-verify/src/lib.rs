//! Scenario verifier for sealcheck.
//!
//! Drives each strategy adapter through the scripted scenario and
//! aggregates the recorded outcomes. The programmatic surface is two
//! functions:
//!
//! - [`verify_all`] — every adapter, deterministic order, summarized
//! - [`verify`] — one adapter selected by name
//!
//! Verification is synchronous and CPU-only; adapters own all of their
//! state, so runs are independent and deterministic.

mod report;
mod scenario;

pub use report::{AdapterSummary, Summary, summarize};
pub use scenario::{Check, Phase, ScenarioResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// The strategies the verifier knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterKind {
    Closure,
    PerInstance,
    Shared,
    UniqueToken,
}

impl AdapterKind {
    /// Every strategy, in verification order.
    pub const ALL: [AdapterKind; 4] = [
        AdapterKind::Closure,
        AdapterKind::PerInstance,
        AdapterKind::Shared,
        AdapterKind::UniqueToken,
    ];

    /// The wire/CLI name of the strategy.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Closure => "closure",
            Self::PerInstance => "per-instance",
            Self::Shared => "shared",
            Self::UniqueToken => "unique-token",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdapterKind {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closure" => Ok(Self::Closure),
            "per-instance" => Ok(Self::PerInstance),
            "shared" => Ok(Self::Shared),
            "unique-token" => Ok(Self::UniqueToken),
            other => Err(VerifyError::UnknownAdapter {
                requested: other.to_string(),
            }),
        }
    }
}

/// Errors surfaced directly to the caller of the entry points.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The requested adapter name is not one of the known strategies.
    #[error(
        "unknown adapter: {requested} (expected one of: closure, per-instance, shared, unique-token)"
    )]
    UnknownAdapter { requested: String },
}

/// Runs the scenario for one adapter kind.
#[must_use]
pub fn verify_kind(kind: AdapterKind) -> ScenarioResult {
    let result = scenario::run(kind);
    info!(
        adapter = %kind,
        checks = result.checks.len(),
        passed = result.checks.iter().filter(|c| c.passed).count(),
        "scenario finished"
    );
    result
}

/// Runs the scenario for the adapter named `name`.
///
/// Fails with [`VerifyError::UnknownAdapter`] unless `name` is one of
/// `closure`, `per-instance`, `shared`, `unique-token`.
pub fn verify(name: &str) -> Result<ScenarioResult, VerifyError> {
    let kind: AdapterKind = name.parse()?;
    Ok(verify_kind(kind))
}

/// Runs every adapter's scenario and returns the aggregated summary.
#[must_use]
pub fn verify_all() -> Summary {
    let results: Vec<ScenarioResult> = AdapterKind::ALL.into_iter().map(verify_kind).collect();
    summarize(&results)
}
