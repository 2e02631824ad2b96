//! The capability set every strategy adapter implements, and the outcome
//! type for external-read probes.

use sealcheck_types::{AccessResult, FieldMap, WeakIdentity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of probing a private field through external paths only.
///
/// `Denied` and `Partial` are expected, correct outcomes: the verifier
/// records them, never throws them. `Leaked` means the field was reachable
/// from outside, an encapsulation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "kebab-case")]
pub enum Exposure {
    /// No external reference path reaches the field.
    Denied,
    /// Reachable only through a reflection capability; a weaker guarantee
    /// that must be surfaced, not hidden.
    Partial { via: String },
    /// The field was readable externally.
    Leaked(Value),
}

impl Exposure {
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    #[must_use]
    pub fn is_leaked(&self) -> bool {
        matches!(self, Self::Leaked(_))
    }
}

/// The operations a strategy adapter must support to participate in
/// verification, independent of how the strategy hides state.
///
/// `construct` takes two field maps: the public args become the instance's
/// visible attributes, the private args seed its hidden record per the
/// adapter's blueprint. Public attributes are readable and writable by any
/// holder of the instance; private state is reachable only through
/// accessors.
pub trait PrivateCapable {
    /// The instance representation this strategy produces.
    type Instance;

    /// Builds one instance from public and private constructor args.
    fn construct(
        &self,
        public_args: FieldMap,
        private_args: FieldMap,
    ) -> AccessResult<Self::Instance>;

    /// Reads a public attribute.
    fn read_public(&self, instance: &Self::Instance, field: &str) -> AccessResult<Value>;

    /// Writes a public attribute (creating it if absent).
    fn write_public(
        &self,
        instance: &Self::Instance,
        field: &str,
        value: Value,
    ) -> AccessResult<()>;

    /// Invokes a named accessor with the given arguments.
    fn invoke_accessor(
        &self,
        instance: &Self::Instance,
        name: &str,
        args: &[Value],
    ) -> AccessResult<Value>;

    /// Probes a private field using only externally available paths.
    fn attempt_external_read(&self, instance: &Self::Instance, field: &str) -> Exposure;

    /// A weak handle usable as a reachability proxy for the instance's
    /// private state after the instance is dropped.
    fn leak_probe(&self, instance: &Self::Instance) -> WeakIdentity;

    /// Live records retained by strategy-level storage, when the strategy
    /// has any (the shared table). `None` for per-instance strategies.
    fn retained_records(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exposure_predicates() {
        assert!(Exposure::Denied.is_denied());
        assert!(Exposure::Partial { via: "x".into() }.is_partial());
        assert!(Exposure::Leaked(json!(1)).is_leaked());
        assert!(!Exposure::Denied.is_leaked());
    }

    #[test]
    fn exposure_serde_tags_are_kebab_case() {
        let denied = serde_json::to_value(Exposure::Denied).unwrap();
        assert_eq!(denied, json!({"outcome": "denied"}));

        let partial = serde_json::to_value(Exposure::Partial {
            via: "token reflection".into(),
        })
        .unwrap();
        assert_eq!(
            partial,
            json!({"outcome": "partial", "detail": {"via": "token reflection"}})
        );

        let leaked = serde_json::to_value(Exposure::Leaked(json!(5))).unwrap();
        assert_eq!(leaked, json!({"outcome": "leaked", "detail": 5}));
    }
}
