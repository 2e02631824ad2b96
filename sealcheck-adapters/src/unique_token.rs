//! Unique-token keyed slots.
//!
//! Private fields live on the same slot table as public fields, but keyed
//! by a random token instead of a name. Ordinary enumeration lists named
//! slots only, so the private fields never appear. The catch: a reflection
//! capability that lists token slots exists ([`TokenInstance::reflect_token_slots`]),
//! and tokens carry a human-readable label. Probes that consult it get the
//! value's location, which is why this strategy reports
//! [`Exposure::Partial`] rather than full denial.

use crate::blueprint::Blueprint;
use crate::capability::{Exposure, PrivateCapable};
use sealcheck_types::{
    AccessError, AccessResult, FieldMap, Identity, WeakIdentity,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// A unique, unguessable slot key with a descriptive label.
///
/// Random (v4) rather than time-ordered: the token must not be derivable
/// from construction order. Identity is the UUID; the label is the
/// symbol-description analog and takes no part in equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenKey {
    id: Uuid,
    label: String,
}

impl TokenKey {
    /// Creates a fresh token with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    /// The descriptive label (not unique, not an identifier).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Key of one slot on an instance's record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SlotKey {
    Name(String),
    Token(TokenKey),
}

/// Strategy adapter keying private fields by unique tokens.
///
/// The token registry maps (definition level, field name) to the token all
/// instances of the definition share, the way module-level symbols would.
#[derive(Debug)]
pub struct UniqueTokenAdapter {
    blueprint: Arc<Blueprint>,
    tokens: Mutex<BTreeMap<(String, String), TokenKey>>,
}

/// An instance storing public and private fields on one slot table.
pub struct TokenInstance {
    identity: Identity,
    slots: Mutex<BTreeMap<SlotKey, Value>>,
}

impl TokenInstance {
    fn slots(&self) -> MutexGuard<'_, BTreeMap<SlotKey, Value>> {
        self.slots.lock().expect("slot table lock poisoned")
    }

    /// Ordinary enumeration: named slots only, tokens never appear.
    #[must_use]
    pub fn named_slots(&self) -> Vec<String> {
        self.slots()
            .keys()
            .filter_map(|key| match key {
                SlotKey::Name(name) => Some(name.clone()),
                SlotKey::Token(_) => None,
            })
            .collect()
    }

    /// The reflection capability: every token slot with its value.
    ///
    /// This is the documented weaker guarantee of the strategy. Anything
    /// holding the instance can call this and see where private values
    /// live.
    #[must_use]
    pub fn reflect_token_slots(&self) -> Vec<(TokenKey, Value)> {
        self.slots()
            .iter()
            .filter_map(|(key, value)| match key {
                SlotKey::Token(token) => Some((token.clone(), value.clone())),
                SlotKey::Name(_) => None,
            })
            .collect()
    }
}

impl UniqueTokenAdapter {
    #[must_use]
    pub fn new(blueprint: Arc<Blueprint>) -> Self {
        Self {
            blueprint,
            tokens: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the definition-wide token for a level's field, minting one
    /// on first use.
    fn token_for(&self, level: &str, field: &str) -> TokenKey {
        self.tokens
            .lock()
            .expect("token registry lock poisoned")
            .entry((level.to_string(), field.to_string()))
            .or_insert_with(|| TokenKey::new(field))
            .clone()
    }

    /// Materializes one level's private fields from the instance's token
    /// slots.
    fn level_fields(&self, instance: &TokenInstance, level: &str) -> FieldMap {
        let tokens = self.tokens.lock().expect("token registry lock poisoned");
        let slots = instance.slots();
        tokens
            .iter()
            .filter(|((lvl, _), _)| lvl == level)
            .filter_map(|((_, field), token)| {
                slots
                    .get(&SlotKey::Token(token.clone()))
                    .map(|value| (field.clone(), value.clone()))
            })
            .collect()
    }

    /// Writes a level's (possibly mutated) fields back into token slots.
    fn store_level_fields(
        &self,
        instance: &TokenInstance,
        level: &str,
        before: &[String],
        fields: FieldMap,
    ) {
        for name in before {
            if !fields.contains_key(name) {
                let token = self.token_for(level, name);
                instance.slots().remove(&SlotKey::Token(token));
            }
        }
        for (name, value) in fields {
            let token = self.token_for(level, &name);
            instance.slots().insert(SlotKey::Token(token), value);
        }
    }
}

impl PrivateCapable for UniqueTokenAdapter {
    type Instance = TokenInstance;

    fn construct(
        &self,
        public_args: FieldMap,
        private_args: FieldMap,
    ) -> AccessResult<Self::Instance> {
        let mut slots = BTreeMap::new();
        for (name, value) in public_args {
            slots.insert(SlotKey::Name(name), value);
        }
        for level in self.blueprint.levels() {
            for (field, value) in level.init_fields(&private_args) {
                let token = self.token_for(level.name(), &field);
                slots.insert(SlotKey::Token(token), value);
            }
        }

        Ok(TokenInstance {
            identity: Identity::new(),
            slots: Mutex::new(slots),
        })
    }

    fn read_public(&self, instance: &Self::Instance, field: &str) -> AccessResult<Value> {
        instance
            .slots()
            .get(&SlotKey::Name(field.to_string()))
            .cloned()
            .ok_or_else(|| AccessError::UnknownPublicField(field.to_string()))
    }

    fn write_public(
        &self,
        instance: &Self::Instance,
        field: &str,
        value: Value,
    ) -> AccessResult<()> {
        instance.slots().insert(SlotKey::Name(field.to_string()), value);
        Ok(())
    }

    fn invoke_accessor(
        &self,
        instance: &Self::Instance,
        name: &str,
        args: &[Value],
    ) -> AccessResult<Value> {
        // Most-derived level wins, as with the other strategies.
        let levels = self.blueprint.levels();
        let (level, accessor) = levels
            .iter()
            .rev()
            .find_map(|level| {
                level
                    .accessors()
                    .iter()
                    .find(|a| a.name() == name)
                    .map(|a| (*level, a))
            })
            .ok_or_else(|| AccessError::UnknownAccessor(name.to_string()))?;

        let mut fields = self.level_fields(instance, level.name());
        let before: Vec<String> = fields.keys().cloned().collect();
        let result = (accessor.body())(&mut fields, args);
        self.store_level_fields(instance, level.name(), &before, fields);
        result
    }

    fn attempt_external_read(&self, instance: &Self::Instance, field: &str) -> Exposure {
        let slots = instance.slots();
        if let Some(value) = slots.get(&SlotKey::Name(field.to_string())) {
            return Exposure::Leaked(value.clone());
        }
        // Not a property under ordinary enumeration, but the reflection
        // listing pairs each token's label with its slot.
        let reflected = slots
            .keys()
            .any(|key| matches!(key, SlotKey::Token(token) if token.label() == field));
        if reflected {
            Exposure::Partial {
                via: "token reflection".to_string(),
            }
        } else {
            Exposure::Denied
        }
    }

    fn leak_probe(&self, instance: &Self::Instance) -> WeakIdentity {
        instance.identity.downgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_per_mint() {
        let a = TokenKey::new("number");
        let b = TokenKey::new("number");
        assert_ne!(a, b);
        assert_eq!(a.label(), b.label());
    }

    #[test]
    fn token_registry_reuses_per_level_field() {
        let adapter = UniqueTokenAdapter::new(Arc::new(Blueprint::new("thing")));
        let first = adapter.token_for("thing", "number");
        let second = adapter.token_for("thing", "number");
        assert_eq!(first, second);

        let other_level = adapter.token_for("base", "number");
        assert_ne!(first, other_level);
    }
}
