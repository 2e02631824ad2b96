use pretty_assertions::assert_eq;
use sealcheck_adapters::{
    AccessorDef, Blueprint, Exposure, PrivateCapable, UniqueTokenAdapter,
};
use sealcheck_types::{AccessError, FieldMap};
use serde_json::{Value, json};
use std::sync::Arc;

fn counter() -> Arc<Blueprint> {
    Arc::new(
        Blueprint::new("counter")
            .with_init(|args| {
                let initial = args.get("initial").cloned().unwrap_or(json!(0));
                FieldMap::from([("number".to_string(), initial)])
            })
            .with_accessor(AccessorDef::getter("getNumber", "number"))
            .with_accessor(AccessorDef::setter("setNumber", "number")),
    )
}

fn duck() -> Arc<Blueprint> {
    let animal = Arc::new(
        Blueprint::new("animal")
            .with_init(|args| {
                FieldMap::from([("id".to_string(), args.get("id").cloned().unwrap_or(json!(null)))])
            })
            .with_accessor(AccessorDef::new("getId", |fields, _args| {
                let id = fields
                    .get("id")
                    .cloned()
                    .ok_or_else(|| AccessError::UnknownField("id".to_string()))?;
                let text = match id {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                Ok(json!(format!("I am {text}")))
            })),
    );
    Arc::new(
        Blueprint::new("duck")
            .with_init(|_| FieldMap::new())
            .with_base(animal),
    )
}

#[test]
fn counter_roundtrip() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(
            FieldMap::new(),
            FieldMap::from([("initial".to_string(), json!(0))]),
        )
        .unwrap();

    assert_eq!(adapter.invoke_accessor(&instance, "getNumber", &[]).unwrap(), json!(0));
    adapter.invoke_accessor(&instance, "setNumber", &[json!(10)]).unwrap();
    assert_eq!(adapter.invoke_accessor(&instance, "getNumber", &[]).unwrap(), json!(10));
}

#[test]
fn enumeration_lists_named_slots_only() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(
            FieldMap::from([("label".to_string(), json!("c1"))]),
            FieldMap::from([("initial".to_string(), json!(4))]),
        )
        .unwrap();

    assert_eq!(instance.named_slots(), vec!["label".to_string()]);
}

#[test]
fn reflection_lists_token_slots() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(
            FieldMap::new(),
            FieldMap::from([("initial".to_string(), json!(4))]),
        )
        .unwrap();

    let reflected = instance.reflect_token_slots();
    assert_eq!(reflected.len(), 1);
    assert_eq!(reflected[0].0.label(), "number");
    assert_eq!(reflected[0].1, json!(4));
}

#[test]
fn reflection_sees_accessor_writes() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(FieldMap::new(), FieldMap::new())
        .unwrap();

    adapter.invoke_accessor(&instance, "setNumber", &[json!(17)]).unwrap();
    let reflected = instance.reflect_token_slots();
    assert_eq!(reflected.len(), 1);
    assert_eq!(reflected[0].1, json!(17));
}

#[test]
fn external_read_is_partial_not_denied() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(
            FieldMap::new(),
            FieldMap::from([("initial".to_string(), json!(4))]),
        )
        .unwrap();

    assert_eq!(
        adapter.attempt_external_read(&instance, "number"),
        Exposure::Partial {
            via: "token reflection".to_string()
        }
    );
}

#[test]
fn external_read_of_absent_field_is_denied() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter.construct(FieldMap::new(), FieldMap::new()).unwrap();
    assert!(adapter.attempt_external_read(&instance, "vin").is_denied());
}

#[test]
fn external_read_of_public_field_is_leaked() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(
            FieldMap::from([("label".to_string(), json!("c1"))]),
            FieldMap::new(),
        )
        .unwrap();

    assert_eq!(
        adapter.attempt_external_read(&instance, "label"),
        Exposure::Leaked(json!("c1"))
    );
}

#[test]
fn public_fields_visible_and_mutable() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(
            FieldMap::from([("label".to_string(), json!("before"))]),
            FieldMap::new(),
        )
        .unwrap();

    adapter.write_public(&instance, "label", json!("after")).unwrap();
    assert_eq!(adapter.read_public(&instance, "label").unwrap(), json!("after"));
    assert!(matches!(
        adapter.read_public(&instance, "ghost"),
        Err(AccessError::UnknownPublicField(_))
    ));
}

#[test]
fn instances_share_tokens_but_not_values() {
    let adapter = UniqueTokenAdapter::new(counter());
    let a = adapter
        .construct(FieldMap::new(), FieldMap::from([("initial".to_string(), json!(1))]))
        .unwrap();
    let b = adapter
        .construct(FieldMap::new(), FieldMap::from([("initial".to_string(), json!(2))]))
        .unwrap();

    // Same definition-wide token, distinct per-instance slots.
    assert_eq!(a.reflect_token_slots()[0].0, b.reflect_token_slots()[0].0);
    assert_eq!(adapter.invoke_accessor(&a, "getNumber", &[]).unwrap(), json!(1));
    assert_eq!(adapter.invoke_accessor(&b, "getNumber", &[]).unwrap(), json!(2));
}

#[test]
fn inheritance_through_token_slots() {
    let adapter = UniqueTokenAdapter::new(duck());
    let instance = adapter
        .construct(
            FieldMap::from([("species".to_string(), json!("Duck"))]),
            FieldMap::from([("id".to_string(), json!(23456))]),
        )
        .unwrap();

    assert_eq!(
        adapter.invoke_accessor(&instance, "getId", &[]).unwrap(),
        json!("I am 23456")
    );
    // The base's private field is reflectable, hence partial.
    assert!(adapter.attempt_external_read(&instance, "id").is_partial());
    assert_eq!(adapter.read_public(&instance, "species").unwrap(), json!("Duck"));
}

#[test]
fn drop_reclaims_slots() {
    let adapter = UniqueTokenAdapter::new(counter());
    let instance = adapter
        .construct(FieldMap::new(), FieldMap::from([("initial".to_string(), json!(1))]))
        .unwrap();

    let probe = adapter.leak_probe(&instance);
    drop(instance);
    assert!(!probe.is_reachable());
}
