use sealcheck_types::{FieldMap, PublicView};
use serde_json::json;

#[test]
fn get_and_set() {
    let mut view = PublicView::default();
    assert!(view.is_empty());

    view.set("make", json!("Porsche"));
    view.set("model", json!("911"));
    assert_eq!(view.get("make"), Some(&json!("Porsche")));
    assert_eq!(view.len(), 2);
    assert!(view.contains("model"));
    assert!(!view.contains("vin"));
}

#[test]
fn set_replaces() {
    let mut view = PublicView::default();
    view.set("model", json!("911"));
    view.set("model", json!("Taycan"));
    assert_eq!(view.get("model"), Some(&json!("Taycan")));
    assert_eq!(view.len(), 1);
}

#[test]
fn field_names_are_sorted() {
    let mut view = PublicView::default();
    view.set("noise", json!("Quack"));
    view.set("species", json!("Duck"));
    let names: Vec<&str> = view.field_names().collect();
    assert_eq!(names, vec!["noise", "species"]);
}

#[test]
fn serde_is_transparent() {
    let mut fields = FieldMap::new();
    fields.insert("species".into(), json!("Duck"));
    let view = PublicView::new(fields);

    let json = serde_json::to_string(&view).unwrap();
    assert_eq!(json, r#"{"species":"Duck"}"#);

    let back: PublicView = serde_json::from_str(&json).unwrap();
    assert_eq!(back, view);
}
