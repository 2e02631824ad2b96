use pretty_assertions::assert_eq;
use sealcheck_verify::{AdapterKind, VerifyError, verify, verify_all, verify_kind};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

// ── Full run ──────────────────────────────────────────────────────

#[test]
fn verify_all_adapters_pass() {
    init_tracing();
    let summary = verify_all();

    assert!(summary.all_passed(), "failures: {summary}");
    assert_eq!(summary.adapters.len(), 4);
    assert_eq!(summary.total_passed, summary.total_checks);
    for adapter in &summary.adapters {
        assert!(adapter.total > 0);
        assert!(adapter.failed.is_empty());
    }
}

#[test]
fn weakened_guarantees_only_for_unique_token() {
    let summary = verify_all();

    for adapter in &summary.adapters {
        if adapter.adapter == AdapterKind::UniqueToken {
            assert_eq!(
                adapter.weakened,
                vec![
                    "external-read-counter".to_string(),
                    "external-read-derived".to_string()
                ]
            );
        } else {
            assert!(
                adapter.weakened.is_empty(),
                "{} unexpectedly weakened: {:?}",
                adapter.adapter,
                adapter.weakened
            );
        }
    }
}

#[test]
fn scenario_checks_are_ordered() {
    let result = verify_kind(AdapterKind::Shared);
    let properties: Vec<&str> = result.checks.iter().map(|c| c.property.as_str()).collect();

    assert_eq!(
        properties,
        vec![
            "construct-counter",
            "construct-derived",
            "public-read",
            "public-read-second",
            "public-mutable",
            "accessor-initial",
            "accessor-roundtrip",
            "inherited-accessor",
            "external-read-counter",
            "external-read-derived",
            "cross-instance-isolation",
            "no-leak",
            "table-released",
        ]
    );
}

#[test]
fn per_instance_has_no_table_check() {
    let result = verify_kind(AdapterKind::PerInstance);
    assert!(result.passed());
    assert!(
        !result
            .checks
            .iter()
            .any(|c| c.property == "table-released")
    );
}

// ── Entry points ──────────────────────────────────────────────────

#[test]
fn verify_by_name() {
    init_tracing();
    let result = verify("closure").unwrap();
    assert_eq!(result.adapter, AdapterKind::Closure);
    assert!(result.passed());
}

#[test]
fn verify_bogus_name_fails() {
    let err = verify("bogus").unwrap_err();
    assert!(matches!(
        err,
        VerifyError::UnknownAdapter { ref requested } if requested == "bogus"
    ));
    assert!(err.to_string().contains("unknown adapter: bogus"));
}

#[test]
fn verify_accepts_every_known_name() {
    for kind in AdapterKind::ALL {
        let result = verify(kind.name()).unwrap();
        assert_eq!(result.adapter, kind);
    }
}

// ── AdapterKind ───────────────────────────────────────────────────

#[test]
fn adapter_kind_parse_display_roundtrip() {
    for kind in AdapterKind::ALL {
        let parsed: AdapterKind = kind.name().parse().unwrap();
        assert_eq!(parsed, kind);
        assert_eq!(kind.to_string(), kind.name());
    }
}

#[test]
fn adapter_kind_serde_is_kebab_case() {
    assert_eq!(
        serde_json::to_value(AdapterKind::PerInstance).unwrap(),
        json!("per-instance")
    );
    assert_eq!(
        serde_json::to_value(AdapterKind::UniqueToken).unwrap(),
        json!("unique-token")
    );
    let back: AdapterKind = serde_json::from_value(json!("closure")).unwrap();
    assert_eq!(back, AdapterKind::Closure);
}

// ── Reporting ─────────────────────────────────────────────────────

#[test]
fn summary_serde_roundtrip() {
    let summary = verify_all();
    let encoded = serde_json::to_string(&summary).unwrap();
    let decoded: sealcheck_verify::Summary = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, summary);
}

#[test]
fn summary_renders_every_adapter() {
    let rendered = verify_all().to_string();
    for kind in AdapterKind::ALL {
        assert!(rendered.contains(kind.name()));
    }
}
