//! Property tests for claim and composite synchronization

use std::sync::Arc;

use claim_document::{Fields, Value};
use claim_sync::{
    ClaimConfigurator, Composite, CompositeConfigurator, Object, SyncConfig,
};
use claim_test_utils::{claim, composite, MockStore};
use proptest::prelude::*;
use serde_json::json;

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        Just("resourceRef".to_string()),
        Just("writeConnectionSecretToRef".to_string()),
        Just("resourceRefs".to_string()),
        Just("claimRef".to_string()),
        Just("conditions".to_string()),
    ]
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn section() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map(key(), scalar(), 0..8)
        .prop_map(|m| m.into_iter().collect::<Fields>())
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,10}"
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn composite_configuration_is_idempotent(
        ns in name(),
        n in name(),
        cm_spec in section(),
        cp_spec in section(),
    ) {
        let cm = claim(json!({"metadata": {"namespace": ns, "name": n}, "spec": cm_spec}));
        let mut cp = composite(json!({"spec": cp_spec}));
        let configurator = CompositeConfigurator::default();

        configurator.configure(&cm, &mut cp).unwrap();
        let once = cp.clone();
        configurator.configure(&cm, &mut cp).unwrap();

        prop_assert_eq!(cp, once);
    }

    #[test]
    fn composite_is_bound_to_its_claim(ns in name(), n in name()) {
        let config = SyncConfig::default();
        let cm = claim(json!({"metadata": {"namespace": ns.clone(), "name": n.clone()}}));
        let mut cp = composite(json!({}));

        CompositeConfigurator::new(config.clone()).configure(&cm, &mut cp).unwrap();

        prop_assert_eq!(cp.generate_name().to_string(), format!("{n}-"));
        prop_assert_eq!(cp.bound_claim(&config.labels), Some(cm.key()));
    }

    #[test]
    fn reserved_claim_keys_never_reach_composite(
        cm_spec in section(),
        cp_spec in section(),
    ) {
        let config = SyncConfig::default();
        let cm = claim(json!({"metadata": {"name": "cool"}, "spec": cm_spec.clone()}));
        let mut cp = composite(json!({"spec": cp_spec.clone()}));

        CompositeConfigurator::new(config.clone()).configure(&cm, &mut cp).unwrap();

        let spec = cp.doc().fields_at("spec").unwrap().cloned().unwrap_or_default();
        for blocked in &config.claim_to_composite_blocked {
            prop_assert_eq!(spec.get(blocked), cp_spec.get(blocked));
        }
        for (k, v) in &cm_spec {
            if !config.claim_to_composite_blocked.contains(k) {
                prop_assert_eq!(spec.get(k), Some(v));
            }
        }
    }

    #[test]
    fn claim_configuration_never_overrides_claim_spec(
        cm_spec in section(),
        cp_spec in section(),
        cp_status in section(),
    ) {
        let config = SyncConfig::default();
        let mut cm = claim(json!({"metadata": {"name": "cool"}, "spec": cm_spec.clone()}));
        let cp = composite(json!({"spec": cp_spec.clone(), "status": cp_status.clone()}));
        let store = Arc::new(MockStore::new());

        runtime()
            .block_on(ClaimConfigurator::new(store).configure(&mut cm, &cp))
            .unwrap();

        let spec = cm.doc().fields_at("spec").unwrap().cloned().unwrap_or_default();
        for (k, v) in &cm_spec {
            prop_assert_eq!(spec.get(k), Some(v));
        }
        for (k, v) in &cp_spec {
            if config.composite_to_claim_blocked.contains(k) {
                prop_assert_eq!(spec.get(k), cm_spec.get(k));
            } else if !cm_spec.contains_key(k) {
                prop_assert_eq!(spec.get(k), Some(v));
            }
        }
        let status = cm.doc().fields_at("status").unwrap().cloned().unwrap_or_default();
        prop_assert!(!status.contains_key(&config.conditions_key));
    }
}
