//! Property tests for the merge primitives.
//!
//! Keys and values are drawn from small alphabets so that source and
//! destination overlap often.

use claim_document::{Fields, Value};
use claim_merge::{filter_fields, KeySet, LateInitMerge, MergeOptions, MergeStrategy, OverlayMerge};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("coolness".to_string()),
        Just("resourceRef".to_string()),
        Just("writeConnectionSecretToRef".to_string()),
        Just("claimRef".to_string()),
        Just("compositionRef".to_string()),
        "[a-c]{1,2}",
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::from),
    ]
}

fn fields() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map(key(), value(), 0..6).prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_overlay_is_idempotent(dst in fields(), src in fields()) {
        let mut once = dst.clone();
        OverlayMerge.merge(&mut once, &src);
        let mut twice = once.clone();
        OverlayMerge.merge(&mut twice, &src);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_overlay_source_wins_and_keeps_rest(dst in fields(), src in fields()) {
        let mut merged = dst.clone();
        OverlayMerge.merge(&mut merged, &src);
        for (k, v) in &src {
            prop_assert_eq!(merged.get(k), Some(v));
        }
        for (k, v) in &dst {
            if !src.contains_key(k) {
                prop_assert_eq!(merged.get(k), Some(v));
            }
        }
    }

    #[test]
    fn prop_late_init_never_overrides(dst in fields(), src in fields()) {
        let mut merged = dst.clone();
        LateInitMerge.merge(&mut merged, &src);
        for (k, v) in &dst {
            prop_assert_eq!(merged.get(k), Some(v));
        }
        for k in src.keys() {
            prop_assert!(merged.contains_key(k));
        }
    }

    #[test]
    fn prop_filtered_keys_never_cross(dst in fields(), src in fields()) {
        let blocked: KeySet = ["resourceRef", "writeConnectionSecretToRef"]
            .into_iter()
            .map(String::from)
            .collect();

        let filtered = filter_fields(Some(&src), &blocked);
        prop_assert!(filtered.keys().all(|k| !blocked.contains(k)));

        let mut root = Fields::new();
        root.insert("spec".to_string(), Value::Object(dst.clone()));
        let opts = MergeOptions::new().with_blocked(blocked.iter().cloned());
        OverlayMerge
            .merge_field(&mut root, "spec", Some(&Value::Object(src.clone())), &opts)
            .unwrap();

        let spec = root.get("spec").and_then(Value::as_object).unwrap();
        for k in &blocked {
            prop_assert_eq!(spec.get(k), dst.get(k));
        }
    }
}
