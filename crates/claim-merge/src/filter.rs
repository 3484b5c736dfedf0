//! Reserved-key filtering

use std::collections::BTreeSet;

use claim_document::Fields;

/// Set of top-level keys
pub type KeySet = BTreeSet<String>;

/// Shallow copy of `tree` without any key in `blocked`
///
/// Absent input yields an empty object. Nested values are cloned as-is; only
/// the top level is filtered.
#[must_use]
pub fn filter_fields(tree: Option<&Fields>, blocked: &KeySet) -> Fields {
    let Some(tree) = tree else {
        return Fields::new();
    };
    tree.iter()
        .filter(|(key, _)| !blocked.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(names: &[&str]) -> KeySet {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn removes_blocked_keys_only() {
        let spec = json!({
            "coolness": 23,
            "compositionRef": "ref",
            "resourceRef": "ref",
            "writeConnectionSecretToRef": "ref",
        });
        let filtered = filter_fields(
            spec.as_object(),
            &keys(&["resourceRef", "writeConnectionSecretToRef"]),
        );
        assert_eq!(
            serde_json::Value::Object(filtered),
            json!({"coolness": 23, "compositionRef": "ref"})
        );
    }

    #[test]
    fn absent_tree_is_empty() {
        assert!(filter_fields(None, &keys(&["a"])).is_empty());
    }

    #[test]
    fn nested_keys_are_not_filtered() {
        let spec = json!({"nested": {"resourceRef": "ref"}});
        let filtered = filter_fields(spec.as_object(), &keys(&["resourceRef"]));
        assert_eq!(filtered.get("nested"), Some(&json!({"resourceRef": "ref"})));
    }

    #[test]
    fn input_is_not_modified() {
        let spec = json!({"a": 1, "b": 2});
        let _ = filter_fields(spec.as_object(), &keys(&["a"]));
        assert_eq!(spec, json!({"a": 1, "b": 2}));
    }
}
