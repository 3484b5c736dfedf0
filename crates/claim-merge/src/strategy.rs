//! Merge strategy trait and core types
//!
//! Provides the [`MergeStrategy`] trait and the fallible field-level entry
//! point used when merging sections of two documents.

use claim_document::{Fields, Value};

use crate::filter::{filter_fields, KeySet};

/// Strategy for merging one object level into another
///
/// Implementations must be deterministic and idempotent: merging the same
/// source twice leaves the destination as it was after the first merge.
pub trait MergeStrategy: Send + Sync + std::fmt::Debug {
    /// Merge every key of `src` into `dst` according to the strategy
    fn merge(&self, dst: &mut Fields, src: &Fields);

    /// Strategy name (for debugging/logging)
    fn name(&self) -> &'static str;

    /// Merge `src` into the object stored under `key` in `root`
    ///
    /// The destination is type-checked before the source. An absent or
    /// `null` source is a no-op; an absent or `null` destination is created
    /// only when the filtered source has something to contribute. Nothing is
    /// modified when an error is returned.
    ///
    /// # Errors
    /// - [`MergeError::UnsupportedDstObject`] if `root[key]` is not an object
    /// - [`MergeError::UnsupportedSrcObject`] if `src` is not an object
    fn merge_field(
        &self,
        root: &mut Fields,
        key: &str,
        src: Option<&Value>,
        options: &MergeOptions,
    ) -> Result<(), MergeError> {
        match root.get(key) {
            None | Some(Value::Null | Value::Object(_)) => {}
            Some(_) => return Err(MergeError::unsupported_dst(key)),
        }

        let src = match src {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Object(src)) => filter_fields(Some(src), &options.blocked),
            Some(_) => return Err(MergeError::unsupported_src(key)),
        };
        if src.is_empty() {
            return Ok(());
        }

        let slot = root.entry(key).or_insert(Value::Null);
        if slot.is_null() {
            *slot = Value::Object(Fields::new());
        }
        if let Value::Object(dst) = slot {
            self.merge(dst, &src);
        }
        Ok(())
    }
}

/// Options applied to the source side of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Top-level source keys that never reach the destination
    pub blocked: KeySet,
}

impl MergeOptions {
    /// Create options that block nothing
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Block a single key
    #[inline]
    #[must_use]
    pub fn block(mut self, key: impl Into<String>) -> Self {
        self.blocked.insert(key.into());
        self
    }

    /// Block every key in `keys`
    #[inline]
    #[must_use]
    pub fn with_blocked<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.blocked.extend(keys.into_iter().map(Into::into));
        self
    }
}

/// A merge operand had the wrong shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Destination field holds a non-object
    #[error("destination object {field:?} is not supported: expected an object")]
    UnsupportedDstObject {
        /// Merged field
        field: String,
    },

    /// Source field holds a non-object
    #[error("source object {field:?} is not supported: expected an object")]
    UnsupportedSrcObject {
        /// Merged field
        field: String,
    },
}

impl MergeError {
    /// Create destination-side error
    #[inline]
    #[must_use]
    pub fn unsupported_dst(field: impl Into<String>) -> Self {
        Self::UnsupportedDstObject {
            field: field.into(),
        }
    }

    /// Create source-side error
    #[inline]
    #[must_use]
    pub fn unsupported_src(field: impl Into<String>) -> Self {
        Self::UnsupportedSrcObject {
            field: field.into(),
        }
    }

    /// Whether the destination operand was at fault
    #[inline]
    #[must_use]
    pub fn is_dst(&self) -> bool {
        matches!(self, Self::UnsupportedDstObject { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LateInitMerge, OverlayMerge};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn root(value: Value) -> Fields {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("test root must be an object"),
        }
    }

    #[test]
    fn options_builder() {
        let opts = MergeOptions::new()
            .block("conditions")
            .with_blocked(["claimRef", "resourceRefs"]);
        assert_eq!(opts.blocked.len(), 3);
        assert!(opts.blocked.contains("conditions"));
    }

    #[test]
    fn merge_field_checks_destination_first() {
        let mut claim = root(json!({"status": "notStatus"}));
        let err = OverlayMerge
            .merge_field(&mut claim, "status", Some(&json!("notStatus")), &MergeOptions::new())
            .unwrap_err();
        assert_eq!(err, MergeError::unsupported_dst("status"));
        assert!(err.is_dst());
        assert_eq!(claim, root(json!({"status": "notStatus"})));
    }

    #[test]
    fn merge_field_rejects_scalar_source() {
        let mut claim = root(json!({"status": {}}));
        let err = OverlayMerge
            .merge_field(&mut claim, "status", Some(&json!("notStatus")), &MergeOptions::new())
            .unwrap_err();
        assert_eq!(err, MergeError::unsupported_src("status"));
        assert_eq!(claim, root(json!({"status": {}})));
    }

    #[test]
    fn merge_field_skips_blocked_source_keys() {
        let mut claim = root(json!({
            "status": {"previousCoolness": 23, "conditions": [{"type": "someCondition"}]}
        }));
        let src = json!({"previousCoolness": 28, "conditions": [{"type": "otherCondition"}]});

        OverlayMerge
            .merge_field(&mut claim, "status", Some(&src), &MergeOptions::new().block("conditions"))
            .unwrap();

        assert_eq!(
            claim,
            root(json!({
                "status": {"previousCoolness": 28, "conditions": [{"type": "someCondition"}]}
            }))
        );
    }

    #[test]
    fn merge_field_creates_destination_only_when_needed() {
        let mut claim = root(json!({}));
        let opts = MergeOptions::new().block("conditions");

        LateInitMerge
            .merge_field(&mut claim, "spec", None, &opts)
            .unwrap();
        OverlayMerge
            .merge_field(&mut claim, "status", Some(&json!({"conditions": []})), &opts)
            .unwrap();
        assert!(claim.is_empty());

        LateInitMerge
            .merge_field(&mut claim, "spec", Some(&json!({"coolness": 23})), &opts)
            .unwrap();
        assert_eq!(claim, root(json!({"spec": {"coolness": 23}})));
    }

    #[test]
    fn null_destination_is_replaced() {
        let mut claim = root(json!({"status": null}));
        OverlayMerge
            .merge_field(&mut claim, "status", Some(&json!({"a": 1})), &MergeOptions::new())
            .unwrap();
        assert_eq!(claim, root(json!({"status": {"a": 1}})));
    }
}
