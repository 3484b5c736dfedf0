//! Unstructured resource documents
//!
//! A resource is an object tree with a conventional `metadata` section.
//! Everything else (`spec`, `status`, ...) is opaque to this type and is
//! reached through fallible object casts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::fields::{as_fields, as_fields_mut, Fields, Value};

/// Metadata section key
pub const METADATA: &str = "metadata";
/// `metadata.name`
pub const NAME: &str = "name";
/// `metadata.namespace`
pub const NAMESPACE: &str = "namespace";
/// `metadata.generateName`
pub const GENERATE_NAME: &str = "generateName";
/// `metadata.labels`
pub const LABELS: &str = "labels";
/// `metadata.annotations`
pub const ANNOTATIONS: &str = "annotations";

/// A resource document of arbitrary shape
///
/// Serializes transparently as its root object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unstructured {
    object: Fields,
}

impl Unstructured {
    /// Create an empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a value that must be an object
    ///
    /// # Errors
    /// Returns [`DocumentError::NotAnObject`] for any other variant
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(object) => Ok(Self { object }),
            _ => Err(DocumentError::not_an_object("<root>")),
        }
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or the root is not an object
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or the root is not a mapping
    pub fn from_yaml(yaml: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(&self.object)
            .map_err(|e| DocumentError::Serialization(e.to_string()))
    }

    /// Serialize to YAML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(&self.object).map_err(|e| DocumentError::Serialization(e.to_string()))
    }

    /// Mutable root object
    #[inline]
    pub fn object_mut(&mut self) -> &mut Fields {
        &mut self.object
    }

    /// Unwrap into a plain value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }

    /// Get a value by JSON pointer
    ///
    /// # Examples
    /// ```
    /// # use claim_document::Unstructured;
    /// # use serde_json::json;
    /// let doc = Unstructured::from_json(r#"{"status": {"previousCoolness": 28}}"#).unwrap();
    /// assert_eq!(doc.get("/status/previousCoolness"), Some(&json!(28)));
    /// assert_eq!(doc.get("/status/missing"), None);
    /// ```
    #[must_use]
    pub fn get(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let key = head.replace("~1", "/").replace("~0", "~");
        let root = self.object.get(&key)?;
        if tail.is_empty() {
            Some(root)
        } else {
            root.pointer(tail)
        }
    }

    /// Top-level field
    #[inline]
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.object.get(key)
    }

    /// Set a top-level field, returning the previous value
    #[inline]
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.object.insert(key.into(), value.into())
    }

    /// Remove a top-level field
    #[inline]
    pub fn remove_field(&mut self, key: &str) -> Option<Value> {
        self.object.remove(key)
    }

    /// Top-level field cast to an object
    ///
    /// Absent and `null` fields read as `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`DocumentError::NotAnObject`] if the field holds any other variant
    pub fn fields_at(&self, key: &str) -> Result<Option<&Fields>, DocumentError> {
        match self.object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(fields)) => Ok(Some(fields)),
            Some(_) => Err(DocumentError::not_an_object(key)),
        }
    }

    // Metadata

    /// `metadata.name`, empty if unset
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata_str(NAME)
    }

    /// `metadata.namespace`, empty if unset
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.metadata_str(NAMESPACE)
    }

    /// `metadata.generateName`, empty if unset
    #[must_use]
    pub fn generate_name(&self) -> &str {
        self.metadata_str(GENERATE_NAME)
    }

    /// Set `metadata.generateName`
    pub fn set_generate_name(&mut self, prefix: impl Into<String>) {
        self.metadata_mut()
            .insert(GENERATE_NAME.to_string(), Value::String(prefix.into()));
    }

    /// `metadata.labels`; non-string values are skipped
    #[must_use]
    pub fn labels(&self) -> BTreeMap<String, String> {
        self.metadata_string_map(LABELS)
    }

    /// Replace `metadata.labels`; an empty map removes the field
    pub fn set_labels(&mut self, labels: BTreeMap<String, String>) {
        self.set_metadata_string_map(LABELS, labels);
    }

    /// Add labels, overwriting existing values of the same keys
    ///
    /// Labels not named in `labels` are kept as they are.
    pub fn add_labels<I, K, V>(&mut self, labels: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert_metadata_strings(LABELS, labels, true);
    }

    /// `metadata.annotations`; non-string values are skipped
    #[must_use]
    pub fn annotations(&self) -> BTreeMap<String, String> {
        self.metadata_string_map(ANNOTATIONS)
    }

    /// Replace `metadata.annotations`; an empty map removes the field
    pub fn set_annotations(&mut self, annotations: BTreeMap<String, String>) {
        self.set_metadata_string_map(ANNOTATIONS, annotations);
    }

    /// Add annotations whose keys are not present yet
    ///
    /// Existing entries win, whatever their value type.
    pub fn add_missing_annotations<I, K, V>(&mut self, annotations: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert_metadata_strings(ANNOTATIONS, annotations, false);
    }

    /// Single annotation value
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata()
            .and_then(|meta| meta.get(ANNOTATIONS))
            .and_then(as_fields)
            .and_then(|annotations| annotations.get(key))
            .and_then(Value::as_str)
    }

    /// Set a single annotation
    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>) {
        object_slot(self.metadata_mut(), ANNOTATIONS).insert(key.into(), Value::String(value.into()));
    }

    fn metadata(&self) -> Option<&Fields> {
        self.object.get(METADATA).and_then(as_fields)
    }

    fn metadata_mut(&mut self) -> &mut Fields {
        object_slot(&mut self.object, METADATA)
    }

    fn metadata_str(&self, key: &str) -> &str {
        self.metadata()
            .and_then(|meta| meta.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn metadata_string_map(&self, key: &str) -> BTreeMap<String, String> {
        self.metadata()
            .and_then(|meta| meta.get(key))
            .and_then(as_fields)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn insert_metadata_strings<I, K, V>(&mut self, key: &str, entries: I, overwrite: bool)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            return;
        }
        let map = object_slot(self.metadata_mut(), key);
        for (k, v) in entries {
            let k = k.into();
            if overwrite || !map.contains_key(&k) {
                map.insert(k, Value::String(v.into()));
            }
        }
    }

    fn set_metadata_string_map(&mut self, key: &str, map: BTreeMap<String, String>) {
        if map.is_empty() {
            if let Some(meta) = self.object.get_mut(METADATA).and_then(as_fields_mut) {
                meta.remove(key);
            }
            return;
        }
        let fields: Fields = map.into_iter().map(|(k, v)| (k, Value::String(v))).collect();
        self.metadata_mut().insert(key.to_string(), Value::Object(fields));
    }
}

/// Object stored under `key`, replacing any non-object value
fn object_slot<'a>(parent: &'a mut Fields, key: &str) -> &'a mut Fields {
    let slot = parent.entry(key).or_insert(Value::Null);
    if !slot.is_object() {
        *slot = Value::Object(Fields::new());
    }
    match slot {
        Value::Object(fields) => fields,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: Value) -> Unstructured {
        Unstructured::from_value(value).unwrap()
    }

    #[test]
    fn from_value_rejects_non_object_root() {
        let err = Unstructured::from_value(json!("wat")).unwrap_err();
        assert!(matches!(err, DocumentError::NotAnObject { .. }));
    }

    #[test]
    fn from_yaml_reads_nested_mappings() {
        let d = Unstructured::from_yaml(
            "metadata:\n  name: cool\nspec:\n  coolness: 23\n  tags: [a, b]\n",
        )
        .unwrap();
        assert_eq!(d.name(), "cool");
        assert_eq!(d.get("/spec/coolness"), Some(&json!(23)));
        assert_eq!(d.get("/spec/tags/1"), Some(&json!("b")));
    }

    #[test]
    fn from_json_invalid() {
        assert!(matches!(
            Unstructured::from_json("not valid json"),
            Err(DocumentError::InvalidJson(_))
        ));
    }

    #[test]
    fn pointer_unescapes_first_segment() {
        let d = doc(json!({"a/b": {"c": 1}}));
        assert_eq!(d.get("/a~1b/c"), Some(&json!(1)));
        assert_eq!(d.get("no-leading-slash"), None);
    }

    #[test]
    fn missing_metadata_reads_empty() {
        let d = Unstructured::new();
        assert_eq!(d.name(), "");
        assert_eq!(d.namespace(), "");
        assert_eq!(d.generate_name(), "");
        assert!(d.labels().is_empty());
        assert!(d.annotation("anything").is_none());
    }

    #[test]
    fn set_generate_name_creates_metadata() {
        let mut d = Unstructured::new();
        d.set_generate_name("cool-");
        assert_eq!(d.into_value(), json!({"metadata": {"generateName": "cool-"}}));
    }

    #[test]
    fn add_labels_overwrites_only_given_keys() {
        let mut d = doc(json!({"metadata": {"labels": {"keep": "me", "ns": "old"}}}));
        d.add_labels([("ns", "new")]);
        assert_eq!(
            d.into_value(),
            json!({"metadata": {"labels": {"keep": "me", "ns": "new"}}})
        );
    }

    #[test]
    fn empty_label_set_removes_field() {
        let mut d = doc(json!({"metadata": {"name": "cool", "labels": {"a": "b"}}}));
        d.set_labels(BTreeMap::new());
        assert_eq!(d.into_value(), json!({"metadata": {"name": "cool"}}));

        let mut untouched = Unstructured::new();
        untouched.set_annotations(BTreeMap::new());
        assert_eq!(untouched, Unstructured::new());
    }

    #[test]
    fn annotations_skip_non_strings() {
        let d = doc(json!({"metadata": {"annotations": {"a": "x", "b": 1}}}));
        assert_eq!(d.annotations().len(), 1);
        assert_eq!(d.annotation("a"), Some("x"));
        assert_eq!(d.annotation("b"), None);
    }

    #[test]
    fn set_annotation_replaces_malformed_section() {
        let mut d = doc(json!({"metadata": {"annotations": "wat"}}));
        d.set_annotation("a", "x");
        assert_eq!(d.annotation("a"), Some("x"));
    }

    #[test]
    fn fields_at_distinguishes_absent_from_mismatch() {
        let d = doc(json!({"spec": {"a": 1}, "status": "notStatus", "empty": null}));
        assert_eq!(d.fields_at("spec").unwrap().map(Fields::len), Some(1));
        assert!(d.fields_at("missing").unwrap().is_none());
        assert!(d.fields_at("empty").unwrap().is_none());
        assert!(matches!(
            d.fields_at("status"),
            Err(DocumentError::NotAnObject { ref field }) if field == "status"
        ));
    }

    #[test]
    fn add_labels_keeps_untouched_values() {
        let mut d = doc(json!({"metadata": {"labels": {"count": 3, "ns": "old"}}}));
        d.add_labels([("ns", "new"), ("name", "cool")]);
        assert_eq!(
            d.into_value(),
            json!({"metadata": {"labels": {"count": 3, "ns": "new", "name": "cool"}}})
        );
    }

    #[test]
    fn missing_annotations_never_override() {
        let mut d = doc(json!({"metadata": {"annotations": {"n": 1, "s": "x"}}}));
        d.add_missing_annotations([("n", "claim"), ("s", "claim"), ("t", "claim")]);
        assert_eq!(
            d.into_value(),
            json!({"metadata": {"annotations": {"n": 1, "s": "x", "t": "claim"}}})
        );
    }

    #[test]
    fn adding_nothing_creates_nothing() {
        let mut d = Unstructured::new();
        d.add_missing_annotations(std::iter::empty::<(String, String)>());
        d.add_labels(std::iter::empty::<(String, String)>());
        assert_eq!(d, Unstructured::new());
    }

    #[test]
    fn json_output_parses_back() {
        let d = doc(json!({"metadata": {"name": "cool"}, "spec": {"coolness": 23}}));
        assert_eq!(Unstructured::from_json(&d.to_json().unwrap()).unwrap(), d);
    }

    #[test]
    fn yaml_output_parses_back() {
        let d = doc(json!({"metadata": {"name": "cool"}, "spec": {"coolness": 23}}));
        let yaml = d.to_yaml().unwrap();
        assert_eq!(Unstructured::from_yaml(&yaml).unwrap(), d);
    }
}
