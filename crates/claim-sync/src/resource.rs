//! Resource object contracts
//!
//! A claim or composite is either backed by an [`Unstructured`] document,
//! which supports arbitrary field access, or by a fixed schema that only
//! exposes metadata. The capability accessors on [`Object`] tell the two
//! apart.

use std::collections::BTreeMap;
use std::fmt;

use claim_document::Unstructured;
use serde::{Deserialize, Serialize};

use crate::config::BindingLabels;

/// Identity of a namespaced or cluster-scoped object
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    /// Namespace, empty for cluster-scoped objects
    pub namespace: String,
    /// Name
    pub name: String,
}

impl ObjectKey {
    /// Create new key
    #[inline]
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Metadata every resource object exposes
pub trait Object: Send + Sync + fmt::Debug {
    /// Name, empty if not yet assigned
    fn name(&self) -> &str;

    /// Namespace, empty for cluster-scoped objects
    fn namespace(&self) -> &str;

    /// Prefix used to generate a name on creation
    fn generate_name(&self) -> &str;

    /// Set the name generation prefix
    fn set_generate_name(&mut self, prefix: String);

    /// Labels
    fn labels(&self) -> BTreeMap<String, String>;

    /// Replace labels
    fn set_labels(&mut self, labels: BTreeMap<String, String>);

    /// Annotations
    fn annotations(&self) -> BTreeMap<String, String>;

    /// Replace annotations
    fn set_annotations(&mut self, annotations: BTreeMap<String, String>);

    /// Generic document view, if this object supports arbitrary field access
    fn unstructured(&self) -> Option<&Unstructured> {
        None
    }

    /// Mutable generic document view
    fn unstructured_mut(&mut self) -> Option<&mut Unstructured> {
        None
    }

    /// Identity
    fn key(&self) -> ObjectKey {
        ObjectKey::new(self.namespace(), self.name())
    }

    /// Add labels, overwriting existing values of the same keys
    fn add_labels(&mut self, labels: BTreeMap<String, String>) {
        let mut merged = self.labels();
        merged.extend(labels);
        self.set_labels(merged);
    }

    /// Single annotation value, empty if unset
    fn annotation(&self, key: &str) -> String {
        self.annotations().remove(key).unwrap_or_default()
    }
}

/// A user-facing request for a composite resource
pub trait CompositeClaim: Object {}

/// A composite resource provisioned on behalf of a claim
pub trait Composite: Object {
    /// Claim this composite is bound to, according to its binding labels
    fn bound_claim(&self, keys: &BindingLabels) -> Option<ObjectKey> {
        let labels = self.labels();
        let name = labels.get(&keys.claim_name)?;
        let namespace = labels
            .get(&keys.claim_namespace)
            .cloned()
            .unwrap_or_default();
        Some(ObjectKey::new(namespace, name.clone()))
    }
}

macro_rules! unstructured_object {
    ($(#[$doc:meta])* $name:ident, $role:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Unstructured);

        impl $name {
            /// Wrap a document
            #[inline]
            #[must_use]
            pub fn new(doc: Unstructured) -> Self {
                Self(doc)
            }

            /// Document view
            #[inline]
            #[must_use]
            pub fn doc(&self) -> &Unstructured {
                &self.0
            }

            /// Unwrap the document
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> Unstructured {
                self.0
            }
        }

        impl From<Unstructured> for $name {
            fn from(doc: Unstructured) -> Self {
                Self(doc)
            }
        }

        impl Object for $name {
            fn name(&self) -> &str {
                self.0.name()
            }

            fn namespace(&self) -> &str {
                self.0.namespace()
            }

            fn generate_name(&self) -> &str {
                self.0.generate_name()
            }

            fn set_generate_name(&mut self, prefix: String) {
                self.0.set_generate_name(prefix);
            }

            fn labels(&self) -> BTreeMap<String, String> {
                self.0.labels()
            }

            fn set_labels(&mut self, labels: BTreeMap<String, String>) {
                self.0.set_labels(labels);
            }

            fn annotations(&self) -> BTreeMap<String, String> {
                self.0.annotations()
            }

            fn set_annotations(&mut self, annotations: BTreeMap<String, String>) {
                self.0.set_annotations(annotations);
            }

            fn unstructured(&self) -> Option<&Unstructured> {
                Some(&self.0)
            }

            fn unstructured_mut(&mut self) -> Option<&mut Unstructured> {
                Some(&mut self.0)
            }

            fn add_labels(&mut self, labels: BTreeMap<String, String>) {
                self.0.add_labels(labels);
            }

            fn annotation(&self, key: &str) -> String {
                self.0.annotation(key).unwrap_or_default().to_string()
            }
        }

        impl $role for $name {}
    };
}

unstructured_object!(
    /// Claim backed by an unstructured document
    ClaimObject,
    CompositeClaim
);

unstructured_object!(
    /// Composite backed by an unstructured document
    CompositeObject,
    Composite
);

/// Typed metadata for fixed-schema resources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub generate_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Create metadata for a namespaced object
    #[inline]
    #[must_use]
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

impl Object for ObjectMeta {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn generate_name(&self) -> &str {
        &self.generate_name
    }

    fn set_generate_name(&mut self, prefix: String) {
        self.generate_name = prefix;
    }

    fn labels(&self) -> BTreeMap<String, String> {
        self.labels.clone()
    }

    fn set_labels(&mut self, labels: BTreeMap<String, String>) {
        self.labels = labels;
    }

    fn annotations(&self) -> BTreeMap<String, String> {
        self.annotations.clone()
    }

    fn set_annotations(&mut self, annotations: BTreeMap<String, String>) {
        self.annotations = annotations;
    }
}
