//! Backing store seam
//!
//! The configurators persist claims through [`ResourceStore`]. Real
//! deployments implement it over their API client; [`MemoryStore`] keeps
//! documents in process for the CLI and tests.

use claim_document::Unstructured;
use dashmap::DashMap;

use crate::resource::{Object, ObjectKey};
use crate::STATUS;

/// Persistence operations used by the claim configurator
///
/// Both calls may fail for any reason (conflict, transport, validation).
/// Callers wrap and return every failure the same way.
#[async_trait::async_trait]
pub trait ResourceStore: Send + Sync {
    /// Persist the status section of `obj`
    async fn update_status(&self, obj: &dyn Object) -> Result<(), StoreError>;

    /// Persist everything except the status section of `obj`
    async fn update(&self, obj: &dyn Object) -> Result<(), StoreError>;
}

/// Backing store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Object changed since it was read
    #[error("conflict updating {0}")]
    Conflict(ObjectKey),

    /// Object does not exist
    #[error("{0} not found")]
    NotFound(ObjectKey),

    /// Object was rejected
    #[error("invalid object: {0}")]
    Invalid(String),

    /// Transport or backend failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Check if error is an optimistic concurrency conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

/// In-process store keyed by namespace and name
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<ObjectKey, Unstructured>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a document, returning the previous one
    pub fn insert(&self, doc: Unstructured) -> Option<Unstructured> {
        let key = ObjectKey::new(doc.namespace(), doc.name());
        self.objects.insert(key, doc)
    }

    /// Snapshot of a stored document
    #[must_use]
    pub fn get(&self, key: &ObjectKey) -> Option<Unstructured> {
        self.objects.get(key).map(|doc| doc.clone())
    }

    /// Number of stored documents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn document(obj: &dyn Object) -> Result<&Unstructured, StoreError> {
    obj.unstructured()
        .ok_or_else(|| StoreError::Invalid(format!("{} has no document representation", obj.key())))
}

#[async_trait::async_trait]
impl ResourceStore for MemoryStore {
    async fn update_status(&self, obj: &dyn Object) -> Result<(), StoreError> {
        let doc = document(obj)?;
        let key = obj.key();
        let mut stored = self
            .objects
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        if let Some(status) = doc.field(STATUS) {
            stored.set_field(STATUS, status.clone());
        } else {
            stored.remove_field(STATUS);
        }
        tracing::trace!(object = %key, "stored status");
        Ok(())
    }

    async fn update(&self, obj: &dyn Object) -> Result<(), StoreError> {
        let doc = document(obj)?;
        let key = obj.key();
        let mut stored = self
            .objects
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        let mut next = doc.clone();
        next.remove_field(STATUS);
        if let Some(status) = stored.remove_field(STATUS) {
            next.set_field(STATUS, status);
        }
        *stored = next;
        tracing::trace!(object = %key, "stored object");
        Ok(())
    }
}
