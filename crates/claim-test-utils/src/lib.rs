//! Testing utilities for claim sync workspace
//!
//! Shared fixtures, fixed-schema fakes and a scripted store.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use claim_document::Unstructured;
use claim_sync::{
    ClaimObject, Composite, CompositeClaim, CompositeObject, Object, ObjectKey, ObjectMeta,
    ResourceStore, StoreError,
};
use parking_lot::Mutex;
use serde_json::Value;

pub const NAMESPACE: &str = "spacename";
pub const NAME: &str = "cool";

pub fn unstructured(value: Value) -> Unstructured {
    Unstructured::from_value(value).unwrap()
}

pub fn claim(value: Value) -> ClaimObject {
    ClaimObject::new(unstructured(value))
}

pub fn composite(value: Value) -> CompositeObject {
    CompositeObject::new(unstructured(value))
}

/// Claim with only typed metadata, no document access
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeClaim {
    pub meta: ObjectMeta,
}

impl FakeClaim {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            meta: ObjectMeta::named(namespace, name),
        }
    }
}

/// Composite with only typed metadata, no document access
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FakeComposite {
    pub meta: ObjectMeta,
}

macro_rules! delegate_meta {
    ($name:ident) => {
        impl Object for $name {
            fn name(&self) -> &str {
                self.meta.name()
            }
            fn namespace(&self) -> &str {
                self.meta.namespace()
            }
            fn generate_name(&self) -> &str {
                self.meta.generate_name()
            }
            fn set_generate_name(&mut self, prefix: String) {
                self.meta.set_generate_name(prefix);
            }
            fn labels(&self) -> BTreeMap<String, String> {
                self.meta.labels()
            }
            fn set_labels(&mut self, labels: BTreeMap<String, String>) {
                self.meta.set_labels(labels);
            }
            fn annotations(&self) -> BTreeMap<String, String> {
                self.meta.annotations()
            }
            fn set_annotations(&mut self, annotations: BTreeMap<String, String>) {
                self.meta.set_annotations(annotations);
            }
        }
    };
}

delegate_meta!(FakeClaim);
delegate_meta!(FakeComposite);

impl CompositeClaim for FakeClaim {}
impl Composite for FakeComposite {}

/// Which store operation was called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    UpdateStatus,
    Update,
}

/// A recorded store call with a snapshot of the object at call time
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub key: ObjectKey,
    pub doc: Option<Unstructured>,
}

type StoreFn = Box<dyn Fn(&dyn Object) -> Result<(), StoreError> + Send + Sync>;

/// Store whose responses are scripted per operation
///
/// Unscripted operations succeed. Every call is recorded.
#[derive(Default)]
pub struct MockStore {
    update_status: Option<StoreFn>,
    update: Option<StoreFn>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_update_status(
        mut self,
        f: impl Fn(&dyn Object) -> Result<(), StoreError> + Send + Sync + 'static,
    ) -> Self {
        self.update_status = Some(Box::new(f));
        self
    }

    pub fn with_update(
        mut self,
        f: impl Fn(&dyn Object) -> Result<(), StoreError> + Send + Sync + 'static,
    ) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    /// Fail status updates with a backend error carrying `msg`
    pub fn failing_update_status(self, msg: &'static str) -> Self {
        self.with_update_status(move |_| Err(StoreError::Backend(anyhow::anyhow!(msg))))
    }

    /// Fail updates with a backend error carrying `msg`
    pub fn failing_update(self, msg: &'static str) -> Self {
        self.with_update(move |_| Err(StoreError::Backend(anyhow::anyhow!(msg))))
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.calls.lock().iter().map(|c| c.op).collect()
    }

    fn record(&self, op: StoreOp, obj: &dyn Object) {
        self.calls.lock().push(StoreCall {
            op,
            key: obj.key(),
            doc: obj.unstructured().cloned(),
        });
    }
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("calls", &self.calls.lock().len())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ResourceStore for MockStore {
    async fn update_status(&self, obj: &dyn Object) -> Result<(), StoreError> {
        self.record(StoreOp::UpdateStatus, obj);
        self.update_status.as_ref().map_or(Ok(()), |f| f(obj))
    }

    async fn update(&self, obj: &dyn Object) -> Result<(), StoreError> {
        self.record(StoreOp::Update, obj);
        self.update.as_ref().map_or(Ok(()), |f| f(obj))
    }
}
