//! Claim Sync - claim and composite resource configuration
//!
//! Keeps a user-facing claim and the composite resource provisioned for it
//! consistent:
//! - [`CompositeConfigurator`] binds a composite to its claim and pushes the
//!   claim's desired spec down to it
//! - [`ClaimConfigurator`] pulls observed status and late-initialized spec
//!   back into the claim and persists it through a [`ResourceStore`]
//!
//! Both work on any [`Object`]. Objects that expose an [`Unstructured`]
//! document get full content synchronization; fixed-schema objects only get
//! binding metadata.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use claim_document::Unstructured;
//! use claim_sync::{
//!     ClaimConfigurator, ClaimObject, CompositeConfigurator, CompositeObject, MemoryStore,
//!     Object, SyncConfig,
//! };
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::default();
//! let mut claim = ClaimObject::new(Unstructured::from_value(json!({
//!     "metadata": {"namespace": "spacename", "name": "cool"},
//!     "spec": {"coolness": 23},
//! }))?);
//!
//! let mut xr = CompositeObject::default();
//! CompositeConfigurator::new(config.clone()).configure(&claim, &mut xr)?;
//! assert_eq!(xr.generate_name(), "cool-");
//!
//! // Once the composite has been persisted and reconciled:
//! let xr = CompositeObject::new(Unstructured::from_value(json!({
//!     "metadata": {"name": "cool-x7k2"},
//!     "spec": {"coolness": 23, "region": "eu"},
//!     "status": {"endpoint": "db.example.org"},
//! }))?);
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert(claim.doc().clone());
//! ClaimConfigurator::new(store.clone())
//!     .with_config(config)
//!     .configure(&mut claim, &xr)
//!     .await?;
//!
//! let stored = store.get(&claim.key()).ok_or("claim not stored")?;
//! assert_eq!(stored.get("/spec/region"), Some(&json!("eu")));
//! assert_eq!(stored.get("/status/endpoint"), Some(&json!("db.example.org")));
//! # Ok(())
//! # }
//! ```
//!
//! [`Unstructured`]: claim_document::Unstructured

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod claim;
pub mod composite;
pub mod config;
pub mod error;
pub mod resource;
pub mod store;

pub use claim::ClaimConfigurator;
pub use composite::CompositeConfigurator;
pub use config::{
    BindingLabels, ConfigError, SyncConfig, ANNOTATION_KEY_EXTERNAL_NAME, CONDITIONS_KEY,
    LABEL_KEY_CLAIM_NAME, LABEL_KEY_CLAIM_NAMESPACE,
};
pub use error::ConfigureError;
pub use resource::{
    ClaimObject, Composite, CompositeClaim, CompositeObject, Object, ObjectKey, ObjectMeta,
};
pub use store::{MemoryStore, ResourceStore, StoreError};

/// Document section holding desired state
pub const SPEC: &str = "spec";

/// Document section holding observed state
pub const STATUS: &str = "status";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
