//! Claim configuration from its composite
//!
//! Runs after the bound composite has been reconciled. Observed status and
//! spec defaults computed for the composite flow back into the claim, which
//! is then persisted.

use std::sync::Arc;

use claim_document::Unstructured;
use claim_merge::{LateInitMerge, MergeOptions, MergeStrategy, OverlayMerge};
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::error::ConfigureError;
use crate::resource::{Composite, CompositeClaim};
use crate::store::ResourceStore;
use crate::{SPEC, STATUS};

/// Propagates composite state back to its claim and persists the claim
#[derive(Clone)]
pub struct ClaimConfigurator {
    store: Arc<dyn ResourceStore>,
    config: SyncConfig,
}

impl std::fmt::Debug for ClaimConfigurator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimConfigurator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClaimConfigurator {
    /// Create configurator persisting through `store`
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            config: SyncConfig::default(),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Configure `claim` from `composite` and persist it
    ///
    /// # Workflow
    /// 1. Overlay composite status onto claim status, except conditions
    /// 2. Persist claim status
    /// 3. Late-initialize claim spec from the filtered composite spec
    /// 4. Adopt the composite's external name if the claim has none
    /// 5. Persist claim
    ///
    /// Fails fast; retries are left to the caller. Nothing happens when
    /// either object lacks a document.
    ///
    /// # Errors
    /// - [`ConfigureError::MergeStatus`] / [`ConfigureError::MergeSpec`] if a section is not an object
    /// - [`ConfigureError::UpdateStatus`] / [`ConfigureError::Update`] if the store fails
    pub async fn configure<C, X>(&self, claim: &mut C, composite: &X) -> Result<(), ConfigureError>
    where
        C: CompositeClaim,
        X: Composite,
    {
        let Some(cp) = composite.unstructured() else {
            debug!(composite = %composite.key(), "skipping claim configuration from fixed-schema composite");
            return Ok(());
        };
        {
            let Some(cm) = claim.unstructured_mut() else {
                debug!("skipping claim configuration of fixed-schema claim");
                return Ok(());
            };
            self.merge_status(cm, cp)?;
        }

        self.store
            .update_status(&*claim)
            .await
            .map_err(ConfigureError::UpdateStatus)?;

        if let Some(cm) = claim.unstructured_mut() {
            self.merge_spec(cm, cp)?;
            self.adopt_external_name(cm, cp);
        }

        self.store
            .update(&*claim)
            .await
            .map_err(ConfigureError::Update)?;

        info!(claim = %claim.key(), composite = %composite.key(), "configured claim");
        Ok(())
    }

    fn merge_status(&self, cm: &mut Unstructured, cp: &Unstructured) -> Result<(), ConfigureError> {
        // Conditions are owned by each resource and never mirrored.
        let opts = MergeOptions::new().block(self.config.conditions_key.clone());
        OverlayMerge
            .merge_field(cm.object_mut(), STATUS, cp.field(STATUS), &opts)
            .map_err(ConfigureError::MergeStatus)
    }

    fn merge_spec(&self, cm: &mut Unstructured, cp: &Unstructured) -> Result<(), ConfigureError> {
        let opts = MergeOptions::new()
            .with_blocked(self.config.composite_to_claim_blocked.iter().cloned());
        LateInitMerge
            .merge_field(cm.object_mut(), SPEC, cp.field(SPEC), &opts)
            .map_err(ConfigureError::MergeSpec)
    }

    fn adopt_external_name(&self, cm: &mut Unstructured, cp: &Unstructured) {
        let key = &self.config.external_name_annotation;
        let Some(name) = cp.annotation(key).filter(|n| !n.is_empty()) else {
            return;
        };
        if cm.annotation(key).unwrap_or_default().is_empty() {
            debug!(external_name = name, "adopting composite resource external name");
            cm.set_annotation(key.clone(), name);
        }
    }
}
