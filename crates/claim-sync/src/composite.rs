//! Composite configuration from a claim
//!
//! Runs just before a composite is persisted for the first time, or when an
//! already-bound composite is re-confirmed. Binding metadata is always
//! applied; content is only synchronized when both objects expose a
//! document.

use std::collections::BTreeMap;

use claim_merge::{filter_fields, MergeOptions, MergeStrategy, OverlayMerge};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::error::ConfigureError;
use crate::resource::{Composite, CompositeClaim};
use crate::SPEC;

/// Configures a composite according to the claim it is bound to
#[derive(Debug, Clone, Default)]
pub struct CompositeConfigurator {
    config: SyncConfig,
}

impl CompositeConfigurator {
    /// Create configurator
    #[inline]
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Configure `composite` from `claim`
    ///
    /// # Workflow
    /// 1. Set the generate-name prefix and binding labels (never fails)
    /// 2. Stop here unless both objects expose a document
    /// 3. Filter reserved keys out of the claim spec
    /// 4. Refuse to change an external name already in effect
    /// 5. Overlay the filtered claim spec onto the composite spec
    /// 6. Add claim annotations the composite doesn't define
    ///
    /// Only `composite` is modified. On error, the metadata from step 1 stays
    /// applied and later steps are not.
    ///
    /// # Errors
    /// - [`ConfigureError::UnsupportedClaimSpec`] if the claim spec is not an object
    /// - [`ConfigureError::ExternalNameMismatch`] if both sides name different external resources
    /// - [`ConfigureError::UnsupportedCompositeSpec`] if the composite spec is not an object
    pub fn configure<C, X>(&self, claim: &C, composite: &mut X) -> Result<(), ConfigureError>
    where
        C: CompositeClaim + ?Sized,
        X: Composite + ?Sized,
    {
        composite.set_generate_name(format!("{}-", claim.name()));
        composite.add_labels(BTreeMap::from([
            (
                self.config.labels.claim_namespace.clone(),
                claim.namespace().to_string(),
            ),
            (self.config.labels.claim_name.clone(), claim.name().to_string()),
        ]));

        let (Some(cm), Some(cp)) = (claim.unstructured(), composite.unstructured_mut()) else {
            debug!(claim = %claim.key(), "skipping content configuration of fixed-schema resource");
            return Ok(());
        };

        let spec = cm
            .fields_at(SPEC)
            .map_err(|_| ConfigureError::UnsupportedClaimSpec)?;
        let filtered = filter_fields(spec, &self.config.claim_to_composite_blocked);

        // The composite's external name has most likely taken effect already
        // and cannot be changed retroactively.
        let key = &self.config.external_name_annotation;
        let claim_name = cm.annotation(key).unwrap_or_default();
        let composite_name = cp.annotation(key).unwrap_or_default();
        if !claim_name.is_empty() && !composite_name.is_empty() && claim_name != composite_name {
            warn!(
                claim = %claim.key(),
                claim_external_name = claim_name,
                composite_external_name = composite_name,
                "external name mismatch"
            );
            return Err(ConfigureError::ExternalNameMismatch {
                claim: claim_name.to_string(),
                composite: composite_name.to_string(),
            });
        }

        OverlayMerge
            .merge_field(
                cp.object_mut(),
                SPEC,
                Some(&Value::Object(filtered)),
                &MergeOptions::new(),
            )
            .map_err(|_| ConfigureError::UnsupportedCompositeSpec)?;

        cp.add_missing_annotations(cm.annotations());

        debug!(claim = %claim.key(), "configured composite resource");
        Ok(())
    }
}
