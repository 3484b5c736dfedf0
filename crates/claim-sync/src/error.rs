//! Error types for claim sync
//!
//! Every failure names the step that failed and, for merges, the side at
//! fault. Nothing is swallowed; retry policy belongs to the caller.

use claim_merge::MergeError;

use crate::store::StoreError;

/// Configuration pass error
#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    /// Claim spec is present but not an object
    #[error("composite resource claim spec was not an object")]
    UnsupportedClaimSpec,

    /// Composite spec is present but not an object
    #[error("composite resource spec was not an object")]
    UnsupportedCompositeSpec,

    /// Claim and composite disagree on an external name already in effect
    #[error(
        "composite resource claim external name {claim:?} does not match bound composite resource external name {composite:?}"
    )]
    ExternalNameMismatch {
        /// Name requested by the claim
        claim: String,
        /// Name in effect on the composite
        composite: String,
    },

    /// Composite status could not be merged into the claim
    #[error("cannot merge composite resource status into claim: {0}")]
    MergeStatus(#[source] MergeError),

    /// Claim status could not be persisted
    #[error("cannot update composite resource claim status: {0}")]
    UpdateStatus(#[source] StoreError),

    /// Composite spec could not be merged into the claim
    #[error("cannot merge composite resource spec into claim: {0}")]
    MergeSpec(#[source] MergeError),

    /// Claim could not be persisted
    #[error("cannot update composite resource claim: {0}")]
    Update(#[source] StoreError),
}

impl ConfigureError {
    /// Check if re-running the pass may succeed without user action
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UpdateStatus(_) | Self::Update(_))
    }

    /// Check if the failure was an optimistic concurrency conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::UpdateStatus(e) | Self::Update(e) => e.is_conflict(),
            _ => false,
        }
    }

    /// Merge error behind this failure, if any
    #[inline]
    #[must_use]
    pub fn merge_error(&self) -> Option<&MergeError> {
        match self {
            Self::MergeStatus(e) | Self::MergeSpec(e) => Some(e),
            _ => None,
        }
    }
}
