//! Overlay merge strategy
//!
//! The source is the declared desired state: every key it defines replaces
//! the destination value. Keys only the destination knows are kept.

use claim_document::Fields;

use crate::strategy::MergeStrategy;

/// Overwriting single-level merge
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayMerge;

impl OverlayMerge {
    /// Create new overlay strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MergeStrategy for OverlayMerge {
    fn merge(&self, dst: &mut Fields, src: &Fields) {
        for (key, value) in src {
            dst.insert(key.clone(), value.clone());
        }
    }

    fn name(&self) -> &'static str {
        "Overlay"
    }
}
