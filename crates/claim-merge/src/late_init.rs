//! Late-initialization merge strategy
//!
//! The destination owns every value it already declares. The source only
//! fills gaps, typically with defaults computed after provisioning.

use claim_document::Fields;

use crate::strategy::MergeStrategy;

/// Gap-filling single-level merge
#[derive(Debug, Clone, Copy, Default)]
pub struct LateInitMerge;

impl LateInitMerge {
    /// Create new late-init strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MergeStrategy for LateInitMerge {
    fn merge(&self, dst: &mut Fields, src: &Fields) {
        for (key, value) in src {
            if !dst.contains_key(key) {
                dst.insert(key.clone(), value.clone());
            }
        }
    }

    fn name(&self) -> &'static str {
        "LateInit"
    }
}
