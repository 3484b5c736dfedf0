//! Claim Merge Primitives
//!
//! Single-level merge and filter operations shared by both directions of
//! claim/composite synchronization.
//!
//! # Core Concepts
//!
//! - [`filter_fields`]: shallow copy of an object without blocked keys
//! - [`MergeStrategy`]: core trait for merging one object level into another
//! - [`OverlayMerge`]: source wins on every key it defines
//! - [`LateInitMerge`]: source only fills keys the destination lacks
//! - [`MergeOptions`]: keys the source may never contribute
//!
//! Merges never recurse. A nested object on the source side replaces the
//! destination value wholesale.
//!
//! # Example
//!
//! ```
//! use claim_merge::{LateInitMerge, MergeStrategy, OverlayMerge};
//! use serde_json::json;
//!
//! let mut dst = json!({"coolness": 42, "resourceRefs": []});
//! let src = json!({"coolness": 23});
//!
//! OverlayMerge.merge(dst.as_object_mut().unwrap(), src.as_object().unwrap());
//! assert_eq!(dst, json!({"coolness": 23, "resourceRefs": []}));
//!
//! let late = json!({"coolness": 1, "extra": true});
//! LateInitMerge.merge(dst.as_object_mut().unwrap(), late.as_object().unwrap());
//! assert_eq!(dst, json!({"coolness": 23, "resourceRefs": [], "extra": true}));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod filter;
mod late_init;
mod overlay;
mod strategy;

pub use filter::{filter_fields, KeySet};
pub use late_init::LateInitMerge;
pub use overlay::OverlayMerge;
pub use strategy::{MergeError, MergeOptions, MergeStrategy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
