//! Claim Document Model
//!
//! Resource documents whose shape is only known at runtime.
//!
//! # Core Concepts
//!
//! - [`Value`]: the tagged map/array/scalar/null tree produced by decoding JSON or YAML
//! - [`Fields`]: the object variant of a [`Value`], one level of key/value pairs
//! - [`Unstructured`]: a whole resource document with metadata accessors
//! - [`DocumentError`]: fallible casts and decoding failures
//!
//! Every accessor that expects a nested object returns a `Result` instead of
//! guessing, so callers decide what a type mismatch means for them.
//!
//! # Example
//!
//! ```
//! use claim_document::Unstructured;
//!
//! let doc = Unstructured::from_yaml(
//!     "metadata:\n  name: cool\n  namespace: spacename\nspec:\n  coolness: 23\n",
//! )
//! .unwrap();
//!
//! assert_eq!(doc.name(), "cool");
//! assert_eq!(doc.get("/spec/coolness"), Some(&serde_json::json!(23)));
//! ```

#![warn(unreachable_pub)]

mod error;
mod fields;
mod unstructured;

pub use error::DocumentError;
pub use fields::{as_fields, as_fields_mut, Fields, Value};
pub use unstructured::{Unstructured, ANNOTATIONS, GENERATE_NAME, LABELS, METADATA, NAME, NAMESPACE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
