//! Synchronization configuration
//!
//! Reserved key sets and well-known metadata keys. Deployments may extend
//! the reserved sets without touching merge logic.

use std::path::Path;

use claim_merge::KeySet;
use serde::{Deserialize, Serialize};

/// Label binding a composite to its claim's namespace
pub const LABEL_KEY_CLAIM_NAMESPACE: &str = "crossplane.io/claim-namespace";

/// Label binding a composite to its claim's name
pub const LABEL_KEY_CLAIM_NAME: &str = "crossplane.io/claim-name";

/// Annotation carrying the externally visible name of a resource
pub const ANNOTATION_KEY_EXTERNAL_NAME: &str = "crossplane.io/external-name";

/// Status key that each resource owns independently
pub const CONDITIONS_KEY: &str = "conditions";

/// Claim spec keys that never reach the composite
pub const DEFAULT_CLAIM_TO_COMPOSITE_BLOCKED: [&str; 2] =
    ["resourceRef", "writeConnectionSecretToRef"];

/// Composite spec keys that never reach the claim
pub const DEFAULT_COMPOSITE_TO_CLAIM_BLOCKED: [&str; 2] = ["resourceRefs", "claimRef"];

/// Synchronization configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Claim spec keys filtered out before overlaying onto the composite
    pub claim_to_composite_blocked: KeySet,
    /// Composite spec keys filtered out before late-initializing the claim
    pub composite_to_claim_blocked: KeySet,
    /// Binding label keys
    pub labels: BindingLabels,
    /// External-name annotation key
    pub external_name_annotation: String,
    /// Status key left alone when mirroring status
    pub conditions_key: String,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also block `keys` when going from claim to composite
    #[must_use]
    pub fn with_claim_to_composite_blocked<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.claim_to_composite_blocked
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// Also block `keys` when going from composite to claim
    #[must_use]
    pub fn with_composite_to_claim_blocked<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.composite_to_claim_blocked
            .extend(keys.into_iter().map(Into::into));
        self
    }

    /// With binding label keys
    #[inline]
    #[must_use]
    pub fn with_labels(mut self, labels: BindingLabels) -> Self {
        self.labels = labels;
        self
    }

    /// With external-name annotation key
    #[inline]
    #[must_use]
    pub fn with_external_name_annotation(mut self, key: impl Into<String>) -> Self {
        self.external_name_annotation = key.into();
        self
    }

    /// Parse from TOML string
    ///
    /// # Errors
    /// Returns error if TOML is invalid
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a file; `.toml` files are parsed as TOML, anything else as YAML
    ///
    /// # Errors
    /// Returns error if the file can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml(&raw)
        } else {
            Self::from_yaml(&raw)
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            claim_to_composite_blocked: DEFAULT_CLAIM_TO_COMPOSITE_BLOCKED
                .into_iter()
                .map(String::from)
                .collect(),
            composite_to_claim_blocked: DEFAULT_COMPOSITE_TO_CLAIM_BLOCKED
                .into_iter()
                .map(String::from)
                .collect(),
            labels: BindingLabels::default(),
            external_name_annotation: ANNOTATION_KEY_EXTERNAL_NAME.to_string(),
            conditions_key: CONDITIONS_KEY.to_string(),
        }
    }
}

/// Label keys binding a composite to exactly one claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingLabels {
    /// Key whose value is the claim namespace
    pub claim_namespace: String,
    /// Key whose value is the claim name
    pub claim_name: String,
}

impl Default for BindingLabels {
    fn default() -> Self {
        Self {
            claim_namespace: LABEL_KEY_CLAIM_NAMESPACE.to_string(),
            claim_name: LABEL_KEY_CLAIM_NAME.to_string(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}
