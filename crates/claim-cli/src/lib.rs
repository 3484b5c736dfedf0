//! Claim Sync CLI
//!
//! File-based front end for the configurators. Documents are read as YAML,
//! which also accepts JSON.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use claim_document::Unstructured;
use claim_sync::{
    ClaimConfigurator, ClaimObject, CompositeConfigurator, CompositeObject, MemoryStore, Object,
    SyncConfig,
};
use tracing::info;

/// Read a resource document from `path`
///
/// # Errors
/// Returns error if the file can't be read or is not a YAML/JSON mapping
pub fn load_document(path: &Path) -> anyhow::Result<Unstructured> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Unstructured::from_yaml(&raw).with_context(|| format!("cannot parse {}", path.display()))
}

/// Serialization used for command output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML document
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown output format {other:?}, expected yaml or json"),
        }
    }
}

/// Render `doc` in `format`
///
/// # Errors
/// Returns error if the document can't be serialized
pub fn render(doc: &Unstructured, format: OutputFormat) -> anyhow::Result<String> {
    let out = match format {
        OutputFormat::Yaml => doc.to_yaml()?,
        OutputFormat::Json => doc.to_json()? + "\n",
    };
    Ok(out)
}

/// Read configuration from `path`, or use defaults
///
/// # Errors
/// Returns error if the file can't be read or parsed
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SyncConfig> {
    match path {
        Some(path) => Ok(SyncConfig::load(path)?),
        None => Ok(SyncConfig::default()),
    }
}

/// Configure `composite` from `claim` and return the composite
///
/// # Errors
/// Returns error if the configuration pass fails
pub fn compose(
    config: SyncConfig,
    claim: Unstructured,
    composite: Unstructured,
) -> anyhow::Result<Unstructured> {
    let claim = ClaimObject::new(claim);
    let mut composite = CompositeObject::new(composite);

    CompositeConfigurator::new(config)
        .configure(&claim, &mut composite)
        .with_context(|| format!("cannot configure composite for claim {}", claim.key()))?;

    info!(claim = %claim.key(), "composite configured");
    Ok(composite.into_inner())
}

/// Configure `claim` from `composite` and return the claim as persisted
///
/// The claim is seeded into an in-memory store first so both updates land.
///
/// # Errors
/// Returns error if the configuration pass fails
pub async fn sync(
    config: SyncConfig,
    claim: Unstructured,
    composite: Unstructured,
) -> anyhow::Result<Unstructured> {
    let store = Arc::new(MemoryStore::new());
    store.insert(claim.clone());

    let mut claim = ClaimObject::new(claim);
    let composite = CompositeObject::new(composite);
    let key = claim.key();

    ClaimConfigurator::new(store.clone())
        .with_config(config)
        .configure(&mut claim, &composite)
        .await
        .with_context(|| format!("cannot configure claim {key}"))?;

    store
        .get(&key)
        .with_context(|| format!("claim {key} missing from store"))
}
