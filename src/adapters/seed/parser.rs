//! TOML parser for seed.toml manifests
//!
//! ```toml
//! [[package]]
//! name = "core"
//! file = "core_6673.pkg"
//!
//! [[package]]
//! name = "hello-world"
//! file = "hello-world_27.pkg"
//! channel = "beta"
//! devmode = true
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::core::models::{SeedEntry, SeedManifest};

/// A seed.toml file structure
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    /// Packages in manifest order
    #[serde(default, rename = "package")]
    pub packages: Vec<SeedEntry>,
}

/// Parse and validate manifest text
///
/// # Errors
///
/// Returns an error if the text is not valid TOML, or if an entry is invalid
/// or duplicated.
pub fn parse_manifest(content: &str) -> anyhow::Result<SeedManifest> {
    let file: SeedFile = toml::from_str(content)?;
    Ok(SeedManifest::new(file.packages)?)
}

/// Load and validate a manifest file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_manifest(path: &Path) -> anyhow::Result<SeedManifest> {
    let content =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    parse_manifest(&content).with_context(|| format!("invalid manifest {}", path.display()))
}
