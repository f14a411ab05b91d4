//! Seed source port
//!
//! Defines read-only access to the seed: the trust directory, the manifest
//! and the package files.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::models::SeedManifest;

/// Read-only view of a seed
pub trait SeedSource: Send + Sync {
    /// List the assertion stream files in the trust directory
    ///
    /// Returns `Ok(None)` only when the trust directory does not exist; any
    /// other failure to read it is an error.
    fn assertion_files(&self) -> anyhow::Result<Option<Vec<PathBuf>>>;

    /// Open one assertion stream file
    fn open(&self, path: &Path) -> anyhow::Result<Box<dyn Read>>;

    /// Load the seed manifest
    ///
    /// Returns `Ok(None)` when there is no manifest.
    fn manifest(&self) -> anyhow::Result<Option<SeedManifest>>;

    /// Path of a package file named in the manifest
    fn package_path(&self, file: &str) -> PathBuf;
}
