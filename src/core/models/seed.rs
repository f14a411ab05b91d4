//! Seed manifest model
//!
//! A seed manifest lists the packages shipped with the image, each pointing
//! at a package file in the seed's package directory.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the package that must be seeded whenever anything is seeded
pub const CORE_PACKAGE: &str = "core";

static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:-?[a-z0-9])*$").expect("static regex"));

/// Errors that make a manifest unusable
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    /// Package name is not a valid package name
    #[error("invalid package name: {0:?}")]
    InvalidName(String),

    /// Same package listed twice
    #[error("package {0:?} is listed more than once")]
    DuplicateEntry(String),

    /// File name is empty or contains a path separator
    #[error("package {name:?} has invalid file name {file:?}")]
    InvalidFile {
        /// Package name
        name: String,
        /// Offending file name
        file: String,
    },
}

fn default_channel() -> String {
    "stable".to_string()
}

/// One package listed in the seed manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
    /// Package name
    pub name: String,

    /// File name under the seed package directory
    pub file: String,

    /// Channel the package tracks after seeding
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Install with classic confinement
    #[serde(default)]
    pub classic: bool,

    /// Install in developer mode
    #[serde(default)]
    pub devmode: bool,

    /// Package has no signed metadata in the seed
    #[serde(default)]
    pub unasserted: bool,

    /// Package is private to its publisher
    #[serde(default)]
    pub private: bool,

    /// Publisher contact
    #[serde(default)]
    pub contact: String,
}

impl SeedEntry {
    /// Create an entry with default flags
    #[must_use]
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            channel: default_channel(),
            classic: false,
            devmode: false,
            unasserted: false,
            private: false,
            contact: String::new(),
        }
    }

    /// Mark this entry as unasserted
    #[must_use]
    pub const fn unasserted(mut self) -> Self {
        self.unasserted = true;
        self
    }

    fn validate(&self) -> Result<(), ManifestError> {
        if !PACKAGE_NAME.is_match(&self.name) {
            return Err(ManifestError::InvalidName(self.name.clone()));
        }
        if self.file.is_empty()
            || self.file.contains('/')
            || self.file.contains('\\')
            || self.file == "."
            || self.file == ".."
        {
            return Err(ManifestError::InvalidFile {
                name: self.name.clone(),
                file: self.file.clone(),
            });
        }
        Ok(())
    }
}

/// Validated seed manifest: unique names, manifest order preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedManifest {
    entries: Vec<SeedEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SeedManifest {
    /// Build a manifest, rejecting invalid or duplicate entries
    pub fn new(entries: Vec<SeedEntry>) -> Result<Self, ManifestError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            entry.validate()?;
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(ManifestError::DuplicateEntry(entry.name.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Look up an entry by package name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SeedEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Entries in manifest order
    pub fn iter(&self) -> impl Iterator<Item = &SeedEntry> {
        self.entries.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest lists no packages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
