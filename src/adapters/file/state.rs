//! JSON state document
//!
//! Holds the device identity and seeded flag alongside any other keys the
//! system keeps in the same document; unknown keys are preserved on write.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::models::DeviceIdentity;
use crate::core::ports::StateStore;

use super::write_atomic;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDoc {
    #[serde(default)]
    seeded: bool,
    #[serde(default, rename = "seed-time", skip_serializing_if = "Option::is_none")]
    seed_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    device: Option<DeviceIdentity>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// State store backed by one JSON file
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store for the document at `path` (created on first write)
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When seeding completed, if it has
    pub fn seed_time(&self) -> anyhow::Result<Option<String>> {
        Ok(self.load()?.seed_time)
    }

    fn load(&self) -> anyhow::Result<StateDoc> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StateDoc::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", self.path.display()));
            },
        };
        serde_json::from_str(&content)
            .with_context(|| format!("cannot parse state {}", self.path.display()))
    }

    fn save(&self, doc: &StateDoc) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(doc)?;
        write_atomic(&self.path, &content)
    }
}

impl StateStore for FileStateStore {
    fn device(&self) -> anyhow::Result<Option<DeviceIdentity>> {
        Ok(self.load()?.device)
    }

    fn set_device(&self, device: &DeviceIdentity) -> anyhow::Result<()> {
        let mut doc = self.load()?;
        doc.device = Some(device.clone());
        debug!("writing device {}/{} to {}", device.brand, device.model, self.path.display());
        self.save(&doc)
    }

    fn seeded(&self) -> anyhow::Result<bool> {
        Ok(self.load()?.seeded)
    }

    fn set_seeded(&self) -> anyhow::Result<()> {
        let mut doc = self.load()?;
        doc.seeded = true;
        doc.seed_time = Some(chrono::Utc::now().to_rfc3339());
        self.save(&doc)
    }
}
