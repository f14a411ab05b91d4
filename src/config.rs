//! Configuration
//!
//! Where the seed and state live, and what kind of system is running. Read
//! from `config.toml` (see [`crate::paths::global_config`]) with every field
//! optional; command-line flags override individual fields.
//!
//! ```toml
//! build_mode = "classic"
//! seed_dir = "/var/lib/seedgraph/seed"
//! state_file = "/var/lib/seedgraph/state.json"
//! assertion_db = "/var/lib/seedgraph/assertions.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::models::BuildMode;
use crate::paths;

/// Resolved seedgraph configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Kind of system being seeded
    pub build_mode: BuildMode,
    /// Seed root directory
    pub seed_dir: PathBuf,
    /// State document holding the device identity and seeded flag
    pub state_file: PathBuf,
    /// Assertion database
    pub assertion_db: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::default(),
            seed_dir: PathBuf::from(paths::DEFAULT_SEED_DIR),
            state_file: PathBuf::from(paths::DEFAULT_STATE_FILE),
            assertion_db: PathBuf::from(paths::DEFAULT_ASSERTION_DB),
        }
    }
}

impl SeedConfig {
    /// Load configuration
    ///
    /// An explicit `path` must exist and parse. Without one, the global config
    /// file is used if present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let global = paths::global_config();
                if global.exists() {
                    Self::from_file(&global)
                } else {
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }
}
