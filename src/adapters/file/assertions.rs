//! JSON assertion database
//!
//! Assertions are keyed by their unique reference. A commit validates every
//! incoming assertion against the database before writing anything, then
//! replaces the file in one rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::models::{Assertion, AssertionRef};
use crate::core::ports::{AssertionStore, StoreError};
use crate::core::services::{Merge, merge};

use super::write_atomic;

#[derive(Debug, Default, Serialize, Deserialize)]
struct AssertionDb {
    #[serde(default)]
    assertions: BTreeMap<String, Assertion>,
}

/// Assertion store backed by one JSON file
#[derive(Debug, Clone)]
pub struct FileAssertionStore {
    path: PathBuf,
}

impl FileAssertionStore {
    /// Create a store for the database at `path` (created on first commit)
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored assertions
    pub fn count(&self) -> anyhow::Result<usize> {
        Ok(self.load()?.assertions.len())
    }

    fn load(&self) -> anyhow::Result<AssertionDb> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AssertionDb::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", self.path.display()));
            },
        };
        serde_json::from_str(&content)
            .with_context(|| format!("cannot parse assertion database {}", self.path.display()))
    }
}

impl AssertionStore for FileAssertionStore {
    fn commit(&self, assertions: &[Assertion]) -> Result<(), StoreError> {
        let mut db = self.load()?;
        let mut changed = 0;
        for assertion in assertions {
            let reference = assertion.reference()?;
            let key = reference.unique();
            match merge(db.assertions.get(&key), assertion, &reference)? {
                Merge::Insert | Merge::Replace => {
                    db.assertions.insert(key, assertion.clone());
                    changed += 1;
                },
                Merge::Keep => {},
            }
        }

        if changed > 0 {
            let content = serde_json::to_vec_pretty(&db).map_err(anyhow::Error::from)?;
            write_atomic(&self.path, &content)?;
        }
        debug!("committed {changed} new assertions to {}", self.path.display());
        Ok(())
    }

    fn find(&self, reference: &AssertionRef) -> Result<Assertion, StoreError> {
        self.load()?
            .assertions
            .remove(&reference.unique())
            .ok_or_else(|| StoreError::NotFound(reference.clone()))
    }
}
