//! Directory-backed seed source

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use log::debug;
use walkdir::WalkDir;

use crate::core::models::SeedManifest;
use crate::core::ports::SeedSource;
use crate::paths;

use super::parser::load_manifest;

/// Seed read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirSeedSource {
    /// Seed root directory
    root: PathBuf,
}

impl DirSeedSource {
    /// Create a source for the seed at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Seed root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SeedSource for DirSeedSource {
    fn assertion_files(&self) -> anyhow::Result<Option<Vec<PathBuf>>> {
        let dir = paths::assertions_dir(&self.root);
        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {},
            Ok(_) => bail!("{} is not a directory", dir.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("cannot stat {}", dir.display())),
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("cannot list {}", dir.display()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            } else {
                debug!("skipping non-file {}", entry.path().display());
            }
        }
        Ok(Some(files))
    }

    fn open(&self, path: &Path) -> anyhow::Result<Box<dyn Read>> {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        Ok(Box::new(file))
    }

    fn manifest(&self) -> anyhow::Result<Option<SeedManifest>> {
        let path = paths::seed_manifest(&self.root);
        match fs::metadata(&path) {
            Ok(_) => load_manifest(&path).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("cannot stat {}", path.display())),
        }
    }

    fn package_path(&self, file: &str) -> PathBuf {
        paths::packages_dir(&self.root).join(file)
    }
}
