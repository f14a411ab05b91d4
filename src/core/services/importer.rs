//! Trust importer
//!
//! Reads the seed's assertion streams, commits them as one batch, and
//! returns the single model the device is bound to.

use std::path::Path;

use log::{debug, info};

use crate::core::error::SeedError;
use crate::core::models::{AssertionRef, AssertionType, BuildMode, ModelDescriptor};
use crate::core::ports::{AssertionStore, SeedSource, StateStore};

use super::batch::AssertionBatch;

/// Result of a trust import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Assertions were committed and the device bound to this model
    Imported(ModelDescriptor),
    /// Seeding is optional here and the seed has no trust directory
    NothingToImport,
}

/// Imports the seed's trust chain
#[derive(Clone, Copy)]
pub struct TrustImporter<'a> {
    source: &'a dyn SeedSource,
    state: &'a dyn StateStore,
    store: &'a dyn AssertionStore,
    mode: BuildMode,
}

impl std::fmt::Debug for TrustImporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustImporter").field("mode", &self.mode).finish_non_exhaustive()
    }
}

impl<'a> TrustImporter<'a> {
    /// Create an importer over the given ports
    #[must_use]
    pub fn new(
        source: &'a dyn SeedSource,
        state: &'a dyn StateStore,
        store: &'a dyn AssertionStore,
        mode: BuildMode,
    ) -> Self {
        Self {
            source,
            state,
            store,
            mode,
        }
    }

    /// Import the trust chain
    ///
    /// The device identity is written only after every check has passed.
    pub fn import(&self) -> Result<ImportOutcome, SeedError> {
        let mut device = self.state.device().map_err(SeedError::State)?.unwrap_or_default();

        let Some(files) = self.source.assertion_files().map_err(SeedError::TrustDirUnreadable)?
        else {
            if self.mode.seed_optional() {
                info!("no assertion seed directory on a {} system, nothing to import", self.mode);
                return Ok(ImportOutcome::NothingToImport);
            }
            return Err(SeedError::TrustDirMissing);
        };

        let mut batch = AssertionBatch::new();
        let mut model_ref: Option<AssertionRef> = None;
        for path in &files {
            let refs = self.read_assertions(path, &mut batch)?;
            debug!("read {} assertions from {}", refs.len(), path.display());

            for reference in refs {
                if reference.assertion_type != AssertionType::Model {
                    continue;
                }
                if let Some(first) = &model_ref
                    && first.unique() != reference.unique()
                {
                    return Err(SeedError::MultipleModels {
                        first: first.clone(),
                        second: reference,
                    });
                }
                model_ref = Some(reference);
            }
        }
        let model_ref = model_ref.ok_or(SeedError::MissingModel)?;

        // Refuse a malformed model before anything becomes durable.
        if let Some(pending) = batch.get(&model_ref) {
            ModelDescriptor::from_assertion(pending).map_err(SeedError::InvalidModel)?;
        }

        info!("committing {} seed assertions", batch.len());
        batch.commit(self.store).map_err(SeedError::Commit)?;

        let assertion = self.store.find(&model_ref).map_err(|source| SeedError::ModelLookup {
            reference: model_ref.clone(),
            source,
        })?;
        let model = ModelDescriptor::from_assertion(&assertion).map_err(SeedError::InvalidModel)?;

        check_build_mode(self.mode, &model)?;

        device.brand.clone_from(&model.brand_id);
        device.model.clone_from(&model.model);
        self.state.set_device(&device).map_err(SeedError::State)?;
        info!("device bound to model {}/{}", model.brand_id, model.model);

        Ok(ImportOutcome::Imported(model))
    }

    fn read_assertions(
        &self,
        path: &Path,
        batch: &mut AssertionBatch,
    ) -> Result<Vec<AssertionRef>, SeedError> {
        let reader = self.source.open(path).map_err(|cause| SeedError::ReadAssertions {
            path: path.to_path_buf(),
            cause,
        })?;
        batch.add_stream(reader).map_err(|err| SeedError::ReadAssertions {
            path: path.to_path_buf(),
            cause: err.into(),
        })
    }
}

/// Check that the model's `classic` flag matches the running system
pub fn check_build_mode(mode: BuildMode, model: &ModelDescriptor) -> Result<(), SeedError> {
    match (mode.is_classic(), model.classic) {
        (false, true) => Err(SeedError::ClassicModelOnPackageSystem),
        (true, false) => Err(SeedError::PackageModelOnClassicSystem),
        _ => Ok(()),
    }
}
