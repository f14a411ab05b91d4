//! Compilation errors
//!
//! Every error is terminal: compilation either yields a complete graph or
//! fails with one of these and produces nothing.

use std::path::PathBuf;

use thiserror::Error;

use super::models::{AssertionError, AssertionRef};
use super::ports::StoreError;

/// Broad category of a [`SeedError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The device was seeded before
    AlreadySeeded,
    /// The trust chain could not be established
    Trust,
    /// The model does not fit the running system
    Consistency,
    /// The manifest is missing, malformed or inconsistent with the model
    Manifest,
    /// A package's provenance could not be established
    Provenance,
    /// Persisted device state could not be read or written
    State,
    /// The package operations refused an install
    Install,
}

impl ErrorKind {
    /// Stable string form, used in JSON output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadySeeded => "ALREADY_SEEDED",
            Self::Trust => "TRUST",
            Self::Consistency => "CONSISTENCY",
            Self::Manifest => "MANIFEST",
            Self::Provenance => "PROVENANCE",
            Self::State => "STATE",
            Self::Install => "INSTALL",
        }
    }
}

/// Errors aborting trust import or graph compilation
#[derive(Debug, Error)]
pub enum SeedError {
    /// Seeded flag already set
    #[error("cannot populate state: already seeded")]
    AlreadySeeded,

    /// Device state could not be read or written
    #[error("cannot access device state: {0:#}")]
    State(anyhow::Error),

    /// Trust directory does not exist on a system that requires a seed
    #[error("cannot read assertion seed directory: directory does not exist")]
    TrustDirMissing,

    /// Trust directory exists but could not be listed
    #[error("cannot read assertion seed directory: {0:#}")]
    TrustDirUnreadable(anyhow::Error),

    /// An assertion file could not be read or decoded
    #[error("cannot read assertions from {}: {cause:#}", path.display())]
    ReadAssertions {
        /// Offending file
        path: PathBuf,
        /// Underlying failure
        cause: anyhow::Error,
    },

    /// Two model assertions with differing identity
    #[error("cannot add more than one model assertion ({first} and {second})")]
    MultipleModels {
        /// First model seen
        first: AssertionRef,
        /// Conflicting model
        second: AssertionRef,
    },

    /// No model assertion in the trust directory
    #[error("need a model assertion")]
    MissingModel,

    /// The model assertion's headers are malformed
    #[error("invalid model assertion: {0}")]
    InvalidModel(#[source] AssertionError),

    /// The batch could not be committed
    #[error("cannot commit seed assertions: {0}")]
    Commit(#[source] StoreError),

    /// The model was committed but cannot be found again
    #[error("internal error: cannot find just added assertion {reference}: {source}")]
    ModelLookup {
        /// Model reference
        reference: AssertionRef,
        /// Lookup failure
        #[source]
        source: StoreError,
    },

    /// Classic model on a package-based system
    #[error("cannot seed a package-based system with a classic model")]
    ClassicModelOnPackageSystem,

    /// Package-based model on a classic system
    #[error("cannot seed a classic system with a package-based model")]
    PackageModelOnClassicSystem,

    /// No manifest on a system that requires one
    #[error("cannot read seed manifest: manifest does not exist")]
    MissingManifest,

    /// Manifest could not be read or is invalid
    #[error("cannot read seed manifest: {0:#}")]
    Manifest(anyhow::Error),

    /// Non-empty manifest without core
    #[error("cannot proceed without seeding core")]
    MissingCore,

    /// Model names a kernel the manifest lacks
    #[error("cannot find seed information for kernel package {0:?}")]
    MissingKernel(String),

    /// Model names a gadget the manifest lacks
    #[error("cannot find seed information for gadget package {0:?}")]
    MissingGadget(String),

    /// Nothing to install
    #[error("cannot proceed, no packages to seed")]
    NothingToSeed,

    /// Asserted package without matching signed metadata
    #[error("cannot find signatures with metadata for package {name:?} ({})", path.display())]
    MissingSignatures {
        /// Package name
        name: String,
        /// Package file
        path: PathBuf,
    },

    /// Side information lookup failed for another reason
    #[error("cannot derive side info for package {name:?}: {source}")]
    Provenance {
        /// Package name
        name: String,
        /// Lookup failure
        #[source]
        source: StoreError,
    },

    /// Package operations refused the install
    #[error("cannot install package {name:?}: {cause:#}")]
    Install {
        /// Package name
        name: String,
        /// Underlying failure
        cause: anyhow::Error,
    },
}

impl SeedError {
    /// Category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadySeeded => ErrorKind::AlreadySeeded,
            Self::State(_) => ErrorKind::State,
            Self::TrustDirMissing
            | Self::TrustDirUnreadable(_)
            | Self::ReadAssertions { .. }
            | Self::MultipleModels { .. }
            | Self::MissingModel
            | Self::InvalidModel(_)
            | Self::Commit(_)
            | Self::ModelLookup { .. } => ErrorKind::Trust,
            Self::ClassicModelOnPackageSystem | Self::PackageModelOnClassicSystem => {
                ErrorKind::Consistency
            },
            Self::MissingManifest
            | Self::Manifest(_)
            | Self::MissingCore
            | Self::MissingKernel(_)
            | Self::MissingGadget(_)
            | Self::NothingToSeed => ErrorKind::Manifest,
            Self::MissingSignatures { .. } | Self::Provenance { .. } => ErrorKind::Provenance,
            Self::Install { .. } => ErrorKind::Install,
        }
    }
}
