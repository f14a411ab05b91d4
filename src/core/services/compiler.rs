//! Seed graph compiler
//!
//! Turns the imported model and the seed manifest into an ordered graph of
//! install and configure fragments for the execution engine.
//!
//! ## Ordering
//!
//! ```text
//! install(core) -> install(kernel) -> install(gadget)
//!     -> configure(core) -> configure(kernel) -> configure(gadget)
//!     -> install(other 1) -> ... -> install(other n)
//!     -> mark-seeded
//! ```
//!
//! Foundational packages are installed with configuration deferred so that
//! gadget-provided defaults exist before any of them is configured.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::core::error::SeedError;
use crate::core::models::{
    BuildMode, CORE_PACKAGE, ConfigureFlags, FragmentId, InstallFlags, ModelDescriptor,
    Operation, PendingFragment, SeedEntry, SeedGraph, SeedManifest, SideInfo, Task,
};
use crate::core::ports::{AssertionStore, PackageOps, SeedSource, StateStore};

use super::graph::GraphBuilder;
use super::importer::{ImportOutcome, TrustImporter};
use super::provenance::derive_side_info;

/// Foundational packages named by the model
#[derive(Debug, Clone, Copy)]
enum Foundation {
    Kernel,
    Gadget,
}

impl Foundation {
    fn missing(self, name: &str) -> SeedError {
        match self {
            Self::Kernel => SeedError::MissingKernel(name.to_string()),
            Self::Gadget => SeedError::MissingGadget(name.to_string()),
        }
    }
}

/// Compiles a seed into a [`SeedGraph`]
#[derive(Clone, Copy)]
pub struct SeedCompiler<'a> {
    source: &'a dyn SeedSource,
    state: &'a dyn StateStore,
    store: &'a dyn AssertionStore,
    ops: &'a dyn PackageOps,
    mode: BuildMode,
}

impl std::fmt::Debug for SeedCompiler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedCompiler").field("mode", &self.mode).finish_non_exhaustive()
    }
}

impl<'a> SeedCompiler<'a> {
    /// Create a compiler over the given ports
    #[must_use]
    pub fn new(
        source: &'a dyn SeedSource,
        state: &'a dyn StateStore,
        store: &'a dyn AssertionStore,
        ops: &'a dyn PackageOps,
        mode: BuildMode,
    ) -> Self {
        Self {
            source,
            state,
            store,
            ops,
            mode,
        }
    }

    /// Compile the seed
    ///
    /// Fails with [`SeedError::AlreadySeeded`] before touching the trust
    /// chain if the device was seeded before. Any failure returns no graph.
    pub fn compile(&self) -> Result<SeedGraph, SeedError> {
        if self.state.seeded().map_err(SeedError::State)? {
            return Err(SeedError::AlreadySeeded);
        }

        let importer = TrustImporter::new(self.source, self.state, self.store, self.mode);
        let model = match importer.import()? {
            ImportOutcome::Imported(model) => model,
            ImportOutcome::NothingToImport => return Ok(mark_seeded_only()),
        };

        let manifest = match self.source.manifest().map_err(SeedError::Manifest)? {
            Some(manifest) => manifest,
            None if self.mode.seed_optional() => {
                warn!("no seed manifest on a {} system, only marking seeded", self.mode);
                return Ok(mark_seeded_only());
            },
            None => return Err(SeedError::MissingManifest),
        };

        let graph = self.plan(&model, &manifest)?;
        info!("compiled {} fragments from {} seed packages", graph.len(), manifest.len());
        Ok(graph)
    }

    /// Build the graph for an already imported model and parsed manifest
    pub fn plan(
        &self,
        model: &ModelDescriptor,
        manifest: &SeedManifest,
    ) -> Result<SeedGraph, SeedError> {
        let mut graph = GraphBuilder::new();
        let mut installed: HashSet<&str> = HashSet::new();
        let mut install_tail: Option<FragmentId> = None;
        let mut configure_chain: Vec<PendingFragment> = Vec::new();

        let deferred = InstallFlags {
            skip_configure: true,
            ..InstallFlags::default()
        };

        if !manifest.is_empty() {
            let core = manifest.get(CORE_PACKAGE).ok_or(SeedError::MissingCore)?;
            install_tail = Some(graph.append_after(self.install(core, model, deferred)?, install_tail));
            configure_chain.push(self.configure(&core.name));
            installed.insert(&core.name);
        }

        let foundation =
            [(Foundation::Kernel, model.kernel()), (Foundation::Gadget, model.gadget())];
        for (role, name) in foundation {
            let Some(name) = name else {
                continue;
            };
            let entry = manifest.get(name).ok_or_else(|| role.missing(name))?;
            if !installed.insert(&entry.name) {
                debug!("{role:?} package {name:?} already scheduled");
                continue;
            }
            install_tail = Some(graph.append_after(self.install(entry, model, deferred)?, install_tail));
            configure_chain.push(self.configure(&entry.name));
        }

        // Configure core, kernel and gadget only once all three are installed.
        let mut tail = graph.append_chain(configure_chain, install_tail);

        for entry in manifest.iter().filter(|e| !installed.contains(e.name.as_str())) {
            let flags = InstallFlags {
                required: model.is_required(&entry.name),
                ..InstallFlags::default()
            };
            tail = Some(graph.append_after(self.install(entry, model, flags)?, tail));
        }

        let Some(tail) = tail else {
            return Err(SeedError::NothingToSeed);
        };
        graph.append_after(mark_seeded(), Some(tail));

        Ok(graph.finish())
    }

    fn install(
        &self,
        entry: &SeedEntry,
        model: &ModelDescriptor,
        mut flags: InstallFlags,
    ) -> Result<PendingFragment, SeedError> {
        flags.classic |= entry.classic;
        flags.devmode |= entry.devmode;

        let path = self.source.package_path(&entry.file);
        let side_info = if entry.unasserted {
            SideInfo::unasserted(&entry.name)
        } else {
            let mut side_info =
                derive_side_info(&path, &model.series, self.store).map_err(|source| {
                    if source.is_not_found() {
                        SeedError::MissingSignatures {
                            name: entry.name.clone(),
                            path: path.clone(),
                        }
                    } else {
                        SeedError::Provenance {
                            name: entry.name.clone(),
                            source,
                        }
                    }
                })?;
            side_info.private = entry.private;
            side_info.contact.clone_from(&entry.contact);
            side_info
        };

        let tasks = self
            .ops
            .install_path(&side_info, &path, &entry.channel, flags)
            .map_err(|cause| SeedError::Install {
                name: entry.name.clone(),
                cause,
            })?;
        debug!("install {:?} ({} tasks, {flags:?})", entry.name, tasks.len());

        Ok(PendingFragment {
            operation: Operation::Install {
                package: entry.name.clone(),
                path,
                channel: entry.channel.clone(),
                side_info,
                flags,
            },
            summary: format!("Install {:?} from seed", entry.name),
            tasks,
        })
    }

    fn configure(&self, name: &str) -> PendingFragment {
        let flags = ConfigureFlags { use_defaults: true };
        PendingFragment {
            operation: Operation::Configure {
                package: name.to_string(),
                flags,
            },
            summary: format!("Configure {name:?} with seed defaults"),
            tasks: self.ops.configure(name, flags),
        }
    }
}

fn mark_seeded() -> PendingFragment {
    PendingFragment {
        operation: Operation::MarkSeeded,
        summary: "Mark system seeded".to_string(),
        tasks: vec![Task::new("mark-seeded", "Mark system seeded")],
    }
}

fn mark_seeded_only() -> SeedGraph {
    let mut graph = GraphBuilder::new();
    graph.append_after(mark_seeded(), None);
    graph.finish()
}
