//! Standard package operations
//!
//! Produces the canonical task sequence for installing a package file and
//! for running its configure hook.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};

use crate::core::models::{ConfigureFlags, InstallFlags, SideInfo, Task};
use crate::core::ports::PackageOps;

/// Canonical install/configure task lists
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPackageOps;

impl PackageOps for StandardPackageOps {
    fn install_path(
        &self,
        side_info: &SideInfo,
        path: &Path,
        channel: &str,
        flags: InstallFlags,
    ) -> anyhow::Result<Vec<Task>> {
        let meta = fs::metadata(path)
            .with_context(|| format!("cannot open package file {}", path.display()))?;
        if !meta.is_file() {
            bail!("{} is not a regular file", path.display());
        }

        let name = &side_info.real_name;
        let rev = side_info
            .revision
            .map_or_else(|| " (unasserted)".to_string(), |r| format!(" (revision {r})"));

        let mut tasks = vec![
            Task::new("prerequisites", format!("Ensure prerequisites for {name:?} are available")),
            Task::new("prepare-package", format!("Prepare package {:?}", path.display().to_string())),
            Task::new("mount-package", format!("Mount package {name:?}{rev}")),
            Task::new("copy-package-data", format!("Copy package {name:?} data")),
            Task::new("setup-profiles", format!("Setup package {name:?}{rev} security profiles")),
            Task::new(
                "link-package",
                format!("Make package {name:?}{rev} available to the system on {channel}"),
            ),
            Task::new("run-hook", format!("Run install hook of {name:?} package if present")),
        ];
        if !flags.skip_configure {
            tasks.push(Task::new("run-hook", format!("Run configure hook of {name:?} package")));
        }
        tasks.push(Task::new("start-services", format!("Start package {name:?}{rev} services")));
        Ok(tasks)
    }

    fn configure(&self, name: &str, flags: ConfigureFlags) -> Vec<Task> {
        let summary = if flags.use_defaults {
            format!("Run configure hook of {name:?} package with seed defaults")
        } else {
            format!("Run configure hook of {name:?} package")
        };
        vec![Task::new("run-hook", summary)]
    }
}
