//! Package operations port
//!
//! Turns install and configure requests into the opaque task lists the
//! execution engine runs.

use std::path::Path;

use crate::core::models::{ConfigureFlags, InstallFlags, SideInfo, Task};

/// Producer of install and configure tasks
pub trait PackageOps: Send + Sync {
    /// Tasks installing the package file at `path`
    fn install_path(
        &self,
        side_info: &SideInfo,
        path: &Path,
        channel: &str,
        flags: InstallFlags,
    ) -> anyhow::Result<Vec<Task>>;

    /// Tasks configuring an installed package
    fn configure(&self, name: &str, flags: ConfigureFlags) -> Vec<Task>;
}
