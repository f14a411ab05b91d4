//! Task graph fragments
//!
//! A fragment is one schedulable unit of provisioning work handed to the
//! execution engine: install a package, configure a package, or mark the
//! system seeded. Fragments wait on earlier fragments only, so every graph
//! built from them is acyclic.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Position of a fragment within its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentId(pub(crate) usize);

impl FragmentId {
    /// Index of the fragment in [`SeedGraph::fragments`]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Kind of work a fragment performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentKind {
    /// Install a package
    Install,
    /// Configure an installed package
    Configure,
    /// Record that seeding finished
    MarkSeeded,
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Configure => write!(f, "configure"),
            Self::MarkSeeded => write!(f, "mark-seeded"),
        }
    }
}

/// Authenticated (or declared) identity of a package being installed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideInfo {
    /// Package name
    pub real_name: String,
    /// Store id, absent for unasserted packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    /// Store revision, absent for unasserted packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    /// Private to its publisher
    #[serde(default)]
    pub private: bool,
    /// Publisher contact
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact: String,
}

impl SideInfo {
    /// Side information for a package with no signed metadata
    #[must_use]
    pub fn unasserted(name: &str) -> Self {
        Self {
            real_name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Flags controlling a package install
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct InstallFlags {
    /// Do not run configuration as part of the install
    pub skip_configure: bool,
    /// Package is required by the model
    pub required: bool,
    /// Classic confinement
    pub classic: bool,
    /// Developer mode
    pub devmode: bool,
}

/// Flags controlling a configure step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureFlags {
    /// Apply gadget-provided configuration defaults
    pub use_defaults: bool,
}

/// One opaque task produced by the package operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task kind understood by the execution engine
    pub kind: String,
    /// Human-readable summary
    pub summary: String,
}

impl Task {
    /// Create a task
    #[must_use]
    pub fn new(kind: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            summary: summary.into(),
        }
    }
}

/// What a fragment does, with its operation-specific parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    /// Install a package file
    Install {
        /// Package name
        package: String,
        /// Path to the package file
        path: PathBuf,
        /// Channel to track
        channel: String,
        /// Package identity
        side_info: SideInfo,
        /// Install flags
        flags: InstallFlags,
    },
    /// Configure an installed package
    Configure {
        /// Package name
        package: String,
        /// Configure flags
        flags: ConfigureFlags,
    },
    /// Mark the system seeded
    MarkSeeded,
}

impl Operation {
    /// Kind of this operation
    #[must_use]
    pub const fn kind(&self) -> FragmentKind {
        match self {
            Self::Install { .. } => FragmentKind::Install,
            Self::Configure { .. } => FragmentKind::Configure,
            Self::MarkSeeded => FragmentKind::MarkSeeded,
        }
    }

    /// Target package, if any
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::Install { package, .. } | Self::Configure { package, .. } => Some(package),
            Self::MarkSeeded => None,
        }
    }
}

/// A fragment that has not been placed in a graph yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFragment {
    /// What the fragment does
    pub operation: Operation,
    /// Human-readable summary
    pub summary: String,
    /// Tasks making up the fragment
    pub tasks: Vec<Task>,
}

/// A placed fragment with its wait-dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Position in the graph
    pub id: FragmentId,
    /// What the fragment does
    #[serde(flatten)]
    pub operation: Operation,
    /// Human-readable summary
    pub summary: String,
    /// Tasks making up the fragment
    pub tasks: Vec<Task>,
    /// Fragments that must complete first
    pub waits_for: Vec<FragmentId>,
}

impl Fragment {
    /// Kind of work this fragment performs
    #[must_use]
    pub const fn kind(&self) -> FragmentKind {
        self.operation.kind()
    }

    /// Target package, if any
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.operation.package()
    }

    /// Whether the fragment installs a package the model requires
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self.operation, Operation::Install { flags: InstallFlags { required: true, .. }, .. })
    }
}

/// Ordered, acyclic collection of fragments produced by one compilation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedGraph {
    /// Fragments in emission order
    pub fragments: Vec<Fragment>,
}

impl SeedGraph {
    /// Number of fragments
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the graph holds no fragments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Get a fragment by id
    #[must_use]
    pub fn get(&self, id: FragmentId) -> Option<&Fragment> {
        self.fragments.get(id.0)
    }

    /// Find the fragment of a given kind targeting a package
    #[must_use]
    pub fn find(&self, kind: FragmentKind, package: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.kind() == kind && f.package() == Some(package))
    }

    /// The mark-seeded fragment, if present
    #[must_use]
    pub fn mark_seeded(&self) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.kind() == FragmentKind::MarkSeeded)
    }

    /// Fragments that wait on nothing
    pub fn roots(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter().filter(|f| f.waits_for.is_empty())
    }

    /// Whether `from` waits on `on`, directly or transitively
    #[must_use]
    pub fn waits_on(&self, from: FragmentId, on: FragmentId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(fragment) = self.get(id) else {
                continue;
            };
            for &pred in &fragment.waits_for {
                if pred == on {
                    return true;
                }
                if seen.insert(pred) {
                    stack.push(pred);
                }
            }
        }
        false
    }

    /// Check that every dependency points at an earlier fragment
    ///
    /// Holds for every graph built by the compiler; an engine receiving a
    /// graph from elsewhere can use it before scheduling.
    #[must_use]
    pub fn is_well_ordered(&self) -> bool {
        self.fragments.iter().enumerate().all(|(i, f)| {
            f.id.0 == i && f.waits_for.iter().all(|p| p.0 < i)
        })
    }
}
