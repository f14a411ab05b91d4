//! Domain models for seedgraph
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Assertion`] / [`AssertionRef`] - signed statements and their identity
//! - [`ModelDescriptor`] - the device model the seed was built for
//! - [`DeviceIdentity`] / [`BuildMode`] - persisted device state and system kind
//! - [`SeedManifest`] - packages shipped in the seed
//! - [`SeedGraph`] - the compiled, dependency-linked fragments

mod assertion;
mod device;
mod fragment;
mod model;
mod seed;

pub use assertion::{Assertion, AssertionError, AssertionRef, AssertionType};
pub use device::{BuildMode, DeviceIdentity};
pub use fragment::{
    ConfigureFlags, Fragment, FragmentId, FragmentKind, InstallFlags, Operation, PendingFragment,
    SeedGraph, SideInfo, Task,
};
pub use model::ModelDescriptor;
pub use seed::{CORE_PACKAGE, ManifestError, SeedEntry, SeedManifest};
