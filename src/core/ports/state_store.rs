//! State store port
//!
//! Defines access to the persisted device identity and seeded flag.

use crate::core::models::DeviceIdentity;

/// Persisted device state
///
/// Reads and writes are not atomic with respect to each other: one compiler
/// runs per boot.
pub trait StateStore: Send + Sync {
    /// Get the device identity
    ///
    /// Returns `Ok(None)` when no identity has been recorded yet.
    fn device(&self) -> anyhow::Result<Option<DeviceIdentity>>;

    /// Persist the device identity
    fn set_device(&self, device: &DeviceIdentity) -> anyhow::Result<()>;

    /// Whether the system has completed seeding (false when never recorded)
    fn seeded(&self) -> anyhow::Result<bool>;

    /// Record that seeding completed
    ///
    /// Called by the execution engine once the mark-seeded fragment runs,
    /// never by the compiler.
    fn set_seeded(&self) -> anyhow::Result<()>;
}
