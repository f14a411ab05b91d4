//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the compiler and the systems it
//! orchestrates but does not own: the seed on disk, persisted device state,
//! the assertion database, and the package operations that turn an install
//! or configure request into engine tasks.
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The core depends only on these traits, never on concrete implementations.
//! Tests substitute in-memory ports to drive every failure path.

mod assertion_store;
mod package_ops;
mod seed_source;
mod state_store;

pub use assertion_store::{AssertionStore, StoreError};
pub use package_ops::PackageOps;
pub use seed_source::SeedSource;
pub use state_store::StateStore;
