//! Core domain logic for seedgraph
//!
//! All access to the seed, device state, the assertion database and package
//! operations goes through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Assertion, ModelDescriptor, SeedManifest, SeedGraph)
//! - `services/` - Trust import and graph compilation
//! - `ports/` - Trait definitions for external dependencies
//! - `error` - Compilation errors

pub mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{ErrorKind, SeedError};
