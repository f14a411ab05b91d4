//! Services - compilation logic
//!
//! - `importer` - trust chain import and model extraction
//! - `compiler` - seed manifest to task graph
//! - `batch` - all-or-nothing assertion accumulation
//! - `graph` - fragment placement
//! - `provenance` - side information for asserted packages

pub mod batch;
pub mod compiler;
pub mod graph;
pub mod importer;
pub mod provenance;

pub use batch::{AssertionBatch, BatchError, Merge, merge};
pub use compiler::SeedCompiler;
pub use graph::GraphBuilder;
pub use importer::{ImportOutcome, TrustImporter, check_build_mode};
pub use provenance::{derive_side_info, package_digest};
