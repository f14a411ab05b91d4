//! Seed directory adapter
//!
//! Implements `SeedSource` over a seed directory laid out as described in
//! [`crate::paths`].
//!
//! - [`parser`] - Read and validate `seed.toml`
//! - [`source`] - `SeedSource` implementation

pub mod parser;
pub mod source;

pub use parser::{SeedFile, load_manifest, parse_manifest};
pub use source::DirSeedSource;
