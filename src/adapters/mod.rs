//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `seed/` - seed directory layout and `seed.toml` manifest parsing
//! - `file/` - JSON-file device state and assertion database
//! - `ops/` - canonical install/configure task lists

pub mod file;
pub mod ops;
pub mod seed;
