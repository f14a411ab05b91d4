//! Centralized path definitions for seedgraph
//!
//! Single source of truth for the seed layout and default state locations.
//!
//! ## Seed Layout
//!
//! ```text
//! <seed-dir>/
//! ├── seed.toml              # Manifest: packages to seed
//! ├── assertions/            # Trust directory: assertion streams
//! │   ├── model
//! │   └── acme.account
//! └── packages/              # Package files named by the manifest
//!     ├── core_6673.pkg
//!     └── pc-kernel_96.pkg
//! ```
//!
//! ### Global (User-Level)
//!
//! ```text
//! ~/.config/seedgraph/
//! └── config.toml            # Default build mode and locations
//! ```

use std::path::{Path, PathBuf};

// =============================================================================
// Seed layout
// =============================================================================

/// Seed manifest filename
pub const SEED_MANIFEST: &str = "seed.toml";

/// Trust directory name
pub const ASSERTIONS_DIR: &str = "assertions";

/// Package directory name
pub const PACKAGES_DIR: &str = "packages";

/// Path to the seed manifest
#[must_use]
pub fn seed_manifest(seed_dir: &Path) -> PathBuf {
    seed_dir.join(SEED_MANIFEST)
}

/// Path to the trust directory
#[must_use]
pub fn assertions_dir(seed_dir: &Path) -> PathBuf {
    seed_dir.join(ASSERTIONS_DIR)
}

/// Path to the package directory
#[must_use]
pub fn packages_dir(seed_dir: &Path) -> PathBuf {
    seed_dir.join(PACKAGES_DIR)
}

// =============================================================================
// System defaults
// =============================================================================

/// Default seed directory
pub const DEFAULT_SEED_DIR: &str = "/var/lib/seedgraph/seed";

/// Default state document
pub const DEFAULT_STATE_FILE: &str = "/var/lib/seedgraph/state.json";

/// Default assertion database
pub const DEFAULT_ASSERTION_DB: &str = "/var/lib/seedgraph/assertions.json";

// =============================================================================
// Global paths (user-level)
// =============================================================================

/// Global config directory name
const GLOBAL_DIR: &str = "seedgraph";

/// Global config filename
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Get the global seedgraph config directory.
///
/// Returns `~/.config/seedgraph/` (or the platform equivalent).
#[must_use]
pub fn global_config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from("/etc")).join(GLOBAL_DIR)
}

/// Get the global config file path.
#[must_use]
pub fn global_config() -> PathBuf {
    global_config_dir().join(GLOBAL_CONFIG_FILE)
}
