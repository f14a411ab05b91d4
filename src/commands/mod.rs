//! Command implementations

mod compile;
mod import;
mod mark_seeded;
mod status;

pub use compile::compile;
pub use import::import;
pub use mark_seeded::mark_seeded;
pub use status::status;

use seedgraph::adapters::file::{FileAssertionStore, FileStateStore};
use seedgraph::adapters::seed::DirSeedSource;
use seedgraph::config::SeedConfig;

/// The file-backed ports a command works against
struct Stores {
    source: DirSeedSource,
    state: FileStateStore,
    assertions: FileAssertionStore,
}

impl Stores {
    fn open(config: &SeedConfig) -> Self {
        Self {
            source: DirSeedSource::new(&config.seed_dir),
            state: FileStateStore::new(&config.state_file),
            assertions: FileAssertionStore::new(&config.assertion_db),
        }
    }
}
