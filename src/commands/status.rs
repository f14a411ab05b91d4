//! Status command - show seeding state and device identity

use seedgraph::config::SeedConfig;
use seedgraph::core::ports::StateStore;
use seedgraph::output::{OutputMode, StatusResult};

use super::Stores;

/// Show current seeding status
pub fn status(config: &SeedConfig, output_mode: OutputMode) -> anyhow::Result<()> {
    let stores = Stores::open(config);

    StatusResult {
        build_mode: config.build_mode.to_string(),
        seed_dir: config.seed_dir.display().to_string(),
        seeded: stores.state.seeded()?,
        seed_time: stores.state.seed_time()?,
        device: stores.state.device()?,
    }
    .render(output_mode);
    Ok(())
}
