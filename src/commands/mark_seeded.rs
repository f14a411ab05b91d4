//! Mark-seeded command - the execution engine's final step

use log::info;

use seedgraph::config::SeedConfig;
use seedgraph::core::ports::StateStore;
use seedgraph::output::{OperationResult, OutputMode};

use super::Stores;

/// Record that seeding has completed
pub fn mark_seeded(config: &SeedConfig, output_mode: OutputMode) -> anyhow::Result<()> {
    let stores = Stores::open(config);

    let message = if stores.state.seeded()? {
        "System already seeded.".to_string()
    } else {
        stores.state.set_seeded()?;
        info!("marked {} seeded", stores.state.path().display());
        "System marked seeded.".to_string()
    };

    OperationResult {
        success: true,
        message,
    }
    .render(output_mode);
    Ok(())
}
