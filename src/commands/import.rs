//! Import command - commit the seed's assertions and bind the device

use seedgraph::config::SeedConfig;
use seedgraph::core::services::{ImportOutcome, TrustImporter};
use seedgraph::output::{ImportResult, OutputMode};

use super::Stores;

/// Import the seed's trust chain without compiling a graph
pub fn import(config: &SeedConfig, output_mode: OutputMode) -> anyhow::Result<()> {
    let stores = Stores::open(config);
    let outcome =
        TrustImporter::new(&stores.source, &stores.state, &stores.assertions, config.build_mode)
            .import()?;

    let result = match outcome {
        ImportOutcome::Imported(model) => ImportResult {
            imported: true,
            model: Some(model),
        },
        ImportOutcome::NothingToImport => ImportResult {
            imported: false,
            model: None,
        },
    };
    result.render(output_mode);
    Ok(())
}
