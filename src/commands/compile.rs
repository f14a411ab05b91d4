//! Compile command - import the trust chain and emit the seed graph

use log::debug;

use seedgraph::adapters::ops::StandardPackageOps;
use seedgraph::config::SeedConfig;
use seedgraph::core::services::SeedCompiler;
use seedgraph::output::{CompileResult, OutputMode};

use super::Stores;

/// Compile the configured seed into a task graph
pub fn compile(config: &SeedConfig, output_mode: OutputMode) -> anyhow::Result<()> {
    debug!("compiling seed {} ({})", config.seed_dir.display(), config.build_mode);
    let stores = Stores::open(config);
    let ops = StandardPackageOps;

    let graph = SeedCompiler::new(
        &stores.source,
        &stores.state,
        &stores.assertions,
        &ops,
        config.build_mode,
    )
    .compile()?;

    CompileResult { graph }.render(output_mode);
    Ok(())
}
