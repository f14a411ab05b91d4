//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use seedgraph::config::SeedConfig;
use seedgraph::core::SeedError;
use seedgraph::core::models::BuildMode;
use seedgraph::output::{ErrorResult, OutputMode};

/// seedgraph - First-boot seed compiler
#[derive(Parser, Debug)]
#[command(
    name = "seedgraph",
    version,
    about = "Compile a device seed into an ordered install task graph",
    long_about = "Import the seed's assertions and compile its packages into a task graph.\n\n\
                  The graph installs core, kernel and gadget first, configures them with\n\
                  seed defaults, then installs the remaining packages and marks the\n\
                  system seeded."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed directory
    #[arg(long, global = true)]
    pub seed_dir: Option<PathBuf>,

    /// Device state document
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Assertion database
    #[arg(long, global = true)]
    pub assertion_db: Option<PathBuf>,

    /// Treat the running system as classic (seeding optional)
    #[arg(long, global = true)]
    pub classic: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import the seed's assertions and compile the task graph
    Compile,

    /// Import the seed's assertions and bind the device to its model
    Import,

    /// Show seeding status and device identity
    Status,

    /// Record that seeding has completed
    MarkSeeded,

    /// Show version
    Version,
}

impl Cli {
    /// Resolve configuration, applying command-line overrides
    fn settings(&self) -> anyhow::Result<SeedConfig> {
        let mut config = SeedConfig::load(self.config.as_deref())?;
        if let Some(dir) = &self.seed_dir {
            config.seed_dir.clone_from(dir);
        }
        if let Some(state) = &self.state {
            config.state_file.clone_from(state);
        }
        if let Some(db) = &self.assertion_db {
            config.assertion_db.clone_from(db);
        }
        if self.classic {
            config.build_mode = BuildMode::Classic;
        }
        Ok(config)
    }
}

/// A failed command, rendered in the mode it was requested in
#[derive(Debug)]
pub struct Failure {
    error: anyhow::Error,
    mode: OutputMode,
}

impl Failure {
    /// Print the failure
    pub fn render(&self) {
        let kind = self
            .error
            .downcast_ref::<SeedError>()
            .map_or("ERROR", |err| err.kind().as_str());
        ErrorResult {
            kind: kind.to_string(),
            message: format!("{:#}", self.error),
        }
        .render(self.mode);
    }
}

/// Run the CLI
pub fn run() -> Result<(), Failure> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    dispatch(&cli, output_mode).map_err(|error| Failure {
        error,
        mode: output_mode,
    })
}

fn dispatch(cli: &Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Compile) => commands::compile(&cli.settings()?, output_mode),
        Some(Command::Import) => commands::import(&cli.settings()?, output_mode),
        Some(Command::Status) => commands::status(&cli.settings()?, output_mode),
        Some(Command::MarkSeeded) => commands::mark_seeded(&cli.settings()?, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": seedgraph::VERSION
                    })
                );
            } else {
                println!("seedgraph v{}", seedgraph::VERSION);
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": seedgraph::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("seedgraph v{}", seedgraph::VERSION);
                println!("\nRun 'seedgraph --help' for usage");
                println!("Run 'seedgraph compile --seed-dir <DIR>' to compile a seed");
            }
            Ok(())
        },
    }
}
