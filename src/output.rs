//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON. The JSON form of
//! [`CompileResult`] is what the execution engine consumes.

use colored::Colorize;
use serde::Serialize;

use crate::core::models::{DeviceIdentity, Fragment, ModelDescriptor, SeedGraph};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a compile operation
#[derive(Debug, Serialize)]
pub struct CompileResult {
    /// The compiled graph
    #[serde(flatten)]
    pub graph: SeedGraph,
}

/// Result of a trust import
#[derive(Debug, Serialize)]
pub struct ImportResult {
    /// Whether anything was imported
    pub imported: bool,
    /// The model the device is now bound to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelDescriptor>,
}

/// Current seeding status
#[derive(Debug, Serialize)]
pub struct StatusResult {
    /// Build mode in effect
    pub build_mode: String,
    /// Seed directory in effect
    pub seed_dir: String,
    /// Whether the system is seeded
    pub seeded: bool,
    /// When seeding completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_time: Option<String>,
    /// Recorded device identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceIdentity>,
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

/// A failed command
#[derive(Debug, Serialize)]
pub struct ErrorResult {
    /// Error category (e.g. "TRUST")
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn fragment_line(f: &Fragment) -> String {
    let waits = if f.waits_for.is_empty() {
        String::new()
    } else {
        let ids: Vec<String> = f.waits_for.iter().map(|w| w.index().to_string()).collect();
        format!("  (after {})", ids.join(", "))
    };
    let required = if f.is_required() { " [required]" } else { "" };
    format!(
        "  {:>3}  {:<11} {:<24}{}{}",
        f.id.index(),
        f.kind().to_string(),
        f.package().unwrap_or("-"),
        required,
        waits
    )
}

impl CompileResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        println!("{} {} fragment(s)\n", "Seed graph:".bold(), self.graph.len());
        for f in &self.graph.fragments {
            println!("{}", fragment_line(f));
        }
    }
}

impl ImportResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => match &self.model {
                Some(m) => {
                    println!("{} {}/{}", "Imported model".green(), m.brand_id, m.model);
                    println!("  classic: {}", m.classic);
                    println!("  kernel:  {}", m.kernel().unwrap_or("-"));
                    println!("  gadget:  {}", m.gadget().unwrap_or("-"));
                    if !m.required.is_empty() {
                        println!("  required: {}", m.required.join(", "));
                    }
                },
                None => println!("Nothing to import."),
            },
            OutputMode::Json => print_json(self),
        }
    }
}

impl StatusResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                println!("Build mode: {}", self.build_mode);
                println!("Seed:       {}", self.seed_dir);
                if self.seeded {
                    let at = self.seed_time.as_deref().unwrap_or("unknown time");
                    println!("Seeded:     {} ({at})", "yes".green());
                } else {
                    println!("Seeded:     {}", "no".yellow());
                }
                match &self.device {
                    Some(d) if !d.brand.is_empty() => println!("Device:     {}/{}", d.brand, d.model),
                    _ => println!("Device:     (unbound)"),
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}

impl ErrorResult {
    /// Render the error based on output mode (human errors go to stderr)
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => eprintln!("{} {}", "error:".red().bold(), self.message),
            OutputMode::Json => print_json(self),
        }
    }
}
