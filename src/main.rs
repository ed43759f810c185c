//! Colguard CLI - Column-level Dataset Validation
//!
//! Runs a validation pipeline over one or more CSV files and writes a JSON
//! report.
//!
//! Exit codes: 0 when every pipeline passed, 1 on I/O or configuration
//! errors, 2 when at least one pipeline completed with failures.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colguard::prelude::*;
use log::{error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "colguard")]
#[command(about = "Validate tabular datasets against declarative column rules")]
#[command(version = colguard::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a validation pipeline over CSV files
    Run {
        /// Input CSV file (repeat for several files)
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Pipeline configuration (.json, .yaml, .yml or .toml)
        #[arg(short, long)]
        config: PathBuf,

        /// Where to write the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep at most this many violation details per result
        #[arg(long)]
        max_details: Option<usize>,

        /// Enable verbose debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all available validators
    List,

    /// Show detailed info about a validator
    Info {
        /// Validator name
        validator: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Run { verbose: true, .. });
    init_logging(verbose);

    let outcome = match cli.command {
        Commands::Run {
            input,
            config,
            output,
            max_details,
            ..
        } => run(&input, &config, output.as_deref(), max_details),
        Commands::List => {
            list_validators();
            Ok(true)
        }
        Commands::Info { validator } => validator_info(&validator),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// Returns whether every pipeline passed.
fn run(
    inputs: &[PathBuf],
    config_path: &Path,
    output: Option<&Path>,
    max_details: Option<usize>,
) -> Result<bool> {
    info!("Loading validation config from {}...", config_path.display());
    let config = load_config(config_path).context("Configuration error")?;
    info!("Found {} validations to run", config.len());

    let mut datasets = Vec::with_capacity(inputs.len());
    for path in inputs {
        info!("Loading data from {}...", path.display());
        let dataset = read_csv(path)
            .with_context(|| format!("Failed to read input CSV {}", path.display()))?;
        info!(
            "Loaded {} records with {} columns",
            dataset.row_count(),
            dataset.column_count()
        );
        datasets.push(dataset);
    }

    let mut options = RunOptions::new();
    if let Some(max) = max_details {
        options = options.with_max_violation_details(max);
    }

    info!("Running validation pipeline...");
    let summaries = validate_many_with_options(&config, global(), &datasets, &options)
        .context("Validation error")?;

    for (path, summary) in inputs.iter().zip(&summaries) {
        println!();
        if inputs.len() > 1 {
            println!("Input: {}", path.display());
        }
        println!("{}", summary.render_text());

        let failed: Vec<String> = summary
            .failures()
            .map(|r| format!("{}/{}", r.column, r.validator))
            .collect();
        if !failed.is_empty() {
            warn!("{}: failed validations: {}", path.display(), failed.join(", "));
        }
    }

    if let Some(output) = output {
        let written = if let [summary] = summaries.as_slice() {
            write_report(output, summary)
        } else {
            let names: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
            write_reports(
                output,
                names.iter().map(String::as_str).zip(summaries.iter()),
            )
        };
        written.with_context(|| format!("Failed to write report to {}", output.display()))?;
        info!("Detailed report saved to: {}", output.display());
    }

    Ok(summaries.iter().all(PipelineSummary::passed))
}

fn list_validators() {
    let registry = global();

    println!("Available validators ({} total):", registry.len());
    println!();
    for descriptor in registry.descriptors() {
        let marker = if descriptor.config_constructible() {
            ""
        } else {
            " (programmatic only)"
        };
        println!("  • {} - {}{}", descriptor.name, descriptor.description, marker);
    }
}

fn validator_info(name: &str) -> Result<bool> {
    let registry = global();
    let descriptor = registry.descriptor(name).with_context(|| {
        format!(
            "Unknown validator '{}'. Available: {}",
            name,
            registry.names().collect::<Vec<_>>().join(", ")
        )
    })?;

    println!("📋 {}", descriptor.name);
    println!();
    println!("Description: {}", descriptor.description);
    if !descriptor.tags.is_empty() {
        println!("Tags: {}", descriptor.tags.join(", "));
    }
    println!();

    if descriptor.parameters.is_empty() {
        println!("Parameters: none");
    } else {
        println!("Parameters:");
        for param in &descriptor.parameters {
            let requirement = if param.required { "required" } else { "optional" };
            let default = param
                .default_value
                .as_ref()
                .map(|v| format!(" [default: {}]", v))
                .unwrap_or_default();
            println!(
                "  • {} ({}, {}){} - {}",
                param.name, param.param_type, requirement, default, param.description
            );
            for constraint in &param.constraints {
                println!("      {}", constraint.description());
            }
        }
    }

    if !descriptor.config_constructible() {
        println!();
        println!("Note: this validator can only be configured programmatically.");
    }
    Ok(true)
}
