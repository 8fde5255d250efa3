// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tie Rod Kernel CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tierod::cli::{Reporter, Runner};
use tierod::io::ExportFormat;
use tierod::utils::UnitConverter;
use tierod::RodConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tierod")]
#[command(about = "Tie Rod Kernel - parametric tie rod assembly generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: tierod.toml if present, or $TIEROD_CONFIG)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the assembly and export it
    Build {
        /// Output file
        #[arg(short, long, default_value = "tie_rod.glb")]
        output: PathBuf,

        /// Output format (gltf, glb, stl, json); defaults to the output extension
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },

    /// Show derived dimensions
    Dims {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run the fit checks only
    Check,

    /// Write a default config file
    Init {
        /// Destination
        #[arg(default_value = tierod::config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        Reporter::report_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tierod=debug" } else { "tierod=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RodConfig> {
    match path {
        Some(path) => RodConfig::from_file(path),
        None => RodConfig::load(),
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Build { output, format } => {
            let config = load_config(cli.config.as_deref())?;
            build_command(config, output, *format, cli.verbose)
        }
        Commands::Dims { json } => {
            let config = load_config(cli.config.as_deref())?;
            dims_command(&config, *json)
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            config.resolve().context("Dimension check failed")?;
            Reporter::success("All fit checks passed");
            Ok(())
        }
        Commands::Init { path, force } => init_command(path, *force),
        Commands::Version => {
            println!("Tie Rod Kernel v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_command(
    config: RodConfig,
    output: &Path,
    format: Option<ExportFormat>,
    verbose: bool,
) -> Result<()> {
    let format = match format.or_else(|| ExportFormat::from_path(output)) {
        Some(format) => format,
        None => anyhow::bail!("Cannot infer format from {:?}; pass --format", output),
    };

    let runner = Runner::new(config).with_progress(true);
    let result = runner.build()?;
    let export_time = runner.export(&result.assembly, output, format)?;

    if verbose {
        Reporter::report_build(&result.assembly, result.duration);
        Reporter::report_info(&format!(
            "Exported {} in {}",
            format,
            Reporter::format_duration(export_time)
        ));
    }
    Reporter::success(&format!(
        "Built {} parts -> {}",
        result.assembly.len(),
        output.display()
    ));
    Ok(())
}

fn dims_command(config: &RodConfig, json: bool) -> Result<()> {
    let dims = config.resolve().context("Dimension check failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&dims)?);
    } else {
        Reporter::report_dimensions(&dims, &UnitConverter::new(config.unit));
    }
    Ok(())
}

fn init_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        Reporter::report_warning(&format!(
            "{} already exists; use --force to overwrite",
            path.display()
        ));
        return Ok(());
    }
    RodConfig::default().save(path)?;
    println!("{} {}", "Wrote".green(), path.display().to_string().cyan());
    Ok(())
}
