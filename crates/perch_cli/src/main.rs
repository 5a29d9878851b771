//! Perch CLI
//!
//! Replay overlay placement scenarios and validate engine configs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perch_layout::EngineConfig;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "perch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Perch overlay placement engine CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a placement scenario and print the result as JSON
    Solve {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Engine config supplying stack and default placement settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Check an engine config file for errors
    Validate {
        /// Engine config file (TOML)
        config: PathBuf,
    },

    /// Print the default engine config
    Defaults,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Solve {
            scenario,
            config,
            pretty,
        } => cmd_solve(&scenario, config.as_deref(), pretty),

        Commands::Validate { config } => cmd_validate(&config),

        Commands::Defaults => cmd_defaults(),
    }
}

fn load_engine(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load engine config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn cmd_solve(path: &Path, config: Option<&Path>, pretty: bool) -> Result<()> {
    let engine = load_engine(config)?;
    let scenario = Scenario::load(path)?;

    info!("Solving {}", path.display());
    let report = scenario.run(&engine)?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}

fn cmd_validate(path: &Path) -> Result<()> {
    let engine = load_engine(Some(path))?;

    info!(
        "{} is valid (base z-index {}, step {})",
        path.display(),
        engine.stack.base_z_index,
        engine.stack.z_step
    );
    Ok(())
}

fn cmd_defaults() -> Result<()> {
    let text = EngineConfig::default()
        .to_toml_string()
        .context("Failed to serialize the default config")?;
    print!("{}", text);
    Ok(())
}
