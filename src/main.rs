//! depscope - runtime diagnostics engine
//!
//! Replays recorded measurements through the engine, runs retention cleanup and
//! validates configuration.

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use depscope::core::models::{ExternalDependency, RequestMeasurement};
use depscope::utils::logging::init_logging;
use depscope::{Config, DiagnosticsEngine};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Parser)]
#[command(name = "depscope", version, about = "Runtime diagnostics engine")]
struct Cli {
    /// YAML configuration file; DEPSCOPE_* variables override it
    #[arg(short, long, env = "DEPSCOPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest recorded measurements (one JSON object per line) and print the health report
    Replay {
        measurements: PathBuf,

        /// JSON array of external dependencies to register first
        #[arg(short, long)]
        dependencies: Option<PathBuf>,

        /// Seconds to wait for ingestion to drain
        #[arg(long, default_value_t = 60)]
        drain_timeout: u64,
    },
    /// Delete overflow files older than the retention window
    Cleanup,
    /// Validate the configuration and print it
    CheckConfig,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let env = Config::from_env().context("reading DEPSCOPE_* environment")?;
    let config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?
            .merge(env),
        None => env,
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging)?;
    let build = depscope::build_info();
    debug!(
        version = build.version,
        commit = build.commit,
        rustc = build.rustc,
        built_at = build.built_at,
        "depscope build"
    );

    match cli.command {
        Command::CheckConfig => {
            println!("{}", config.to_yaml()?);
            info!("Configuration is valid");
        }
        Command::Cleanup => {
            let engine = DiagnosticsEngine::new(config)?;
            let deleted = engine.cleanup_old_data();
            println!("Deleted {} expired metric files", deleted);
        }
        Command::Replay {
            measurements,
            dependencies,
            drain_timeout,
        } => {
            let engine = DiagnosticsEngine::new(config)?;
            if let Some(path) = dependencies {
                register_dependencies(&engine, &path)?;
            }

            let ingested = replay_measurements(&engine, &measurements)?;
            if !engine.wait_idle(Duration::from_secs(drain_timeout)) {
                warn!("Ingestion did not drain within {}s", drain_timeout);
            }
            info!(ingested, "Replay finished");

            let report = engine.generate_report();
            println!("{}", serde_json::to_string_pretty(&report)?);
            engine.shutdown();
        }
    }
    Ok(())
}

fn register_dependencies(engine: &DiagnosticsEngine, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let dependencies: Vec<ExternalDependency> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;

    for dependency in dependencies {
        engine.register_dependency(dependency)?;
    }
    Ok(())
}

fn replay_measurements(engine: &DiagnosticsEngine, path: &Path) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let mut ingested = 0;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RequestMeasurement>(&line) {
            Ok(measurement) => {
                engine.ingest(measurement);
                ingested += 1;
            }
            Err(e) => warn!(line = index + 1, "Skipping malformed measurement: {}", e),
        }
    }
    Ok(ingested)
}
