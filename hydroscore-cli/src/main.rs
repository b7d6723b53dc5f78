//! Hydroscore CLI - score water samples against drinking-water standards

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use hydroscore_core::report::HealthReport;
use hydroscore_core::{config, evaluate, health, ingest};
use hydroscore_core::{render_json, render_text, SampleOutcome, SampleReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hydroscore")]
#[command(about = "Water-quality index engine: HPI/HEI/MI computation and risk classification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a JSON file of water samples
    Score {
        /// Path to sample file (JSON array of records)
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Show only top N scored samples (overrides config file)
        #[arg(long)]
        top: Option<usize>,

        /// Minimum HPI to report (overrides config file)
        #[arg(long)]
        min_hpi: Option<f64>,

        /// Attach adult/child health-risk assessments
        #[arg(long)]
        health: bool,

        /// Evaluate samples across worker threads
        #[arg(long)]
        parallel: bool,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the resolved standards table
    Standards {
        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without scoring
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            path,
            format,
            top,
            min_hpi,
            health,
            parallel,
            config: config_path,
        } => {
            if !path.exists() {
                anyhow::bail!("Sample file does not exist: {}", path.display());
            }

            let root = std::env::current_dir()?;
            let resolved_config = config::load_and_resolve(&root, config_path.as_deref())
                .context("failed to load configuration")?;

            if let Some(config_path) = &resolved_config.config_path {
                eprintln!("Using config: {}", config_path.display());
            }

            let samples = ingest::load_samples(&path)?;

            // CLI flags override config file values
            let effective_min = min_hpi.or(resolved_config.min_hpi);
            let effective_top = top.or(resolved_config.top_n);

            let outcomes = if parallel {
                let options = hydroscore_core::ScoreOptions {
                    min_hpi: effective_min,
                    top_n: effective_top,
                    include_health: health,
                    parallel: true,
                };
                hydroscore_core::score_samples(&samples, options, &resolved_config)
            } else {
                score_with_progress(
                    &samples,
                    &resolved_config,
                    health,
                    effective_min,
                    effective_top,
                )
            };

            match format {
                OutputFormat::Text => {
                    print!("{}", render_text(&outcomes));
                }
                OutputFormat::Json => {
                    println!("{}", render_json(&outcomes));
                }
            }

            let failures = outcomes
                .iter()
                .filter(|o| matches!(o, SampleOutcome::Failed { .. }))
                .count();
            if failures > 0 {
                eprintln!("{} sample(s) could not be scored", failures);
            }
        }
        Commands::Standards {
            config: config_path,
        } => {
            let root = std::env::current_dir()?;
            let resolved = config::load_and_resolve(&root, config_path.as_deref())
                .context("failed to load configuration")?;

            println!(
                "{:<12} {:<8} {:>18} {:>12} {:>18}",
                "METAL", "SYMBOL", "PERMISSIBLE mg/L", "IDEAL mg/L", "BACKGROUND"
            );
            for (metal, std) in resolved.standards.iter() {
                println!(
                    "{:<12} {:<8} {:>18} {:>12} {:>18}",
                    metal.as_str(),
                    metal.symbol(),
                    std.permissible_limit,
                    std.ideal_value,
                    std.background_value
                );
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config invalid: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&root, path.as_deref())
                    .context("failed to load configuration")?;

                match &resolved.config_path {
                    Some(p) => println!("Config source: {}", p.display()),
                    None => println!("Config source: defaults"),
                }
                println!(
                    "Thresholds: low={} high={}",
                    resolved.thresholds.low, resolved.thresholds.high
                );
                println!("Standards entries: {}", resolved.standards.len());
                if let Some(min) = resolved.min_hpi {
                    println!("min_hpi: {}", min);
                }
                if let Some(top) = resolved.top_n {
                    println!("top: {}", top);
                }
            }
        },
    }

    Ok(())
}

/// Sequential scoring with a progress bar, mirroring the library pipeline.
fn score_with_progress(
    samples: &[hydroscore_core::RawSample],
    config: &hydroscore_core::ResolvedConfig,
    include_health: bool,
    min_hpi: Option<f64>,
    top_n: Option<usize>,
) -> Vec<SampleOutcome> {
    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} samples")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let outcomes: Vec<SampleOutcome> = samples
        .iter()
        .map(|sample| {
            let outcome = match evaluate(sample, &config.standards, &config.thresholds) {
                Ok(scored) => {
                    let health_report = include_health.then(|| HealthReport {
                        adult: health::assess(
                            &sample.concentrations,
                            health::Demographic::Adult,
                        ),
                        child: health::assess(
                            &sample.concentrations,
                            health::Demographic::Child,
                        ),
                    });
                    SampleOutcome::Scored(SampleReport::new(&scored, health_report))
                }
                Err(error) => SampleOutcome::Failed {
                    sample_id: sample.sample_id.clone(),
                    error,
                },
            };
            pb.inc(1);
            outcome
        })
        .collect();
    pb.finish_and_clear();

    hydroscore_core::finalize_outcomes(outcomes, min_hpi, top_n)
}
