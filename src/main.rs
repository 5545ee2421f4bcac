//! oas-tools: Semantic OpenAPI diff and breaking-change detection tool
//!
//! Compares two OpenAPI documents (swagger 2.0 or OpenAPI 3.x) and
//! reports classified semantic changes.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use oas_tools::diff::{BreakingRules, DiffMode, DiffOptions, DiffResult};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSupported OpenAPI versions:",
        "\n  swagger 2.0, OpenAPI 3.0.x, 3.1.x, 3.2.x (YAML, JSON)",
        "\n\nOutput Formats:",
        "\n  summary, json",
        "\n\nFeatures:",
        "\n  Semantic diff, breaking-change classification, severity rule overrides"
    )
}

#[derive(Parser)]
#[command(name = "oas-tools")]
#[command(version, long_version = build_long_version())]
#[command(about = "Semantic OpenAPI diff and breaking-change detection tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No breaking changes detected
    1  Breaking changes detected (with --fail-on-breaking)
    2  Error occurred

EXAMPLES:
    # Quick diff
    oas-tools diff old.yaml new.yaml

    # CI/CD contract gate
    oas-tools diff old.yaml new.yaml --fail-on-breaking

    # Strict classification, machine-readable output
    oas-tools diff old.yaml new.yaml --preset strict -o json > diff.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the old/baseline OpenAPI document
    source: PathBuf,

    /// Path to the new OpenAPI document
    target: PathBuf,

    /// Output format (summary, json)
    #[arg(short, long, default_value = "summary")]
    output: String,

    /// Report differences without breaking classification
    #[arg(long)]
    simple: bool,

    /// Drop info-severity changes from the result
    #[arg(long)]
    no_info: bool,

    /// Severity rules preset (default, strict, lenient)
    #[arg(long, default_value = "default", conflicts_with = "rules")]
    preset: String,

    /// Custom severity rules YAML file
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Exit with code 1 if any breaking change is detected
    #[arg(long)]
    fail_on_breaking: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two OpenAPI documents
    Diff(DiffArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Diff(args) => {
            let rules = match &args.rules {
                Some(path) => {
                    let content = std::fs::read_to_string(path)
                        .with_context(|| format!("reading rules file {}", path.display()))?;
                    BreakingRules::from_yaml(&content)?
                }
                None => BreakingRules::preset(&args.preset)?,
            };

            let mode = if args.simple {
                DiffMode::Simple
            } else {
                DiffMode::Breaking
            };

            let result = DiffOptions::new()
                .with_source_file_path(&args.source)
                .with_target_file_path(&args.target)
                .with_mode(mode)
                .with_include_info(!args.no_info)
                .with_breaking_rules(rules)
                .run()?;

            render(&result, &args.output)?;

            if args.fail_on_breaking && result.has_breaking_changes {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "oas-tools", &mut io::stdout());
            Ok(())
        }
    }
}

fn render(result: &DiffResult, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        _ => {
            for change in &result.changes {
                println!("{}", change.to_warning_string());
            }
            println!(
                "{} changes ({} critical, {} error, {} warning, {} info)",
                result.changes.len(),
                result.critical_count,
                result.error_count,
                result.warning_count,
                result.info_count,
            );
            if result.has_breaking_changes {
                println!("breaking changes detected");
            }
        }
    }
    Ok(())
}
