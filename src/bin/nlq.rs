//! NLQ Command Line Interface
//!
//! Parse component-search queries and inspect the lexicon.
//!
//! # Usage
//!
//! ```bash
//! # Parse a query and print the nl_metadata JSON
//! nlq parse "10k SMD resistors with low stock"
//!
//! # Include normalized tokens, raw matches and the score breakdown
//! nlq parse --explain "caps in drawer 3"
//!
//! # Use tables from a config directory (default: $NLQ_CONFIG_DIR, then ./config)
//! nlq --config-dir ./config parse "cheap leds"
//!
//! # Show lexicon hash and table sizes
//! nlq lexicon
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use inventory_nlq::{ConfigLoader, ParseResult, QueryParser};

#[derive(Parser)]
#[command(name = "nlq")]
#[command(version)]
#[command(about = "Natural-language component search query parser")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config directory with parser.yaml and lexicon/*.yaml
    /// (resolved from NLQ_CONFIG_DIR or ./config when omitted)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "json", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query (reads stdin if no query is given)
    Parse {
        query: Option<String>,

        /// Include the parse trace
        #[arg(long)]
        explain: bool,
    },

    /// Show the compiled lexicon hash and table sizes
    Lexicon,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = build_parser(cli.config_dir.as_ref()).and_then(|parser| match cli.command {
        Commands::Parse { query, explain } => cmd_parse(&parser, query, explain, cli.format),
        Commands::Lexicon => cmd_lexicon(&parser, cli.format),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn build_parser(config_dir: Option<&PathBuf>) -> Result<QueryParser> {
    match config_dir {
        Some(dir) => ConfigLoader::new(dir).build_parser(),
        None => ConfigLoader::from_env().build_parser(),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_parse(
    parser: &QueryParser,
    query: Option<String>,
    explain: bool,
    format: OutputFormat,
) -> Result<()> {
    let query = match query {
        Some(q) => q,
        None => read_stdin()?,
    };

    let (result, trace) = parser.parse_with_trace(&query);

    match format {
        OutputFormat::Json => {
            let output = if explain {
                serde_json::json!({ "nl_metadata": result, "trace": trace })
            } else {
                serde_json::to_value(&result).context("Failed to serialize result")?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            print_pretty(&result);
            if explain {
                println!();
                println!("{} {}", "normalized:".dimmed(), trace.normalized);
                for m in &trace.matches {
                    let kept = trace.accepted.contains(m);
                    let marker = if kept { "+".green() } else { "-".dimmed() };
                    println!(
                        "  {} {:<14} {:<20} [{}..{}] {:.2}",
                        marker, m.entity_type, m.value, m.span.start, m.span.end, m.confidence
                    );
                }
                println!(
                    "{} entity={:.3} coverage={:.3}",
                    "score:".dimmed(),
                    trace.breakdown.entity_score,
                    trace.breakdown.coverage
                );
            }
        }
    }

    Ok(())
}

fn print_pretty(result: &ParseResult) {
    let confidence = format!("{:.2}", result.confidence);
    let confidence = if result.fallback_to_fts5 {
        confidence.yellow()
    } else {
        confidence.green()
    };
    println!("{} {}", "query:".dimmed(), result.query);
    println!("{} {}", "confidence:".dimmed(), confidence);
    println!(
        "{} {}",
        "intent:".dimmed(),
        result
            .intent
            .map_or_else(|| "none".to_string(), |i| i.to_string())
    );
    println!(
        "{} {}",
        "search:".dimmed(),
        if result.fallback_to_fts5 {
            "full-text"
        } else {
            "structured"
        }
    );
    for (entity_type, value) in result.parsed_entities.iter() {
        println!("  {:<14} {}", entity_type.to_string().cyan(), value);
    }
    if let Some(error) = &result.error {
        println!("{} {}", "error:".red(), error);
    }
}

fn cmd_lexicon(parser: &QueryParser, format: OutputFormat) -> Result<()> {
    let lexicon = parser.lexicon();
    match format {
        OutputFormat::Json => {
            let tables: serde_json::Map<String, serde_json::Value> = lexicon
                .table_sizes()
                .into_iter()
                .map(|(name, size)| (name.to_string(), size.into()))
                .collect();
            let output = serde_json::json!({
                "hash": lexicon.hash,
                "tables": tables,
                "config": parser.config(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            println!("{} {}", "hash:".dimmed(), lexicon.hash);
            for (name, size) in lexicon.table_sizes() {
                println!("  {:<22} {}", name, size);
            }
        }
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read query from stdin")?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}
