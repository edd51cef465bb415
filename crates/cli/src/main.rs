//! Strata CLI
//!
//! Resolve RDS orderable DB instance options and probe Lex slot types from
//! the command line.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::StrataConfig;

/// Strata CLI: AWS lookups from the command line.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, env = "STRATA_CONFIG", default_value = "strata.toml", global = true)]
    config: PathBuf,

    /// AWS region (overrides the configuration file).
    #[arg(long, env = "AWS_REGION", global = true)]
    region: Option<String>,

    /// AWS endpoint URL override, e.g. for `LocalStack`.
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// RDS lookups.
    Rds(commands::rds::RdsArgs),
    /// Lex Model Building status probes.
    Lex(commands::lex::LexArgs),
    /// Print the attribute schema of a resource type.
    Schema(commands::schema::SchemaArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = StrataConfig::load(&cli.config)?
        .with_overrides(cli.region.as_deref(), cli.endpoint_url.as_deref());

    match cli.command {
        Command::Rds(args) => commands::rds::run(&config, &args, &cli.format).await,
        Command::Lex(args) => commands::lex::run(&config, &args, &cli.format).await,
        Command::Schema(args) => commands::schema::run(&args, &cli.format),
    }
}
