//! Retention CLI
//!
//! Simulates a retention policy against customer data and reports the
//! resulting offers and KPIs.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};

use crate::commands::Context;

/// Retention CLI — design and simulate customer retention policies.
#[derive(Parser, Debug)]
#[command(name = "retention", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        long,
        short,
        env = "RETENTION_CONFIG",
        default_value = "retention.toml",
        global = true
    )]
    config: PathBuf,

    /// Policy document. Defaults to the built-in policy.
    #[arg(long, env = "RETENTION_POLICY", global = true)]
    policy: Option<PathBuf>,

    /// Output format. Overrides `[output] format`.
    #[arg(long, env = "RETENTION_FORMAT", global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the policy over customer data and print offers and KPIs.
    Simulate(commands::simulate::SimulateArgs),
    /// List the parsed policy rules.
    Rules,
    /// Show how the policy decides a single customer.
    Explain(commands::explain::ExplainArgs),
    /// Run YAML test fixtures against the policy.
    Test(commands::test::TestArgs),
    /// Print the policy's flowchart source.
    Diagram,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;
    let ctx = Context::new(config, cli.policy, cli.format)?;

    match cli.command {
        Command::Simulate(args) => commands::simulate::run(&ctx, &args),
        Command::Rules => commands::rules::run(&ctx),
        Command::Explain(args) => commands::explain::run(&ctx, &args),
        Command::Test(args) => commands::test::run(&ctx, &args),
        Command::Diagram => commands::diagram::run(&ctx),
    }
}
