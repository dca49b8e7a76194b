//! walletsim CLI
//!
//! Drives a simulated wallet session from the terminal: a one-shot demo or an
//! interactive shell.

mod commands;
mod config;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{WalletsimConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use walletsim::mock::MockLedger;
use walletsim::session::SessionStore;

#[derive(Parser)]
#[command(name = "walletsim")]
#[command(about = "Simulated wallet session")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "WALLETSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Zero simulated latency and resolution delay
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, split a transfer across recipients and print the session
    Demo {
        /// Comma-separated recipient addresses
        #[arg(long)]
        to: String,
        /// Total amount in ETH, split evenly
        #[arg(long)]
        amount: String,
        /// Wait until every transaction has resolved
        #[arg(long)]
        wait: bool,
    },
    /// Interactive session shell
    Shell,
    /// Write the default configuration to a file
    InitConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging()?;
    info!("Starting walletsim v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::InitConfig { output } = &cli.command {
        WalletsimConfig::default().save(output)?;
        println!("✅ Wrote {}", output.display());
        return Ok(());
    }

    let mut config = WalletsimConfig::load(cli.config.as_deref())?;
    if cli.instant {
        config = config.instant();
    }
    let store = SessionStore::builder(MockLedger::new(config.ledger)?)
        .config(config.session)
        .build()?;

    match cli.command {
        Commands::Demo { to, amount, wait } => commands::run_demo(&store, &to, &amount, wait).await,
        Commands::Shell => commands::run_shell(&store).await,
        Commands::InitConfig { .. } => Ok(()),
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_demo_arguments() {
        let cli = Cli::try_parse_from([
            "walletsim", "--instant", "demo", "--to", "0xa,0xb", "--amount", "0.3", "--wait",
        ])
        .unwrap();
        assert!(cli.instant);
        match cli.command {
            Commands::Demo { to, amount, wait } => {
                assert_eq!(to, "0xa,0xb");
                assert_eq!(amount, "0.3");
                assert!(wait);
            }
            _ => panic!("expected demo"),
        }
    }

    #[test]
    fn test_demo_requires_recipients() {
        assert!(Cli::try_parse_from(["walletsim", "demo", "--amount", "1"]).is_err());
    }
}
