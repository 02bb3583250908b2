#![forbid(unsafe_code)]
//! Interactive shell for a single LedgerChain ledger.

use clap::Parser;
use colored::Colorize;
use ledgerchain::blockchain::Blockchain;
use ledgerchain::cli::Shell;
use ledgerchain::config::{load_config, DEFAULT_CONFIG_PATH};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ledger", version, about = "Mine and inspect a two-party proof-of-work ledger")]
struct Cli {
    /// Initial amount held by the paying party
    #[arg(value_parser = clap::value_parser!(i32).range(0..))]
    initial: i32,

    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;

    let start = Instant::now();
    let chain = Blockchain::with_miner(cli.initial, config.miner.miner())?;
    let elapsed = Duration::from_millis(start.elapsed().as_millis() as u64);
    info!("Genesis block mined in {}", humantime::format_duration(elapsed));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(chain, config, stdin.lock(), stdout.lock());
    shell.run()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
