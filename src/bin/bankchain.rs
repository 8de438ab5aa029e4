#![forbid(unsafe_code)]
//! Interactive session over an in-memory bankchain ledger.

use bankchain::blockchain::Ledger;
use bankchain::cli::{Session, HELP};
use bankchain::config::{load_config, DEFAULT_CONFIG_PATH};
use clap::Parser;
use colored::*;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Mining difficulty (leading zero hex digits); overrides the config file
    #[arg(long)]
    difficulty: Option<u32>,
    /// Creator id stamped on every block added in this session
    #[arg(long)]
    creator_id: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let difficulty = cli.difficulty.unwrap_or(config.ledger.difficulty);
    let creator_id = cli.creator_id.unwrap_or(config.ledger.creator_id);

    let ledger = Ledger::new(difficulty)?;
    info!(difficulty, creator_id, "ledger initialised with genesis block");

    println!("{}", "Bankchain ledger".bright_cyan().bold());
    println!("{}", "----------------".bright_cyan());
    println!("Difficulty {}, creator id {}", difficulty, creator_id);
    println!("{}", HELP.italic());
    println!();

    let mut session = Session::new(ledger, creator_id);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;
    println!();
    Ok(())
}
