//! quest - build whitelist and card merkle commitments and their proof mappings

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use quest_cli::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quest")]
#[command(about = "Merkle commitments and inclusion proofs for whitelists and game cards", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $QUEST_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    silent: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Address whitelist commitments
    Whitelist {
        #[command(subcommand)]
        action: WhitelistAction,
    },

    /// Game card commitments
    Cards {
        #[command(subcommand)]
        action: CardsAction,
    },
}

#[derive(Subcommand)]
pub enum WhitelistAction {
    /// Generate the merkle tree and the address → proof mapping
    Generate {
        /// JSON file of the form {"addresses": [{address, cap, partner}, ...]}
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the proof mapping
        #[arg(short, long)]
        output: PathBuf,

        /// Chain id bound into every leaf
        #[arg(long)]
        chain_id: Option<u64>,

        /// Also write the root to this file
        #[arg(long)]
        root_file: Option<PathBuf>,
    },

    /// Check a published proof mapping against a root
    Verify {
        /// Proof mapping written by `whitelist generate`
        #[arg(short, long)]
        mapping: PathBuf,

        /// Published root (0x-prefixed hex)
        #[arg(short, long)]
        root: String,

        #[arg(long)]
        chain_id: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum CardsAction {
    /// Generate the merkle tree and the token id → proof mapping
    Generate {
        /// Card info JSON: {"<tokenId>": {hash, ipfsUri, dna}, ...}
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the proof mapping
        #[arg(short, long)]
        output: PathBuf,

        /// Root file (defaults to merkle_root.txt next to the output)
        #[arg(long)]
        root_file: Option<PathBuf>,
    },

    /// Check a published proof mapping against a root
    Verify {
        /// Card info the mapping was generated from
        #[arg(short, long)]
        cards: PathBuf,

        /// Proof mapping written by `cards generate`
        #[arg(short, long)]
        mapping: PathBuf,

        /// Published root (0x-prefixed hex)
        #[arg(short, long)]
        root: String,
    },
}

fn init_tracing(config: &Config, silent: bool) {
    let filter = if silent {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(2);
        }
    };
    init_tracing(&config, cli.silent);

    let result = match cli.command {
        Commands::Whitelist { action } => commands::whitelist::handle(action, &config).await,
        Commands::Cards { action } => commands::cards::handle(action, &config).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
