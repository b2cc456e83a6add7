//! Whitelist command handlers

use anyhow::{Context, Result};
use colored::Colorize;
use quest_cli::{tasks, Config};
use quest_proofgen::ProofGenerator;
use quest_types::ChainId;

use super::{finish_verify, parse_root, print_summary};

fn resolve_chain_id(flag: Option<u64>, config: &Config) -> Result<ChainId> {
    flag.or(config.chain_id)
        .map(ChainId)
        .context("A chain id is required: pass --chain-id, set QUEST_CHAIN_ID or chain_id in the config file")
}

pub async fn handle(action: crate::WhitelistAction, config: &Config) -> Result<()> {
    match action {
        crate::WhitelistAction::Generate {
            input,
            output,
            chain_id,
            root_file,
        } => {
            let chain_id = resolve_chain_id(chain_id, config)?;
            println!("{} Generating whitelist proofs...", "→".cyan().bold());
            println!("  Input:    {}", input.display().to_string().cyan());
            println!("  Chain ID: {}", chain_id.to_string().cyan());

            let generator = ProofGenerator::with_concurrency(config.concurrency);
            let summary =
                tasks::generate_whitelist(&input, &output, root_file.as_deref(), chain_id, generator).await?;
            print_summary(&summary);
            Ok(())
        }

        crate::WhitelistAction::Verify {
            mapping,
            root,
            chain_id,
        } => {
            let chain_id = resolve_chain_id(chain_id, config)?;
            let root = parse_root(&root)?;
            println!("{} Verifying whitelist mapping...", "→".cyan().bold());
            println!("  Mapping: {}", mapping.display().to_string().cyan());
            println!("  Root:    {}", root.to_string().cyan());

            let report = tasks::verify_whitelist(&mapping, root, chain_id).await?;
            finish_verify(report)
        }
    }
}
