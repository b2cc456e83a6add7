//! Card command handlers

use anyhow::Result;
use colored::Colorize;
use quest_cli::{tasks, Config};
use quest_proofgen::ProofGenerator;

use super::{finish_verify, parse_root, print_summary};

pub async fn handle(action: crate::CardsAction, config: &Config) -> Result<()> {
    match action {
        crate::CardsAction::Generate {
            input,
            output,
            root_file,
        } => {
            println!("{} Generating card proofs...", "→".cyan().bold());
            println!("  Input: {}", input.display().to_string().cyan());

            let generator = ProofGenerator::with_concurrency(config.concurrency);
            let summary = tasks::generate_cards(&input, &output, root_file.as_deref(), generator).await?;
            print_summary(&summary);
            Ok(())
        }

        crate::CardsAction::Verify { cards, mapping, root } => {
            let root = parse_root(&root)?;
            println!("{} Verifying card mapping...", "→".cyan().bold());
            println!("  Cards:   {}", cards.display().to_string().cyan());
            println!("  Mapping: {}", mapping.display().to_string().cyan());
            println!("  Root:    {}", root.to_string().cyan());

            let report = tasks::verify_cards(&cards, &mapping, root).await?;
            finish_verify(report)
        }
    }
}
