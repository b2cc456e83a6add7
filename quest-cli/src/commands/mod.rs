pub mod cards;
pub mod whitelist;

use anyhow::{Context, Result};
use colored::Colorize;
use quest_cli::{Summary, VerifyReport};
use quest_merkle::HashValue;

fn parse_root(root: &str) -> Result<HashValue> {
    HashValue::from_hex(root).with_context(|| format!("Invalid root {}", root))
}

fn print_summary(summary: &Summary) {
    println!("{} Proof mapping constructed", "✓".green().bold());
    println!("  Entries:     {}", summary.entries.to_string().cyan());
    println!("  Mapping:     {}", summary.output.display().to_string().cyan());
    if let Some(root_file) = &summary.root_file {
        println!("  Root file:   {}", root_file.display().to_string().cyan());
    }
    println!("  Merkle root: {}", summary.root.green());
}

fn finish_verify(report: VerifyReport) -> Result<()> {
    if report.is_ok() {
        println!(
            "{} All {} proofs verify against the root",
            "✓".green().bold(),
            report.checked
        );
        return Ok(());
    }

    println!(
        "{} {} of {} entries failed verification:",
        "✗".red().bold(),
        report.failed.len(),
        report.checked
    );
    for id in &report.failed {
        println!("  {}", id.red());
    }
    anyhow::bail!("{} proof(s) failed verification", report.failed.len())
}
