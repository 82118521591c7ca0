//! Challenge command - surface the premises of a statement

use anyhow::Result;
use colored::*;

use polymath::corpus::Domain;
use polymath::PolymathEngine;

pub fn execute(engine: &PolymathEngine, statement: &str, exclude: Option<&str>) -> Result<()> {
    let exclude = exclude.map(|d| d.parse::<Domain>()).transpose()?;
    let challenge = engine.challenge_statement(statement, exclude)?;

    println!("{}", "\nPremises".bright_cyan());
    for (i, p) in challenge.premises.iter().enumerate() {
        let marker = p
            .marker
            .as_deref()
            .map(|m| format!(" (\"{}\")", m))
            .unwrap_or_default();
        println!("\n{}. {}{}", i + 1, p.premise.bright_white(), marker.bright_black());
        println!("   {}", p.question.text);
        for g in &p.question.grounding {
            println!(
                "   {} {} [{}]",
                "grounded on".bright_black(),
                g.title,
                g.domain.name()
            );
        }
    }
    Ok(())
}
