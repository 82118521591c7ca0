//! Fuse command - score two concepts against the fusion patterns

use anyhow::Result;
use colored::*;

use polymath::PolymathEngine;

pub fn execute(engine: &PolymathEngine, concept_a: &str, concept_b: &str, json: bool) -> Result<()> {
    let suggestions = engine.suggest_fusion(concept_a, concept_b)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("\nFusing {} x {}\n", concept_a, concept_b).bright_cyan()
    );
    if suggestions.is_empty() {
        println!("{}", "No fusion pattern applies to this pair".bright_yellow());
        return Ok(());
    }

    for (i, s) in suggestions.iter().enumerate() {
        println!(
            "{}. {} {}",
            i + 1,
            s.pattern.name().bright_white(),
            format!("{:.3}", s.score).green()
        );
        println!("├─ {}", s.rationale);
        for evidence in &s.evidence {
            println!("├─ {}", evidence.to_string().bright_black());
        }
        println!("└─ {} {}\n", "Ask:".bright_black(), s.pattern.key_question());
    }
    Ok(())
}
