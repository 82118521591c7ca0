//! Novelty command - how far an idea sits from existing corpus entries

use anyhow::Result;
use colored::*;

use polymath::fusion::NoveltyTier;
use polymath::PolymathEngine;

pub fn execute(engine: &PolymathEngine, proposal: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let limit = limit.unwrap_or(engine.default_limit());
    let evaluation = engine.evaluate_novelty(proposal, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }

    let score = format!("{:.2}", evaluation.score);
    let score = match evaluation.tier {
        NoveltyTier::VeryHigh | NoveltyTier::High => score.green(),
        NoveltyTier::Moderate => score.yellow(),
        NoveltyTier::Low | NoveltyTier::VeryLow => score.red(),
    };

    println!("\n{} {}", "Novelty:".bright_cyan(), score);
    println!("{}", evaluation.assessment);

    if !evaluation.similar_existing.is_empty() {
        println!("\n{}", "Closest existing work:".bright_black());
        for s in &evaluation.similar_existing {
            println!(
                "  - {} [{}] {:.3}",
                s.title.bright_white(),
                s.domain.name(),
                s.similarity
            );
        }
    }
    println!("\n{} {}", "Suggestion:".bright_black(), evaluation.improvement);
    Ok(())
}
