//! Bridges command - partner concepts from other domains

use anyhow::Result;
use colored::*;

use polymath::PolymathEngine;

pub fn execute(engine: &PolymathEngine, concept: &str, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(engine.default_limit());
    let (source, bridges) = engine.find_bridges(concept, limit)?;

    println!(
        "{}",
        format!("\nBridges from {} ({})\n", source.title, source.domain.name()).bright_cyan()
    );
    if bridges.is_empty() {
        println!("{}", "No cross-domain partners found".bright_yellow());
        return Ok(());
    }

    for (i, bridge) in bridges.iter().enumerate() {
        println!(
            "{}. {} {} {}",
            i + 1,
            bridge.document.title.bright_white(),
            format!("[{}]", bridge.document.domain.name()).bright_black(),
            format!("{:.3}", bridge.hybrid_score).green()
        );
        println!(
            "   {} {:.3}  {} {:.3}",
            "semantic".bright_black(),
            bridge.semantic,
            "structural".bright_black(),
            bridge.structural
        );
        if !bridge.shared_dynamics.is_empty() {
            println!(
                "   {} {}",
                "shared:".bright_black(),
                bridge.shared_dynamics.join(", ")
            );
        }
    }
    Ok(())
}
