//! Path command - plan a learning path from a concept

use anyhow::Result;
use colored::*;

use polymath::{PathType, PolymathEngine};

pub fn execute(
    engine: &PolymathEngine,
    start: &str,
    path_type: PathType,
    goal: Option<&str>,
    steps: Option<usize>,
    json: bool,
) -> Result<()> {
    let path = engine.learning_path(start, path_type, goal, steps)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&path)?);
        return Ok(());
    }

    println!("{}", format!("\n{}", path.title).bright_cyan());
    println!("{}\n", path.description.bright_black());

    for (i, step) in path.steps.iter().enumerate() {
        println!(
            "{}. {} {} {}",
            i + 1,
            step.concept.title.bright_white(),
            format!("[{}]", step.concept.domain.name()).bright_black(),
            format!("{} min", step.estimated_minutes).green()
        );
        println!("   {} {}", "focus:".bright_black(), step.focus);
        for question in &step.questions {
            println!("   - {}", question);
        }
        println!("   {} {}", "check:".bright_black(), step.checkpoint);
    }

    println!("\n{}", "Objectives".bright_cyan());
    for objective in &path.objectives {
        println!("  - {}", objective);
    }
    Ok(())
}
