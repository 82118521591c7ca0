use anyhow::Result;
use colored::*;

use polymath::fusion::fusion_patterns;

pub fn execute(json: bool) -> Result<()> {
    let patterns = fusion_patterns();

    if json {
        println!("{}", serde_json::to_string_pretty(patterns)?);
        return Ok(());
    }

    println!("{}", "\nFusion patterns".bright_cyan());
    println!("{}", "━".repeat(60).bright_black());
    for p in patterns {
        println!("\n{} {}", p.name.bright_white(), format!("({})", p.key).bright_black());
        println!("  {}", p.description);
        println!("  {} {}", "Examples:".bright_black(), p.examples.join("; "));
        println!("  {} {}", "Ask:".bright_black(), p.key_question);
    }
    Ok(())
}
