use anyhow::Result;
use colored::*;

use polymath::corpus::{Domain, DomainCategory};

pub fn execute(json: bool) -> Result<()> {
    let domains = &Domain::ALL;

    if json {
        let rows: Vec<_> = domains
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id(),
                    "name": d.name(),
                    "category": d.category(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut current: Option<DomainCategory> = None;
    for domain in domains {
        if current != Some(domain.category()) {
            println!("\n{}", domain.category().label().bright_cyan());
            current = Some(domain.category());
        }
        println!("  {} {}", domain.name(), format!("({})", domain.id()).bright_black());
    }
    Ok(())
}
