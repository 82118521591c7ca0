//! Search command - semantic search over the corpus

use anyhow::Result;
use colored::*;

use polymath::corpus::{Domain, DomainFilter};
use polymath::PolymathEngine;

use super::preview;

pub fn execute(
    engine: &PolymathEngine,
    query: &str,
    domains: &[String],
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let domains = domains
        .iter()
        .map(|d| d.parse::<Domain>())
        .collect::<Result<Vec<_>>>()?;
    let filter = (!domains.is_empty()).then(|| DomainFilter::only(domains));
    let limit = limit.unwrap_or(engine.default_limit());

    let hits = engine.search_concepts(query, filter.as_ref(), limit)?;

    if json {
        let rows: Vec<_> = hits
            .iter()
            .map(|h| {
                serde_json::json!({
                    "id": h.document.id,
                    "title": h.document.title,
                    "domain": h.document.domain,
                    "kind": h.document.kind,
                    "similarity": h.similarity,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", format!("\nSearching: {}\n", query).bright_cyan());
    if hits.is_empty() {
        println!("{}", "No results found".bright_yellow());
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        let doc = &hit.document;
        println!(
            "{}. {} {} {}",
            i + 1,
            doc.title.bright_white(),
            format!("[{}]", doc.domain.name()).bright_black(),
            format!("{:.3}", hit.similarity).green()
        );
        if !doc.body.is_empty() {
            println!("   {}", preview(&doc.body, 160));
        }
    }
    Ok(())
}
