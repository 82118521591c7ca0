//! Dialogue command - interactive Socratic session in the terminal
//!
//! Lines starting with `/` are commands: `/mode <explore|challenge|viewpoints>`
//! switches mode with the next answer, `/end` finishes. EOF also finishes.

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use polymath::dialogue::{export_markdown, DialogueSummary, Question};
use polymath::{DialogueMode, PolymathEngine};

pub fn execute(
    engine: &PolymathEngine,
    focus: &str,
    mode: DialogueMode,
    export: Option<&Path>,
) -> Result<()> {
    let mut state = engine.start_dialogue(focus, mode)?;

    println!(
        "{}",
        format!("\nSocratic inquiry: {}", state.focus.title).bright_cyan()
    );
    println!(
        "{}",
        "Answer each question. /mode <mode> switches, /end finishes.".bright_black()
    );
    if let Some(question) = state.pending_question() {
        print_question(question);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut requested_mode: Option<DialogueMode> = None;

    loop {
        print!("{} ", ">".bright_green());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            let mut parts = command.splitn(2, ' ');
            match (parts.next(), parts.next()) {
                (Some("end"), _) => break,
                (Some("mode"), Some(m)) => match m.parse::<DialogueMode>() {
                    Ok(m) => {
                        println!("{}", format!("(next turn in {} mode)", m).bright_black());
                        requested_mode = Some(m);
                    }
                    Err(e) => println!("{}", e.to_string().bright_red()),
                },
                _ => println!("{}", "Unknown command".bright_red()),
            }
            continue;
        }

        let (question, next) = engine.advance_dialogue_with(&state, input, requested_mode.take())?;
        state = next;
        match question {
            Some(q) => print_question(&q),
            None => {
                println!("{}", "\nMaximum depth reached.".bright_yellow());
                break;
            }
        }
    }

    let summary = if state.is_concluded() {
        DialogueSummary::from_state(&state)
    } else {
        let (summary, ended) = engine.end_dialogue(&state)?;
        state = ended;
        summary
    };
    print_summary(&summary);

    if let Some(path) = export {
        fs::write(path, export_markdown(&state))
            .with_context(|| format!("Failed to write transcript: {}", path.display()))?;
        println!("\n{} {}", "✓ Transcript written to".green(), path.display());
    }
    Ok(())
}

fn print_question(question: &Question) {
    println!(
        "\n{} {}",
        format!("[{}]", question.mode).bright_black(),
        question.text.bright_white()
    );
    for g in &question.grounding {
        println!(
            "  {} {} [{}]",
            "grounded on".bright_black(),
            g.title,
            g.domain.name()
        );
    }
}

fn print_summary(summary: &DialogueSummary) {
    println!("\n{}", "Session summary".bright_cyan());
    println!("{}", "━".repeat(60).bright_black());
    println!("├─ {}: {}", "Questions".bright_black(), summary.depth);
    print_list("Facets explored", &summary.explored_facets);
    print_list("Facets left", &summary.unexplored_facets);
    print_list("Premises challenged", &summary.challenged_premises);
    print_list("Insights", &summary.insights);
    let domains: Vec<String> = summary
        .domains_visited
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    print_list("Domains visited", &domains);
    println!("└─ {}:", "To go deeper".bright_black());
    for q in &summary.deeper_questions {
        println!("   - {}", q);
    }
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("├─ {}: (none)", label.bright_black());
    } else {
        println!("├─ {}: {}", label.bright_black(), items.join("; "));
    }
}
