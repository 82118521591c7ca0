//! Session summary and markdown transcript export

use std::collections::BTreeSet;
use std::fmt::Write;

use serde::Serialize;
use uuid::Uuid;

use super::questions::deeper_questions;
use super::state::{ConclusionReason, DialogueState, SessionStatus};
use crate::corpus::text::{contains_phrase, words};
use crate::corpus::Domain;

#[derive(Debug, Clone, Serialize)]
pub struct DialogueSummary {
    pub session_id: Uuid,
    pub focus: String,
    pub depth: u32,
    pub explored_facets: Vec<String>,
    pub unexplored_facets: Vec<String>,
    pub challenged_premises: Vec<String>,
    pub insights: Vec<String>,
    pub domains_visited: Vec<Domain>,
    pub deeper_questions: Vec<String>,
}

impl DialogueSummary {
    pub fn from_state(state: &DialogueState) -> Self {
        let mentioned = words(&state.transcript_text());
        let (explored_facets, unexplored_facets): (Vec<String>, Vec<String>) = state
            .focus
            .facets
            .iter()
            .cloned()
            .partition(|f| contains_phrase(&mentioned, f));

        let domains_visited: BTreeSet<Domain> = state
            .history
            .iter()
            .flat_map(|e| e.question.grounding.iter().map(|g| g.domain))
            .collect();

        Self {
            session_id: state.session_id,
            focus: state.focus.title.clone(),
            depth: state.depth,
            explored_facets,
            unexplored_facets,
            challenged_premises: state.surfaced_premises.iter().cloned().collect(),
            insights: state.insights.clone(),
            domains_visited: domains_visited.into_iter().collect(),
            deeper_questions: deeper_questions(&state.focus.title),
        }
    }
}

/// Render a session as a markdown transcript
pub fn export_markdown(state: &DialogueState) -> String {
    let summary = DialogueSummary::from_state(state);
    let status = match state.status {
        SessionStatus::Active => "active".to_string(),
        SessionStatus::Concluded(ConclusionReason::Ended) => "ended".to_string(),
        SessionStatus::Concluded(ConclusionReason::MaxDepth) => "concluded at max depth".to_string(),
    };

    let mut md = String::new();
    let _ = writeln!(md, "# Socratic inquiry: {}\n", state.focus.title);
    let _ = writeln!(md, "## Session");
    let _ = writeln!(md, "- **Session ID**: {}", state.session_id);
    let _ = writeln!(md, "- **Started**: {}", state.started_at.to_rfc3339());
    let _ = writeln!(md, "- **Questions asked**: {}", state.depth);
    let _ = writeln!(md, "- **Mode**: {}", state.mode);
    let _ = writeln!(md, "- **Status**: {}\n", status);

    let _ = writeln!(md, "## Progress\n");
    write_list(&mut md, "Facets explored", &summary.explored_facets);
    write_list(&mut md, "Premises challenged", &summary.challenged_premises);
    write_list(&mut md, "Insights", &summary.insights);
    let domains: Vec<String> = summary
        .domains_visited
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    write_list(&mut md, "Domains visited", &domains);

    let _ = writeln!(md, "## Transcript\n");
    for (i, exchange) in state.history.iter().enumerate() {
        let _ = writeln!(
            md,
            "### Turn {} ({})\n",
            i + 1,
            exchange.question.mode
        );
        let _ = writeln!(md, "**Q:** {}\n", exchange.question.text);
        for g in &exchange.question.grounding {
            let _ = writeln!(md, "> grounded on '{}' ({})", g.title, g.domain.name());
        }
        if !exchange.question.grounding.is_empty() {
            md.push('\n');
        }
        match &exchange.answer {
            Some(answer) => {
                let _ = writeln!(md, "**A:** {}\n", answer);
            }
            None => {
                let _ = writeln!(md, "**A:** _(awaiting answer)_\n");
            }
        }
    }
    md
}

fn write_list(md: &mut String, heading: &str, items: &[String]) {
    let _ = writeln!(md, "### {}", heading);
    if items.is_empty() {
        let _ = writeln!(md, "- (none)");
    }
    for item in items {
        let _ = writeln!(md, "- {}", item);
    }
    md.push('\n');
}
