//! MCP server - stdio transport and tool dispatch

use std::io::{BufRead, BufReader, Write};
use std::str::FromStr;

use anyhow::Result;
use serde_json::{json, Value};
use uuid::Uuid;

use super::protocol::{
    Request, Response, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, SESSION_BUSY,
};
use super::session::{SessionFilter, SessionRegistry};
use crate::corpus::{Document, Domain, DomainFilter, ScoredDocument};
use crate::dialogue::{
    export_markdown, DialogueMode, DialogueState, DialogueSummary, PremiseChallenge, Question,
    QuestionKind, QuestionTypeDescriptor,
};
use crate::engine::PolymathEngine;
use crate::error::FusionError;
use crate::fusion::{FusionSuggestion, NoveltyEvaluation, PatternDescriptor};
use crate::learning::{LearningPath, PathType};
use crate::retrieval::Bridge;

/// Run MCP server over stdio
pub fn run_mcp_server(engine: PolymathEngine, idle_timeout_secs: u64) -> Result<()> {
    let server = McpServer::new(engine, idle_timeout_secs);
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());

    tracing::info!("polymath: MCP server ready");
    server.serve(reader, std::io::stdout())
}

enum ToolError {
    Params(String),
    Core(FusionError),
}

impl From<FusionError> for ToolError {
    fn from(err: FusionError) -> Self {
        ToolError::Core(err)
    }
}

type ToolResult = std::result::Result<String, ToolError>;

pub struct McpServer {
    engine: PolymathEngine,
    sessions: SessionRegistry,
}

impl McpServer {
    pub fn new(engine: PolymathEngine, idle_timeout_secs: u64) -> Self {
        Self {
            engine,
            sessions: SessionRegistry::new(idle_timeout_secs),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Read one JSON-RPC message per line until EOF
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<()> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line) {
                writeln!(writer, "{}", serde_json::to_string(&response)?)?;
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Handle one raw message. Notifications get no response.
    pub fn handle_line(&self, line: &str) -> Option<Response> {
        let request: Request = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                return Some(Response::error(
                    None,
                    PARSE_ERROR,
                    &format!("Parse error: {}", e),
                ))
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(Response::error(
                request.id.clone(),
                INVALID_REQUEST,
                &format!(
                    "Invalid JSON-RPC version: expected 2.0, got {}",
                    request.jsonrpc
                ),
            ));
        }

        if request.id.is_none() && request.method.starts_with("notifications/") {
            return None;
        }

        Some(self.dispatch(&request))
    }

    fn dispatch(&self, req: &Request) -> Response {
        match req.method.as_str() {
            "initialize" => handle_initialize(req),
            "initialized" | "ping" => Response::success(req.id.clone(), json!({})),
            "tools/list" => handle_list_tools(req),
            "tools/call" => self.handle_tool_call(req),
            _ => Response::error(req.id.clone(), METHOD_NOT_FOUND, "Method not found"),
        }
    }

    fn handle_tool_call(&self, req: &Request) -> Response {
        let name = req
            .params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        let args = req.params.get("arguments").cloned().unwrap_or_default();

        tracing::debug!(tool = name, "tools/call");

        match self.call_tool(name, &args) {
            Ok(text) => Response::text(req.id.clone(), text),
            Err(ToolError::Params(message)) => {
                Response::error(req.id.clone(), INVALID_PARAMS, &message)
            }
            Err(ToolError::Core(FusionError::NotFound(concept))) => Response::text(
                req.id.clone(),
                format!("No concept found matching '{}'.", concept),
            ),
            Err(ToolError::Core(err @ FusionError::IndexUnavailable { .. })) => {
                Response::error(req.id.clone(), INTERNAL_ERROR, &err.to_string())
            }
            Err(ToolError::Core(err @ FusionError::InvalidState(_))) => {
                Response::error(req.id.clone(), INVALID_PARAMS, &err.to_string())
            }
            Err(ToolError::Core(err @ FusionError::SessionBusy(_))) => {
                Response::error(req.id.clone(), SESSION_BUSY, &err.to_string())
            }
        }
    }

    fn call_tool(&self, name: &str, args: &Value) -> ToolResult {
        let engine = &self.engine;
        match name {
            "search_concepts" => {
                let query = required_str(args, "query")?;
                let filter = domain_filter(args)?;
                let limit = limit(args, engine.default_limit());
                let hits = engine.search_concepts(query, filter.as_ref(), limit)?;
                Ok(format_search(&hits))
            }
            "find_bridges" => {
                let concept = required_str(args, "concept")?;
                let limit = limit(args, engine.default_limit());
                let (source, bridges) = engine.find_bridges(concept, limit)?;
                Ok(format_bridges(&source, &bridges))
            }
            "suggest_fusion" => {
                let a = required_str(args, "concept_a")?;
                let b = required_str(args, "concept_b")?;
                let suggestions = engine.suggest_fusion(a, b)?;
                Ok(format_suggestions(a, b, &suggestions))
            }
            "get_fusion_patterns" => Ok(format_patterns(engine.fusion_patterns())),
            "evaluate_novelty" => {
                let proposal = required_str(args, "proposal")?;
                let limit = limit(args, engine.default_limit());
                let evaluation = engine.evaluate_novelty(proposal, limit)?;
                Ok(format_novelty(&evaluation))
            }
            "challenge_premise" => {
                let statement = required_str(args, "statement")?;
                let exclude = optional_str(args, "exclude_domain")
                    .map(parse_domain)
                    .transpose()?;
                let challenge = engine.challenge_statement(statement, exclude)?;
                Ok(format_challenge(&challenge))
            }
            "list_domains" => Ok(format_domains(engine.domains())),
            "start_dialogue" => {
                let focus = required_str(args, "focus")?;
                let mode = optional_mode(args)?.unwrap_or_default();
                let state = engine.start_dialogue(focus, mode)?;
                let reply = turn_json(&state, state.pending_question());
                self.sessions.insert(state);
                to_text(&reply)
            }
            "advance_dialogue" => {
                let id = session_id(args)?;
                let answer = required_str(args, "answer")?;
                let mode = optional_mode(args)?;

                let turn = self.sessions.begin_turn(&id)?;
                let (question, state) = engine.advance_dialogue_with(turn.state(), answer, mode)?;
                let reply = turn_json(&state, question.as_ref());
                turn.finish(state);
                to_text(&reply)
            }
            "end_dialogue" => {
                let id = session_id(args)?;
                let turn = self.sessions.begin_turn(&id)?;
                let (summary, state) = engine.end_dialogue(turn.state())?;
                turn.finish(state);
                to_text(&json!({ "session_id": id, "summary": summary }))
            }
            "export_dialogue" => {
                let id = session_id(args)?;
                let state = self.sessions.snapshot(&id)?;
                Ok(export_markdown(&state))
            }
            "get_session_summary" => {
                let id = session_id(args)?;
                let state = self.sessions.snapshot(&id)?;
                to_text(&json!({
                    "session_id": id,
                    "status": state.status.key(),
                    "summary": DialogueSummary::from_state(&state),
                }))
            }
            "list_sessions" => {
                let filter = optional_str(args, "status")
                    .map(|s| SessionFilter::from_str(s).map_err(|e| ToolError::Params(e.to_string())))
                    .transpose()?
                    .unwrap_or_default();
                to_text(&json!({ "sessions": self.sessions.list(filter) }))
            }
            "get_question_types" => match optional_str(args, "type_name") {
                Some(name) => {
                    let kind = QuestionKind::from_str(name)
                        .map_err(|e| ToolError::Params(e.to_string()))?;
                    Ok(format_question_types(std::slice::from_ref(kind.descriptor())))
                }
                None => Ok(format_question_types(engine.question_types())),
            },
            "get_learning_path" => {
                let start = required_str(args, "start_concept")?;
                let path_type = optional_str(args, "path_type")
                    .map(|t| PathType::from_str(t).map_err(|e| ToolError::Params(e.to_string())))
                    .transpose()?
                    .unwrap_or_default();
                let goal = optional_str(args, "goal");
                let max_steps = args
                    .get("max_steps")
                    .and_then(|v| v.as_u64())
                    .map(|n| n as usize);
                let path = engine.learning_path(start, path_type, goal, max_steps)?;
                Ok(format_learning_path(&path))
            }
            _ => Err(ToolError::Params(format!("Unknown tool: {}", name))),
        }
    }
}

// =============================================================================
// Argument helpers
// =============================================================================

fn required_str<'a>(args: &'a Value, key: &str) -> std::result::Result<&'a str, ToolError> {
    optional_str(args, key)
        .ok_or_else(|| ToolError::Params(format!("Missing required parameter: {}", key)))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn limit(args: &Value, default: usize) -> usize {
    args.get("limit")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .unwrap_or(default)
}

fn parse_domain(input: &str) -> std::result::Result<Domain, ToolError> {
    Domain::parse(input).ok_or_else(|| ToolError::Params(format!("Unknown domain: {}", input)))
}

fn domain_filter(args: &Value) -> std::result::Result<Option<DomainFilter>, ToolError> {
    let Some(list) = args.get("domains").and_then(|v| v.as_array()) else {
        return Ok(None);
    };
    let domains = list
        .iter()
        .filter_map(|v| v.as_str())
        .map(parse_domain)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if domains.is_empty() {
        Ok(None)
    } else {
        Ok(Some(DomainFilter::only(domains)))
    }
}

fn optional_mode(args: &Value) -> std::result::Result<Option<DialogueMode>, ToolError> {
    optional_str(args, "mode")
        .map(|m| DialogueMode::from_str(m).map_err(|e| ToolError::Params(e.to_string())))
        .transpose()
}

fn session_id(args: &Value) -> std::result::Result<Uuid, ToolError> {
    let raw = required_str(args, "session_id")?;
    Uuid::parse_str(raw).map_err(|_| ToolError::Params(format!("Invalid session_id: {}", raw)))
}

fn to_text(value: &Value) -> ToolResult {
    serde_json::to_string_pretty(value)
        .map_err(|e| ToolError::Params(format!("Failed to encode result: {}", e)))
}

fn turn_json(state: &DialogueState, question: Option<&Question>) -> Value {
    json!({
        "session_id": state.session_id,
        "mode": state.mode,
        "depth": state.depth,
        "status": state.status,
        "question": question,
    })
}

// =============================================================================
// Protocol handlers
// =============================================================================

fn handle_initialize(req: &Request) -> Response {
    Response::success(
        req.id.clone(),
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "polymath",
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

fn tool(name: &str, description: &str, properties: Value, required: &[&str]) -> Value {
    json!({
        "name": name,
        "description": description,
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required
        }
    })
}

fn handle_list_tools(req: &Request) -> Response {
    let limit = json!({
        "type": "integer",
        "description": "Maximum results to return (default: 10)",
        "default": 10
    });
    let mode = json!({
        "type": "string",
        "enum": ["explore", "challenge_premise", "explore_viewpoints"],
        "description": "Questioning mode"
    });
    let session = json!({ "type": "string", "description": "Session id from start_dialogue" });

    let tools = vec![
        tool(
            "search_concepts",
            "Semantic search over concepts, polymaths, fusion cases and big questions, optionally restricted to some domains.",
            json!({
                "query": { "type": "string", "description": "Natural language query" },
                "domains": { "type": "array", "items": { "type": "string" }, "description": "Domain ids to search within" },
                "limit": limit
            }),
            &["query"],
        ),
        tool(
            "find_bridges",
            "Find concepts from other domains that share structure with the given concept.",
            json!({
                "concept": { "type": "string", "description": "Concept id or name" },
                "limit": limit
            }),
            &["concept"],
        ),
        tool(
            "suggest_fusion",
            "Score two concepts against the seven fusion patterns and explain each match.",
            json!({
                "concept_a": { "type": "string", "description": "Source concept" },
                "concept_b": { "type": "string", "description": "Target concept" }
            }),
            &["concept_a", "concept_b"],
        ),
        tool(
            "get_fusion_patterns",
            "List the seven fusion patterns with descriptions and key questions.",
            json!({}),
            &[],
        ),
        tool(
            "evaluate_novelty",
            "Estimate how novel an idea is relative to the corpus.",
            json!({
                "proposal": { "type": "string", "description": "Idea to evaluate" },
                "limit": limit
            }),
            &["proposal"],
        ),
        tool(
            "challenge_premise",
            "Find the premises in a statement and challenge each with a perspective from another domain.",
            json!({
                "statement": { "type": "string", "description": "Claim to examine" },
                "exclude_domain": { "type": "string", "description": "Domain to draw no counter-perspective from" }
            }),
            &["statement"],
        ),
        tool("list_domains", "List the domain catalogue by category.", json!({}), &[]),
        tool(
            "start_dialogue",
            "Start a Socratic dialogue on a concept or free-text topic. Returns the session id and the first question.",
            json!({
                "focus": { "type": "string", "description": "Concept or topic" },
                "mode": mode
            }),
            &["focus"],
        ),
        tool(
            "advance_dialogue",
            "Answer the pending question and receive the next one.",
            json!({
                "session_id": session,
                "answer": { "type": "string", "description": "Answer to the pending question" },
                "mode": mode
            }),
            &["session_id", "answer"],
        ),
        tool(
            "end_dialogue",
            "End a dialogue and summarise explored facets, challenged premises and insights.",
            json!({ "session_id": session }),
            &["session_id"],
        ),
        tool(
            "export_dialogue",
            "Export a dialogue transcript as markdown.",
            json!({ "session_id": session }),
            &["session_id"],
        ),
        tool(
            "get_session_summary",
            "Summarise a dialogue so far without ending it.",
            json!({ "session_id": session }),
            &["session_id"],
        ),
        tool(
            "list_sessions",
            "List dialogue sessions held by this server.",
            json!({
                "status": {
                    "type": "string",
                    "enum": ["active", "concluded", "all"],
                    "description": "Which sessions to list (default: active)"
                }
            }),
            &[],
        ),
        tool(
            "get_question_types",
            "Describe the seven Socratic question types with purpose and examples.",
            json!({
                "type_name": { "type": "string", "description": "Single question type to describe" }
            }),
            &[],
        ),
        tool(
            "get_learning_path",
            "Plan a learning path from a concept, optionally towards a goal concept.",
            json!({
                "start_concept": { "type": "string", "description": "Concept to start from" },
                "path_type": {
                    "type": "string",
                    "enum": ["depth_first", "breadth_first", "spiral", "bridge", "challenge"],
                    "description": "Walk strategy (default: spiral)"
                },
                "goal": { "type": "string", "description": "Target concept for bridge paths" },
                "max_steps": { "type": "integer", "description": "Step budget (default: 7)" }
            }),
            &["start_concept"],
        ),
    ];

    Response::success(req.id.clone(), json!({ "tools": tools }))
}

// =============================================================================
// Result formatting
// =============================================================================

fn format_search(hits: &[ScoredDocument]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }

    let mut output = String::new();
    for (i, hit) in hits.iter().enumerate() {
        let doc = &hit.document;
        output.push_str(&format!(
            "{}. {} [{}] (similarity: {:.3}) {}\n",
            i + 1,
            doc.title,
            doc.domain.name(),
            hit.similarity,
            doc.id
        ));
        if !doc.body.is_empty() {
            output.push_str(&doc.body);
            output.push('\n');
        }
        output.push('\n');
    }
    output
}

fn format_bridges(source: &Document, bridges: &[Bridge]) -> String {
    if bridges.is_empty() {
        return format!("No bridges found for '{}'.", source.title);
    }

    let mut output = format!("Bridges from '{}' ({}):\n\n", source.title, source.domain.name());
    for (i, bridge) in bridges.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} [{}] (score: {:.3}, semantic: {:.3}, structural: {:.3})\n",
            i + 1,
            bridge.document.title,
            bridge.document.domain.name(),
            bridge.hybrid_score,
            bridge.semantic,
            bridge.structural
        ));
        if !bridge.shared_dynamics.is_empty() {
            output.push_str(&format!(
                "   shared dynamics: {}\n",
                bridge.shared_dynamics.join(", ")
            ));
        }
    }
    output
}

fn format_suggestions(a: &str, b: &str, suggestions: &[FusionSuggestion]) -> String {
    if suggestions.is_empty() {
        return format!("No fusion pattern applies to '{}' and '{}'.", a, b);
    }

    let mut output = String::new();
    for (i, s) in suggestions.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} (score: {:.3})\n   {}\n   Key question: {}\n",
            i + 1,
            s.pattern.name(),
            s.score,
            s.rationale,
            s.pattern.key_question()
        ));
        for evidence in &s.evidence {
            output.push_str(&format!("   - {}\n", evidence));
        }
        output.push('\n');
    }
    output
}

fn format_patterns(patterns: &[PatternDescriptor]) -> String {
    let mut output = String::new();
    for p in patterns {
        output.push_str(&format!(
            "## {} ({})\n{}\nExamples: {}\nKey question: {}\n\n",
            p.name,
            p.key,
            p.description,
            p.examples.join("; "),
            p.key_question
        ));
    }
    output
}

fn format_novelty(evaluation: &NoveltyEvaluation) -> String {
    let mut output = format!(
        "Novelty: {:.2} ({:?})\n{}\n",
        evaluation.score, evaluation.tier, evaluation.assessment
    );
    if !evaluation.similar_existing.is_empty() {
        output.push_str("\nClosest existing work:\n");
        for s in &evaluation.similar_existing {
            output.push_str(&format!(
                "- {} [{}] (similarity: {:.3})\n",
                s.title,
                s.domain.name(),
                s.similarity
            ));
        }
    }
    output.push_str(&format!("\nSuggestion: {}\n", evaluation.improvement));
    output
}

fn format_challenge(challenge: &PremiseChallenge) -> String {
    let mut output = String::new();
    for (i, p) in challenge.premises.iter().enumerate() {
        output.push_str(&format!("{}. Premise: {}\n", i + 1, p.premise));
        if let Some(marker) = &p.marker {
            output.push_str(&format!("   marker: '{}'\n", marker));
        }
        output.push_str(&format!("   {}\n", p.question.text));
        for g in &p.question.grounding {
            output.push_str(&format!("   grounded on '{}' ({})\n", g.title, g.domain.name()));
        }
        output.push('\n');
    }
    output
}

fn format_domains(domains: &[Domain]) -> String {
    let mut output = String::new();
    let mut current = None;
    for domain in domains {
        let category = domain.category();
        if current != Some(category) {
            output.push_str(&format!("\n## {}\n", category.label()));
            current = Some(category);
        }
        output.push_str(&format!("- {} ({})\n", domain.name(), domain.id()));
    }
    output.trim_start().to_string()
}

fn format_question_types(types: &[QuestionTypeDescriptor]) -> String {
    let mut output = String::new();
    for t in types {
        output.push_str(&format!(
            "## {} ({})\n{}\nPurpose: {}\n",
            t.name, t.key, t.description, t.purpose
        ));
        for example in t.examples {
            output.push_str(&format!("- {}\n", example));
        }
        output.push('\n');
    }
    output
}

fn format_learning_path(path: &LearningPath) -> String {
    let mut output = format!("# {}\n{}\n", path.title, path.description);
    output.push_str(&format!(
        "Type: {} | Steps: {} | About {} minutes\n",
        path.path_type,
        path.steps.len(),
        path.estimated_minutes
    ));

    if !path.objectives.is_empty() {
        output.push_str("\nObjectives:\n");
        for objective in &path.objectives {
            output.push_str(&format!("- {}\n", objective));
        }
    }

    for (i, step) in path.steps.iter().enumerate() {
        output.push_str(&format!(
            "\n## Step {}: {} [{}]\nFocus: {}\n",
            i + 1,
            step.concept.title,
            step.concept.domain.name(),
            step.focus
        ));
        for question in &step.questions {
            output.push_str(&format!("- {}\n", question));
        }
        if !step.connections.is_empty() {
            output.push_str(&format!("Builds on: {}\n", step.connections.join(", ")));
        }
        output.push_str(&format!(
            "Checkpoint: {} ({} min)\n",
            step.checkpoint, step.estimated_minutes
        ));
    }
    output
}
