//! Dialogue state - an explicit value passed into and returned from each turn

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::corpus::{Document, Domain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueMode {
    #[default]
    Explore,
    ChallengePremise,
    ExploreViewpoints,
}

impl DialogueMode {
    pub fn key(&self) -> &'static str {
        match self {
            DialogueMode::Explore => "explore",
            DialogueMode::ChallengePremise => "challenge_premise",
            DialogueMode::ExploreViewpoints => "explore_viewpoints",
        }
    }
}

impl fmt::Display for DialogueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DialogueMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "explore" => Ok(DialogueMode::Explore),
            "challenge_premise" | "challenge" => Ok(DialogueMode::ChallengePremise),
            "explore_viewpoints" | "viewpoints" => Ok(DialogueMode::ExploreViewpoints),
            other => Err(anyhow!("Unknown dialogue mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Clarification,
    Assumption,
    Evidence,
    Viewpoint,
    Implication,
    Meta,
    Bridge,
}

/// A corpus document a question is grounded on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingRef {
    pub id: String,
    pub title: String,
    pub domain: Domain,
}

impl From<&Document> for GroundingRef {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            domain: doc.domain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub kind: QuestionKind,
    /// Mode that produced the question
    pub mode: DialogueMode,
    /// Dynamics tag the question targets, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grounding: Vec<GroundingRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: Question,
    /// None until the caller answers
    pub answer: Option<String>,
}

/// What the dialogue is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusConcept {
    /// Corpus id when the focus resolved to a document
    pub id: Option<String>,
    pub title: String,
    pub domain: Option<Domain>,
    /// Text used to ground retrieval
    pub text: String,
    /// Dynamics tags of the focus, in signature order
    pub facets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConclusionReason {
    /// Caller ended the session
    Ended,
    /// `max_depth` reached
    MaxDepth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Active,
    Concluded(ConclusionReason),
}

impl SessionStatus {
    pub fn key(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Concluded(ConclusionReason::Ended) => "ended",
            SessionStatus::Concluded(ConclusionReason::MaxDepth) => "max_depth",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    pub session_id: Uuid,
    pub mode: DialogueMode,
    /// Append-only
    pub history: Vec<Exchange>,
    /// Normalized premise sentences already challenged
    pub surfaced_premises: BTreeSet<String>,
    pub depth: u32,
    pub focus: FocusConcept,
    #[serde(default)]
    pub status: SessionStatus,
    /// Premise awaiting its challenge question
    #[serde(default)]
    pub pending_premise: Option<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DialogueState {
    pub fn new(focus: FocusConcept, mode: DialogueMode) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            mode,
            history: Vec::new(),
            surfaced_premises: BTreeSet::new(),
            depth: 0,
            focus,
            status: SessionStatus::Active,
            pending_premise: None,
            insights: Vec::new(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.status, SessionStatus::Concluded(_))
    }

    /// The question still waiting for an answer
    pub fn pending_question(&self) -> Option<&Question> {
        self.history
            .last()
            .filter(|e| e.answer.is_none())
            .map(|e| &e.question)
    }

    /// Grounding documents already shown in any question
    pub fn shown_documents(&self) -> BTreeSet<&str> {
        self.history
            .iter()
            .flat_map(|e| e.question.grounding.iter().map(|g| g.id.as_str()))
            .collect()
    }

    /// All question and answer text so far
    pub fn transcript_text(&self) -> String {
        let mut text = String::new();
        for exchange in &self.history {
            text.push_str(&exchange.question.text);
            text.push('\n');
            if let Some(answer) = &exchange.answer {
                text.push_str(answer);
                text.push('\n');
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus() -> FocusConcept {
        FocusConcept {
            id: Some("entropy".into()),
            title: "Entropy".into(),
            domain: Some(Domain::Physics),
            text: "Entropy".into(),
            facets: vec!["disorder".into()],
        }
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(
            "explore-viewpoints".parse::<DialogueMode>().unwrap(),
            DialogueMode::ExploreViewpoints
        );
        assert_eq!("challenge".parse::<DialogueMode>().unwrap(), DialogueMode::ChallengePremise);
        assert!("debate".parse::<DialogueMode>().is_err());
    }

    #[test]
    fn test_new_state_is_empty_and_active() {
        let state = DialogueState::new(focus(), DialogueMode::Explore);
        assert_eq!(state.depth, 0);
        assert!(state.history.is_empty());
        assert!(!state.is_concluded());
        assert!(state.pending_question().is_none());
    }

    #[test]
    fn test_state_json_round_trip_keeps_status() {
        let mut state = DialogueState::new(focus(), DialogueMode::Explore);
        state.status = SessionStatus::Concluded(ConclusionReason::MaxDepth);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("max_depth"));
        let back: DialogueState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
