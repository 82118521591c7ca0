//! SocraticEngine - mode state machine and question selection
//!
//! Every call takes the state by reference and returns a new one. The input
//! state is never modified, so on error the caller still holds a valid value.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::premise::{extract_insights, PremiseDetector};
use super::questions::{self, EXPLORE_ROTATION};
use super::state::{
    ConclusionReason, DialogueMode, DialogueState, Exchange, FocusConcept, GroundingRef,
    Question, QuestionKind, SessionStatus,
};
use super::summary::DialogueSummary;
use crate::corpus::text::{contains_phrase, words};
use crate::corpus::{Document, DocumentIndex, Domain, DomainFilter, ScoredDocument, SearchQuery};
use crate::error::{FusionError, FusionResult, IndexCall};
use crate::signature::{extract_text, SignatureCache};

/// Dialogue policy knobs
///
/// See `DialogueSection` in project config for persistence.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Questions per session before it concludes (default: 12)
    pub max_depth: u32,
    /// Documents compared per viewpoints turn (default: 3)
    pub viewpoint_count: usize,
    /// Candidates fetched when grounding a challenge or bridge (default: 8)
    pub challenge_fetch: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            viewpoint_count: 3,
            challenge_fetch: 8,
        }
    }
}

/// One premise lifted from a statement, with its challenge
#[derive(Debug, Clone, Serialize)]
pub struct ChallengedPremise {
    pub premise: String,
    /// None when the whole statement was treated as the premise
    pub marker: Option<String>,
    pub question: Question,
}

#[derive(Debug, Clone, Serialize)]
pub struct PremiseChallenge {
    pub statement: String,
    pub premises: Vec<ChallengedPremise>,
}

pub struct SocraticEngine {
    index: Arc<dyn DocumentIndex>,
    signatures: Arc<SignatureCache>,
    premises: PremiseDetector,
    config: DialogueConfig,
}

impl SocraticEngine {
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        signatures: Arc<SignatureCache>,
        premises: PremiseDetector,
        config: DialogueConfig,
    ) -> Self {
        Self {
            index,
            signatures,
            premises,
            config,
        }
    }

    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    /// Focus on a corpus document; its dynamics tags become the facets
    pub fn focus_on_document(&self, document: &Document) -> FocusConcept {
        let signature = self.signatures.get(document);
        FocusConcept {
            id: Some(document.id.clone()),
            title: document.title.clone(),
            domain: Some(document.domain),
            text: document.full_text(),
            facets: signature.dynamics_tags.iter().cloned().collect(),
        }
    }

    /// Focus on free text that is not in the corpus
    pub fn focus_on_text(&self, text: &str) -> FocusConcept {
        let signature = extract_text(text, self.signatures.lexicon());
        FocusConcept {
            id: None,
            title: text.trim().to_string(),
            domain: None,
            text: text.trim().to_string(),
            facets: signature.dynamics_tags.iter().cloned().collect(),
        }
    }

    /// New session with its first question already pending
    pub fn start(&self, focus: FocusConcept, mode: DialogueMode) -> FusionResult<DialogueState> {
        let mut state = DialogueState::new(focus, mode);
        let question = self.next_question(&state)?;
        state.history.push(Exchange {
            question,
            answer: None,
        });
        state.depth = 1;

        tracing::info!(
            session = %state.session_id,
            focus = %state.focus.title,
            mode = %mode,
            "dialogue started"
        );
        Ok(state)
    }

    /// Record `answer` to the pending question and compute the next turn
    ///
    /// `requested_mode` is an explicit caller switch and wins over automatic
    /// transitions. Returns `(None, concluded_state)` once `max_depth` is hit.
    pub fn advance(
        &self,
        state: &DialogueState,
        answer: &str,
        requested_mode: Option<DialogueMode>,
    ) -> FusionResult<(Option<Question>, DialogueState)> {
        if state.is_concluded() {
            return Err(FusionError::InvalidState(format!(
                "session {} has already concluded",
                state.session_id
            )));
        }
        if state.pending_question().is_none() {
            return Err(FusionError::InvalidState(format!(
                "session {} has no pending question",
                state.session_id
            )));
        }

        let mut next = state.clone();
        let answer = answer.trim();
        if let Some(last) = next.history.last_mut() {
            last.answer = Some(answer.to_string());
        }
        next.insights.extend(extract_insights(answer));

        let fresh_premise = self
            .premises
            .detect(answer)
            .into_iter()
            .find(|p| !state.surfaced_premises.contains(&p.normalized));

        match requested_mode {
            Some(mode) => {
                next.mode = mode;
                next.pending_premise = None;
                if mode == DialogueMode::ChallengePremise {
                    if let Some(premise) = fresh_premise {
                        next.surfaced_premises.insert(premise.normalized);
                        next.pending_premise = Some(premise.sentence);
                    }
                }
            }
            None => match state.mode {
                DialogueMode::Explore => {
                    if let Some(premise) = fresh_premise {
                        tracing::info!(
                            session = %state.session_id,
                            premise = %premise.normalized,
                            marker = %premise.marker,
                            "premise surfaced"
                        );
                        next.mode = DialogueMode::ChallengePremise;
                        next.surfaced_premises.insert(premise.normalized);
                        next.pending_premise = Some(premise.sentence);
                    }
                }
                DialogueMode::ChallengePremise => {
                    next.mode = DialogueMode::Explore;
                    next.pending_premise = None;
                }
                DialogueMode::ExploreViewpoints => {}
            },
        }

        next.updated_at = Utc::now();
        if next.depth >= self.config.max_depth {
            next.status = SessionStatus::Concluded(ConclusionReason::MaxDepth);
            next.pending_premise = None;
            tracing::info!(session = %next.session_id, depth = next.depth, "dialogue reached max depth");
            return Ok((None, next));
        }

        let question = self.next_question(&next)?;
        next.history.push(Exchange {
            question: question.clone(),
            answer: None,
        });
        next.depth += 1;
        Ok((Some(question), next))
    }

    /// Conclude the session and summarise it
    pub fn end(&self, state: &DialogueState) -> FusionResult<(DialogueSummary, DialogueState)> {
        if state.is_concluded() {
            return Err(FusionError::InvalidState(format!(
                "session {} has already concluded",
                state.session_id
            )));
        }
        let mut next = state.clone();
        next.status = SessionStatus::Concluded(ConclusionReason::Ended);
        next.pending_premise = None;
        next.updated_at = Utc::now();

        tracing::info!(session = %next.session_id, depth = next.depth, "dialogue ended");
        Ok((DialogueSummary::from_state(&next), next))
    }

    /// Surface and challenge the premises of a standalone statement
    pub fn challenge_statement(
        &self,
        statement: &str,
        exclude_domain: Option<Domain>,
    ) -> FusionResult<PremiseChallenge> {
        let detected = self.premises.detect(statement);
        let candidates: Vec<(String, Option<String>)> = if detected.is_empty() {
            vec![(statement.trim().to_string(), None)]
        } else {
            detected
                .into_iter()
                .map(|p| (p.sentence, Some(p.marker)))
                .collect()
        };

        let mut premises = Vec::with_capacity(candidates.len());
        for (premise, marker) in candidates {
            let question = self.challenge_question(&premise, &[], None, exclude_domain)?;
            premises.push(ChallengedPremise {
                premise,
                marker,
                question,
            });
        }

        Ok(PremiseChallenge {
            statement: statement.to_string(),
            premises,
        })
    }

    fn next_question(&self, state: &DialogueState) -> FusionResult<Question> {
        match state.mode {
            DialogueMode::Explore => self.explore_question(state),
            DialogueMode::ChallengePremise => match &state.pending_premise {
                Some(premise) => self.challenge_question(
                    premise,
                    &state.focus.facets,
                    state.focus.id.as_deref(),
                    state.focus.domain,
                ),
                None => Ok(questions::challenge_focus(&state.focus.title)),
            },
            DialogueMode::ExploreViewpoints => self.viewpoints_question(state),
        }
    }

    /// First facet not yet mentioned, with the question kind rotating per turn
    fn explore_question(&self, state: &DialogueState) -> FusionResult<Question> {
        let mentioned = words(&state.transcript_text());
        let facet = state
            .focus
            .facets
            .iter()
            .find(|f| !contains_phrase(&mentioned, f));

        let Some(facet) = facet else {
            return Ok(questions::meta(&state.focus.title));
        };

        let explore_turns = state
            .history
            .iter()
            .filter(|e| e.question.mode == DialogueMode::Explore)
            .count();
        let kind = EXPLORE_ROTATION[explore_turns % EXPLORE_ROTATION.len()];

        if kind == QuestionKind::Bridge {
            if let Some(other) = self.bridge_for_facet(state, facet)? {
                return Ok(questions::grounded_bridge(&state.focus.title, facet, other));
            }
        }
        Ok(questions::explore(kind, &state.focus.title, facet))
    }

    /// A document from another domain whose signature carries `facet`
    fn bridge_for_facet(
        &self,
        state: &DialogueState,
        facet: &str,
    ) -> FusionResult<Option<GroundingRef>> {
        let filter = state.focus.domain.map(DomainFilter::excluding);
        let query = SearchQuery::Text(format!("{} {}", state.focus.text, facet));
        let hits = self.search(&query, filter.as_ref(), self.config.challenge_fetch)?;
        let shown = state.shown_documents();

        let mut fallback = None;
        for hit in hits {
            if Some(hit.document.id.as_str()) == state.focus.id.as_deref() {
                continue;
            }
            if !self.signatures.get(&hit.document).dynamics_tags.contains(facet) {
                continue;
            }
            if !shown.contains(hit.document.id.as_str()) {
                return Ok(Some(GroundingRef::from(&hit.document)));
            }
            if fallback.is_none() {
                fallback = Some(GroundingRef::from(&hit.document));
            }
        }
        Ok(fallback)
    }

    /// Ground the premise on a document that holds an opposite dynamics tag
    fn challenge_question(
        &self,
        premise: &str,
        focus_facets: &[String],
        focus_id: Option<&str>,
        focus_domain: Option<Domain>,
    ) -> FusionResult<Question> {
        let lexicon = self.signatures.lexicon();
        let premise_sig = extract_text(premise, lexicon);

        let mut assumed: Vec<&str> = premise_sig.dynamics_tags.iter().map(|t| t.as_str()).collect();
        for facet in focus_facets {
            if !assumed.contains(&facet.as_str()) {
                assumed.push(facet);
            }
        }
        if assumed.iter().all(|t| !lexicon.has_opposite(t)) {
            return Ok(questions::challenge_ungrounded(premise));
        }

        let filter = focus_domain.map(DomainFilter::excluding);
        let hits = self.search(
            &SearchQuery::text(premise),
            filter.as_ref(),
            self.config.challenge_fetch,
        )?;

        for hit in &hits {
            if Some(hit.document.id.as_str()) == focus_id {
                continue;
            }
            let signature = self.signatures.get(&hit.document);
            for tag in &assumed {
                if let Some(opposite) = lexicon
                    .opposites_of(tag)
                    .find(|o| signature.dynamics_tags.contains(*o))
                {
                    return Ok(questions::challenge_grounded(
                        premise,
                        tag,
                        opposite,
                        GroundingRef::from(&hit.document),
                    ));
                }
            }
        }
        Ok(questions::challenge_ungrounded(premise))
    }

    /// Up to `viewpoint_count` documents from distinct domains, unseen first
    fn viewpoints_question(&self, state: &DialogueState) -> FusionResult<Question> {
        let n = self.config.viewpoint_count.max(1);
        let filter = state.focus.domain.map(DomainFilter::excluding);
        let fetch = n.saturating_mul(4).max(self.config.challenge_fetch);
        let hits = self.search(
            &SearchQuery::text(state.focus.text.clone()),
            filter.as_ref(),
            fetch,
        )?;

        let shown = state.shown_documents();
        let candidates: Vec<&Document> = hits
            .iter()
            .map(|h| &h.document)
            .filter(|d| Some(d.id.as_str()) != state.focus.id.as_deref())
            .collect();

        let mut picked: Vec<GroundingRef> = Vec::with_capacity(n);
        let mut domains = BTreeSet::new();
        let unseen = candidates.iter().filter(|d| !shown.contains(d.id.as_str()));
        let seen = candidates.iter().filter(|d| shown.contains(d.id.as_str()));
        for document in unseen.chain(seen) {
            if picked.len() == n {
                break;
            }
            if domains.insert(document.domain) {
                picked.push(GroundingRef::from(*document));
            }
        }

        Ok(questions::viewpoints(&state.focus.title, picked))
    }

    fn search(
        &self,
        query: &SearchQuery,
        filter: Option<&DomainFilter>,
        k: usize,
    ) -> FusionResult<Vec<ScoredDocument>> {
        self.index.search(query, filter, k).map_err(|e| {
            tracing::warn!(index = self.index.name(), error = %e, "dialogue grounding search failed");
            FusionError::index(IndexCall::Search, e)
        })
    }
}
