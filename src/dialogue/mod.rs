//! Dialogue module - the Socratic questioning state machine
//!
//! Public interface:
//! - `SocraticEngine` start / advance / end / challenge_statement
//! - `DialogueState` explicit session value (functional update)
//! - `PremiseDetector` premise-marker lexicon
//! - `DialogueSummary` and `export_markdown` for finished sessions
//! - `question_types` catalogue of the seven question kinds
//!
//! Modes: explore (default) moves to challenge-premise when an answer states
//! a new premise, and back after one turn. explore-viewpoints is entered only
//! on caller request and stays until switched or ended.

mod engine;
mod kinds;
mod premise;
mod questions;
mod state;
mod summary;

pub use engine::{ChallengedPremise, DialogueConfig, PremiseChallenge, SocraticEngine};
pub use kinds::{question_types, QuestionTypeDescriptor};
pub use premise::{extract_insights, normalize_premise, DetectedPremise, PremiseDetector};
pub use state::{
    ConclusionReason, DialogueMode, DialogueState, Exchange, FocusConcept, GroundingRef,
    Question, QuestionKind, SessionStatus,
};
pub use summary::{export_markdown, DialogueSummary};
