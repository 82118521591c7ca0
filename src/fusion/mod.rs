//! Fusion module - the seven-pattern taxonomy and pair scoring
//!
//! Public interface:
//! - `FusionPattern` closed enum with static `PatternDescriptor`s
//! - `PatternMatcher` scoring a concept pair against every pattern
//! - `FusionSuggestion` / `Evidence` explained results
//! - `evaluate_novelty` for proposed fusions

mod matcher;
mod novelty;
mod pattern;

pub use matcher::{Evidence, FusionConfig, FusionSuggestion, PatternMatcher};
pub use novelty::{evaluate_novelty, NoveltyEvaluation, NoveltyTier, SimilarConcept};
pub use pattern::{fusion_patterns, FusionPattern, PatternDescriptor};
