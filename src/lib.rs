//! Polymath - cross-domain concept fusion and Socratic dialogue
//!
//! The core consumes a `DocumentIndex` and exposes fusion scoring and
//! dialogue turns through `PolymathEngine`. `MemoryIndex` and the MCP server
//! are reference collaborators that make the crate usable end to end.

pub mod config;
pub mod corpus;
pub mod dialogue;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod learning;
pub mod mcp;
pub mod retrieval;
pub mod signature;

// Re-export commonly used types
pub use config::PolymathConfig;
pub use corpus::{Document, DocumentIndex, Domain, MemoryIndex};
pub use dialogue::{DialogueMode, DialogueState};
pub use engine::PolymathEngine;
pub use error::{FusionError, FusionResult};
pub use fusion::{FusionPattern, FusionSuggestion};
pub use learning::{LearningPath, PathType};
