//! Learning module - guided paths through the corpus
//!
//! Public interface:
//! - `PathPlanner::plan` builds a `LearningPath` from a start concept
//! - `PathType` the five walk strategies
//! - `PathConfig` step budget and bridge fan-out
//!
//! Spiral, breadth-first and bridge paths hop between domains along the
//! bridge finder's ranking. Depth-first and challenge paths stay on the start
//! concept and change the angle of approach at each step.

mod planner;

pub use planner::PathPlanner;

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::corpus::Domain;
use crate::dialogue::GroundingRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// One concept, five lenses from definition to open controversy
    DepthFirst,
    /// Nearest neighbours first, fanning out across domains
    BreadthFirst,
    /// Follow the best bridge at each hop, deepening as the path goes on
    #[default]
    Spiral,
    /// From a start concept towards a goal through intermediate bridges
    Bridge,
    /// One concept under five hard questions
    Challenge,
}

impl PathType {
    pub const ALL: [PathType; 5] = [
        PathType::DepthFirst,
        PathType::BreadthFirst,
        PathType::Spiral,
        PathType::Bridge,
        PathType::Challenge,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PathType::DepthFirst => "depth_first",
            PathType::BreadthFirst => "breadth_first",
            PathType::Spiral => "spiral",
            PathType::Bridge => "bridge",
            PathType::Challenge => "challenge",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PathType::DepthFirst => "A journey deep into a single concept",
            PathType::BreadthFirst => "A survey of widely connected concepts",
            PathType::Spiral => "A spiral that deepens step by step",
            PathType::Bridge => "A bridge built between distant fields",
            PathType::Challenge => "An intellectual adventure through hard questions",
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PathType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        PathType::ALL
            .into_iter()
            .find(|t| t.key() == normalized)
            .ok_or_else(|| anyhow!("Unknown path type: {}", s))
    }
}

/// Learning path configuration
///
/// See `LearningSection` in project config for persistence.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Step budget when the caller gives none (default: 7)
    pub max_steps: usize,
    /// Bridges fetched per hop (default: 3)
    pub fanout: usize,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_steps: 7,
            fanout: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PathStep {
    pub concept: GroundingRef,
    pub focus: String,
    pub questions: Vec<String>,
    /// Titles of earlier steps this one builds on
    pub connections: Vec<String>,
    pub checkpoint: String,
    pub estimated_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningPath {
    pub path_type: PathType,
    pub title: String,
    pub description: String,
    pub start: GroundingRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<GroundingRef>,
    pub steps: Vec<PathStep>,
    pub domains_covered: Vec<Domain>,
    pub objectives: Vec<String>,
    pub estimated_minutes: u32,
}
