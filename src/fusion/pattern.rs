//! The seven fusion patterns
//!
//! A closed enum with a static descriptor table. Scoring lives in the
//! matcher; this file only carries names, examples and questions.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionPattern {
    MetaphoricalTransfer,
    StructuralIsomorphism,
    AssumptionSubversion,
    ScaleJump,
    TemporalTransformation,
    BoundaryConcept,
    DialecticalSynthesis,
}

/// Static description of a pattern
#[derive(Debug, Clone, Serialize)]
pub struct PatternDescriptor {
    pub pattern: FusionPattern,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
    pub key_question: &'static str,
}

static DESCRIPTORS: [PatternDescriptor; 7] = [
    PatternDescriptor {
        pattern: FusionPattern::MetaphoricalTransfer,
        key: "metaphorical_transfer",
        name: "Metaphorical Transfer",
        description: "A is like B: a concept from one field becomes a metaphor in another",
        examples: &["organization = organism", "mind = computer", "market = ecosystem"],
        key_question: "What in another field could this concept be a metaphor for?",
    },
    PatternDescriptor {
        pattern: FusionPattern::StructuralIsomorphism,
        key: "structural_isomorphism",
        name: "Structural Isomorphism",
        description: "Same structure, different field: one pattern recurs across disciplines",
        examples: &[
            "evolutionary algorithms (biology and computer science)",
            "network theory (sociology, physics and biology)",
        ],
        key_question: "Does the same structure appear in another field?",
    },
    PatternDescriptor {
        pattern: FusionPattern::AssumptionSubversion,
        key: "assumption_subversion",
        name: "Assumption Subversion",
        description: "One field challenges a core premise that another field takes for granted",
        examples: &[
            "behavioral economics (psychology into economics)",
            "social constructivism (sociology into natural science)",
        ],
        key_question: "How would another field see what this field takes for granted?",
    },
    PatternDescriptor {
        pattern: FusionPattern::ScaleJump,
        key: "scale_jump",
        name: "Scale Jump",
        description: "Micro to macro and back: a principle at one level applied at another",
        examples: &[
            "emergence (physics to complex systems to society)",
            "game theory (individual to group to international relations)",
        ],
        key_question: "Does this principle still hold at a larger or smaller scale?",
    },
    PatternDescriptor {
        pattern: FusionPattern::TemporalTransformation,
        key: "temporal_transformation",
        name: "Temporal Transformation",
        description: "Short-term and long-term principles exchanged by rescaling time",
        examples: &[
            "cultural evolution (biological time to cultural time)",
            "historical institutionalism",
        ],
        key_question: "How does this principle behave on a different timescale?",
    },
    PatternDescriptor {
        pattern: FusionPattern::BoundaryConcept,
        key: "boundary_concept",
        name: "Boundary Concept",
        description: "A concept shared by many fields that lets them talk to each other",
        examples: &["network", "information", "complexity", "feedback"],
        key_question: "Which concept could serve as a bridge connecting several fields?",
    },
    PatternDescriptor {
        pattern: FusionPattern::DialecticalSynthesis,
        key: "dialectical_synthesis",
        name: "Dialectical Synthesis",
        description: "Two opposing views yield a third, integrating perspective",
        examples: &[
            "structure-agency duality (Giddens)",
            "nature versus nurture leading to epigenetics",
        ],
        key_question: "How could these two opposing perspectives be integrated?",
    },
];

impl FusionPattern {
    /// Enumeration order, also the tie-break order for equal scores
    pub const ALL: [FusionPattern; 7] = [
        FusionPattern::MetaphoricalTransfer,
        FusionPattern::StructuralIsomorphism,
        FusionPattern::AssumptionSubversion,
        FusionPattern::ScaleJump,
        FusionPattern::TemporalTransformation,
        FusionPattern::BoundaryConcept,
        FusionPattern::DialecticalSynthesis,
    ];

    pub fn descriptor(&self) -> &'static PatternDescriptor {
        &DESCRIPTORS[*self as usize]
    }

    pub fn key(&self) -> &'static str {
        self.descriptor().key
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn key_question(&self) -> &'static str {
        self.descriptor().key_question
    }

    /// Patterns that require the two concepts to come from different domains
    pub fn requires_distinct_domains(&self) -> bool {
        matches!(
            self,
            FusionPattern::MetaphoricalTransfer
                | FusionPattern::AssumptionSubversion
                | FusionPattern::ScaleJump
                | FusionPattern::TemporalTransformation
        )
    }
}

/// All seven descriptors, independent of any corpus
pub fn fusion_patterns() -> &'static [PatternDescriptor] {
    &DESCRIPTORS
}

impl fmt::Display for FusionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FusionPattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        FusionPattern::ALL
            .into_iter()
            .find(|p| p.key() == normalized)
            .ok_or_else(|| anyhow!("Unknown fusion pattern: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_seven_patterns() {
        assert_eq!(fusion_patterns().len(), 7);
        assert_eq!(FusionPattern::ALL.len(), 7);
    }

    #[test]
    fn test_descriptor_table_matches_enum_order() {
        for (i, pattern) in FusionPattern::ALL.iter().enumerate() {
            assert_eq!(fusion_patterns()[i].pattern, *pattern);
            assert_eq!(pattern.descriptor().pattern, *pattern);
        }
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            "scale-jump".parse::<FusionPattern>().unwrap(),
            FusionPattern::ScaleJump
        );
        assert_eq!(
            "Boundary Concept".parse::<FusionPattern>().unwrap(),
            FusionPattern::BoundaryConcept
        );
        assert!("synergy".parse::<FusionPattern>().is_err());
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&FusionPattern::DialecticalSynthesis).unwrap();
        assert_eq!(json, "\"dialectical_synthesis\"");
    }
}
