//! The seven Socratic question kinds
//!
//! Same shape as the fusion pattern table: a closed enum, one static
//! descriptor per variant, in enumeration order.

use std::str::FromStr;

use anyhow::anyhow;
use serde::Serialize;

use super::state::QuestionKind;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionTypeDescriptor {
    pub kind: QuestionKind,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub purpose: &'static str,
    pub examples: &'static [&'static str],
}

static DESCRIPTORS: [QuestionTypeDescriptor; 7] = [
    QuestionTypeDescriptor {
        kind: QuestionKind::Clarification,
        key: "clarification",
        name: "Clarification",
        description: "Pin down what a concept means exactly",
        purpose: "Turn a vague notion into a definition someone else could test",
        examples: &[
            "What exactly do you mean by '{concept}'?",
            "How would you define '{concept}' in this context?",
            "What are the essential features of '{concept}'?",
        ],
    },
    QuestionTypeDescriptor {
        kind: QuestionKind::Assumption,
        key: "assumption",
        name: "Assumption Challenge",
        description: "Expose the hidden premises behind a claim",
        purpose: "Bring what is taken for granted into view and examine it",
        examples: &[
            "What does this claim presuppose?",
            "Why assume '{concept}' always holds?",
            "What follows if that premise is false?",
        ],
    },
    QuestionTypeDescriptor {
        kind: QuestionKind::Evidence,
        key: "evidence",
        name: "Evidence and Reasoning",
        description: "Ask for the grounds that support a claim",
        purpose: "Check the logic and the evidence behind a position",
        examples: &[
            "What makes you think so?",
            "Which evidence supports this claim?",
            "Is another explanation possible?",
        ],
    },
    QuestionTypeDescriptor {
        kind: QuestionKind::Viewpoint,
        key: "viewpoint",
        name: "Viewpoint",
        description: "Look at the same thing from another position",
        purpose: "Widen the view by trying on other perspectives",
        examples: &[
            "How would {other_domain} see this?",
            "What would someone on the opposite side argue?",
            "How would {thinker} look at it?",
        ],
    },
    QuestionTypeDescriptor {
        kind: QuestionKind::Implication,
        key: "implication",
        name: "Implication",
        description: "Follow an idea to its consequences",
        purpose: "Trace where an idea leads when taken seriously",
        examples: &[
            "If this is true, what follows?",
            "Where does this idea end up if you push it all the way?",
            "What would change if it were applied in practice?",
        ],
    },
    QuestionTypeDescriptor {
        kind: QuestionKind::Meta,
        key: "meta",
        name: "Meta-Question",
        description: "Question the question itself",
        purpose: "Reflect on the direction and aim of the inquiry",
        examples: &[
            "Why does this question matter?",
            "What do we really want to know here?",
            "What drew you to this problem?",
        ],
    },
    QuestionTypeDescriptor {
        kind: QuestionKind::Bridge,
        key: "bridge",
        name: "Bridge Question",
        description: "Look for the point where two fields connect",
        purpose: "Encourage thinking across disciplines",
        examples: &[
            "How does this idea from {domain_a} connect to {domain_b}?",
            "Where does a similar phenomenon appear in another field?",
            "Would this pattern show up somewhere else?",
        ],
    },
];

impl QuestionKind {
    pub const ALL: [QuestionKind; 7] = [
        QuestionKind::Clarification,
        QuestionKind::Assumption,
        QuestionKind::Evidence,
        QuestionKind::Viewpoint,
        QuestionKind::Implication,
        QuestionKind::Meta,
        QuestionKind::Bridge,
    ];

    pub fn descriptor(&self) -> &'static QuestionTypeDescriptor {
        &DESCRIPTORS[*self as usize]
    }

    pub fn key(&self) -> &'static str {
        self.descriptor().key
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }
}

impl FromStr for QuestionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        QuestionKind::ALL
            .into_iter()
            .find(|k| k.key() == normalized)
            .ok_or_else(|| anyhow!("Unknown question type: {}", s))
    }
}

/// All seven question kinds with purpose and examples
pub fn question_types() -> &'static [QuestionTypeDescriptor] {
    &DESCRIPTORS
}
