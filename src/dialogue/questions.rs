//! Question templates
//!
//! Questions never contain answers. They name the facet or document that
//! grounds them and hand the thinking back to the user.

use super::state::{DialogueMode, GroundingRef, Question, QuestionKind};

/// Kind rotation for explore turns
pub const EXPLORE_ROTATION: [QuestionKind; 4] = [
    QuestionKind::Clarification,
    QuestionKind::Evidence,
    QuestionKind::Implication,
    QuestionKind::Bridge,
];

pub fn explore(kind: QuestionKind, title: &str, facet: &str) -> Question {
    let text = match kind {
        QuestionKind::Evidence => format!(
            "What is the strongest evidence that {} is really at work in '{}'? How sure can you be of it?",
            facet, title
        ),
        QuestionKind::Implication => format!(
            "If {} drives '{}', where does that lead when you push it to the limit? Would you accept that conclusion?",
            facet, title
        ),
        QuestionKind::Bridge => format!(
            "Which other field would recognise the {} in '{}', and what would it call it?",
            facet, title
        ),
        _ => format!(
            "What exactly does {} mean in '{}'? How would you define it so that someone from another field could test it?",
            facet, title
        ),
    };
    Question {
        text,
        kind,
        mode: DialogueMode::Explore,
        facet: Some(facet.to_string()),
        grounding: Vec::new(),
    }
}

/// Bridge question grounded on a document from another field
pub fn grounded_bridge(title: &str, facet: &str, other: GroundingRef) -> Question {
    let text = format!(
        "{} shows up in '{}' and also in '{}' from {}. What would each side learn from the other?",
        capitalize(facet),
        title,
        other.title,
        other.domain.name()
    );
    Question {
        text,
        kind: QuestionKind::Bridge,
        mode: DialogueMode::Explore,
        facet: Some(facet.to_string()),
        grounding: vec![other],
    }
}

/// Asked once every facet has come up
pub fn meta(title: &str) -> Question {
    Question {
        text: format!(
            "Why does '{}' matter to you? What is it you actually want to find out?",
            title
        ),
        kind: QuestionKind::Meta,
        mode: DialogueMode::Explore,
        facet: None,
        grounding: Vec::new(),
    }
}

/// Premise set against a contradicting document from another domain
pub fn challenge_grounded(
    premise: &str,
    assumed: &str,
    opposite: &str,
    other: GroundingRef,
) -> Question {
    let text = format!(
        "You said: \"{}\". In {}, '{}' describes {} where you assume {}. How do you reconcile the two?",
        premise,
        other.domain.name(),
        other.title,
        opposite,
        assumed
    );
    Question {
        text,
        kind: QuestionKind::Assumption,
        mode: DialogueMode::ChallengePremise,
        facet: Some(assumed.to_string()),
        grounding: vec![other],
    }
}

/// No contradicting document found
pub fn challenge_ungrounded(premise: &str) -> Question {
    Question {
        text: format!(
            "You said: \"{}\". Under what conditions would that stop being true? What would have to hold for the opposite to happen?",
            premise
        ),
        kind: QuestionKind::Assumption,
        mode: DialogueMode::ChallengePremise,
        facet: None,
        grounding: Vec::new(),
    }
}

/// Challenge without a flagged premise: question the focus itself
pub fn challenge_focus(title: &str) -> Question {
    Question {
        text: format!(
            "What does '{}' take for granted? Which of those assumptions would another field reject?",
            title
        ),
        kind: QuestionKind::Assumption,
        mode: DialogueMode::ChallengePremise,
        facet: None,
        grounding: Vec::new(),
    }
}

pub fn viewpoints(title: &str, others: Vec<GroundingRef>) -> Question {
    let text = if others.is_empty() {
        format!(
            "Which other field would see '{}' most differently from you, and why?",
            title
        )
    } else {
        let listed: Vec<String> = others
            .iter()
            .map(|g| format!("'{}' ({})", g.title, g.domain.name()))
            .collect();
        format!(
            "Compare how {} each frame '{}'. Where do they agree, and where do they really disagree?",
            join_list(&listed),
            title
        )
    };
    Question {
        text,
        kind: QuestionKind::Viewpoint,
        mode: DialogueMode::ExploreViewpoints,
        facet: None,
        grounding: others,
    }
}

/// Follow-up questions offered when a session ends
pub fn deeper_questions(title: &str) -> Vec<String> {
    vec![
        "What new door did this inquiry open?".to_string(),
        format!("How has your understanding of '{}' changed?", title),
        "What is the most fundamental question you still cannot answer?".to_string(),
    ]
}

fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
