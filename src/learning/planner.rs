//! PathPlanner - walks the bridge ranking into a learning path

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

use super::{LearningPath, PathConfig, PathStep, PathType};
use crate::corpus::similarity::jaccard;
use crate::corpus::{Document, Domain};
use crate::dialogue::GroundingRef;
use crate::error::FusionResult;
use crate::retrieval::BridgeFinder;
use crate::signature::SignatureCache;

/// (focus, question templates) for depth-first steps
const DEPTH_LENSES: [(&str, [&str; 2]); 5] = [
    (
        "definition and origin",
        [
            "Where does the idea of '{concept}' come from?",
            "What problem was '{concept}' needed for?",
        ],
    ),
    (
        "core principle",
        [
            "What is the logical structure of '{concept}'?",
            "Which law or principle sits at the heart of '{concept}'?",
        ],
    ),
    (
        "formal structure",
        [
            "How would you express '{concept}' formally?",
            "Which mathematical tools does '{concept}' rely on?",
        ],
    ),
    (
        "applications across fields",
        [
            "How does '{concept}' show up in other fields?",
            "Where is '{concept}' applied in practice?",
        ],
    ),
    (
        "limits and controversies",
        [
            "Where does '{concept}' stop working?",
            "Which debates about '{concept}' are still open?",
        ],
    ),
];

const CHALLENGES: [(&str, &str); 5] = [
    ("ontological challenge", "Is '{concept}' real, or a model we impose on the world?"),
    ("reduction challenge", "Can '{concept}' be reduced to something more basic?"),
    ("connection challenge", "What is the most distant field you can connect to '{concept}'?"),
    ("paradox challenge", "Which paradox does '{concept}' raise, and can you resolve it?"),
    ("prediction challenge", "How will our understanding of '{concept}' change?"),
];

pub struct PathPlanner {
    bridges: BridgeFinder,
    signatures: Arc<SignatureCache>,
    config: PathConfig,
}

impl PathPlanner {
    pub fn new(bridges: BridgeFinder, signatures: Arc<SignatureCache>, config: PathConfig) -> Self {
        Self {
            bridges,
            signatures,
            config,
        }
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Build a path of at most `max_steps` steps (config default when None)
    ///
    /// `goal` is only used by bridge paths. A walk ends early when no unvisited
    /// bridge is left, so paths over a small corpus may be shorter.
    pub fn plan(
        &self,
        start: &Document,
        goal: Option<&Document>,
        path_type: PathType,
        max_steps: Option<usize>,
    ) -> FusionResult<LearningPath> {
        let max_steps = max_steps.unwrap_or(self.config.max_steps).max(1);
        let steps = match path_type {
            PathType::Spiral => self.spiral(start, max_steps)?,
            PathType::BreadthFirst => self.breadth_first(start, max_steps)?,
            PathType::Bridge => self.bridge(start, goal, max_steps)?,
            PathType::DepthFirst => depth_first(start, max_steps),
            PathType::Challenge => challenge(start, max_steps),
        };

        tracing::debug!(
            start = %start.id,
            path_type = path_type.key(),
            steps = steps.len(),
            "learning path planned"
        );
        let goal = goal.filter(|_| path_type == PathType::Bridge);
        Ok(assemble(path_type, start, goal, steps))
    }

    /// Cross-domain neighbours of `from`, best bridge first
    fn hop(&self, from: &Document, k: usize) -> FusionResult<Vec<Document>> {
        Ok(self
            .bridges
            .find_bridges(from, from.domain, k)?
            .into_iter()
            .map(|b| b.document)
            .collect())
    }

    /// First dynamics tag, else first raw tag
    fn facet(&self, doc: &Document) -> Option<String> {
        self.signatures
            .get(doc)
            .dynamics_tags
            .iter()
            .next()
            .cloned()
            .or_else(|| doc.tags.iter().next().cloned())
    }

    fn concept_questions(&self, doc: &Document) -> Vec<String> {
        let mut questions = vec![format!("What is the core idea of '{}'?", doc.title)];
        if let Some(facet) = self.facet(doc) {
            questions.push(format!("How does {} work in '{}'?", facet, doc.title));
        }
        questions
    }

    fn spiral(&self, start: &Document, max_steps: usize) -> FusionResult<Vec<PathStep>> {
        let mut steps: Vec<PathStep> = Vec::new();
        let mut visited = HashSet::new();
        let mut current = start.clone();

        for i in 0..max_steps {
            visited.insert(current.id.clone());
            let focus = if i < max_steps / 3 {
                "foundations"
            } else if i < 2 * max_steps / 3 {
                "connections and applications"
            } else {
                "synthesis"
            };
            let connections = steps
                .iter()
                .rev()
                .take(2)
                .rev()
                .map(|s| s.concept.title.clone())
                .collect();
            steps.push(PathStep {
                concept: GroundingRef::from(&current),
                focus: focus.to_string(),
                questions: self.concept_questions(&current),
                connections,
                checkpoint: format!("Can you state the core of '{}' in one sentence?", current.title),
                estimated_minutes: 15 + 5 * i as u32,
            });

            if i + 1 == max_steps {
                break;
            }
            match self
                .hop(&current, self.config.fanout)?
                .into_iter()
                .find(|d| !visited.contains(&d.id))
            {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(steps)
    }

    fn breadth_first(&self, start: &Document, max_steps: usize) -> FusionResult<Vec<PathStep>> {
        let mut steps = Vec::new();
        let mut visited = HashSet::new();
        let mut queue: VecDeque<(Document, Option<String>)> = VecDeque::new();
        queue.push_back((start.clone(), None));

        while let Some((doc, parent)) = queue.pop_front() {
            if steps.len() >= max_steps {
                break;
            }
            if !visited.insert(doc.id.clone()) {
                continue;
            }

            let mut questions = self.concept_questions(&doc);
            questions.truncate(1);
            steps.push(PathStep {
                concept: GroundingRef::from(&doc),
                focus: "core idea and its connections".to_string(),
                questions,
                connections: parent.into_iter().collect(),
                checkpoint: format!(
                    "Can you explain how '{}' connects to the concepts around it?",
                    doc.title
                ),
                estimated_minutes: 10,
            });

            if steps.len() < max_steps {
                for next in self.hop(&doc, self.config.fanout)? {
                    if !visited.contains(&next.id) {
                        queue.push_back((next, Some(doc.title.clone())));
                    }
                }
            }
        }
        Ok(steps)
    }

    /// Start, intermediates ranked by dynamics overlap with the goal, goal
    fn bridge(
        &self,
        start: &Document,
        goal: Option<&Document>,
        max_steps: usize,
    ) -> FusionResult<Vec<PathStep>> {
        let goal = goal.filter(|g| g.id != start.id);
        let mut first = self.concept_questions(start);
        first.truncate(1);
        let mut steps = vec![PathStep {
            concept: GroundingRef::from(start),
            focus: "starting point".to_string(),
            questions: first,
            connections: Vec::new(),
            checkpoint: format!("Have you grasped the core principle of '{}'?", start.title),
            estimated_minutes: 15,
        }];

        let reserved = if goal.is_some() { 2 } else { 1 };
        let budget = max_steps.saturating_sub(reserved);
        if budget > 0 {
            let mut candidates: Vec<Document> = self
                .hop(start, self.config.fanout.max(budget))?
                .into_iter()
                .filter(|d| goal.map_or(true, |g| d.id != g.id))
                .collect();

            if let Some(goal) = goal {
                let goal_tags = &self.signatures.get(goal).dynamics_tags;
                let mut ranked: Vec<(f32, Document)> = candidates
                    .into_iter()
                    .map(|d| (jaccard(&self.signatures.get(&d).dynamics_tags, goal_tags), d))
                    .collect();
                ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
                candidates = ranked.into_iter().map(|(_, d)| d).collect();
            }

            for doc in candidates.into_iter().take(budget) {
                let previous = steps
                    .last()
                    .map(|s| s.concept.title.clone())
                    .into_iter()
                    .collect();
                steps.push(PathStep {
                    concept: GroundingRef::from(&doc),
                    focus: format!("link with '{}'", start.title),
                    questions: vec![format!(
                        "How can '{}' be understood from the standpoint of '{}'?",
                        doc.title, start.title
                    )],
                    connections: previous,
                    checkpoint: format!(
                        "What do '{}' and '{}' have in common?",
                        start.title, doc.title
                    ),
                    estimated_minutes: 15,
                });
            }
        }

        if let Some(goal) = goal {
            if steps.len() < max_steps {
                let connections = steps.iter().map(|s| s.concept.title.clone()).collect();
                steps.push(PathStep {
                    concept: GroundingRef::from(goal),
                    focus: "arrival and integration".to_string(),
                    questions: vec![format!(
                        "Travelling from '{}' to '{}', what carried over and what changed?",
                        start.title, goal.title
                    )],
                    connections,
                    checkpoint: format!(
                        "Can you explain the conceptual route from '{}' to '{}'?",
                        start.title, goal.title
                    ),
                    estimated_minutes: 20,
                });
            }
        }
        Ok(steps)
    }
}

fn depth_first(start: &Document, max_steps: usize) -> Vec<PathStep> {
    DEPTH_LENSES
        .iter()
        .take(max_steps)
        .enumerate()
        .map(|(i, (focus, templates))| PathStep {
            concept: GroundingRef::from(start),
            focus: focus.to_string(),
            questions: templates
                .iter()
                .map(|t| t.replace("{concept}", &start.title))
                .collect(),
            connections: i
                .checked_sub(1)
                .map(|prev| DEPTH_LENSES[prev].0.to_string())
                .into_iter()
                .collect(),
            checkpoint: format!("Can you explain '{}' at the level of {}?", start.title, focus),
            estimated_minutes: 20,
        })
        .collect()
}

fn challenge(start: &Document, max_steps: usize) -> Vec<PathStep> {
    CHALLENGES
        .iter()
        .take(max_steps)
        .enumerate()
        .map(|(i, (focus, template))| PathStep {
            concept: GroundingRef::from(start),
            focus: focus.to_string(),
            questions: vec![template.replace("{concept}", &start.title)],
            connections: i
                .checked_sub(1)
                .map(|prev| CHALLENGES[prev].0.to_string())
                .into_iter()
                .collect(),
            checkpoint: format!("Can you give your own answer to the {}?", focus),
            estimated_minutes: 25,
        })
        .collect()
}

fn assemble(
    path_type: PathType,
    start: &Document,
    goal: Option<&Document>,
    steps: Vec<PathStep>,
) -> LearningPath {
    let domains_covered: BTreeSet<Domain> = steps.iter().map(|s| s.concept.domain).collect();
    let estimated_minutes = steps.iter().map(|s| s.estimated_minutes).sum();

    let mut titles: Vec<&str> = Vec::new();
    for step in &steps {
        if !titles.contains(&step.concept.title.as_str()) {
            titles.push(&step.concept.title);
        }
    }
    let closing = match path_type {
        PathType::DepthFirst => format!("Reach a deep understanding of '{}'", start.title),
        PathType::BreadthFirst => format!("Build a network of {} connected concepts", titles.len()),
        PathType::Bridge => "Practise thinking across disciplines".to_string(),
        PathType::Challenge => "Sharpen critical thinking and argument".to_string(),
        PathType::Spiral => "Complete a spiral of deepening understanding".to_string(),
    };
    let objectives = vec![
        format!(
            "Understand the core concepts: {}",
            titles.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        ),
        "Trace the links between them".to_string(),
        closing,
    ];

    LearningPath {
        path_type,
        title: format!("Exploring '{}' ({})", start.title, path_type.key()),
        description: format!(
            "{}. {} steps, about {} minutes.",
            path_type.description(),
            steps.len(),
            estimated_minutes
        ),
        start: GroundingRef::from(start),
        goal: goal.map(GroundingRef::from),
        steps,
        domains_covered: domains_covered.into_iter().collect(),
        objectives,
        estimated_minutes,
    }
}
