//! Static vocabulary tables for structural signatures
//!
//! Closed enums plus word lists. Only the antonym table can be extended
//! from configuration (`[lexicon] extra_antonyms`).

use serde::{Deserialize, Serialize};

/// Dynamics verb classes recognised as relation pivots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicsVerb {
    Causes,
    Balances,
    Amplifies,
    Constrains,
    Selects,
    EmergesFrom,
    Transforms,
}

impl DynamicsVerb {
    pub const ALL: [DynamicsVerb; 7] = [
        DynamicsVerb::Causes,
        DynamicsVerb::Balances,
        DynamicsVerb::Amplifies,
        DynamicsVerb::Constrains,
        DynamicsVerb::Selects,
        DynamicsVerb::EmergesFrom,
        DynamicsVerb::Transforms,
    ];

    pub fn surface_forms(&self) -> &'static [&'static str] {
        match self {
            DynamicsVerb::Causes => &[
                "causes", "cause", "caused", "drives", "drive", "drove", "produces", "produce",
                "produced", "triggers", "trigger", "triggered",
            ],
            DynamicsVerb::Balances => &[
                "balances", "balance", "balanced", "stabilizes", "stabilize", "stabilises",
                "stabilise", "offsets", "counteracts", "regulates", "regulate",
            ],
            DynamicsVerb::Amplifies => &[
                "amplifies", "amplify", "amplified", "reinforces", "reinforce", "magnifies",
                "accelerates", "accelerate",
            ],
            DynamicsVerb::Constrains => &[
                "constrains", "constrain", "constrained", "limits", "limit", "restricts",
                "restrict", "inhibits", "inhibit",
            ],
            DynamicsVerb::Selects => &[
                "selects", "select", "selected", "filters", "favors", "favours", "prunes",
            ],
            DynamicsVerb::EmergesFrom => {
                &["emerges", "emerge", "emerged", "arises", "arise", "arose"]
            }
            DynamicsVerb::Transforms => &[
                "transforms", "transform", "transformed", "converts", "convert", "converted",
            ],
        }
    }

    /// Dynamics tag implied by a relation with this pivot
    pub fn tag(&self) -> &'static str {
        match self {
            DynamicsVerb::Causes => "causation",
            DynamicsVerb::Balances => "equilibrium",
            DynamicsVerb::Amplifies => "feedback",
            DynamicsVerb::Constrains => "constraint",
            DynamicsVerb::Selects => "selection",
            DynamicsVerb::EmergesFrom => "emergence",
            DynamicsVerb::Transforms => "transformation",
        }
    }

    pub fn from_word(word: &str) -> Option<DynamicsVerb> {
        DynamicsVerb::ALL
            .into_iter()
            .find(|v| v.surface_forms().contains(&word))
    }
}

/// Abstract-process keywords: (surface form, canonical tag)
const DYNAMICS_KEYWORDS: &[(&str, &str)] = &[
    ("feedback", "feedback"),
    ("equilibrium", "equilibrium"),
    ("equilibria", "equilibrium"),
    ("selection", "selection"),
    ("disorder", "disorder"),
    ("order", "order"),
    ("emergence", "emergence"),
    ("emergent", "emergence"),
    ("adaptation", "adaptation"),
    ("adaptive", "adaptation"),
    ("competition", "competition"),
    ("competitive", "competition"),
    ("cooperation", "cooperation"),
    ("cooperative", "cooperation"),
    ("disruption", "disruption"),
    ("stability", "stability"),
    ("stable", "stability"),
    ("instability", "instability"),
    ("unstable", "instability"),
    ("change", "change"),
    ("growth", "growth"),
    ("decay", "decay"),
    ("diffusion", "diffusion"),
    ("oscillation", "oscillation"),
    ("self-organization", "self-organization"),
    ("homeostasis", "homeostasis"),
    ("causation", "causation"),
    ("constraint", "constraint"),
    ("transformation", "transformation"),
    ("amplification", "feedback"),
    ("symmetry", "symmetry"),
    ("conflict", "conflict"),
    ("consensus", "consensus"),
    ("tension", "tension"),
    ("complexity", "complexity"),
    ("optimization", "optimization"),
    ("chaos", "chaos"),
    ("chaotic", "chaos"),
    ("control", "control"),
    ("scarcity", "scarcity"),
    ("abundance", "abundance"),
    ("drift", "drift"),
];

/// Recorded oppositions, symmetric
const ANTONYMS: &[(&str, &str)] = &[
    ("equilibrium", "disruption"),
    ("homeostasis", "disruption"),
    ("order", "disorder"),
    ("order", "chaos"),
    ("control", "chaos"),
    ("stability", "instability"),
    ("stability", "change"),
    ("cooperation", "competition"),
    ("growth", "decay"),
    ("consensus", "conflict"),
    ("scarcity", "abundance"),
    ("selection", "drift"),
];

const MACRO_WORDS: &[&str] = &[
    "universe", "cosmos", "cosmic", "galaxy", "galaxies", "planet", "planetary", "global",
    "civilization", "civilisation", "society", "societies", "nation", "nations", "economy",
    "ecosystem", "ecosystems", "biosphere", "macro", "macroscopic", "world",
];

const MICRO_WORDS: &[&str] = &[
    "individual", "individuals", "cell", "cells", "molecule", "molecules", "molecular", "atom",
    "atoms", "atomic", "particle", "particles", "neuron", "neurons", "gene", "genes", "micro",
    "microscopic",
];

const MESO_WORDS: &[&str] = &[
    "population", "populations", "community", "communities", "organization", "organizations",
    "group", "groups", "system", "systems", "network", "networks", "institution",
    "institutions", "firm", "firms", "organism", "organisms", "market", "markets",
];

const SHORT_TIME_WORDS: &[&str] = &[
    "instant", "instantly", "instantaneous", "moment", "momentary", "second", "seconds",
    "minute", "minutes", "hour", "hours", "daily", "day", "days", "immediate", "immediately",
    "rapid", "reaction", "reflex", "transient", "short-term",
];

const LONG_TIME_WORDS: &[&str] = &[
    "century", "centuries", "millennia", "millennium", "generation", "generations",
    "evolutionary", "geological", "era", "eras", "epoch", "epochs", "eon", "eons", "long-term",
    "historical", "decades", "ages", "lineage",
];

/// Scale level of a document's subject matter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleLevel {
    Micro,
    Meso,
    Macro,
    #[default]
    Unspecified,
}

impl ScaleLevel {
    /// Position on the micro–macro axis, None when unspecified
    pub fn rank(&self) -> Option<u8> {
        match self {
            ScaleLevel::Micro => Some(0),
            ScaleLevel::Meso => Some(1),
            ScaleLevel::Macro => Some(2),
            ScaleLevel::Unspecified => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScaleLevel::Micro => "micro",
            ScaleLevel::Meso => "meso",
            ScaleLevel::Macro => "macro",
            ScaleLevel::Unspecified => "unspecified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timescale {
    Short,
    Long,
}

/// Vocabulary used by the extractor and the pattern rules
#[derive(Debug, Clone)]
pub struct Lexicon {
    antonyms: Vec<(String, String)>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            antonyms: ANTONYMS
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }
}

impl Lexicon {
    /// Default tables plus extra antonym pairs from configuration
    pub fn with_extra_antonyms(extra: &[(String, String)]) -> Self {
        let mut lexicon = Self::default();
        for (a, b) in extra {
            let pair = (a.trim().to_lowercase(), b.trim().to_lowercase());
            if !pair.0.is_empty() && !pair.1.is_empty() && !lexicon.antonyms.contains(&pair) {
                lexicon.antonyms.push(pair);
            }
        }
        lexicon
    }

    /// Canonical dynamics tag for a word, if it is a process keyword
    pub fn dynamics_tag(&self, word: &str) -> Option<&'static str> {
        DYNAMICS_KEYWORDS
            .iter()
            .find(|(surface, _)| *surface == word)
            .map(|(_, tag)| *tag)
    }

    /// Every recorded opposite of `tag`
    pub fn opposites_of<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.antonyms.iter().filter_map(move |(a, b)| {
            if a == tag {
                Some(b.as_str())
            } else if b == tag {
                Some(a.as_str())
            } else {
                None
            }
        })
    }

    pub fn are_opposed(&self, a: &str, b: &str) -> bool {
        self.opposites_of(a).any(|o| o == b)
    }

    pub fn has_opposite(&self, tag: &str) -> bool {
        self.opposites_of(tag).next().is_some()
    }

    pub fn scale_of_word(&self, word: &str) -> ScaleLevel {
        if MACRO_WORDS.contains(&word) {
            ScaleLevel::Macro
        } else if MICRO_WORDS.contains(&word) {
            ScaleLevel::Micro
        } else if MESO_WORDS.contains(&word) {
            ScaleLevel::Meso
        } else {
            ScaleLevel::Unspecified
        }
    }

    pub fn timescale_of_word(&self, word: &str) -> Option<Timescale> {
        if SHORT_TIME_WORDS.contains(&word) {
            Some(Timescale::Short)
        } else if LONG_TIME_WORDS.contains(&word) {
            Some(Timescale::Long)
        } else {
            None
        }
    }
}
