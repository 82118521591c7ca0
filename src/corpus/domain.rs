//! Academic domain catalogue
//!
//! Every document carries exactly one of these 30 domain tags. The set is
//! fixed; corpora using other labels must map onto it at ingestion time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Broad grouping used when listing domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainCategory {
    Humanities,
    NaturalScience,
    FormalScience,
    SocialScience,
    AppliedScience,
    Interdisciplinary,
}

impl DomainCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DomainCategory::Humanities => "humanities",
            DomainCategory::NaturalScience => "natural science",
            DomainCategory::FormalScience => "formal science",
            DomainCategory::SocialScience => "social science",
            DomainCategory::AppliedScience => "applied science",
            DomainCategory::Interdisciplinary => "interdisciplinary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Philosophy,
    Physics,
    Mathematics,
    Economics,
    Biology,
    Psychology,
    ComputerScience,
    Neuroscience,
    Sociology,
    Linguistics,
    History,
    Chemistry,
    Ecology,
    Anthropology,
    PoliticalScience,
    Law,
    Engineering,
    Medicine,
    InformationTheory,
    GameTheory,
    ComplexSystems,
    CognitiveScience,
    NetworkScience,
    Thermodynamics,
    QuantumMechanics,
    Statistics,
    Logic,
    ArtHistory,
    MusicTheory,
    Literature,
}

impl Domain {
    pub const ALL: [Domain; 30] = [
        Domain::Philosophy,
        Domain::Physics,
        Domain::Mathematics,
        Domain::Economics,
        Domain::Biology,
        Domain::Psychology,
        Domain::ComputerScience,
        Domain::Neuroscience,
        Domain::Sociology,
        Domain::Linguistics,
        Domain::History,
        Domain::Chemistry,
        Domain::Ecology,
        Domain::Anthropology,
        Domain::PoliticalScience,
        Domain::Law,
        Domain::Engineering,
        Domain::Medicine,
        Domain::InformationTheory,
        Domain::GameTheory,
        Domain::ComplexSystems,
        Domain::CognitiveScience,
        Domain::NetworkScience,
        Domain::Thermodynamics,
        Domain::QuantumMechanics,
        Domain::Statistics,
        Domain::Logic,
        Domain::ArtHistory,
        Domain::MusicTheory,
        Domain::Literature,
    ];

    /// Stable snake_case identifier (matches the serde representation)
    pub fn id(&self) -> &'static str {
        match self {
            Domain::Philosophy => "philosophy",
            Domain::Physics => "physics",
            Domain::Mathematics => "mathematics",
            Domain::Economics => "economics",
            Domain::Biology => "biology",
            Domain::Psychology => "psychology",
            Domain::ComputerScience => "computer_science",
            Domain::Neuroscience => "neuroscience",
            Domain::Sociology => "sociology",
            Domain::Linguistics => "linguistics",
            Domain::History => "history",
            Domain::Chemistry => "chemistry",
            Domain::Ecology => "ecology",
            Domain::Anthropology => "anthropology",
            Domain::PoliticalScience => "political_science",
            Domain::Law => "law",
            Domain::Engineering => "engineering",
            Domain::Medicine => "medicine",
            Domain::InformationTheory => "information_theory",
            Domain::GameTheory => "game_theory",
            Domain::ComplexSystems => "complex_systems",
            Domain::CognitiveScience => "cognitive_science",
            Domain::NetworkScience => "network_science",
            Domain::Thermodynamics => "thermodynamics",
            Domain::QuantumMechanics => "quantum_mechanics",
            Domain::Statistics => "statistics",
            Domain::Logic => "logic",
            Domain::ArtHistory => "art_history",
            Domain::MusicTheory => "music_theory",
            Domain::Literature => "literature",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Philosophy => "Philosophy",
            Domain::Physics => "Physics",
            Domain::Mathematics => "Mathematics",
            Domain::Economics => "Economics",
            Domain::Biology => "Biology",
            Domain::Psychology => "Psychology",
            Domain::ComputerScience => "Computer Science",
            Domain::Neuroscience => "Neuroscience",
            Domain::Sociology => "Sociology",
            Domain::Linguistics => "Linguistics",
            Domain::History => "History",
            Domain::Chemistry => "Chemistry",
            Domain::Ecology => "Ecology",
            Domain::Anthropology => "Anthropology",
            Domain::PoliticalScience => "Political Science",
            Domain::Law => "Law",
            Domain::Engineering => "Engineering",
            Domain::Medicine => "Medicine",
            Domain::InformationTheory => "Information Theory",
            Domain::GameTheory => "Game Theory",
            Domain::ComplexSystems => "Complex Systems",
            Domain::CognitiveScience => "Cognitive Science",
            Domain::NetworkScience => "Network Science",
            Domain::Thermodynamics => "Thermodynamics",
            Domain::QuantumMechanics => "Quantum Mechanics",
            Domain::Statistics => "Statistics",
            Domain::Logic => "Logic",
            Domain::ArtHistory => "Art History",
            Domain::MusicTheory => "Music Theory",
            Domain::Literature => "Literature",
        }
    }

    pub fn category(&self) -> DomainCategory {
        use Domain::*;
        match self {
            Philosophy | Linguistics | History | ArtHistory | MusicTheory | Literature => {
                DomainCategory::Humanities
            }
            Physics | Biology | Neuroscience | Chemistry | Ecology | Thermodynamics
            | QuantumMechanics => DomainCategory::NaturalScience,
            Mathematics | ComputerScience | InformationTheory | GameTheory | Statistics
            | Logic => DomainCategory::FormalScience,
            Economics | Psychology | Sociology | Anthropology | PoliticalScience | Law => {
                DomainCategory::SocialScience
            }
            Engineering | Medicine => DomainCategory::AppliedScience,
            ComplexSystems | CognitiveScience | NetworkScience => {
                DomainCategory::Interdisciplinary
            }
        }
    }

    /// Lenient parse: accepts ids, display names, and a few common short forms
    ///
    /// "Computer Science", "computer-science" and "cs" all resolve to
    /// `ComputerScience`.
    pub fn parse(input: &str) -> Option<Domain> {
        let normalized: String = input
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();

        if let Some(domain) = Domain::ALL.iter().find(|d| d.id() == normalized) {
            return Some(*domain);
        }

        let alias = match normalized.as_str() {
            "cs" | "computing" => Domain::ComputerScience,
            "math" | "maths" => Domain::Mathematics,
            "econ" | "economy" => Domain::Economics,
            "bio" => Domain::Biology,
            "neuro" => Domain::Neuroscience,
            "psych" => Domain::Psychology,
            "stats" => Domain::Statistics,
            "politics" => Domain::PoliticalScience,
            "music" => Domain::MusicTheory,
            "art" => Domain::ArtHistory,
            "complexity" => Domain::ComplexSystems,
            "networks" => Domain::NetworkScience,
            "quantum" => Domain::QuantumMechanics,
            _ => return None,
        };
        Some(alias)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Domain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::parse(s).ok_or_else(|| anyhow::anyhow!("Unknown domain: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_has_thirty_unique_ids() {
        let ids: HashSet<_> = Domain::ALL.iter().map(|d| d.id()).collect();
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(Domain::parse("physics"), Some(Domain::Physics));
        assert_eq!(Domain::parse("Computer Science"), Some(Domain::ComputerScience));
        assert_eq!(Domain::parse("game-theory"), Some(Domain::GameTheory));
        assert_eq!(Domain::parse("cs"), Some(Domain::ComputerScience));
        assert_eq!(Domain::parse("astrology"), None);
    }

    #[test]
    fn test_serde_matches_id() {
        for domain in Domain::ALL {
            let json = serde_json::to_string(&domain).unwrap();
            assert_eq!(json, format!("\"{}\"", domain.id()));
        }
    }

    #[test]
    fn test_category() {
        assert_eq!(Domain::Ecology.category(), DomainCategory::NaturalScience);
        assert_eq!(Domain::Law.category(), DomainCategory::SocialScience);
        assert_eq!(Domain::NetworkScience.category(), DomainCategory::Interdisciplinary);
    }
}
