//! Internal implementation for config module
//!
//! Handles .polymath/config.toml - engine tuning and corpus location.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dialogue::DialogueConfig;
use crate::fusion::FusionConfig;
use crate::learning::PathConfig;
use crate::retrieval::RetrievalConfig;

// =============================================================================
// Config Types - Unified Schema
// =============================================================================

/// Engine configuration stored in .polymath/config.toml
/// All sections are optional with defaults, so a partial file is valid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolymathConfig {
    #[serde(default)]
    pub corpus: CorpusSection,
    #[serde(default)]
    pub retrieval: RetrievalSection,
    #[serde(default)]
    pub fusion: FusionSection,
    #[serde(default)]
    pub dialogue: DialogueSection,
    #[serde(default)]
    pub learning: LearningSection,
    #[serde(default)]
    pub lexicon: LexiconSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusSection {
    /// Corpus file or directory, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Hashing embedder dimension for documents without vectors
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
}

fn default_embedding_dim() -> usize {
    256
}

impl Default for CorpusSection {
    fn default() -> Self {
        Self {
            path: None,
            embedding_dim: default_embedding_dim(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSection {
    /// Weight of embedding cosine in the bridge hybrid score
    #[serde(default = "default_weight")]
    pub embedding_weight: f32,
    /// Weight of dynamics-tag overlap in the bridge hybrid score
    #[serde(default = "default_weight")]
    pub structural_weight: f32,
    /// Candidates fetched per requested bridge before re-ranking
    #[serde(default = "default_over_fetch")]
    pub over_fetch_factor: usize,
    /// Result count when a caller does not give one
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_weight() -> f32 {
    1.0
}
fn default_over_fetch() -> usize {
    4
}
fn default_limit() -> usize {
    10
}

impl Default for RetrievalSection {
    fn default() -> Self {
        Self {
            embedding_weight: default_weight(),
            structural_weight: default_weight(),
            over_fetch_factor: default_over_fetch(),
            default_limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionSection {
    #[serde(default = "default_band_center")]
    pub band_center: f32,
    #[serde(default = "default_band_half_width")]
    pub band_half_width: f32,
    #[serde(default = "default_isomorphism_threshold")]
    pub isomorphism_threshold: f32,
    #[serde(default = "default_boundary_min")]
    pub boundary_min_domains: usize,
    #[serde(default = "default_boundary_saturation")]
    pub boundary_saturation_domains: usize,
    #[serde(default = "default_reachability_limit")]
    pub reachability_limit: usize,
}

fn default_band_center() -> f32 {
    0.5
}
fn default_band_half_width() -> f32 {
    0.5
}
fn default_isomorphism_threshold() -> f32 {
    0.2
}
fn default_boundary_min() -> usize {
    3
}
fn default_boundary_saturation() -> usize {
    6
}
fn default_reachability_limit() -> usize {
    10
}

impl Default for FusionSection {
    fn default() -> Self {
        Self {
            band_center: default_band_center(),
            band_half_width: default_band_half_width(),
            isomorphism_threshold: default_isomorphism_threshold(),
            boundary_min_domains: default_boundary_min(),
            boundary_saturation_domains: default_boundary_saturation(),
            reachability_limit: default_reachability_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueSection {
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default = "default_viewpoint_count")]
    pub viewpoint_count: usize,
    #[serde(default = "default_challenge_fetch")]
    pub challenge_fetch: usize,
    /// Sessions untouched for this long are dropped by the server
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_max_depth() -> u32 {
    12
}
fn default_viewpoint_count() -> usize {
    3
}
fn default_challenge_fetch() -> usize {
    8
}
fn default_idle_timeout() -> u64 {
    1800
}

impl Default for DialogueSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            viewpoint_count: default_viewpoint_count(),
            challenge_fetch: default_challenge_fetch(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningSection {
    /// Steps in a learning path when the caller does not give a count
    #[serde(default = "default_path_steps")]
    pub max_steps: usize,
    /// Bridges considered at each hop of a path walk
    #[serde(default = "default_path_fanout")]
    pub fanout: usize,
}

fn default_path_steps() -> usize {
    7
}
fn default_path_fanout() -> usize {
    3
}

impl Default for LearningSection {
    fn default() -> Self {
        Self {
            max_steps: default_path_steps(),
            fanout: default_path_fanout(),
        }
    }
}

/// Additions to the built-in premise markers and antonym pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconSection {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_premise_markers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_antonyms: Vec<(String, String)>,
}

// =============================================================================
// Conversions into runtime configs
// =============================================================================

impl From<&RetrievalSection> for RetrievalConfig {
    fn from(section: &RetrievalSection) -> Self {
        RetrievalConfig {
            embedding_weight: section.embedding_weight,
            structural_weight: section.structural_weight,
            over_fetch_factor: section.over_fetch_factor.max(1),
        }
    }
}

impl From<&FusionSection> for FusionConfig {
    fn from(section: &FusionSection) -> Self {
        FusionConfig {
            band_center: section.band_center,
            band_half_width: section.band_half_width,
            isomorphism_threshold: section.isomorphism_threshold,
            boundary_min_domains: section.boundary_min_domains,
            boundary_saturation_domains: section
                .boundary_saturation_domains
                .max(section.boundary_min_domains),
            reachability_limit: section.reachability_limit,
        }
    }
}

impl From<&DialogueSection> for DialogueConfig {
    fn from(section: &DialogueSection) -> Self {
        DialogueConfig {
            max_depth: section.max_depth.max(1),
            viewpoint_count: section.viewpoint_count,
            challenge_fetch: section.challenge_fetch,
        }
    }
}

impl From<&LearningSection> for PathConfig {
    fn from(section: &LearningSection) -> Self {
        PathConfig {
            max_steps: section.max_steps.max(1),
            fanout: section.fanout.max(1),
        }
    }
}

// =============================================================================
// Path Functions
// =============================================================================

/// Get the .polymath directory for a project
pub fn polymath_dir(project_path: &Path) -> PathBuf {
    project_path.join(".polymath")
}

/// Get the config file path for a project
pub fn config_path(project_path: &Path) -> PathBuf {
    polymath_dir(project_path).join("config.toml")
}

// =============================================================================
// Config Load/Save
// =============================================================================

/// Load config from an explicit file. Missing file gives defaults.
pub fn load_file(path: &Path) -> Result<PolymathConfig> {
    if !path.exists() {
        return Ok(PolymathConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;

    toml::from_str(&contents).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Load config from .polymath/config.toml
pub fn load(project_path: &Path) -> Result<PolymathConfig> {
    load_file(&config_path(project_path))
}

/// Save config to .polymath/config.toml
pub fn save(project_path: &Path, config: &PolymathConfig) -> Result<()> {
    let path = config_path(project_path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(&path, contents)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PolymathConfig::default();
        assert_eq!(config.corpus.embedding_dim, 256);
        assert_eq!(config.retrieval.over_fetch_factor, 4);
        assert_eq!(config.retrieval.default_limit, 10);
        assert_eq!(config.fusion.boundary_min_domains, 3);
        assert_eq!(config.dialogue.max_depth, 12);
        assert_eq!(config.dialogue.idle_timeout_secs, 1800);
        assert_eq!(config.learning.max_steps, 7);
        assert_eq!(config.learning.fanout, 3);
        assert!(config.lexicon.extra_antonyms.is_empty());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(temp.path()).unwrap();
        assert_eq!(config, PolymathConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let toml_str = r#"
[fusion]
isomorphism_threshold = 0.3

[lexicon]
extra_antonyms = [["centralization", "decentralization"]]
"#;
        let config: PolymathConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.fusion.isomorphism_threshold, 0.3);
        assert_eq!(config.fusion.band_center, 0.5);
        assert_eq!(config.dialogue.max_depth, 12);
        assert_eq!(
            config.lexicon.extra_antonyms,
            vec![("centralization".to_string(), "decentralization".to_string())]
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let mut config = PolymathConfig::default();
        config.corpus.path = Some(PathBuf::from("corpus"));
        config.dialogue.max_depth = 5;
        config.lexicon.extra_premise_markers = vec!["surely".into()];

        save(temp.path(), &config).unwrap();
        assert!(config_path(temp.path()).exists());

        let loaded = load(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = config_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[fusion\nband_center = ").unwrap();
        assert!(load(temp.path()).is_err());
    }

    #[test]
    fn test_section_conversions_clamp() {
        let fusion = FusionSection {
            boundary_min_domains: 4,
            boundary_saturation_domains: 2,
            ..Default::default()
        };
        let config = FusionConfig::from(&fusion);
        assert_eq!(config.boundary_saturation_domains, 4);

        let dialogue = DialogueSection {
            max_depth: 0,
            ..Default::default()
        };
        assert_eq!(DialogueConfig::from(&dialogue).max_depth, 1);

        let learning = LearningSection {
            max_steps: 0,
            fanout: 0,
        };
        let path = PathConfig::from(&learning);
        assert_eq!((path.max_steps, path.fanout), (1, 1));
    }
}
