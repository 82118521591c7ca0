//! Config module - engine configuration
//!
//! Manages `.polymath/config.toml`: corpus location plus every numeric knob
//! of retrieval, fusion scoring, dialogue policy and learning paths, and
//! lexicon additions.
//!
//! # Example
//!
//! ```no_run
//! use polymath::config;
//! use std::path::Path;
//!
//! let mut cfg = config::load(Path::new("."))?;
//! cfg.fusion.isomorphism_threshold = 0.25;
//! config::save(Path::new("."), &cfg)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use internal::{
    CorpusSection, DialogueSection, FusionSection, LearningSection, LexiconSection,
    PolymathConfig, RetrievalSection,
};

/// Load config from `.polymath/config.toml`
///
/// Returns default config if the file doesn't exist.
pub fn load(project_path: &Path) -> Result<PolymathConfig> {
    internal::load(project_path)
}

/// Load config from an explicit path (the `--config` flag)
pub fn load_file(path: &Path) -> Result<PolymathConfig> {
    internal::load_file(path)
}

/// Save config to `.polymath/config.toml`
///
/// Creates `.polymath/` if it doesn't exist.
pub fn save(project_path: &Path, config: &PolymathConfig) -> Result<()> {
    internal::save(project_path, config)
}

pub fn polymath_dir(project_path: &Path) -> PathBuf {
    internal::polymath_dir(project_path)
}

pub fn config_path(project_path: &Path) -> PathBuf {
    internal::config_path(project_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path() {
        let path = config_path(Path::new("/some/project"));
        assert!(path.ends_with(".polymath/config.toml"));
    }
}
