pub mod bridges;
pub mod challenge;
pub mod dialogue;
pub mod domains;
pub mod fuse;
pub mod init;
pub mod novelty;
pub mod path;
pub mod patterns;
pub mod search;
pub mod serve;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use polymath::{config, PolymathConfig, PolymathEngine};

/// Where the engine's config and corpus come from
#[derive(Debug, Clone, Default)]
pub struct EngineSource {
    /// Explicit config file (`--config`)
    pub config: Option<PathBuf>,
    /// Corpus file or directory overriding `[corpus] path` (`--corpus`)
    pub corpus: Option<PathBuf>,
}

impl EngineSource {
    pub fn load_config(&self, project_root: &Path) -> Result<PolymathConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_file(path)?,
            None => config::load(project_root)?,
        };
        if let Some(corpus) = &self.corpus {
            cfg.corpus.path = Some(corpus.clone());
        }
        Ok(cfg)
    }

    pub fn open(&self) -> Result<(PolymathEngine, PolymathConfig)> {
        let project_root = std::env::current_dir().context("Failed to read current directory")?;
        let cfg = self.load_config(&project_root)?;
        let engine = PolymathEngine::open(&project_root, &cfg)?;
        Ok((engine, cfg))
    }
}

/// First `max` characters of `text`, with an ellipsis when cut
pub(crate) fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}
