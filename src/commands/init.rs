//! Init command - write a starter .polymath/config.toml

use anyhow::{bail, Result};
use colored::*;
use std::path::{Path, PathBuf};

use polymath::{config, PolymathConfig};

pub fn execute(project_root: &Path, corpus: Option<PathBuf>, force: bool) -> Result<()> {
    let path = config::config_path(project_root);
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut cfg = PolymathConfig::default();
    cfg.corpus.path = corpus;
    config::save(project_root, &cfg)?;

    println!("{} {}", "✓ Wrote".green(), path.display());
    if cfg.corpus.path.is_none() {
        println!(
            "  {}",
            "Set [corpus] path before running search or serve".bright_black()
        );
    }
    Ok(())
}
