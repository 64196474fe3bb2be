//! Configuration loading from senserank.toml.
//!
//! Looked up in the working directory first, then in each parent, the same
//! way ruff finds its config. Keys are kebab-case and any key left out keeps
//! its default.
//!
//! ## Example
//!
//! ```toml
//! damping-factor = 0.85
//! convergence-limit = 0.01
//! walk-start = "every-sense"
//! degenerate-neighbor = "fail"
//! seed = 42
//! ```

use std::path::{Path, PathBuf};

use crate::error::{RankError, RankResult};
use crate::types::RankingConfig;

pub const CONFIG_FILE: &str = "senserank.toml";

/// Senserank configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source file for this config (for display).
    pub source: Option<PathBuf>,

    pub ranking: RankingConfig,
}

impl Config {
    /// Load configuration for the given directory.
    ///
    /// Search order:
    /// 1. senserank.toml in directory
    /// 2. Walk up to find senserank.toml
    /// 3. Default config if nothing found
    pub fn load(directory: &Path) -> RankResult<Self> {
        let mut current = Some(directory);
        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::load_file(&candidate);
            }
            current = dir.parent();
        }
        Ok(Self::default())
    }

    /// Load an explicit config file. Missing or malformed files are errors.
    pub fn load_file(path: &Path) -> RankResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RankError::Config(format!("{}: {}", path.display(), e)))?;
        let ranking: RankingConfig = toml::from_str(&content)
            .map_err(|e| RankError::Config(format!("{}: {}", path.display(), e)))?;
        ranking.validate()?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            ranking,
        })
    }

    /// Format config for verbose display.
    pub fn display_summary(&self) -> String {
        let mut lines = Vec::new();

        if let Some(ref source) = self.source {
            lines.push(format!("   Config: {}", source.display()));
        } else {
            lines.push("   Config: (defaults)".to_string());
        }

        let r = &self.ranking;
        lines.push(format!(
            "   Damping: {}  Convergence: {:.4} / {}",
            r.damping_factor, r.convergence_damper, r.convergence_limit
        ));
        lines.push(format!(
            "   Walks: {:?}, cap {} steps, degenerate neighbors: {:?}",
            r.walk_start, r.max_walk_steps, r.degenerate_neighbor
        ));
        if let Some(seed) = r.seed {
            lines.push(format!("   Seed: {}", seed));
        }

        lines.join("\n")
    }
}
