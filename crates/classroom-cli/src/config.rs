//! classroom configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level classroom configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassroomConfig {
    /// Directory holding the score and student snapshots.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Leaderboard snapshot, relative to `data_dir`.
    #[serde(default = "default_scores_file")]
    pub scores_file: PathBuf,
    /// Student snapshot, relative to `data_dir`.
    #[serde(default = "default_students_file")]
    pub students_file: PathBuf,
    /// TOML question bank. The built-in bank is used when unset.
    #[serde(default)]
    pub questions_file: Option<PathBuf>,
    /// Write the GPA-sorted order back to storage.
    #[serde(default)]
    pub persist_sort: bool,
    /// Rows shown by `classroom leaderboard` when `--limit` is not given.
    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_scores_file() -> PathBuf {
    PathBuf::from("quiz_scores.json")
}
fn default_students_file() -> PathBuf {
    PathBuf::from("students.json")
}
fn default_leaderboard_limit() -> usize {
    10
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            scores_file: default_scores_file(),
            students_file: default_students_file(),
            questions_file: None,
            persist_sort: false,
            leaderboard_limit: default_leaderboard_limit(),
        }
    }
}

impl ClassroomConfig {
    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join(&self.scores_file)
    }

    pub fn students_path(&self) -> PathBuf {
        self.data_dir.join(&self.students_file)
    }

    /// Make relative paths relative to the directory the config was read from.
    fn anchor_to(&mut self, base: &Path) {
        if self.data_dir.is_relative() {
            self.data_dir = base.join(&self.data_dir);
        }
        if let Some(questions) = &self.questions_file {
            if questions.is_relative() {
                self.questions_file = Some(base.join(questions));
            }
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `classroom.toml` in the current directory
/// 2. `~/.config/classroom/config.toml`
///
/// `CLASSROOM_DATA_DIR` overrides `data_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<ClassroomConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("classroom.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = toml::from_str::<ClassroomConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            if let Some(base) = path.parent() {
                config.anchor_to(base);
            }
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => ClassroomConfig::default(),
    };

    if let Ok(dir) = std::env::var("CLASSROOM_DATA_DIR") {
        if !dir.trim().is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    anyhow::ensure!(
        config.leaderboard_limit >= 1,
        "leaderboard_limit must be at least 1"
    );

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("classroom"))
}
