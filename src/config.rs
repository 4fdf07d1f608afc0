use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Messages carrying this tag are verbatim context dumps, not discrete
/// utterances, and are excluded from longest-message views.
pub const DEFAULT_RAW_HISTORY_TAG: &str = "[Lyra Raw History]";

/// App configuration, loaded from a YAML file by the shell.
///
/// All fields have defaults so a missing or partial config file still
/// yields a usable setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folder scanned (non-recursively) for `.txt` transcripts.
    pub transcripts_dir: PathBuf,
    /// On-disk SQLite database path. Ingestion into an in-memory store
    /// snapshots here when the batch completes.
    pub database_path: PathBuf,
    /// Tag marking raw-history dumps, excluded from longest-message views.
    pub raw_history_tag: String,
    /// Default number of rows for top-phrase queries.
    pub default_top_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transcripts_dir: PathBuf::from("transcripts"),
            database_path: PathBuf::from("lyra_transcripts.db"),
            raw_history_tag: DEFAULT_RAW_HISTORY_TAG.to_string(),
            default_top_limit: 50,
        }
    }
}

impl AppConfig {
    /// Load config from a YAML file. A missing file yields the defaults;
    /// a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
