use crate::error::{CatError, Result};
use crate::filter::CommentMode;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// User defaults read from `config.toml` in the platform config directory.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// File-name suffixes picked up when expanding a directory
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Used when `--comments` is not given
    #[serde(default)]
    pub comments: CommentMode,
}

fn default_extensions() -> Vec<String> {
    [
        ".fastq", ".fastq.gz", ".fasta", ".fasta.gz", ".fa", ".fa.gz", ".fq", ".fq.gz",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

fn default_read_buffer_size() -> usize {
    1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            read_buffer_size: default_read_buffer_size(),
            comments: CommentMode::default(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("org", "catfishq", "catfishq") {
            let config_path = proj_dirs.config_dir().join("config.toml");

            if config_path.exists() {
                match Self::from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring configuration: {}", e),
                }
            }
        }
        Config::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CatError::io(path, e))?;
        let config: Config = toml::from_str(&content).map_err(|e| CatError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if config.read_buffer_size == 0 {
            return Err(CatError::Config {
                path: path.to_path_buf(),
                reason: "read_buffer_size must be positive".to_string(),
            });
        }
        Ok(config)
    }
}
