use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional TOML configuration file, overridden field by field by CLI
/// flags.
///
/// ```toml
/// strategy = "instructional"
/// chunk_size = 1500
/// output_dir = "output"
/// annotate_url = "http://localhost:8080/annotate"
/// annotate_timeout_secs = 20
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub strategy: Option<String>,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub annotate_url: Option<String>,

    #[serde(default = "default_annotate_timeout")]
    pub annotate_timeout_secs: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            strategy: None,
            chunk_size: default_chunk_size(),
            output_dir: default_output_dir(),
            annotate_url: None,
            annotate_timeout_secs: default_annotate_timeout(),
        }
    }
}

const fn default_chunk_size() -> usize {
    1500
}

fn default_output_dir() -> String {
    "output".to_string()
}

const fn default_annotate_timeout() -> u64 {
    20
}

impl FileConfig {
    /// Load a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }
}
