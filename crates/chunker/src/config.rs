use serde::{Deserialize, Serialize};

use crate::error::{ChunkerError, Result};

/// Configuration for slide chunking behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Grouping strategy to use.
    pub strategy: ChunkingStrategy,

    /// Token budget per chunk (hard limit for `sequential`, early-break
    /// trigger for `instructional`).
    pub max_chunk_tokens: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::Instructional,
            max_chunk_tokens: 1500,
        }
    }
}

impl ChunkerConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_tokens == 0 {
            return Err(ChunkerError::invalid_config("max_chunk_tokens must be > 0"));
        }
        Ok(())
    }
}

/// Strategy for grouping slides into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkingStrategy {
    /// Split at module-start slides, with a token-budget early break at
    /// activity transitions. The default.
    Instructional,

    /// Split only at module-start slides; no budget enforcement.
    ModuleBased,

    /// Purely token-budget driven accumulation.
    Sequential,
}

impl ChunkingStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instructional => "instructional",
            Self::ModuleBased => "module-based",
            Self::Sequential => "sequential",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        assert!(ChunkerConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_budget_rejected() {
        let config = ChunkerConfig {
            max_chunk_tokens: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn strategy_serializes_kebab_case() {
        let json = serde_json::to_string(&ChunkingStrategy::ModuleBased).unwrap();
        assert_eq!(json, "\"module-based\"");
        assert_eq!(ChunkingStrategy::ModuleBased.as_str(), "module-based");
    }
}
