use clap::ValueEnum;
use deckshred_chunker::ChunkingStrategy;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum StrategyFlag {
    Instructional,
    ModuleBased,
    Sequential,
}

impl StrategyFlag {
    pub(crate) const fn as_domain(self) -> ChunkingStrategy {
        match self {
            StrategyFlag::Instructional => ChunkingStrategy::Instructional,
            StrategyFlag::ModuleBased => ChunkingStrategy::ModuleBased,
            StrategyFlag::Sequential => ChunkingStrategy::Sequential,
        }
    }

    /// Parse the config-file spelling of a strategy.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name {
            "instructional" => Some(StrategyFlag::Instructional),
            "module-based" => Some(StrategyFlag::ModuleBased),
            "sequential" => Some(StrategyFlag::Sequential),
            _ => None,
        }
    }
}
