use std::collections::BTreeMap;

use deckshred_chunker::{ChunkerConfig, ChunkingStrategy, ModuleChunker, TokenEstimator};
use deckshred_model::SlideRecord;

use crate::aggregate::{ActivitySelection, AggregateOptions, ChunkBuilder};
use crate::chunk::{finalize, Chunk};
use crate::error::Result;
use crate::filename::sanitize_filename;
use crate::render::render;

/// Formatter configuration.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    pub strategy: ChunkingStrategy,
    /// Token budget per chunk.
    pub chunk_size: usize,
    pub activity_selection: ActivitySelection,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            strategy: ChunkingStrategy::Instructional,
            chunk_size: 1500,
            activity_selection: ActivitySelection::FirstPresent,
        }
    }
}

/// Formats annotated slides into markdown documents.
///
/// One formatter instance per presentation pass; the tokenizer and
/// aggregation options are fixed at construction and injected explicitly
/// (no ambient globals).
pub struct MarkdownFormatter {
    chunker: ModuleChunker,
    builder: ChunkBuilder,
}

impl MarkdownFormatter {
    #[must_use]
    pub fn new(options: FormatOptions) -> Self {
        let chunker = ModuleChunker::new(ChunkerConfig {
            strategy: options.strategy,
            max_chunk_tokens: options.chunk_size,
        });
        Self {
            chunker,
            builder: ChunkBuilder::new(AggregateOptions {
                activity_selection: options.activity_selection,
            }),
        }
    }

    /// Use a precise token estimator instead of the character ratio.
    #[must_use]
    pub fn with_estimator(options: FormatOptions, estimator: Box<dyn TokenEstimator>) -> Self {
        let chunker = ModuleChunker::with_estimator(
            ChunkerConfig {
                strategy: options.strategy,
                max_chunk_tokens: options.chunk_size,
            },
            estimator,
        );
        Self {
            chunker,
            builder: ChunkBuilder::new(AggregateOptions {
                activity_selection: options.activity_selection,
            }),
        }
    }

    /// Chunk, aggregate, finalize, and render a whole presentation.
    ///
    /// Returns a mapping from sanitized filename
    /// (`{presentation_name}_{module_id}.md`) to document text, in chunk
    /// order (module ids embed the sequence number, so the sorted map
    /// order matches chunk order). An empty slide sequence yields an
    /// empty map.
    pub fn format(
        &self,
        slides: Vec<SlideRecord>,
        presentation_name: &str,
    ) -> Result<BTreeMap<String, String>> {
        let chunks = self.chunk(slides)?;

        let mut documents = BTreeMap::new();
        for chunk in &chunks {
            let filename = sanitize_filename(&format!("{presentation_name}_{}.md", chunk.module_id));
            documents.insert(filename, render(chunk)?);
        }

        log::debug!(
            "{presentation_name}: {} chunks rendered into {} documents",
            chunks.len(),
            documents.len()
        );
        Ok(documents)
    }

    /// Produce finalized chunks without rendering, for callers that want
    /// the structured form.
    pub fn chunk(&self, slides: Vec<SlideRecord>) -> Result<Vec<Chunk>> {
        let groups = self.chunker.chunk(slides);

        let mut chunks = Vec::with_capacity(groups.len());
        for (index, group) in groups.iter().enumerate() {
            chunks.push(self.builder.build(group, index + 1)?);
        }
        finalize(&mut chunks);
        Ok(chunks)
    }
}
