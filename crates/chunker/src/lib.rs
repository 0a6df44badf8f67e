//! # Deckshred Chunker
//!
//! Groups an ordered sequence of annotated slides into module-sized
//! chunks under a token budget.
//!
//! ```text
//! [SlideRecord…]
//!     │
//!     ├──> strategy (instructional | module-based | sequential)
//!     │
//!     └──> [SlideGroup…]   contiguous, non-empty, exact partition
//! ```
//!
//! The three strategies share one contract: every input slide lands in
//! exactly one group, in order, with no group empty. `instructional`
//! splits at module-start slides and additionally breaks over-budget
//! groups at an activity transition; `module-based` ignores the budget;
//! `sequential` is purely budget-driven.
//!
//! Token counts come from a [`TokenEstimator`]; the default is a flat
//! 4-characters-per-token approximation. Enable the `hf-tokenizers`
//! feature to plug in a real tokenizer.

mod chunker;
mod config;
mod error;
mod tokens;

pub use chunker::{GroupStats, ModuleChunker, SlideGroup};
pub use config::{ChunkerConfig, ChunkingStrategy};
pub use error::{ChunkerError, Result};
#[cfg(feature = "hf-tokenizers")]
pub use tokens::HfTokenEstimator;
pub use tokens::{CharTokenEstimator, TokenEstimator};
