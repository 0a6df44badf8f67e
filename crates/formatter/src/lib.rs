//! # Deckshred Formatter
//!
//! Turns chunked slide groups into finished markdown documents.
//!
//! ```text
//! [SlideGroup…]
//!     │
//!     ├──> ChunkBuilder   aggregate + dedup per-chunk metadata
//!     │
//!     ├──> finalize       assign chunk_index / total_chunks
//!     │
//!     └──> render         YAML front-matter + body sections
//! ```
//!
//! [`MarkdownFormatter`] is the entry point callers use: it runs the
//! chunker, aggregates each group into a [`Chunk`], finalizes indices in
//! one pass, renders every chunk, and returns a filename → document map
//! with sanitized filenames. The renderer is a pure function of the
//! chunk, so identical input always produces byte-identical output.

mod aggregate;
mod chunk;
mod error;
mod filename;
mod format;
mod render;

pub use aggregate::{format_minutes, slugify, ActivitySelection, AggregateOptions, ChunkBuilder};
pub use chunk::{finalize, Chunk, SignalLevel};
pub use error::{FormatError, Result};
pub use filename::sanitize_filename;
pub use format::{FormatOptions, MarkdownFormatter};
pub use render::{parse_front_matter, render, FrontMatter};
