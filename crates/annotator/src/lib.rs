//! # Deckshred Annotator
//!
//! Per-slide metadata annotation: turns a `RawSlide` from the extraction
//! collaborator into a fully tagged `SlideRecord`.
//!
//! Two interchangeable engines sit behind the [`SlideAnnotator`] trait:
//!
//! - [`HeuristicAnnotator`] — pattern/keyword analysis. Fully
//!   deterministic (no I/O, no randomness), so it doubles as the reference
//!   implementation for tests and as the fallback for everything else.
//! - [`ServiceAnnotator`] — delegates the structural fields to an external
//!   text-understanding service over HTTP with a bounded timeout. Any
//!   failure (transport, timeout, malformed JSON, invalid field) degrades
//!   to the heuristic value for that slide or field only; a bad response
//!   never poisons the batch.
//!
//! [`annotate_deck`] drives a whole presentation through an annotator and
//! applies the per-slide placeholder policy: a slide that fails outright is
//! replaced with `SlideRecord::extraction_failed(n)` so slide numbering
//! stays contiguous.

mod annotator;
mod error;
pub mod heuristics;
mod service;

pub use annotator::{annotate_deck, HeuristicAnnotator, SlideAnnotator};
pub use error::{AnnotatorError, Result};
pub use service::{
    AnnotationRequest, HttpInferenceClient, ServiceAnnotations, ServiceAnnotator, ServiceConfig,
    StructureInferenceClient,
};
