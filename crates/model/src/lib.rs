//! # Deckshred Model
//!
//! Shared data model for the deckshred pipeline.
//!
//! Two layers of slide data flow through the system:
//!
//! ```text
//! RawSlide (extraction collaborator output)
//!     │
//!     ├──> Annotation (heuristic or service-assisted)
//!     │
//!     └──> SlideRecord (immutable, fully annotated)
//!              │
//!              └──> Chunker / Aggregator / Renderer
//! ```
//!
//! `RawSlide` is the wire contract with the external extractor: title
//! candidate, body text blocks, speaker notes, bullet structure, and
//! visual shape descriptors. `SlideRecord` adds every derived pedagogical
//! field and is never mutated after construction.

mod raw;
mod slide;

pub use raw::{Bullet, RawDeck, RawShape, RawSlide, ShapeKind};
pub use slide::{
    ActivityType, AssessmentFormat, AssessmentItem, CodeBlock, CodeLanguage, Difficulty,
    InstructorNotes, LayoutType, NoteCategory, SlideRecord, VisualElement,
};
