use deckshred_model::{ActivityType, Difficulty, InstructorNotes, SlideRecord};
use serde::{Deserialize, Serialize};

use crate::aggregate::format_minutes;

/// One output unit: a contiguous slide range plus aggregated metadata.
///
/// Built once per slide group by `ChunkBuilder` and consumed read-only by
/// the renderer. The only post-construction mutation is the two-phase
/// `chunk_index`/`total_chunks` assignment done by [`finalize`] once all
/// chunks for a presentation exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Stable URL-safe id, `{sequence:02}-{slug}`, unique per
    /// presentation.
    pub module_id: String,
    pub module_title: String,

    /// Inclusive (first, last) slide numbers covered.
    pub slide_range: (u32, u32),

    /// 1-based position among the presentation's chunks; 0 until
    /// finalized.
    pub chunk_index: usize,
    /// Total chunks in the presentation; 0 until finalized.
    pub total_chunks: usize,

    pub learning_objectives: Vec<String>,
    pub prerequisites: Vec<String>,
    /// Capitalized title words, sorted, capped.
    pub concepts: Vec<String>,
    pub activity_type: Option<ActivityType>,
    pub difficulty_level: Difficulty,
    /// Sum of per-slide estimates.
    pub estimated_minutes: u32,
    pub compliance_markers: Vec<String>,
    pub instructor_guidance: InstructorNotes,
    pub content_summary: String,
    /// Deduplicated `kind: description` summaries across the group.
    pub visual_summaries: Vec<String>,
    pub visual_elements_count: usize,
    pub has_speaker_notes: bool,
    pub cognitive_load: SignalLevel,
    pub interaction_level: SignalLevel,

    /// The slides this chunk summarizes, in order.
    pub slides: Vec<SlideRecord>,
}

impl Chunk {
    #[must_use]
    pub fn total_slides(&self) -> usize {
        self.slides.len()
    }

    /// Human-readable duration text.
    #[must_use]
    pub fn estimated_duration(&self) -> String {
        format_minutes(self.estimated_minutes)
    }
}

/// Bucketed qualitative signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLevel {
    Low,
    Medium,
    High,
}

impl SignalLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Assign `chunk_index` and `total_chunks` across a finished sequence.
///
/// Called exactly once per presentation, after all chunks are known.
pub fn finalize(chunks: &mut [Chunk]) {
    let total = chunks.len();
    for (index, chunk) in chunks.iter_mut().enumerate() {
        chunk.chunk_index = index + 1;
        chunk.total_chunks = total;
    }
}
