use std::collections::BTreeSet;

use deckshred_chunker::SlideGroup;
use deckshred_model::{ActivityType, Difficulty, InstructorNotes, SlideRecord};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::chunk::{Chunk, SignalLevel};
use crate::error::{FormatError, Result};

/// Maximum slug length inside a module id.
const SLUG_MAX: usize = 30;

/// Maximum number of concepts carried into front-matter.
const CONCEPT_MAX: usize = 10;

/// Maximum summary length before truncation.
const SUMMARY_MAX: usize = 200;

static CONCEPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("concept pattern"));

/// How the chunk-level activity type is chosen from its slides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivitySelection {
    /// First non-null activity among the group's slides. The default.
    #[default]
    FirstPresent,
    /// Most frequent activity; ties broken by first-encountered. Must be
    /// selected explicitly.
    MajorityVote,
}

/// Aggregation knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    pub activity_selection: ActivitySelection,
}

/// Merges a slide group's per-slide metadata into one chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkBuilder {
    options: AggregateOptions,
}

impl ChunkBuilder {
    #[must_use]
    pub fn new(options: AggregateOptions) -> Self {
        Self { options }
    }

    /// Build the chunk for a group at the given 1-based sequence number.
    ///
    /// An empty group is a contract violation and errors immediately.
    pub fn build(&self, group: &SlideGroup, sequence: usize) -> Result<Chunk> {
        let slides = &group.slides;
        let (Some(first), Some(last)) = (slides.first(), slides.last()) else {
            return Err(FormatError::EmptySlideGroup);
        };

        let module_id = format!("{sequence:02}-{}", slugify(&group.title));

        let learning_objectives = dedup_first_seen(
            slides.iter().flat_map(|s| s.learning_objectives.iter().cloned()),
        );
        let prerequisites =
            dedup_first_seen(slides.iter().flat_map(|s| s.prerequisites.iter().cloned()));
        let compliance_markers = dedup_first_seen_ci(
            slides.iter().flat_map(|s| s.compliance_markers.iter().cloned()),
        );
        let visual_summaries = dedup_first_seen(slides.iter().flat_map(|s| {
            s.visual_elements
                .iter()
                .map(|v| format!("{}: {}", v.kind.as_str(), v.description))
        }));

        Ok(Chunk {
            module_id,
            module_title: group.title.clone(),
            slide_range: (first.slide_number, last.slide_number),
            chunk_index: 0,
            total_chunks: 0,
            learning_objectives,
            prerequisites,
            concepts: extract_concepts(slides),
            activity_type: self.select_activity(slides),
            difficulty_level: modal_difficulty(slides),
            estimated_minutes: slides.iter().map(|s| s.estimated_time_minutes).sum(),
            compliance_markers,
            instructor_guidance: merge_guidance(slides),
            content_summary: summarize(slides),
            visual_summaries,
            visual_elements_count: slides.iter().map(|s| s.visual_elements.len()).sum(),
            has_speaker_notes: slides.iter().any(|s| !s.speaker_notes.is_empty()),
            cognitive_load: cognitive_load(slides),
            interaction_level: interaction_level(slides),
            slides: slides.clone(),
        })
    }

    fn select_activity(&self, slides: &[SlideRecord]) -> Option<ActivityType> {
        match self.options.activity_selection {
            ActivitySelection::FirstPresent => {
                slides.iter().find_map(|s| s.activity_type)
            }
            ActivitySelection::MajorityVote => {
                let max = slides
                    .iter()
                    .filter_map(|s| s.activity_type)
                    .map(|a| count_activity(slides, a))
                    .max()?;
                slides
                    .iter()
                    .filter_map(|s| s.activity_type)
                    .find(|a| count_activity(slides, *a) == max)
            }
        }
    }
}

fn count_activity(slides: &[SlideRecord], activity: ActivityType) -> usize {
    slides
        .iter()
        .filter(|s| s.activity_type == Some(activity))
        .count()
}

/// Most frequent difficulty; ties resolve to the first-encountered value
/// among the tied levels.
fn modal_difficulty(slides: &[SlideRecord]) -> Difficulty {
    let count = |level: Difficulty| {
        slides
            .iter()
            .filter(|s| s.difficulty_level == level)
            .count()
    };

    let max = slides
        .iter()
        .map(|s| count(s.difficulty_level))
        .max()
        .unwrap_or(0);

    slides
        .iter()
        .map(|s| s.difficulty_level)
        .find(|level| count(*level) == max)
        .unwrap_or_default()
}

/// Merge per-category guidance across slides, preserving slide order
/// within each category and dropping categories that end up empty.
fn merge_guidance(slides: &[SlideRecord]) -> InstructorNotes {
    let mut merged = InstructorNotes::new();
    for slide in slides {
        for (category, notes) in &slide.instructor_notes {
            if notes.is_empty() {
                continue;
            }
            merged
                .entry(*category)
                .or_default()
                .extend(notes.iter().cloned());
        }
    }
    merged
}

/// Capitalized words from slide titles, sorted, capped.
fn extract_concepts(slides: &[SlideRecord]) -> Vec<String> {
    let mut concepts = BTreeSet::new();
    for slide in slides {
        if let Some(title) = &slide.title {
            for m in CONCEPT_RE.find_iter(title) {
                concepts.insert(m.as_str().to_string());
            }
        }
    }
    concepts.into_iter().take(CONCEPT_MAX).collect()
}

/// First available per-slide summary, truncated; a generic fallback
/// otherwise.
fn summarize(slides: &[SlideRecord]) -> String {
    for slide in slides {
        if let Some(summary) = &slide.content_summary {
            let trimmed = summary.trim();
            if !trimmed.is_empty() {
                if trimmed.chars().count() > SUMMARY_MAX {
                    let head: String = trimmed.chars().take(SUMMARY_MAX).collect();
                    return format!("{head}...");
                }
                return trimmed.to_string();
            }
        }
    }
    format!(
        "Module with {} slides covering technical training content.",
        slides.len()
    )
}

/// Weighted per-slide density score bucketed into low/medium/high.
fn cognitive_load(slides: &[SlideRecord]) -> SignalLevel {
    if slides.is_empty() {
        return SignalLevel::Low;
    }

    let total: usize = slides
        .iter()
        .map(|s| {
            2 * s.code_blocks.len()
                + s.content.len()
                + s.visual_elements.len()
                + 3 * s.difficulty_level.index()
        })
        .sum();
    let mean = total as f64 / slides.len() as f64;

    if mean > 12.0 {
        SignalLevel::High
    } else if mean > 6.0 {
        SignalLevel::Medium
    } else {
        SignalLevel::Low
    }
}

/// Fraction of slides carrying an activity or assessment, bucketed.
fn interaction_level(slides: &[SlideRecord]) -> SignalLevel {
    if slides.is_empty() {
        return SignalLevel::Low;
    }

    let interactive = slides.iter().filter(|s| s.is_interactive()).count();
    let ratio = interactive as f64 / slides.len() as f64;

    if ratio >= 0.5 {
        SignalLevel::High
    } else if ratio >= 0.2 {
        SignalLevel::Medium
    } else {
        SignalLevel::Low
    }
}

/// Deduplicate preserving first occurrence, case-sensitive.
fn dedup_first_seen(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Deduplicate preserving first occurrence, case-insensitive.
fn dedup_first_seen_ci(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.to_lowercase()) {
            out.push(item);
        }
    }
    out
}

/// URL-safe slug: lowercase, word characters only, single hyphens,
/// bounded length, never a trailing hyphen.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for c in lowered.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
        // Other punctuation is stripped without acting as a separator.
    }

    let mut slug: String = slug.chars().take(SLUG_MAX).collect();
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// Human-readable duration text.
#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    if minutes < 1 {
        "< 1 minute".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes")
    } else {
        let hours = minutes / 60;
        let remainder = minutes % 60;
        if remainder > 0 {
            format!("{hours}h {remainder}m")
        } else {
            format!("{hours}h")
        }
    }
}
