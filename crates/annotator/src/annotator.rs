use async_trait::async_trait;
use deckshred_model::{RawSlide, SlideRecord};

use crate::error::Result;
use crate::heuristics;

/// Per-slide annotation engine.
///
/// Implementations must be safe to call once per slide in presentation
/// order; they see one slide at a time and hold no cross-slide state.
#[async_trait]
pub trait SlideAnnotator: Send + Sync {
    /// Produce a fully annotated record for one raw slide.
    ///
    /// `slide_number` is the resolved 1-based position; implementations
    /// must copy it through unchanged.
    async fn annotate(&self, raw: &RawSlide, slide_number: u32) -> Result<SlideRecord>;
}

/// Deterministic keyword/pattern annotator.
///
/// The reference implementation: no I/O, no randomness, identical output
/// for identical input. Also serves as the fallback for the assisted mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnnotator;

impl HeuristicAnnotator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Synchronous annotation; the async trait impl delegates here.
    #[must_use]
    pub fn annotate_sync(&self, raw: &RawSlide, slide_number: u32) -> SlideRecord {
        let title = raw.title.as_deref();

        // Bullet text participates in the text analyses alongside body
        // blocks; code detection only looks at whole body blocks.
        let mut analysis: Vec<String> = raw.text.clone();
        analysis.extend(heuristics::bullet_texts(&raw.bullets));

        let activity_type = heuristics::detect_activity(title, &analysis);

        SlideRecord {
            slide_number,
            title: raw.title.clone(),
            content: raw.text.clone(),
            speaker_notes: raw.notes.clone(),
            code_blocks: heuristics::extract_code_blocks(&raw.text),
            is_module_start: heuristics::is_module_start(title, &analysis),
            learning_objectives: heuristics::extract_objectives(&analysis, &raw.notes),
            activity_type,
            prerequisites: heuristics::extract_prerequisites(&analysis, &raw.notes),
            difficulty_level: heuristics::assess_difficulty(title, &analysis, &raw.notes),
            estimated_time_minutes: heuristics::estimate_time(&analysis, &raw.notes, activity_type),
            visual_elements: heuristics::visual_elements(&raw.shapes),
            instructor_notes: heuristics::categorize_notes(&raw.notes),
            assessment_items: heuristics::extract_assessments(&analysis, &raw.notes),
            compliance_markers: heuristics::extract_compliance(&analysis, &raw.notes),
            bullets: raw.bullets.clone(),
            content_summary: None,
            slide_layout_type: heuristics::detect_layout(raw),
        }
    }
}

#[async_trait]
impl SlideAnnotator for HeuristicAnnotator {
    async fn annotate(&self, raw: &RawSlide, slide_number: u32) -> Result<SlideRecord> {
        Ok(self.annotate_sync(raw, slide_number))
    }
}

/// Annotate a whole deck in slide order.
///
/// Slide numbers come from the raw slide when present, from the position
/// otherwise. A slide whose annotation fails is replaced with the
/// extraction-failed placeholder so numbering stays contiguous; the error
/// is logged and the rest of the deck continues.
pub async fn annotate_deck<A: SlideAnnotator + ?Sized>(
    annotator: &A,
    slides: &[RawSlide],
) -> Vec<SlideRecord> {
    let mut records = Vec::with_capacity(slides.len());

    for (index, raw) in slides.iter().enumerate() {
        let slide_number = if raw.slide_number > 0 {
            raw.slide_number
        } else {
            index as u32 + 1
        };

        match annotator.annotate(raw, slide_number).await {
            Ok(record) => records.push(record),
            Err(err) => {
                log::warn!("slide {slide_number}: annotation failed, emitting placeholder: {err}");
                records.push(SlideRecord::extraction_failed(slide_number));
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckshred_model::{ActivityType, Difficulty};
    use pretty_assertions::assert_eq;

    fn raw(title: &str, text: &[&str], notes: &str) -> RawSlide {
        RawSlide {
            title: Some(title.to_string()),
            text: text.iter().map(ToString::to_string).collect(),
            notes: notes.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn heuristic_mode_is_idempotent() {
        let annotator = HeuristicAnnotator::new();
        let slide = raw(
            "Module 1: Azure Fundamentals",
            &["Overview of core services"],
            "Learning objective: Students will understand cloud computing basics.",
        );

        let first = annotator.annotate(&slide, 1).await.unwrap();
        let second = annotator.annotate(&slide, 1).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn annotates_module_start_and_objectives() {
        let annotator = HeuristicAnnotator::new();
        let slide = raw(
            "Module 1: Azure Fundamentals",
            &[],
            "Learning objective: Students will understand cloud computing basics.",
        );

        let record = annotator.annotate(&slide, 1).await.unwrap();
        assert!(record.is_module_start);
        assert!(!record.learning_objectives.is_empty());
        assert_eq!(record.difficulty_level, Difficulty::Beginner);
        assert!(record.estimated_time_minutes >= 1);
    }

    #[tokio::test]
    async fn lab_slide_gets_activity_tag() {
        let annotator = HeuristicAnnotator::new();
        let slide = raw("Lab: Create Azure Account", &[], "");

        let record = annotator.annotate(&slide, 3).await.unwrap();
        assert_eq!(record.activity_type, Some(ActivityType::HandsOnLab));
        assert!(!record.is_module_start);
    }

    #[tokio::test]
    async fn deck_numbering_prefers_explicit_numbers() {
        let annotator = HeuristicAnnotator::new();
        let slides = vec![
            RawSlide {
                slide_number: 4,
                ..Default::default()
            },
            RawSlide::default(),
        ];

        let records = annotate_deck(&annotator, &slides).await;
        assert_eq!(records[0].slide_number, 4);
        assert_eq!(records[1].slide_number, 2);
    }

    #[tokio::test]
    async fn failing_annotator_yields_placeholder() {
        struct Failing;

        #[async_trait]
        impl SlideAnnotator for Failing {
            async fn annotate(&self, _raw: &RawSlide, _n: u32) -> Result<SlideRecord> {
                Err(crate::AnnotatorError::InvalidResponse("boom".into()))
            }
        }

        let records = annotate_deck(&Failing, &[RawSlide::default()]).await;
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].title.as_deref(),
            Some("Slide 1 (Extraction Failed)")
        );
    }
}
