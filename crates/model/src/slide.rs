use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Instructor notes bucketed by pedagogical intent.
///
/// `BTreeMap` keyed by a closed enum keeps category iteration in
/// declaration order, which the renderer and aggregator rely on.
pub type InstructorNotes = BTreeMap<NoteCategory, Vec<String>>;

/// A fully annotated, immutable slide.
///
/// Produced once per input slide by an annotator and consumed read-only by
/// the chunker and formatter. Every derived field has a neutral default so
/// a failed sub-analysis never aborts the slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// 1-based position in the presentation, strictly increasing.
    pub slide_number: u32,

    pub title: Option<String>,

    /// Non-title body text blocks in shape order.
    pub content: Vec<String>,

    #[serde(default)]
    pub speaker_notes: String,

    #[serde(default)]
    pub code_blocks: Vec<CodeBlock>,

    /// True when the slide heuristically marks a new learning unit.
    #[serde(default)]
    pub is_module_start: bool,

    #[serde(default)]
    pub learning_objectives: Vec<String>,

    #[serde(default)]
    pub activity_type: Option<ActivityType>,

    /// Capped at the top three matches.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    #[serde(default)]
    pub difficulty_level: Difficulty,

    /// Estimated minutes to deliver, at least 1, capped at 45.
    #[serde(default)]
    pub estimated_time_minutes: u32,

    #[serde(default)]
    pub visual_elements: Vec<VisualElement>,

    #[serde(default)]
    pub instructor_notes: InstructorNotes,

    #[serde(default)]
    pub assessment_items: Vec<AssessmentItem>,

    /// Uppercase keyword tags, first-seen order, deduped.
    #[serde(default)]
    pub compliance_markers: Vec<String>,

    /// Bullet structure carried through for rendering.
    #[serde(default)]
    pub bullets: Vec<crate::Bullet>,

    /// One-line summary from the assisted annotator, when available.
    #[serde(default)]
    pub content_summary: Option<String>,

    #[serde(default)]
    pub slide_layout_type: LayoutType,
}

impl SlideRecord {
    /// Placeholder record for a slide whose extraction pipeline failed.
    ///
    /// Keeps slide numbering contiguous instead of dropping the slide.
    #[must_use]
    pub fn extraction_failed(slide_number: u32) -> Self {
        Self {
            slide_number,
            title: Some(format!("Slide {slide_number} (Extraction Failed)")),
            content: vec!["Content could not be extracted from this slide.".to_string()],
            estimated_time_minutes: 1,
            ..Default::default()
        }
    }

    /// Character length of title + body + notes, the basis for token
    /// estimation.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.title.as_deref().map_or(0, str::len)
            + self.content.iter().map(String::len).sum::<usize>()
            + self.speaker_notes.len()
    }

    /// Whether the slide carries an activity tag or assessment items.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.activity_type.is_some() || !self.assessment_items.is_empty()
    }
}

/// A code block detected in slide text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub code: String,
    pub language: CodeLanguage,
}

/// Language guess for a detected code block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    Sql,
    Python,
    Javascript,
    Html,
    Java,
    Csharp,
    #[default]
    Text,
}

impl CodeLanguage {
    /// Markdown fence tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Html => "html",
            Self::Java => "java",
            Self::Csharp => "csharp",
            Self::Text => "text",
        }
    }
}

/// Pedagogical activity a slide represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    HandsOnLab,
    GuidedExercise,
    PracticeSession,
    Demonstration,
    HandsOnActivity,
    LearningActivity,
    Assignment,
    KnowledgeCheck,
    Assessment,
    FormalAssessment,
    KnowledgeReview,
    TroubleshootingScenario,
    CaseStudy,
    ScenarioBasedLearning,
    BestPractices,
    RealWorldApplication,
    CertificationPrep,
}

impl ActivityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HandsOnLab => "hands-on-lab",
            Self::GuidedExercise => "guided-exercise",
            Self::PracticeSession => "practice-session",
            Self::Demonstration => "demonstration",
            Self::HandsOnActivity => "hands-on-activity",
            Self::LearningActivity => "learning-activity",
            Self::Assignment => "assignment",
            Self::KnowledgeCheck => "knowledge-check",
            Self::Assessment => "assessment",
            Self::FormalAssessment => "formal-assessment",
            Self::KnowledgeReview => "knowledge-review",
            Self::TroubleshootingScenario => "troubleshooting-scenario",
            Self::CaseStudy => "case-study",
            Self::ScenarioBasedLearning => "scenario-based-learning",
            Self::BestPractices => "best-practices",
            Self::RealWorldApplication => "real-world-application",
            Self::CertificationPrep => "certification-prep",
        }
    }
}

/// Difficulty level of slide content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Weight used by the cognitive-load signal.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Advanced => 2,
        }
    }
}

/// Semantic layout shape of a slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    DataTable,
    DataVisualization,
    ImageFocused,
    ContentHeavy,
    TitleSlide,
    #[default]
    StandardContent,
}

impl LayoutType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataTable => "data-table",
            Self::DataVisualization => "data-visualization",
            Self::ImageFocused => "image-focused",
            Self::ContentHeavy => "content-heavy",
            Self::TitleSlide => "title-slide",
            Self::StandardContent => "standard-content",
        }
    }
}

/// Instructor-note category. The set is closed; iteration order is the
/// declaration order below.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NoteCategory {
    Timing,
    Emphasis,
    Examples,
    Tips,
    Warnings,
    Context,
    Delivery,
}

impl NoteCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timing => "timing",
            Self::Emphasis => "emphasis",
            Self::Examples => "examples",
            Self::Tips => "tips",
            Self::Warnings => "warnings",
            Self::Context => "context",
            Self::Delivery => "delivery",
        }
    }

    /// All categories in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Timing,
            Self::Emphasis,
            Self::Examples,
            Self::Tips,
            Self::Warnings,
            Self::Context,
            Self::Delivery,
        ]
    }
}

/// A visual element summary (image, table, chart, diagram).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualElement {
    pub kind: crate::ShapeKind,
    pub description: String,
}

/// A detected quiz question or knowledge check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentItem {
    pub content: String,
    pub format: AssessmentFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentFormat {
    MultipleChoice,
    OpenEnded,
}

impl AssessmentFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::OpenEnded => "open_ended",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_failed_placeholder_keeps_numbering() {
        let record = SlideRecord::extraction_failed(7);
        assert_eq!(record.slide_number, 7);
        assert_eq!(record.title.as_deref(), Some("Slide 7 (Extraction Failed)"));
        assert_eq!(record.content.len(), 1);
        assert_eq!(record.estimated_time_minutes, 1);
        assert!(!record.is_module_start);
    }

    #[test]
    fn text_len_counts_title_content_and_notes() {
        let record = SlideRecord {
            slide_number: 1,
            title: Some("abcd".into()),
            content: vec!["ef".into(), "gh".into()],
            speaker_notes: "ij".into(),
            ..Default::default()
        };
        assert_eq!(record.text_len(), 10);
    }

    #[test]
    fn activity_type_serializes_kebab_case() {
        let json = serde_json::to_string(&ActivityType::HandsOnLab).unwrap();
        assert_eq!(json, "\"hands-on-lab\"");
        let back: ActivityType = serde_json::from_str("\"case-study\"").unwrap();
        assert_eq!(back, ActivityType::CaseStudy);
        assert_eq!(back.as_str(), "case-study");
    }

    #[test]
    fn note_categories_iterate_in_declaration_order() {
        let mut notes = InstructorNotes::new();
        notes.insert(NoteCategory::Delivery, vec!["say this".into()]);
        notes.insert(NoteCategory::Timing, vec!["5 minutes".into()]);
        notes.insert(NoteCategory::Tips, vec!["pro tip".into()]);

        let order: Vec<NoteCategory> = notes.keys().copied().collect();
        assert_eq!(
            order,
            vec![NoteCategory::Timing, NoteCategory::Tips, NoteCategory::Delivery]
        );
    }

    #[test]
    fn is_interactive_checks_activity_and_assessments() {
        let mut record = SlideRecord::default();
        assert!(!record.is_interactive());

        record.activity_type = Some(ActivityType::Demonstration);
        assert!(record.is_interactive());

        record.activity_type = None;
        record.assessment_items.push(AssessmentItem {
            content: "What is cloud computing?".into(),
            format: AssessmentFormat::OpenEnded,
        });
        assert!(record.is_interactive());
    }
}
