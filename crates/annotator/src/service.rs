use std::time::Duration;

use async_trait::async_trait;
use deckshred_model::{ActivityType, Difficulty, RawSlide, SlideRecord};
use serde::{Deserialize, Serialize};

use crate::annotator::{HeuristicAnnotator, SlideAnnotator};
use crate::error::{AnnotatorError, Result};

/// Request limits mirroring what the service actually reads.
const MAX_TEXT_BLOCKS: usize = 3;
const MAX_BULLETS: usize = 3;
const MAX_BULLET_CHARS: usize = 50;
const MAX_NOTES_CHARS: usize = 200;

/// Fixed request contract for the external text-understanding service.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationRequest {
    pub slide_number: u32,
    pub title: Option<String>,
    /// First few body text blocks.
    pub text: Vec<String>,
    /// First few bullet texts, truncated.
    pub bullets: Vec<String>,
    /// Speaker-notes preview, truncated.
    pub notes: String,
}

impl AnnotationRequest {
    /// Build the bounded slide summary sent to the service.
    #[must_use]
    pub fn from_raw(raw: &RawSlide, slide_number: u32) -> Self {
        Self {
            slide_number,
            title: raw.title.clone(),
            text: raw.text.iter().take(MAX_TEXT_BLOCKS).cloned().collect(),
            bullets: raw
                .bullets
                .iter()
                .take(MAX_BULLETS)
                .map(|b| truncate_chars(&b.text, MAX_BULLET_CHARS))
                .collect(),
            notes: truncate_chars(&raw.notes, MAX_NOTES_CHARS),
        }
    }
}

/// Structured response from the annotation service.
///
/// Every field is optional: whatever is absent or invalid is filled from
/// the heuristic record during the merge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceAnnotations {
    #[serde(default)]
    pub is_module_start: Option<bool>,
    #[serde(default)]
    pub learning_objectives: Option<Vec<String>>,
    #[serde(default)]
    pub prerequisites: Option<Vec<String>>,
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub estimated_time_minutes: Option<f64>,
    #[serde(default)]
    pub content_summary: Option<String>,
}

/// Abstract inference transport, swappable for a deterministic stub in
/// tests.
#[async_trait]
pub trait StructureInferenceClient: Send + Sync {
    async fn infer(&self, request: &AnnotationRequest) -> Result<ServiceAnnotations>;
}

/// Connection settings for the HTTP inference client.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Endpoint accepting the `AnnotationRequest` JSON body via POST.
    pub endpoint: String,
    /// Hard deadline per annotation call.
    pub timeout: Duration,
}

impl ServiceConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(20),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reqwest-backed inference client with a bounded per-call timeout.
pub struct HttpInferenceClient {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpInferenceClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl StructureInferenceClient for HttpInferenceClient {
    async fn infer(&self, request: &AnnotationRequest) -> Result<ServiceAnnotations> {
        let call = async {
            let response = self
                .client
                .post(&self.config.endpoint)
                .json(request)
                .send()
                .await?
                .error_for_status()?;
            response
                .json::<ServiceAnnotations>()
                .await
                .map_err(AnnotatorError::from)
        };

        match tokio::time::timeout(self.config.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AnnotatorError::Timeout(self.config.timeout)),
        }
    }
}

/// Assisted annotator: service output layered over heuristic defaults.
///
/// The heuristic pass always runs first; the service only refines the
/// structural fields it is contracted for. Code blocks, instructor-note
/// categories, assessments, compliance markers, visuals, and layout stay
/// heuristic. Any failure degrades to the heuristic record for that slide
/// only.
pub struct ServiceAnnotator<C> {
    client: C,
    heuristic: HeuristicAnnotator,
}

impl<C: StructureInferenceClient> ServiceAnnotator<C> {
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            heuristic: HeuristicAnnotator::new(),
        }
    }
}

#[async_trait]
impl<C: StructureInferenceClient> SlideAnnotator for ServiceAnnotator<C> {
    async fn annotate(&self, raw: &RawSlide, slide_number: u32) -> Result<SlideRecord> {
        let record = self.heuristic.annotate_sync(raw, slide_number);
        let request = AnnotationRequest::from_raw(raw, slide_number);

        match self.client.infer(&request).await {
            Ok(annotations) => Ok(merge(record, annotations, slide_number)),
            Err(err) => {
                log::warn!("slide {slide_number}: assisted annotation failed, using heuristics: {err}");
                Ok(record)
            }
        }
    }
}

/// Overlay validated service fields onto the heuristic record.
fn merge(mut record: SlideRecord, svc: ServiceAnnotations, slide_number: u32) -> SlideRecord {
    if let Some(flag) = svc.is_module_start {
        record.is_module_start = flag;
    }
    if let Some(objectives) = svc.learning_objectives {
        record.learning_objectives = objectives;
    }
    if let Some(mut prerequisites) = svc.prerequisites {
        prerequisites.truncate(3);
        record.prerequisites = prerequisites;
    }

    if let Some(tag) = svc.activity_type.as_deref() {
        match parse_activity(tag) {
            Ok(activity) => record.activity_type = activity,
            Err(()) => {
                log::warn!("slide {slide_number}: unknown activity tag {tag:?}, keeping heuristic");
            }
        }
    }

    if let Some(level) = svc.difficulty_level.as_deref() {
        match parse_difficulty(level) {
            Ok(difficulty) => record.difficulty_level = difficulty,
            Err(()) => {
                log::warn!(
                    "slide {slide_number}: unknown difficulty {level:?}, keeping heuristic"
                );
            }
        }
    }

    if let Some(minutes) = svc.estimated_time_minutes {
        if minutes.is_finite() && (1.0..=45.0).contains(&minutes) {
            record.estimated_time_minutes = minutes as u32;
        } else {
            log::warn!(
                "slide {slide_number}: time estimate {minutes} out of range, keeping heuristic"
            );
        }
    }

    if let Some(summary) = svc.content_summary {
        if !summary.trim().is_empty() {
            record.content_summary = Some(summary);
        }
    }

    record
}

/// Parse a service activity tag.
///
/// Accepts the canonical kebab-case tags plus the short aliases the
/// service is allowed to answer with. "lecture" and "overview" are valid
/// answers that mean "no special activity".
fn parse_activity(tag: &str) -> std::result::Result<Option<ActivityType>, ()> {
    let canonical = [
        ActivityType::HandsOnLab,
        ActivityType::GuidedExercise,
        ActivityType::PracticeSession,
        ActivityType::Demonstration,
        ActivityType::HandsOnActivity,
        ActivityType::LearningActivity,
        ActivityType::Assignment,
        ActivityType::KnowledgeCheck,
        ActivityType::Assessment,
        ActivityType::FormalAssessment,
        ActivityType::KnowledgeReview,
        ActivityType::TroubleshootingScenario,
        ActivityType::CaseStudy,
        ActivityType::ScenarioBasedLearning,
        ActivityType::BestPractices,
        ActivityType::RealWorldApplication,
        ActivityType::CertificationPrep,
    ];

    let tag = tag.trim().to_lowercase();
    if let Some(activity) = canonical.iter().find(|a| a.as_str() == tag) {
        return Ok(Some(*activity));
    }

    match tag.as_str() {
        "lab" => Ok(Some(ActivityType::HandsOnLab)),
        "demo" => Ok(Some(ActivityType::Demonstration)),
        "exercise" => Ok(Some(ActivityType::GuidedExercise)),
        "quiz" => Ok(Some(ActivityType::KnowledgeCheck)),
        "review" => Ok(Some(ActivityType::KnowledgeReview)),
        "lecture" | "overview" => Ok(None),
        _ => Err(()),
    }
}

fn parse_difficulty(level: &str) -> std::result::Result<Difficulty, ()> {
    match level.trim().to_lowercase().as_str() {
        "beginner" => Ok(Difficulty::Beginner),
        "intermediate" => Ok(Difficulty::Intermediate),
        "advanced" => Ok(Difficulty::Advanced),
        _ => Err(()),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckshred_model::Bullet;
    use pretty_assertions::assert_eq;

    struct StubClient(ServiceAnnotations);

    #[async_trait]
    impl StructureInferenceClient for StubClient {
        async fn infer(&self, _request: &AnnotationRequest) -> Result<ServiceAnnotations> {
            Ok(self.0.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl StructureInferenceClient for FailingClient {
        async fn infer(&self, _request: &AnnotationRequest) -> Result<ServiceAnnotations> {
            Err(AnnotatorError::Timeout(Duration::from_secs(1)))
        }
    }

    fn raw_slide() -> RawSlide {
        RawSlide {
            title: Some("Storage Accounts".into()),
            text: vec!["Blob, file, queue, table".into()],
            notes: "Remember: emphasize redundancy options.".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn service_fields_overlay_heuristics() {
        let annotations = ServiceAnnotations {
            is_module_start: Some(true),
            learning_objectives: Some(vec!["Explain storage tiers".into()]),
            activity_type: Some("demo".into()),
            difficulty_level: Some("advanced".into()),
            estimated_time_minutes: Some(7.0),
            content_summary: Some("Storage account overview".into()),
            ..Default::default()
        };
        let annotator = ServiceAnnotator::new(StubClient(annotations));

        let record = annotator.annotate(&raw_slide(), 2).await.unwrap();
        assert!(record.is_module_start);
        assert_eq!(record.learning_objectives, vec!["Explain storage tiers"]);
        assert_eq!(record.activity_type, Some(ActivityType::Demonstration));
        assert_eq!(record.difficulty_level, Difficulty::Advanced);
        assert_eq!(record.estimated_time_minutes, 7);
        assert_eq!(
            record.content_summary.as_deref(),
            Some("Storage account overview")
        );
        // Heuristic-only fields survive the merge untouched.
        assert!(!record.instructor_notes.is_empty());
    }

    #[tokio::test]
    async fn invalid_fields_keep_heuristic_values() {
        let annotations = ServiceAnnotations {
            activity_type: Some("interpretive-dance".into()),
            difficulty_level: Some("impossible".into()),
            estimated_time_minutes: Some(900.0),
            ..Default::default()
        };
        let annotator = ServiceAnnotator::new(StubClient(annotations));
        let heuristic = HeuristicAnnotator::new().annotate_sync(&raw_slide(), 2);

        let record = annotator.annotate(&raw_slide(), 2).await.unwrap();
        assert_eq!(record.activity_type, heuristic.activity_type);
        assert_eq!(record.difficulty_level, heuristic.difficulty_level);
        assert_eq!(
            record.estimated_time_minutes,
            heuristic.estimated_time_minutes
        );
    }

    #[tokio::test]
    async fn transport_failure_falls_back_per_slide() {
        let annotator = ServiceAnnotator::new(FailingClient);
        let heuristic = HeuristicAnnotator::new().annotate_sync(&raw_slide(), 2);

        let record = annotator.annotate(&raw_slide(), 2).await.unwrap();
        assert_eq!(record, heuristic);
    }

    #[tokio::test]
    async fn lecture_tag_clears_activity() {
        let annotations = ServiceAnnotations {
            activity_type: Some("lecture".into()),
            ..Default::default()
        };
        let annotator = ServiceAnnotator::new(StubClient(annotations));

        let record = annotator.annotate(&raw_slide(), 1).await.unwrap();
        assert_eq!(record.activity_type, None);
    }

    #[test]
    fn request_summary_is_bounded() {
        let raw = RawSlide {
            title: Some("T".into()),
            text: (0..10).map(|i| format!("block {i}")).collect(),
            bullets: (0..10)
                .map(|i| Bullet {
                    level: 1,
                    text: format!("bullet {i} {}", "x".repeat(100)),
                })
                .collect(),
            notes: "n".repeat(1000),
            ..Default::default()
        };

        let request = AnnotationRequest::from_raw(&raw, 5);
        assert_eq!(request.text.len(), 3);
        assert_eq!(request.bullets.len(), 3);
        assert!(request.bullets.iter().all(|b| b.chars().count() <= 50));
        assert_eq!(request.notes.chars().count(), 200);
        assert_eq!(request.slide_number, 5);
    }
}
