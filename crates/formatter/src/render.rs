use std::fmt::Write as _;

use deckshred_model::{ActivityType, Difficulty, SlideRecord};
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, SignalLevel};
use crate::error::{FormatError, Result};

/// Structured front-matter block prefixed to every rendered document.
///
/// Field order here is the serialization order. Empty and null fields are
/// omitted; `parse_front_matter` restores them to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub module_id: String,
    pub module_title: String,
    pub slide_range: (u32, u32),
    pub chunk_index: usize,
    pub total_chunks: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub learning_objectives: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,

    pub difficulty_level: Difficulty,
    pub estimated_duration: String,
    pub total_slides: usize,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub visual_elements_count: usize,

    #[serde(default, skip_serializing_if = "is_false")]
    pub has_speaker_notes: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_summary: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_markers: Vec<String>,

    pub cognitive_load: SignalLevel,
    pub interaction_level: SignalLevel,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl FrontMatter {
    /// Project a finalized chunk into its front-matter view.
    #[must_use]
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            module_id: chunk.module_id.clone(),
            module_title: chunk.module_title.clone(),
            slide_range: chunk.slide_range,
            chunk_index: chunk.chunk_index,
            total_chunks: chunk.total_chunks,
            learning_objectives: chunk.learning_objectives.clone(),
            prerequisites: chunk.prerequisites.clone(),
            concepts: chunk.concepts.clone(),
            activity_type: chunk.activity_type,
            difficulty_level: chunk.difficulty_level,
            estimated_duration: chunk.estimated_duration(),
            total_slides: chunk.total_slides(),
            visual_elements_count: chunk.visual_elements_count,
            has_speaker_notes: chunk.has_speaker_notes,
            content_summary: chunk.content_summary.clone(),
            compliance_markers: chunk.compliance_markers.clone(),
            cognitive_load: chunk.cognitive_load,
            interaction_level: chunk.interaction_level,
        }
    }
}

/// Render one finalized chunk into a complete markdown document.
///
/// Pure function of the chunk: no I/O, no randomness. Identical input
/// yields byte-identical output.
pub fn render(chunk: &Chunk) -> Result<String> {
    let front_matter = FrontMatter::from_chunk(chunk);
    let yaml = serde_saphyr::to_string(&front_matter)
        .map_err(|e| FormatError::Serialize(e.to_string()))?;

    let mut doc = String::new();
    doc.push_str("---\n");
    doc.push_str(yaml.trim_end());
    doc.push_str("\n---\n\n");

    let _ = writeln!(doc, "# {}\n", chunk.module_title);

    if chunk.total_chunks > 1 {
        let _ = writeln!(
            doc,
            "*This is part {} of {} in the {} series.*\n",
            chunk.chunk_index, chunk.total_chunks, chunk.module_title
        );
    }

    if !chunk.prerequisites.is_empty() {
        doc.push_str("## Prerequisites\n\n");
        doc.push_str("Before starting this module, you should have:\n\n");
        for prerequisite in &chunk.prerequisites {
            let _ = writeln!(doc, "- {prerequisite}");
        }
        doc.push('\n');
    }

    if !chunk.learning_objectives.is_empty() {
        doc.push_str("## Learning Objectives\n\n");
        doc.push_str("By the end of this module, you will be able to:\n\n");
        for objective in &chunk.learning_objectives {
            let _ = writeln!(doc, "- {objective}");
        }
        doc.push('\n');
    }

    doc.push_str("## Content\n\n");
    for slide in &chunk.slides {
        render_slide(&mut doc, slide);
    }

    Ok(doc)
}

fn render_slide(doc: &mut String, slide: &SlideRecord) {
    match &slide.title {
        Some(title) => {
            let _ = writeln!(doc, "### {title}\n");
        }
        None => {
            let _ = writeln!(doc, "### Slide {}\n", slide.slide_number);
        }
    }

    if let Some(summary) = &slide.content_summary {
        if !summary.is_empty() {
            let _ = writeln!(doc, "*{summary}*\n");
        }
    }

    for block in &slide.content {
        let _ = writeln!(doc, "{block}\n");
    }

    if !slide.bullets.is_empty() {
        doc.push_str("**Key Points:**\n\n");
        for bullet in &slide.bullets {
            let indent = "  ".repeat(bullet.level.saturating_sub(1) as usize);
            let _ = writeln!(doc, "{indent}- {}", bullet.text);
        }
        doc.push('\n');
    }

    if !slide.visual_elements.is_empty() {
        doc.push_str("**Visual Elements:**\n\n");
        for element in &slide.visual_elements {
            let _ = writeln!(doc, "- {}: {}", element.kind.as_str(), element.description);
        }
        doc.push('\n');
    }

    for code_block in &slide.code_blocks {
        let _ = writeln!(doc, "```{}", code_block.language.as_str());
        doc.push_str(&code_block.code);
        if !code_block.code.ends_with('\n') {
            doc.push('\n');
        }
        doc.push_str("```\n\n");
    }

    if !slide.assessment_items.is_empty() {
        doc.push_str("**Knowledge Check:**\n\n");
        for item in &slide.assessment_items {
            let _ = writeln!(doc, "- {} ({})", item.content, item.format.as_str());
        }
        doc.push('\n');
    }

    if !slide.instructor_notes.is_empty() {
        doc.push_str("**Instructor Guidance:**\n\n");
        for (category, notes) in &slide.instructor_notes {
            for note in notes {
                let _ = writeln!(doc, "> **{}:** {note}", category.as_str());
            }
        }
        doc.push('\n');
    }

    doc.push_str("---\n\n");
}

/// Re-parse the front-matter block of a rendered document.
///
/// Exposed so callers and tests can verify the render round trip.
pub fn parse_front_matter(doc: &str) -> Result<FrontMatter> {
    let rest = doc.strip_prefix("---\n").ok_or_else(|| {
        FormatError::InvalidDocument("missing front-matter opening fence".to_string())
    })?;
    let end = rest.find("\n---\n").ok_or_else(|| {
        FormatError::InvalidDocument("missing front-matter closing fence".to_string())
    })?;

    serde_saphyr::from_str(&rest[..=end]).map_err(|e| FormatError::InvalidDocument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckshred_model::{
        AssessmentFormat, AssessmentItem, Bullet, CodeBlock, CodeLanguage, InstructorNotes,
        NoteCategory, ShapeKind, VisualElement,
    };
    use pretty_assertions::assert_eq;

    fn sample_chunk() -> Chunk {
        let mut notes = InstructorNotes::new();
        notes.insert(NoteCategory::Timing, vec!["Spend 10 minutes here".into()]);

        let slide = SlideRecord {
            slide_number: 1,
            title: Some("What is Cloud Computing?".into()),
            content: vec!["On-demand delivery of IT resources".into()],
            bullets: vec![
                Bullet {
                    level: 1,
                    text: "Elasticity".into(),
                },
                Bullet {
                    level: 2,
                    text: "Scale out".into(),
                },
            ],
            code_blocks: vec![CodeBlock {
                code: "SELECT * FROM vms;".into(),
                language: CodeLanguage::Sql,
            }],
            visual_elements: vec![VisualElement {
                kind: ShapeKind::Chart,
                description: "Cost curve".into(),
            }],
            assessment_items: vec![AssessmentItem {
                content: "What is cloud computing?".into(),
                format: AssessmentFormat::OpenEnded,
            }],
            instructor_notes: notes,
            ..Default::default()
        };

        Chunk {
            module_id: "01-azure-fundamentals".into(),
            module_title: "Azure Fundamentals".into(),
            slide_range: (1, 1),
            chunk_index: 1,
            total_chunks: 2,
            learning_objectives: vec!["Explain cloud concepts".into()],
            prerequisites: vec!["Basic networking".into()],
            concepts: vec!["Cloud".into()],
            activity_type: Some(ActivityType::HandsOnLab),
            difficulty_level: Difficulty::Beginner,
            estimated_minutes: 12,
            compliance_markers: vec!["GDPR".into()],
            instructor_guidance: InstructorNotes::new(),
            content_summary: "Intro to cloud concepts.".into(),
            visual_summaries: vec!["chart: Cost curve".into()],
            visual_elements_count: 1,
            has_speaker_notes: false,
            cognitive_load: SignalLevel::Medium,
            interaction_level: SignalLevel::High,
            slides: vec![slide],
        }
    }

    #[test]
    fn render_is_deterministic() {
        let chunk = sample_chunk();
        assert_eq!(render(&chunk).unwrap(), render(&chunk).unwrap());
    }

    #[test]
    fn document_structure_is_complete() {
        let doc = render(&sample_chunk()).unwrap();

        assert!(doc.starts_with("---\n"));
        assert!(doc.contains("module_id:"));
        assert!(doc.contains("01-azure-fundamentals"));
        assert!(doc.contains("# Azure Fundamentals"));
        assert!(doc.contains("*This is part 1 of 2 in the Azure Fundamentals series.*"));
        assert!(doc.contains("## Prerequisites"));
        assert!(doc.contains("- Basic networking"));
        assert!(doc.contains("## Learning Objectives"));
        assert!(doc.contains("- Explain cloud concepts"));
        assert!(doc.contains("### What is Cloud Computing?"));
        assert!(doc.contains("**Key Points:**"));
        assert!(doc.contains("- Elasticity"));
        assert!(doc.contains("  - Scale out"));
        assert!(doc.contains("- chart: Cost curve"));
        assert!(doc.contains("```sql\nSELECT * FROM vms;\n```"));
        assert!(doc.contains("**Knowledge Check:**"));
        assert!(doc.contains("> **timing:** Spend 10 minutes here"));
    }

    #[test]
    fn part_note_omitted_for_single_chunk() {
        let mut chunk = sample_chunk();
        chunk.chunk_index = 1;
        chunk.total_chunks = 1;

        let doc = render(&chunk).unwrap();
        assert!(!doc.contains("series.*"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut chunk = sample_chunk();
        chunk.prerequisites.clear();
        chunk.learning_objectives.clear();

        let doc = render(&chunk).unwrap();
        assert!(!doc.contains("## Prerequisites"));
        assert!(!doc.contains("## Learning Objectives"));
        assert!(doc.contains("## Content"));
    }

    #[test]
    fn front_matter_round_trips() {
        let chunk = sample_chunk();
        let doc = render(&chunk).unwrap();

        let parsed = parse_front_matter(&doc).unwrap();
        assert_eq!(parsed.module_id, chunk.module_id);
        assert_eq!(parsed.slide_range, chunk.slide_range);
        assert_eq!(parsed.chunk_index, chunk.chunk_index);
        assert_eq!(parsed.total_chunks, chunk.total_chunks);
        assert_eq!(parsed.activity_type, Some(ActivityType::HandsOnLab));
        assert_eq!(parsed.estimated_duration, "12 minutes");
    }

    #[test]
    fn parse_rejects_documents_without_fences() {
        assert!(parse_front_matter("# no front matter").is_err());
        assert!(parse_front_matter("---\nunterminated: yes\n").is_err());
    }

    #[test]
    fn untitled_slides_fall_back_to_slide_number() {
        let mut chunk = sample_chunk();
        chunk.slides[0].title = None;

        let doc = render(&chunk).unwrap();
        assert!(doc.contains("### Slide 1"));
    }
}
