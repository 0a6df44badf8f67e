//! Deterministic pattern/keyword analysis of raw slide text.
//!
//! Every function here is total: bad input degrades to the documented
//! neutral default instead of erroring, so a single failed sub-analysis
//! never aborts a slide. Keyword tables are scanned in declaration order;
//! first match wins where a single value is produced.

use deckshred_model::{
    ActivityType, AssessmentFormat, AssessmentItem, Bullet, CodeBlock, CodeLanguage, Difficulty,
    InstructorNotes, LayoutType, NoteCategory, RawShape, RawSlide, ShapeKind, VisualElement,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Title keywords that mark the start of a new learning unit.
const MODULE_KEYWORDS: &[&str] = &[
    "module", "section", "chapter", "unit", "lesson", "part", "topic", "agenda", "overview",
];

/// Body phrases that mark a course-outline slide.
const OUTLINE_PHRASES: &[&str] = &[
    "course outline",
    "what we'll cover",
    "what we will cover",
    "in this course",
    "topics covered",
    "agenda",
];

/// Ordered activity keyword table. Order is priority: the first keyword
/// found in the title or body decides the tag, not the longest match.
const ACTIVITY_MARKERS: &[(&str, ActivityType)] = &[
    ("lab", ActivityType::HandsOnLab),
    ("exercise", ActivityType::GuidedExercise),
    ("practice", ActivityType::PracticeSession),
    ("demo", ActivityType::Demonstration),
    ("demonstration", ActivityType::Demonstration),
    ("try it", ActivityType::HandsOnActivity),
    ("hands-on", ActivityType::HandsOnActivity),
    ("activity", ActivityType::LearningActivity),
    ("assignment", ActivityType::Assignment),
    ("quiz", ActivityType::KnowledgeCheck),
    ("test", ActivityType::Assessment),
    ("assessment", ActivityType::FormalAssessment),
    ("review", ActivityType::KnowledgeReview),
    ("troubleshooting", ActivityType::TroubleshootingScenario),
    ("case study", ActivityType::CaseStudy),
    ("scenario", ActivityType::ScenarioBasedLearning),
    ("best practice", ActivityType::BestPractices),
    ("real world", ActivityType::RealWorldApplication),
    ("certification", ActivityType::CertificationPrep),
];

/// Difficulty keyword lists, scored by occurrence count.
const DIFFICULTY_MARKERS: &[(Difficulty, &[&str])] = &[
    (
        Difficulty::Beginner,
        &["basic", "introduction", "fundamentals", "getting started", "overview"],
    ),
    (
        Difficulty::Intermediate,
        &["intermediate", "advanced concepts", "diving deeper", "detailed"],
    ),
    (
        Difficulty::Advanced,
        &["advanced", "expert", "deep dive", "complex", "enterprise", "production"],
    ),
];

/// Compliance and certification keywords, emitted uppercase in this order.
const COMPLIANCE_MARKERS: &[&str] = &[
    "certification",
    "certified",
    "compliance",
    "audit",
    "security",
    "gdpr",
    "hipaa",
    "sox",
    "iso",
    "nist",
    "pci",
    "regulation",
];

/// Substrings whose presence suggests code. Two distinct hits qualify.
const CODE_INDICATORS: &[&str] = &[
    "{", "}", "()", "[]", ";", "->", "=>", "function", "def ", "class ", "import ", "from ",
    "select", "insert", "update", "delete", "$", "#", "//", "/*", "*/", "<!--", "-->",
];

/// Language keyword families in detection priority order.
const LANGUAGE_FAMILIES: &[(CodeLanguage, &[&str])] = &[
    (
        CodeLanguage::Sql,
        &["select ", "insert ", "update ", "delete ", "where "],
    ),
    (CodeLanguage::Python, &["def ", "import ", "from ", "print("]),
    (
        CodeLanguage::Javascript,
        &["function", "var ", "let ", "const ", "console.log"],
    ),
    (CodeLanguage::Html, &["<div", "<span", "<html", "<body"]),
    (
        CodeLanguage::Java,
        &["public class", "private ", "public static"],
    ),
    (CodeLanguage::Csharp, &["using ", "namespace", "public class"]),
];

/// Per-activity multipliers for the time estimate.
const TIME_MULTIPLIERS: &[(ActivityType, f64)] = &[
    (ActivityType::HandsOnLab, 10.0),
    (ActivityType::GuidedExercise, 5.0),
    (ActivityType::PracticeSession, 3.0),
    (ActivityType::Demonstration, 2.0),
    (ActivityType::HandsOnActivity, 4.0),
    (ActivityType::TroubleshootingScenario, 8.0),
    (ActivityType::CaseStudy, 6.0),
];

/// Divider-style titles: short, title-cased, at most three words, no
/// colon or sentence punctuation, over a nearly empty body.
const DIVIDER_TITLE_MAX: usize = 30;
const DIVIDER_BODY_MAX: usize = 60;
const DIVIDER_WORD_MAX: usize = 3;

static NUMBERED_UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:module|section|chapter|unit|lesson|part|topic|step)\s+(?:\d+|[ivxlcdm]+)\b")
        .expect("numbered unit pattern")
});

static DIVIDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9\s&'-]*$").expect("divider pattern"));

static OBJECTIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:objective|goal|aim|learn|understand|be able to)s?[:\-]?\s*(.+)",
        r"(?i)(?:by the end|after this|upon completion)[^.]*you (?:will|should)[^.]*(.+)",
        r"(?i)(?:students will|learners will|you will)[^.]*(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("objective pattern"))
    .collect()
});

static PREREQ_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:prerequisite|requirement|need to know|should know|familiar with)s?[:\-]?\s*(.+)",
        r"(?i)(?:before|prior to|first)[^.]*(?:understand|know|learn)[^.]*(.+)",
        r"(?i)(?:assumes?|assuming)[^.]*(?:knowledge|experience)[^.]*(.+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("prerequisite pattern"))
    .collect()
});

static QUESTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(What (?:is|are|do|does)[^?]*\?)",
        r"(?i)(How (?:do|does|can|will)[^?]*\?)",
        r"(?i)(Why (?:is|are|do|does)[^?]*\?)",
        r"(?i)(Which (?:of|one)[^?]*\?)",
        r"(?i)(True or False[^?]*\?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("question pattern"))
    .collect()
});

static NOTE_PATTERNS: Lazy<Vec<(NoteCategory, Vec<Regex>)>> = Lazy::new(|| {
    let table: &[(NoteCategory, &[&str])] = &[
        (
            NoteCategory::Timing,
            &[
                r"(?i)(?:time|duration|minutes?):",
                r"(?i)(?:spend|allow|take)\s+\d+\s*(?:min|minutes?)",
            ],
        ),
        (
            NoteCategory::Emphasis,
            &[
                r"(?i)(?:important|key|critical|note|remember):",
                r"(?i)(?:emphasize|highlight|stress)",
            ],
        ),
        (
            NoteCategory::Examples,
            &[
                r"(?i)(?:example|instance|case|scenario):",
                r"(?i)for example",
                r"(?i)such as",
            ],
        ),
        (
            NoteCategory::Tips,
            &[
                r"(?i)(?:tip|hint|suggestion):",
                r"(?i)pro tip",
                r"(?i)best practice",
            ],
        ),
        (
            NoteCategory::Warnings,
            &[
                r"(?i)(?:warning|caution|avoid|don't):",
                r"(?i)be careful",
                r"(?i)watch out",
            ],
        ),
        (
            NoteCategory::Context,
            &[
                r"(?i)(?:context|background|why):",
                r"(?i)the reason",
                r"(?i)this is because",
            ],
        ),
        (
            NoteCategory::Delivery,
            &[
                r"(?i)(?:say|tell|explain|mention):",
                r"(?i)make sure to",
                r"(?i)don't forget",
            ],
        ),
    ];

    table
        .iter()
        .map(|(category, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| Regex::new(p).expect("note pattern"))
                .collect();
            (*category, compiled)
        })
        .collect()
});

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence split pattern"));

/// Detect whether the slide marks the start of a new learning unit.
#[must_use]
pub fn is_module_start(title: Option<&str>, content: &[String]) -> bool {
    let body: String = content.join(" ").to_lowercase();
    if OUTLINE_PHRASES.iter().any(|p| body.contains(p)) {
        return true;
    }

    let Some(title) = title else {
        return false;
    };
    let title_lower = title.to_lowercase();

    if MODULE_KEYWORDS.iter().any(|k| title_lower.contains(k)) {
        return true;
    }
    if NUMBERED_UNIT_RE.is_match(title) {
        return true;
    }

    // Section dividers: a short standalone heading over a nearly empty body.
    let trimmed = title.trim();
    title.len() <= DIVIDER_TITLE_MAX
        && body.len() <= DIVIDER_BODY_MAX
        && trimmed.split_whitespace().count() <= DIVIDER_WORD_MAX
        && DIVIDER_RE.is_match(trimmed)
}

/// First activity keyword found in title or body, table order.
#[must_use]
pub fn detect_activity(title: Option<&str>, content: &[String]) -> Option<ActivityType> {
    let title_lower = title?.to_lowercase();
    let body = content.join(" ").to_lowercase();

    ACTIVITY_MARKERS
        .iter()
        .find(|(keyword, _)| title_lower.contains(keyword) || body.contains(keyword))
        .map(|(_, activity)| *activity)
}

/// Extract objective phrases from body text and speaker notes.
#[must_use]
pub fn extract_objectives(content: &[String], notes: &str) -> Vec<String> {
    let all_text = joined_text(content, notes);
    let mut objectives = Vec::new();

    for pattern in OBJECTIVE_PATTERNS.iter() {
        for captures in pattern.captures_iter(&all_text) {
            if let Some(m) = captures.get(1) {
                let objective = m.as_str().trim();
                if objective.len() > 10 {
                    objectives.push(objective.to_string());
                }
            }
        }
    }

    objectives
}

/// Extract prerequisite phrases, capped at the top three.
#[must_use]
pub fn extract_prerequisites(content: &[String], notes: &str) -> Vec<String> {
    let all_text = joined_text(content, notes);
    let mut prerequisites = Vec::new();

    for pattern in PREREQ_PATTERNS.iter() {
        for captures in pattern.captures_iter(&all_text) {
            if let Some(m) = captures.get(1) {
                let prereq = m.as_str().trim();
                if prereq.len() > 5 && prereq.len() < 100 {
                    prerequisites.push(prereq.to_string());
                }
            }
        }
    }

    prerequisites.truncate(3);
    prerequisites
}

/// Score difficulty keywords across title, body, and notes.
///
/// Highest count wins; ties resolve to the earliest level in
/// beginner → intermediate → advanced order. When nothing matches, fall
/// back to code-punctuation density.
#[must_use]
pub fn assess_difficulty(title: Option<&str>, content: &[String], notes: &str) -> Difficulty {
    let mut all_text = title.unwrap_or("").to_lowercase();
    for block in content {
        all_text.push(' ');
        all_text.push_str(&block.to_lowercase());
    }
    all_text.push(' ');
    all_text.push_str(&notes.to_lowercase());

    let mut best = Difficulty::Beginner;
    let mut best_score = 0usize;
    for (level, markers) in DIFFICULTY_MARKERS {
        let score: usize = markers.iter().map(|m| all_text.matches(m).count()).sum();
        if score > best_score {
            best = *level;
            best_score = score;
        }
    }

    if best_score > 0 {
        return best;
    }

    let punctuation = all_text.chars().filter(|c| "{}();".contains(*c)).count();
    if punctuation > 5 {
        Difficulty::Advanced
    } else if punctuation > 2 {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    }
}

/// Estimate delivery time in minutes.
///
/// Reading-speed base (150 wpm at ~5 chars/word) scaled by the activity
/// multiplier, floored at 1 minute and capped at 45.
#[must_use]
pub fn estimate_time(content: &[String], notes: &str, activity: Option<ActivityType>) -> u32 {
    let content_len: usize = content.iter().map(String::len).sum();
    let base = (content_len + notes.len()) as f64 / (150.0 * 5.0);

    let multiplier = activity
        .and_then(|a| {
            TIME_MULTIPLIERS
                .iter()
                .find(|(activity, _)| *activity == a)
                .map(|(_, m)| *m)
        })
        .unwrap_or(1.0);

    let minutes = (base * multiplier) as u32;
    minutes.clamp(1, 45)
}

/// Bucket speaker-note sentences by pedagogical intent.
///
/// A sentence can land in more than one category; within a category the
/// first matching pattern claims it once. Empty categories are dropped.
#[must_use]
pub fn categorize_notes(notes: &str) -> InstructorNotes {
    let mut categorized = InstructorNotes::new();
    if notes.is_empty() {
        return categorized;
    }

    for sentence in SENTENCE_SPLIT_RE.split(notes) {
        let sentence = sentence.trim();
        if sentence.len() < 5 {
            continue;
        }

        for (category, patterns) in NOTE_PATTERNS.iter() {
            if patterns.iter().any(|p| p.is_match(sentence)) {
                categorized
                    .entry(*category)
                    .or_default()
                    .push(sentence.to_string());
            }
        }
    }

    categorized
}

/// Extract quiz questions and knowledge checks.
#[must_use]
pub fn extract_assessments(content: &[String], notes: &str) -> Vec<AssessmentItem> {
    let all_text = joined_text(content, notes);
    let mut items = Vec::new();

    for pattern in QUESTION_PATTERNS.iter() {
        for captures in pattern.captures_iter(&all_text) {
            if let Some(m) = captures.get(1) {
                let question = m.as_str().trim().to_string();
                let format = if question.to_lowercase().contains("which") {
                    AssessmentFormat::MultipleChoice
                } else {
                    AssessmentFormat::OpenEnded
                };
                items.push(AssessmentItem {
                    content: question,
                    format,
                });
            }
        }
    }

    items
}

/// Scan for compliance/certification keywords, uppercase, table order.
#[must_use]
pub fn extract_compliance(content: &[String], notes: &str) -> Vec<String> {
    let all_text = joined_text(content, notes).to_lowercase();

    COMPLIANCE_MARKERS
        .iter()
        .filter(|marker| all_text.contains(*marker))
        .map(|marker| marker.to_uppercase())
        .collect()
}

/// Whether a text block looks like code.
///
/// Two distinct indicator substrings qualify, as does a multi-line block
/// with more than 30% indented lines.
#[must_use]
pub fn looks_like_code(text: &str) -> bool {
    let lower = text.to_lowercase();
    let indicator_count = CODE_INDICATORS
        .iter()
        .filter(|indicator| lower.contains(*indicator))
        .count();
    if indicator_count >= 2 {
        return true;
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() > 1 {
        let indented = lines
            .iter()
            .filter(|line| line.starts_with("  ") || line.starts_with('\t'))
            .count();
        if indented as f64 / lines.len() as f64 > 0.3 {
            return true;
        }
    }

    false
}

/// Guess the language of a code block, first family match wins.
#[must_use]
pub fn detect_language(code: &str) -> CodeLanguage {
    let lower = code.to_lowercase();

    LANGUAGE_FAMILIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(CodeLanguage::Text, |(language, _)| *language)
}

/// Pull code blocks out of the body text blocks.
#[must_use]
pub fn extract_code_blocks(content: &[String]) -> Vec<CodeBlock> {
    content
        .iter()
        .filter(|block| looks_like_code(block))
        .map(|block| CodeBlock {
            code: block.clone(),
            language: detect_language(block),
        })
        .collect()
}

/// Summarize non-text shapes as visual elements.
#[must_use]
pub fn visual_elements(shapes: &[RawShape]) -> Vec<VisualElement> {
    shapes
        .iter()
        .filter(|shape| shape.kind != ShapeKind::Text)
        .map(|shape| {
            let description = if shape.description.is_empty() {
                default_shape_description(shape.kind).to_string()
            } else {
                shape.description.clone()
            };
            VisualElement {
                kind: shape.kind,
                description,
            }
        })
        .collect()
}

const fn default_shape_description(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Image => "Image content",
        ShapeKind::Table => "Table structure",
        ShapeKind::Chart => "Chart or graph",
        ShapeKind::Diagram => "Diagram or SmartArt",
        ShapeKind::Text => "Text",
    }
}

/// Classify the semantic layout of a slide from its shape inventory.
#[must_use]
pub fn detect_layout(raw: &RawSlide) -> LayoutType {
    let has = |kind: ShapeKind| raw.shapes.iter().any(|s| s.kind == kind);

    if has(ShapeKind::Table) {
        LayoutType::DataTable
    } else if has(ShapeKind::Chart) {
        LayoutType::DataVisualization
    } else if has(ShapeKind::Image) {
        LayoutType::ImageFocused
    } else if raw.text.iter().filter(|t| t.len() > 100).count() > 2 {
        LayoutType::ContentHeavy
    } else if raw.title.is_some() && raw.text.len() <= 1 && raw.shapes.is_empty() {
        LayoutType::TitleSlide
    } else {
        LayoutType::StandardContent
    }
}

/// Flatten bullets into plain text blocks for analyses that only look at
/// prose (the extractor reports indented paragraphs separately).
#[must_use]
pub fn bullet_texts(bullets: &[Bullet]) -> Vec<String> {
    bullets.iter().map(|b| b.text.clone()).collect()
}

fn joined_text(content: &[String], notes: &str) -> String {
    let mut all_text = content.join(" ");
    all_text.push(' ');
    all_text.push_str(notes);
    all_text
}
