use serde::{Deserialize, Serialize};

/// One deck of raw slides as produced by the external extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDeck {
    /// Presentation name; callers fall back to the file stem when absent.
    #[serde(default)]
    pub presentation: Option<String>,

    /// Raw slides in presentation order.
    #[serde(default)]
    pub slides: Vec<RawSlide>,
}

/// Raw per-slide shape data from the extraction collaborator.
///
/// The extractor owns the presentation container format; this crate only
/// sees the normalized result. Every field defaults to an empty/neutral
/// value so a partially extracted slide still deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSlide {
    /// 1-based slide number. Zero means "assign from position".
    #[serde(default)]
    pub slide_number: u32,

    /// Title candidate text, if the slide layout carried one.
    #[serde(default)]
    pub title: Option<String>,

    /// Non-title body text blocks, in shape order.
    #[serde(default)]
    pub text: Vec<String>,

    /// Speaker notes, possibly empty.
    #[serde(default)]
    pub notes: String,

    /// Paragraph/bullet structure preserved from the slide body.
    #[serde(default)]
    pub bullets: Vec<Bullet>,

    /// Image/table/chart/diagram shape descriptors.
    #[serde(default)]
    pub shapes: Vec<RawShape>,

    /// Layout name reported by the container, if any.
    #[serde(default)]
    pub layout_name: Option<String>,
}

impl RawSlide {
    /// Total character length of the body text blocks.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.text.iter().map(String::len).sum()
    }
}

/// A single bullet item with its indentation level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    /// Indentation level, 1-based (0 is plain body text upstream).
    pub level: u8,
    pub text: String,
}

/// A non-text shape reported by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawShape {
    pub kind: ShapeKind,
    /// Free-form descriptor (position, dimensions, headers, ...).
    #[serde(default)]
    pub description: String,
}

/// Shape categories the extractor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Image,
    Table,
    Chart,
    Diagram,
    Text,
}

impl ShapeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Diagram => "diagram",
            Self::Text => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_deserializes_with_missing_fields() {
        let deck: RawDeck = serde_json::from_str(
            r#"{"slides": [{"slide_number": 1, "title": "Intro"}, {"text": ["body"]}]}"#,
        )
        .unwrap();

        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].title.as_deref(), Some("Intro"));
        assert!(deck.slides[0].text.is_empty());
        assert_eq!(deck.slides[1].slide_number, 0);
        assert_eq!(deck.slides[1].text, vec!["body".to_string()]);
    }

    #[test]
    fn shape_kind_round_trips_lowercase() {
        let shape: RawShape =
            serde_json::from_str(r#"{"kind": "table", "description": "3x4"}"#).unwrap();
        assert_eq!(shape.kind, ShapeKind::Table);
        assert_eq!(shape.kind.as_str(), "table");
    }

    #[test]
    fn body_len_sums_text_blocks() {
        let slide = RawSlide {
            text: vec!["abc".into(), "defg".into()],
            ..Default::default()
        };
        assert_eq!(slide.body_len(), 7);
    }
}
