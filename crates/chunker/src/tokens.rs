use deckshred_model::SlideRecord;

/// Token-count estimation used to size chunks.
///
/// One estimator instance is used consistently for a whole chunking pass;
/// strategies never mix estimation methods mid-call.
pub trait TokenEstimator: Send + Sync {
    /// Estimate the token count of a text fragment.
    fn estimate_text(&self, text: &str) -> usize;

    /// Estimate the token count of a group of slides.
    ///
    /// The default joins title, body blocks, and notes per slide and
    /// estimates the concatenation; implementations may override with a
    /// cheaper equivalent.
    fn estimate_group(&self, slides: &[SlideRecord]) -> usize {
        let mut text = String::new();
        for slide in slides {
            if let Some(title) = &slide.title {
                text.push_str(title);
                text.push(' ');
            }
            for block in &slide.content {
                text.push_str(block);
                text.push(' ');
            }
            text.push_str(&slide.speaker_notes);
            text.push(' ');
        }
        self.estimate_text(&text)
    }
}

/// Flat character-ratio approximation: 4 characters per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharTokenEstimator;

/// Average characters per token for prose.
const CHARS_PER_TOKEN: usize = 4;

impl TokenEstimator for CharTokenEstimator {
    fn estimate_text(&self, text: &str) -> usize {
        text.len() / CHARS_PER_TOKEN
    }

    fn estimate_group(&self, slides: &[SlideRecord]) -> usize {
        // Same ratio, without materializing the joined text.
        let chars: usize = slides.iter().map(SlideRecord::text_len).sum();
        chars / CHARS_PER_TOKEN
    }
}

/// Precise estimation backed by a HuggingFace tokenizer file.
#[cfg(feature = "hf-tokenizers")]
pub struct HfTokenEstimator {
    tokenizer: tokenizers::Tokenizer,
}

#[cfg(feature = "hf-tokenizers")]
impl HfTokenEstimator {
    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let tokenizer = tokenizers::Tokenizer::from_file(path.as_ref()).map_err(|e| {
            crate::ChunkerError::invalid_config(format!(
                "failed to load tokenizer {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(Self { tokenizer })
    }
}

#[cfg(feature = "hf-tokenizers")]
impl TokenEstimator for HfTokenEstimator {
    fn estimate_text(&self, text: &str) -> usize {
        match self.tokenizer.encode(text, false) {
            Ok(encoding) => encoding.get_ids().len(),
            Err(err) => {
                log::warn!("tokenizer failed, using character approximation: {err}");
                text.len() / CHARS_PER_TOKEN
            }
        }
    }
}
