use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use deckshred_model::RawDeck;

/// Extension of deck files produced by the extraction collaborator.
const DECK_EXTENSION: &str = "json";

/// Load one deck file.
pub fn load_deck(path: &Path) -> Result<RawDeck> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid deck file {}", path.display()))
}

/// Whether a path looks like a deck file.
#[must_use]
pub fn is_deck_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(DECK_EXTENSION))
}

/// Resolve the files to process: explicit arguments first, otherwise a
/// scan of the input directory. The result is sorted for deterministic
/// processing order.
pub fn discover_files(explicit: &[PathBuf], input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if explicit.is_empty() {
        if !input_dir.exists() {
            bail!("input directory {} does not exist", input_dir.display());
        }
        for entry in std::fs::read_dir(input_dir)
            .with_context(|| format!("failed to scan {}", input_dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && is_deck_file(&path) {
                files.push(path);
            }
        }
    } else {
        for path in explicit {
            if !path.exists() {
                log::error!("file not found: {}", path.display());
            } else if !is_deck_file(path) {
                log::warn!("skipping {}: not a deck file", path.display());
            } else {
                files.push(path.clone());
            }
        }
    }

    files.sort();
    Ok(files)
}
