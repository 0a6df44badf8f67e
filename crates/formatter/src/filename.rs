/// Characters rejected by at least one mainstream filesystem.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Windows reserved device names (checked against the stem,
/// case-insensitively).
const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Maximum stem length; with the default extension the whole name stays
/// within 154 characters.
const STEM_MAX: usize = 150;

const DEFAULT_EXTENSION: &str = ".md";

/// Sanitize a filename for cross-platform use.
///
/// Invalid characters, control characters, and whitespace runs become
/// single underscores; reserved device names are prefixed with `file_`
/// and leading-dot names with `file`; a missing extension defaults to
/// `.md`; empty input becomes `untitled.md`. The result never contains
/// `< > : " / \ | ? *`, never starts with `.`, and never exceeds 154
/// characters.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    // Replace invalid and control characters, fold whitespace runs, and
    // collapse the resulting underscore runs.
    let mut cleaned = String::with_capacity(filename.len());
    let mut pending_underscore = false;
    for c in filename.chars() {
        let replace = INVALID_CHARS.contains(&c) || c.is_control() || c.is_whitespace();
        if replace {
            pending_underscore = true;
        } else {
            if pending_underscore {
                cleaned.push('_');
                pending_underscore = false;
            }
            cleaned.push(c);
        }
    }
    if pending_underscore && !cleaned.is_empty() {
        cleaned.push('_');
    }

    if cleaned.trim_matches(|c| c == '_' || c == '.').is_empty() {
        return format!("untitled{DEFAULT_EXTENSION}");
    }

    // Split off the extension (the final dot, unless it would leave an
    // empty stem).
    let (mut stem, mut extension) = match cleaned.rfind('.') {
        Some(idx) if idx > 0 => {
            let (s, e) = cleaned.split_at(idx);
            (s.to_string(), e.to_string())
        }
        _ => (cleaned.clone(), String::new()),
    };
    if extension.len() <= 1 {
        // A bare trailing dot is not an extension.
        stem = cleaned.trim_end_matches('.').to_string();
        extension = String::new();
    }
    if extension.is_empty() {
        extension = DEFAULT_EXTENSION.to_string();
    }

    // Hidden files and reserved device names get a prefix.
    let reserved = {
        let base = stem.split('.').next().unwrap_or("").to_lowercase();
        RESERVED_NAMES.contains(&base.as_str())
    };
    if reserved {
        stem = format!("file_{stem}");
    } else if stem.starts_with('.') {
        stem = format!("file{stem}");
    }

    // Keep the whole name within STEM_MAX + default-extension length,
    // whatever the actual extension is.
    let budget = (STEM_MAX + DEFAULT_EXTENSION.len())
        .saturating_sub(extension.chars().count())
        .max(1);
    let stem_max = STEM_MAX.min(budget);
    if stem.chars().count() > stem_max {
        stem = stem.chars().take(stem_max).collect();
    }

    format!("{stem}{extension}")
}
