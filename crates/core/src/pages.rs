//! Page constants, sequence arithmetic, and input validation.
//!
//! Lives in `core` so both the repository layer and the HTTP handlers apply
//! the same rules.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Page type constants
// ---------------------------------------------------------------------------

pub const PAGE_TYPE_SECTION: &str = "section";
pub const PAGE_TYPE_TAB: &str = "tab";

/// All valid page types.
pub const VALID_PAGE_TYPES: &[&str] = &[PAGE_TYPE_SECTION, PAGE_TYPE_TAB];

/// Content type assigned when the caller does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "wysiwyg";

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Sequence given to the first page of a document.
pub const DEFAULT_FIRST_SEQUENCE: f64 = 4096.0;

/// Deepest heading level a page may take.
pub const MAX_LEVEL: i32 = 6;

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 2_000;

/// Maximum number of ids accepted by a where-in page lookup.
pub const MAX_WHERE_IN_IDS: usize = 500;

// ---------------------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------------------

/// Compute the sequence for a page appended to a document.
///
/// Doubles the current maximum so there is always room to insert a page
/// between two neighbours at their midpoint. A document with no pages (or
/// only non-positive sequences) starts at [`DEFAULT_FIRST_SEQUENCE`].
///
/// Fails with [`CoreError::Conflict`] once doubling would leave the finite
/// range; the document's pages must then be renumbered before appending.
pub fn next_sequence(current_max: Option<f64>) -> Result<f64, CoreError> {
    match current_max {
        Some(max) if max > 0.0 => {
            let next = max * 2.0;
            if next.is_finite() {
                Ok(next)
            } else {
                Err(CoreError::Conflict(format!(
                    "No sequence left after {max}; renumber the document's pages"
                )))
            }
        }
        _ => Ok(DEFAULT_FIRST_SEQUENCE),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a page title (non-empty, <= 2000 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a page type against the known set.
pub fn validate_page_type(page_type: &str) -> Result<(), CoreError> {
    if !VALID_PAGE_TYPES.contains(&page_type) {
        return Err(CoreError::Validation(format!(
            "Invalid page type '{}'. Valid page types: {}",
            page_type,
            VALID_PAGE_TYPES.join(", ")
        )));
    }
    Ok(())
}

/// Validate a heading level (1..=6).
pub fn validate_level(level: i32) -> Result<(), CoreError> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return Err(CoreError::Validation(format!(
            "Level must be between 1 and {MAX_LEVEL} (got {level})"
        )));
    }
    Ok(())
}

/// Validate an explicit sequence: finite and strictly positive.
pub fn validate_sequence(sequence: f64) -> Result<(), CoreError> {
    if !sequence.is_finite() || sequence <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Sequence must be a positive finite number (got {sequence})"
        )));
    }
    Ok(())
}

/// Validate a page meta config blob: must be a JSON object.
pub fn validate_config(config: &serde_json::Value) -> Result<(), CoreError> {
    if !config.is_object() {
        return Err(CoreError::Validation(
            "Config must be a JSON object".into(),
        ));
    }
    Ok(())
}
