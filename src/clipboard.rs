//! Copy-to-clipboard for identifiers shown in the overlay, backed by
//! `arboard`.

use thiserror::Error;

use crate::identity::is_known;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(String),
    /// Nothing worth copying (blank or the unknown placeholder).
    Skipped,
}

/// Trimmed text to copy, or `None` for blank and placeholder values.
pub fn copyable_text(value: &str) -> Option<&str> {
    is_known(value).then(|| value.trim())
}

/// Put `value` on the system clipboard unless it carries no information.
pub fn copy_identifier(value: &str) -> Result<CopyOutcome, ClipboardError> {
    let Some(text) = copyable_text(value) else {
        return Ok(CopyOutcome::Skipped);
    };
    let mut cb = arboard::Clipboard::new()?;
    cb.set_text(text.to_owned())?;
    tracing::debug!(text, "copied to clipboard");
    Ok(CopyOutcome::Copied(text.to_owned()))
}
