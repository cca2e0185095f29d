//! The focused-unit value type shared by every stage of the pipeline.

use std::fmt;

/// Placeholder used whenever the host does not report an identifier.
pub const UNKNOWN: &str = "Unknown";

/// Normalized `(app id, window id)` pair describing what had focus at a
/// point in time.
///
/// Fields are private so a record cannot change after construction. Blank or
/// missing identifiers are replaced by [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityRecord {
    app_id: String,
    window_id: String,
}

impl IdentityRecord {
    pub fn new(app_id: impl Into<String>, window_id: impl Into<String>) -> Self {
        Self {
            app_id: normalize(app_id.into()),
            window_id: normalize(window_id.into()),
        }
    }

    /// Build a record from identifiers that the host may not have provided.
    pub fn from_raw(app_id: Option<&str>, window_id: Option<&str>) -> Self {
        Self::new(app_id.unwrap_or_default(), window_id.unwrap_or_default())
    }

    pub fn unknown() -> Self {
        Self {
            app_id: UNKNOWN.to_string(),
            window_id: UNKNOWN.to_string(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    /// Whether the window identifier carries real information.
    pub fn has_window(&self) -> bool {
        is_known(&self.window_id)
    }
}

impl Default for IdentityRecord {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.app_id, self.window_id)
    }
}

/// `false` for empty (after trimming) values and the sentinel.
pub fn is_known(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != UNKNOWN
}

fn normalize(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}
