//! Shared crate-wide constants.

use std::time::Duration;

/// Minimum number of header cells the overlay must keep inside the viewport
/// so the user can still grab it and drag it back.
pub const MIN_VISIBLE_MARGIN: u16 = 4;

/// How long the "copied" confirmation stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(1500);

/// Lines retained by the in-app log pane.
pub const LOG_BUFFER_LINES: usize = 2000;

/// Placeholder shown before the first focus value reaches a screen.
pub const WAITING_LABEL: &str = "Waiting...";
