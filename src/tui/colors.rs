//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Accent for the active filter tab and the entry border.
pub const ACCENT: Color = Color::Rgb(255, 215, 0);
/// Completed rows.
pub const DONE_GREY: Color = Color::DarkGray;
/// Status bar background.
pub const BAR_BLUE: Color = Color::Rgb(0, 60, 120);
