//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Dashboard accent.
pub const DARK_TEAL: Color = Color::Rgb(0, 80, 80);
/// Selection highlight.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Alert dialog background.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
